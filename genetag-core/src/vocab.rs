//! # Vocabulário e Reescrita de Tokens Raros
//!
//! Modelos de contagem sofrem com palavras vistas poucas vezes: as
//! estatísticas de emissão ficam esparsas demais para serem úteis. A
//! solução clássica é colapsar todas as palavras de baixa frequência em
//! uma única identidade reservada, o sentinela [`RARE_TOKEN`] (`_RARE_`).
//!
//! O processo exige **duas passadas** sobre o mesmo corpus:
//!
//! 1. [`Vocabulary::observe`] conta a frequência do campo inicial de cada
//!    linha.
//! 2. [`rewrite_rare`] relê o corpus do início e substitui o token das
//!    linhas cuja frequência ficou abaixo de [`RARE_THRESHOLD`],
//!    preservando o restante da linha byte a byte.
//!
//! Uma transformação de passada única não funcionaria: a raridade de um
//! token só é conhecida depois de ver o corpus inteiro.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use crate::error::TaggerError;

/// Frequência mínima para um token ser considerado frequente.
/// Contagem estritamente menor que isso classifica o token como raro.
pub const RARE_THRESHOLD: u32 = 5;

/// Sentinela que substitui todos os tokens raros no corpus reescrito.
pub const RARE_TOKEN: &str = "_RARE_";

/// Mapa token → número de ocorrências no corpus de treinamento.
///
/// Construído uma vez por corpus e imutável depois disso. Tokens nunca
/// vistos resolvem para contagem 0 (e portanto são raros por padrão).
#[derive(Debug, Default)]
pub struct Vocabulary {
    counts: HashMap<String, u32>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consome todas as linhas do corpus e conta o campo inicial de cada
    /// uma. Linhas em branco (fronteiras de sentença) não contam.
    pub fn observe<R: BufRead>(&mut self, reader: R) -> Result<(), TaggerError> {
        for line in reader.lines() {
            let line = line?;
            if let Some(word) = line.split_whitespace().next() {
                *self.counts.entry(word.to_string()).or_insert(0) += 1;
            }
        }
        Ok(())
    }

    /// Contagem de um token; 0 se nunca visto.
    pub fn count(&self, token: &str) -> u32 {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Um token é raro sse sua contagem é estritamente menor que
    /// [`RARE_THRESHOLD`].
    pub fn is_rare(&self, token: &str) -> bool {
        self.count(token) < RARE_THRESHOLD
    }

    /// Número de tipos (tokens distintos) observados.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Número de tipos abaixo do limiar de raridade.
    pub fn rare_types(&self) -> usize {
        self.counts
            .values()
            .filter(|&&c| c < RARE_THRESHOLD)
            .count()
    }
}

/// Reescreve o corpus substituindo tokens raros pelo sentinela `_RARE_`.
///
/// Emite exatamente uma linha de saída por linha de entrada. Apenas o
/// campo inicial é substituído; o restante da linha (tag e qualquer
/// estrutura adicional) é reemitido sem alteração. Linhas com menos de
/// dois campos não quebram: o restante é tratado como opaco. Linhas em
/// branco passam adiante intactas.
pub fn rewrite_rare<R: BufRead, W: Write>(
    vocab: &Vocabulary,
    input: R,
    mut output: W,
) -> Result<(), TaggerError> {
    for line in input.lines() {
        let line = line?;
        // localiza o campo inicial (primeiro trecho não branco da linha)
        let span = line.split_whitespace().next().map(|word| {
            let start = line.find(word).unwrap_or(0);
            (start, start + word.len(), vocab.is_rare(word))
        });
        let rewritten = match span {
            Some((start, end, true)) => {
                format!("{}{}{}", &line[..start], RARE_TOKEN, &line[end..])
            }
            _ => line,
        };
        writeln!(output, "{rewritten}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab_from(corpus: &str) -> Vocabulary {
        let mut vocab = Vocabulary::new();
        vocab.observe(corpus.as_bytes()).unwrap();
        vocab
    }

    fn rewrite(corpus: &str) -> String {
        let vocab = vocab_from(corpus);
        let mut out = Vec::new();
        rewrite_rare(&vocab, corpus.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_rarity_threshold() {
        // 5 ocorrências de "cat", 1 de "dog"
        let corpus = "cat I-GENE\ncat I-GENE\ncat I-GENE\ncat I-GENE\ncat I-GENE\ndog O\n";
        let vocab = vocab_from(corpus);
        assert_eq!(vocab.count("cat"), 5);
        assert!(!vocab.is_rare("cat"));
        assert!(vocab.is_rare("dog"));
        // nunca visto → contagem 0 → raro
        assert!(vocab.is_rare("unseen"));
        assert_eq!(vocab.rare_types(), 1);
    }

    #[test]
    fn test_rewrite_replaces_only_the_token() {
        let corpus = "cat I-GENE\ncat I-GENE\ncat I-GENE\ncat I-GENE\ncat I-GENE\ndog O\n";
        let got = rewrite(corpus);
        assert!(got.ends_with("_RARE_ O\n"));
        assert!(got.starts_with("cat I-GENE\n"));
    }

    #[test]
    fn test_rewrite_preserves_remainder_verbatim() {
        let got = rewrite("dog O  extra   campos\n");
        assert_eq!(got, "_RARE_ O  extra   campos\n");
    }

    #[test]
    fn test_rewrite_single_field_line_does_not_crash() {
        let got = rewrite("dog\n");
        assert_eq!(got, "_RARE_\n");
    }

    #[test]
    fn test_rewrite_keeps_blank_lines() {
        let got = rewrite("dog O\n\ndog O\n");
        assert_eq!(got.lines().nth(1), Some(""));
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let corpus = "cat I-GENE\ncat I-GENE\ncat I-GENE\ncat I-GENE\ncat I-GENE\n\
                      dog O\nfish O\nbird O\n";
        let first = rewrite(corpus);
        // reconstruindo o vocabulário sobre a própria saída, nenhum token
        // já raro volta a ser frequente e a saída não muda mais
        let second = rewrite(&first);
        assert_eq!(first, second);
    }
}
