//! # Armazém de Contagens
//!
//! O coração estatístico do etiquetador. Uma única passada sobre o corpus
//! (já reescrito com `_RARE_`) acumula dois tipos de evidência:
//!
//! - **Emissões**: quantas vezes o par `(token, tag)` foi observado.
//! - **N-gramas de tags**: quantas vezes cada sequência contígua de 1, 2
//!   ou 3 tags ocorreu, com a frente de cada sentença preenchida por dois
//!   marcadores sintéticos de início ([`START_TAG`]) e o final por um
//!   marcador de parada ([`STOP_TAG`]).
//!
//! As contagens são persistidas em um formato texto plano, uma linha por
//! registro:
//!
//! ```text
//! 5 WORDTAG I-GENE cat
//! 12 1-GRAM O
//! 3 2-GRAM I-GENE O
//! 1 3-GRAM * * I-GENE
//! ```
//!
//! O segundo campo distingue o tipo do registro. As contagens são lidas
//! de volta como ponto flutuante, permitindo aritmética de probabilidade
//! sobre contagens possivelmente fracionárias recarregadas de disco.

use std::collections::{BTreeSet, HashMap};
use std::io::{BufRead, Write};

use crate::corpus::Sentence;
use crate::error::TaggerError;

/// Marcador sintético de início de sentença (contexto `*`).
pub const START_TAG: &str = "*";

/// Marcador sintético de fim de sentença.
pub const STOP_TAG: &str = "STOP";

/// Ordem máxima dos n-gramas de tags coletados.
pub const NGRAM_ORDER: usize = 3;

/// Chave composta `(token, tag)` da tabela de emissões.
///
/// Um tipo-valor com igualdade e hash estruturais, em vez de uma tupla
/// anônima: a chave é parte do contrato público do armazém.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WordTag {
    pub word: String,
    pub tag: String,
}

impl WordTag {
    pub fn new(word: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            tag: tag.into(),
        }
    }
}

/// Contagens de emissão e de n-gramas acumuladas de um corpus anotado.
///
/// Construído fresco a cada execução (nada de estado global): ou pela via
/// de escrita ([`CountStore::accumulate`] + [`CountStore::write_counts`])
/// ou pela via de leitura ([`CountStore::read_counts`]). Depois de
/// recarregado, não sofre mais mutação.
#[derive(Debug, Default, PartialEq)]
pub struct CountStore {
    /// `(token, tag)` → contagem de emissões.
    emission_counts: HashMap<WordTag, f64>,
    /// `ngram_counts[k-1]`: tabela de k-gramas, chaveada pela sequência de tags.
    ngram_counts: [HashMap<Vec<String>, f64>; NGRAM_ORDER],
    /// Conjunto de todas as tags observadas, em ordem lexicográfica.
    all_tags: BTreeSet<String>,
}

impl CountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acumula as contagens de uma sentença.
    ///
    /// A sequência de tags é preenchida com dois [`START_TAG`] à frente e
    /// um [`STOP_TAG`] ao final; cada janela de trigrama é percorrida uma
    /// vez. Para cada trigrama, as janelas finais de tamanho 2 e 3 são
    /// contadas sempre; a janela de tamanho 1 e a emissão `(token, tag)`
    /// apenas quando a posição corrente é uma palavra real (não o
    /// marcador de parada). O contexto inicial `(*, *)` recebe um
    /// incremento dedicado uma vez por sentença.
    pub fn accumulate(&mut self, sentence: &Sentence) {
        let mut tags: Vec<&str> = Vec::with_capacity(sentence.len() + NGRAM_ORDER);
        tags.push(START_TAG);
        tags.push(START_TAG);
        tags.extend(sentence.iter().map(|(_, tag)| tag.as_str()));
        tags.push(STOP_TAG);

        for i in (NGRAM_ORDER - 1)..tags.len() {
            for k in 2..=NGRAM_ORDER {
                let window: Vec<String> =
                    tags[i + 1 - k..=i].iter().map(|t| t.to_string()).collect();
                *self.ngram_counts[k - 1].entry(window).or_insert(0.0) += 1.0;
            }

            let word_idx = i - (NGRAM_ORDER - 1);
            if word_idx < sentence.len() {
                let (word, tag) = &sentence[word_idx];
                *self
                    .ngram_counts[0]
                    .entry(vec![tag.clone()])
                    .or_insert(0.0) += 1.0;
                *self
                    .emission_counts
                    .entry(WordTag::new(word.clone(), tag.clone()))
                    .or_insert(0.0) += 1.0;
                self.all_tags.insert(tag.clone());
            }

            if i == NGRAM_ORDER - 1 {
                // primeiro trigrama da sentença: conta o contexto inicial
                let start = vec![START_TAG.to_string(); NGRAM_ORDER - 1];
                *self.ngram_counts[NGRAM_ORDER - 2].entry(start).or_insert(0.0) += 1.0;
            }
        }
    }

    /// Contagem de emissão do par `(word, tag)`; 0 se ausente.
    pub fn emission_count(&self, word: &str, tag: &str) -> f64 {
        self.emission_counts
            .get(&WordTag::new(word, tag))
            .copied()
            .unwrap_or(0.0)
    }

    /// Contagem do 1-grama de uma tag; 0 se ausente.
    pub fn unigram_count(&self, tag: &str) -> f64 {
        self.ngram_count(&[tag.to_string()])
    }

    /// Contagem de um n-grama arbitrário de ordem 1..=3; 0 se ausente.
    pub fn ngram_count(&self, ngram: &[String]) -> f64 {
        if ngram.is_empty() || ngram.len() > NGRAM_ORDER {
            return 0.0;
        }
        self.ngram_counts[ngram.len() - 1]
            .get(ngram)
            .copied()
            .unwrap_or(0.0)
    }

    /// Todas as tags observadas, em ordem lexicográfica estável.
    pub fn all_tags(&self) -> impl Iterator<Item = &str> {
        self.all_tags.iter().map(String::as_str)
    }

    /// Todas as entradas da tabela de emissões.
    pub fn emissions(&self) -> impl Iterator<Item = (&WordTag, f64)> {
        self.emission_counts.iter().map(|(key, &count)| (key, count))
    }

    /// Serializa as contagens no formato texto plano.
    ///
    /// Primeiro as emissões (`<contagem> WORDTAG <tag> <token>`), depois
    /// os n-gramas de cada ordem (`<contagem> <k>-GRAM <tags...>`).
    pub fn write_counts<W: Write>(&self, mut output: W) -> Result<(), TaggerError> {
        for (key, count) in &self.emission_counts {
            writeln!(output, "{} WORDTAG {} {}", count, key.tag, key.word)?;
        }
        for order in 1..=NGRAM_ORDER {
            for (ngram, count) in &self.ngram_counts[order - 1] {
                writeln!(output, "{} {}-GRAM {}", count, order, ngram.join(" "))?;
            }
        }
        Ok(())
    }

    /// Inverso exato de [`CountStore::write_counts`].
    ///
    /// Registros `WORDTAG` populam a tabela de emissões e o conjunto de
    /// tags; registros `<k>-GRAM` populam a tabela de ordem k. Qualquer
    /// linha fora do formato, contagem não numérica ou ordem fora de
    /// 1..=3 aborta a leitura com [`TaggerError::CountLine`].
    pub fn read_counts<R: BufRead>(reader: R) -> Result<Self, TaggerError> {
        let mut store = Self::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            let malformed = || TaggerError::CountLine {
                line_no,
                line: line.clone(),
            };

            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 3 {
                return Err(malformed());
            }
            let count: f64 = parts[0].parse().map_err(|_| malformed())?;

            if parts[1] == "WORDTAG" {
                if parts.len() < 4 {
                    return Err(malformed());
                }
                let tag = parts[2].to_string();
                // o token pode conter espaços: rejunta os campos finais
                let word = parts[3..].join(" ");
                store.all_tags.insert(tag.clone());
                store.emission_counts.insert(WordTag { word, tag }, count);
            } else if let Some(order) = parts[1].strip_suffix("-GRAM") {
                let order: usize = order.parse().map_err(|_| malformed())?;
                if order == 0 || order > NGRAM_ORDER || parts.len() - 2 != order {
                    return Err(malformed());
                }
                let ngram: Vec<String> = parts[2..].iter().map(|t| t.to_string()).collect();
                store.ngram_counts[order - 1].insert(ngram, count);
            } else {
                return Err(malformed());
            }
        }
        Ok(store)
    }
}
