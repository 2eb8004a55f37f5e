//! # Etiquetagem de Streams
//!
//! Aplica a decisão por token do [`EmissionModel`] a um stream de
//! entrada, uma linha por token. Linhas em branco atravessam intactas
//! (preservando as fronteiras de sentença); as demais são reemitidas
//! como `<token> <tag>`.

use std::io::{BufRead, Write};

use serde::Serialize;

use crate::emission::EmissionModel;
use crate::error::TaggerError;

/// Resumo de uma execução de etiquetagem.
#[derive(Debug, Default, Clone, Serialize)]
pub struct TagSummary {
    /// Tokens etiquetados.
    pub tokens: usize,
    /// Linhas em branco preservadas.
    pub blank_lines: usize,
}

/// Etiqueta cada linha da entrada e escreve o resultado na saída.
///
/// A primeira falha (E/S ou modelo inconsistente) interrompe o
/// processamento; o que já foi escrito permanece escrito.
pub fn tag_stream<R: BufRead, W: Write>(
    model: &EmissionModel,
    input: R,
    mut output: W,
) -> Result<TagSummary, TaggerError> {
    let mut summary = TagSummary::default();
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            writeln!(output)?;
            summary.blank_lines += 1;
            continue;
        }
        let token = line.trim();
        let tag = model.best_tag(token)?;
        writeln!(output, "{token} {tag}")?;
        summary.tokens += 1;
    }
    output.flush()?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counts::CountStore;

    fn model() -> EmissionModel {
        let counts = "\
3 WORDTAG I-GENE sent\n\
1 WORDTAG O sent\n\
4 WORDTAG O _RARE_\n\
6 1-GRAM I-GENE\n\
6 1-GRAM O\n";
        EmissionModel::new(CountStore::read_counts(counts.as_bytes()).unwrap())
    }

    #[test]
    fn test_tag_stream_labels_each_token() {
        let mut out = Vec::new();
        let summary = tag_stream(&model(), "sent\n\nnovel\n".as_bytes(), &mut out).unwrap();
        let got = String::from_utf8(out).unwrap();
        // "sent" tem emissão maior sob I-GENE; "novel" cai em _RARE_ (só O)
        assert_eq!(got, "sent I-GENE\n\nnovel O\n");
        assert_eq!(summary.tokens, 2);
        assert_eq!(summary.blank_lines, 1);
    }

    #[test]
    fn test_tag_stream_preserves_blank_lines() {
        let mut out = Vec::new();
        tag_stream(&model(), "\n\n".as_bytes(), &mut out).unwrap();
        assert_eq!(out, b"\n\n");
    }
}
