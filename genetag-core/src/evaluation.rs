//! # Avaliação — Precisão, Revocação e F1 por Tag
//!
//! Compara linha a linha um arquivo etiquetado pelo modelo com o
//! padrão-ouro correspondente. Os dois arquivos devem ter a mesma
//! estrutura: o mesmo número de linhas, com as linhas em branco nas
//! mesmas posições. Qualquer divergência estrutural é um erro de
//! formato, não um resultado.
//!
//! A tag de cada linha é o último campo, o que permite comparar tanto
//! `token tag` quanto formatos com tokens de vários campos.

use std::collections::BTreeMap;
use std::fmt;
use std::io::BufRead;

use serde::Serialize;

use crate::error::TaggerError;

/// Medidas acumuladas para uma única tag.
#[derive(Debug, Default, Clone, Serialize)]
pub struct LabelMeasure {
    /// Predições corretas desta tag.
    pub correct: usize,
    /// Ocorrências da tag no padrão-ouro.
    pub observed: usize,
    /// Predições da tag feitas pelo modelo.
    pub predicted: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl LabelMeasure {
    fn finalize(&mut self) {
        self.precision = if self.predicted == 0 {
            0.0
        } else {
            self.correct as f64 / self.predicted as f64
        };
        self.recall = if self.observed == 0 {
            0.0
        } else {
            self.correct as f64 / self.observed as f64
        };
        self.f1 = if self.precision + self.recall == 0.0 {
            0.0
        } else {
            2.0 * self.precision * self.recall / (self.precision + self.recall)
        };
    }
}

/// Relatório completo de uma avaliação.
#[derive(Debug, Default, Serialize)]
pub struct Evaluation {
    /// Medidas por tag, em ordem lexicográfica.
    pub labels: BTreeMap<String, LabelMeasure>,
    /// Total de tokens comparados.
    pub total: usize,
    /// Total de predições corretas.
    pub total_correct: usize,
}

impl Evaluation {
    /// Acurácia global (tokens corretos / tokens comparados).
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.total_correct as f64 / self.total as f64
        }
    }

    /// Compara o padrão-ouro com o arquivo predito.
    pub fn evaluate<G: BufRead, P: BufRead>(gold: G, predicted: P) -> Result<Self, TaggerError> {
        let mut report = Evaluation::default();
        let mut gold_lines = gold.lines();
        let mut pred_lines = predicted.lines();
        let mut line_no = 0usize;

        loop {
            line_no += 1;
            match (gold_lines.next(), pred_lines.next()) {
                (None, None) => break,
                (Some(gold_line), Some(pred_line)) => {
                    let gold_line = gold_line?;
                    let pred_line = pred_line?;
                    let gold_tag = gold_line.split_whitespace().last();
                    let pred_tag = pred_line.split_whitespace().last();
                    match (gold_tag, pred_tag) {
                        // linhas em branco alinhadas: fronteira de sentença
                        (None, None) => {}
                        (Some(gold_tag), Some(pred_tag)) => {
                            report.total += 1;
                            report
                                .labels
                                .entry(gold_tag.to_string())
                                .or_default()
                                .observed += 1;
                            report
                                .labels
                                .entry(pred_tag.to_string())
                                .or_default()
                                .predicted += 1;
                            if gold_tag == pred_tag {
                                report.total_correct += 1;
                                report
                                    .labels
                                    .entry(gold_tag.to_string())
                                    .or_default()
                                    .correct += 1;
                            }
                        }
                        _ => return Err(TaggerError::Misaligned { line_no }),
                    }
                }
                _ => return Err(TaggerError::Misaligned { line_no }),
            }
        }

        for measure in report.labels.values_mut() {
            measure.finalize();
        }
        Ok(report)
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<12} {:>9} {:>9} {:>9} {:>20}",
            "tag", "precisão", "revocação", "F1", "corretos/prev/ouro"
        )?;
        for (tag, m) in &self.labels {
            writeln!(
                f,
                "{:<12} {:>9.3} {:>9.3} {:>9.3} {:>20}",
                tag,
                m.precision,
                m.recall,
                m.f1,
                format!("{}/{}/{}", m.correct, m.predicted, m.observed)
            )?;
        }
        write!(
            f,
            "acurácia: {:.3} ({}/{})",
            self.accuracy(),
            self.total_correct,
            self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_per_label_measures() {
        let gold = "a I-GENE\nb O\n\nc I-GENE\nd O\n";
        let pred = "a I-GENE\nb I-GENE\n\nc O\nd O\n";
        let report = Evaluation::evaluate(gold.as_bytes(), pred.as_bytes()).unwrap();

        assert_eq!(report.total, 4);
        assert_eq!(report.total_correct, 2);
        assert_eq!(report.accuracy(), 0.5);

        let gene = &report.labels["I-GENE"];
        assert_eq!(gene.observed, 2);
        assert_eq!(gene.predicted, 2);
        assert_eq!(gene.correct, 1);
        assert_eq!(gene.precision, 0.5);
        assert_eq!(gene.recall, 0.5);
        assert_eq!(gene.f1, 0.5);
    }

    #[test]
    fn test_evaluate_rejects_misaligned_blank_lines() {
        let gold = "a I-GENE\n\nb O\n";
        let pred = "a I-GENE\nb O\n\n";
        let err = Evaluation::evaluate(gold.as_bytes(), pred.as_bytes()).unwrap_err();
        assert!(matches!(err, TaggerError::Misaligned { line_no: 2 }));
    }

    #[test]
    fn test_evaluate_rejects_different_lengths() {
        let gold = "a I-GENE\nb O\n";
        let pred = "a I-GENE\n";
        let err = Evaluation::evaluate(gold.as_bytes(), pred.as_bytes()).unwrap_err();
        assert!(matches!(err, TaggerError::Misaligned { line_no: 2 }));
    }

    #[test]
    fn test_tag_never_predicted_has_zero_precision() {
        let gold = "a I-GENE\n";
        let pred = "a O\n";
        let report = Evaluation::evaluate(gold.as_bytes(), pred.as_bytes()).unwrap();
        let gene = &report.labels["I-GENE"];
        assert_eq!(gene.predicted, 0);
        assert_eq!(gene.precision, 0.0);
        assert_eq!(gene.recall, 0.0);
    }
}
