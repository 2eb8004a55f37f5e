//! # Estimador de Emissão e Decisão por Token
//!
//! Deriva probabilidades de emissão das contagens recarregadas:
//!
//! ```text
//! P(token | tag) = Contagem(token, tag) / Contagem1grama(tag)
//! ```
//!
//! Tokens que não sobreviveram ao colapso de raridade no treinamento são
//! avaliados pela identidade reservada `_RARE_`. A decisão por token é o
//! argmax dessa probabilidade sobre o conjunto de tags conhecidas.
//!
//! As tabelas de 2- e 3-gramas carregadas junto com as contagens **não**
//! são consultadas aqui: a decisão é independente por token, sem busca
//! conjunta sobre a sequência de tags. É uma limitação deliberada do
//! desenho, não um descuido.

use std::collections::HashSet;

use crate::counts::CountStore;
use crate::error::TaggerError;
use crate::vocab::RARE_TOKEN;

/// Modelo de emissão montado sobre um [`CountStore`] recarregado.
///
/// O conjunto de palavras conhecidas é derivado das chaves da tabela de
/// emissões: depois da reescrita com `_RARE_`, essas são exatamente as
/// palavras cuja frequência de treinamento atingiu o limiar.
pub struct EmissionModel {
    counts: CountStore,
    known_words: HashSet<String>,
}

impl EmissionModel {
    pub fn new(counts: CountStore) -> Self {
        let known_words = counts
            .emissions()
            .map(|(key, _)| key.word.clone())
            .collect();
        Self {
            counts,
            known_words,
        }
    }

    /// O token possui contagens de emissão próprias?
    pub fn is_known(&self, word: &str) -> bool {
        self.known_words.contains(word)
    }

    /// Probabilidade de emissão `P(word | tag)`.
    ///
    /// Palavras desconhecidas caem na identidade `_RARE_`. Uma tag sem
    /// contagem de 1-grama torna a divisão impossível e devolve
    /// [`TaggerError::MissingUnigram`]: isso indica um arquivo de
    /// contagens internamente inconsistente, nunca é mascarado como 0.
    pub fn emission_probability(&self, word: &str, tag: &str) -> Result<f64, TaggerError> {
        let denominator = self.counts.unigram_count(tag);
        if denominator <= 0.0 {
            return Err(TaggerError::MissingUnigram {
                tag: tag.to_string(),
            });
        }
        let lookup = if self.is_known(word) { word } else { RARE_TOKEN };
        Ok(self.counts.emission_count(lookup, tag) / denominator)
    }

    /// A tag que maximiza a probabilidade de emissão do token.
    ///
    /// As tags são enumeradas em ordem lexicográfica fixa; empates ficam
    /// com a primeira tag verificada (comparação estrita `>`), o que
    /// torna o desempate determinístico entre execuções.
    pub fn best_tag(&self, word: &str) -> Result<&str, TaggerError> {
        let mut best: Option<(&str, f64)> = None;
        for tag in self.counts.all_tags() {
            let p = self.emission_probability(word, tag)?;
            match best {
                Some((_, best_p)) if p <= best_p => {}
                _ => best = Some((tag, p)),
            }
        }
        best.map(|(tag, _)| tag).ok_or(TaggerError::EmptyModel)
    }

    /// Acesso somente leitura às contagens subjacentes.
    pub fn counts(&self) -> &CountStore {
        &self.counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(counts_file: &str) -> EmissionModel {
        EmissionModel::new(CountStore::read_counts(counts_file.as_bytes()).unwrap())
    }

    #[test]
    fn test_emission_probability_from_reloaded_counts() {
        let m = model("5 WORDTAG I-GENE cat\n5 1-GRAM I-GENE\n");
        assert_eq!(m.emission_probability("cat", "I-GENE").unwrap(), 1.0);
    }

    #[test]
    fn test_unknown_word_falls_back_to_rare() {
        let m = model(
            "4 WORDTAG O _RARE_\n8 1-GRAM O\n2 WORDTAG I-GENE _RARE_\n4 1-GRAM I-GENE\n",
        );
        assert!(!m.is_known("zzz"));
        assert_eq!(m.emission_probability("zzz", "O").unwrap(), 0.5);
        assert_eq!(m.emission_probability("zzz", "I-GENE").unwrap(), 0.5);
    }

    #[test]
    fn test_missing_unigram_is_an_error() {
        // I-GENE emite mas nunca ocorreu como 1-grama: modelo inconsistente
        let m = model("5 WORDTAG I-GENE cat\n");
        let err = m.emission_probability("cat", "I-GENE").unwrap_err();
        assert!(matches!(err, TaggerError::MissingUnigram { tag } if tag == "I-GENE"));
    }

    #[test]
    fn test_best_tag_prefers_higher_emission() {
        let m = model(
            "3 WORDTAG I-GENE sent\n6 1-GRAM I-GENE\n1 WORDTAG O sent\n6 1-GRAM O\n",
        );
        assert_eq!(m.best_tag("sent").unwrap(), "I-GENE");
    }

    #[test]
    fn test_best_tag_tie_goes_to_first_enumerated() {
        // probabilidades idênticas: vence a primeira tag na ordem fixa
        let m = model(
            "2 WORDTAG I-GENE cat\n4 1-GRAM I-GENE\n2 WORDTAG O cat\n4 1-GRAM O\n",
        );
        assert_eq!(m.best_tag("cat").unwrap(), "I-GENE");
    }

    #[test]
    fn test_empty_model_is_an_error() {
        let m = model("");
        assert!(matches!(m.best_tag("cat"), Err(TaggerError::EmptyModel)));
    }
}
