//! # Pipeline — Orquestrador dos Estágios
//!
//! Conecta os módulos na ordem do fluxo de dados:
//!
//! 1. Corpus de treinamento → [`Vocabulary`] (primeira passada).
//! 2. Releitura do corpus → reescrita dos tokens raros (`_RARE_`).
//! 3. Corpus reescrito → [`CountStore`] via leitor de sentenças.
//! 4. Contagens serializadas em disco.
//! 5. (execução separada) Contagens recarregadas → [`EmissionModel`] →
//!    etiquetagem da entrada.
//!
//! Cada execução constrói suas próprias instâncias; nenhum estado
//! sobrevive entre chamadas. Todos os arquivos são abertos em escopos
//! que garantem o fechamento em qualquer caminho de saída, inclusive
//! quando um erro de formato interrompe o processamento no meio do
//! stream. Falhas não são reprocessadas: a saída já gravada fica em
//! disco como está.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::corpus::sentences;
use crate::counts::CountStore;
use crate::emission::EmissionModel;
use crate::error::TaggerError;
use crate::tagger::{tag_stream, TagSummary};
use crate::vocab::{rewrite_rare, Vocabulary};

/// Resumo da construção do arquivo de contagens.
#[derive(Debug, Default, Clone, Serialize)]
pub struct CountSummary {
    /// Sentenças acumuladas.
    pub sentences: usize,
    /// Tokens acumulados (pós-reescrita).
    pub tokens: usize,
    /// Tipos distintos no vocabulário original.
    pub vocabulary: usize,
    /// Tipos abaixo do limiar de raridade.
    pub rare_types: usize,
}

fn open(path: &Path) -> Result<BufReader<File>, TaggerError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| TaggerError::io(path, e))
}

fn create(path: &Path) -> Result<BufWriter<File>, TaggerError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| TaggerError::io(path, e))
}

/// Constrói o arquivo de contagens a partir de um corpus anotado.
///
/// Algoritmo de duas passadas sobre o mesmo corpus: a primeira conta as
/// frequências, a segunda reescreve os tokens raros usando o vocabulário
/// completo. As contagens são então acumuladas sobre o corpus reescrito
/// e gravadas em `counts_path`.
pub fn build_counts(
    corpus_path: &Path,
    rewritten_path: &Path,
    counts_path: &Path,
) -> Result<CountSummary, TaggerError> {
    let mut vocab = Vocabulary::new();
    vocab.observe(open(corpus_path)?)?;
    debug!(
        types = vocab.len(),
        rare = vocab.rare_types(),
        "vocabulário construído"
    );

    {
        let mut output = create(rewritten_path)?;
        rewrite_rare(&vocab, open(corpus_path)?, &mut output)?;
        output
            .flush()
            .map_err(|e| TaggerError::io(rewritten_path, e))?;
    }
    info!(path = %rewritten_path.display(), "corpus reescrito com _RARE_");

    let mut store = CountStore::new();
    let mut summary = CountSummary {
        vocabulary: vocab.len(),
        rare_types: vocab.rare_types(),
        ..CountSummary::default()
    };
    for sentence in sentences(open(rewritten_path)?) {
        let sentence = sentence?;
        summary.sentences += 1;
        summary.tokens += sentence.len();
        store.accumulate(&sentence);
    }

    {
        let mut output = create(counts_path)?;
        store.write_counts(&mut output)?;
        output.flush().map_err(|e| TaggerError::io(counts_path, e))?;
    }
    info!(
        path = %counts_path.display(),
        sentences = summary.sentences,
        tokens = summary.tokens,
        "contagens gravadas"
    );
    Ok(summary)
}

/// Recarrega um arquivo de contagens e monta o modelo de emissão.
pub fn load_model(counts_path: &Path) -> Result<EmissionModel, TaggerError> {
    let store = CountStore::read_counts(open(counts_path)?)?;
    debug!(path = %counts_path.display(), "contagens recarregadas");
    Ok(EmissionModel::new(store))
}

/// Etiqueta um arquivo de entrada usando um arquivo de contagens.
pub fn tag_file(
    counts_path: &Path,
    input_path: &Path,
    output_path: &Path,
) -> Result<TagSummary, TaggerError> {
    let model = load_model(counts_path)?;
    let mut output = create(output_path)?;
    let summary = tag_stream(&model, open(input_path)?, &mut output)?;
    info!(
        path = %output_path.display(),
        tokens = summary.tokens,
        "etiquetagem concluída"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    struct TempFiles {
        dir: PathBuf,
    }

    impl TempFiles {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "genetag-{}-{}",
                name,
                std::process::id()
            ));
            fs::create_dir_all(&dir).unwrap();
            Self { dir }
        }

        fn path(&self, name: &str) -> PathBuf {
            self.dir.join(name)
        }
    }

    impl Drop for TempFiles {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.dir);
        }
    }

    #[test]
    fn test_build_counts_then_tag() {
        let tmp = TempFiles::new("pipeline");
        let corpus = tmp.path("gene.train");
        let rewritten = tmp.path("gene.train.rare");
        let counts = tmp.path("gene.counts");

        // 5 sentenças com os mesmos tokens frequentes e um token raro
        let mut text = String::new();
        for _ in 0..5 {
            text.push_str("BRCA1 I-GENE\nprotein O\n\n");
        }
        text.push_str("obscure O\n\n");
        fs::write(&corpus, &text).unwrap();

        let summary = build_counts(&corpus, &rewritten, &counts).unwrap();
        assert_eq!(summary.sentences, 6);
        assert_eq!(summary.tokens, 11);
        assert_eq!(summary.vocabulary, 3);
        assert_eq!(summary.rare_types, 1);

        // o corpus reescrito só substitui o token raro
        let rare_text = fs::read_to_string(&rewritten).unwrap();
        assert!(rare_text.contains("_RARE_ O\n"));
        assert!(rare_text.contains("BRCA1 I-GENE\n"));
        assert!(!rare_text.contains("obscure"));

        let model = load_model(&counts).unwrap();
        assert_eq!(model.emission_probability("BRCA1", "I-GENE").unwrap(), 1.0);

        let input = tmp.path("gene.dev");
        let output = tmp.path("gene.out");
        fs::write(&input, "BRCA1\n\nnever-seen\n").unwrap();
        let tag_summary = tag_file(&counts, &input, &output).unwrap();
        assert_eq!(tag_summary.tokens, 2);

        let tagged = fs::read_to_string(&output).unwrap();
        // palavra desconhecida cai em _RARE_, que só foi emitida sob O
        assert_eq!(tagged, "BRCA1 I-GENE\n\nnever-seen O\n");
    }

    #[test]
    fn test_build_counts_fails_on_double_blank_line() {
        let tmp = TempFiles::new("malformed");
        let corpus = tmp.path("bad.train");
        fs::write(&corpus, "BRCA1 I-GENE\n\n\nprotein O\n").unwrap();

        let err = build_counts(
            &corpus,
            &tmp.path("bad.rare"),
            &tmp.path("bad.counts"),
        )
        .unwrap_err();
        assert!(matches!(err, TaggerError::EmptySentence { .. }));
        // a reescrita já havia sido gravada e permanece em disco
        assert!(tmp.path("bad.rare").exists());
    }

    #[test]
    fn test_missing_corpus_reports_path() {
        let tmp = TempFiles::new("missing");
        let err = build_counts(
            &tmp.path("nao-existe"),
            &tmp.path("x.rare"),
            &tmp.path("x.counts"),
        )
        .unwrap_err();
        match err {
            TaggerError::Io { path, .. } => assert!(path.ends_with("nao-existe")),
            other => panic!("esperava erro de E/S, obteve {other:?}"),
        }
    }
}
