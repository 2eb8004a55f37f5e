//! # Erros do Etiquetador
//!
//! Todas as falhas possíveis do pipeline são representadas por um único
//! enum [`TaggerError`], dividido em três famílias:
//!
//! - **Recurso**: arquivo que não pôde ser aberto, lido ou escrito.
//! - **Formato de entrada**: linha de contagens malformada ou sentença
//!   vazia delimitada por duas fronteiras consecutivas.
//! - **Modelo inconsistente**: uma tag sem contagem de 1-grama no momento
//!   em que uma probabilidade de emissão é solicitada.
//!
//! Nenhuma falha é mascarada como `0.0`, `NaN` ou infinito. O chamador
//! decide se aborta a execução (é o que o binário faz).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Erro de qualquer estágio do pipeline de etiquetagem.
#[derive(Debug, Error)]
pub enum TaggerError {
    /// Falha ao abrir ou criar um arquivo, com o caminho ofensor.
    #[error("falha de E/S em {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Falha de leitura/escrita no meio de um stream já aberto.
    #[error("falha de E/S durante o processamento do stream: {0}")]
    Stream(#[from] io::Error),

    /// Linha do arquivo de contagens que não segue o formato
    /// `<contagem> WORDTAG <tag> <token>` nem `<contagem> <k>-GRAM <tags...>`.
    #[error("linha {line_no} do arquivo de contagens é inválida: {line:?}")]
    CountLine { line_no: usize, line: String },

    /// Fronteira de sentença encontrada com o buffer vazio: ou o corpus
    /// começa com linha em branco, ou há duas linhas em branco seguidas.
    #[error("sentença vazia no corpus (linha {line_no}): fronteira sem tokens acumulados")]
    EmptySentence { line_no: usize },

    /// A tag aparece em contagens de emissão mas nunca ocorreu sozinha no
    /// treinamento (1-grama ausente ou zero). Divisão impossível.
    #[error("tag {tag:?} sem contagem de 1-grama no modelo; arquivo de contagens inconsistente")]
    MissingUnigram { tag: String },

    /// Arquivo de contagens sem nenhuma tag conhecida.
    #[error("modelo vazio: nenhuma tag foi carregada do arquivo de contagens")]
    EmptyModel,

    /// Arquivos ouro e predito com estrutura de linhas divergente.
    #[error("linha {line_no}: arquivos ouro e predito estão desalinhados")]
    Misaligned { line_no: usize },
}

impl TaggerError {
    /// Anexa o caminho ofensor a um erro de E/S.
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TaggerError::Io {
            path: path.into(),
            source,
        }
    }
}
