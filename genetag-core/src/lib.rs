//! # genetag-core — Etiquetador Estatístico de Sequências
//!
//! Este crate implementa um etiquetador por token treinado a partir de um
//! corpus anotado: cada token de um texto recebe um rótulo categórico
//! (no domínio de exemplo, `I-GENE` para tokens de nomes de genes e `O`
//! para o resto). O conjunto de tags é descoberto no corpus, nunca fixado
//! em código.
//!
//! ## Arquitetura do Sistema
//!
//! O dado flui por um pipeline linear, transformado passo a passo:
//!
//! 1. **Vocabulário** ([`vocab`]): primeira passada conta a frequência de
//!    cada token do corpus de treinamento.
//! 2. **Reescrita de raros** ([`vocab::rewrite_rare`]): segunda passada
//!    substitui tokens com frequência abaixo de 5 pelo sentinela
//!    `_RARE_`, colapsando a cauda esparsa da distribuição.
//! 3. **Leitura de sentenças** ([`corpus`]): iteradores preguiçosos
//!    transformam linhas em pares `(token, tag)` e pares em sentenças.
//! 4. **Contagens** ([`counts`]): emissões `(token, tag)` e n-gramas de
//!    tags de ordem 1 a 3, serializados em um formato texto plano.
//! 5. **Emissão e decisão** ([`emission`]): `P(token | tag)` derivada das
//!    contagens recarregadas; a tag de cada token é o argmax.
//! 6. **Etiquetagem** ([`tagger`]): aplica a decisão a um stream de
//!    entrada, linha a linha.
//!
//! As contagens de 2- e 3-gramas são coletadas e persistidas, mas o
//! decodificador usa apenas evidência de emissão: não há busca conjunta
//! (Viterbi) sobre a sequência de tags. Essa assimetria é uma propriedade
//! deliberada do desenho.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use genetag_core::{CountStore, EmissionModel};
//!
//! // Um arquivo de contagens mínimo, como o gravado pelo treinamento
//! let counts = "\
//! 5 WORDTAG I-GENE cat
//! 1 WORDTAG O _RARE_
//! 5 1-GRAM I-GENE
//! 3 1-GRAM O
//! ";
//! let store = CountStore::read_counts(counts.as_bytes()).unwrap();
//! let model = EmissionModel::new(store);
//!
//! // "cat" foi frequente no treinamento; "dachshund" cai em _RARE_
//! assert_eq!(model.best_tag("cat").unwrap(), "I-GENE");
//! assert_eq!(model.best_tag("dachshund").unwrap(), "O");
//! ```
//!
//! ## Módulos Principais
//!
//! - [`pipeline`]: orquestrador que conecta todos os estágios sobre arquivos.
//! - [`counts`]: o armazém de contagens e seu formato de serialização.
//! - [`evaluation`]: precisão/revocação/F1 contra um padrão-ouro.

pub mod corpus;
pub mod counts;
pub mod emission;
pub mod error;
pub mod evaluation;
pub mod pipeline;
pub mod tagger;
pub mod vocab;

pub use corpus::{sentences, CorpusItem, CorpusReader, Sentence, Sentences};
pub use counts::{CountStore, WordTag, NGRAM_ORDER, START_TAG, STOP_TAG};
pub use emission::EmissionModel;
pub use error::TaggerError;
pub use evaluation::Evaluation;
pub use pipeline::{build_counts, load_model, tag_file, CountSummary};
pub use tagger::{tag_stream, TagSummary};
pub use vocab::{rewrite_rare, Vocabulary, RARE_THRESHOLD, RARE_TOKEN};
