//! # Leitura de Corpus Anotado
//!
//! O corpus de treinamento chega como texto orientado a linhas:
//!
//! ```text
//! comparison O
//! with O
//! alignments O
//!
//! BRCA1 I-GENE
//! ```
//!
//! - O **último** campo de uma linha não vazia é a tag.
//! - Todos os campos anteriores, reunidos por espaços simples, formam o
//!   token (um token pode legitimamente conter espaços).
//! - Uma linha em branco (ou só com espaços) marca a **fronteira** entre
//!   duas sentenças. A fronteira nunca é membro de uma sentença.
//!
//! Dois iteradores compõem a leitura, em estilo pull (um elemento por
//! chamada, encerrando quando o stream subjacente termina):
//!
//! 1. [`CorpusReader`]: linha crua → [`CorpusItem`] (par ou fronteira).
//! 2. [`Sentences`]: pares → sentenças completas ([`Sentence`]).

use std::io::{BufRead, Lines};

use crate::error::TaggerError;

/// Um item produzido pelo leitor de corpus: um par anotado ou uma
/// fronteira de sentença.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusItem {
    /// Linha não vazia: `(token, tag)`.
    Pair { token: String, tag: String },
    /// Linha em branco separando sentenças.
    Boundary,
}

/// Uma sentença: lista ordenada de pares `(token, tag)`.
pub type Sentence = Vec<(String, String)>;

/// Iterador preguiçoso de [`CorpusItem`] sobre um stream de linhas.
///
/// Reiniciável apenas reabrindo o stream subjacente; o iterador em si é
/// de passada única.
pub struct CorpusReader<R> {
    lines: Lines<R>,
}

impl<R: BufRead> CorpusReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> Iterator for CorpusReader<R> {
    type Item = Result<CorpusItem, TaggerError>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = match self.lines.next()? {
            Ok(line) => line,
            Err(e) => return Some(Err(e.into())),
        };
        if line.trim().is_empty() {
            return Some(Ok(CorpusItem::Boundary));
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        // fields nunca é vazio aqui: a linha tem ao menos um campo
        let (token_fields, tag) = fields.split_at(fields.len() - 1);
        Some(Ok(CorpusItem::Pair {
            token: token_fields.join(" "),
            tag: tag[0].to_string(),
        }))
    }
}

/// Agrupa o stream de [`CorpusItem`] em sentenças.
///
/// Acumula pares em um buffer; ao encontrar uma fronteira com o buffer
/// não vazio, emite a sentença. Uma fronteira com o buffer **vazio**
/// (linha em branco inicial ou duas consecutivas) é entrada malformada e
/// interrompe a iteração com [`TaggerError::EmptySentence`]. Se o stream
/// termina com pares ainda no buffer, eles são emitidos como a última
/// sentença: o corpus não precisa terminar com linha em branco.
pub struct Sentences<I> {
    items: I,
    buffer: Sentence,
    /// Número da linha corrente (cada item consome exatamente uma linha).
    line_no: usize,
    done: bool,
}

impl<I> Sentences<I>
where
    I: Iterator<Item = Result<CorpusItem, TaggerError>>,
{
    pub fn new(items: I) -> Self {
        Self {
            items,
            buffer: Vec::new(),
            line_no: 0,
            done: false,
        }
    }
}

impl<I> Iterator for Sentences<I>
where
    I: Iterator<Item = Result<CorpusItem, TaggerError>>,
{
    type Item = Result<Sentence, TaggerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.items.next() {
                Some(Ok(CorpusItem::Pair { token, tag })) => {
                    self.line_no += 1;
                    self.buffer.push((token, tag));
                }
                Some(Ok(CorpusItem::Boundary)) => {
                    self.line_no += 1;
                    if self.buffer.is_empty() {
                        self.done = true;
                        return Some(Err(TaggerError::EmptySentence {
                            line_no: self.line_no,
                        }));
                    }
                    return Some(Ok(std::mem::take(&mut self.buffer)));
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    if self.buffer.is_empty() {
                        return None;
                    }
                    return Some(Ok(std::mem::take(&mut self.buffer)));
                }
            }
        }
    }
}

/// Conveniência: sentenças diretamente de um stream de linhas.
pub fn sentences<R: BufRead>(reader: R) -> Sentences<CorpusReader<R>> {
    Sentences::new(CorpusReader::new(reader))
}
