//! Interface de linha de comando do etiquetador.
//!
//! Toda a lógica vive em `genetag-core`; aqui ficam apenas o parsing de
//! argumentos, a abertura de arquivos e o mapeamento de erros para
//! códigos de saída: uso incorreto sai com 2 (via clap), qualquer falha
//! de execução (E/S, formato, modelo inconsistente) sai com 1.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use genetag_core::{
    build_counts, load_model, tag_file, tag_stream, Evaluation, TaggerError,
};

#[derive(Debug, Parser)]
#[command(name = "genetag", version, about = "Etiquetador estatístico de sequências (genes/NER)")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Constrói o arquivo de contagens a partir de um corpus anotado
    Count {
        /// Corpus de treinamento (um token e uma tag por linha)
        corpus: PathBuf,
        /// Saída com o corpus reescrito (tokens raros viram _RARE_)
        #[arg(long, default_value = "gene.train.rare")]
        rewritten: PathBuf,
        /// Saída com as contagens serializadas
        #[arg(long, default_value = "gene.counts")]
        counts: PathBuf,
    },
    /// Etiqueta um arquivo de entrada usando contagens já gravadas
    Tag {
        /// Arquivo de contagens gerado por `count`
        counts: PathBuf,
        /// Entrada a etiquetar (um token por linha)
        input: PathBuf,
        /// Saída etiquetada ("-" escreve em stdout)
        #[arg(short, long, default_value = "gene.out")]
        output: PathBuf,
    },
    /// Compara um arquivo predito com o padrão-ouro
    Eval {
        /// Arquivo com as tags corretas
        gold: PathBuf,
        /// Arquivo etiquetado pelo modelo
        predicted: PathBuf,
        /// Emite o relatório em JSON
        #[arg(long)]
        json: bool,
    },
}

fn open(path: &Path) -> Result<BufReader<File>, TaggerError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| TaggerError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn run(cli: Cli) -> Result<(), TaggerError> {
    match cli.command {
        Command::Count {
            corpus,
            rewritten,
            counts,
        } => {
            let summary = build_counts(&corpus, &rewritten, &counts)?;
            println!(
                "{} sentenças, {} tokens; vocabulário de {} tipos ({} raros)",
                summary.sentences, summary.tokens, summary.vocabulary, summary.rare_types
            );
        }
        Command::Tag {
            counts,
            input,
            output,
        } => {
            let summary = if output.as_os_str() == "-" {
                let model = load_model(&counts)?;
                tag_stream(&model, open(&input)?, io::stdout().lock())?
            } else {
                tag_file(&counts, &input, &output)?
            };
            eprintln!(
                "{} tokens etiquetados, {} linhas em branco preservadas",
                summary.tokens, summary.blank_lines
            );
        }
        Command::Eval {
            gold,
            predicted,
            json,
        } => {
            let report = Evaluation::evaluate(open(&gold)?, open(&predicted)?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report).unwrap());
            } else {
                println!("{report}");
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("erro: {err}");
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                eprintln!("  causa: {cause}");
                source = cause.source();
            }
            ExitCode::from(1)
        }
    }
}
