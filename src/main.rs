//! # docqa CLI
//!
//! Command-line interface for the docqa question-answering engine.
//!
//! ## Usage
//!
//! ```bash
//! docqa --config ./config/docqa.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `docqa init` | Create the SQLite database and run schema migrations |
//! | `docqa ingest <file>` | Chunk, embed, and store a text document |
//! | `docqa ask "<question>"` | Answer a question from stored chunks |
//! | `docqa get <id>` | Show a document's metadata and chunk count |
//! | `docqa delete <id>` | Delete a document and everything attached to it |
//! | `docqa health` | Check embedding/chat provider reachability |
//!
//! The `OPENAI_API_KEY` environment variable must be set for `ingest`,
//! `ask`, and `health`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use docqa::ask::{ask, AskOutcome, AskRequest};
use docqa::config::{load_config, Config};
use docqa::error::RagError;
use docqa::health::check_health;
use docqa::ingest::{ingest, IngestRequest};
use docqa::provider::OpenAiProvider;
use docqa::store::{SqliteStore, Store};
use docqa::{db, migrate};

/// docqa — a retrieval-augmented question answering engine for text
/// documents.
#[derive(Parser)]
#[command(
    name = "docqa",
    about = "Retrieval-augmented question answering over your documents",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/docqa.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the documents, chunks, and
    /// queries tables. Idempotent.
    Init,

    /// Ingest a text file: chunk, embed, and store it.
    ///
    /// The whole document is persisted atomically — if any embedding
    /// call fails, nothing is stored.
    Ingest {
        /// Path to a plain-text file.
        file: PathBuf,

        /// Document title. Defaults to the file name.
        #[arg(long)]
        title: Option<String>,

        /// Maximum chunk window in bytes. Overrides config.
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Bytes of overlap between consecutive chunks. Overrides config.
        #[arg(long)]
        overlap_size: Option<usize>,
    },

    /// Ask a question against stored documents.
    Ask {
        /// The question to answer.
        question: String,

        /// Restrict the search to one document. Omit to search the
        /// whole corpus.
        #[arg(long)]
        document: Option<String>,

        /// Maximum number of chunks to retrieve. Overrides config.
        #[arg(long)]
        top_k: Option<usize>,

        /// Minimum cosine similarity for a chunk to count as relevant,
        /// in [0, 1]. Overrides config.
        #[arg(long)]
        min_score: Option<f32>,
    },

    /// Show a document's metadata and chunk count.
    Get {
        /// Document UUID.
        id: String,
    },

    /// Delete a document, its chunks, and its query log rows.
    Delete {
        /// Document UUID.
        id: String,
    },

    /// Check reachability of the embedding and chat providers.
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            let pool = db::connect(&config).await?;
            migrate::run_migrations(&pool).await?;
            pool.close().await;
            println!("Database initialized successfully.");
        }
        Commands::Ingest {
            file,
            title,
            chunk_size,
            overlap_size,
        } => {
            run_ingest(&config, file, title, chunk_size, overlap_size).await?;
        }
        Commands::Ask {
            question,
            document,
            top_k,
            min_score,
        } => {
            run_ask(&config, question, document, top_k, min_score).await?;
        }
        Commands::Get { id } => {
            run_get(&config, &id).await?;
        }
        Commands::Delete { id } => {
            let store = open_store(&config).await?;
            store.delete_document(&id).await?;
            store.close().await;
            println!("Deleted document {}", id);
        }
        Commands::Health => {
            let provider = OpenAiProvider::new(&config.provider)?;
            let status = check_health(&provider).await;
            println!("success: {}", status.success);
            println!("embedding provider: {:?}", status.embedding_provider);
            println!("chat provider: {:?}", status.chat_provider);
            println!("message: {}", status.message);
            if !status.success {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn open_store(config: &Config) -> Result<SqliteStore> {
    let pool = db::connect(config).await?;
    migrate::run_migrations(&pool).await?;
    Ok(SqliteStore::new(pool))
}

async fn run_ingest(
    config: &Config,
    file: PathBuf,
    title: Option<String>,
    chunk_size: Option<usize>,
    overlap_size: Option<usize>,
) -> Result<()> {
    let content = std::fs::read_to_string(&file)?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "document".to_string());

    let store = open_store(config).await?;
    let provider = OpenAiProvider::new(&config.provider)?;

    let request = IngestRequest {
        title: title.unwrap_or_else(|| file_name.clone()),
        content,
        chunk_size: chunk_size.unwrap_or(config.chunking.chunk_size),
        overlap_size: overlap_size.unwrap_or(config.chunking.overlap_size),
        original_filename: Some(file_name),
    };

    let doc = ingest(&store, &provider, config.provider.dims, request).await?;
    let chunk_count = store.chunk_count(Some(&doc.id)).await?;
    store.close().await;

    println!("ingested \"{}\"", doc.title);
    println!("  id: {}", doc.id);
    println!("  bytes: {}", doc.byte_length);
    println!("  chunks: {}", chunk_count);
    Ok(())
}

async fn run_ask(
    config: &Config,
    question: String,
    document: Option<String>,
    top_k: Option<usize>,
    min_score: Option<f32>,
) -> Result<()> {
    let store = open_store(config).await?;
    let provider = OpenAiProvider::new(&config.provider)?;

    let request = AskRequest {
        question,
        document_id: document,
        top_k: top_k.unwrap_or(config.retrieval.top_k),
        min_score: min_score.unwrap_or(config.retrieval.min_score),
    };

    let outcome = ask(&store, &provider, config.provider.dims, request).await;
    store.close().await;

    match outcome {
        Ok(AskOutcome::Answered {
            answer,
            sources,
            latency_ms,
            ..
        }) => {
            println!("{}", answer);
            println!();
            println!("sources ({} ms):", latency_ms);
            for source in &sources {
                println!(
                    "  [{}] {:.2}% — {}",
                    source.rank,
                    source.score_percentage,
                    source.preview.replace('\n', " ")
                );
            }
        }
        Ok(AskOutcome::NoRelevantChunks) => {
            println!("No relevant chunks found for your question.");
        }
        Err(RagError::NoChunksAvailable) => {
            println!("No chunks available for searching. Ingest a document first.");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

async fn run_get(config: &Config, id: &str) -> Result<()> {
    let store = open_store(config).await?;
    let doc = store.get_document(id).await?;
    match doc {
        Some(doc) => {
            let chunk_count = store.chunk_count(Some(&doc.id)).await?;
            let created = chrono::DateTime::from_timestamp(doc.created_at, 0)
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default();

            println!("{}", doc.title);
            println!("  id: {}", doc.id);
            println!("  bytes: {}", doc.byte_length);
            if let Some(name) = &doc.original_filename {
                println!("  file: {}", name);
            }
            println!("  created: {}", created);
            println!("  chunks: {}", chunk_count);
        }
        None => {
            println!("Document not found: {}", id);
            store.close().await;
            std::process::exit(1);
        }
    }
    store.close().await;
    Ok(())
}
