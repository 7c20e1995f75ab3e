use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use crate::chat::{CompletionClient, RagEngine};
use crate::config::{get_config_dir, Config};
use crate::database::lancedb::KnowledgeStore;
use crate::database::sqlite::models::PortfolioSeed;
use crate::database::sqlite::Database;
use crate::embeddings::EmbeddingClient;
use crate::ingest::IngestPipeline;
use crate::server;
use crate::Result;

fn load_config() -> Result<Config> {
    let config_dir = get_config_dir().map_err(|e| crate::UrsaError::Config(e.to_string()))?;
    Ok(Config::load(config_dir)?)
}

async fn open_database(config: &Config) -> Result<Database> {
    Ok(Database::new(config.database_path())
        .await
        .context("Failed to initialize database")?)
}

async fn build_engine(config: Config) -> Result<RagEngine> {
    let database = open_database(&config).await?;
    let store = KnowledgeStore::new(&config, database).await?;
    let embeddings = EmbeddingClient::new(&config.openai)?;
    let completions = CompletionClient::new(&config.openai)?;

    Ok(RagEngine::new(embeddings, completions, store, config))
}

/// Print the active configuration
#[inline]
pub fn show_config() -> Result<()> {
    let config = load_config()?;

    println!("Configuration ({})", config.config_file_path().display());
    println!();
    println!("[openai]");
    println!("  API base: {}", config.openai.api_base);
    println!("  API key env var: {}", config.openai.api_key_env);
    println!("  Embedding model: {}", config.openai.embedding_model);
    println!("  Chat model: {}", config.openai.chat_model);
    println!(
        "  Embedding dimension: {}",
        config.openai.embedding_dimension
    );
    println!();
    println!("[retrieval]");
    println!(
        "  Similarity threshold: {}",
        config.retrieval.similarity_threshold
    );
    println!("  Top K: {}", config.retrieval.top_k);
    println!("  History window: {}", config.retrieval.history_window);
    println!("  Ingest delay: {}ms", config.retrieval.ingest_delay_ms);
    println!();
    println!("[server]");
    println!("  Address: {}:{}", config.server.host, config.server.port);
    println!();
    println!("[profile]");
    println!("  Owner: {}", config.profile.owner_name);
    println!("  Assistant: {}", config.profile.assistant_name);
    println!("  Achievements: {}", config.profile.achievements.len());

    Ok(())
}

/// Write a default config file for hand editing, unless one already exists
#[inline]
pub fn init_config() -> Result<()> {
    let config_dir = get_config_dir().map_err(|e| crate::UrsaError::Config(e.to_string()))?;
    let config = Config::load(&config_dir)?;

    if config.config_file_path().exists() {
        println!(
            "Config file already exists: {}",
            config.config_file_path().display()
        );
        return Ok(());
    }

    config.save()?;
    println!("Created config file: {}", config.config_file_path().display());
    println!("Edit it to set your profile, then run 'ursa ingest'.");

    Ok(())
}

/// Import portfolio records from a JSON snapshot file
#[inline]
pub async fn import_records(file: &str) -> Result<()> {
    let config = load_config()?;
    let database = open_database(&config).await?;

    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read import file: {file}"))?;
    let seed: PortfolioSeed = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse import file: {file}"))?;

    let count = database.import_seed(&seed).await?;

    println!("Imported {} records from {}", count, file);
    println!("Run 'ursa ingest' to rebuild the knowledge base.");

    Ok(())
}

/// Rebuild the knowledge base from the current source records
#[inline]
pub async fn run_ingest() -> Result<()> {
    let config = load_config()?;
    let database = open_database(&config).await?;
    let store = KnowledgeStore::new(&config, database.clone()).await?;
    let embeddings = EmbeddingClient::new(&config.openai)?;

    let pipeline = IngestPipeline::new(embeddings, store, database, config);
    let report = pipeline.run(true).await?;

    println!("Ingestion complete!");
    println!("  Chunks processed: {}", report.processed);
    println!("  Embedded and stored: {}", report.succeeded);
    if report.failed > 0 {
        println!("  Failed (skipped): {}", report.failed);
    }

    Ok(())
}

/// Answer a single question from the command line
#[inline]
pub async fn ask(question: &str) -> Result<()> {
    let config = load_config()?;
    let engine = build_engine(config).await?;

    let answer = engine.answer(question, &[]).await?;

    println!("{}", answer.text);

    if !answer.sources.is_empty() {
        println!();
        println!("Sources:");
        for source in &answer.sources {
            let title = source
                .chunk
                .metadata
                .title
                .as_deref()
                .unwrap_or(source.chunk.metadata.kind.as_str());
            println!(
                "  - {} ({}, similarity {:.2})",
                title, source.chunk.metadata.kind, source.similarity
            );
        }
    }

    Ok(())
}

/// Start the HTTP API server
#[inline]
pub async fn run_server(port: Option<u16>) -> Result<()> {
    let mut config = load_config()?;
    if let Some(port) = port {
        config.server.port = port;
    }

    let server_config = config.server.clone();
    let engine = build_engine(config).await?;

    info!("Starting chat API server");
    server::serve(Arc::new(engine), &server_config).await
}

/// Show connectivity and knowledge base status
#[inline]
pub async fn show_status() -> Result<()> {
    let config = load_config()?;

    println!("📊 Ursa Status Report");
    println!("{}", "=".repeat(50));
    println!();

    println!("🗄️  Database Status:");
    let database = match Database::new(config.database_path()).await {
        Ok(db) => {
            println!("   ✅ SQLite: Connected");
            Some(db)
        }
        Err(e) => {
            println!("   ❌ SQLite: Failed to connect - {}", e);
            None
        }
    };

    println!();
    println!("🤖 Embedding Service:");
    match EmbeddingClient::new(&config.openai) {
        Ok(client) => match client.ping() {
            Ok(()) => {
                println!("   ✅ Reachable: {}", config.openai.api_base);
                println!("   📋 Embedding model: {}", config.openai.embedding_model);
                println!("   📋 Chat model: {}", config.openai.chat_model);
            }
            Err(e) => {
                println!("   ⚠️  Unreachable - {}", e);
            }
        },
        Err(e) => {
            println!("   ❌ Client error - {}", e);
        }
    }

    println!();
    println!("📚 Knowledge Base:");
    if let Some(database) = database {
        match database.current_generation().await {
            Ok(Some(generation)) => {
                println!("   Generation: {}", generation);
                match KnowledgeStore::new(&config, database).await {
                    Ok(store) => {
                        match store.count_chunks().await {
                            Ok(count) => println!("   Chunks: {}", count),
                            Err(e) => println!("   Chunks: Error - {}", e),
                        }
                        match store.count_chunks_by_kind().await {
                            Ok(counts) => {
                                for (kind, count) in counts {
                                    println!("     {} x{}", kind, count);
                                }
                            }
                            Err(e) => println!("   Per-kind counts: Error - {}", e),
                        }
                    }
                    Err(e) => println!("   Vector store: Error - {}", e),
                }
            }
            Ok(None) => {
                println!("   Not ingested yet. Run 'ursa ingest' to build it.");
            }
            Err(e) => {
                println!("   ❌ Error reading state - {}", e);
            }
        }
    } else {
        println!("   Unavailable (database connection failed)");
    }

    Ok(())
}
