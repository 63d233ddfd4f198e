// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use semantic_store::{
    ChatClient, Config, RetrievalChain, SearchKind, SchemaManager, ScoredDocument, Validator,
    VectorStore, provider_from_config,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "semantic_store")]
#[command(version = "0.1.0")]
#[command(about = "Embedded vector store with semantic and hybrid retrieval", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed and store texts, from arguments or a file (one text per line)
    Add {
        texts: Vec<String>,

        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,

        #[arg(long)]
        title: Option<String>,

        /// Metadata entries as key=value, applied to every added text
        #[arg(long = "meta", value_name = "KEY=VALUE")]
        meta: Vec<String>,
    },

    /// Search for documents by vector similarity
    Search {
        query: String,

        #[arg(short = 'k', long, default_value_t = 5)]
        limit: usize,
    },

    /// Search with vector recall fused with lexical ranking
    Hybrid {
        query: String,

        #[arg(short = 'k', long, default_value_t = 5)]
        limit: usize,
    },

    /// Answer a question from stored documents via a chat model
    Ask {
        question: String,

        #[arg(short = 'k', long, default_value_t = 4)]
        limit: usize,

        #[arg(long, action = ArgAction::SetTrue)]
        hybrid: bool,
    },

    Stats,

    Verify,

    Reset {
        #[arg(long)]
        confirm: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    semantic_store::utils::logging::init_logger(cli.color, cli.verbose);

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using defaults with environment overrides",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Add {
            texts,
            file,
            title,
            meta,
        } => {
            cmd_add(&config, texts, file, title, meta).await?;
        }
        Commands::Search { query, limit } => {
            cmd_search(&config, &query, limit).await?;
        }
        Commands::Hybrid { query, limit } => {
            cmd_hybrid(&config, &query, limit).await?;
        }
        Commands::Ask {
            question,
            limit,
            hybrid,
        } => {
            cmd_ask(&config, &question, limit, hybrid).await?;
        }
        Commands::Stats => {
            cmd_stats(&config).await?;
        }
        Commands::Verify => {
            cmd_verify(&config).await?;
        }
        Commands::Reset { confirm } => {
            cmd_reset(&config, confirm).await?;
        }
    }

    Ok(())
}

async fn open_store(config: &Config) -> Result<VectorStore> {
    let provider = provider_from_config(&config.embeddings);

    VectorStore::open(config.store.clone(), provider)
        .await
        .context("Failed to open vector store")
}

async fn cmd_add(
    config: &Config,
    mut texts: Vec<String>,
    file: Option<PathBuf>,
    title: Option<String>,
    meta: Vec<String>,
) -> Result<()> {
    if let Some(path) = file {
        Validator::validate_file_path(&path)?;
        let content = std::fs::read_to_string(&path).context("Failed to read texts file")?;
        texts.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from),
        );
    }

    if texts.is_empty() {
        error!("Nothing to add: pass texts as arguments or with --file");
        return Err(anyhow::anyhow!("No texts provided"));
    }

    let mut metadata = BTreeMap::new();
    if let Some(title) = title {
        metadata.insert("title".to_string(), title);
    }
    for entry in meta {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Invalid --meta entry (expected KEY=VALUE): {entry}"))?;
        metadata.insert(key.to_string(), value.to_string());
    }

    let metadatas = if metadata.is_empty() {
        None
    } else {
        Some(vec![metadata; texts.len()])
    };

    let start_time = Instant::now();
    let store = open_store(config).await?;

    let ids = store
        .add_texts(texts, metadatas)
        .await
        .context("Failed to add texts")?;

    info!(
        "Added {} documents in {:.2}s",
        ids.len(),
        start_time.elapsed().as_secs_f64()
    );

    for id in &ids {
        println!("{}", id);
    }

    Ok(())
}

async fn cmd_search(config: &Config, query: &str, limit: usize) -> Result<()> {
    info!("Searching for: {}", query);

    let store = open_store(config).await?;
    let results = store
        .similarity_search_with_score(query, limit)
        .await
        .context("Vector search failed")?;

    print_results(query, &results);
    Ok(())
}

async fn cmd_hybrid(config: &Config, query: &str, limit: usize) -> Result<()> {
    info!("Hybrid search for: {}", query);

    let store = open_store(config).await?;
    let results = store
        .hybrid_search(query, limit)
        .await
        .context("Hybrid search failed")?;

    print_results(query, &results);
    Ok(())
}

async fn cmd_ask(config: &Config, question: &str, limit: usize, hybrid: bool) -> Result<()> {
    let api_key = config
        .chat
        .api_key
        .clone()
        .context("Chat API key required (set SEMANTIC_STORE__CHAT__API_KEY)")?;

    let store = open_store(config).await?;

    let kind = if hybrid {
        SearchKind::Hybrid
    } else {
        SearchKind::Similarity
    };

    let retriever = store.as_retriever(kind, limit);
    let chat = ChatClient::new(api_key, &config.chat);
    let chain = RetrievalChain::new(retriever, chat, config.chat.max_context_chars);

    let response = chain.answer(question).await.context("Chain failed")?;

    println!("\n{}\n", response.answer);

    if response.sources.is_empty() {
        println!("(answered without stored context)");
    } else {
        println!("Sources:");
        for source in &response.sources {
            println!(
                "  - {} (score {:.4})",
                source
                    .document
                    .title
                    .as_deref()
                    .unwrap_or(&source.document.id),
                source.score
            );
        }
    }

    Ok(())
}

fn print_results(query: &str, results: &[ScoredDocument]) {
    if results.is_empty() {
        println!("\nNo results found for query: \"{}\"\n", query);
        println!("Try:");
        println!("  - Using different search terms");
        println!("  - Checking that documents have been added");
        return;
    }

    println!("\nSearch Results for: \"{}\"\n", query);
    println!("Found {} result(s)\n", results.len());
    println!("{}", "=".repeat(80));

    for (idx, result) in results.iter().enumerate() {
        println!(
            "\n{}. {} (Score: {:.4})",
            idx + 1,
            result
                .document
                .title
                .as_deref()
                .unwrap_or(&result.document.id),
            result.score
        );

        if let Some(distance) = result.distance {
            println!("   Distance: {:.4}", distance);
        }

        let preview = Validator::truncate_text(&result.document.content, 300);
        println!("   Preview:");
        for line in preview.lines().take(5) {
            println!("     {}", line);
        }
    }

    println!("\n{}", "=".repeat(80));
}

async fn cmd_stats(config: &Config) -> Result<()> {
    let store = open_store(config).await?;

    let doc_count = store.count().await?;
    println!("Table: {}", store.table_name());
    println!("Documents: {}", doc_count);
    println!("Fields: {}", store.fields().join(", "));

    Ok(())
}

async fn cmd_verify(config: &Config) -> Result<()> {
    info!("Verifying store");

    let store = open_store(config).await?;
    let schema_manager = SchemaManager::new(store.client());

    if schema_manager.verify().await? {
        println!(
            "{}",
            semantic_store::utils::logging::format_success("Store verified")
        );
    } else {
        println!(
            "{}",
            semantic_store::utils::logging::format_warning(
                "Documents table missing (created on first add)"
            )
        );
    }

    Ok(())
}

async fn cmd_reset(config: &Config, confirm: bool) -> Result<()> {
    if !confirm {
        error!("This will delete all data. Use --confirm to proceed");
        return Ok(());
    }

    warn!("Resetting store - all data will be lost");

    let store = open_store(config).await?;
    store.reset().await.context("Failed to drop table")?;

    info!("Reset complete - table recreated on next add");

    Ok(())
}
