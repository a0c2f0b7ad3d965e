//! DocTopic: document topic analysis server.

use std::path::PathBuf;
use std::sync::Arc;

use doctopic_core::DocTopicConfig;
use doctopic_infer::TopicClassifier;
use doctopic_server::{cli, routes, AppState};
use doctopic_store::KeywordStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn resolve_data_dir() -> PathBuf {
    std::env::var("DOCTOPIC_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()));
            if let Some(dir) = exe_dir {
                let parent_data = dir.join("../data");
                if parent_data.exists() {
                    return parent_data;
                }
            }
            PathBuf::from("data")
        })
}

fn print_help() {
    println!("DocTopic: document topic analysis server");
    println!();
    println!("Usage: doctopic [command]");
    println!();
    println!("Commands:");
    println!("  (none)                   Start the server");
    println!("  validate [dir]           Validate topic keyword files");
    println!("  analyze <file> <topic>   Score a document against a topic's keywords");
    println!("  help                     Show this help message");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--validate" | "validate" => {
                let dir = if args.len() > 2 {
                    PathBuf::from(&args[2])
                } else {
                    resolve_data_dir()
                };
                let report = cli::validate(&dir);
                cli::print_report(&cli::keyword_folder(&dir), &report);
                std::process::exit(if report.is_valid() { 0 } else { 1 });
            }
            "--analyze" | "analyze" => {
                if args.len() < 4 {
                    eprintln!("Usage: doctopic analyze <file> <topic>");
                    std::process::exit(1);
                }
                let config = DocTopicConfig::from_env(resolve_data_dir())?;
                let output = cli::analyze(
                    &config.data_paths,
                    &PathBuf::from(&args[2]),
                    &args[3],
                    config.match_policy,
                )?;
                println!("{}", output);
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'doctopic help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = DocTopicConfig::from_env(&data_dir)?;
    let port = config.port;

    let keywords = KeywordStore::open(config.data_paths.keyword_source())
        .map_err(|e| anyhow::anyhow!("Failed to load topic keywords: {}", e))?;
    info!("Loaded {} keyword topics", keywords.len());

    let embedder = doctopic_infer::create_embedder(&config.data_paths.models)
        .map_err(|e| anyhow::anyhow!("Failed to load embedding model: {}", e))?;
    let classifier = TopicClassifier::load(&config.data_paths.topic_labels, embedder)
        .map_err(|e| anyhow::anyhow!("Failed to build topic classifier: {}", e))?;
    info!("Classifier ready with {} labels", classifier.labels().len());

    let state = Arc::new(AppState::new(config, keywords, classifier));
    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("DocTopic server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
