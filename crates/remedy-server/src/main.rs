//! Remedy: symptom-based disease prediction server.

use std::path::PathBuf;
use std::sync::Arc;

use remedy_core::RemedyConfig;
use remedy_infer::TrainOptions;
use remedy_runtime::{Catalog, CatalogAudit, Pipeline};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod routes;
mod state;

use state::AppState;

fn resolve_data_dir() -> PathBuf {
    std::env::var("REMEDY_DATA_DIR")
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

fn print_audit(catalog: &Catalog, audit: &CatalogAudit) {
    let stats = catalog.index().stats();
    println!("=== Remedy Catalog Report ===");
    println!();
    println!("Data directory:     {}", catalog.root().display());
    println!("Diseases:           {}", stats.diseases);
    println!("Symptoms:           {}", stats.symptoms);
    println!("Labels checked:     {}", audit.checked);

    if !audit.unresolved.is_empty() {
        println!();
        println!("No reference data for:");
        for disease in &audit.unresolved {
            println!("  - {:?}", disease);
        }
    }

    println!();
    if audit.is_clean() {
        println!("Status: OK");
    } else {
        println!("Status: UNRESOLVED DISEASES");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    // Handle CLI subcommands
    if args.len() > 1 {
        match args[1].as_str() {
            "--validate" | "validate" => {
                let data_dir = if args.len() > 2 {
                    PathBuf::from(&args[2])
                } else {
                    resolve_data_dir()
                };
                let config = RemedyConfig::from_env(&data_dir);
                let catalog = Catalog::load(&config.data_paths)
                    .map_err(|e| anyhow::anyhow!("Failed to load catalog: {}", e))?;
                let audit = catalog.audit();
                print_audit(&catalog, &audit);
                std::process::exit(if audit.is_clean() { 0 } else { 1 });
            }
            "--predict" | "predict" => {
                if args.len() < 3 {
                    eprintln!("Usage: remedy predict \"<symptoms>\"");
                    std::process::exit(1);
                }
                let config = RemedyConfig::from_env(resolve_data_dir());
                let catalog = Catalog::load(&config.data_paths)
                    .map_err(|e| anyhow::anyhow!("Failed to load catalog: {}", e))?;
                let oracle = remedy_infer::create_oracle(&config.data_paths.model);
                let pipeline = Pipeline::new(config.matching, oracle);

                let response = pipeline.run(&catalog, &args[2..].join(" "));
                println!("{}", serde_json::to_string_pretty(&response)?);
                return Ok(());
            }
            "--train" | "train" => {
                let data_dir = if args.len() > 2 {
                    PathBuf::from(&args[2])
                } else {
                    resolve_data_dir()
                };
                let config = RemedyConfig::from_env(&data_dir);
                let rows = remedy_reference::load_symptom_rows(&config.data_paths.symptoms)
                    .map_err(|e| anyhow::anyhow!("Failed to read symptom table: {}", e))?;
                let (bundle, report) = remedy_infer::train_bundle(&rows, TrainOptions::default())?;
                remedy_infer::save_bundle(&bundle, &config.data_paths.model)?;
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("Remedy: symptom-based disease prediction");
                println!();
                println!("Usage: remedy [command]");
                println!();
                println!("Commands:");
                println!("  (none)                   Start the server");
                println!("  validate [data-dir]      Check that every disease has reference data");
                println!("  predict \"<symptoms>\"     Print a prediction as JSON");
                println!("  train [data-dir]         Fit the statistical fallback model");
                println!("  help                     Show this help message");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'remedy help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    // Normal server startup
    let data_dir = resolve_data_dir();

    info!("Data directory: {}", data_dir.display());

    let config = RemedyConfig::from_env(&data_dir);
    let port = config.port;

    let catalog = Catalog::load(&config.data_paths)
        .map_err(|e| anyhow::anyhow!("Failed to load catalog: {}", e))?;
    catalog.audit();

    // Statistical fallback if a model bundle is present, otherwise rules only
    let oracle = remedy_infer::create_oracle(&config.data_paths.model);

    let state = Arc::new(AppState::new(config, catalog, oracle));

    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Remedy server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
