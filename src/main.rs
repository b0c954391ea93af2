// src/main.rs

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use TextAnnotator::config::{server::Args, HandlerConfig};
use TextAnnotator::handler::AnnotationHandler;
use TextAnnotator::provider::HttpNlpProvider;
use TextAnnotator::server::{run_server, AppState};
use TextAnnotator::store::HttpDocumentWriter;
use TextAnnotator::utils::common::setup_prometheus_metrics;
use TextAnnotator::warehouse::{HttpWarehouseClient, WarehouseMirror};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing subscriber
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(filter).init();

    setup_prometheus_metrics(args.metrics_port).await?;

    let config = match &args.config {
        Some(path) => {
            info!("Loading handler configuration from: {}", path.display());
            HandlerConfig::from_yaml_file(path)?
        }
        None => {
            info!("Loading handler configuration from environment");
            HandlerConfig::from_env()?
        }
    };

    // An invalid field configuration is not fatal at startup: every event is
    // skipped with an error report instead, per the gate contract.
    if let Err(e) = config.validate() {
        error!(error = %e, "Handler configuration is invalid; every event will be skipped");
    }

    let provider = Arc::new(HttpNlpProvider::new(&args.nlp_endpoint));
    let store = Arc::new(HttpDocumentWriter::new(&args.store_endpoint));

    let mirror = match (&config.mirror, &args.warehouse_endpoint) {
        (Some(mirror_config), Some(endpoint)) => {
            info!(dataset = %mirror_config.dataset, "Warehouse mirroring enabled");
            Some(Arc::new(WarehouseMirror::new(
                Arc::new(HttpWarehouseClient::new(endpoint)),
                mirror_config.clone(),
            )))
        }
        (Some(_), None) => {
            warn!("Mirror configured but no --warehouse-endpoint given; mirroring disabled");
            None
        }
        _ => None,
    };

    let handler = Arc::new(AnnotationHandler::new(config, provider, store, mirror));

    info!("Annotator starting on {}", args.bind);
    run_server(args.bind, AppState { handler }).await?;

    Ok(())
}
