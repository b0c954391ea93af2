use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

// Define command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Address to bind the change-event HTTP endpoint on
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Path to the handler configuration YAML file. Falls back to
    /// environment variables (INPUT_FIELD_PATH, OUTPUT_FIELD_PATH, TASKS,
    /// ENTITY_TYPES, SAVE_COMMON_ENTITIES, DATASET_ID, TABLE_PREFIX,
    /// MIRROR_TASKS) when omitted.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Base URL of the NLP analysis service
    #[arg(long, default_value = "http://localhost:9010")]
    pub nlp_endpoint: String,

    /// Base URL of the document store gateway
    #[arg(long, default_value = "http://localhost:9020")]
    pub store_endpoint: String,

    /// Base URL of the analytics warehouse gateway. Mirroring stays disabled
    /// without it, even when the config carries a mirror section.
    #[arg(long)]
    pub warehouse_endpoint: Option<String>,

    /// Optional: Port for the Prometheus metrics HTTP endpoint
    #[arg(long)]
    pub metrics_port: Option<u16>,
}
