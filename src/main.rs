use clap::Parser;
use echodeck::core::config::{CliOverrides, EchodeckConfig, load_config, resolve};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "echodeck", about = "Terminal chat over WebSocket, plus a documents table")]
struct Args {
    /// WebSocket endpoint for the chat session
    #[arg(long)]
    endpoint: Option<String>,

    /// Base URL of the documents API
    #[arg(long)]
    docs_url: Option<String>,

    /// Where to write the log
    #[arg(long, default_value = "echodeck.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // The terminal belongs to the UI, so logs go to a file
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create(&args.log_file) {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = load_config().unwrap_or_else(|e| {
        log::error!("{}; falling back to defaults", e);
        EchodeckConfig::default()
    });
    let cli = CliOverrides {
        endpoint: args.endpoint,
        docs_url: args.docs_url,
    };
    let config = resolve(&file_config, &cli);

    log::info!(
        "echodeck starting up (endpoint: {}, documents: {})",
        config.endpoint,
        config.docs_base_url
    );

    echodeck::tui::run(config)
}
