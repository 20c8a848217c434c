use clap::Parser;
use docchat::core::config;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "docchat", about = "Terminal client for a document question-answering backend")]
struct Args {
    /// Backend base URL (overrides config file and DOCCHAT_BASE_URL)
    #[arg(short, long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - the terminal belongs to the TUI, so logs go
    // to docchat.log in the current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("docchat.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let loaded = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("docchat: {e}");
            std::process::exit(1);
        }
    };
    let resolved = config::resolve(&loaded, args.base_url.as_deref());

    log::info!("DocChat starting up, backend: {}", resolved.base_url);

    docchat::tui::run(resolved)
}
