mod app;
mod config;
mod data;
mod export;
mod tui;
mod ui;

use app::App;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "StockCast-TUI: mock TSLA stock price prediction dashboard",
    after_help = "EXAMPLES:
    # Launch the dashboard
    cargo run --release

    # Slower simulated prediction runs
    cargo run --release -- --run-delay-secs 5

    # Headless export of the mock predictions and run summary
    cargo run --release -- --export ./out"
)]
struct Args {
    /// Duration of the simulated "Run Prediction" spinner, in seconds
    #[arg(long, default_value_t = config::DEFAULT_RUN_DELAY_SECS)]
    run_delay_secs: u64,

    /// Directory for the 'e' export action (predictions CSV + run summary)
    #[arg(long, default_value = ".")]
    export_dir: PathBuf,

    /// Write the export artifacts to the given directory and exit
    #[arg(long)]
    export: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("stockcast_tui=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .init();
    let args = Args::parse();

    if let Some(dir) = args.export {
        let config = config::RunConfig::default();
        let history = data::mock_history(252);
        match export::export_dashboard(&config, &history, &dir) {
            Ok(paths) => info!(
                "Export completed: {} and {}",
                paths.csv.display(),
                paths.summary.display()
            ),
            Err(e) => error!("Export failed: {}", e),
        }
        return Ok(());
    }

    let mut terminal = tui::init()?;
    let mut app = App::new(Duration::from_secs(args.run_delay_secs), args.export_dir);
    let res = app.run(&mut terminal).await;

    tui::restore()?;

    if let Err(e) = res {
        error!("Error: {:?}", e);
    }

    Ok(())
}
