use std::path::PathBuf;

use clap::Parser;
use crime_dashboard::app::CrimeDashboardApp;
use crime_dashboard::config::DashboardConfig;
use crime_dashboard::state::AppState;
use eframe::egui;

#[derive(Parser)]
#[command(name = "crime-dashboard")]
#[command(about = "Explore provincial crime statistics")]
struct Cli {
    /// Dataset to open at startup (.csv, .json or .parquet).
    #[arg(long)]
    data: Option<PathBuf>,

    /// Configuration file (defaults to ./dashboard.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = DashboardConfig::load(cli.config.as_deref())?;
    let data = cli.data.or_else(|| config.data.clone());

    let mut state = AppState::new(config);
    if let Some(path) = data {
        state.open(&path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Crime Dashboard – Argentina",
        options,
        Box::new(move |_cc| Ok(Box::new(CrimeDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard: {e}"))
}
