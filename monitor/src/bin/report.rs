//! One-shot dashboard report: fetches every surface once, prints it, and
//! exits. The web dashboard's layout, without the web dashboard.

use std::time::Duration;

use clap::Parser;
use floodnet::models::Coordinate;
use floodnet::Client;
use monitor::config::Config;
use monitor::geocode::NullGeocoder;
use monitor::screens::flood::FloodScreen;
use monitor::screens::history::HistoryScreen;
use monitor::screens::sensors::SensorsScreen;
use monitor::screens::traffic::TrafficScreen;
use monitor::screens::vulnerability::VulnerabilityScreen;
use monitor::screens::zones::ZonesScreen;
use monitor::screens::{Screen, ScreenRunner};

#[derive(Debug, Parser)]
#[command(about = "One-shot FloodNet dashboard report")]
struct Args {
    /// Backend base URL; overrides MONITOR_BASE_URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Report center latitude; defaults to the configured region.
    #[arg(long)]
    lat: Option<f64>,

    /// Report center longitude; defaults to the configured region.
    #[arg(long)]
    lon: Option<f64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut config = Config::read_env().expect("could not read MONITOR_* environment");
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    let center = Coordinate::new(
        args.lat.unwrap_or(config.default_latitude),
        args.lon.unwrap_or(config.default_longitude),
    );
    let api = Client::new(&config.base_url);

    // Dashboard order. Names stay as coordinate labels: a one-shot report
    // should not wait on an external geocoder.
    print_once(&api, FloodScreen::new(center, NullGeocoder)).await;
    print_once(&api, ZonesScreen).await;
    print_once(&api, VulnerabilityScreen).await;
    print_once(&api, SensorsScreen).await;
    print_once(&api, HistoryScreen).await;
    print_once(&api, TrafficScreen::new(center, config.nearby_radius_km)).await;
}

/// Fetches a surface once and prints its section. A failed fetch prints
/// the surface's empty state, same as the continuous monitor would show
/// before its first success.
async fn print_once<S: Screen>(api: &Client, screen: S) {
    // A one-shot pass never waits on the refresh deadline.
    let mut runner = ScreenRunner::new(screen, Duration::ZERO);
    runner.refresh(api).await;
    print!("{}", runner.render());
    runner.retire();
}
