use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use floodnet::models::ReviewImage;
use floodnet::Client;
use monitor::config::Config;
use monitor::context::Context;
use monitor::geocode::Nominatim;
use monitor::location::{DeviceLocation, FixedLocation, IpLocation, LocationFix};
use monitor::render;
use monitor::screens::flood::FloodScreen;
use monitor::screens::sensors::SensorsScreen;
use monitor::screens::theme::ThemeWatcher;
use monitor::screens::traffic::TrafficScreen;
use monitor::screens::vulnerability::VulnerabilityScreen;
use monitor::screens::zones::ZonesScreen;
use monitor::screens::ScreenRunner;
use monitor::telemetry;
use tracing::{debug, info, warn};

#[derive(Debug, Parser)]
#[command(about = "FloodNet console monitor")]
struct Args {
    /// Backend base URL; overrides MONITOR_BASE_URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Pin the monitor to the configured fallback region instead of
    /// geolocating by IP.
    #[arg(long)]
    fixed_location: bool,

    /// Submit a review before the screens start.
    #[arg(long, value_name = "COMMENT")]
    review: Option<String>,

    /// Photo to attach to --review.
    #[arg(long, value_name = "PATH", requires = "review")]
    review_image: Option<PathBuf>,

    /// Book a service visit at the resolved position, then keep monitoring.
    #[arg(long)]
    book: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut config = Config::read_env().expect("could not read MONITOR_* environment");
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }

    let ctx = Context::new();
    {
        let ctx = ctx.clone();
        ctrlc::set_handler(move || {
            tracing::info!("got SIGINT, closing context");
            ctx.cancel();
        })
        .expect("could not set SIGINT handler");
    }

    let api = Client::new(&config.base_url);
    let geocoder = Nominatim::new(&config.geocoder_url);
    let fallback = LocationFix::fallback(&config);
    let mut provider = if args.fixed_location {
        DeviceLocation::Fixed(FixedLocation::new(fallback))
    } else {
        DeviceLocation::Ip(IpLocation::new(fallback))
    };

    // The screens center on one fix per run, the way the app centers on
    // one fix per mount. The presence reporter refreshes its own.
    let (fix, address) = telemetry::locate(&mut provider, &geocoder).await;
    print!("{}", render::location_line(&fix, &address));

    match api.sliders().await {
        Ok(banners) => print!("{}", render::sliders(&banners)),
        Err(err) => warn!(%err, "banners unavailable"),
    }

    if let Some(comment) = &args.review {
        submit_review(&api, comment, args.review_image.as_deref()).await;
    }

    if args.book {
        match telemetry::book_service(&api, &config, &fix, &address).await {
            Ok(receipt) => info!(%receipt, "booking confirmed"),
            Err(err) => warn!(%err, "booking failed"),
        }
    }

    run(&ctx, &config, &api, &geocoder, &mut provider, fix).await;
    ctx.cancel();

    info!("shut down");
}

/// The scheduler: refreshes whichever surface is due, prints it, and sleeps
/// until the nearest deadline or a SIGINT. Single-threaded on purpose; one
/// surface's slow fetch delays the others instead of racing them.
async fn run(
    ctx: &Context,
    config: &Config,
    api: &Client,
    geocoder: &Nominatim,
    provider: &mut DeviceLocation,
    fix: LocationFix,
) {
    let mut zones = ScreenRunner::new(ZonesScreen, config.zone_interval());
    let mut sensors = ScreenRunner::new(SensorsScreen, config.sensor_interval());
    let mut hotspots = ScreenRunner::new(VulnerabilityScreen, config.rainfall_interval());
    let mut flood = ScreenRunner::new(
        FloodScreen::new(fix.coordinate, geocoder.clone()),
        config.flood_interval(),
    );
    let mut traffic = ScreenRunner::new(
        TrafficScreen::new(fix.coordinate, config.nearby_radius_km),
        config.traffic_interval(),
    );
    let mut theme = ThemeWatcher::new();

    let mut theme_due = Instant::now();
    let mut telemetry_due = Instant::now();

    while !ctx.is_cancelled() {
        let now = Instant::now();
        if zones.due(now) {
            zones.refresh(api).await;
            print!("{}", zones.render());
        }
        if sensors.due(now) {
            sensors.refresh(api).await;
            print!("{}", sensors.render());
        }
        if hotspots.due(now) {
            hotspots.refresh(api).await;
            print!("{}", hotspots.render());
        }
        if flood.due(now) {
            flood.refresh(api).await;
            print!("{}", flood.render());
        }
        if traffic.due(now) {
            traffic.refresh(api).await;
            print!("{}", traffic.render());
        }
        if now >= theme_due {
            if let Some(name) = theme.poll(api).await {
                print!("{}", render::theme_line(&name));
            }
            theme_due = Instant::now() + config.theme_interval();
        }
        if now >= telemetry_due {
            match telemetry::report_once(api, config, provider, geocoder).await {
                Ok(()) => debug!("presence reported"),
                Err(err) => warn!(%err, "presence report failed"),
            }
            telemetry_due = Instant::now() + config.telemetry_interval();
        }

        let next = [
            zones.next_due(),
            sensors.next_due(),
            hotspots.next_due(),
            flood.next_due(),
            traffic.next_due(),
        ]
        .into_iter()
        .fold(theme_due.min(telemetry_due), Instant::min);
        let wait = next.saturating_duration_since(Instant::now());
        if ctx.wait_timeout(wait).await {
            break;
        }
    }

    zones.retire();
    sensors.retire();
    hotspots.retire();
    flood.retire();
    traffic.retire();
}

async fn submit_review(api: &Client, comment: &str, image: Option<&Path>) {
    let image = match image {
        Some(path) => match tokio::fs::read(path).await {
            Ok(bytes) => {
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "photo".to_owned());
                Some(ReviewImage { file_name, bytes })
            }
            Err(err) => {
                warn!(%err, path = %path.display(), "could not read photo, submitting without it");
                None
            }
        },
        None => None,
    };
    match api.create_review(comment, image).await {
        Ok(review) => info!(id = review.id, "review submitted"),
        Err(err) => warn!(%err, "review submission failed"),
    }
}
