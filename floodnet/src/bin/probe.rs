//! Exercises every read endpoint of a FloodNet backend and prints what came
//! back. Useful when standing up a new deployment, or when a screen shows
//! nothing and you want to know whether to blame the backend. Writes only
//! when asked: `--delete-review` removes one review by id.

use clap::Parser;
use floodnet::models::Coordinate;
use floodnet::Client;

#[derive(Debug, Parser)]
#[command(about = "Probe a FloodNet backend")]
struct Args {
    /// Base URL of the backend API.
    #[arg(long, default_value = "http://127.0.0.1:8000/api")]
    base_url: String,

    /// Latitude for the position-keyed endpoints.
    #[arg(long, default_value_t = 28.6139)]
    lat: f64,

    /// Longitude for the position-keyed endpoints.
    #[arg(long, default_value_t = 77.2090)]
    lon: f64,

    /// Delete this review id after the read pass.
    #[arg(long, value_name = "ID")]
    delete_review: Option<i64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    let client = Client::new(&args.base_url);
    let at = Coordinate::new(args.lat, args.lon);

    match client.zone_flow_weather().await {
        Ok(zones) => {
            println!("zone-flow-weather: {} zones", zones.len());
            for zone in &zones {
                println!(
                    "  {}: rain_sum {:.1} mm, downstream {:.1} mm",
                    zone.zone,
                    zone.rain_sum(),
                    zone.downstream_rain
                );
            }
        }
        Err(err) => println!("zone-flow-weather: {err}"),
    }

    match client.sensor_readings().await {
        Ok(readings) => {
            println!("data: {} sensor samples", readings.len());
            if let Some(newest) = readings.first() {
                println!(
                    "  newest: {} at {:.0} cm ({})",
                    newest.location, newest.water_level, newest.timestamp
                );
            }
        }
        Err(err) => println!("data: {err}"),
    }

    match client.vulnerability_points().await {
        Ok(points) => println!("vulnerability-points: {} hotspots", points.len()),
        Err(err) => println!("vulnerability-points: {err}"),
    }

    match client.realtime_rainfall(at).await {
        Ok(sample) => println!("realtime-rainfall: {:.1} mm", sample.rainfall_mm),
        Err(err) => println!("realtime-rainfall: {err}"),
    }

    match client.flood_risk(at).await {
        Ok(points) => {
            println!("flood_risk: {} forecast points", points.len());
            for point in &points {
                println!(
                    "  ({:.4}, {:.4}): {} at {:.0}%, {:.1} mm",
                    point.lat, point.lon, point.risk, point.risk_prob, point.rain_mm
                );
            }
        }
        Err(err) => println!("flood_risk: {err}"),
    }

    match client.sliders().await {
        Ok(sliders) => println!("sliders: {} banners", sliders.len()),
        Err(err) => println!("sliders: {err}"),
    }

    match client.reviews().await {
        Ok(reviews) => println!("reviews: {} entries", reviews.len()),
        Err(err) => println!("reviews: {err}"),
    }

    match client.active_theme().await {
        Ok(theme) => println!("theme/active: {}", theme.name),
        Err(err) => println!("theme/active: {err}"),
    }

    match client.historical_rainfall().await {
        Ok(years) => println!("historical-rainfall: {} years", years.len()),
        Err(err) => println!("historical-rainfall: {err}"),
    }

    if let Some(id) = args.delete_review {
        match client.delete_review(id).await {
            Ok(()) => println!("reviews/{id}/: deleted"),
            Err(err) => println!("reviews/{id}/: {err}"),
        }
    }
}
