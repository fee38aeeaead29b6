//! Veloroute CLI
//!
//! Command-line front end for place search and bicycle route planning.

#![allow(clippy::print_stdout)]

mod saved_route;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use application::{GeocodingPort, RoutePlanner};
use clap::{Parser, Subcommand};
use domain::{GeocodeCandidate, RoutePath};
use infrastructure::{AppConfig, LogFormat, NominatimGeocodingAdapter, OsrmRoutingAdapter};
use integration_osm::polyline;
use tracing::{debug, info};

/// Veloroute CLI
#[derive(Parser)]
#[command(name = "veloroute-cli")]
#[command(author, version, about = "Plan bicycle routes with OpenStreetMap services", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: ./veloroute.toml if present)
    #[arg(short, long, env = "VELOROUTE_CONFIG")]
    config: Option<PathBuf>,

    /// Log output format, overrides the configuration
    #[arg(long)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search places by name
    Search {
        /// Free-text place name
        query: String,

        /// Maximum number of candidates (default: planner.max_results)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Plan a bicycle route
    ///
    /// Each place is resolved to its best-ranked candidate.
    /// Example: veloroute-cli route --from Paris --via Dijon --to Lyon
    Route {
        /// Start place
        #[arg(long)]
        from: String,

        /// End place
        #[arg(long)]
        to: String,

        /// Intermediate stops, in order
        #[arg(long)]
        via: Vec<String>,

        /// Save the planned route as JSON (file or directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the coordinates of an encoded polyline
    Decode {
        /// Precision-5 encoded polyline
        polyline: String,
    },

    /// Print a route saved with `route --output`
    Show {
        /// Saved route file
        file: PathBuf,
    },

    /// Print the effective configuration as TOML
    Config,
}

/// Convert verbosity count to log filter string
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Riding time as "5 h 07 min" or "42 min"
fn format_duration(minutes: u64) -> String {
    if minutes < 60 {
        format!("{minutes} min")
    } else {
        format!("{} h {:02} min", minutes / 60, minutes % 60)
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => AppConfig::load().context("Failed to load configuration")?,
    };
    if let Err(problems) = config.validate() {
        bail!("Invalid configuration: {problems}");
    }
    Ok(config)
}

fn print_path(path: &RoutePath) {
    println!("   Distance: {:.1} km", path.distance_km());
    println!("   Duration: {}", format_duration(path.duration_minutes()));
    println!("   Points:   {}", path.coordinates.len());
}

async fn resolve_start(planner: &mut RoutePlanner, query: &str) -> anyhow::Result<GeocodeCandidate> {
    planner.set_start_text(query)?;
    planner.settled().await;
    let error = planner.input().start_search().snapshot().last_error;
    let candidate = first_candidate(planner.input_snapshot().start_candidates, error, query)?;
    planner.select_start(&candidate).await?;
    Ok(candidate)
}

async fn resolve_end(planner: &mut RoutePlanner, query: &str) -> anyhow::Result<GeocodeCandidate> {
    planner.set_end_text(query)?;
    planner.settled().await;
    let error = planner.input().end_search().snapshot().last_error;
    let candidate = first_candidate(planner.input_snapshot().end_candidates, error, query)?;
    planner.select_end(&candidate).await?;
    Ok(candidate)
}

async fn resolve_waypoint(
    planner: &mut RoutePlanner,
    query: &str,
) -> anyhow::Result<GeocodeCandidate> {
    let id = planner.add_waypoint()?;
    planner.update_waypoint_label(id, query)?;
    planner.settled().await;
    let candidates = planner
        .input_snapshot()
        .active_waypoint
        .map(|(_, candidates)| candidates)
        .unwrap_or_default();
    let error = planner
        .input()
        .waypoints()
        .search_snapshot(id)
        .and_then(|search| search.last_error);
    let candidate = first_candidate(candidates, error, query)?;
    planner.select_waypoint_candidate(id, &candidate).await?;
    Ok(candidate)
}

/// Best-ranked candidate of a settled field, or the field's search failure
fn first_candidate(
    candidates: Vec<GeocodeCandidate>,
    search_error: Option<String>,
    query: &str,
) -> anyhow::Result<GeocodeCandidate> {
    if let Some(candidate) = candidates.into_iter().next() {
        debug!(%query, name = %candidate.display_name, "Using best candidate");
        return Ok(candidate);
    }
    match search_error {
        Some(error) => bail!("Search for '{query}' failed: {error}"),
        None => bail!("No place found for '{query}'"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    let format = cli.log_format.unwrap_or(config.log_format);
    infrastructure::init_tracing(format, log_filter_from_verbosity(cli.verbose))?;

    match cli.command {
        Commands::Search { query, limit } => {
            let geocoder = NominatimGeocodingAdapter::from_config(&config.geocoding)?;
            let limit = limit.unwrap_or(config.planner.max_results);
            let candidates = geocoder.search(&query, limit).await?;

            if candidates.is_empty() {
                println!("🔍 No place found for '{query}'");
            }
            for (index, candidate) in candidates.iter().enumerate() {
                println!(
                    "{}. {} ({})",
                    index + 1,
                    candidate.display_name,
                    candidate.point
                );
            }
        },

        Commands::Route {
            from,
            to,
            via,
            output,
        } => {
            let geocoder = Arc::new(NominatimGeocodingAdapter::from_config(&config.geocoding)?);
            let router = Arc::new(OsrmRoutingAdapter::from_config(&config.routing)?);
            let mut planner = RoutePlanner::new(geocoder, router, &config.planner.to_settings());

            let start = resolve_start(&mut planner, &from).await?;
            println!("🚩 Start: {}", start.display_name);
            let end = resolve_end(&mut planner, &to).await?;
            println!("🏁 End:   {}", end.display_name);

            let mut via_labels = Vec::with_capacity(via.len());
            for query in &via {
                let stop = resolve_waypoint(&mut planner, query).await?;
                println!("📍 Via:   {}", stop.display_name);
                via_labels.push(stop.display_name);
            }

            let request = planner
                .input()
                .route_request()
                .context("Start and end must both be resolved")?;
            planner.confirm_route().await?;

            let session = planner.session_snapshot();
            if let Some(error) = session.last_error {
                bail!("Routing failed: {error}");
            }
            let Some(path) = session.current_path else {
                bail!("Routing finished without a route");
            };

            println!("\n🚲 Route:");
            print_path(&path);
            let region = planner.map_region(config.map.default_region()?);
            println!(
                "   Map:      center {}, span {:.4}° × {:.4}°",
                region.center, region.latitude_delta, region.longitude_delta
            );

            if let Some(output) = output {
                let saved = saved_route::SavedRoute::new(
                    start.display_name,
                    end.display_name,
                    via_labels,
                    request,
                    path,
                );
                let written = saved_route::save_route(&saved, &output)?;
                println!("\n💾 Saved to {}", written.display());
            }
            info!("Route planned");
        },

        Commands::Decode { polyline } => {
            let points = polyline::decode(&polyline).context("Invalid polyline")?;
            for (latitude, longitude) in points {
                println!("{latitude:.5}, {longitude:.5}");
            }
        },

        Commands::Show { file } => {
            let saved = saved_route::load_route(&file)?;
            println!("🗺️  {} → {}", saved.start, saved.end);
            for stop in &saved.via {
                println!("   via {stop}");
            }
            println!("   Saved:    {}", saved.saved_at.format("%Y-%m-%d %H:%M UTC"));
            print_path(&saved.path);
        },

        Commands::Config => {
            println!("{}", toml::to_string_pretty(&config)?);
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_verbosity_zero() {
        assert_eq!(log_filter_from_verbosity(0), "warn");
    }

    #[test]
    fn log_filter_verbosity_one() {
        assert_eq!(log_filter_from_verbosity(1), "info");
    }

    #[test]
    fn log_filter_verbosity_two() {
        assert_eq!(log_filter_from_verbosity(2), "debug");
    }

    #[test]
    fn log_filter_verbosity_three_or_more() {
        assert_eq!(log_filter_from_verbosity(3), "trace");
        assert_eq!(log_filter_from_verbosity(10), "trace");
    }

    fn path_lasting(duration_seconds: f64) -> RoutePath {
        RoutePath {
            distance_meters: 0.0,
            duration_seconds,
            coordinates: Vec::new(),
        }
    }

    #[test]
    fn format_duration_minutes_only() {
        assert_eq!(format_duration(0), "0 min");
        assert_eq!(format_duration(path_lasting(2520.0).duration_minutes()), "42 min");
    }

    #[test]
    fn format_duration_hours() {
        assert_eq!(format_duration(path_lasting(72_000.0).duration_minutes()), "20 h 00 min");
        assert_eq!(format_duration(path_lasting(18_420.0).duration_minutes()), "5 h 07 min");
    }

    #[test]
    fn negative_duration_formats_as_zero() {
        assert_eq!(format_duration(path_lasting(-30.0).duration_minutes()), "0 min");
    }

    #[test]
    fn first_candidate_reports_search_failure() {
        let err = first_candidate(Vec::new(), Some("HTTP 503".to_string()), "Dijon").unwrap_err();
        assert_eq!(err.to_string(), "Search for 'Dijon' failed: HTTP 503");
    }

    #[test]
    fn first_candidate_without_results_or_error() {
        let err = first_candidate(Vec::new(), None, "Nowhere").unwrap_err();
        assert_eq!(err.to_string(), "No place found for 'Nowhere'");
    }

    #[test]
    fn first_candidate_takes_best_ranked() {
        let candidates = vec![
            GeocodeCandidate::new("Dijon, France", domain::GeoPoint::paris()),
            GeocodeCandidate::new("Dijon, Canada", domain::GeoPoint::paris()),
        ];
        let best = first_candidate(candidates, Some("stale".to_string()), "Dijon").unwrap();
        assert_eq!(best.display_name, "Dijon, France");
    }

    #[test]
    fn default_config_serializes_to_toml() {
        let rendered = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(rendered.contains("[routing]"));
        assert!(rendered.contains("profile = \"bike\""));
    }
}
