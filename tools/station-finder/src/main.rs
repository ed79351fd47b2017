use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use station_proximity::ingest;
use station_proximity::prelude::*;

mod output;

use output::{write_json, write_table, Row};

#[derive(Parser, Debug)]
#[command(
    name = "station-finder",
    author,
    version,
    about = "Find and rank CNG stations near a point",
    long_about = "Loads a station JSON file ({\"stations\": [...]} or a bare array), keeps the \
                  stations within a radius of the given point, and prints them ranked by \
                  distance, predicted wait time or rating, with a travel-time estimate.\n\n\
                  Malformed station records are skipped and counted."
)]
struct Args {
    /// Input station JSON file
    #[arg(short, long)]
    input: PathBuf,

    /// Latitude of the search center in degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Longitude of the search center in degrees
    #[arg(long, allow_hyphen_values = true)]
    lng: f64,

    /// Search radius in kilometers
    #[arg(short, long, default_value_t = DEFAULT_RADIUS_KM)]
    radius: f64,

    /// Sort order: distance, wait-time or rating
    #[arg(short, long, default_value_t = SortKey::Distance, value_parser = SortKey::parse)]
    sort: SortKey,

    /// Keep only the first N results
    #[arg(short, long)]
    limit: Option<NonZeroUsize>,

    /// Drop stations rated below this (unrated stations are dropped too)
    #[arg(long)]
    min_rating: Option<f64>,

    /// Merge stations closer than this many kilometers before searching
    #[arg(long)]
    dedup_km: Option<f64>,

    /// Average driving speed in km/h used for travel estimates
    #[arg(long, default_value_t = DEFAULT_AVG_SPEED_KMH)]
    speed: f64,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Write results to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    log::info!("=== Station Finder ===");
    log::info!("Input: {}", args.input.display());

    if !args.input.exists() {
        bail!("Input file does not exist: {}", args.input.display());
    }

    let center = GeoPoint::new(args.lat, args.lng).context("Invalid search center")?;

    let query = QueryParameters {
        center,
        radius_km: args.radius,
        sort_key: args.sort,
        limit: args.limit,
        min_rating: args.min_rating,
    };
    query.validate().context("Invalid query")?;

    if !(args.speed.is_finite() && args.speed > 0.0) {
        bail!("Speed must be a positive number of km/h, got {}", args.speed);
    }

    log::info!(
        "Center: ({}, {}), radius {} km, sorted by {}",
        center.lat(),
        center.lng(),
        query.radius_km,
        query.sort_key
    );

    // Load stations
    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let ingested =
        ingest::from_reader(BufReader::new(file)).context("Failed to read station file")?;

    log::info!("Loaded {} stations", ingested.stations.len());
    if ingested.skipped > 0 {
        log::warn!("Skipped {} malformed station records", ingested.skipped);
    }

    let stations = match args.dedup_km {
        Some(threshold_km) => {
            let before = ingested.stations.len();
            let unique = deduplicate(ingested.stations, threshold_km)
                .context("Invalid deduplication threshold")?;
            log::info!("Merged {} duplicate stations", before - unique.len());
            unique
        }
        None => ingested.stations,
    };

    // Query
    let index = StationIndex::from_stations(stations);
    let ranked = index.search(&query)?;

    if ranked.is_empty() {
        log::warn!(
            "No CNG stations found within {} km. Try increasing the search radius.",
            query.radius_km
        );
    } else {
        log::info!("Found {} stations", ranked.len());
    }

    let rows = ranked
        .iter()
        .map(|result| {
            TravelEstimate::for_result(result, args.speed).map(|estimate| Row { result, estimate })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    // Output
    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            emit(BufWriter::new(file), &rows, args.json)?;
            log::info!("Output written to: {}", path.display());
        }
        None => emit(io::stdout().lock(), &rows, args.json)?,
    }

    Ok(())
}

fn emit<W: Write>(mut writer: W, rows: &[Row<'_>], json: bool) -> Result<()> {
    if json {
        write_json(&mut writer, rows)?;
    } else {
        write_table(&mut writer, rows)?;
    }
    writer.flush().context("Failed to flush output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> std::result::Result<Args, clap::Error> {
        let base = ["station-finder", "--input", "stations.json", "--lat", "28.6139", "--lng", "77.2090"];
        Args::try_parse_from(base.iter().chain(extra))
    }

    #[test]
    fn test_sort_defaults_to_distance() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.sort, SortKey::Distance);
        assert_eq!(args.radius, DEFAULT_RADIUS_KM);
    }

    #[test]
    fn test_sort_parsed_by_clap() {
        assert_eq!(parse(&["--sort", "wait-time"]).unwrap().sort, SortKey::WaitTime);
        assert_eq!(parse(&["-s", "rating"]).unwrap().sort, SortKey::Rating);

        let error = parse(&["--sort", "price"]).unwrap_err();
        assert_eq!(error.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(error.to_string().contains("Invalid sort key"));
    }

    #[test]
    fn test_negative_coordinates_and_zero_limit() {
        let args = Args::try_parse_from([
            "station-finder", "-i", "s.json", "--lat", "-33.8688", "--lng", "-151.2",
        ])
        .unwrap();
        assert_eq!(args.lat, -33.8688);
        assert_eq!(args.lng, -151.2);

        assert!(parse(&["--limit", "0"]).is_err());
    }

    #[test]
    fn test_ingest_then_search() {
        let payload = br#"{"stations": [
            {"name": "IGL Janpath", "position": {"lat": 28.6229, "lng": 77.2100}},
            {"name": "IGL Azadpur", "position": {"lat": 28.7041, "lng": 77.1025}},
            {"name": "broken"}
        ]}"#;
        let ingested = ingest::from_reader(&payload[..]).unwrap();
        assert_eq!(ingested.skipped, 1);

        let args = parse(&[]).unwrap();
        let query = QueryParameters::new(GeoPoint::new(args.lat, args.lng).unwrap());
        let ranked = StationIndex::from_stations(ingested.stations).search(&query).unwrap();

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].station.name(), "IGL Janpath");
    }
}
