use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

use station_proximity::prelude::*;

/// One ranked station with its travel estimate.
#[derive(Serialize)]
pub struct Row<'a> {
    #[serde(flatten)]
    pub result: &'a RankedResult,
    pub estimate: TravelEstimate,
}

/// Write rows as a pretty-printed JSON array
pub fn write_json<W: Write>(mut writer: W, rows: &[Row<'_>]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, rows).context("Failed to serialize results")?;
    writeln!(writer)?;
    Ok(())
}

/// Write rows as a fixed-width table
pub fn write_table<W: Write>(mut writer: W, rows: &[Row<'_>]) -> Result<()> {
    writeln!(
        writer,
        "{:>3}  {:<32} {:>8} {:>6} {:>6} {:>7}",
        "#", "Station", "km", "wait", "rating", "total"
    )?;

    for row in rows {
        let station = &row.result.station;
        let wait = row
            .estimate
            .wait_min
            .map_or_else(|| "-".to_string(), |w| format!("{w}m"));
        let rating = station
            .rating()
            .map_or_else(|| "-".to_string(), |r| format!("{r:.1}"));

        writeln!(
            writer,
            "{:>3}  {:<32} {:>8.2} {:>6} {:>6} {:>6}m",
            row.result.rank + 1,
            truncate(station.name(), 32),
            row.result.distance_km,
            wait,
            rating,
            row.estimate.total_min,
        )?;
    }

    Ok(())
}

fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        return name.to_string();
    }
    let mut cut: String = name.chars().take(width - 1).collect();
    cut.push('…');
    cut
}
