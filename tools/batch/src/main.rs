/// Bulk scorer: reads a CSV of input rows, writes a predictions CSV.
///
/// Input row format (12 comma-separated fields, no header):
///   elevation, aspect, slope, hydrology, vertical hydrology, roadways,
///   fire points, hillshade 9am, hillshade noon, hillshade 3pm,
///   wilderness label, soil label
/// The two label fields may be empty ("no selection"). A leading header
/// line and malformed rows are warned about and skipped rather than
/// aborting the run.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use cover_core::categorical::{SoilType, WildernessArea};
use cover_core::cover_type::CoverType;
use cover_core::forest::ForestModel;
use cover_core::measurements::CartographicMeasurements;
use cover_core::schema::{assemble, FeatureVector};

#[derive(Parser, Debug)]
#[command(name = "batch", about = "Score a CSV of patches against a model artifact")]
struct Args {
    /// Model artifact path (.json or .json.gz).
    #[arg(short, long, default_value = "data/forest_cover_model.json")]
    model: PathBuf,

    /// Input CSV of patch rows.
    #[arg(short, long)]
    input: PathBuf,

    /// Output CSV of `row,code,label` lines.
    #[arg(short, long, default_value = "data/predictions.csv")]
    output: PathBuf,
}

/// Parse one CSV line into an assembled feature row.
fn parse_row(line: &str) -> Result<FeatureVector, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 12 {
        return Err(format!("expected 12 fields, found {}", fields.len()));
    }

    let mut numbers = [0.0f32; 10];
    for (i, field) in fields[..10].iter().enumerate() {
        numbers[i] = field
            .parse::<f32>()
            .map_err(|_| format!("field {} ({field:?}) is not numeric", i + 1))?;
    }
    let measurements = CartographicMeasurements {
        elevation: numbers[0],
        aspect: numbers[1],
        slope: numbers[2],
        horizontal_distance_to_hydrology: numbers[3],
        vertical_distance_to_hydrology: numbers[4],
        horizontal_distance_to_roadways: numbers[5],
        horizontal_distance_to_fire_points: numbers[6],
        hillshade_9am: numbers[7],
        hillshade_noon: numbers[8],
        hillshade_3pm: numbers[9],
    };

    let wilderness = if fields[10].is_empty() {
        None
    } else {
        Some(WildernessArea::from_label(fields[10]).map_err(|e| e.to_string())?)
    };
    let soil = if fields[11].is_empty() {
        None
    } else {
        Some(SoilType::from_label(fields[11]).map_err(|e| e.to_string())?)
    };

    Ok(assemble(&measurements, wilderness, soil))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let model = ForestModel::load(&args.model)
        .with_context(|| format!("Cannot load model {}", args.model.display()))?;
    eprintln!(
        "[batch] model {} ({} trees)",
        args.model.display(),
        model.trees.len()
    );

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("Cannot read {}", args.input.display()))?;

    let mut rows = Vec::new();
    let mut row_numbers = Vec::new();
    let mut skipped = 0usize;
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_row(line) {
            Ok(row) => {
                rows.push(row);
                row_numbers.push(lineno + 1);
            }
            Err(reason) => {
                // First line is allowed to be a header.
                if lineno > 0 {
                    eprintln!("[batch] [warn] line {}: {} — skipped", lineno + 1, reason);
                }
                skipped += 1;
            }
        }
    }
    if rows.is_empty() {
        bail!("no parseable rows in {}", args.input.display());
    }

    let codes = model.predict_batch(&rows)?;

    let mut out = String::with_capacity(codes.len() * 24);
    out.push_str("row,code,label\n");
    for (line_no, &code) in row_numbers.iter().zip(&codes) {
        let label = CoverType::from_code(code)?.label();
        out.push_str(&format!("{line_no},{code},{label}\n"));
    }
    fs::write(&args.output, out)
        .with_context(|| format!("Write failed: {}", args.output.display()))?;

    eprintln!(
        "[batch] {} rows scored, {} skipped → {}",
        codes.len(),
        skipped,
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cover_core::schema::FEATURE_COUNT;

    const GOOD: &str = "2500,180,15,300,50,1000,1500,150,200,150,Wilderness Area 1,Soil Type 1";

    #[test]
    fn parse_row_assembles_54_columns() {
        let row = parse_row(GOOD).unwrap();
        assert_eq!(row.len(), FEATURE_COUNT);
        assert_eq!(row.as_slice()[0], 2500.0);
        assert_eq!(row.as_slice()[10], 1.0);
        assert_eq!(row.as_slice()[14], 1.0);
    }

    #[test]
    fn parse_row_allows_empty_selections() {
        let row = parse_row("2500,180,15,300,50,1000,1500,150,200,150,,").unwrap();
        assert!(row.as_slice()[10..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn parse_row_rejects_wrong_field_counts() {
        assert!(parse_row("1,2,3").is_err());
    }

    #[test]
    fn parse_row_rejects_non_numeric_measurements() {
        let bad = GOOD.replace("2500", "high");
        assert!(parse_row(&bad).is_err());
    }

    #[test]
    fn parse_row_rejects_bad_labels() {
        let bad = GOOD.replace("Soil Type 1", "Soil Type 99");
        assert!(parse_row(&bad).is_err());
    }
}
