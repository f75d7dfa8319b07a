use anyhow::{bail, Context, Result};
use geosample::geojson::{samples_from_features, DEFAULT_ELEVATION_KEYS};
use geosample::{ElevationSample, GeoPoint, LocalProjection, SamplingConfigBuilder};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const LAT_COLUMN: &str = "lat";
const LON_COLUMN: &str = "lon";
const ELEVATION_COLUMNS: &[&str] = &["elevation", "ele"];

#[allow(clippy::too_many_arguments)]
pub fn run(
    input: PathBuf,
    lat: f64,
    lon: f64,
    radius: f64,
    resolution: usize,
    k: usize,
    power: f64,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = SamplingConfigBuilder::new()
        .radius(radius)
        .resolution(resolution)
        .k(k)
        .power(power)
        .build()
        .context("Invalid sampling parameters")?;

    let center = GeoPoint::new(lat, lon);
    let samples = read_samples(&input, center)?;
    if samples.is_empty() {
        eprintln!(
            "Warning: no elevation samples found in {}, every point will be 0.0",
            input.display()
        );
    }

    let grid = config.grid_spec(lat, lon).generate();

    let pb = ProgressBar::new(grid.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let output_path = output.unwrap_or_else(|| default_output_path(&input));
    let output_file = File::create(&output_path).context("Failed to create output file")?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(output_file));
    writer.write_record(["row", "col", "lat", "lon", "x", "y", "elevation"])?;

    for (index, (local, geo)) in grid.points().iter().zip(grid.geo_points()).enumerate() {
        let (row, col) = grid.row_col(index).context("Grid index out of range")?;
        let elevation = config.idw.interpolate_point(*local, &samples);

        writer.write_record([
            row.to_string(),
            col.to_string(),
            format!("{:.6}", geo.lat),
            format!("{:.6}", geo.lon),
            format!("{:.2}", local.x),
            format!("{:.2}", local.y),
            format!("{:.2}", elevation),
        ])?;

        pb.inc(1);
    }

    pb.finish_with_message("done");
    writer.flush()?;

    println!(
        "Interpolated {} points from {} samples",
        grid.len(),
        samples.len()
    );
    println!("Output written to: {}", output_path.display());
    Ok(())
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "samples".to_string());
    input.with_file_name(format!("{}_grid.csv", stem))
}

/// Load samples from a CSV or GeoJSON file, projected around `center`.
fn read_samples(input: &Path, center: GeoPoint) -> Result<Vec<ElevationSample>> {
    let extension = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" => read_csv_samples(input, center),
        "geojson" | "json" => read_geojson_samples(input, center),
        _ => bail!(
            "Unsupported file format: {}. Use .csv or .geojson",
            extension
        ),
    }
}

fn read_csv_samples(input: &Path, center: GeoPoint) -> Result<Vec<ElevationSample>> {
    let file = File::open(input).context("Failed to open input file")?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    // Find column indices
    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let lat_idx = column(LAT_COLUMN)
        .with_context(|| format!("Column '{}' not found in CSV", LAT_COLUMN))?;
    let lon_idx = column(LON_COLUMN)
        .with_context(|| format!("Column '{}' not found in CSV", LON_COLUMN))?;
    let ele_idx = ELEVATION_COLUMNS
        .iter()
        .find_map(|name| column(*name))
        .with_context(|| format!("None of {:?} found in CSV", ELEVATION_COLUMNS))?;

    let projection = LocalProjection::new(center);
    let mut samples = Vec::new();

    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let field = |idx: usize, what: &str| -> Result<f64> {
            record
                .get(idx)
                .with_context(|| format!("Missing {} on row {}", what, line + 1))?
                .trim()
                .parse()
                .with_context(|| format!("Invalid {} on row {}", what, line + 1))
        };

        let point = GeoPoint::new(field(lat_idx, "latitude")?, field(lon_idx, "longitude")?);
        let elevation = field(ele_idx, "elevation")?;
        samples.push(ElevationSample::at(projection.to_local(point), elevation));
    }

    Ok(samples)
}

fn read_geojson_samples(input: &Path, center: GeoPoint) -> Result<Vec<ElevationSample>> {
    let file = File::open(input).context("Failed to open input file")?;
    let reader = BufReader::new(file);

    let geojson: geojson::GeoJson =
        serde_json::from_reader(reader).context("Failed to parse GeoJSON")?;

    let collection = match geojson {
        geojson::GeoJson::FeatureCollection(fc) => fc,
        geojson::GeoJson::Feature(feature) => geojson::FeatureCollection {
            bbox: None,
            features: vec![feature],
            foreign_members: None,
        },
        geojson::GeoJson::Geometry(geometry) => geojson::FeatureCollection {
            bbox: None,
            features: vec![geojson::Feature::from(geometry)],
            foreign_members: None,
        },
    };

    samples_from_features(&collection, center, DEFAULT_ELEVATION_KEYS)
        .context("Invalid coordinates in GeoJSON")
}
