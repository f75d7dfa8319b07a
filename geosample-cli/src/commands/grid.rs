use anyhow::{Context, Result};
use geosample::{Grid, GridSpec};
use std::io::{self, Write};

pub fn run(
    lat: f64,
    lon: f64,
    radius: f64,
    resolution: usize,
    geo: bool,
    json: bool,
) -> Result<()> {
    let spec = GridSpec::new(lat, lon, radius, resolution);
    spec.validate().context("Invalid grid parameters")?;
    let grid = spec.generate();

    if json {
        let out = if geo {
            serde_json::to_string(grid.geo_points())?
        } else {
            serde_json::to_string(grid.points())?
        };
        println!("{}", out);
        return Ok(());
    }

    write_csv(io::stdout().lock(), &grid, geo)
}

/// Write one `row,col` record per grid point, in local meters or lat/lon.
fn write_csv<W: Write>(out: W, grid: &Grid, geo: bool) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    if geo {
        writer.write_record(["row", "col", "lat", "lon"])?;
    } else {
        writer.write_record(["row", "col", "x", "y"])?;
    }

    for index in 0..grid.len() {
        let (row, col) = grid.row_col(index).context("Grid index out of range")?;
        let (a, b) = if geo {
            let p = grid.geo_points()[index];
            (p.lat, p.lon)
        } else {
            let p = grid.points()[index];
            (p.x, p.y)
        };
        writer.write_record([
            row.to_string(),
            col.to_string(),
            format!("{:.6}", a),
            format!("{:.6}", b),
        ])?;
    }
    writer.flush()?;

    Ok(())
}
