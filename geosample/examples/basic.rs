//! Basic example demonstrating geosample library usage.
//!
//! Run with: cargo run --example basic -- [lat] [lon]

use geosample::{
    bounding_box, buildings_query, generate_local_grid_points, to_local_xy, GeoError,
};
use std::env;

fn main() -> Result<(), GeoError> {
    let mut args = env::args().skip(1);
    let lat: f64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(35.3606);
    let lon: f64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(138.7274);

    let bbox = bounding_box(lat, lon, 1_000.0);
    println!("Search area around ({}, {}):", lat, lon);
    println!("{:-<50}", "");
    println!("  Overpass bbox: {}", bbox.to_overpass_bbox());
    println!("  WFS bbox:      {}", bbox.to_wfs_bbox());

    // A few landmarks relative to the center
    let offsets = [("north", 0.005, 0.0), ("east", 0.0, 0.005), ("south-west", -0.003, -0.003)];
    println!("\nLocal coordinates:");
    for (name, dlat, dlon) in &offsets {
        let p = to_local_xy(lat + dlat, lon + dlon, lat, lon);
        println!("  {:<12} x = {:>8.1} m, y = {:>8.1} m", name, p.x, p.y);
    }

    let grid = generate_local_grid_points(lat, lon, 1_000.0, 5);
    println!("\n5x5 grid, first row:");
    for p in grid.iter().take(5) {
        println!("  ({:>8.1}, {:>8.1})", p.x, p.y);
    }

    println!("\nOverpass query:\n{}", buildings_query(&bbox));

    Ok(())
}
