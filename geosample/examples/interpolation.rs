//! Example interpolating a sampling grid from scattered elevation samples.
//!
//! Run with: cargo run --example interpolation

use geosample::{ElevationSample, GeoError, GridSpec, IdwInterpolator};

fn main() -> Result<(), GeoError> {
    let spec = GridSpec::new(46.55, 7.98, 300.0, 7);
    spec.validate()?;
    let grid = spec.generate();

    // Four surveyed spot heights around the center
    let samples = vec![
        ElevationSample::new(-200.0, -200.0, 2010.0),
        ElevationSample::new(200.0, -200.0, 2040.0),
        ElevationSample::new(-200.0, 200.0, 2080.0),
        ElevationSample::new(200.0, 200.0, 2130.0),
    ];

    // Compare a sharp and a smooth distance exponent
    for power in [1.0, 2.0, 4.0] {
        let idw = IdwInterpolator::new(4, power);
        let elevations = idw.interpolate_many(grid.points(), &samples);

        println!("power = {}", power);
        println!("{:-<60}", "");
        for row in elevations.chunks(grid.resolution()).rev() {
            let line: Vec<String> = row.iter().map(|e| format!("{:7.1}", e)).collect();
            println!("{}", line.join(" "));
        }
        println!();
    }

    Ok(())
}
