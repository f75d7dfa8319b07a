use anyhow::{ensure, Result};
use geosample::{bounding_box, BoundingBox};
use serde::Serialize;

use crate::BboxFormat;

#[derive(Serialize)]
struct BboxResponse {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
    overpass: String,
    wfs: String,
}

pub fn run(lat: f64, lon: f64, radius: f64, format: BboxFormat) -> Result<()> {
    ensure!(
        radius.is_finite() && radius > 0.0,
        "Radius must be positive, got {}",
        radius
    );

    let bbox = bounding_box(lat, lon, radius);
    println!("{}", render(&bbox, format)?);
    Ok(())
}

fn render(bbox: &BoundingBox, format: BboxFormat) -> Result<String> {
    let out = match format {
        BboxFormat::Overpass => bbox.to_overpass_bbox(),
        BboxFormat::Wfs => bbox.to_wfs_bbox(),
        BboxFormat::Json => serde_json::to_string(&BboxResponse {
            south: bbox.south,
            west: bbox.west,
            north: bbox.north,
            east: bbox.east,
            overpass: bbox.to_overpass_bbox(),
            wfs: bbox.to_wfs_bbox(),
        })?,
    };
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_overpass_and_wfs() {
        let bbox = bounding_box(0.0, 0.0, 1110.0);
        assert_eq!(
            render(&bbox, BboxFormat::Overpass).unwrap(),
            "-0.010000,-0.010000,0.010000,0.010000"
        );
        assert_eq!(
            render(&bbox, BboxFormat::Wfs).unwrap(),
            "-0.010000,-0.010000,0.010000,0.010000,EPSG:4326"
        );
    }

    #[test]
    fn test_render_wfs_puts_longitude_first() {
        let bbox = BoundingBox::new(46.5, 7.9, 46.6, 8.1);
        assert_eq!(
            render(&bbox, BboxFormat::Wfs).unwrap(),
            "7.900000,46.500000,8.100000,46.600000,EPSG:4326"
        );
    }

    #[test]
    fn test_render_json() {
        let bbox = BoundingBox::new(46.5, 7.9, 46.6, 8.1);
        let json: serde_json::Value =
            serde_json::from_str(&render(&bbox, BboxFormat::Json).unwrap()).unwrap();
        assert_eq!(json["south"], 46.5);
        assert_eq!(json["east"], 8.1);
        assert_eq!(json["overpass"], "46.500000,7.900000,46.600000,8.100000");
        assert_eq!(json["wfs"], "7.900000,46.500000,8.100000,46.600000,EPSG:4326");
    }

    #[test]
    fn test_run_rejects_non_positive_radius() {
        assert!(run(0.0, 0.0, 0.0, BboxFormat::Overpass).is_err());
        assert!(run(0.0, 0.0, -10.0, BboxFormat::Wfs).is_err());
        assert!(run(0.0, 0.0, f64::NAN, BboxFormat::Json).is_err());
    }
}
