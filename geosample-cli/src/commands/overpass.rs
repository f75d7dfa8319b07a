use anyhow::{ensure, Result};
use geosample::{bounding_box, OverpassQueryBuilder};

pub fn run(lat: f64, lon: f64, radius: f64, timeout: u32) -> Result<()> {
    println!("{}", query(lat, lon, radius, timeout)?);
    Ok(())
}

fn query(lat: f64, lon: f64, radius: f64, timeout: u32) -> Result<String> {
    ensure!(
        radius.is_finite() && radius > 0.0,
        "Radius must be positive, got {}",
        radius
    );

    let bbox = bounding_box(lat, lon, radius);
    Ok(OverpassQueryBuilder::new()
        .timeout(timeout)
        .feature("building")
        .build(&bbox))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_covers_buildings_in_box() {
        let q = query(0.0, 0.0, 1110.0, 60).unwrap();
        assert!(q.contains("[timeout:60]"));
        assert!(q.contains("way[\"building\"](-0.010000,-0.010000,0.010000,0.010000);"));
    }

    #[test]
    fn test_query_rejects_non_positive_radius() {
        assert!(query(0.0, 0.0, 0.0, 25).is_err());
        assert!(query(0.0, 0.0, -1.0, 25).is_err());
    }
}
