//! Bounding boxes around a search center and their string forms.
//!
//! Formatting is fixed-point with [`COORD_DECIMALS`] decimals and a `.`
//! separator regardless of locale, so the strings can be pasted straight into
//! Overpass or WFS requests.

use serde::{Deserialize, Serialize};

use crate::geomath;

/// Number of decimals used when formatting coordinates (~0.1 m).
pub const COORD_DECIMALS: usize = 6;

/// A geographic bounding box in decimal degrees.
///
/// Always normalized, whatever order the corners were given in. Boxes from
/// [`bounding_box`](crate::bounding_box) with a non-zero radius are strict
/// (`south < north`, `west < east`). A zero radius gives a degenerate box
/// where both pairs are equal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Southern boundary latitude.
    pub south: f64,
    /// Western boundary longitude.
    pub west: f64,
    /// Northern boundary latitude.
    pub north: f64,
    /// Eastern boundary longitude.
    pub east: f64,
}

impl BoundingBox {
    /// Create a bounding box from two opposite corners, in any order.
    ///
    /// # Arguments
    ///
    /// * `lat_a`, `lon_a` - First corner
    /// * `lat_b`, `lon_b` - Opposite corner
    pub fn new(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> Self {
        Self {
            south: lat_a.min(lat_b),
            west: lon_a.min(lon_b),
            north: lat_a.max(lat_b),
            east: lon_a.max(lon_b),
        }
    }

    /// Bounding box of the square of half-side `radius_m` around a center.
    ///
    /// # Examples
    ///
    /// ```
    /// use geosample::BoundingBox;
    ///
    /// let bbox = BoundingBox::around(52.52, 13.405, 500.0);
    /// assert!(bbox.contains(52.52, 13.405));
    /// ```
    pub fn around(lat: f64, lon: f64, radius_m: f64) -> Self {
        geomath::bounding_box(lat, lon, radius_m)
    }

    /// Check whether `(lat, lon)` lies inside the box (edges included).
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.south..=self.north).contains(&lat) && (self.west..=self.east).contains(&lon)
    }

    /// Midpoint as `(lat, lon)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    /// The four bounds as formatted strings, in `(south, west, north, east)` order.
    pub fn to_string_tuple(&self) -> (String, String, String, String) {
        (
            format_coord(self.south),
            format_coord(self.west),
            format_coord(self.north),
            format_coord(self.east),
        )
    }

    /// Overpass QL bbox filter body: `south,west,north,east`.
    ///
    /// # Examples
    ///
    /// ```
    /// use geosample::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(1.5, 2.25, 1.0, 2.0);
    /// assert_eq!(bbox.to_overpass_bbox(), "1.000000,2.000000,1.500000,2.250000");
    /// ```
    pub fn to_overpass_bbox(&self) -> String {
        let (s, w, n, e) = self.to_string_tuple();
        format!("{},{},{},{}", s, w, n, e)
    }

    /// WFS `bbox` parameter: `west,south,east,north,EPSG:4326`.
    pub fn to_wfs_bbox(&self) -> String {
        let (s, w, n, e) = self.to_string_tuple();
        format!("{},{},{},{},EPSG:4326", w, s, e, n)
    }

    /// Split into `steps × steps` equal tiles.
    ///
    /// Tiles are returned row by row from south to north, west to east within
    /// a row. `steps == 0` is treated as 1.
    pub fn split(&self, steps: usize) -> Vec<BoundingBox> {
        let steps = steps.max(1);
        let lat_step = (self.north - self.south) / steps as f64;
        let lon_step = (self.east - self.west) / steps as f64;

        let mut tiles = Vec::with_capacity(steps * steps);
        for i in 0..steps {
            for j in 0..steps {
                tiles.push(BoundingBox::new(
                    self.south + i as f64 * lat_step,
                    self.west + j as f64 * lon_step,
                    self.south + (i + 1) as f64 * lat_step,
                    self.west + (j + 1) as f64 * lon_step,
                ));
            }
        }
        tiles
    }
}

/// Number of tiles per axis to split a download of this radius into.
///
/// Small areas go in one request; larger ones are split so that each request
/// stays within typical server timeouts.
pub fn adaptive_tile_steps(radius_m: f64) -> usize {
    if radius_m <= 251.0 {
        1
    } else if radius_m <= 500.0 {
        2
    } else {
        4
    }
}

fn format_coord(value: f64) -> String {
    format!("{:.*}", COORD_DECIMALS, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_corners() {
        let bbox = BoundingBox::new(10.0, 20.0, 5.0, 15.0);
        assert_eq!(bbox.south, 5.0);
        assert_eq!(bbox.west, 15.0);
        assert_eq!(bbox.north, 10.0);
        assert_eq!(bbox.east, 20.0);
    }

    #[test]
    fn test_around_contains_center() {
        let bbox = BoundingBox::around(-33.8688, 151.2093, 1_000.0);
        assert!(bbox.contains(-33.8688, 151.2093));
        assert!(!bbox.contains(-33.0, 151.2093));

        let (lat, lon) = bbox.center();
        assert!((lat + 33.8688).abs() < 1e-9);
        assert!((lon - 151.2093).abs() < 1e-9);
    }

    #[test]
    fn test_string_tuple() {
        let bbox = BoundingBox::new(-0.5, -1.25, 0.5, 1.25);
        let (s, w, n, e) = bbox.to_string_tuple();
        assert_eq!(s, "-0.500000");
        assert_eq!(w, "-1.250000");
        assert_eq!(n, "0.500000");
        assert_eq!(e, "1.250000");
    }

    #[test]
    fn test_overpass_and_wfs_order() {
        let bbox = BoundingBox::new(48.1, 11.5, 48.2, 11.6);
        assert_eq!(
            bbox.to_overpass_bbox(),
            "48.100000,11.500000,48.200000,11.600000"
        );
        assert_eq!(
            bbox.to_wfs_bbox(),
            "11.500000,48.100000,11.600000,48.200000,EPSG:4326"
        );
    }

    #[test]
    fn test_split_covers_box() {
        let bbox = BoundingBox::new(0.0, 0.0, 2.0, 4.0);
        let tiles = bbox.split(2);
        assert_eq!(tiles.len(), 4);

        // South row first, west to east
        assert_eq!(tiles[0], BoundingBox::new(0.0, 0.0, 1.0, 2.0));
        assert_eq!(tiles[1], BoundingBox::new(0.0, 2.0, 1.0, 4.0));
        assert_eq!(tiles[2], BoundingBox::new(1.0, 0.0, 2.0, 2.0));
        assert_eq!(tiles[3], BoundingBox::new(1.0, 2.0, 2.0, 4.0));
    }

    #[test]
    fn test_split_zero_steps() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(bbox.split(0), vec![bbox]);
    }

    #[test]
    fn test_adaptive_tile_steps() {
        assert_eq!(adaptive_tile_steps(100.0), 1);
        assert_eq!(adaptive_tile_steps(251.0), 1);
        assert_eq!(adaptive_tile_steps(400.0), 2);
        assert_eq!(adaptive_tile_steps(500.0), 2);
        assert_eq!(adaptive_tile_steps(1_000.0), 4);
    }
}
