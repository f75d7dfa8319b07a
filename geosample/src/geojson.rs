//! GeoJSON adapters for samples, draping and building heights.
//!
//! Enable the `geojson` feature to use this module.
//!
//! Positions follow GeoJSON order, `[longitude, latitude]` or
//! `[longitude, latitude, altitude]`, and are projected onto the local plane
//! around a caller-supplied center before any interpolation.
//!
//! # Example
//!
//! ```ignore
//! use geosample::geojson::{add_elevations_to_geometry, samples_from_features, DEFAULT_ELEVATION_KEYS};
//! use geosample::{GeoPoint, IdwInterpolator};
//!
//! let center = GeoPoint::new(46.55, 7.98);
//! let samples = samples_from_features(&contours, center, DEFAULT_ELEVATION_KEYS)?;
//!
//! let line: geojson::Geometry = r#"{"type": "LineString", "coordinates": [[7.98, 46.55], [7.99, 46.56]]}"#
//!     .parse()
//!     .unwrap();
//! let draped = add_elevations_to_geometry(&IdwInterpolator::default(), &samples, center, line)?;
//! ```

use std::collections::HashSet;

use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value as GeoJsonValue};
use serde::Serialize;

use crate::building::{building_type, height_meters, parse_length_meters, BuildingTags};
use crate::error::{GeoError, Result};
use crate::geomath::LocalProjection;
use crate::idw::IdwInterpolator;
use crate::types::{ElevationSample, GeoPoint, LocalPoint};

/// Property keys searched, in order, for a feature's elevation.
pub const DEFAULT_ELEVATION_KEYS: &[&str] = &["ele", "elevation", "height"];

/// Height estimate for one building feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingHeight {
    /// Feature id, if the feature had one.
    pub id: Option<String>,
    /// Value of the `building` property, or `"Unknown"`.
    pub building_type: String,
    /// Estimated height in meters.
    pub height: f64,
}

/// Extract elevation samples from point and contour features.
///
/// - `Point` / `MultiPoint`: the position's Z coordinate, or the feature's
///   elevation property when there is no Z.
/// - `LineString` / `MultiLineString` / `Polygon` / `MultiPolygon`: every
///   vertex, at the feature's elevation property (contour lines), falling
///   back to the vertex Z.
///
/// Positions without any elevation are skipped, as are features without
/// geometry. Samples come out in feature order, then position order.
///
/// # Errors
///
/// Returns [`GeoError::InvalidCoordinate`] for a position with fewer than two
/// elements.
pub fn samples_from_features(
    collection: &FeatureCollection,
    center: GeoPoint,
    elevation_keys: &[&str],
) -> Result<Vec<ElevationSample>> {
    let projection = LocalProjection::new(center);
    let mut samples = Vec::new();

    for feature in &collection.features {
        let Some(geometry) = &feature.geometry else {
            continue;
        };
        let property_elevation = feature_elevation(feature, elevation_keys);
        collect_samples(&projection, &geometry.value, property_elevation, &mut samples)?;
    }

    Ok(samples)
}

fn collect_samples(
    projection: &LocalProjection,
    value: &GeoJsonValue,
    property_elevation: Option<f64>,
    out: &mut Vec<ElevationSample>,
) -> Result<()> {
    match value {
        GeoJsonValue::Point(pos) => {
            push_sample(projection, pos, pos_z(pos).or(property_elevation), out)?;
        }
        GeoJsonValue::MultiPoint(positions) => {
            for pos in positions {
                push_sample(projection, pos, pos_z(pos).or(property_elevation), out)?;
            }
        }
        GeoJsonValue::LineString(positions) => {
            push_contour(projection, positions, property_elevation, out)?;
        }
        GeoJsonValue::MultiLineString(lines) => {
            for line in lines {
                push_contour(projection, line, property_elevation, out)?;
            }
        }
        GeoJsonValue::Polygon(rings) => {
            for ring in rings {
                push_contour(projection, ring, property_elevation, out)?;
            }
        }
        GeoJsonValue::MultiPolygon(polygons) => {
            for ring in polygons.iter().flatten() {
                push_contour(projection, ring, property_elevation, out)?;
            }
        }
        GeoJsonValue::GeometryCollection(geometries) => {
            for g in geometries {
                collect_samples(projection, &g.value, property_elevation, out)?;
            }
        }
    }
    Ok(())
}

fn push_contour(
    projection: &LocalProjection,
    positions: &[Vec<f64>],
    property_elevation: Option<f64>,
    out: &mut Vec<ElevationSample>,
) -> Result<()> {
    for pos in positions {
        push_sample(projection, pos, property_elevation.or(pos_z(pos)), out)?;
    }
    Ok(())
}

fn push_sample(
    projection: &LocalProjection,
    pos: &[f64],
    elevation: Option<f64>,
    out: &mut Vec<ElevationSample>,
) -> Result<()> {
    let local = project(projection, pos)?;
    if let Some(elevation) = elevation {
        out.push(ElevationSample::at(local, elevation));
    }
    Ok(())
}

/// Add interpolated elevations to all coordinates in a GeoJSON geometry.
///
/// Every position gets the elevation estimated by `idw` from `samples` as its
/// Z coordinate; an existing Z is overwritten. All geometry types are
/// supported, including nested collections.
///
/// # Errors
///
/// Returns [`GeoError::InvalidCoordinate`] if any position has fewer than two
/// elements.
pub fn add_elevations_to_geometry(
    idw: &IdwInterpolator,
    samples: &[ElevationSample],
    center: GeoPoint,
    geometry: Geometry,
) -> Result<Geometry> {
    let projection = LocalProjection::new(center);
    drape_geometry(idw, samples, &projection, geometry)
}

fn drape_geometry(
    idw: &IdwInterpolator,
    samples: &[ElevationSample],
    projection: &LocalProjection,
    geometry: Geometry,
) -> Result<Geometry> {
    let drape = |coords: &[Vec<f64>]| -> Result<Vec<Vec<f64>>> {
        coords
            .iter()
            .map(|c| add_elevation_to_position(idw, samples, projection, c))
            .collect()
    };

    let new_value = match geometry.value {
        GeoJsonValue::Point(coord) => {
            GeoJsonValue::Point(add_elevation_to_position(idw, samples, projection, &coord)?)
        }
        GeoJsonValue::MultiPoint(coords) => GeoJsonValue::MultiPoint(drape(&coords)?),
        GeoJsonValue::LineString(coords) => GeoJsonValue::LineString(drape(&coords)?),
        GeoJsonValue::MultiLineString(lines) => {
            let elevated: Result<Vec<_>> = lines.iter().map(|line| drape(line)).collect();
            GeoJsonValue::MultiLineString(elevated?)
        }
        GeoJsonValue::Polygon(rings) => {
            let elevated: Result<Vec<_>> = rings.iter().map(|ring| drape(ring)).collect();
            GeoJsonValue::Polygon(elevated?)
        }
        GeoJsonValue::MultiPolygon(polygons) => {
            let elevated: Result<Vec<_>> = polygons
                .iter()
                .map(|polygon| {
                    polygon
                        .iter()
                        .map(|ring| drape(ring))
                        .collect::<Result<Vec<_>>>()
                })
                .collect();
            GeoJsonValue::MultiPolygon(elevated?)
        }
        GeoJsonValue::GeometryCollection(geometries) => {
            let elevated: Result<Vec<_>> = geometries
                .into_iter()
                .map(|g| drape_geometry(idw, samples, projection, g))
                .collect();
            GeoJsonValue::GeometryCollection(elevated?)
        }
    };

    Ok(Geometry::new(new_value))
}

/// Return `[lon, lat, elevation]` for one position.
fn add_elevation_to_position(
    idw: &IdwInterpolator,
    samples: &[ElevationSample],
    projection: &LocalProjection,
    coord: &[f64],
) -> Result<Vec<f64>> {
    let local = project(projection, coord)?;
    let elevation = idw.interpolate_point(local, samples);
    Ok(vec![coord[0], coord[1], elevation])
}

/// Estimate the height of every building feature.
///
/// Features sharing an id are reported once (the first occurrence wins), so
/// collections assembled from overlapping download tiles can be passed in
/// directly. Features without an id are always kept.
pub fn building_heights(collection: &FeatureCollection) -> Vec<BuildingHeight> {
    let mut seen = HashSet::new();
    let mut heights = Vec::new();

    for feature in &collection.features {
        let id = feature.id.as_ref().map(id_to_string);
        if let Some(id) = &id {
            if !seen.insert(id.clone()) {
                continue;
            }
        }

        let tags = feature
            .properties
            .as_ref()
            .map(tags_from_properties)
            .unwrap_or_default();

        heights.push(BuildingHeight {
            id,
            building_type: building_type(&tags),
            height: height_meters(&tags),
        });
    }

    heights
}

/// Convert GeoJSON properties to [`BuildingTags`].
///
/// Strings, numbers and booleans are kept as text; other values are dropped.
pub fn tags_from_properties(properties: &JsonObject) -> BuildingTags {
    properties
        .iter()
        .filter_map(|(k, v)| scalar_text(v).map(|v| (k.clone(), v)))
        .collect()
}

fn scalar_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn id_to_string(id: &Id) -> String {
    match id {
        Id::String(s) => s.clone(),
        Id::Number(n) => n.to_string(),
    }
}

/// First elevation property found on the feature.
fn feature_elevation(feature: &Feature, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| match feature.property(key)? {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => parse_length_meters(s),
        _ => None,
    })
}

fn pos_z(pos: &[f64]) -> Option<f64> {
    pos.get(2).copied().filter(|z| z.is_finite())
}

fn project(projection: &LocalProjection, pos: &[f64]) -> Result<LocalPoint> {
    if pos.len() < 2 {
        return Err(GeoError::InvalidCoordinate {
            message: "Position must have at least 2 elements (lon, lat)".to_string(),
        });
    }
    Ok(projection.to_local(GeoPoint::new(pos[1], pos[0])))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(value: GeoJsonValue, properties: serde_json::Value) -> Feature {
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(value)),
            id: None,
            properties: properties.as_object().cloned(),
            foreign_members: None,
        }
    }

    fn collection(features: Vec<Feature>) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    const CENTER: GeoPoint = GeoPoint {
        lat: 46.55,
        lon: 7.98,
    };

    #[test]
    fn test_point_samples_use_z_then_property() {
        let fc = collection(vec![
            feature(
                GeoJsonValue::Point(vec![7.98, 46.55, 2100.0]),
                serde_json::json!({"ele": 5.0}),
            ),
            feature(
                GeoJsonValue::Point(vec![7.99, 46.55]),
                serde_json::json!({"ele": "2150 m"}),
            ),
            // No elevation anywhere: skipped
            feature(GeoJsonValue::Point(vec![7.97, 46.55]), serde_json::json!({})),
        ]);

        let samples = samples_from_features(&fc, CENTER, DEFAULT_ELEVATION_KEYS).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].elevation, 2100.0);
        assert!(samples[0].x.abs() < 1e-9 && samples[0].y.abs() < 1e-9);
        assert_eq!(samples[1].elevation, 2150.0);
        assert!(samples[1].x > 0.0);
    }

    #[test]
    fn test_contour_vertices_take_feature_elevation() {
        let fc = collection(vec![
            feature(
                GeoJsonValue::LineString(vec![vec![7.97, 46.54], vec![7.98, 46.545], vec![7.99, 46.54]]),
                serde_json::json!({"elevation": 1800}),
            ),
            feature(
                GeoJsonValue::MultiLineString(vec![
                    vec![vec![7.97, 46.56], vec![7.99, 46.56]],
                    vec![vec![7.96, 46.57], vec![8.0, 46.57]],
                ]),
                serde_json::json!({"ele": 1900.0}),
            ),
        ]);

        let samples = samples_from_features(&fc, CENTER, DEFAULT_ELEVATION_KEYS).unwrap();
        assert_eq!(samples.len(), 7);
        assert!(samples[..3].iter().all(|s| s.elevation == 1800.0));
        assert!(samples[3..].iter().all(|s| s.elevation == 1900.0));
        // South of center projects to negative y
        assert!(samples[0].y < 0.0);
    }

    #[test]
    fn test_custom_keys_and_missing_geometry() {
        let mut no_geometry = feature(GeoJsonValue::Point(vec![0.0, 0.0]), serde_json::json!({}));
        no_geometry.geometry = None;

        let fc = collection(vec![
            no_geometry,
            feature(
                GeoJsonValue::Point(vec![7.98, 46.55]),
                serde_json::json!({"alt": 10.0, "ele": 99.0}),
            ),
        ]);
        let samples = samples_from_features(&fc, CENTER, &["alt"]).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].elevation, 10.0);
    }

    #[test]
    fn test_short_position_is_error() {
        let fc = collection(vec![feature(
            GeoJsonValue::Point(vec![7.98]),
            serde_json::json!({"ele": 1.0}),
        )]);
        assert!(matches!(
            samples_from_features(&fc, CENTER, DEFAULT_ELEVATION_KEYS),
            Err(GeoError::InvalidCoordinate { .. })
        ));
    }

    fn flat_samples() -> Vec<ElevationSample> {
        vec![
            ElevationSample::new(-100.0, -100.0, 500.0),
            ElevationSample::new(100.0, -100.0, 500.0),
            ElevationSample::new(-100.0, 100.0, 500.0),
            ElevationSample::new(100.0, 100.0, 500.0),
        ]
    }

    #[test]
    fn test_drape_point() {
        let idw = IdwInterpolator::default();
        let geometry = Geometry::new(GeoJsonValue::Point(vec![7.98, 46.55]));
        let result = add_elevations_to_geometry(&idw, &flat_samples(), CENTER, geometry).unwrap();

        if let GeoJsonValue::Point(coord) = result.value {
            assert_eq!(coord.len(), 3);
            assert_eq!(coord[0], 7.98);
            assert_eq!(coord[1], 46.55);
            assert!((coord[2] - 500.0).abs() < 1e-9);
        } else {
            panic!("Expected Point geometry");
        }
    }

    #[test]
    fn test_drape_overwrites_existing_z() {
        let idw = IdwInterpolator::default();
        let geometry = Geometry::new(GeoJsonValue::LineString(vec![
            vec![7.98, 46.55, -1.0],
            vec![7.981, 46.551, -1.0],
        ]));
        let result = add_elevations_to_geometry(&idw, &flat_samples(), CENTER, geometry).unwrap();

        if let GeoJsonValue::LineString(coords) = result.value {
            assert_eq!(coords.len(), 2);
            assert!(coords.iter().all(|c| c.len() == 3 && (c[2] - 500.0).abs() < 1e-9));
        } else {
            panic!("Expected LineString geometry");
        }
    }

    #[test]
    fn test_drape_polygon_and_collection() {
        let idw = IdwInterpolator::default();
        let ring = vec![
            vec![7.98, 46.55],
            vec![7.981, 46.55],
            vec![7.9805, 46.551],
            vec![7.98, 46.55],
        ];
        let geometry = Geometry::new(GeoJsonValue::GeometryCollection(vec![
            Geometry::new(GeoJsonValue::Polygon(vec![ring.clone()])),
            Geometry::new(GeoJsonValue::MultiPolygon(vec![vec![ring]])),
        ]));
        let result = add_elevations_to_geometry(&idw, &flat_samples(), CENTER, geometry).unwrap();

        if let GeoJsonValue::GeometryCollection(geometries) = result.value {
            assert_eq!(geometries.len(), 2);
            if let GeoJsonValue::Polygon(rings) = &geometries[0].value {
                assert_eq!(rings[0].len(), 4);
                assert!(rings[0].iter().all(|c| c.len() == 3));
            } else {
                panic!("Expected Polygon geometry");
            }
        } else {
            panic!("Expected GeometryCollection");
        }
    }

    #[test]
    fn test_drape_without_samples_is_zero() {
        let idw = IdwInterpolator::default();
        let geometry = Geometry::new(GeoJsonValue::MultiPoint(vec![vec![1.0, 2.0], vec![3.0, 4.0]]));
        let result = add_elevations_to_geometry(&idw, &[], CENTER, geometry).unwrap();

        if let GeoJsonValue::MultiPoint(coords) = result.value {
            assert!(coords.iter().all(|c| c[2] == 0.0));
        } else {
            panic!("Expected MultiPoint geometry");
        }
    }

    #[test]
    fn test_drape_short_position_is_error() {
        let idw = IdwInterpolator::default();
        let geometry = Geometry::new(GeoJsonValue::LineString(vec![vec![7.98, 46.55], vec![7.98]]));
        assert!(add_elevations_to_geometry(&idw, &flat_samples(), CENTER, geometry).is_err());
    }

    #[test]
    fn test_building_heights_dedup_by_id() {
        let footprint = GeoJsonValue::Polygon(vec![vec![
            vec![7.98, 46.55],
            vec![7.981, 46.55],
            vec![7.981, 46.551],
            vec![7.98, 46.55],
        ]]);

        let mut a = feature(footprint.clone(), serde_json::json!({"building": "school"}));
        a.id = Some(Id::String("way/1".to_string()));
        let mut duplicate = feature(footprint.clone(), serde_json::json!({"building": "house"}));
        duplicate.id = Some(Id::String("way/1".to_string()));
        let mut b = feature(footprint.clone(), serde_json::json!({"height": 18.5}));
        b.id = Some(Id::Number(42.into()));
        let anonymous = feature(footprint, serde_json::json!({"building:levels": "3"}));
        let mut no_props = feature(GeoJsonValue::Point(vec![0.0, 0.0]), serde_json::json!({}));
        no_props.properties = None;

        let heights = building_heights(&collection(vec![a, duplicate, b, anonymous, no_props]));
        assert_eq!(heights.len(), 4);

        assert_eq!(heights[0].id.as_deref(), Some("way/1"));
        assert_eq!(heights[0].building_type, "school");
        assert_eq!(heights[0].height, 15.0);

        assert_eq!(heights[1].id.as_deref(), Some("42"));
        assert_eq!(heights[1].height, 18.5);

        assert_eq!(heights[2].id, None);
        assert_eq!(heights[2].height, 9.0);

        assert_eq!(heights[3].building_type, "Unknown");
        assert_eq!(heights[3].height, 6.0);
    }

    #[test]
    fn test_tags_from_properties() {
        let props = serde_json::json!({"building": "retail", "height": 7, "roof": null, "x": [1]});
        let tags = tags_from_properties(props.as_object().unwrap());
        assert_eq!(tags.get("building"), Some("retail"));
        assert_eq!(tags.get("height"), Some("7"));
        assert_eq!(tags.len(), 2);
    }
}
