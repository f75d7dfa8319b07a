//! Building height estimation from OpenStreetMap-style tags.
//!
//! [`height_meters`] resolves a height through a fixed precedence chain:
//!
//! 1. an explicit `height` tag (`"12"`, `"12.5 m"`, `"30ft"`),
//! 2. `building:levels` at 3 m per level (never below 3 m),
//! 3. a default for the `building` type.
//!
//! The first rule that yields a value wins.

use std::collections::BTreeMap;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Tag holding an explicit height.
pub const HEIGHT_TAG: &str = "height";

/// Tag holding the number of above-ground levels.
pub const LEVELS_TAG: &str = "building:levels";

/// Tag holding the building type.
pub const BUILDING_TAG: &str = "building";

/// Type reported when the `building` tag is missing.
pub const UNKNOWN_TYPE: &str = "Unknown";

/// Height of one level in meters.
pub const METERS_PER_LEVEL: f64 = 3.0;

/// Lower bound for level-derived heights.
pub const MIN_LEVEL_HEIGHT: f64 = 3.0;

/// Height for types without a specific default.
pub const DEFAULT_HEIGHT: f64 = 6.0;

const FEET_TO_METERS: f64 = 0.3048;

/// String-keyed building metadata.
///
/// Blank values are treated as absent.
///
/// # Example
///
/// ```
/// use geosample::building::{height_meters, BuildingTags};
///
/// let tags: BuildingTags = [("building", "apartments"), ("building:levels", "5")]
///     .into_iter()
///     .collect();
/// assert_eq!(height_meters(&tags), 15.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BuildingTags(BTreeMap<String, String>);

impl BuildingTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a tag, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Value of `key`, or `None` if missing or blank.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for BuildingTags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A scalar property value as found in JSON tag objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum TagScalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
    Other(IgnoredAny),
}

impl TagScalar {
    fn into_text(self) -> Option<String> {
        match self {
            TagScalar::Text(s) => Some(s),
            TagScalar::Integer(i) => Some(i.to_string()),
            TagScalar::Float(f) => Some(f.to_string()),
            TagScalar::Flag(b) => Some(b.to_string()),
            TagScalar::Other(_) => None,
        }
    }
}

/// Accepts any JSON object. Numbers and booleans are stored as text; nulls,
/// arrays and nested objects are dropped.
impl<'de> Deserialize<'de> for BuildingTags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw: BTreeMap<String, Option<TagScalar>> = BTreeMap::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(k, v)| v.and_then(TagScalar::into_text).map(|v| (k, v)))
            .collect())
    }
}

/// Estimate a building's height in meters.
///
/// Never fails: missing or unparsable tags fall through to the next rule, and
/// empty tags yield [`DEFAULT_HEIGHT`].
pub fn height_meters(tags: &BuildingTags) -> f64 {
    if let Some(height) = tags.get(HEIGHT_TAG).and_then(parse_length_meters) {
        return height;
    }

    if let Some(levels) = tags
        .get(LEVELS_TAG)
        .and_then(|l| l.parse::<i64>().ok())
    {
        return (levels as f64 * METERS_PER_LEVEL).max(MIN_LEVEL_HEIGHT);
    }

    default_height_for_type(&building_type(tags))
}

/// The `building` tag value, or [`UNKNOWN_TYPE`] if missing.
pub fn building_type(tags: &BuildingTags) -> String {
    tags.get(BUILDING_TAG).unwrap_or(UNKNOWN_TYPE).to_string()
}

/// Default height for a building type (case-insensitive).
pub fn default_height_for_type(building_type: &str) -> f64 {
    match building_type.trim().to_lowercase().as_str() {
        "house" | "residential" => 6.0,
        "apartments" => 12.0,
        "commercial" | "retail" => 8.0,
        "industrial" => 10.0,
        "school" | "hospital" => 15.0,
        _ => DEFAULT_HEIGHT,
    }
}

/// Parse a length such as `"12"`, `"12.5 m"` or `"30ft"` into meters.
///
/// Values containing `ft` are converted from feet. Non-finite numbers are
/// rejected.
///
/// # Examples
///
/// ```
/// use geosample::building::parse_length_meters;
///
/// assert_eq!(parse_length_meters("12.5 m"), Some(12.5));
/// assert!((parse_length_meters("30ft").unwrap() - 9.144).abs() < 1e-9);
/// assert_eq!(parse_length_meters("tall"), None);
/// ```
pub fn parse_length_meters(raw: &str) -> Option<f64> {
    let lower = raw.trim().to_lowercase();
    let is_feet = lower.contains("ft");

    let number = lower
        .strip_suffix("ft")
        .or_else(|| lower.strip_suffix('m'))
        .unwrap_or(lower.as_str())
        .trim();

    let value: f64 = number.parse().ok().filter(|v: &f64| v.is_finite())?;

    Some(if is_feet { value * FEET_TO_METERS } else { value })
}
