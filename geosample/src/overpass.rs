//! Overpass QL query strings for a bounding box.
//!
//! Only builds the query text; sending it is up to the caller.
//!
//! # Example
//!
//! ```
//! use geosample::{BoundingBox, OverpassQueryBuilder};
//!
//! let bbox = BoundingBox::new(48.1, 11.5, 48.2, 11.6);
//! let query = OverpassQueryBuilder::new().feature("building").build(&bbox);
//! assert!(query.starts_with("[out:json][timeout:25];"));
//! assert!(query.contains(r#"way["building"](48.100000,11.500000,48.200000,11.600000);"#));
//! ```

use crate::bbox::BoundingBox;

/// Default server-side timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u32 = 25;

/// A tag filter applied to ways and relations.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Selector {
    /// `["key"]`
    Key(String),
    /// `["key"="value"]`
    KeyValue(String, String),
}

impl Selector {
    fn filter(&self) -> String {
        match self {
            Selector::Key(key) => format!("[\"{}\"]", escape(key)),
            Selector::KeyValue(key, value) => {
                format!("[\"{}\"=\"{}\"]", escape(key), escape(value))
            }
        }
    }
}

/// Builder for Overpass QL queries over a bounding box.
#[derive(Debug, Clone)]
pub struct OverpassQueryBuilder {
    timeout_secs: u32,
    selectors: Vec<Selector>,
}

impl Default for OverpassQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OverpassQueryBuilder {
    pub fn new() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            selectors: Vec::new(),
        }
    }

    /// Set the server-side timeout in seconds.
    pub fn timeout(mut self, secs: u32) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Select ways and relations carrying `key` with any value.
    pub fn feature(mut self, key: &str) -> Self {
        self.selectors.push(Selector::Key(key.to_string()));
        self
    }

    /// Select ways and relations where `key` equals `value`.
    pub fn feature_value(mut self, key: &str, value: &str) -> Self {
        self.selectors
            .push(Selector::KeyValue(key.to_string(), value.to_string()));
        self
    }

    /// Render the query for `bbox`.
    ///
    /// Without any selector, defaults to `building`.
    pub fn build(&self, bbox: &BoundingBox) -> String {
        let area = bbox.to_overpass_bbox();
        let default = [Selector::Key("building".to_string())];
        let selectors = if self.selectors.is_empty() {
            &default[..]
        } else {
            &self.selectors[..]
        };

        let mut body = String::new();
        for selector in selectors {
            let filter = selector.filter();
            body.push_str(&format!("way{}({});", filter, area));
            body.push_str(&format!("relation{}({});", filter, area));
        }

        format!(
            "[out:json][timeout:{}];({});out body;>;out skel qt;",
            self.timeout_secs, body
        )
    }
}

/// Query for every building way and relation inside `bbox`.
pub fn buildings_query(bbox: &BoundingBox) -> String {
    OverpassQueryBuilder::new().feature("building").build(bbox)
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
