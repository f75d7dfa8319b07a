use anyhow::{Context, Result};
use geosample::building::{building_type, height_meters, BuildingTags};
use serde::Serialize;

#[derive(Serialize)]
struct HeightResponse {
    height: f64,
    building_type: String,
}

pub fn run(tags: Vec<String>, json: bool) -> Result<()> {
    let tags = parse_tags(&tags)?;
    let height = height_meters(&tags);

    if json {
        let response = HeightResponse {
            height,
            building_type: building_type(&tags),
        };
        println!("{}", serde_json::to_string(&response)?);
    } else {
        println!("{:.2}", height);
    }

    Ok(())
}

/// Parse `key=value` arguments. Only the first `=` separates key and value.
fn parse_tags(raw: &[String]) -> Result<BuildingTags> {
    raw.iter()
        .map(|arg| {
            arg.split_once('=')
                .map(|(k, v)| (k.trim(), v))
                .with_context(|| format!("Invalid tag '{}', expected key=value", arg))
        })
        .collect()
}
