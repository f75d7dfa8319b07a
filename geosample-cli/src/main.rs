use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod commands;

/// Sampling grid, IDW interpolation and Overpass query tool
#[derive(Parser)]
#[command(name = "geosample")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of nearest samples used per interpolated point
    #[arg(long, env = "GEOSAMPLE_IDW_K", default_value = "8", global = true)]
    k: usize,

    /// IDW distance exponent
    #[arg(long, env = "GEOSAMPLE_IDW_POWER", default_value = "2.0", global = true)]
    power: f64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a square sampling grid around a center point
    Grid {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Half-width of the grid in meters
        #[arg(short, long, env = "GEOSAMPLE_RADIUS", default_value = "500")]
        radius: f64,

        /// Points per axis
        #[arg(long, env = "GEOSAMPLE_RESOLUTION", default_value = "25")]
        resolution: usize,

        /// Print lat/lon instead of local meters
        #[arg(short, long)]
        geo: bool,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Print the bounding box around a center point
    Bbox {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Radius in meters
        #[arg(short, long, env = "GEOSAMPLE_RADIUS", default_value = "500")]
        radius: f64,

        /// Output format
        #[arg(short, long, value_enum, default_value = "overpass")]
        format: BboxFormat,
    },

    /// Print an Overpass QL query for buildings around a center point
    Overpass {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Radius in meters
        #[arg(short, long, env = "GEOSAMPLE_RADIUS", default_value = "500")]
        radius: f64,

        /// Server-side timeout in seconds
        #[arg(short, long, default_value = "25")]
        timeout: u32,
    },

    /// Interpolate a sampling grid from elevation samples
    Interpolate {
        /// Samples file (CSV with lat/lon/elevation columns, or GeoJSON)
        input: PathBuf,

        /// Latitude of the grid center
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude of the grid center
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Half-width of the grid in meters
        #[arg(short, long, env = "GEOSAMPLE_RADIUS", default_value = "500")]
        radius: f64,

        /// Points per axis
        #[arg(long, env = "GEOSAMPLE_RESOLUTION", default_value = "25")]
        resolution: usize,

        /// Output CSV file (defaults to <input>_grid.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Estimate a building's height from its tags
    Height {
        /// Tag as key=value (repeatable)
        #[arg(short, long = "tag", value_name = "KEY=VALUE")]
        tags: Vec<String>,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum BboxFormat {
    /// south,west,north,east
    Overpass,
    /// west,south,east,north,EPSG:4326
    Wfs,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Grid {
            lat,
            lon,
            radius,
            resolution,
            geo,
            json,
        } => commands::grid::run(lat, lon, radius, resolution, geo, json),
        Commands::Bbox {
            lat,
            lon,
            radius,
            format,
        } => commands::bbox::run(lat, lon, radius, format),
        Commands::Overpass {
            lat,
            lon,
            radius,
            timeout,
        } => commands::overpass::run(lat, lon, radius, timeout),
        Commands::Interpolate {
            input,
            lat,
            lon,
            radius,
            resolution,
            output,
        } => commands::interpolate::run(
            input, lat, lon, radius, resolution, cli.k, cli.power, output,
        ),
        Commands::Height { tags, json } => commands::height::run(tags, json),
    }
}
