pub mod bbox;
pub mod grid;
pub mod height;
pub mod interpolate;
pub mod overpass;
