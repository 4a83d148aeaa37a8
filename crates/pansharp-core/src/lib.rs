pub mod color;
pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod helpers;
pub mod io;
pub mod quality;
pub mod raster;
pub mod sharpen;
