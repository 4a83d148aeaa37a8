pub mod config;
pub mod quality;
pub mod sharpen;
