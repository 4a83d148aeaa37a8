mod backend;
pub mod cpu;

pub use backend::{BandStats, EigenDecomposition, RasterEngine, Reducer, Resampling};
pub use cpu::CpuEngine;
