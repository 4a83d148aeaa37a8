/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Sampling cap for the region reductions run inside the sharpening algorithms.
pub const DEFAULT_REDUCTION_MAX_PIXELS: u64 = 1_000_000_000;

/// Sampling cap for quality metric reductions.
pub const DEFAULT_METRIC_MAX_PIXELS: u64 = 1_000_000_000_000;

/// Principal component replaced by the pan band when none is configured (1-indexed).
pub const DEFAULT_SUBSTITUTE_PC: usize = 1;

/// Weight given to each visible band when Brovey weights are incomplete.
pub const DEFAULT_BROVEY_WEIGHT: f32 = 1.0 / 3.0;

/// Eigenvalues at or below `EIGEN_SINGULAR_TOLERANCE * largest` mark a singular covariance matrix.
pub const EIGEN_SINGULAR_TOLERANCE: f64 = 1e-12;

/// Iteration cap for the symmetric eigen solver; hitting it is a `NumericFailure`.
pub const EIGEN_MAX_ITERATIONS: usize = 10_000;

/// Convergence threshold for the symmetric eigen solver.
pub const EIGEN_EPSILON: f64 = 1e-14;

/// Default CRS assigned to bands loaded without georeferencing.
pub const DEFAULT_CRS: &str = "EPSG:4326";

/// Output band names produced by the RGB algorithms.
pub const SHARPENED_RGB_NAMES: [&str; 3] = ["Rs", "Gs", "Bs"];

/// Output band names produced by Brovey sharpening.
pub const SHARPENED_RGBN_NAMES: [&str; 4] = ["Rs", "Gs", "Bs", "NIRs"];
