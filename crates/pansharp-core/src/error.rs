use thiserror::Error;

#[derive(Error, Debug)]
pub enum PansharpError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Index {index} out of range (valid: 1..={count})")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Numeric failure: {0}")]
    NumericFailure(String),

    #[error("Region reduction needs {requested} pixels, exceeding maxPixels = {max_pixels}")]
    SamplingBudgetExceeded { requested: u64, max_pixels: u64 },
}

pub type Result<T> = std::result::Result<T, PansharpError>;
