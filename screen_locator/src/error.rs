use std::path::PathBuf;

use thiserror::Error;

/// Every hard failure the locator can surface. An empty search result is not
/// one of them: "nothing matched" is reported as data, never as an error.
#[derive(Error, Debug)]
pub enum LocatorError {
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid theme configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("channel value {value} at index {index} is outside 0..=255")]
    ChannelOutOfRange { index: usize, value: i64 },
    #[error("a pixel needs 3 (RGB) or 4 (RGBA) channels, got {0}")]
    UnsupportedArity(usize),
    #[error("buffer holds {actual} bytes but {width}x{height} with {channels} channels needs {expected}")]
    BufferSize {
        width: u32,
        height: u32,
        channels: usize,
        expected: usize,
        actual: usize,
    },
    #[error("row {row} is {actual} pixels wide, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("pixel at ({x}, {y}) has {actual} channels, expected {expected}")]
    MixedArity {
        x: usize,
        y: usize,
        expected: usize,
        actual: usize,
    },
    #[error("channel range {min}..={max} is empty")]
    InvalidRange { min: u8, max: u8 },
    #[error("scan stride must be at least 1")]
    InvalidStride,
    #[error("search fraction {0} must be in (0, 1]")]
    InvalidFraction(f64),
    #[error("column {x} is outside an image {width} pixels wide")]
    ColumnOutOfBounds { x: u32, width: u32 },
    #[error("unknown theme '{0}'")]
    UnknownTheme(String),
    #[error("refusing to overwrite source image {0} without an explicit in-place request")]
    WouldOverwrite(PathBuf),
    #[error("unsupported color '{0}', expected #rrggbb")]
    UnsupportedColor(String),
}

pub type Result<T> = std::result::Result<T, LocatorError>;
