//! Crate error type

use std::fmt;

/// Errors surfaced by the rendering and configuration layers
#[derive(Debug)]
pub enum Error {
    /// The offscreen rendering surface could not be created.
    /// Fatal to the effect; the caller shows a static asset instead.
    UnsupportedContext(String),
    /// A pixel buffer does not match the grid it was sampled for
    ResizeRace {
        expected: (usize, usize),
        actual: usize,
    },
    /// Charset too short, or containing duplicate glyphs
    DegenerateCharset(String),
    InvalidColor(String),
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
    Serialize(ron::Error),
    Image(image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<ron::error::SpannedError> for Error {
    fn from(e: ron::error::SpannedError) -> Self {
        Error::Parse(e)
    }
}

impl From<ron::Error> for Error {
    fn from(e: ron::Error) -> Self {
        Error::Serialize(e)
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedContext(reason) => write!(f, "Unsupported rendering context: {}", reason),
            Error::ResizeRace { expected, actual } => write!(
                f,
                "Pixel buffer of {} bytes does not match a {}x{} grid",
                actual, expected.0, expected.1
            ),
            Error::DegenerateCharset(reason) => write!(f, "Degenerate charset: {}", reason),
            Error::InvalidColor(s) => write!(f, "Invalid color: {:?}", s),
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Parse(e) => write!(f, "Parse error: {}", e),
            Error::Serialize(e) => write!(f, "Serialize error: {}", e),
            Error::Image(e) => write!(f, "Image error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Parse(e) => Some(e),
            Error::Serialize(e) => Some(e),
            Error::Image(e) => Some(e),
            _ => None,
        }
    }
}
