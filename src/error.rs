use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TouchupError {
    /// Source file missing, unreadable or not a decodable raster image
    #[error("Failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Nothing left to crop: no non-background pixel, or no opaque pixel
    #[error("No content found: {0}")]
    NoContent(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl TouchupError {
    /// True for the "nothing to keep" family of failures
    pub fn is_no_content(&self) -> bool {
        matches!(self, TouchupError::NoContent(_))
    }
}

pub type Result<T> = std::result::Result<T, TouchupError>;

// Batch outcomes are reported as JSON, errors travel as their message
impl serde::Serialize for TouchupError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
