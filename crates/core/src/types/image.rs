//! Product image reference: a remote URL or an inline data URL.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Errors that can occur when accepting an uploaded image.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// The upload's content type is not `image/*`.
    #[error("please select an image file (got {0})")]
    NotAnImage(String),
    /// The encoded image does not fit in a product record.
    #[error("image is too large ({len} characters encoded, max {max})")]
    TooLarge {
        /// Encoded length.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },
}

/// How the image is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// No image set.
    Empty,
    /// Remote `http(s)` URL.
    Url,
    /// Inline `data:` URL.
    Inline,
}

/// A product image, stored as the string the frontend renders directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductImage(String);

impl ProductImage {
    /// Largest accepted inline data URL, in characters.
    pub const MAX_INLINE_LENGTH: usize = 1_000_000;

    /// No image.
    #[must_use]
    pub const fn none() -> Self {
        Self(String::new())
    }

    /// Reference a remote image.
    #[must_use]
    pub fn url(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Encode an uploaded file as an inline data URL.
    ///
    /// # Errors
    ///
    /// Returns `ImageError::NotAnImage` for non-`image/*` content types and
    /// `ImageError::TooLarge` when the data URL exceeds
    /// [`Self::MAX_INLINE_LENGTH`].
    pub fn from_upload(content_type: &str, bytes: &[u8]) -> Result<Self, ImageError> {
        if !content_type.starts_with("image/") {
            return Err(ImageError::NotAnImage(content_type.to_owned()));
        }

        let data_url = format!("data:{content_type};base64,{}", STANDARD.encode(bytes));
        if data_url.len() > Self::MAX_INLINE_LENGTH {
            return Err(ImageError::TooLarge {
                len: data_url.len(),
                max: Self::MAX_INLINE_LENGTH,
            });
        }

        Ok(Self(data_url))
    }

    /// Classify the stored reference.
    #[must_use]
    pub fn kind(&self) -> ImageKind {
        if self.0.is_empty() {
            ImageKind::Empty
        } else if self.0.starts_with("data:") {
            ImageKind::Inline
        } else {
            ImageKind::Url
        }
    }

    /// The reference as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
