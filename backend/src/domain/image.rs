//! Opaque image references.
//!
//! Binary storage lives outside the service; records keep whatever
//! reference (usually a URL) the client uploaded the image to.

use serde::{Deserialize, Serialize};

use crate::domain::validation::{FieldError, required_text};

/// Longest accepted image reference.
pub const IMAGE_REF_MAX: usize = 2048;

/// Non-empty reference to an externally stored image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Validate a reference supplied for `field`.
    pub fn parse(field: &'static str, raw: Option<String>) -> Result<Self, FieldError> {
        required_text(field, raw, IMAGE_REF_MAX).map(Self)
    }

    /// Validate an optional reference; blank input becomes `None`.
    pub fn parse_optional(field: &'static str, raw: Option<String>) -> Result<Option<Self>, FieldError> {
        match raw {
            Some(value) if !value.trim().is_empty() => Self::parse(field, Some(value)).map(Some),
            _ => Ok(None),
        }
    }

    /// Rehydrate a stored reference.
    #[must_use]
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<ImageRef> for String {
    fn from(value: ImageRef) -> Self {
        value.0
    }
}
