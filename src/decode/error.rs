//! Error types for the JSON normalizer.

use thiserror::Error;

use super::Shape;

/// A response body that could not be decoded into the requested shape.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body is not valid JSON, or an element does not match the record type.
    #[error("failed to decode {shape}: {source}")]
    Malformed {
        /// The shape that was attempted.
        shape: Shape,
        /// The underlying parser error.
        #[source]
        source: serde_json::Error,
    },

    /// The body is valid JSON but its top-level kind cannot hold the shape.
    #[error("failed to decode {shape}: expected {expected}, found {found}")]
    UnexpectedShape {
        /// The shape that was attempted.
        shape: Shape,
        /// The top-level JSON kind the shape needs.
        expected: &'static str,
        /// The top-level JSON kind that was found.
        found: &'static str,
    },
}

impl DecodeError {
    /// Creates a malformed-body error.
    #[must_use]
    pub fn malformed(shape: Shape, source: serde_json::Error) -> Self {
        Self::Malformed { shape, source }
    }

    /// Creates an unexpected-shape error.
    #[must_use]
    pub fn unexpected_shape(shape: Shape, expected: &'static str, found: &'static str) -> Self {
        Self::UnexpectedShape {
            shape,
            expected,
            found,
        }
    }

    /// Returns the shape that failed to decode.
    #[must_use]
    pub fn shape(&self) -> Shape {
        match self {
            Self::Malformed { shape, .. } | Self::UnexpectedShape { shape, .. } => *shape,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display_names_shape() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = DecodeError::malformed(Shape::Bookmarks, source);
        let msg = err.to_string();
        assert!(msg.starts_with("failed to decode bookmarks"), "got: {msg}");
        assert_eq!(err.shape(), Shape::Bookmarks);
    }

    #[test]
    fn test_unexpected_shape_display() {
        let err = DecodeError::unexpected_shape(Shape::Tags, "an object", "an array");
        assert_eq!(
            err.to_string(),
            "failed to decode tags: expected an object, found an array"
        );
    }
}
