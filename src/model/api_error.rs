use serde::{Deserialize, Serialize};

/// Application-level failure reported by the feed API inside a response body.
///
/// Appears on the wire as `[{"result": {"message": "...", "code": 1000}}]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
    pub code: i64,
}
