use serde::{Deserialize, Serialize};

/// Body of both grading endpoints.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EssayRequest {
    /// The candidate essay text.
    pub essay: String,
}
