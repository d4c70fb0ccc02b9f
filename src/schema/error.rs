use thiserror::Error;

#[derive(Debug, Error)]
/// Validation failures for generated output.
///
/// Every variant retains the raw model output: garbled completions are an
/// expected failure mode of the upstream model, and operators need the
/// text to diagnose them.
pub enum SchemaError {
    /// The output was not a parseable JSON object.
    #[error("generated output is not a JSON object ({source}); raw output: {raw}")]
    Parse {
        /// The raw model output.
        raw: String,
        /// Underlying parse failure.
        source: serde_json::Error,
    },

    /// The output parsed but was not an object at the top level.
    #[error("generated output is valid JSON but not an object; raw output: {raw}")]
    NotAnObject {
        /// The raw model output.
        raw: String,
    },

    /// Top-level keys diverge from the shape template.
    #[error(
        "generated object keys diverge from template (missing: {missing:?}, unexpected: {unexpected:?}); raw output: {raw}"
    )]
    KeyMismatch {
        /// The raw model output.
        raw: String,
        /// Template keys absent from the output.
        missing: Vec<String>,
        /// Output keys absent from the template.
        unexpected: Vec<String>,
    },
}

impl SchemaError {
    /// Returns the raw model output that failed validation.
    pub fn raw_output(&self) -> &str {
        match self {
            SchemaError::Parse { raw, .. }
            | SchemaError::NotAnObject { raw }
            | SchemaError::KeyMismatch { raw, .. } => raw,
        }
    }
}
