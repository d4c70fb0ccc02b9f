//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary constants from primary ones to avoid drift.

/// Dimension of `text-embedding-ada-002` vectors, the default reference
/// corpus embedding model.
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

/// Number of reference essays retrieved per request by default.
pub const DEFAULT_TOP_K: usize = 2;

/// Tolerance for the unit-norm invariant on stored and query vectors.
pub const NORM_EPSILON: f32 = 1e-4;

/// Token budget for the scoring task (full JSON score object).
pub const SCORE_MAX_TOKENS: u32 = 4096;

/// Token budget for the feedback task (full JSON feedback object).
pub const FEEDBACK_MAX_TOKENS: u32 = 4096;

/// Token budget for the essay-cleaning task (essay-length echo).
pub const CLEAN_MAX_TOKENS: u32 = 1000;

/// Both generation tasks run greedy to maximize schema compliance.
pub const GENERATION_TEMPERATURE: f32 = 0.0;
