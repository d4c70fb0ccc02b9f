//! Rubricate library crate (used by the server, the corpus builder, and
//! integration tests).
//!
//! # Pipeline
//!
//! Offline, [`builder::CorpusBuilder`] turns a tabular essay dataset into
//! a persisted [`corpus::Corpus`]: a flat vector index over normalized
//! embeddings plus a positionally-matched metadata store. At request
//! time, [`pipeline::EssayGrader`] retrieves the nearest reference
//! essays, assembles a rubric-anchored prompt, invokes the generation
//! model, and validates its output against a fixed schema template.
//!
//! # Module map
//!
//! - [`corpus`] - vector index + metadata store + snapshot persistence
//! - [`builder`] - offline CSV-to-corpus construction
//! - [`embedding`] / [`generation`] - remote model clients (mocks behind
//!   the `mock` feature)
//! - [`retrieval`] - k-nearest reference lookup
//! - [`prompt`] - fixed rubric text and prompt assembly
//! - [`schema`] - output validation and the repair-retry policy
//! - [`pipeline`] - the request-scoped grading flow
//! - [`gateway`] - Axum HTTP surface
//! - [`config`] - environment-backed configuration

pub mod builder;
pub mod config;
pub mod constants;
pub mod corpus;
pub mod embedding;
pub mod gateway;
pub mod generation;
pub mod pipeline;
pub mod prompt;
pub mod retrieval;
pub mod schema;

pub use builder::{BuildError, CorpusBuilder, DEFAULT_ESSAY_COLUMN};
pub use config::{Config, ConfigError};
pub use constants::{DEFAULT_EMBEDDING_DIM, DEFAULT_TOP_K, NORM_EPSILON};
pub use corpus::{normalize, Corpus, CorpusError, EssayRecord, MetadataStore, Neighbor, VectorIndex};
pub use embedding::{EmbeddingClient, EmbeddingError, OpenAiEmbedder};
pub use gateway::{create_router_with_state, EssayRequest, GatewayError, HandlerState};
pub use generation::{GenerationClient, GenerationError, OpenAiChatGenerator};
pub use pipeline::{EssayGrader, FeedbackResult, GraderOptions, PipelineError, ScoreResult};
pub use retrieval::{RetrievalError, RetrievalResult, RetrievedEssay, Retriever};
pub use schema::{Backoff, RepairPolicy, SchemaError};

#[cfg(any(test, feature = "mock"))]
pub use embedding::{FixtureEmbedder, HashEmbedder};
#[cfg(any(test, feature = "mock"))]
pub use generation::MockGenerator;
