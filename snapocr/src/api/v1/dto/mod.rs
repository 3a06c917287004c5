//! v1 API Data Transfer Objects.
//!
//! Wire types for the v1 REST API, kept apart from the pipeline types in
//! `src/pipeline/`.

pub mod captures;
pub mod filters;

pub use captures::*;
pub use filters::*;
