//! Execution domain module.
//!
//! - `model`: sandbox request/response bodies and [`ExecutionResult`]
//! - `api`: the [`ExecutionApi`] trait implemented by HTTP clients

mod api;
mod model;

pub use api::ExecutionApi;
pub use model::{ExecuteRequest, ExecuteResponse, ExecutionResult, SourceFile, StageOutput};
