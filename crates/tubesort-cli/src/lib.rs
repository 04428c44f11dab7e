//! tubesort web service, exposed as a library for integration tests.

pub mod config;
pub mod error;
pub mod page;
pub mod server;

pub use error::{ApiError, ApiResult};
pub use server::{AppState, PREDICTION_FAILED, build_router};
