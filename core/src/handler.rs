//! Failure handling for the request primitive.
//!
//! The handler sees every transport, status and parse failure exactly once
//! and decides its fate: `Ok(())` absorbs it (the public call yields
//! `Ok(None)`), `Err(e)` hands `e` back to the caller.

use crate::error::ApiError;

pub trait ErrorHandler: Send + Sync {
    fn handle_error(&self, error: ApiError) -> Result<(), ApiError>;
}

/// Logs the failure and absorbs it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAndAbsorb;

impl ErrorHandler for LogAndAbsorb {
    fn handle_error(&self, error: ApiError) -> Result<(), ApiError> {
        match error.status() {
            Some(status) => tracing::error!(status, %error, "api request failed"),
            None => tracing::error!(%error, "api request failed"),
        }
        Ok(())
    }
}

/// Returns every failure to the caller unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Propagate;

impl ErrorHandler for Propagate {
    fn handle_error(&self, error: ApiError) -> Result<(), ApiError> {
        Err(error)
    }
}

/// Closures observe the error and absorb it.
impl<F> ErrorHandler for F
where
    F: Fn(&ApiError) + Send + Sync,
{
    fn handle_error(&self, error: ApiError) -> Result<(), ApiError> {
        self(&error);
        Ok(())
    }
}
