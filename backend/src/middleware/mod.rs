//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns such as
//! request correlation and tracing.

pub mod trace;

pub use trace::{REQUEST_ID_HEADER, RequestId, Trace};
