//! Error Handling Module
//!
//! This module provides error handling for the assessment client, including:
//! - Core error types (`AssessError`, `ErrorCategory`)
//! - User-facing error helpers and summaries
//! - Type conversions from common error types
//!
//! # Example
//!
//! ```rust,ignore
//! use certassess::error::{AssessError, ErrorCategory};
//!
//! let error = AssessError::api_error(404, "Not found");
//! assert_eq!(error.category(), ErrorCategory::Client);
//! assert!(!error.is_retryable());
//! ```

mod conversions;
pub mod helpers;
pub mod types;

pub use helpers::*;
pub use types::*;
