//! Default Configuration Values
//!
//! This module centralizes all default values used throughout the library.
//! Having defaults in one place makes them easier to maintain, document, and adjust.

use std::time::Duration;

/// HTTP client default configurations
pub mod http {
    use super::*;

    /// Default request timeout for HTTP requests
    ///
    /// Assessments are evaluated server-side by an AI pipeline and can take
    /// well over a minute for large document sets.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

    /// Default connection timeout for establishing HTTP connections
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default User-Agent string for HTTP requests
    pub const USER_AGENT: &str = concat!("certassess/", env!("CARGO_PKG_VERSION"));
}

/// API surface defaults
pub mod api {
    /// API version prefix used for all endpoints
    pub const VERSION_PREFIX: &str = "v1";
}

/// Upload limits applied before any network I/O
pub mod upload {
    /// Maximum size of a single supporting document
    pub const MAX_DOCUMENT_BYTES: usize = 20 * 1024 * 1024;

    /// Maximum number of documents per submission
    pub const MAX_DOCUMENTS: usize = 16;
}

/// Catalog cache defaults
pub mod catalog {
    /// Number of scheme versions kept in the remote-catalog LRU cache
    pub const CACHE_SIZE: usize = 8;
}
