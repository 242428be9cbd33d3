//! Core types for the assessment client.

pub mod assessment;
pub mod common;
pub mod document;
pub mod http;
pub mod scheme;

pub use assessment::*;
pub use common::*;
pub use document::*;
pub use http::*;
pub use scheme::*;
