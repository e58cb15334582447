//! HTTP protocol layer module
//!
//! Turns fixtures and framework-level rejections into hyper responses,
//! decoupled from routing and storage.

pub mod response;

// Re-export commonly used types
pub use response::{
    build_404_response, build_405_response, build_413_response, build_fixture_response,
};
