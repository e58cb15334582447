//! Request handler module
//!
//! Dispatches every request on the mock port through the fixture engine.

pub mod router;

// Re-export main entry point
pub use router::handle_request;
