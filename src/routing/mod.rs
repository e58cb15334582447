//! Routing module
//!
//! Maps request paths onto the configured endpoint templates:
//! - Template parsing with typed placeholders
//! - First-match dispatch in declaration order
//! - Placeholder substitution for storage keys

mod matcher;
mod template;

pub use matcher::EndpointRouter;
pub use template::{EndpointTemplate, PathParams};
