//! Mock response engine
//!
//! Everything between a routed request and the fixture it is answered with:
//! - `capture`: last-request snapshot
//! - `resolver`: fixture lookup with CORS preflight / 405 defaults
//! - `fixture`: fixture data and the per-method file names

mod capture;
mod fixture;
mod resolver;

pub use capture::{capture, RequestSnapshot};
pub use fixture::{MockMethod, ResponseFixture};
pub use resolver::{resolve, FixtureSource, Resolution};

use crate::routing::{EndpointTemplate, PathParams};
use crate::storage::StorageKey;

/// Storage key of the fixture for `method` on a matched endpoint
pub fn fixture_key(
    root: &str,
    template: &EndpointTemplate,
    params: &PathParams,
    method: MockMethod,
) -> StorageKey {
    StorageKey::fixture(root, &template.resolve(params), method)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_key_from_template() {
        let template = EndpointTemplate::parse("/items/<id>").unwrap();
        let params = template.matches("/items/42").unwrap();
        let key = fixture_key("/srv/responses", &template, &params, MockMethod::Get);
        assert_eq!(key.as_str(), "/srv/responses/items/42/get.json");
        // Same inputs, same key
        assert_eq!(
            key,
            fixture_key("/srv/responses", &template, &params, MockMethod::Get)
        );
    }

    #[test]
    fn test_fixture_key_path_converter() {
        let template = EndpointTemplate::parse("/files/<path:rest>").unwrap();
        let params = template.matches("/files/a/b").unwrap();
        let key = fixture_key("", &template, &params, MockMethod::Put);
        assert_eq!(key.as_str(), "files/a/b/put.json");
    }
}
