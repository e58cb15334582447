//! Route matching module
//!
//! Finds the endpoint template a request path belongs to.

use super::template::{EndpointTemplate, PathParams, TemplateError};

/// A matched endpoint together with the values captured from the path
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub template: &'a EndpointTemplate,
    pub params: PathParams,
}

/// Ordered set of registered endpoint templates
#[derive(Debug, Default)]
pub struct EndpointRouter {
    templates: Vec<EndpointTemplate>,
}

impl EndpointRouter {
    /// Register every template, rejecting malformed or duplicate ones
    pub fn new<S: AsRef<str>>(templates: &[S]) -> Result<Self, TemplateError> {
        let mut router = Self::default();
        for template in templates {
            let parsed = EndpointTemplate::parse(template.as_ref())?;
            if router.templates.iter().any(|t| t.as_str() == parsed.as_str()) {
                return Err(TemplateError::Duplicate(parsed.as_str().to_string()));
            }
            router.templates.push(parsed);
        }
        Ok(router)
    }

    /// Find the first template, in declaration order, matching `path`
    pub fn route(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.templates.iter().find_map(|template| {
            template
                .matches(path)
                .map(|params| RouteMatch { template, params })
        })
    }

    pub fn templates(&self) -> impl Iterator<Item = &EndpointTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_order() {
        let router = EndpointRouter::new(&["/users/me", "/users/<id>", "/users"]).unwrap();

        let m = router.route("/users/me").unwrap();
        assert_eq!(m.template.as_str(), "/users/me");
        assert_eq!(m.params, PathParams::default());

        let m = router.route("/users/17").unwrap();
        assert_eq!(m.template.as_str(), "/users/<id>");
        assert_eq!(m.params.get("id"), Some("17"));

        assert_eq!(router.route("/users").unwrap().template.as_str(), "/users");
    }

    #[test]
    fn test_no_match() {
        let router = EndpointRouter::new(&["/items/<int:id>"]).unwrap();
        assert!(router.route("/items/abc").is_none());
        assert!(router.route("/other").is_none());
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = EndpointRouter::new(&["/a/<id>", "/a/<id>"]).unwrap_err();
        assert_eq!(err, TemplateError::Duplicate("/a/<id>".to_string()));
    }

    #[test]
    fn test_invalid_template_rejected() {
        assert!(EndpointRouter::new(&["/ok", "broken"]).is_err());
    }

    #[test]
    fn test_empty_router() {
        let router = EndpointRouter::new::<&str>(&[]).unwrap();
        assert!(router.is_empty());
        assert!(router.route("/").is_none());
    }
}
