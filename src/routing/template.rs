//! Endpoint template module
//!
//! Parses templates such as `/users/<id>` or `/files/<path:rest>`, matches
//! request paths against them and substitutes captured values back in to
//! obtain the endpoint part of a storage key.

use percent_encoding::percent_decode_str;
use regex::Regex;
use std::fmt;

/// Template parsing failure
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("endpoint template must start with '/': {0}")]
    NotAbsolute(String),
    #[error("unclosed placeholder in endpoint template {0}")]
    Unclosed(String),
    #[error("invalid placeholder name '{name}' in endpoint template {template}")]
    InvalidName { template: String, name: String },
    #[error("unknown converter '{converter}' in endpoint template {template}")]
    UnknownConverter { template: String, converter: String },
    #[error("endpoint template {template} does not compile: {reason}")]
    Pattern { template: String, reason: String },
    #[error("endpoint template {0} is declared twice")]
    Duplicate(String),
}

/// Value shape a placeholder accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
    /// One path segment (default)
    String,
    Int,
    Float,
    Uuid,
    /// One or more segments, slashes included
    Path,
}

impl Converter {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "string" | "default" => Some(Self::String),
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "uuid" => Some(Self::Uuid),
            "path" => Some(Self::Path),
            _ => None,
        }
    }

    const fn pattern(self) -> &'static str {
        match self {
            Self::String => "[^/]+",
            Self::Int => r"\d+",
            Self::Float => r"\d+\.\d+",
            Self::Uuid => {
                "[A-Fa-f0-9]{8}-[A-Fa-f0-9]{4}-[A-Fa-f0-9]{4}-[A-Fa-f0-9]{4}-[A-Fa-f0-9]{12}"
            }
            Self::Path => "[^/].*?",
        }
    }
}

#[derive(Debug, Clone)]
enum Token {
    Literal(String),
    Placeholder {
        name: String,
        converter: Converter,
        /// Placeholder exactly as written, e.g. `<int:id>`
        raw: String,
    },
}

/// Path parameters captured from a request path, in template order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(Vec<(String, String)>);

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(n, v)| (n.into(), v.into())).collect())
    }
}

/// A registered endpoint path pattern; identity is the literal template string
#[derive(Debug, Clone)]
pub struct EndpointTemplate {
    template: String,
    tokens: Vec<Token>,
    regex: Regex,
}

impl EndpointTemplate {
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        if !template.starts_with('/') {
            return Err(TemplateError::NotAbsolute(template.to_string()));
        }

        let tokens = tokenize(template)?;
        let mut pattern = String::from("^");
        for token in &tokens {
            match token {
                Token::Literal(text) => pattern.push_str(&regex::escape(text)),
                Token::Placeholder { converter, .. } => {
                    pattern.push('(');
                    pattern.push_str(converter.pattern());
                    pattern.push(')');
                }
            }
        }
        pattern.push('$');

        let regex = Regex::new(&pattern).map_err(|e| TemplateError::Pattern {
            template: template.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            template: template.to_string(),
            tokens,
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Match a request path, returning the placeholder values
    ///
    /// The path is percent-decoded before matching, so an encoded `/` can
    /// never end up inside a single-segment value. Values holding `.` or `..`
    /// segments do not match.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let decoded = percent_decode_str(path).decode_utf8_lossy();
        let captures = self.regex.captures(&decoded)?;
        let names = self.tokens.iter().filter_map(|t| match t {
            Token::Placeholder { name, .. } => Some(name.as_str()),
            Token::Literal(_) => None,
        });

        let mut params = Vec::new();
        for (name, value) in names.zip(captures.iter().skip(1)) {
            let value = value.map_or("", |m| m.as_str());
            if has_dot_segment(value) {
                return None;
            }
            params.push((name.to_string(), value.to_string()));
        }
        Some(PathParams(params))
    }

    /// Substitute `params` into the template, yielding a key fragment without
    /// the leading `/`
    ///
    /// Names starting with `__` are replaced by the name itself rather than
    /// the captured value. Placeholders without a value stay as written.
    pub fn resolve(&self, params: &PathParams) -> String {
        let mut out = String::with_capacity(self.template.len());
        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Placeholder { name, raw, .. } => match params.get(name) {
                    Some(_) if name.starts_with("__") => out.push_str(name),
                    Some(value) => out.push_str(value),
                    None => out.push_str(raw),
                },
            }
        }
        out.trim_start_matches('/').to_string()
    }
}

impl fmt::Display for EndpointTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

fn tokenize(template: &str) -> Result<Vec<Token>, TemplateError> {
    let mut tokens = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find('<') {
        if start > 0 {
            tokens.push(Token::Literal(rest[..start].to_string()));
        }
        let Some(len) = rest[start..].find('>') else {
            return Err(TemplateError::Unclosed(template.to_string()));
        };
        let raw = &rest[start..=start + len];
        let inner = &raw[1..raw.len() - 1];

        let (converter, name) = match inner.split_once(':') {
            Some((conv, name)) => {
                let converter =
                    Converter::parse(conv).ok_or_else(|| TemplateError::UnknownConverter {
                        template: template.to_string(),
                        converter: conv.to_string(),
                    })?;
                (converter, name)
            }
            None => (Converter::String, inner),
        };

        if !is_identifier(name) {
            return Err(TemplateError::InvalidName {
                template: template.to_string(),
                name: name.to_string(),
            });
        }

        tokens.push(Token::Placeholder {
            name: name.to_string(),
            converter,
            raw: raw.to_string(),
        });
        rest = &rest[start + len + 1..];
    }

    if !rest.is_empty() {
        tokens.push(Token::Literal(rest.to_string()));
    }
    Ok(tokens)
}

fn has_dot_segment(value: &str) -> bool {
    value.split('/').any(|segment| segment == "." || segment == "..")
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> PathParams {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_resolve_substitutes_every_placeholder() {
        let t = EndpointTemplate::parse("/shops/<shop>/items/<id>").unwrap();
        let resolved = t.resolve(&params(&[("shop", "north"), ("id", "42")]));
        assert_eq!(resolved, "shops/north/items/42");
        assert!(!resolved.contains('<'));
    }

    #[test]
    fn test_resolve_with_converter() {
        let t = EndpointTemplate::parse("/items/<int:id>").unwrap();
        assert_eq!(t.resolve(&params(&[("id", "42")])), "items/42");
    }

    #[test]
    fn test_resolve_double_underscore_uses_name() {
        let t = EndpointTemplate::parse("/meta/<__version>/<id>").unwrap();
        let resolved = t.resolve(&params(&[("__version", "ignored"), ("id", "7")]));
        assert_eq!(resolved, "meta/__version/7");
    }

    #[test]
    fn test_resolve_missing_value_keeps_placeholder() {
        let t = EndpointTemplate::parse("/items/<id>").unwrap();
        assert_eq!(t.resolve(&PathParams::default()), "items/<id>");
    }

    #[test]
    fn test_resolve_no_placeholders() {
        let t = EndpointTemplate::parse("/health/status").unwrap();
        assert_eq!(t.resolve(&PathParams::default()), "health/status");
        let root = EndpointTemplate::parse("/").unwrap();
        assert_eq!(root.resolve(&PathParams::default()), "");
    }

    #[test]
    fn test_match_string_segment() {
        let t = EndpointTemplate::parse("/users/<id>").unwrap();
        assert_eq!(t.matches("/users/alice"), Some(params(&[("id", "alice")])));
        assert_eq!(t.matches("/users/alice/posts"), None);
        assert_eq!(t.matches("/users/"), None);
        assert_eq!(t.matches("/users"), None);
    }

    #[test]
    fn test_match_decodes_values() {
        let t = EndpointTemplate::parse("/users/<name>").unwrap();
        assert_eq!(
            t.matches("/users/jane%20doe"),
            Some(params(&[("name", "jane doe")]))
        );
    }

    #[test]
    fn test_encoded_slash_stays_out_of_single_segment() {
        let t = EndpointTemplate::parse("/items/<id>").unwrap();
        assert_eq!(t.matches("/items/a%2Fb"), None);
        assert_eq!(t.matches("/items/..%2F..%2Fsecret"), None);
        assert_eq!(t.matches("/items/a%2fb"), None);
    }

    #[test]
    fn test_dot_segments_rejected() {
        let t = EndpointTemplate::parse("/items/<id>").unwrap();
        assert_eq!(t.matches("/items/.."), None);
        assert_eq!(t.matches("/items/%2E%2E"), None);
        assert_eq!(t.matches("/items/."), None);
        assert_eq!(t.matches("/items/..x"), Some(params(&[("id", "..x")])));

        let path = EndpointTemplate::parse("/files/<path:rest>").unwrap();
        assert_eq!(path.matches("/files/a/../../secret"), None);
        assert_eq!(path.matches("/files/a%2F..%2F..%2Fsecret"), None);
        assert_eq!(
            path.matches("/files/a%2Fb"),
            Some(params(&[("rest", "a/b")]))
        );
    }

    #[test]
    fn test_match_converters() {
        let int = EndpointTemplate::parse("/items/<int:id>").unwrap();
        assert!(int.matches("/items/42").is_some());
        assert!(int.matches("/items/abc").is_none());

        let float = EndpointTemplate::parse("/price/<float:value>").unwrap();
        assert!(float.matches("/price/9.99").is_some());
        assert!(float.matches("/price/9").is_none());

        let uuid = EndpointTemplate::parse("/orders/<uuid:order>").unwrap();
        assert!(uuid
            .matches("/orders/123e4567-e89b-12d3-a456-426614174000")
            .is_some());
        assert!(uuid.matches("/orders/123").is_none());

        let path = EndpointTemplate::parse("/files/<path:rest>").unwrap();
        assert_eq!(
            path.matches("/files/a/b/c.txt"),
            Some(params(&[("rest", "a/b/c.txt")]))
        );
    }

    #[test]
    fn test_literal_is_escaped() {
        let t = EndpointTemplate::parse("/v1.0/items").unwrap();
        assert!(t.matches("/v1.0/items").is_some());
        assert!(t.matches("/v1x0/items").is_none());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            EndpointTemplate::parse("users").unwrap_err(),
            TemplateError::NotAbsolute("users".to_string())
        );
        assert!(matches!(
            EndpointTemplate::parse("/users/<id"),
            Err(TemplateError::Unclosed(_))
        ));
        assert!(matches!(
            EndpointTemplate::parse("/users/<>"),
            Err(TemplateError::InvalidName { .. })
        ));
        assert!(matches!(
            EndpointTemplate::parse("/users/<bogus:id>"),
            Err(TemplateError::UnknownConverter { .. })
        ));
    }
}
