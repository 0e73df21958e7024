use std::collections::HashMap;

use http::{Extensions, Method};
use uuid::Uuid;

/// The logical view of an incoming HTTP request that the authentication and
/// authorization layers operate on. Bodies are never needed for an access
/// decision, so only the routing-relevant parts are kept.
///
/// `extensions` is the per-request attribute bag: middleware inserts the
/// authenticated identity and the route's authorization requirement there,
/// and downstream handlers read them back out.
#[derive(Debug)]
pub struct Request {
    pub id: Uuid,

    pub method: Method,

    pub path: String,

    /// Header names are stored lowercased, values verbatim. Headers whose
    /// values are not valid UTF-8 are dropped.
    pub headers: HashMap<String, String>,

    pub extensions: Extensions,
}

impl Request {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            method,
            path: path.into(),
            headers: HashMap::new(),
            extensions: Extensions::new(),
        }
    }

    /// Create a logical request from the head of an HTTP request.
    #[must_use]
    pub fn from_parts(parts: &http::request::Parts) -> Self {
        let headers = parts
            .headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.to_string(), value.to_string()))
            })
            .collect();

        Self {
            id: Uuid::new_v4(),
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
            headers,
            extensions: Extensions::new(),
        }
    }

    /// Look up a header by name, ignoring ASCII case. Hosts hand over header
    /// names from configuration in their original casing while the stored
    /// names are lowercase.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(stored, _)| stored.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_keeps_method_path_and_headers() {
        let (parts, ()) = http::Request::builder()
            .method(Method::DELETE)
            .uri("https://warden.dev/data/image/1?q=full")
            .header("Authorization", "Bearer abc")
            .body(())
            .unwrap()
            .into_parts();

        let req = Request::from_parts(&parts);
        assert_eq!(req.method, Method::DELETE);
        assert_eq!(req.path, "/data/image/1");
        assert_eq!(req.header("Authorization"), Some("Bearer abc"));
        assert_eq!(req.header("authorization"), Some("Bearer abc"));
        assert_eq!(req.header("X-Missing"), None);
    }

    #[test]
    fn extensions_act_as_attribute_bag() {
        #[derive(Debug, PartialEq, Clone)]
        struct Marker(u32);

        let mut req = Request::new(Method::GET, "/data");
        req.extensions.insert(Marker(7));
        assert_eq!(req.extensions.get::<Marker>(), Some(&Marker(7)));
    }
}
