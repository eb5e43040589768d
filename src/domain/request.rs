//! Content-affecting identity of an upstream request.

use std::collections::BTreeMap;

/// Describes an upstream request by the parts that change its response.
///
/// Parameters live in a [`BTreeMap`], so insertion order never changes the
/// canonical rendering. Process-constant values such as the upstream API key
/// must not be added here; the upstream client appends them on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    path: String,
    params: BTreeMap<String, String>,
}

impl RequestDescriptor {
    /// Creates a descriptor for an endpoint path such as `/search/movie`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) a query parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Adds a query parameter only when a value is present.
    pub fn param_opt(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.param(name, v),
            None => self,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Parameters in sorted order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Renders `path?k1=v1&k2=v2` with form-urlencoded, sorted parameters.
    ///
    /// Escaping `&` and `=` inside names and values means two distinct
    /// parameter sets can never render to the same string.
    pub fn canonical(&self) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish();

        format!("{}?{}", self.path, query)
    }
}
