use std::{collections::HashMap, time::Duration};

/// Request headers as a name → value map.
///
/// Names are kept verbatim; `reqwest` handles the on-wire casing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Headers {
    inner: HashMap<String, String>,
}

impl Headers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.inner.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

impl From<HashMap<String, String>> for Headers {
    fn from(map: HashMap<String, String>) -> Self {
        Self { inner: map }
    }
}

impl FromIterator<(String, String)> for Headers {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

/// Network configuration.
#[derive(Clone, Debug)]
pub struct NetOptions {
    /// Per-request timeout (covers connect, headers, and body).
    pub request_timeout: Duration,
    /// Max idle connections per host. 0 disables pooling.
    pub pool_max_idle_per_host: usize,
}

impl Default for NetOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            pool_max_idle_per_host: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_insert_and_get() {
        let mut headers = Headers::new();
        headers.insert("X-License-Token", "abc123");

        assert_eq!(headers.get("X-License-Token"), Some("abc123"));
        assert_eq!(headers.get("missing"), None);
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn headers_from_hashmap() {
        let mut map = HashMap::new();
        map.insert("a".to_string(), "1".to_string());
        map.insert("b".to_string(), "2".to_string());

        let headers: Headers = map.into();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("b"), Some("2"));
    }

    #[test]
    fn headers_iter_covers_all_entries() {
        let mut headers = Headers::new();
        headers.insert("a", "1");
        headers.insert("b", "2");

        let collected: HashMap<_, _> = headers.iter().collect();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected["a"], "1");
    }

    #[test]
    fn default_options() {
        let options = NetOptions::default();
        assert_eq!(options.request_timeout, Duration::from_secs(30));
        assert_eq!(options.pool_max_idle_per_host, 0);
    }
}
