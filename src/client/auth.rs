use reqwest::header::{HeaderMap, HeaderValue};

/// API key pair sent with every request
#[derive(Clone)]
pub struct Credentials {
    key: String,
    secret: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// Build the `api-key` / `api-secret` headers, marked sensitive so they
    /// stay out of debug output.
    pub fn headers(&self) -> eyre::Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(&self.key)
            .map_err(|_| eyre::eyre!("API key contains characters not allowed in a header"))?;
        key.set_sensitive(true);
        let mut secret = HeaderValue::from_str(&self.secret)
            .map_err(|_| eyre::eyre!("API secret contains characters not allowed in a header"))?;
        secret.set_sensitive(true);
        headers.insert("api-key", key);
        headers.insert("api-secret", secret);
        Ok(headers)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &mask(&self.key))
            .field("secret", &"****")
            .finish()
    }
}

/// Keep the last four characters of a key for log lines
fn mask(value: &str) -> String {
    let visible: String = value
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("****{}", visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers() {
        let headers = Credentials::new("key123", "secret456").headers().unwrap();
        assert_eq!(headers.get("api-key").unwrap(), "key123");
        assert_eq!(headers.get("api-secret").unwrap(), "secret456");
        assert!(headers.get("api-secret").unwrap().is_sensitive());
    }

    #[test]
    fn test_invalid_header_value() {
        let result = Credentials::new("bad\nkey", "secret").headers();
        assert!(result.unwrap_err().to_string().contains("API key"));
    }

    #[test]
    fn test_debug_masks_secrets() {
        let debug = format!("{:?}", Credentials::new("abcdef1234", "topsecret"));
        assert!(debug.contains("****1234"));
        assert!(!debug.contains("abcdef"));
        assert!(!debug.contains("topsecret"));
    }
}
