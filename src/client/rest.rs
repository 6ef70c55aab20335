//! REST client for the asset platform
//!
//! Provides [`AssetClient`], an authenticated HTTP session implementing
//! [`QueryService`] against the saved query ("views") endpoints.

use super::{Credentials, QueryService};
use crate::queries::{AssetCategory, SavedQuery};
use eyre::{Context, Result, eyre};
use owo_colors::OwoColorize;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use url::Url;

/// Number of saved queries requested per page
const PAGE_SIZE: usize = 500;

/// Authenticated session against the platform API.
///
/// Every request carries the `api-key` / `api-secret` headers. Clones share
/// the underlying connection pool.
///
/// # Example
/// ```no_run
/// use query_tool::client::{AssetClient, Credentials, QueryService};
/// use query_tool::queries::AssetCategory;
/// use url::Url;
///
/// # async fn example() -> eyre::Result<()> {
/// let url = Url::parse("https://inventory.example.com")?;
/// let client = AssetClient::try_new(url, Credentials::new("key", "secret"), true)?;
/// client.test_connection().await?;
///
/// let queries = client.list_saved_queries(AssetCategory::Devices, &[]).await?;
/// # let _ = queries;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct AssetClient {
    client: Client,
    url: Url,
}

impl AssetClient {
    /// Create a client for `url`.
    ///
    /// `verify_tls = false` accepts self-signed certificates, which many
    /// on-premise appliances use.
    ///
    /// # Errors
    /// Returns an error if the credentials cannot be encoded as headers or
    /// the HTTP client cannot be built.
    pub fn try_new(url: Url, credentials: Credentials, verify_tls: bool) -> Result<Self> {
        let headers = credentials.headers()?;
        let client = Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(!verify_tls)
            .build()
            .with_context(|| "Failed to build HTTP client")?;

        Ok(Self { client, url })
    }

    /// Get the base URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Verify connectivity and credentials.
    pub async fn test_connection(&self) -> Result<()> {
        let response = self.get("api/settings/meta/about", &[]).await?;
        let response = check_status(response, "connect").await?;
        log::debug!(
            "{} {}",
            response.status().as_u16().green(),
            self.url.as_str().bright_black()
        );
        Ok(())
    }

    fn saved_queries_path(category: AssetCategory) -> String {
        format!("api/{}/views/saved", category)
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Response> {
        let url = self.url.join(path)?;
        log::debug!("{} {}", "GET".green(), url);
        self.client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| eyre!("Failed to send request: {}", e))
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Response> {
        let url = self.url.join(path)?;
        log::debug!("{} {}", "POST".green(), url);
        self.client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| eyre!("Failed to send request: {}", e))
    }

    async fn fetch_page(&self, category: AssetCategory, skip: usize) -> Result<Vec<Value>> {
        let path = Self::saved_queries_path(category);
        let query = [("limit", PAGE_SIZE.to_string()), ("skip", skip.to_string())];
        let response = self.get(&path, &query).await?;
        let response = check_status(response, "list saved queries").await?;

        let body: Value = response
            .json()
            .await
            .with_context(|| "Failed to parse saved query list response")?;

        match body {
            Value::Array(items) => Ok(items),
            Value::Object(mut page) => match page.remove("assets") {
                Some(Value::Array(items)) => Ok(items),
                _ => eyre::bail!("Saved query list response has no 'assets' array"),
            },
            _ => eyre::bail!("Unexpected saved query list response"),
        }
    }
}

impl QueryService for AssetClient {
    async fn list_saved_queries(
        &self,
        category: AssetCategory,
        tags: &[String],
    ) -> Result<Vec<SavedQuery>> {
        let mut queries = Vec::new();

        loop {
            let skip = queries.len();
            let page = self.fetch_page(category, skip).await?;
            let page_len = page.len();
            queries.extend(parse_page(page, skip)?);
            if page_len < PAGE_SIZE {
                break;
            }
        }

        log::debug!("Fetched {} {} saved queries", queries.len(), category);

        if !tags.is_empty() {
            queries.retain(|query| query.has_any_tag(tags));
        }

        Ok(queries)
    }

    async fn create_saved_query(
        &self,
        category: AssetCategory,
        query: &SavedQuery,
    ) -> Result<String> {
        let path = Self::saved_queries_path(category);
        let body = Value::from(query.clone());
        let response = self.post(&path, &body).await?;
        let response = check_status(response, "create saved query").await?;

        let text = response
            .text()
            .await
            .with_context(|| "Failed to read create response")?;
        parse_created_id(&text)
            .ok_or_else(|| eyre!("Unexpected create response for '{}': {}", query.name(), text))
    }
}

/// Map a non-success response to an error, singling out bad credentials
async fn check_status(response: Response, action: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => eyre::bail!(
            "Authentication failed ({}): check the API key and secret",
            status
        ),
        _ => eyre::bail!("Failed to {} ({}): {}", action, status, body),
    }
}

/// Convert one page of list results; `skip` is the page's offset so errors
/// can name the record by its position in the whole collection.
fn parse_page(items: Vec<Value>, skip: usize) -> Result<Vec<SavedQuery>> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            SavedQuery::try_from(item).with_context(|| {
                format!(
                    "Invalid saved query #{} in list response (page offset {})",
                    skip + i + 1,
                    skip
                )
            })
        })
        .collect()
}

/// The create endpoint answers with the new id, either as a bare JSON string
/// or inside an object.
fn parse_created_id(body: &str) -> Option<String> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(id)) => Some(id),
        Ok(Value::Object(fields)) => ["id", "uuid"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_str))
            .map(str::to_string),
        Ok(_) => None,
        Err(_) => {
            let trimmed = body.trim();
            (!trimmed.is_empty() && !trimmed.contains(char::is_whitespace))
                .then(|| trimmed.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let url = Url::parse("https://inventory.example.com").unwrap();
        let client = AssetClient::try_new(url, Credentials::new("k", "s"), false).unwrap();
        assert_eq!(client.url().as_str(), "https://inventory.example.com/");
    }

    #[test]
    fn test_saved_queries_path() {
        assert_eq!(
            AssetClient::saved_queries_path(AssetCategory::Users),
            "api/users/views/saved"
        );
    }

    #[test]
    fn test_parse_page_names_bad_record() {
        let items = vec![
            serde_json::json!({"name": "Laptops"}),
            serde_json::json!({"tags": ["prod"]}),
        ];

        let err = parse_page(items, 500).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("#502"), "{}", message);
        assert!(message.contains("page offset 500"), "{}", message);
        assert!(message.contains("missing the 'name' field"), "{}", message);
    }

    #[test]
    fn test_parse_created_id() {
        assert_eq!(parse_created_id(r#""5f1e2a""#), Some("5f1e2a".to_string()));
        assert_eq!(
            parse_created_id(r#"{"id": "abc"}"#),
            Some("abc".to_string())
        );
        assert_eq!(
            parse_created_id(r#"{"uuid": "def"}"#),
            Some("def".to_string())
        );
        assert_eq!(parse_created_id("5f1e2a\n"), Some("5f1e2a".to_string()));
        assert_eq!(parse_created_id(r#"{"ok": true}"#), None);
        assert_eq!(parse_created_id(""), None);
    }
}
