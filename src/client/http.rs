use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use url::Url;

use super::MenuBackend;
use crate::config::ClientConfig;
use crate::error::{MenuError, MenuResult};
use crate::menu::{FlatMenuItem, PersistedId, RemoteMenuItem};

/// Success envelope used by the menu store: `{"success": true, "data": ...}`
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    data: Option<T>,
}

/// Error body: `{"success": false, "error": "...", "code": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "message")]
    error: Option<String>,
}

/// Menu storage reached over HTTP with an optional bearer token
#[derive(Debug, Clone)]
pub struct HttpMenuBackend {
    client: Client,
    base_url: Url,
    menu: String,
    token: Option<String>,
}

impl HttpMenuBackend {
    pub fn new(base_url: &str, menu: impl Into<String>, token: Option<String>, timeout: Duration) -> MenuResult<Self> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| MenuError::Config(format!("invalid API url '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(MenuError::Config(format!("API url '{}' cannot be used as a base", base_url)));
        }
        // keep any path prefix when joining endpoint segments
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            menu: menu.into(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn from_config(config: &ClientConfig) -> MenuResult<Self> {
        Self::new(
            &config.api_url,
            config.menu.clone(),
            config.api_token.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn menu(&self) -> &str {
        &self.menu
    }

    /// `{base}/api/menus/{menu}/items` plus any extra segments, each one
    /// percent-encoded
    fn endpoint(&self, extra: &[&str]) -> MenuResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MenuError::Config(format!("API url '{}' cannot be used as a base", self.base_url)))?
            .pop_if_empty()
            .extend(["api", "menus", self.menu.as_str(), "items"])
            .extend(extra);
        Ok(url)
    }

    fn items_url(&self) -> MenuResult<Url> {
        self.endpoint(&[])
    }

    fn item_url(&self, id: PersistedId) -> MenuResult<Url> {
        self.endpoint(&[&id.to_string()])
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

/// Turn a non-success response into the matching error
async fn error_for(response: Response) -> MenuError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.error)
        .unwrap_or_else(|| {
            if text.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                text
            }
        });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => MenuError::Unauthorized(message),
        _ => MenuError::server(status.as_u16(), message),
    }
}

#[async_trait]
impl MenuBackend for HttpMenuBackend {
    async fn fetch_items(&self) -> MenuResult<Vec<RemoteMenuItem>> {
        let url = self.items_url()?;
        tracing::debug!("GET {}", url);
        let response = self.request(Method::GET, url).send().await?;
        if !response.status().is_success() {
            return Err(error_for(response).await);
        }

        let body = response.bytes().await?;
        let envelope: Envelope<Vec<RemoteMenuItem>> = serde_json::from_slice(&body)?;
        Ok(envelope.data.unwrap_or_default())
    }

    async fn replace_items(&self, items: &[FlatMenuItem]) -> MenuResult<()> {
        let url = self.items_url()?;
        tracing::debug!("PUT {} ({} items)", url, items.len());
        let response = self.request(Method::PUT, url).json(items).send().await?;
        if !response.status().is_success() {
            return Err(error_for(response).await);
        }
        Ok(())
    }

    async fn delete_item(&self, id: PersistedId) -> MenuResult<()> {
        let url = self.item_url(id)?;
        tracing::debug!("DELETE {}", url);
        let response = self.request(Method::DELETE, url).send().await?;
        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND | StatusCode::GONE => {
                tracing::warn!("Menu item {} was already gone", id);
                Ok(())
            }
            _ => Err(error_for(response).await),
        }
    }
}
