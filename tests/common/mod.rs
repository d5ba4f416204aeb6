use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use menu_admin::client::HttpMenuBackend;
use menu_admin::menu::RemoteMenuItem;
use menu_admin::server::store::MenuStore;
use menu_admin::server::{self, AppState};
use reqwest::StatusCode;

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub state: AppState,
}

impl TestServer {
    /// Serve the menu store on a free port inside the current test runtime
    pub async fn spawn(token: Option<&str>) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);
        let state = AppState::new(token.map(str::to_string));

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        let app = server::router(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let server = Self { port, base_url, state };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub async fn seed(&self, menu: &str, rows: &[(i64, &str, Option<i64>, i64)]) {
        let items = rows
            .iter()
            .map(|&(id, title, parent_id, ord)| RemoteMenuItem {
                id,
                title: title.to_string(),
                url: None,
                parent_id,
                ord,
            })
            .collect();
        self.state.insert_menu(menu, MenuStore::with_items(items)).await;
    }

    pub fn backend(&self, menu: &str, token: Option<&str>) -> Result<HttpMenuBackend> {
        Ok(HttpMenuBackend::new(
            &self.base_url,
            menu,
            token.map(str::to_string),
            Duration::from_secs(5),
        )?)
    }

    /// Current rows of `menu` as served over HTTP
    pub async fn rows(&self, menu: &str, token: Option<&str>) -> Result<Vec<RemoteMenuItem>> {
        let mut request = reqwest::Client::new().get(format!("{}/api/menus/{}/items", self.base_url, menu));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let body: serde_json::Value = request.send().await?.error_for_status()?.json().await?;
        Ok(serde_json::from_value(body["data"].clone())?)
    }
}
