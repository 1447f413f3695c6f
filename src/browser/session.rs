use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use headless_chrome::{Browser, Tab};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::FetchError;

/// DOM snapshot of a loaded page
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// URL the browser ended up on
    pub url: String,
    pub html: String,
}

/// A browser tab the fetch stage can drive
///
/// Calls are made one at a time; implementations never see concurrent use.
#[async_trait]
pub trait PageSession: Send + Sync {
    /// Load `url` and wait for the document to be ready
    ///
    /// Gives up with [`FetchError::Timeout`] after `timeout`, but must not
    /// return while the tab is still busy with this navigation.
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), FetchError>;

    /// Serialize the current DOM
    async fn snapshot(&self) -> Result<RenderedPage, FetchError>;
}

/// Configuration for attaching to a running Chrome
#[derive(Debug, Clone)]
pub struct ChromeConfig {
    /// DevTools HTTP endpoint of a Chrome started with `--remote-debugging-port`
    pub endpoint: String,
    /// Per-navigation limit inside the browser
    pub navigation_timeout: Duration,
    /// How long the websocket may sit idle between pages
    pub idle_timeout: Duration,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9222".to_string(),
            navigation_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, Deserialize)]
struct VersionInfo {
    #[serde(rename = "webSocketDebuggerUrl")]
    web_socket_debugger_url: String,
}

/// Session on an already-running Chrome, reusing its first tab
pub struct ChromeSession {
    // Dropping the browser closes the connection, so it must outlive the tab
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeSession {
    /// Attach to the browser behind `config.endpoint`
    pub async fn attach(config: &ChromeConfig) -> Result<Self, FetchError> {
        let ws_url = discover_ws_url(&config.endpoint).await?;
        info!("Connecting to browser at {}", ws_url);

        let idle_timeout = config.idle_timeout;
        let navigation_timeout = config.navigation_timeout;
        let (browser, tab) = tokio::task::spawn_blocking(move || {
            let browser = Browser::connect_with_timeout(ws_url, idle_timeout)
                .map_err(|e| FetchError::Browser(e.to_string()))?;

            let existing = browser
                .get_tabs()
                .lock()
                .map_err(|_| FetchError::Browser("tab list lock poisoned".to_string()))?
                .first()
                .cloned();
            let tab = match existing {
                Some(tab) => tab,
                None => browser
                    .new_tab()
                    .map_err(|e| FetchError::Browser(e.to_string()))?,
            };
            tab.set_default_timeout(navigation_timeout);

            Ok::<_, FetchError>((browser, tab))
        })
        .await
        .map_err(|e| FetchError::Browser(format!("browser task failed: {}", e)))??;

        Ok(Self {
            _browser: browser,
            tab,
        })
    }
}

#[async_trait]
impl PageSession for ChromeSession {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), FetchError> {
        let tab = Arc::clone(&self.tab);
        let target = url.to_string();

        bounded_tab_call(url, timeout, move || {
            let navigation_error = |e: anyhow::Error| FetchError::Navigation {
                url: target.clone(),
                reason: e.to_string(),
            };
            tab.navigate_to(&target).map_err(navigation_error)?;
            tab.wait_until_navigated().map_err(navigation_error)?;
            Ok(())
        })
        .await
    }

    async fn snapshot(&self) -> Result<RenderedPage, FetchError> {
        let tab = Arc::clone(&self.tab);

        tokio::task::spawn_blocking(move || {
            let html = tab
                .get_content()
                .map_err(|e| FetchError::Snapshot(e.to_string()))?;
            Ok::<_, FetchError>(RenderedPage {
                url: tab.get_url(),
                html,
            })
        })
        .await
        .map_err(|e| FetchError::Browser(format!("snapshot task failed: {}", e)))?
    }
}

/// Run blocking tab work for `url`, reporting a timeout after `timeout`
///
/// A blocking thread cannot be cancelled, so on timeout this still waits for
/// `work` to finish before returning. The next call then gets an idle tab.
pub async fn bounded_tab_call<T, F>(url: &str, timeout: Duration, work: F) -> Result<T, FetchError>
where
    F: FnOnce() -> Result<T, FetchError> + Send + 'static,
    T: Send + 'static,
{
    let mut handle = tokio::task::spawn_blocking(work);

    match tokio::time::timeout(timeout, &mut handle).await {
        Ok(joined) => {
            joined.map_err(|e| FetchError::Browser(format!("browser task failed: {}", e)))?
        }
        Err(_) => {
            warn!(
                "{} still loading after {}ms, waiting for the tab to go idle",
                url,
                timeout.as_millis()
            );
            if let Err(e) = handle.await {
                warn!("Browser task for {} ended abnormally: {}", url, e);
            }
            Err(FetchError::Timeout {
                url: url.to_string(),
                timeout,
            })
        }
    }
}

/// Ask the DevTools HTTP endpoint for the browser-level websocket URL
async fn discover_ws_url(endpoint: &str) -> Result<String, FetchError> {
    let version_url = format!("{}/json/version", endpoint.trim_end_matches('/'));
    debug!("Querying {}", version_url);

    let discovery_error = |reason: String| FetchError::Discovery {
        endpoint: endpoint.to_string(),
        reason,
    };

    let response = reqwest::get(&version_url)
        .await
        .map_err(|e| discovery_error(e.to_string()))?;
    if !response.status().is_success() {
        return Err(discovery_error(format!("HTTP {}", response.status())));
    }

    let info: VersionInfo = response
        .json()
        .await
        .map_err(|e| discovery_error(e.to_string()))?;
    Ok(info.web_socket_debugger_url)
}
