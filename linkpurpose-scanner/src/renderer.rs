//! Page rendering through a WebDriver endpoint.
//!
//! Pages that load content on scroll are materialized by repeatedly
//! scrolling to the bottom until the document height stops changing.

use crate::error::{Result, ScanError};
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use serde_json::{Map, Value, json};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

const SCROLL_HEIGHT_SCRIPT: &str = "return document.body.scrollHeight;";
const SCROLL_TO_BOTTOM_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";
const SESSION_CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Anything that can turn a URL into its final, script-populated HTML.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub webdriver_url: String,
    pub headless: bool,
    pub browser_binary: Option<String>,
    /// Pause after each scroll for new content to arrive
    pub settle_interval: Duration,
    pub max_scroll_rounds: usize,
    /// Upper bound for the whole render, navigation included
    pub timeout: Duration,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: true,
            browser_binary: None,
            settle_interval: Duration::from_secs(2),
            max_scroll_rounds: 50,
            timeout: Duration::from_secs(60),
        }
    }
}

pub struct WebDriverRenderer {
    config: RendererConfig,
}

impl WebDriverRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    fn capabilities(&self) -> Map<String, Value> {
        let mut args = vec!["--disable-gpu", "--no-sandbox", "--disable-dev-shm-usage"];
        if self.config.headless {
            args.push("--headless");
        }

        let mut chrome_options = json!({ "args": args });
        if let Some(ref binary) = self.config.browser_binary {
            chrome_options["binary"] = json!(binary);
        }

        let mut caps = Map::new();
        caps.insert("goog:chromeOptions".to_string(), chrome_options);
        caps
    }

    async fn connect(&self) -> Result<Client> {
        debug!("Connecting to WebDriver at {}", self.config.webdriver_url);
        let client = ClientBuilder::native()
            .capabilities(self.capabilities())
            .connect(&self.config.webdriver_url)
            .await?;
        Ok(client)
    }

    async fn load(&self, client: &Client, url: &str) -> Result<String> {
        client.goto(url).await?;
        self.scroll_to_end(client).await?;
        Ok(client.source().await?)
    }

    async fn scroll_to_end(&self, client: &Client) -> Result<()> {
        let mut last_height = scroll_height(client).await?;

        for round in 1..=self.config.max_scroll_rounds {
            client.execute(SCROLL_TO_BOTTOM_SCRIPT, vec![]).await?;
            tokio::time::sleep(self.config.settle_interval).await;

            let new_height = scroll_height(client).await?;
            debug!("Scroll round {}: height {} -> {}", round, last_height, new_height);
            if new_height == last_height {
                return Ok(());
            }
            last_height = new_height;
        }

        warn!(
            "Page still growing after {} scroll rounds, using what has loaded",
            self.config.max_scroll_rounds
        );
        Ok(())
    }
}

async fn scroll_height(client: &Client) -> Result<u64> {
    let value = client.execute(SCROLL_HEIGHT_SCRIPT, vec![]).await?;
    value
        .as_u64()
        .or_else(|| value.as_f64().map(|h| h as u64))
        .ok_or_else(|| ScanError::Render(format!("unexpected scrollHeight value: {}", value)))
}

impl WebDriverRenderer {
    fn timed_out(&self, url: &str) -> ScanError {
        ScanError::RenderTimeout {
            url: url.to_string(),
            timeout: self.config.timeout,
        }
    }
}

async fn close_session(client: Client) {
    match tokio::time::timeout(SESSION_CLOSE_TIMEOUT, client.close()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("Failed to close WebDriver session: {}", e),
        Err(_) => warn!(
            "WebDriver session did not close within {:?}, abandoning it",
            SESSION_CLOSE_TIMEOUT
        ),
    }
}

#[async_trait]
impl PageRenderer for WebDriverRenderer {
    async fn render(&self, url: &str) -> Result<String> {
        Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", url, e)))?;

        info!("Rendering {}", url);
        // One deadline covers session creation and loading
        let deadline = Instant::now() + self.config.timeout;

        let client = match tokio::time::timeout_at(deadline, self.connect()).await {
            Ok(client) => client?,
            Err(_) => return Err(self.timed_out(url)),
        };
        let outcome = tokio::time::timeout_at(deadline, self.load(&client, url)).await;

        close_session(client).await;

        match outcome {
            Ok(html) => html,
            Err(_) => Err(self.timed_out(url)),
        }
    }
}
