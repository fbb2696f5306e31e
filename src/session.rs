use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::warn;

const PRESENCE_POLL: Duration = Duration::from_millis(250);

/// Outcome of a single element lookup. Absence is a value, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(String),
    Absent,
}

impl Lookup {
    pub fn or_empty(self) -> String {
        match self {
            Lookup::Found(value) => value,
            Lookup::Absent => String::new(),
        }
    }
}

/// Query surface of the live rendered page, consumed by the extractor and
/// the visit loop. Launch/quit lifecycle stays on the concrete driver type.
#[async_trait]
pub trait RenderSession {
    async fn navigate(&self, url: &str) -> Result<()>;
    /// Poll for an element until it appears or the timeout elapses.
    async fn wait_for_presence(&self, selector: &str, timeout: Duration) -> Result<bool>;
    /// Halt further resource loading; the initial markup is all we read.
    async fn stop_loading(&self) -> Result<()>;
    async fn find_text(&self, selector: &str) -> Result<Lookup>;
    async fn find_attribute(&self, selector: &str, attr: &str) -> Result<Lookup>;
}

/// Chromium-backed session: one browser, one tab, reused across all visits.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl BrowserSession {
    pub async fn launch(headless: bool) -> Result<Self> {
        let mut builder = BrowserConfig::builder();
        if !headless {
            builder = builder.with_head();
        }
        let config = builder
            .build()
            .map_err(|e| anyhow!("Invalid browser config: {}", e))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("Failed to launch browser")?;

        // Drain CDP events for the lifetime of the session.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!("Browser handler event error: {}", e);
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("Failed to open browser tab")?;

        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }

    pub async fn quit(mut self) -> Result<()> {
        self.browser
            .close()
            .await
            .context("Failed to close browser")?;
        let _ = self.browser.wait().await;
        self.handler_task.abort();
        Ok(())
    }
}

#[async_trait]
impl RenderSession for BrowserSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .with_context(|| format!("Navigation failed for {}", url))?;
        Ok(())
    }

    async fn wait_for_presence(&self, selector: &str, timeout: Duration) -> Result<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(PRESENCE_POLL).await;
        }
    }

    async fn stop_loading(&self) -> Result<()> {
        self.page
            .evaluate("window.stop();")
            .await
            .context("window.stop() failed")?;
        Ok(())
    }

    async fn find_text(&self, selector: &str) -> Result<Lookup> {
        match self.page.find_element(selector).await {
            Ok(element) => {
                let text = element.inner_text().await?.unwrap_or_default();
                Ok(Lookup::Found(text.trim().to_string()))
            }
            Err(_) => Ok(Lookup::Absent),
        }
    }

    async fn find_attribute(&self, selector: &str, attr: &str) -> Result<Lookup> {
        match self.page.find_element(selector).await {
            Ok(element) => match element.attribute(attr).await? {
                Some(value) => Ok(Lookup::Found(value)),
                None => Ok(Lookup::Absent),
            },
            Err(_) => Ok(Lookup::Absent),
        }
    }
}
