use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use headless_chrome::{
    protocol::cdp::Page::CaptureScreenshotFormatOption, Browser, LaunchOptions, Tab,
};
use tracing::{debug, info, warn};

use crate::{
    config::{BrowserConfig, SiteConfig},
    domain::{Extraction, MissingContent},
    monitor::PageSource,
};

const WINDOW_SIZE: (u32, u32) = (1920, 1080);
/// Empties an input so typing replaces autofilled or pre-populated values.
const CLEAR_FIELD_JS: &str =
    "function() { this.value = ''; this.dispatchEvent(new Event('input', { bubbles: true })); }";

/// Logs in with headless Chrome and reads the monitored region.
pub struct BrowserPageSource {
    site: SiteConfig,
    config: BrowserConfig,
}

impl BrowserPageSource {
    pub fn new(site: SiteConfig, config: BrowserConfig) -> Self {
        Self { site, config }
    }
}

#[async_trait]
impl PageSource for BrowserPageSource {
    async fn fetch(&self) -> Result<Extraction> {
        let site = self.site.clone();
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || fetch_blocking(&site, &config))
            .await
            .context("browser task panicked")?
    }
}

fn fetch_blocking(site: &SiteConfig, config: &BrowserConfig) -> Result<Extraction> {
    let options = LaunchOptions::default_builder()
        .headless(config.headless)
        .window_size(Some(WINDOW_SIZE))
        .build()
        .map_err(|err| anyhow!("invalid browser launch options: {err}"))?;
    let browser = Browser::new(options).context("failed to launch browser")?;
    let tab = browser.new_tab().context("failed to open browser tab")?;
    tab.set_default_timeout(config.idle_timeout);

    info!(target: "page", url = %site.login_url, "logging in");
    navigate(&tab, site.login_url.as_str())?;
    fill(&tab, &site.username_selector, &site.username)?;
    fill(&tab, &site.password_selector, &site.password)?;
    tab.wait_for_element(&site.submit_selector)
        .with_context(|| format!("submit control {} not found", site.submit_selector))?
        .click()
        .with_context(|| format!("failed to click {}", site.submit_selector))?;
    settle(&tab);

    info!(target: "page", url = %site.target_url, "opening monitored page");
    navigate(&tab, site.target_url.as_str())?;
    Ok(extract(&tab, site, config.selector_timeout))
}

fn navigate(tab: &Tab, url: &str) -> Result<()> {
    tab.navigate_to(url)
        .with_context(|| format!("failed to navigate to {url}"))?;
    settle(tab);
    Ok(())
}

/// Best-effort wait for the page to finish loading. Some sites never go idle.
fn settle(tab: &Tab) {
    if let Err(err) = tab.wait_until_navigated() {
        warn!(target: "page", error = %err, "page did not settle in time, continuing");
    }
}

fn fill(tab: &Tab, selector: &str, value: &str) -> Result<()> {
    let field = tab
        .wait_for_element(selector)
        .with_context(|| format!("login field {selector} not found"))?;
    field
        .call_js_fn(CLEAR_FIELD_JS, vec![], false)
        .with_context(|| format!("failed to clear {selector}"))?;
    field
        .click()
        .with_context(|| format!("failed to focus {selector}"))?;
    field
        .type_into(value)
        .with_context(|| format!("failed to type into {selector}"))?;
    Ok(())
}

fn extract(tab: &Tab, site: &SiteConfig, timeout: Duration) -> Extraction {
    let selector = site.content_selector.as_str();
    let element = match tab.wait_for_element_with_custom_timeout(selector, timeout) {
        Ok(element) => element,
        Err(err) => {
            warn!(target: "page", selector, error = %err, "content selector not found");
            return Extraction::Missing(capture_missing(tab, site));
        }
    };

    match element.get_inner_text() {
        Ok(text) => {
            debug!(target: "page", chars = text.chars().count(), "content extracted");
            Extraction::Found(text)
        }
        Err(err) => {
            warn!(target: "page", selector, error = %err, "content text unreadable");
            Extraction::Missing(capture_missing(tab, site))
        }
    }
}

fn capture_missing(tab: &Tab, site: &SiteConfig) -> MissingContent {
    let screenshot = tab
        .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
        .inspect_err(|err| warn!(target: "page", error = %err, "debug screenshot failed"))
        .ok();
    let markup = tab
        .get_content()
        .inspect_err(|err| warn!(target: "page", error = %err, "debug markup capture failed"))
        .ok();
    missing_content(site, screenshot, markup)
}

fn missing_content(
    site: &SiteConfig,
    screenshot: Option<Vec<u8>>,
    markup: Option<String>,
) -> MissingContent {
    MissingContent {
        selector: site.content_selector.clone(),
        url: site.target_url.to_string(),
        screenshot,
        markup,
    }
}
