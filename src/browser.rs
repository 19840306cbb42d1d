// Copyright (c) 2025 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Headless Chrome sessions for page visits and screenshots.
//! headless_chrome is synchronous, so every call runs on a blocking thread.

use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions};
use std::time::Duration;
use tracing::debug;

use crate::errors::{AuxError, AuxResult};

const DEFAULT_WINDOW: (u32, u32) = (1366, 768);

#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub headless: bool,
    pub proxy: Option<String>,
    /// Page-load timeout, also used as the idle timeout of the browser process
    pub timeout: Duration,
    pub window: (u32, u32),
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            proxy: None,
            timeout: Duration::from_secs(10),
            window: DEFAULT_WINDOW,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BrowserSession {
    options: BrowserOptions,
}

impl BrowserSession {
    pub fn new(options: BrowserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BrowserOptions {
        &self.options
    }

    /// Open `url` and keep the tab alive for `dwell`
    pub async fn visit(&self, url: &str, dwell: Duration) -> AuxResult<()> {
        let url = url.to_string();
        let options = self.options.clone();

        tokio::task::spawn_blocking(move || Self::visit_sync(&url, dwell, &options))
            .await
            .map_err(|e| AuxError::Browser(format!("Browser task panicked: {}", e)))?
    }

    /// PNG of the page as rendered in the configured window
    pub async fn screenshot(&self, url: &str) -> AuxResult<Vec<u8>> {
        let url = url.to_string();
        let options = self.options.clone();

        tokio::task::spawn_blocking(move || Self::screenshot_sync(&url, &options))
            .await
            .map_err(|e| AuxError::Browser(format!("Browser task panicked: {}", e)))?
    }

    fn launch(options: &BrowserOptions) -> AuxResult<Browser> {
        let launch_options = LaunchOptions::default_builder()
            .headless(options.headless)
            .ignore_certificate_errors(true)
            .sandbox(false)
            .window_size(Some(options.window))
            .idle_browser_timeout(options.timeout)
            .proxy_server(options.proxy.as_deref())
            .build()
            .map_err(|e| AuxError::Browser(format!("Browser launch options error: {}", e)))?;

        Browser::new(launch_options)
            .map_err(|e| AuxError::Browser(format!("Failed to launch Chrome/Chromium: {}", e)))
    }

    fn visit_sync(url: &str, dwell: Duration, options: &BrowserOptions) -> AuxResult<()> {
        let browser = Self::launch(options)?;
        let tab = browser
            .new_tab()
            .map_err(|e| AuxError::Browser(format!("Failed to create tab: {}", e)))?;
        tab.set_default_timeout(options.timeout);

        tab.navigate_to(url)
            .and_then(|t| t.wait_until_navigated())
            .map_err(|e| AuxError::Browser(format!("Navigation to {} failed: {}", url, e)))?;

        debug!(url = url, dwell_ms = dwell.as_millis() as u64, "Page loaded");
        std::thread::sleep(dwell);
        Ok(())
    }

    fn screenshot_sync(url: &str, options: &BrowserOptions) -> AuxResult<Vec<u8>> {
        let browser = Self::launch(options)?;
        let tab = browser
            .new_tab()
            .map_err(|e| AuxError::Browser(format!("Failed to create tab: {}", e)))?;
        tab.set_default_timeout(options.timeout);

        tab.navigate_to(url)
            .and_then(|t| t.wait_until_navigated())
            .map_err(|e| AuxError::Browser(format!("Navigation to {} failed: {}", url, e)))?;

        tab.capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| AuxError::Browser(format!("Screenshot of {} failed: {}", url, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = BrowserOptions::default();
        assert!(options.headless);
        assert_eq!(options.window, DEFAULT_WINDOW);
        assert_eq!(options.timeout, Duration::from_secs(10));
    }
}
