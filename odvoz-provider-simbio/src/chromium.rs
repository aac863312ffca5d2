//! Page driver backed by a headless Chromium instance.

use std::path::PathBuf;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::{Element, Page};
use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use odvoz_core::{
    model::Locator,
    ports::{PageDriver, PageElement, PageSession, PortError},
};

const BROWSER_ARGS: [&str; 2] = ["--disable-dev-shm-usage", "--disable-gpu"];

/// Launch options for [`ChromiumDriver`].
#[derive(Debug, Clone)]
pub struct ChromiumOptions {
    /// Browser executable; auto-detected when `None`.
    pub executable: Option<PathBuf>,
    /// Run without a visible window.
    pub headless: bool,
}

impl Default for ChromiumOptions {
    fn default() -> Self {
        Self {
            executable: None,
            headless: true,
        }
    }
}

/// Launches a fresh browser for every session.
pub struct ChromiumDriver {
    options: ChromiumOptions,
}

impl ChromiumDriver {
    /// Create a driver with the given launch options.
    #[must_use]
    pub fn new(options: ChromiumOptions) -> Self {
        Self { options }
    }

    fn config(&self) -> Result<BrowserConfig, PortError> {
        let mut builder = BrowserConfig::builder().no_sandbox().args(BROWSER_ARGS);

        if !self.options.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &self.options.executable {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(PortError::Launch)
    }
}

#[async_trait]
impl PageDriver for ChromiumDriver {
    async fn open(&self) -> Result<Box<dyn PageSession>, PortError> {
        let (browser, mut handler) = Browser::launch(self.config()?)
            .await
            .map_err(|err| PortError::Launch(err.to_string()))?;

        // The CDP connection only makes progress while its handler is polled.
        // Errors such as unknown events are not fatal; keep draining until the
        // connection itself ends.
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    trace!(error = %err, "browser handler event failed");
                }
            }
            debug!("browser connection ended");
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(err) => {
                discard(browser, handler).await;
                return Err(PortError::Launch(err.to_string()));
            }
        };

        debug!("browser session opened");
        Ok(Box::new(ChromiumSession {
            browser,
            page,
            handler,
        }))
    }
}

struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

#[async_trait]
impl PageSession for ChromiumSession {
    async fn navigate(&self, url: &str) -> Result<(), PortError> {
        self.ensure_connected()?;
        self.page
            .goto(url)
            .await
            .map_err(|err| PortError::Navigation(format!("{url}: {err}")))?;
        Ok(())
    }

    async fn find(&self, locator: &Locator) -> Result<Box<dyn PageElement>, PortError> {
        self.ensure_connected()?;
        let found = match locator {
            Locator::Css(selector) => self.page.find_element(selector.as_str()).await,
            Locator::XPath(expression) => self.page.find_xpath(expression.as_str()).await,
        };

        found
            .map(|element| Box::new(ChromiumElement { element }) as Box<dyn PageElement>)
            .map_err(|_err| PortError::NotFound(locator.clone()))
    }

    async fn close(self: Box<Self>) -> Result<(), PortError> {
        let Self {
            mut browser,
            page,
            handler,
        } = *self;
        drop(page);

        if let Err(err) = browser.close().await {
            // The process may not exit on its own now; make sure it is gone.
            discard(browser, handler).await;
            return Err(PortError::Internal(format!("browser close failed: {err}")));
        }
        let exited = browser.wait().await;
        handler.abort();

        exited.map_err(|err| {
            PortError::Internal(format!("waiting for browser exit failed: {err}"))
        })?;
        debug!("browser session closed");
        Ok(())
    }
}

impl ChromiumSession {
    fn ensure_connected(&self) -> Result<(), PortError> {
        if self.handler.is_finished() {
            return Err(PortError::Closed);
        }
        Ok(())
    }
}

/// Tear down a browser whose session is being abandoned.
async fn discard(mut browser: Browser, handler: JoinHandle<()>) {
    if let Some(Err(err)) = browser.kill().await {
        debug!(error = %err, "killing browser process failed");
    }
    handler.abort();
}

struct ChromiumElement {
    element: Element,
}

#[async_trait]
impl PageElement for ChromiumElement {
    async fn send_keys(&self, text: &str) -> Result<(), PortError> {
        self.element
            .focus()
            .await
            .map_err(|err| PortError::Interaction(err.to_string()))?;
        self.element
            .type_str(text)
            .await
            .map_err(|err| PortError::Interaction(err.to_string()))?;
        Ok(())
    }

    async fn click(&self) -> Result<(), PortError> {
        self.element
            .click()
            .await
            .map_err(|err| PortError::Interaction(err.to_string()))?;
        Ok(())
    }

    async fn text(&self) -> Result<String, PortError> {
        self.element
            .inner_text()
            .await
            .map(Option::unwrap_or_default)
            .map_err(|err| PortError::Internal(err.to_string()))
    }
}
