//! Scripted in-memory page driver used by the orchestrator and scheduler tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::model::{Locator, WasteCategory};
use crate::ports::{PageDriver, PageElement, PageSession, PortError};
use crate::target::{CategoryTarget, ScrapeTarget};

pub(crate) const URL: &str = "https://collection.test/next-pickup";
pub(crate) const ADDRESS: &str = "ZAČRET 69,";
pub(crate) const SUGGESTION: &str = "ZAČRET 69 , LJUBEČNA";

pub(crate) fn target() -> ScrapeTarget {
    ScrapeTarget {
        url: URL.to_owned(),
        address: ADDRESS.to_owned(),
        address_input: Locator::css(".ui-comboBox-input"),
        suggestion: Locator::list_item_with_text(SUGGESTION),
        categories: WasteCategory::ALL
            .into_iter()
            .map(|category| CategoryTarget {
                category,
                label: label_locator(category),
                date: date_locator(category),
            })
            .collect(),
    }
}

pub(crate) fn label_locator(category: WasteCategory) -> Locator {
    Locator::css(format!("div.next_{} > div.label", category.site_code()))
}

pub(crate) fn date_locator(category: WasteCategory) -> Locator {
    Locator::css(format!("div.next_{} > div.text", category.site_code()))
}

#[derive(Clone)]
struct FakeElement {
    text: String,
    appears_after: Duration,
    readable: bool,
}

#[derive(Default)]
struct PageState {
    fail_open: bool,
    fail_close: bool,
    navigate_failures: u32,
    send_failures: u32,
    click_failures: u32,
    elements: HashMap<Locator, FakeElement>,
    loaded_at: Option<Instant>,
    opened: u32,
    closed: u32,
    navigations: u32,
    sends: u32,
    typed: Vec<String>,
    clicks: u32,
}

/// Fake browser whose page content is scripted per test.
#[derive(Clone, Default)]
pub(crate) struct FakeDriver {
    state: Arc<Mutex<PageState>>,
}

impl FakeDriver {
    fn state(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().expect("fake page state poisoned")
    }

    /// Page with every element of [`target`] present right after load.
    pub(crate) fn with_full_page(readings: &[(WasteCategory, &str, &str)]) -> Self {
        let driver = Self::default();
        driver.show(&target().address_input, "", Duration::ZERO);
        driver.show(&target().suggestion, SUGGESTION, Duration::ZERO);
        for (category, label, date) in readings {
            driver.show(&label_locator(*category), label, Duration::ZERO);
            driver.show(&date_locator(*category), date, Duration::ZERO);
        }
        driver
    }

    pub(crate) fn show(&self, locator: &Locator, text: &str, appears_after: Duration) {
        self.state().elements.insert(
            locator.clone(),
            FakeElement {
                text: text.to_owned(),
                appears_after,
                readable: true,
            },
        );
    }

    /// Element stays findable but reading its text fails.
    pub(crate) fn make_unreadable(&self, locator: &Locator) {
        if let Some(element) = self.state().elements.get_mut(locator) {
            element.readable = false;
        }
    }

    pub(crate) fn hide(&self, locator: &Locator) {
        self.state().elements.remove(locator);
    }

    pub(crate) fn fail_open(&self, fail: bool) {
        self.state().fail_open = fail;
    }

    pub(crate) fn fail_close(&self, fail: bool) {
        self.state().fail_close = fail;
    }

    pub(crate) fn fail_sends(&self, count: u32) {
        self.state().send_failures = count;
    }

    pub(crate) fn fail_navigations(&self, count: u32) {
        self.state().navigate_failures = count;
    }

    pub(crate) fn fail_clicks(&self, count: u32) {
        self.state().click_failures = count;
    }

    pub(crate) fn opened(&self) -> u32 {
        self.state().opened
    }

    pub(crate) fn closed(&self) -> u32 {
        self.state().closed
    }

    pub(crate) fn navigations(&self) -> u32 {
        self.state().navigations
    }

    pub(crate) fn sends(&self) -> u32 {
        self.state().sends
    }

    pub(crate) fn typed(&self) -> Vec<String> {
        self.state().typed.clone()
    }

    pub(crate) fn clicks(&self) -> u32 {
        self.state().clicks
    }
}

#[async_trait]
impl PageDriver for FakeDriver {
    async fn open(&self) -> Result<Box<dyn PageSession>, PortError> {
        let mut state = self.state();
        if state.fail_open {
            return Err(PortError::Launch("no browser binary".to_owned()));
        }
        state.opened += 1;
        state.loaded_at = None;
        Ok(Box::new(FakeSession {
            state: Arc::clone(&self.state),
        }))
    }
}

struct FakeSession {
    state: Arc<Mutex<PageState>>,
}

impl FakeSession {
    fn state(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().expect("fake page state poisoned")
    }
}

#[async_trait]
impl PageSession for FakeSession {
    async fn navigate(&self, url: &str) -> Result<(), PortError> {
        let mut state = self.state();
        state.navigations += 1;
        if state.navigate_failures > 0 {
            state.navigate_failures -= 1;
            return Err(PortError::Navigation(format!("{url}: connection reset")));
        }
        state.loaded_at = Some(Instant::now());
        Ok(())
    }

    async fn find(&self, locator: &Locator) -> Result<Box<dyn PageElement>, PortError> {
        let state = self.state();
        let visible = state.loaded_at.and_then(|loaded_at| {
            state
                .elements
                .get(locator)
                .filter(|element| Instant::now() >= loaded_at + element.appears_after)
        });

        match visible {
            Some(element) => Ok(Box::new(FakeHandle {
                text: element.text.clone(),
                readable: element.readable,
                state: Arc::clone(&self.state),
            })),
            None => Err(PortError::NotFound(locator.clone())),
        }
    }

    async fn close(self: Box<Self>) -> Result<(), PortError> {
        let mut state = self.state();
        state.closed += 1;
        if state.fail_close {
            return Err(PortError::Internal("browser did not exit".to_owned()));
        }
        Ok(())
    }
}

struct FakeHandle {
    text: String,
    readable: bool,
    state: Arc<Mutex<PageState>>,
}

impl FakeHandle {
    fn state(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().expect("fake page state poisoned")
    }
}

#[async_trait]
impl PageElement for FakeHandle {
    async fn send_keys(&self, text: &str) -> Result<(), PortError> {
        let mut state = self.state();
        state.sends += 1;
        if state.send_failures > 0 {
            state.send_failures -= 1;
            return Err(PortError::Interaction("element is not focusable".to_owned()));
        }
        state.typed.push(text.to_owned());
        Ok(())
    }

    async fn click(&self) -> Result<(), PortError> {
        let mut state = self.state();
        state.clicks += 1;
        if state.click_failures > 0 {
            state.click_failures -= 1;
            return Err(PortError::Interaction("element is detached".to_owned()));
        }
        Ok(())
    }

    async fn text(&self) -> Result<String, PortError> {
        if !self.readable {
            return Err(PortError::Internal("node has no inner text".to_owned()));
        }
        Ok(self.text.clone())
    }
}
