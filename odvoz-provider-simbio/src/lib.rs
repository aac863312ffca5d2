//! Provider implementation for the Simbio "moj dan odvoza odpadkov" page.

/// Chromium-backed implementation of the page-interaction ports.
pub mod chromium;

use std::sync::Arc;

use odvoz_core::{
    model::{Locator, WasteCategory},
    ports::PageDriver,
    target::{CategoryTarget, ScrapeTarget},
};

pub use chromium::{ChromiumDriver, ChromiumOptions};

const PAGE_URL: &str = "https://www.simbio.si/sl/moj-dan-odvoza-odpadkov";

// The combo box only lists suggestions once the trailing comma is typed.
const ADDRESS: &str = "ZAČRET 69,";
const SUGGESTION_TEXT: &str = "ZAČRET 69 , LJUBEČNA";

const ADDRESS_INPUT_SELECTOR: &str = ".ui-comboBox-input";

/// Scrape target for the configured household.
#[must_use]
pub fn target() -> ScrapeTarget {
    ScrapeTarget {
        url: PAGE_URL.to_owned(),
        address: ADDRESS.to_owned(),
        address_input: Locator::css(ADDRESS_INPUT_SELECTOR),
        suggestion: Locator::list_item_with_text(SUGGESTION_TEXT),
        categories: WasteCategory::ALL.into_iter().map(category_target).collect(),
    }
}

/// Page driver launching Chromium with the given options.
#[must_use]
pub fn driver(options: ChromiumOptions) -> Arc<dyn PageDriver> {
    Arc::new(ChromiumDriver::new(options))
}

/// Result widgets are `div.next_<code>` blocks with a label and a date child.
fn category_target(category: WasteCategory) -> CategoryTarget {
    let code = category.site_code();
    CategoryTarget {
        category,
        label: Locator::css(format!("div.next_{code} > div.label")),
        date: Locator::css(format!("div.next_{code} > div.text")),
    }
}
