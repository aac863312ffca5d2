//! Description of the page a refresh cycle drives and the elements it reads.

use crate::model::{Locator, WasteCategory};

/// Locators for one category's label and date elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTarget {
    /// Category these locators belong to.
    pub category: WasteCategory,
    /// Element holding the category label.
    pub label: Locator,
    /// Element holding the next collection date.
    pub date: Locator,
}

/// Everything the orchestrator needs to know about the collection page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeTarget {
    /// Page to load at the start of every cycle.
    pub url: String,
    /// Text typed into the address input.
    pub address: String,
    /// Address input control.
    pub address_input: Locator,
    /// Suggestion entry to click once the address is typed.
    pub suggestion: Locator,
    /// Per-category locators, one entry per [`WasteCategory`].
    pub categories: Vec<CategoryTarget>,
}

impl ScrapeTarget {
    /// Locators for `category`, if the target defines them.
    #[must_use]
    pub fn category(&self, category: WasteCategory) -> Option<&CategoryTarget> {
        self.categories
            .iter()
            .find(|candidate| candidate.category == category)
    }
}
