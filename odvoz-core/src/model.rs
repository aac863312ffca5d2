//! Domain data structures for waste categories, snapshots, and page locators.

use std::fmt;
use std::time::Duration;

/// Waste categories published on the collection page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WasteCategory {
    /// Mixed municipal (residual) waste.
    General,
    /// Packaging waste.
    Packaging,
    /// Biodegradable kitchen and garden waste.
    Bio,
}

impl WasteCategory {
    /// All categories in display order.
    pub const ALL: [Self; 3] = [Self::General, Self::Packaging, Self::Bio];

    /// Short code the collection page uses in its markup (`mko`, `emb`, `bio`).
    #[must_use]
    pub fn site_code(self) -> &'static str {
        match self {
            Self::General => "mko",
            Self::Packaging => "emb",
            Self::Bio => "bio",
        }
    }

    /// Human-friendly name used in logs and as a fallback heading.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::General => "General waste",
            Self::Packaging => "Packaging",
            Self::Bio => "Bio-waste",
        }
    }
}

impl fmt::Display for WasteCategory {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.display_name())
    }
}

/// Label and next collection date read for one category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryReading {
    /// Label as rendered by the page, e.g. "Mešani komunalni odpadki".
    pub label: String,
    /// Next collection date exactly as rendered by the page.
    pub date: String,
}

impl CategoryReading {
    /// Build a reading from a label and a date string.
    #[must_use]
    pub fn new<L: Into<String>, D: Into<String>>(label: L, date: D) -> Self {
        Self {
            label: label.into(),
            date: date.into(),
        }
    }
}

/// Latest complete set of collection dates for the configured address.
///
/// The default value is the startup-empty snapshot: all six fields are empty
/// strings until the first successful refresh cycle publishes real data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WasteSnapshot {
    /// Mixed municipal waste.
    pub general: CategoryReading,
    /// Packaging waste.
    pub packaging: CategoryReading,
    /// Bio-waste.
    pub bio: CategoryReading,
}

impl WasteSnapshot {
    /// Reading stored for `category`.
    #[must_use]
    pub fn reading(&self, category: WasteCategory) -> &CategoryReading {
        match category {
            WasteCategory::General => &self.general,
            WasteCategory::Packaging => &self.packaging,
            WasteCategory::Bio => &self.bio,
        }
    }

    /// Replace the reading for `category`.
    pub fn set(&mut self, category: WasteCategory, reading: CategoryReading) {
        let slot = match category {
            WasteCategory::General => &mut self.general,
            WasteCategory::Packaging => &mut self.packaging,
            WasteCategory::Bio => &mut self.bio,
        };
        *slot = reading;
    }

    /// Whether every field is still empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Description used to resolve an element on the live page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// CSS selector.
    Css(String),
    /// `XPath` expression.
    XPath(String),
}

impl Locator {
    /// CSS selector locator.
    #[must_use]
    pub fn css<S: Into<String>>(selector: S) -> Self {
        Self::Css(selector.into())
    }

    /// `XPath` locator.
    #[must_use]
    pub fn xpath<S: Into<String>>(expression: S) -> Self {
        Self::XPath(expression.into())
    }

    /// `XPath` matching a list item whose whitespace-normalised rendered text
    /// equals `text` exactly.
    #[must_use]
    pub fn list_item_with_text(text: &str) -> Self {
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        Self::XPath(format!(
            "//li[normalize-space(.)={}]",
            xpath_literal(&normalized)
        ))
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(selector) => write!(formatter, "css \"{selector}\""),
            Self::XPath(expression) => write!(formatter, "xpath \"{expression}\""),
        }
    }
}

// XPath 1.0 has no escape sequences, so literals containing both quote kinds
// have to be assembled with concat().
fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        return format!("'{text}'");
    }
    if !text.contains('"') {
        return format!("\"{text}\"");
    }

    let parts = text
        .split('\'')
        .map(|part| format!("'{part}'"))
        .collect::<Vec<_>>()
        .join(", \"'\", ");
    format!("concat({parts})")
}

/// How often and how patiently a whole operation is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts; zero is treated as one.
    pub attempts: u32,
    /// Pause between two consecutive attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Create a policy with the given attempt budget and delay.
    #[must_use]
    pub const fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    /// Attempt budget actually used by the executor.
    #[must_use]
    pub fn effective_attempts(&self) -> u32 {
        self.attempts.max(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(2))
    }
}

/// How long to wait for a page element and how often to look for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Total window measured from the start of the wait.
    pub timeout: Duration,
    /// Pause between two probes.
    pub interval: Duration,
}

impl PollPolicy {
    /// Default pause between probes.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

    /// Policy with the given timeout and the default probe interval.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            interval: Self::DEFAULT_INTERVAL,
        }
    }
}
