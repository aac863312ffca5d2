//! Traits describing the page-interaction capability and its errors.

use async_trait::async_trait;

use crate::model::Locator;

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while driving a page through an automation backend.
pub enum PortError {
    /// The automation backend could not be started or connected to.
    #[error("Launch error: {0}")]
    Launch(String),
    /// Loading a URL failed.
    #[error("Navigation error: {0}")]
    Navigation(String),
    /// No element currently matches the locator.
    #[error("Element not found: {0}")]
    NotFound(Locator),
    /// Typing into or clicking an element failed.
    #[error("Interaction error: {0}")]
    Interaction(String),
    /// The session or browser has already gone away.
    #[error("Session closed")]
    Closed,
    /// Internal backend error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[async_trait]
/// Factory for disposable page sessions.
pub trait PageDriver: Send + Sync {
    /// Open a fresh session.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Launch`] when the backend cannot be started.
    async fn open(&self) -> Result<Box<dyn PageSession>, PortError>;
}

#[async_trait]
/// One live page owned by a single refresh cycle.
pub trait PageSession: Send + Sync {
    /// Load `url` in the page.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the page cannot be loaded.
    async fn navigate(&self, url: &str) -> Result<(), PortError>;

    /// Resolve `locator` against the current page state, once.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::NotFound`] when nothing matches right now.
    async fn find(&self, locator: &Locator) -> Result<Box<dyn PageElement>, PortError>;

    /// Release the session and everything it holds.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the backend fails to shut down cleanly.
    async fn close(self: Box<Self>) -> Result<(), PortError>;
}

#[async_trait]
/// Element resolved on a live page.
pub trait PageElement: Send + Sync {
    /// Type `text` into the element.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Interaction`] when the keystrokes cannot be delivered.
    async fn send_keys(&self, text: &str) -> Result<(), PortError>;

    /// Click the element.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Interaction`] when the click cannot be delivered.
    async fn click(&self) -> Result<(), PortError>;

    /// Rendered text of the element.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the text cannot be read.
    async fn text(&self) -> Result<String, PortError>;
}
