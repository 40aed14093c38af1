use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use async_trait::async_trait;

/// Selector understood by the injected browser automation backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Locator {
    XPath(String),
    Css(String),
}

impl Locator {
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    pub fn css(expr: impl Into<String>) -> Self {
        Self::Css(expr.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::XPath(expr) | Self::Css(expr) => expr,
        }
    }

    /// Narrows an XPath locator to its 1-based `index`-th match.
    ///
    /// Css locators are returned unchanged; index addressing is an XPath
    /// concern in the Lightning DOM.
    #[must_use]
    pub fn at_index(&self, index: usize) -> Self {
        match self {
            Self::XPath(expr) => Self::XPath(format!("({expr})[{index}]")),
            Self::Css(expr) => Self::Css(expr.clone()),
        }
    }
}

impl Display for Locator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::XPath(expr) => write!(f, "xpath={expr}"),
            Self::Css(expr) => write!(f, "css={expr}"),
        }
    }
}

/// General error reported by the browser automation backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverError {
    pub kind: DriverErrorKind,
    pub message: Option<String>,
}

impl DriverError {
    pub fn new(kind: DriverErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: Some(message.into()) }
    }

    pub fn simple(kind: DriverErrorKind) -> Self {
        Self { kind, message: None }
    }

    /// Standard shape for the most common failure, so every backend reports
    /// missing elements the same way.
    pub fn element_not_found(locator: &Locator) -> Self {
        Self::new(DriverErrorKind::ElementNotFound, format!("no element matches {locator}"))
    }
}

impl Display for DriverError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{msg}"),
            None => write!(f, "{:#?}", self.kind),
        }
    }
}

impl Error for DriverError {}

/// Categorises browser automation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverErrorKind {
    ElementNotFound,
    Timeout,
    InvalidSelector,
    FrameSwitchFailed,
    NavigationFailed,
    SessionLost,
}

/// Handle to a resolved element; every interaction suspends until the backend
/// has performed it.
#[async_trait]
pub trait UiElement: Send + Sync {
    async fn click(&self) -> Result<(), DriverError>;

    async fn send_keys(&self, text: &str) -> Result<(), DriverError>;

    async fn text(&self) -> Result<String, DriverError>;

    /// Returns the attribute value, or `None` when the attribute is not
    /// present on the element.
    async fn attribute(&self, name: &str) -> Result<Option<String>, DriverError>;
}

/// Browser automation capability bound to one browser session.
///
/// Implicit waits and timeouts are configured on the backend; callers issue a
/// single lookup and rely on the backend to poll.
#[async_trait]
pub trait UiDriver: Send + Sync {
    async fn find(&self, locator: &Locator) -> Result<Arc<dyn UiElement>, DriverError>;

    async fn goto(&self, url: &str) -> Result<(), DriverError>;

    /// Switches into the `index`-th (1-based) frame matching `locator`.
    async fn switch_to_frame(&self, locator: &Locator, index: usize) -> Result<(), DriverError>;

    async fn switch_to_default_content(&self) -> Result<(), DriverError>;
}

/// Pool-based driver acquisition keyed by user identity, so scenarios running
/// as different users get independent browser sessions.
#[async_trait]
pub trait DriverPool: Send + Sync {
    async fn acquire(&self, user_key: &str) -> Result<Arc<dyn UiDriver>, DriverError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xpath_locator_at_index_wraps_expression() {
        let locator = Locator::xpath("//button[@name='save']");
        assert_eq!(locator.at_index(2).as_str(), "(//button[@name='save'])[2]");
    }

    #[test]
    fn css_locator_at_index_is_identity() {
        let locator = Locator::css(".slds-form-element__help");
        assert_eq!(locator.at_index(3), locator);
    }

    #[test]
    fn element_not_found_names_the_locator() {
        let err = DriverError::element_not_found(&Locator::xpath("//span[@title='Hot']"));
        assert_eq!(err.kind, DriverErrorKind::ElementNotFound);
        assert!(err.to_string().contains("//span[@title='Hot']"));
    }
}
