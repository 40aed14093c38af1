//! Deterministic mock browser driver for testing the step implementations.
//!
//! Elements resolve successfully unless a locator is marked missing; every
//! interaction is recorded so tests can assert on the exact click/type
//! sequence a step produced.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use lexbdd_core::driver::{DriverError, DriverPool, Locator, UiDriver, UiElement};
use parking_lot::Mutex;

/// One recorded driver interaction, in call order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Interaction {
    Clicked(String),
    Typed { locator: String, text: String },
    Visited(String),
    SwitchedToFrame { locator: String, index: usize },
    SwitchedToDefault,
}

#[derive(Debug, Default)]
struct State {
    texts: HashMap<String, String>,
    attributes: HashMap<(String, String), String>,
    typed: HashMap<String, String>,
    missing: HashSet<String>,
    interactions: Vec<Interaction>,
}

/// Scripted [`UiDriver`]: canned element text/attributes keyed by the
/// locator expression, plus a full interaction log.
#[derive(Clone, Debug, Default)]
pub struct MockUiDriver {
    state: Arc<Mutex<State>>,
}

impl MockUiDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cans the text returned by `text()` for the given locator expression.
    #[must_use]
    pub fn with_text(self, locator: &str, text: &str) -> Self {
        self.state.lock().texts.insert(locator.to_owned(), text.to_owned());
        self
    }

    /// Cans an attribute value for the given locator expression.
    #[must_use]
    pub fn with_attribute(self, locator: &str, name: &str, value: &str) -> Self {
        self.state
            .lock()
            .attributes
            .insert((locator.to_owned(), name.to_owned()), value.to_owned());
        self
    }

    /// Makes `find` fail with element-not-found for the given locator.
    #[must_use]
    pub fn with_missing(self, locator: &str) -> Self {
        self.state.lock().missing.insert(locator.to_owned());
        self
    }

    pub fn interactions(&self) -> Vec<Interaction> {
        self.state.lock().interactions.clone()
    }

    /// Locator expressions of every click, in order.
    pub fn clicked_locators(&self) -> Vec<String> {
        self.interactions()
            .into_iter()
            .filter_map(|interaction| match interaction {
                Interaction::Clicked(locator) => Some(locator),
                _ => None,
            })
            .collect()
    }

    /// Last value typed into the given locator, if any.
    pub fn typed_value(&self, locator: &str) -> Option<String> {
        self.state.lock().typed.get(locator).cloned()
    }

    pub fn visited_urls(&self) -> Vec<String> {
        self.interactions()
            .into_iter()
            .filter_map(|interaction| match interaction {
                Interaction::Visited(url) => Some(url),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug)]
struct MockElement {
    locator: String,
    state: Arc<Mutex<State>>,
}

#[async_trait]
impl UiElement for MockElement {
    async fn click(&self) -> Result<(), DriverError> {
        self.state.lock().interactions.push(Interaction::Clicked(self.locator.clone()));
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        state
            .interactions
            .push(Interaction::Typed { locator: self.locator.clone(), text: text.to_owned() });
        state.typed.insert(self.locator.clone(), text.to_owned());
        Ok(())
    }

    async fn text(&self) -> Result<String, DriverError> {
        Ok(self.state.lock().texts.get(&self.locator).cloned().unwrap_or_default())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, DriverError> {
        let state = self.state.lock();
        if let Some(value) = state.attributes.get(&(self.locator.clone(), name.to_owned())) {
            return Ok(Some(value.clone()));
        }
        // Typed input is readable back through the value attribute, like a
        // real form control.
        if name == "value" {
            return Ok(state.typed.get(&self.locator).cloned());
        }
        Ok(None)
    }
}

#[async_trait]
impl UiDriver for MockUiDriver {
    async fn find(&self, locator: &Locator) -> Result<Arc<dyn UiElement>, DriverError> {
        if self.state.lock().missing.contains(locator.as_str()) {
            return Err(DriverError::element_not_found(locator));
        }
        Ok(Arc::new(MockElement {
            locator: locator.as_str().to_owned(),
            state: Arc::clone(&self.state),
        }))
    }

    async fn goto(&self, url: &str) -> Result<(), DriverError> {
        self.state.lock().interactions.push(Interaction::Visited(url.to_owned()));
        Ok(())
    }

    async fn switch_to_frame(&self, locator: &Locator, index: usize) -> Result<(), DriverError> {
        self.state.lock().interactions.push(Interaction::SwitchedToFrame {
            locator: locator.as_str().to_owned(),
            index,
        });
        Ok(())
    }

    async fn switch_to_default_content(&self) -> Result<(), DriverError> {
        self.state.lock().interactions.push(Interaction::SwitchedToDefault);
        Ok(())
    }
}

/// Pool handing out one [`MockUiDriver`] per user identity; tests can seed a
/// scripted driver up front and inspect it afterwards.
#[derive(Debug, Default)]
pub struct MockDriverPool {
    drivers: Mutex<HashMap<String, Arc<MockUiDriver>>>,
    acquisitions: Mutex<Vec<String>>,
}

impl MockDriverPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeds the driver the pool will hand to `user`.
    pub fn seed(&self, user: &str, driver: MockUiDriver) {
        self.drivers.lock().insert(user.to_owned(), Arc::new(driver));
    }

    /// The driver previously handed out (or seeded) for `user`.
    pub fn driver_for(&self, user: &str) -> Option<Arc<MockUiDriver>> {
        self.drivers.lock().get(user).cloned()
    }

    pub fn acquisitions(&self) -> Vec<String> {
        self.acquisitions.lock().clone()
    }
}

#[async_trait]
impl DriverPool for MockDriverPool {
    async fn acquire(&self, user_key: &str) -> Result<Arc<dyn UiDriver>, DriverError> {
        self.acquisitions.lock().push(user_key.to_owned());
        let driver = Arc::clone(
            self.drivers
                .lock()
                .entry(user_key.to_owned())
                .or_insert_with(|| Arc::new(MockUiDriver::new())),
        );
        Ok(driver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn interactions_are_recorded_in_order() {
        let driver = MockUiDriver::new();
        let locator = Locator::xpath("//input[@class='slds-input']");
        driver.find(&locator).await.unwrap().send_keys("Acme").await.unwrap();
        driver.find(&locator).await.unwrap().click().await.unwrap();

        assert_eq!(
            driver.interactions(),
            vec![
                Interaction::Typed { locator: locator.as_str().to_owned(), text: "Acme".into() },
                Interaction::Clicked(locator.as_str().to_owned()),
            ]
        );
        assert_eq!(driver.typed_value(locator.as_str()), Some("Acme".into()));
    }

    #[tokio::test]
    async fn typed_text_reads_back_as_value_attribute() {
        let driver = MockUiDriver::new();
        let locator = Locator::xpath("//textarea[@class='slds-textarea']");
        driver.find(&locator).await.unwrap().send_keys("notes").await.unwrap();
        let element = driver.find(&locator).await.unwrap();
        assert_eq!(element.attribute("value").await.unwrap(), Some("notes".into()));
        assert_eq!(element.attribute("class").await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_locators_fail_to_resolve() {
        let driver = MockUiDriver::new().with_missing("//span[@title='Gone']");
        let err = driver.find(&Locator::xpath("//span[@title='Gone']")).await.err().unwrap();
        assert_eq!(err.kind, lexbdd_core::driver::DriverErrorKind::ElementNotFound);
    }

    #[tokio::test]
    async fn pool_hands_out_one_driver_per_user() {
        let pool = MockDriverPool::new();
        let first = pool.acquire("alice").await.unwrap();
        let again = pool.acquire("alice").await.unwrap();
        let other = pool.acquire("bob").await.unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(pool.acquisitions(), vec!["alice", "alice", "bob"]);
    }
}
