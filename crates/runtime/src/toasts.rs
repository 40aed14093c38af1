//! Toast and inline-error assertions.
//!
//! Single immediate reads; retry behaviour lives in the driver's implicit
//! wait configuration, not here.

use std::fmt::{Display, Formatter};

use lexbdd_core::driver::{Locator, UiDriver};

use crate::error::StepError;
use crate::interact::{read_class, read_text};

/// Variant of a Lightning toast banner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastStatus {
    Success,
    Error,
    Warning,
}

impl ToastStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Error => "Error",
            Self::Warning => "Warning",
        }
    }
}

impl Display for ToastStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compares the toast body scoped by its status aria-label.
pub async fn assert_toast_message(
    driver: &dyn UiDriver,
    expected: &str,
    status: ToastStatus,
) -> Result<(), StepError> {
    let locator = Locator::xpath(format!(
        "//div[@aria-label='{status}']\
         //span[@class='toastMessage slds-text-heading--small forceActionsText']"
    ));
    let actual = read_text(driver, &locator).await?;
    StepError::check_eq(expected, &actual, format!("{status} toast message"))
}

/// Compares the toast heading text.
pub async fn assert_toast_heading(driver: &dyn UiDriver, expected: &str) -> Result<(), StepError> {
    let locator = Locator::xpath("//div[@class='toastTitle slds-text-heading--small']");
    let actual = read_text(driver, &locator).await?;
    StepError::check_eq(expected, &actual, "toast heading")
}

/// Compares the inline error rendered under an `abx-field` input.
///
/// The original relative walk (label, parent, help element) is flattened
/// into one XPath so the driver contract stays a single lookup.
pub async fn assert_field_error(
    driver: &dyn UiDriver,
    input: &str,
    expected: &str,
) -> Result<(), StepError> {
    let locator = Locator::xpath(format!(
        "//abx-field//*[contains(@class,'slds-form-element') and \
         contains(@class,'slds-has-error')]//label[@for='{input}']/..\
         //*[contains(@class,'slds-form-element__help')]"
    ));
    let actual = read_text(driver, &locator).await?;
    StepError::check_eq(expected, &actual, format!("error under input '{input}'"))
}

/// Asserts the element's class list does not carry `pill-disabled`.
pub async fn assert_element_enabled(
    driver: &dyn UiDriver,
    locator: &Locator,
) -> Result<(), StepError> {
    let class = read_class(driver, locator).await?;
    if class.contains("pill-disabled") {
        return Err(StepError::mismatch("enabled", class, format!("element {locator}")));
    }
    Ok(())
}

/// Asserts the element's class list carries `pill-disabled`.
pub async fn assert_element_disabled(
    driver: &dyn UiDriver,
    locator: &Locator,
) -> Result<(), StepError> {
    let class = read_class(driver, locator).await?;
    if !class.contains("pill-disabled") {
        return Err(StepError::mismatch("disabled", class, format!("element {locator}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexbdd_driver_mock::MockUiDriver;

    const SUCCESS_TOAST: &str = "//div[@aria-label='Success']\
         //span[@class='toastMessage slds-text-heading--small forceActionsText']";

    #[tokio::test]
    async fn toast_message_is_scoped_by_status() {
        let driver = MockUiDriver::new().with_text(SUCCESS_TOAST, "Account \"Acme\" was saved.");
        assert_toast_message(&driver, "Account \"Acme\" was saved.", ToastStatus::Success)
            .await
            .unwrap();

        // Same text under a different status is a different element.
        let err = assert_toast_message(&driver, "Account \"Acme\" was saved.", ToastStatus::Error)
            .await
            .unwrap_err();
        assert!(matches!(err, StepError::Mismatch { .. } | StepError::Driver(_)));
    }

    #[tokio::test]
    async fn toast_heading_compares_exactly() {
        let driver = MockUiDriver::new()
            .with_text("//div[@class='toastTitle slds-text-heading--small']", "Success!");
        assert_toast_heading(&driver, "Success!").await.unwrap();
        assert!(assert_toast_heading(&driver, "success!").await.is_err());
    }

    #[tokio::test]
    async fn pill_disabled_class_drives_enablement_checks() {
        let locator = Locator::xpath("//span[@data-id='pill']");
        let driver = MockUiDriver::new()
            .with_attribute(locator.as_str(), "class", "slds-pill pill-disabled");
        assert_element_disabled(&driver, &locator).await.unwrap();
        assert!(assert_element_enabled(&driver, &locator).await.is_err());

        let driver = MockUiDriver::new().with_attribute(locator.as_str(), "class", "slds-pill");
        assert_element_enabled(&driver, &locator).await.unwrap();
        assert!(assert_element_disabled(&driver, &locator).await.is_err());
    }
}
