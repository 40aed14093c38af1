//! Navigation and raw-element steps over the driver capability.

use lexbdd_core::driver::{Locator, UiDriver};
use lexbdd_core::record::Connection;
use tracing::debug;

use crate::error::StepError;
use crate::interact::click;

/// Opens the app-launcher URL of the given Lightning app.
pub async fn navigate_to_app(
    driver: &dyn UiDriver,
    connection: &Connection,
    app: &str,
) -> Result<(), StepError> {
    let url = connection.app_url(app);
    debug!(%url, "navigate to app");
    driver.goto(&url).await?;
    Ok(())
}

/// Opens the object's list view with the given filter applied.
pub async fn navigate_to_record_list(
    driver: &dyn UiDriver,
    connection: &Connection,
    object: &str,
    filter: &str,
) -> Result<(), StepError> {
    let url = connection.record_list_url(object, filter);
    debug!(%url, "navigate to record list");
    driver.goto(&url).await?;
    Ok(())
}

/// Resolves the element once; the driver's implicit wait supplies the
/// polling.
pub async fn wait_for_element(driver: &dyn UiDriver, xpath: &str) -> Result<(), StepError> {
    driver.find(&Locator::xpath(xpath)).await?;
    Ok(())
}

/// Spinner handling is a plain element lookup as well; the overlay detaches
/// before the target below it becomes resolvable.
pub async fn wait_for_spinner(driver: &dyn UiDriver, xpath: &str) -> Result<(), StepError> {
    driver.find(&Locator::xpath(xpath)).await?;
    Ok(())
}

/// Clicks the 1-based `index`-th element matching `xpath`.
pub async fn click_element_at_index(
    driver: &dyn UiDriver,
    xpath: &str,
    index: usize,
) -> Result<(), StepError> {
    click(driver, &Locator::xpath(xpath).at_index(index)).await
}
