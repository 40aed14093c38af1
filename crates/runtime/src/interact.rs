//! Small element-interaction helpers shared by the step implementations.

use lexbdd_core::driver::{Locator, UiDriver};

use crate::error::StepError;

pub(crate) async fn click(driver: &dyn UiDriver, locator: &Locator) -> Result<(), StepError> {
    driver.find(locator).await?.click().await?;
    Ok(())
}

pub(crate) async fn type_into(
    driver: &dyn UiDriver,
    locator: &Locator,
    text: &str,
) -> Result<(), StepError> {
    driver.find(locator).await?.send_keys(text).await?;
    Ok(())
}

pub(crate) async fn read_text(
    driver: &dyn UiDriver,
    locator: &Locator,
) -> Result<String, StepError> {
    Ok(driver.find(locator).await?.text().await?)
}

pub(crate) async fn read_class(
    driver: &dyn UiDriver,
    locator: &Locator,
) -> Result<String, StepError> {
    Ok(driver.find(locator).await?.attribute("class").await?.unwrap_or_default())
}
