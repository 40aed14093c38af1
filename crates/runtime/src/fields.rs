//! Set/assert operations against Lightning record-form fields.

use lexbdd_core::driver::UiDriver;
use lexbdd_core::field::{
    FieldDescriptor, FieldKind, PicklistSide, dueling_move_button, dueling_option,
    lookup_suggestion, picklist_option,
};
use tracing::debug;

use crate::error::StepError;
use crate::interact::{click, read_text, type_into};

/// Writes `field.value` into the form control described by `field`.
///
/// Driver faults (element not found, timeout) propagate untouched and fail
/// the scenario.
pub async fn set_field(driver: &dyn UiDriver, field: &FieldDescriptor) -> Result<(), StepError> {
    debug!(object_field = %field.object_field, kind = ?field.kind, "set field");
    let locator = field.kind.input_locator(&field.object_field, field.subfield(), &field.value);
    match field.kind {
        FieldKind::Text | FieldKind::Address(_) | FieldKind::TextArea => {
            type_into(driver, &locator, &field.value).await
        }
        FieldKind::Picklist => {
            click(driver, &locator).await?;
            click(driver, &picklist_option(&field.value)).await
        }
        FieldKind::Checkbox => click(driver, &locator).await,
        FieldKind::Lookup => {
            type_into(driver, &locator, &field.value).await?;
            click(driver, &lookup_suggestion(&field.value)).await
        }
        FieldKind::MultiSelectPicklist => {
            let side = PicklistSide::from_subfield(field.subfield());
            for value in field.value.split(',') {
                click(driver, &dueling_option(&field.object_field, side, value)).await?;
                click(driver, &dueling_move_button(&field.object_field, side.opposite())).await?;
            }
            Ok(())
        }
    }
}

/// Reads the inline help element of the field and compares its text against
/// `field.value` exactly (case and whitespace significant).
pub async fn assert_field_validation(
    driver: &dyn UiDriver,
    field: &FieldDescriptor,
) -> Result<(), StepError> {
    let locator = field.kind.help_locator(&field.object_field, field.subfield());
    let actual = read_text(driver, &locator).await?;
    StepError::check_eq(
        &field.value,
        &actual,
        format!("validation text for {}", field.object_field),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexbdd_core::field::{AddressInput, FieldDescriptor};
    use lexbdd_driver_mock::MockUiDriver;

    fn descriptor(object_field: &str, value: &str, kind: &str, subfield: &str) -> FieldDescriptor {
        FieldDescriptor::from_step(object_field, value, kind, subfield).unwrap()
    }

    #[tokio::test]
    async fn text_field_round_trips_through_the_driver() {
        let driver = MockUiDriver::new();
        let field = descriptor("Account.Name", "Acme", "Text", "");
        set_field(&driver, &field).await.unwrap();

        let locator = FieldKind::Text.input_locator("Account.Name", None, "");
        assert_eq!(driver.typed_value(locator.as_str()), Some("Acme".into()));
    }

    #[tokio::test]
    async fn address_street_round_trips_through_the_driver() {
        let driver = MockUiDriver::new();
        let field =
            descriptor("Account.BillingAddress", "221B Baker St", "Address.textarea", "street");
        set_field(&driver, &field).await.unwrap();

        let locator = FieldKind::Address(AddressInput::TextArea).input_locator(
            "Account.BillingAddress",
            Some("street"),
            "",
        );
        assert_eq!(driver.typed_value(locator.as_str()), Some("221B Baker St".into()));
    }

    #[tokio::test]
    async fn textarea_round_trips_through_the_driver() {
        let driver = MockUiDriver::new();
        let field = descriptor("Account.Description", "long form notes", "Text Area(Long)", "");
        set_field(&driver, &field).await.unwrap();

        let locator = FieldKind::TextArea.input_locator("Account.Description", None, "");
        assert_eq!(driver.typed_value(locator.as_str()), Some("long form notes".into()));
    }

    #[tokio::test]
    async fn picklist_opens_combobox_then_selects_option() {
        let driver = MockUiDriver::new();
        let field = descriptor("Account.Rating", "Hot", "Picklist", "");
        set_field(&driver, &field).await.unwrap();

        let clicks = driver.clicked_locators();
        assert_eq!(clicks.len(), 2);
        assert!(clicks[0].contains("button[@role='combobox']"));
        assert_eq!(clicks[1], "//span[@title='Hot']");
    }

    #[tokio::test]
    async fn lookup_types_then_clicks_suggestion() {
        let driver = MockUiDriver::new();
        let field = descriptor("Case.AccountId", "Acme", "Lookup", "");
        set_field(&driver, &field).await.unwrap();

        assert_eq!(
            driver.clicked_locators(),
            vec!["//lightning-base-combobox-formatted-text[@title='Acme']".to_owned()]
        );
        let input = FieldKind::Lookup.input_locator("Case.AccountId", None, "");
        assert_eq!(driver.typed_value(input.as_str()), Some("Acme".into()));
    }

    #[tokio::test]
    async fn multi_select_moves_each_value_to_the_opposite_side() {
        let driver = MockUiDriver::new();
        let field = descriptor("Account.Books__c", "A,B", "Picklist(Multi-Select)", "Available");
        set_field(&driver, &field).await.unwrap();

        let clicks = driver.clicked_locators();
        assert_eq!(clicks.len(), 4);
        assert!(clicks[0].contains("[1]//div[@data-value='A']"));
        assert!(clicks[1].contains("Move selection to Chosen"));
        assert!(clicks[2].contains("[1]//div[@data-value='B']"));
        assert!(clicks[3].contains("Move selection to Chosen"));
        let moves =
            clicks.iter().filter(|expr| expr.contains("Move selection to Chosen")).count();
        assert_eq!(moves, 2);
    }

    #[tokio::test]
    async fn validation_text_must_match_exactly() {
        let field = descriptor("Account.Name", "Complete this field.", "Text", "");
        let help = FieldKind::Text.help_locator("Account.Name", None);

        let driver =
            MockUiDriver::new().with_text(help.as_str(), "Complete this field.");
        assert_field_validation(&driver, &field).await.unwrap();

        let driver = MockUiDriver::new().with_text(help.as_str(), "complete this field.");
        let err = assert_field_validation(&driver, &field).await.unwrap_err();
        assert!(matches!(err, StepError::Mismatch { .. }));
    }

    #[tokio::test]
    async fn missing_element_propagates_driver_fault() {
        let field = descriptor("Account.Name", "Acme", "Text", "");
        let input = FieldKind::Text.input_locator("Account.Name", None, "");
        let driver = MockUiDriver::new().with_missing(input.as_str());

        let err = set_field(&driver, &field).await.unwrap_err();
        assert!(matches!(err, StepError::Driver(_)));
    }
}
