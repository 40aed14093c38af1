//! Field-kind model and XPath construction for Lightning record forms.
//!
//! Every selector is anchored on the record-field container
//! `//div[@data-target-selection-name='sfdc:RecordField.{Object.Field}']`;
//! the kind decides which input element inside that container receives the
//! interaction and where the inline help text lives.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

use crate::driver::Locator;

/// Sub-mode of a compound address field: street renders as a textarea, the
/// remaining inputs as plain text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressInput {
    Text,
    TextArea,
}

/// Side of a dueling multi-select picklist. The subfield column names the
/// side values are clicked from; moves always go to the opposite side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PicklistSide {
    Available,
    Chosen,
}

impl PicklistSide {
    pub fn from_subfield(subfield: Option<&str>) -> Self {
        match subfield {
            Some("Available") => Self::Available,
            _ => Self::Chosen,
        }
    }

    /// 1-based index of this side's options list in the dueling-list markup.
    pub fn list_index(self) -> usize {
        match self {
            Self::Available => 1,
            Self::Chosen => 2,
        }
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Available => Self::Chosen,
            Self::Chosen => Self::Available,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Chosen => "Chosen",
        }
    }
}

impl Display for PicklistSide {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tri-state derived from the checkbox value column: `true`, `false`, or
/// anything else (which addresses the indeterminate `[]` qualifier).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckState {
    Check,
    Uncheck,
    Indeterminate,
}

impl CheckState {
    pub fn from_value(value: &str) -> Self {
        match value {
            "true" => Self::Check,
            "false" => Self::Uncheck,
            _ => Self::Indeterminate,
        }
    }

    /// Qualifier on the `lightning-input` host: checking targets the
    /// unchecked element and vice versa.
    fn qualifier(self) -> &'static str {
        match self {
            Self::Check => "",
            Self::Uncheck => "[@Checked]",
            Self::Indeterminate => "[]",
        }
    }
}

/// Raised when a step table names a field type outside the closed set.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown field type '{0}'")]
pub struct UnknownFieldKind(pub String);

/// Closed set of Lightning form field kinds.
///
/// `Text Area` and `Text Area(Long)` are the same control and parse to the
/// same variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Address(AddressInput),
    Picklist,
    Checkbox,
    Lookup,
    MultiSelectPicklist,
    TextArea,
}

impl FromStr for FieldKind {
    type Err = UnknownFieldKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "Text" => Ok(Self::Text),
            "Address.text" => Ok(Self::Address(AddressInput::Text)),
            "Address.textarea" => Ok(Self::Address(AddressInput::TextArea)),
            "Picklist" => Ok(Self::Picklist),
            "Checkbox" => Ok(Self::Checkbox),
            "Lookup" => Ok(Self::Lookup),
            "Picklist(Multi-Select)" => Ok(Self::MultiSelectPicklist),
            "Text Area" | "Text Area(Long)" => Ok(Self::TextArea),
            other => Err(UnknownFieldKind(other.to_owned())),
        }
    }
}

/// Record-field container for `Object.Field`, the anchor of every selector.
fn anchor(object_field: &str) -> String {
    format!("//div[@data-target-selection-name='sfdc:RecordField.{object_field}']")
}

/// Optional disambiguation segment when one container hosts several inputs.
fn data_field_segment(element: &str, subfield: Option<&str>) -> String {
    match subfield {
        Some(name) if !name.is_empty() => format!("//{element}[@data-field='{name}']"),
        _ => String::new(),
    }
}

impl FieldKind {
    /// Locator of the element that receives input for this kind.
    ///
    /// `value` participates for checkboxes only (the tri-state qualifier is
    /// part of the selector, not of the interaction).
    pub fn input_locator(self, object_field: &str, subfield: Option<&str>, value: &str) -> Locator {
        let anchor = anchor(object_field);
        let expr = match self {
            Self::Text => {
                let segment = data_field_segment("lightning-input", subfield);
                format!("{anchor}{segment}//input[@class='slds-input']")
            }
            Self::Address(input) => {
                let element = match input {
                    AddressInput::Text => "input",
                    AddressInput::TextArea => "textarea",
                };
                let name = subfield.unwrap_or_default();
                format!("{anchor}//{element}[@name='{name}']")
            }
            Self::Picklist => {
                let segment = data_field_segment("lightning-picklist", subfield);
                format!("{anchor}{segment}//button[@role='combobox']")
            }
            Self::Checkbox => {
                let qualifier = CheckState::from_value(value).qualifier();
                format!("{anchor}//lightning-input{qualifier}//input[@type='checkbox']")
            }
            Self::Lookup => format!("{anchor}//input[@role='combobox']"),
            Self::MultiSelectPicklist => {
                let side = PicklistSide::from_subfield(subfield);
                return dueling_option(object_field, side, value);
            }
            Self::TextArea => format!("{anchor}//textarea[@class='slds-textarea']"),
        };
        Locator::xpath(expr)
    }

    /// Locator of the inline help element read by validation assertions.
    pub fn help_locator(self, object_field: &str, subfield: Option<&str>) -> Locator {
        let anchor = anchor(object_field);
        let expr = match self {
            Self::Text => {
                let segment = data_field_segment("lightning-input", subfield);
                format!("{anchor}{segment}//div[@class='slds-form-element__help']")
            }
            Self::Address(input) => {
                let element = match input {
                    AddressInput::Text => "lightning-input",
                    AddressInput::TextArea => "lightning-textarea",
                };
                format!("{anchor}//{element}[@class='slds-form-element__help']")
            }
            Self::Picklist => {
                let segment = data_field_segment("lightning-picklist", subfield);
                format!("{anchor}{segment}//div[@class='slds-form-element__help']")
            }
            Self::Checkbox => {
                format!("{anchor}//lightning-input//div[@class='slds-form-element__help']")
            }
            Self::Lookup | Self::MultiSelectPicklist | Self::TextArea => {
                format!("{anchor}//div[@class='slds-form-element__help']")
            }
        };
        Locator::xpath(expr)
    }
}

/// Option entry shown after a picklist combobox has been opened.
pub fn picklist_option(value: &str) -> Locator {
    Locator::xpath(format!("//span[@title='{value}']"))
}

/// Suggestion entry shown while typing into a lookup.
pub fn lookup_suggestion(value: &str) -> Locator {
    Locator::xpath(format!("//lightning-base-combobox-formatted-text[@title='{value}']"))
}

/// One option inside the dueling list on the given side.
pub fn dueling_option(object_field: &str, side: PicklistSide, value: &str) -> Locator {
    let anchor = anchor(object_field);
    Locator::xpath(format!(
        "({anchor}//div[@class='slds-dueling-list__options'])[{index}]//div[@data-value='{value}']",
        index = side.list_index(),
    ))
}

/// The move control shifting the current selection to `target`, scoped to
/// the same record field as the option that was clicked.
pub fn dueling_move_button(object_field: &str, target: PicklistSide) -> Locator {
    let anchor = anchor(object_field);
    Locator::xpath(format!("{anchor}//button[@title='Move selection to {target}']"))
}

/// One row of a field-interaction data table, parsed into the closed model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Qualified field name, e.g. `Account.Name`.
    pub object_field: String,
    pub kind: FieldKind,
    pub subfield: Option<String>,
    /// Value to set, or the expected text for validation assertions.
    pub value: String,
}

impl FieldDescriptor {
    /// Builds a descriptor from raw step-table cells; an empty subfield cell
    /// means no disambiguation.
    pub fn from_step(
        object_field: &str,
        value: &str,
        field_type: &str,
        subfield: &str,
    ) -> Result<Self, UnknownFieldKind> {
        Ok(Self {
            object_field: object_field.to_owned(),
            kind: field_type.parse()?,
            subfield: (!subfield.is_empty()).then(|| subfield.to_owned()),
            value: value.to_owned(),
        })
    }

    pub fn subfield(&self) -> Option<&str> {
        self.subfield.as_deref()
    }
}
