//! Capability traits and shared types for browser-driven Salesforce Lightning
//! acceptance testing.
//!
//! The browser automation backend and the Salesforce API client are injected
//! collaborators; this crate only defines the seams ([`driver::UiDriver`],
//! [`engine::SfdcEngine`]) plus the field/selector model shared by the step
//! implementations in `lexbdd-runtime`.

pub mod driver;
pub mod engine;
pub mod field;
pub mod record;

pub use driver::{DriverError, DriverErrorKind, DriverPool, Locator, UiDriver, UiElement};
pub use engine::{EngineError, EngineErrorKind, SfdcEngine};
pub use field::{
    AddressInput, CheckState, FieldDescriptor, FieldKind, PicklistSide, UnknownFieldKind,
};
pub use record::{
    Connection, Credentials, FieldDescribe, ObjectDescribe, QueryResult, Record, SaveResult,
};
