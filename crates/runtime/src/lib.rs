//! Glue between the injected browser/engine capabilities and the Cucumber
//! step definitions in `lexbdd-steps`.
//!
//! Everything here is a short asynchronous sequence over the traits defined
//! in `lexbdd-core`; the only held state is the per-batch [`QueryCache`] and
//! the per-scenario [`Session`].

mod cache;
mod error;
mod fields;
mod interact;
mod nav;
mod records;
mod session;
mod toasts;

pub use cache::{CacheKey, CachedQuery, QueryCache};
pub use error::StepError;
pub use fields::{assert_field_validation, set_field};
pub use nav::{
    click_element_at_index, navigate_to_app, navigate_to_record_list, wait_for_element,
    wait_for_spinner,
};
pub use records::{
    activate_test_objects, create_record, delete_all_records, delete_records_on_criteria,
    record_count, record_count_on_criteria,
};
pub use session::Session;
pub use toasts::{
    ToastStatus, assert_element_disabled, assert_element_enabled, assert_field_error,
    assert_toast_heading, assert_toast_message,
};
