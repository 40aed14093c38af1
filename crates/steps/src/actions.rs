//! Action steps: navigation, raw element interaction and record-form input.

use cucumber::gherkin::Step;
use cucumber::{given, when};
use lexbdd_core::driver::Locator;
use lexbdd_core::field::FieldDescriptor;
use lexbdd_runtime::{
    Session, StepError, click_element_at_index, create_record, delete_all_records,
    delete_records_on_criteria, navigate_to_app, navigate_to_record_list, set_field,
    wait_for_element, wait_for_spinner,
};
use serde_json::{Map, Value};

use crate::table;
use crate::world::LexWorld;

/// Opens a browser for the named credential and logs in, or acquires a
/// plain public browser. The URL `/` means "stay on the login landing
/// page"; anything else is resolved and navigated to.
#[when(expr = "{string} Go to {string} as {string} user")]
async fn go_to_as_user(
    world: &mut LexWorld,
    _description: String,
    url: String,
    credential: String,
) -> Result<(), StepError> {
    let session = if credential == "public" {
        Session::public(world.pool()).await?
    } else {
        let credentials = world.credentials_named(&credential)?;
        Session::login(world.pool(), world.engine_arc(), credentials).await?
    };
    let url = world.resolve(&url);
    if url != "/" {
        session.driver().goto(&url).await?;
    }
    world.session = Some(session);
    Ok(())
}

#[when(expr = "{string} Go to sobject {string} page with list filterName {string}")]
async fn go_to_record_list(
    world: &mut LexWorld,
    _description: String,
    object: String,
    filter: String,
) -> Result<(), StepError> {
    let session = world.session()?;
    navigate_to_record_list(session.driver(), session.connection()?, &object, &filter).await
}

#[when(expr = "{string} Go to lightning app {string}")]
async fn go_to_lightning_app(
    world: &mut LexWorld,
    _description: String,
    app: String,
) -> Result<(), StepError> {
    let session = world.session()?;
    navigate_to_app(session.driver(), session.connection()?, &app).await
}

#[when(expr = "{string} Switch to iframe {string} at index {string}")]
async fn switch_to_iframe(
    world: &mut LexWorld,
    _description: String,
    xpath: String,
    index: String,
) -> Result<(), StepError> {
    let session = world.session()?;
    let index = parse_index(&index)?;
    let locator = Locator::xpath(world.resolve(&xpath));
    session.driver().switch_to_frame(&locator, index).await?;
    Ok(())
}

#[when(expr = "{string} Switch iframe to default")]
async fn switch_iframe_to_default(
    world: &mut LexWorld,
    _description: String,
) -> Result<(), StepError> {
    world.session()?.driver().switch_to_default_content().await?;
    Ok(())
}

#[when(expr = "{string} Wait for element {string}")]
async fn wait_for_element_step(
    world: &mut LexWorld,
    _description: String,
    xpath: String,
) -> Result<(), StepError> {
    let xpath = world.resolve(&xpath);
    wait_for_element(world.session()?.driver(), &xpath).await
}

#[when(expr = "{string} Click on element {string} at index {string}")]
async fn click_at_index(
    world: &mut LexWorld,
    _description: String,
    xpath: String,
    index: String,
) -> Result<(), StepError> {
    let index = parse_index(&index)?;
    let xpath = world.resolve(&xpath);
    click_element_at_index(world.session()?.driver(), &xpath, index).await
}

#[when(expr = "{string} Wait for spinner disable {string}")]
async fn wait_for_spinner_step(
    world: &mut LexWorld,
    _description: String,
    xpath: String,
) -> Result<(), StepError> {
    let xpath = world.resolve(&xpath);
    wait_for_spinner(world.session()?.driver(), &xpath).await
}

/// Table columns: `objectField | value | fieldtype | field`.
#[when(expr = "{string} Set value in field")]
async fn set_value_in_field(
    world: &mut LexWorld,
    _description: String,
    step: &Step,
) -> Result<(), StepError> {
    let session = world.session()?;
    for row in table::rows(step) {
        let field = FieldDescriptor::from_step(
            table::cell(&row, "objectField"),
            table::cell(&row, "value"),
            table::cell(&row, "fieldtype"),
            table::cell(&row, "field"),
        )?;
        set_field(session.driver(), &field).await?;
    }
    Ok(())
}

/// Table columns: `field | value`, one created record per step.
#[given(expr = "{string} Create record in {string}")]
#[when(expr = "{string} Create record in {string}")]
async fn create_record_step(
    world: &mut LexWorld,
    _description: String,
    object: String,
    step: &Step,
) -> Result<(), StepError> {
    let session = world.session()?;
    let mut fields = Map::new();
    for row in table::rows(step) {
        fields.insert(
            table::cell(&row, "field").to_owned(),
            Value::String(table::cell(&row, "value").to_owned()),
        );
    }
    create_record(session.engine()?, &object, Value::Object(fields)).await?;
    Ok(())
}

#[given(expr = "{string} Delete all records of {string}")]
#[when(expr = "{string} Delete all records of {string}")]
async fn delete_all_records_step(
    world: &mut LexWorld,
    _description: String,
    object: String,
) -> Result<(), StepError> {
    delete_all_records(world.session()?.engine()?, &object).await?;
    Ok(())
}

#[given(expr = "{string} Delete records of {string} on criteria {string}")]
#[when(expr = "{string} Delete records of {string} on criteria {string}")]
async fn delete_records_on_criteria_step(
    world: &mut LexWorld,
    _description: String,
    object: String,
    criteria: String,
) -> Result<(), StepError> {
    delete_records_on_criteria(world.session()?.engine()?, &object, &criteria).await?;
    Ok(())
}

fn parse_index(raw: &str) -> Result<usize, StepError> {
    raw.parse().map_err(|_| StepError::Fixture(format!("index '{raw}' is not a number")))
}
