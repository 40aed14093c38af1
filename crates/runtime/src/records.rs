//! Record creation and deletion helpers over the engine capability.
//!
//! Deletion is a query-then-bulk-delete sequence; zero matching ids is an
//! idempotent no-op. Engine faults always surface.

use lexbdd_core::engine::SfdcEngine;
use lexbdd_core::record::{Record, SaveResult};
use serde_json::Value;
use tracing::debug;

use crate::error::StepError;

/// Inserts one record. `record` must be a JSON object of field/value pairs
/// (hand-built or loaded from a fixture).
pub async fn create_record(
    engine: &dyn SfdcEngine,
    object: &str,
    record: Value,
) -> Result<SaveResult, StepError> {
    if !record.is_object() {
        return Err(StepError::Fixture(format!(
            "record for {object} must be a JSON object, got {record}"
        )));
    }
    engine.insert(record, object).await.map_err(StepError::engine(format!("insert {object}")))
}

/// Deletes every record of `object`. Returns the number of deleted records.
pub async fn delete_all_records(engine: &dyn SfdcEngine, object: &str) -> Result<usize, StepError> {
    let soql = format!("SELECT Id, Name FROM {object}");
    delete_by_query(engine, object, &soql).await
}

/// Deletes the records of `object` matching `criteria`. Returns the number
/// of deleted records; zero matches issues no delete call.
pub async fn delete_records_on_criteria(
    engine: &dyn SfdcEngine,
    object: &str,
    criteria: &str,
) -> Result<usize, StepError> {
    let soql = format!("SELECT Id FROM {object} WHERE {criteria}");
    delete_by_query(engine, object, &soql).await
}

async fn delete_by_query(
    engine: &dyn SfdcEngine,
    object: &str,
    soql: &str,
) -> Result<usize, StepError> {
    let result = engine
        .query(soql)
        .await
        .map_err(StepError::engine(format!("query ids of {object}")))?;
    let ids: Vec<String> =
        result.records.iter().filter_map(Record::id).map(str::to_owned).collect();
    if ids.is_empty() {
        debug!(%object, "no records matched, skipping delete");
        return Ok(0);
    }
    engine
        .delete(&ids, object)
        .await
        .map_err(StepError::engine(format!("delete {} {object} records", ids.len())))?;
    Ok(ids.len())
}

/// Total number of `object` records on the backend.
pub async fn record_count(engine: &dyn SfdcEngine, object: &str) -> Result<usize, StepError> {
    let soql = format!("SELECT Id FROM {object}");
    let result =
        engine.query(&soql).await.map_err(StepError::engine(format!("count {object}")))?;
    Ok(result.total_size)
}

/// Number of `object` records matching `criteria`.
pub async fn record_count_on_criteria(
    engine: &dyn SfdcEngine,
    object: &str,
    criteria: &str,
) -> Result<usize, StepError> {
    let soql = format!("SELECT Id FROM {object} WHERE {criteria}");
    let result = engine
        .query(&soql)
        .await
        .map_err(StepError::engine(format!("count {object} where {criteria}")))?;
    Ok(result.total_size)
}

/// Activates managed test objects through the engine's custom remote
/// endpoint (object names plus a zipped metadata payload).
pub async fn activate_test_objects(
    engine: &dyn SfdcEngine,
    objects: &[String],
    payload: &[u8],
) -> Result<(), StepError> {
    engine
        .activate_test_objects(objects, payload)
        .await
        .map_err(StepError::engine(format!("activate test objects {objects:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexbdd_engine_mock::MockSfdcEngine;
    use serde_json::json;

    #[tokio::test]
    async fn create_record_inserts_the_fixture() {
        let engine = MockSfdcEngine::new();
        let result = create_record(&engine, "Student__c", json!({"Name": "Ada"})).await.unwrap();
        assert!(result.success);
        assert_eq!(engine.inserts(), vec![("Student__c".to_owned(), json!({"Name": "Ada"}))]);
    }

    #[tokio::test]
    async fn create_record_rejects_non_object_fixtures() {
        let engine = MockSfdcEngine::new();
        let err = create_record(&engine, "Student__c", json!(["Name"])).await.unwrap_err();
        assert!(matches!(err, StepError::Fixture(_)));
        assert!(engine.inserts().is_empty());
    }

    #[tokio::test]
    async fn delete_on_criteria_with_no_matches_is_a_no_op() {
        let engine = MockSfdcEngine::new().with_records("FROM Student__c", json!([]));
        let deleted =
            delete_records_on_criteria(&engine, "Student__c", "Name = 'Nobody'").await.unwrap();
        assert_eq!(deleted, 0);
        assert!(engine.deletes().is_empty());
    }

    #[tokio::test]
    async fn delete_on_criteria_bulk_deletes_matched_ids() {
        let engine = MockSfdcEngine::new().with_records(
            "FROM Student__c",
            json!([{"Id": "a01"}, {"Id": "a02"}]),
        );
        let deleted =
            delete_records_on_criteria(&engine, "Student__c", "Grade__c = 'A'").await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(
            engine.deletes(),
            vec![(vec!["a01".to_owned(), "a02".to_owned()], "Student__c".to_owned())]
        );
    }

    #[tokio::test]
    async fn delete_faults_surface_instead_of_being_swallowed() {
        let engine = MockSfdcEngine::new()
            .with_records("FROM Student__c", json!([{"Id": "a01"}]))
            .failing_deletes("row locked");
        let err = delete_all_records(&engine, "Student__c").await.unwrap_err();
        assert!(matches!(err, StepError::Engine { .. }));
    }

    #[tokio::test]
    async fn activation_forwards_names_and_payload() {
        let engine = MockSfdcEngine::new();
        let objects = vec!["Student__c".to_owned(), "Course__c".to_owned()];
        activate_test_objects(&engine, &objects, b"zipped").await.unwrap();
        assert_eq!(engine.activations(), vec![(objects, 6)]);
    }

    #[tokio::test]
    async fn record_count_uses_backend_total_size() {
        let engine = MockSfdcEngine::new()
            .with_records("FROM Account", json!([{"Id": "001"}, {"Id": "002"}]));
        assert_eq!(record_count(&engine, "Account").await.unwrap(), 2);
        assert_eq!(
            record_count_on_criteria(&engine, "Account", "Industry = 'Tech'").await.unwrap(),
            2
        );
    }
}
