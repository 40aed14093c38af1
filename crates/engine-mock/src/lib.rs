//! Scripted mock Salesforce engine: canned describes and query results plus
//! call recording, so tests can assert how often and with what the backend
//! was hit.

use async_trait::async_trait;
use lexbdd_core::engine::{EngineError, EngineErrorKind, SfdcEngine};
use lexbdd_core::record::{
    Connection, Credentials, FieldDescribe, ObjectDescribe, QueryResult, Record, SaveResult,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;

const INSTANCE_URL: &str = "https://mock.my.salesforce.com";
const ACCESS_TOKEN: &str = "00Dmock-access-token";

#[derive(Debug, Default)]
struct State {
    describes: HashMap<String, ObjectDescribe>,
    canned_queries: Vec<(String, Vec<Record>)>,
    queries: Vec<String>,
    describe_calls: usize,
    logins: Vec<String>,
    inserts: Vec<(String, Value)>,
    deletes: Vec<(Vec<String>, String)>,
    activations: Vec<(Vec<String>, usize)>,
    cleanups: Vec<String>,
    delete_failure: Option<String>,
}

/// Scripted [`SfdcEngine`].
///
/// Queries are matched by substring needle (first canned entry whose needle
/// occurs in the SOQL wins); unmatched queries return an empty result.
#[derive(Debug, Default)]
pub struct MockSfdcEngine {
    state: Mutex<State>,
}

impl MockSfdcEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cans the describe result for `object` from `(name, type)` pairs.
    #[must_use]
    pub fn with_describe(self, object: &str, fields: &[(&str, &str)]) -> Self {
        let describe = ObjectDescribe {
            name: object.to_owned(),
            fields: fields
                .iter()
                .map(|(name, field_type)| FieldDescribe {
                    name: (*name).to_owned(),
                    field_type: (*field_type).to_owned(),
                })
                .collect(),
        };
        self.state.lock().describes.insert(object.to_owned(), describe);
        self
    }

    /// Cans records (a JSON array) for every SOQL containing `needle`.
    #[must_use]
    pub fn with_records(self, needle: &str, records: Value) -> Self {
        let records = records
            .as_array()
            .expect("canned records must be a JSON array")
            .iter()
            .cloned()
            .map(Record::new)
            .collect();
        self.state.lock().canned_queries.push((needle.to_owned(), records));
        self
    }

    /// Makes every delete call fail with the given message.
    #[must_use]
    pub fn failing_deletes(self, message: &str) -> Self {
        self.state.lock().delete_failure = Some(message.to_owned());
        self
    }

    pub fn query_count(&self) -> usize {
        self.state.lock().queries.len()
    }

    pub fn queries(&self) -> Vec<String> {
        self.state.lock().queries.clone()
    }

    pub fn describe_count(&self) -> usize {
        self.state.lock().describe_calls
    }

    pub fn logins(&self) -> Vec<String> {
        self.state.lock().logins.clone()
    }

    pub fn inserts(&self) -> Vec<(String, Value)> {
        self.state.lock().inserts.clone()
    }

    pub fn deletes(&self) -> Vec<(Vec<String>, String)> {
        self.state.lock().deletes.clone()
    }

    /// Activation calls as `(object names, payload length)` pairs.
    pub fn activations(&self) -> Vec<(Vec<String>, usize)> {
        self.state.lock().activations.clone()
    }

    pub fn cleanups(&self) -> Vec<String> {
        self.state.lock().cleanups.clone()
    }
}

#[async_trait]
impl SfdcEngine for MockSfdcEngine {
    async fn login(&self, credentials: &Credentials) -> Result<Connection, EngineError> {
        self.state.lock().logins.push(credentials.username.clone());
        Ok(Connection { instance_url: INSTANCE_URL.to_owned(), access_token: ACCESS_TOKEN.to_owned() })
    }

    async fn login_url(&self) -> Result<String, EngineError> {
        Ok(format!("{INSTANCE_URL}/secur/frontdoor.jsp?sid={ACCESS_TOKEN}"))
    }

    async fn query(&self, soql: &str) -> Result<QueryResult, EngineError> {
        let mut state = self.state.lock();
        state.queries.push(soql.to_owned());
        let records = state
            .canned_queries
            .iter()
            .find(|(needle, _)| soql.contains(needle))
            .map(|(_, records)| records.clone())
            .unwrap_or_default();
        Ok(QueryResult { total_size: records.len(), records })
    }

    async fn insert(&self, record: Value, object: &str) -> Result<SaveResult, EngineError> {
        let mut state = self.state.lock();
        state.inserts.push((object.to_owned(), record));
        let id = format!("a00mock{:07}", state.inserts.len());
        Ok(SaveResult { id, success: true })
    }

    async fn delete(&self, ids: &[String], object: &str) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        if let Some(message) = &state.delete_failure {
            return Err(EngineError::new(EngineErrorKind::DeleteFailed, message.clone()));
        }
        state.deletes.push((ids.to_vec(), object.to_owned()));
        Ok(())
    }

    async fn describe_object(&self, object: &str) -> Result<ObjectDescribe, EngineError> {
        let mut state = self.state.lock();
        state.describe_calls += 1;
        state.describes.get(object).cloned().ok_or_else(|| {
            EngineError::new(
                EngineErrorKind::DescribeFailed,
                format!("no describe canned for {object}"),
            )
        })
    }

    async fn activate_test_objects(
        &self,
        objects: &[String],
        payload: &[u8],
    ) -> Result<(), EngineError> {
        self.state.lock().activations.push((objects.to_vec(), payload.len()));
        Ok(())
    }

    async fn cleanup_test_data(&self, run_id: &str) -> Result<(), EngineError> {
        self.state.lock().cleanups.push(run_id.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn canned_queries_match_by_needle() {
        let engine = MockSfdcEngine::new()
            .with_records("FROM Account", json!([{"Id": "001", "Name": "Acme"}]));

        let hit = engine.query("SELECT Id, Name FROM Account WHERE Name = 'Acme'").await.unwrap();
        assert_eq!(hit.total_size, 1);
        assert_eq!(hit.first().and_then(Record::id), Some("001"));

        let miss = engine.query("SELECT Id FROM Contact").await.unwrap();
        assert_eq!(miss.total_size, 0);
        assert_eq!(engine.query_count(), 2);
    }

    #[tokio::test]
    async fn describe_misses_report_a_describe_fault() {
        let engine = MockSfdcEngine::new();
        let err = engine.describe_object("Account").await.unwrap_err();
        assert_eq!(err.kind, EngineErrorKind::DescribeFailed);
    }

    #[tokio::test]
    async fn login_returns_a_mock_connection() {
        let engine = MockSfdcEngine::new();
        let credentials = Credentials {
            username: "qa@example.org".into(),
            password: "pw".into(),
            environment: "https://test.salesforce.com".into(),
            security_token: None,
        };
        let connection = engine.login(&credentials).await.unwrap();
        assert_eq!(connection.instance_url, INSTANCE_URL);
        assert!(engine.login_url().await.unwrap().starts_with(INSTANCE_URL));
        assert_eq!(engine.logins(), vec!["qa@example.org"]);
    }
}
