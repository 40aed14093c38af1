use std::error::Error;
use std::fmt::{Display, Formatter};

use async_trait::async_trait;
use serde_json::Value;

use crate::record::{Connection, Credentials, ObjectDescribe, QueryResult, SaveResult};

/// General error reported by the Salesforce engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    pub kind: EngineErrorKind,
    pub message: Option<String>,
}

impl EngineError {
    pub fn new(kind: EngineErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: Some(message.into()) }
    }

    pub fn simple(kind: EngineErrorKind) -> Self {
        Self { kind, message: None }
    }
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{msg}"),
            None => write!(f, "{:#?}", self.kind),
        }
    }
}

impl Error for EngineError {}

/// Categorises Salesforce engine failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineErrorKind {
    AuthenticationFailed,
    QueryFailed,
    InsertFailed,
    DeleteFailed,
    DescribeFailed,
    RemoteCallFailed,
}

/// Salesforce API client capability used for record CRUD, schema description
/// and session bootstrap.
///
/// SOQL strings are passed through verbatim; this crate never interprets
/// them.
#[async_trait]
pub trait SfdcEngine: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<Connection, EngineError>;

    /// Frontdoor URL that logs the browser into the same session the engine
    /// authenticated against.
    async fn login_url(&self) -> Result<String, EngineError>;

    async fn query(&self, soql: &str) -> Result<QueryResult, EngineError>;

    /// Inserts one record (a JSON object of field/value pairs) into `object`.
    async fn insert(&self, record: Value, object: &str) -> Result<SaveResult, EngineError>;

    /// Bulk-deletes the given record ids from `object`.
    async fn delete(&self, ids: &[String], object: &str) -> Result<(), EngineError>;

    async fn describe_object(&self, object: &str) -> Result<ObjectDescribe, EngineError>;

    /// Custom remote endpoint that activates managed test objects: a POST
    /// with the object names and a zipped metadata payload.
    async fn activate_test_objects(
        &self,
        objects: &[String],
        payload: &[u8],
    ) -> Result<(), EngineError>;

    /// Removes backend data created under the given test-run identifier.
    async fn cleanup_test_data(&self, run_id: &str) -> Result<(), EngineError>;
}
