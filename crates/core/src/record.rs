use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Credentials for one test user, usually loaded from a fixture file.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    /// Login endpoint, e.g. `https://test.salesforce.com`.
    pub environment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_token: Option<String>,
}

/// Authenticated Salesforce session returned by the engine's login.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub instance_url: String,
    pub access_token: String,
}

impl Connection {
    /// `…/lightning/app/{app}` for app-launcher navigation.
    pub fn app_url(&self, app: &str) -> String {
        format!("{}/lightning/app/{app}", self.instance_url)
    }

    /// `…/lightning/o/{object}/list?filterName={filter}` for list views.
    pub fn record_list_url(&self, object: &str, filter: &str) -> String {
        format!("{}/lightning/o/{object}/list?filterName={filter}", self.instance_url)
    }
}

/// Outcome of an insert call.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct SaveResult {
    pub id: String,
    pub success: bool,
}

/// One record out of a query result; fields keep their JSON shape so nested
/// relationship projections (`Parent__r.Name`) stay addressable.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Record(Value);

impl Record {
    pub fn new(fields: Value) -> Self {
        Self(fields)
    }

    /// Resolves a dotted field path (`Account.Owner.Name`) against the
    /// record. `None` when any segment is missing.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.0;
        for segment in path.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// The `Id` field, present on every queried record.
    pub fn id(&self) -> Option<&str> {
        self.get("Id").and_then(Value::as_str)
    }
}

impl From<Value> for Record {
    fn from(fields: Value) -> Self {
        Self::new(fields)
    }
}

/// Deserialized query response: all matching records plus the backend's
/// total count.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct QueryResult {
    #[serde(rename = "totalSize")]
    pub total_size: usize,
    pub records: Vec<Record>,
}

impl QueryResult {
    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }
}

/// Schema description of one field, as reported by a describe call.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct FieldDescribe {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

impl FieldDescribe {
    /// Numeric schema types compare as strings after coercion (spec'd by the
    /// backend as `integer` and `double`).
    pub fn is_numeric(&self) -> bool {
        matches!(self.field_type.as_str(), "integer" | "double")
    }
}

/// Schema description of one object.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ObjectDescribe {
    pub name: String,
    pub fields: Vec<FieldDescribe>,
}

impl ObjectDescribe {
    /// Field names in describe order, the projection used for
    /// select-all-fields queries.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn sample_record() -> Record {
        Record::new(json!({
            "Id": "a015g00000XyZzAAA",
            "Name": "Acme",
            "NumberOfEmployees": 42,
            "Owner": { "Name": "Jane Moss" },
            "Description": null,
        }))
    }

    #[rstest]
    #[case("Name", json!("Acme"))]
    #[case("Owner.Name", json!("Jane Moss"))]
    #[case("NumberOfEmployees", json!(42))]
    fn dotted_path_resolves(#[case] path: &str, #[case] expected: Value) {
        assert_eq!(sample_record().get(path), Some(&expected));
    }

    #[rstest]
    #[case("Owner.Alias")]
    #[case("Missing__c")]
    #[case("Name.Nested")]
    fn dotted_path_misses_yield_none(#[case] path: &str) {
        assert_eq!(sample_record().get(path), None);
    }

    #[test]
    fn record_id_is_exposed() {
        assert_eq!(sample_record().id(), Some("a015g00000XyZzAAA"));
    }

    #[test]
    fn connection_builds_lightning_urls() {
        let conn = Connection {
            instance_url: "https://org.my.salesforce.com".into(),
            access_token: "token".into(),
        };
        assert_eq!(conn.app_url("Sales"), "https://org.my.salesforce.com/lightning/app/Sales");
        assert_eq!(
            conn.record_list_url("Account", "Recent"),
            "https://org.my.salesforce.com/lightning/o/Account/list?filterName=Recent"
        );
    }

    #[rstest]
    #[case("integer", true)]
    #[case("double", true)]
    #[case("string", false)]
    #[case("boolean", false)]
    fn numeric_schema_types(#[case] field_type: &str, #[case] numeric: bool) {
        let field = FieldDescribe { name: "X".into(), field_type: field_type.into() };
        assert_eq!(field.is_numeric(), numeric);
    }

    #[test]
    fn query_result_deserializes_backend_shape() {
        let result: QueryResult = serde_json::from_value(json!({
            "totalSize": 1,
            "records": [{ "Id": "001", "Name": "Acme" }],
        }))
        .unwrap();
        assert_eq!(result.total_size, 1);
        assert_eq!(result.first().and_then(Record::id), Some("001"));
    }
}
