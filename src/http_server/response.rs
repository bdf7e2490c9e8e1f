//! # Response Formatting
//!
//! Response shapes shared by the catalog endpoints.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::executor::{PageResult, Record};

/// Single record response: `{"status": 0, "data": ...}`
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: u8,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self { status: 0, data }
    }
}

/// Entity list response: `{"<plural>": [...], "total": n}`
pub fn list_body(plural: &str, result: PageResult) -> Value {
    let mut body = Map::new();
    body.insert(plural.to_string(), records_value(result.records));
    body.insert("total".to_string(), Value::from(result.total));
    Value::Object(body)
}

/// Molecules of one entity: `{"data": [...], "total": n, "page": p}`
#[derive(Debug, Clone, Serialize)]
pub struct LinkedMolecules {
    pub data: Vec<Record>,
    pub total: u64,
    pub page: u64,
}

/// Molecule search response
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub molecules: Vec<Record>,
    pub total: u64,
}

fn records_value(records: Vec<Record>) -> Value {
    Value::Array(records.into_iter().map(Value::Object).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope() {
        let body = serde_json::to_value(Envelope::ok(json!({"id": 1}))).unwrap();
        assert_eq!(body, json!({"status": 0, "data": {"id": 1}}));
    }

    #[test]
    fn test_list_body_uses_plural_key() {
        let mut record = Record::new();
        record.insert("id".into(), json!(3));
        let body = list_body(
            "collections",
            PageResult {
                records: vec![record],
                total: 7,
            },
        );
        assert_eq!(body, json!({"collections": [{"id": 3}], "total": 7}));
    }
}
