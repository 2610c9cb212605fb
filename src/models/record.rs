use std::{fmt, str::FromStr};

use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::FromRow;

use crate::error::{AppError, MISSING_FIELDS};

/// The two record tables exposed under `/api/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Trips,
    Templates,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Trips, Collection::Templates];

    /// Table name. These literals are the only identifiers ever interpolated
    /// into SQL text.
    pub fn table(&self) -> &'static str {
        match self {
            Collection::Trips => "trips",
            Collection::Templates => "templates",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table())
    }
}

impl FromStr for Collection {
    type Err = AppError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "trips" => Ok(Collection::Trips),
            "templates" => Ok(Collection::Templates),
            other => Err(AppError::UnknownCollection(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: i64,
    pub name: String,
    pub data: Value,
    #[serde(rename = "savedAt")]
    pub saved_at: String,
}

#[derive(Debug, FromRow)]
pub struct RecordRow {
    pub id: i64,
    pub name: String,
    pub data: String,
    pub saved_at: String,
}

impl TryFrom<RecordRow> for Record {
    type Error = AppError;

    fn try_from(row: RecordRow) -> Result<Self, Self::Error> {
        let data = serde_json::from_str(&row.data).map_err(AppError::CorruptData)?;
        Ok(Self {
            id: row.id,
            name: row.name,
            data,
            saved_at: row.saved_at,
        })
    }
}

/// A record as submitted by a client, before it has an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub name: String,
    pub data: Value,
    pub saved_at: String,
}

impl NewRecord {
    pub fn new(name: impl Into<String>, data: Value, saved_at: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data,
            saved_at: saved_at.into(),
        }
    }

    /// Parses a POST body. `data` defaults to `{}` when absent; `name` and
    /// `savedAt` only have to be present and truthy.
    pub fn from_json(body: &[u8]) -> Result<Self, AppError> {
        let value: Value = serde_json::from_slice(body).map_err(AppError::InvalidJson)?;
        let Value::Object(mut fields) = value else {
            return Err(AppError::BadRequest(
                "request body must be a JSON object".into(),
            ));
        };

        let name = present_text(fields.remove("name"));
        let saved_at = present_text(fields.remove("savedAt"));
        let data = fields
            .remove("data")
            .unwrap_or_else(|| Value::Object(Map::new()));

        match (name, saved_at) {
            (Some(name), Some(saved_at)) => Ok(Self::new(name, data, saved_at)),
            _ => Err(AppError::BadRequest(MISSING_FIELDS.into())),
        }
    }
}

/// Truthy scalars are kept as text: non-empty strings, non-zero numbers and
/// `true`. `null`, `false`, zero, `""` and containers count as missing.
fn present_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(text) if !text.is_empty() => Some(text),
        Value::Number(number) if number.as_f64() != Some(0.0) => Some(number.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub status: &'static str,
    pub id: i64,
}

impl Created {
    pub fn new(id: i64) -> Self {
        Self {
            status: "success",
            id,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(body: Value) -> Result<NewRecord, AppError> {
        NewRecord::from_json(body.to_string().as_bytes())
    }

    #[test]
    fn collection_names_are_an_allow_list() {
        assert_eq!("trips".parse::<Collection>().unwrap(), Collection::Trips);
        assert_eq!(
            "templates".parse::<Collection>().unwrap(),
            Collection::Templates
        );
        for bad in ["users", "Trips", "", "trips; DROP TABLE trips"] {
            assert!(matches!(
                bad.parse::<Collection>(),
                Err(AppError::UnknownCollection(_))
            ));
        }
    }

    #[test]
    fn full_payload_is_accepted() {
        let record = parse(json!({
            "name": "Paris",
            "data": {"days": 3},
            "savedAt": "2024-05-01T10:00:00Z"
        }))
        .expect("valid payload");
        assert_eq!(
            record,
            NewRecord::new("Paris", json!({"days": 3}), "2024-05-01T10:00:00Z")
        );
    }

    #[test]
    fn missing_data_defaults_to_empty_object() {
        let record = parse(json!({"name": "Golf", "savedAt": "2024-01-01"})).unwrap();
        assert_eq!(record.data, json!({}));
    }

    #[test]
    fn explicit_null_data_is_kept() {
        let record = parse(json!({"name": "Golf", "data": null, "savedAt": "2024-01-01"})).unwrap();
        assert_eq!(record.data, Value::Null);
    }

    #[test]
    fn name_and_saved_at_must_be_present_and_non_empty() {
        let cases = [
            json!({"savedAt": "2024-01-01"}),
            json!({"name": "", "savedAt": "2024-01-01"}),
            json!({"name": 0, "savedAt": "2024-01-01"}),
            json!({"name": 0.0, "savedAt": "2024-01-01"}),
            json!({"name": null, "savedAt": "2024-01-01"}),
            json!({"name": false, "savedAt": "2024-01-01"}),
            json!({"name": [], "savedAt": "2024-01-01"}),
            json!({"name": {}, "savedAt": "2024-01-01"}),
            json!({"name": ["Paris"], "savedAt": "2024-01-01"}),
            json!({"name": "Paris", "savedAt": 0}),
            json!({"name": "Paris"}),
            json!({"name": "Paris", "savedAt": ""}),
        ];
        for case in cases {
            match parse(case.clone()) {
                Err(AppError::BadRequest(msg)) => assert_eq!(msg, MISSING_FIELDS),
                other => panic!("{case} should be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn truthy_scalars_are_stored_as_text() {
        let record = parse(json!({"name": 42, "savedAt": "2024"})).unwrap();
        assert_eq!(record.name, "42");

        let record = parse(json!({"name": "x", "savedAt": 20240101})).unwrap();
        assert_eq!(record.saved_at, "20240101");

        let record = parse(json!({"name": true, "savedAt": -1.5})).unwrap();
        assert_eq!(record.name, "true");
        assert_eq!(record.saved_at, "-1.5");

        let record = parse(json!({"name": " ", "savedAt": "2024"})).unwrap();
        assert_eq!(record.name, " ");
    }

    #[test]
    fn malformed_and_non_object_bodies_are_client_errors() {
        assert!(matches!(
            NewRecord::from_json(b"{\"name\": "),
            Err(AppError::InvalidJson(_))
        ));
        assert!(matches!(
            NewRecord::from_json(b"[1, 2, 3]"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn stored_row_decodes_back_into_json() {
        let row = RecordRow {
            id: 7,
            name: "Seoul".into(),
            data: r#"{"b":1,"a":[true,null]}"#.into(),
            saved_at: "2024-02-01".into(),
        };
        let record = Record::try_from(row).unwrap();
        assert_eq!(record.data, json!({"b": 1, "a": [true, null]}));
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"id":7,"name":"Seoul","data":{"b":1,"a":[true,null]},"savedAt":"2024-02-01"}"#
        );
    }

    #[test]
    fn corrupt_stored_data_is_a_server_error() {
        let row = RecordRow {
            id: 1,
            name: "x".into(),
            data: "not json".into(),
            saved_at: "2024".into(),
        };
        assert!(matches!(
            Record::try_from(row),
            Err(AppError::CorruptData(_))
        ));
    }

    #[test]
    fn created_response_shape() {
        assert_eq!(
            serde_json::to_value(Created::new(1)).unwrap(),
            json!({"status": "success", "id": 1})
        );
    }
}
