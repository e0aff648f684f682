//! Firestore REST wire types
//!
//! Documents carry typed values such as `{"stringValue": "Acme"}`; the
//! externally tagged [`Value`] enum maps that shape directly. Value kinds it
//! does not know decode as [`Value::Unrecognized`] so one odd field never
//! fails a whole query result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Typed Firestore value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    NullValue(()),
    BooleanValue(bool),
    /// int64 travels as a decimal string
    IntegerValue(String),
    /// NaN and the infinities travel as strings
    DoubleValue(#[serde(with = "double")] f64),
    TimestampValue(DateTime<Utc>),
    StringValue(String),
    /// base64
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(LatLng),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
    /// Any other value kind, kept as raw JSON
    #[serde(untagged)]
    Unrecognized(serde_json::Value),
}

mod double {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_infinite() {
            serializer.serialize_str(if *value > 0.0 { "Infinity" } else { "-Infinity" })
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Number(f64),
            Text(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Number(n) => Ok(n),
            Wire::Text(text) => match text.as_str() {
                "NaN" => Ok(f64::NAN),
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                other => other.parse().map_err(D::Error::custom),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: HashMap<String, Value>,
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::StringValue(s.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::StringValue(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::BooleanValue(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::TimestampValue(ts) => Some(*ts),
            _ => None,
        }
    }
}

/// Firestore document resource
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// `projects/{p}/databases/{d}/documents/{collection}/{id}`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
}

impl Document {
    pub fn with_fields(fields: HashMap<String, Value>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    /// Last path segment of the resource name
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or("")
    }

    /// String field; absent or non-string values read as `None`
    pub fn string(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    pub fn boolean(&self, field: &str) -> Option<bool> {
        self.fields.get(field).and_then(Value::as_bool)
    }

    pub fn timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        self.fields.get(field).and_then(Value::as_timestamp)
    }
}

/// One element of a `runQuery` response stream
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryResponse {
    #[serde(default)]
    pub document: Option<Document>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryRequest {
    pub structured_query: StructuredQuery,
}

#[derive(Debug, Clone, Serialize)]
pub struct StructuredQuery {
    pub from: Vec<CollectionSelector>,
    #[serde(rename = "where")]
    pub filter: Filter,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSelector {
    pub collection_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Filter {
    FieldFilter(FieldFilter),
    CompositeFilter(CompositeFilter),
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldFilter {
    pub field: FieldReference,
    pub op: &'static str,
    pub value: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReference {
    pub field_path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompositeFilter {
    pub op: &'static str,
    pub filters: Vec<Filter>,
}

impl Filter {
    /// `field == value`
    pub fn equal(field_path: &str, value: Value) -> Self {
        Filter::FieldFilter(FieldFilter {
            field: FieldReference {
                field_path: field_path.to_string(),
            },
            op: "EQUAL",
            value,
        })
    }

    /// Conjunction of filters
    pub fn and(filters: Vec<Filter>) -> Self {
        Filter::CompositeFilter(CompositeFilter {
            op: "AND",
            filters,
        })
    }
}

impl RunQueryRequest {
    pub fn new(collection: &str, filter: Filter) -> Self {
        Self {
            structured_query: StructuredQuery {
                from: vec![CollectionSelector {
                    collection_id: collection.to_string(),
                }],
                filter,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_decode_typed_values() {
        let doc: Document = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/users/b1",
            "fields": {
                "role": { "stringValue": "Business" },
                "verified": { "booleanValue": true },
                "balance": { "integerValue": "1200" },
                "joined": { "timestampValue": "2024-05-01T12:00:00.123456Z" },
                "avatar": { "nullValue": null },
                "tags": { "arrayValue": { "values": [{ "stringValue": "food" }] } },
                "address": { "mapValue": { "fields": { "city": { "stringValue": "Lagos" } } } },
                "location": { "geoPointValue": { "latitude": 6.5, "longitude": 3.4 } }
            },
            "createTime": "2024-05-01T12:00:00Z",
            "updateTime": "2024-05-01T12:00:00Z"
        }))
        .unwrap();

        assert_eq!(doc.id(), "b1");
        assert_eq!(doc.string("role"), Some("Business"));
        assert_eq!(doc.boolean("verified"), Some(true));
        assert_eq!(doc.fields["balance"], Value::IntegerValue("1200".to_string()));
        assert_eq!(doc.fields["avatar"], Value::NullValue(()));
        assert!(doc.timestamp("joined").is_some());
        assert!(matches!(doc.fields["tags"], Value::ArrayValue(_)));
        assert!(matches!(doc.fields["address"], Value::MapValue(_)));
    }

    #[test]
    fn test_non_string_field_reads_as_absent() {
        let doc: Document = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/users/b1",
            "fields": { "businessName": { "nullValue": null } }
        }))
        .unwrap();

        assert_eq!(doc.string("businessName"), None);
        assert_eq!(doc.string("name"), None);
    }

    #[test]
    fn test_encode_values() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(
            serde_json::to_value(Value::TimestampValue(ts)).unwrap(),
            json!({ "timestampValue": "2024-05-01T12:00:00Z" })
        );
        assert_eq!(
            serde_json::to_value(Value::BooleanValue(true)).unwrap(),
            json!({ "booleanValue": true })
        );
    }

    #[test]
    fn test_composite_query_body() {
        let request = RunQueryRequest::new(
            "ranks",
            Filter::and(vec![
                Filter::equal("businessId", Value::string("b1")),
                Filter::equal("name", Value::string("Referral")),
            ]),
        );

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "structuredQuery": {
                    "from": [{ "collectionId": "ranks" }],
                    "where": {
                        "compositeFilter": {
                            "op": "AND",
                            "filters": [
                                { "fieldFilter": {
                                    "field": { "fieldPath": "businessId" },
                                    "op": "EQUAL",
                                    "value": { "stringValue": "b1" }
                                } },
                                { "fieldFilter": {
                                    "field": { "fieldPath": "name" },
                                    "op": "EQUAL",
                                    "value": { "stringValue": "Referral" }
                                } }
                            ]
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn test_special_doubles() {
        let doc: Document = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/users/b1",
            "fields": {
                "rating": { "doubleValue": "NaN" },
                "ceiling": { "doubleValue": "-Infinity" },
                "score": { "doubleValue": 4.5 }
            }
        }))
        .unwrap();

        assert!(matches!(doc.fields["rating"], Value::DoubleValue(d) if d.is_nan()));
        assert_eq!(doc.fields["ceiling"], Value::DoubleValue(f64::NEG_INFINITY));
        assert_eq!(doc.fields["score"], Value::DoubleValue(4.5));
        assert_eq!(
            serde_json::to_value(Value::DoubleValue(f64::INFINITY)).unwrap(),
            json!({ "doubleValue": "Infinity" })
        );
    }

    #[test]
    fn test_odd_field_does_not_fail_query_result() {
        let rows: Vec<RunQueryResponse> = serde_json::from_value(json!([
            { "document": {
                "name": "projects/p/databases/(default)/documents/users/b1",
                "fields": { "role": { "stringValue": "Business" } }
            } },
            { "document": {
                "name": "projects/p/databases/(default)/documents/users/b2",
                "fields": {
                    "role": { "stringValue": "Business" },
                    "rating": { "doubleValue": "NaN" },
                    "embedding": { "vectorValue": { "values": [0.1, 0.2] } },
                    "tags": { "arrayValue": { "values": [{ "shapeValue": {} }] } }
                }
            } }
        ]))
        .unwrap();

        let docs: Vec<Document> = rows.into_iter().filter_map(|row| row.document).collect();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].id(), "b2");
        assert_eq!(docs[1].string("role"), Some("Business"));
        assert_eq!(
            docs[1].fields["embedding"],
            Value::Unrecognized(json!({ "vectorValue": { "values": [0.1, 0.2] } }))
        );
        assert_eq!(docs[1].string("embedding"), None);
    }

    #[test]
    fn test_empty_query_result_entries() {
        let rows: Vec<RunQueryResponse> =
            serde_json::from_value(json!([{ "readTime": "2024-05-01T12:00:00Z" }])).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].document.is_none());
    }
}
