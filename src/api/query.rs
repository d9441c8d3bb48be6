//! Ad hoc SQL query endpoint
//!
//! Accepts any SQL text the store can execute and returns the result set as a
//! JSON array of objects, one per row, keyed by the statement's result column
//! names. Nothing here knows the schema: column names come from the result set
//! and every cell is decoded by its runtime SQLite type. That last part
//! matters because a single column can yield different types across rows
//! (SQLite stores per-value, not per-column), so decoding must not assume a
//! static column type.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::json;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

use crate::AppState;

/// Query parameters for /query
#[derive(Debug, Deserialize)]
pub struct QueryParams {
    /// Raw SQL text to execute
    pub q: Option<String>,
}

/// A single decoded cell value.
///
/// The store is dynamically typed per value, so a result cell is one of five
/// kinds. The serializer switches on this tag: Null becomes JSON null,
/// Integer a number without a decimal point, Real a number with one, Text a
/// string, and Blob a base64 string (JSON has no binary type).
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Serialize for SqlValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SqlValue::Null => serializer.serialize_unit(),
            SqlValue::Integer(v) => serializer.serialize_i64(*v),
            SqlValue::Real(v) => serializer.serialize_f64(*v),
            SqlValue::Text(v) => serializer.serialize_str(v),
            SqlValue::Blob(v) => serializer.serialize_str(&BASE64.encode(v)),
        }
    }
}

/// One result row: an ordered column-name -> value map.
pub type JsonRow = serde_json::Map<String, serde_json::Value>;

/// GET /query?q=<sql>
///
/// Executes the statement verbatim and materializes the whole result set
/// before responding; there is no streaming and no partial response. The
/// request's pooled connection is released when the handler returns,
/// success or not.
pub async fn run_query(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<JsonRow>>, QueryError> {
    let sql = match params.q.as_deref() {
        Some(q) if !q.is_empty() => q,
        _ => return Err(QueryError::MissingQuery),
    };

    let rows = sqlx::query(sql)
        .fetch_all(&state.db)
        .await
        .map_err(|e| QueryError::Execute(e.to_string()))?;

    let mut results = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut object = JsonRow::new();
        for (i, column) in row.columns().iter().enumerate() {
            let value = decode_cell(row, i)?;
            let value = serde_json::to_value(&value)
                .map_err(|e| QueryError::Encode(e.to_string()))?;
            object.insert(column.name().to_string(), value);
        }
        results.push(object);
    }

    Ok(Json(results))
}

/// Decode one cell by the stored value's own type, not the column's declared
/// type.
fn decode_cell(row: &SqliteRow, index: usize) -> Result<SqlValue, QueryError> {
    let raw = row
        .try_get_raw(index)
        .map_err(|e| QueryError::Decode(e.to_string()))?;

    if raw.is_null() {
        return Ok(SqlValue::Null);
    }

    let type_name = raw.type_info().name().to_string();
    let value = match type_name.as_str() {
        "INTEGER" | "BOOLEAN" => SqlValue::Integer(
            row.try_get::<i64, _>(index)
                .map_err(|e| QueryError::Decode(e.to_string()))?,
        ),
        "REAL" => SqlValue::Real(
            row.try_get::<f64, _>(index)
                .map_err(|e| QueryError::Decode(e.to_string()))?,
        ),
        "BLOB" => SqlValue::Blob(
            row.try_get::<Vec<u8>, _>(index)
                .map_err(|e| QueryError::Decode(e.to_string()))?,
        ),
        _ => SqlValue::Text(
            row.try_get::<String, _>(index)
                .map_err(|e| QueryError::Decode(e.to_string()))?,
        ),
    };
    Ok(value)
}

/// Query API errors
///
/// All recoverable per request; the process keeps serving. Error bodies carry
/// the backend error text through to the client.
#[derive(Debug)]
pub enum QueryError {
    MissingQuery,
    Execute(String),
    Decode(String),
    Encode(String),
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            QueryError::MissingQuery => (
                StatusCode::BAD_REQUEST,
                "Query parameter 'q' is required".to_string(),
            ),
            QueryError::Execute(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to execute query: {}", msg),
            ),
            QueryError::Decode(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to decode row: {}", msg),
            ),
            QueryError::Encode(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode results: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_serializes_as_json_null() {
        assert_eq!(serde_json::to_string(&SqlValue::Null).unwrap(), "null");
    }

    #[test]
    fn integer_serializes_without_decimal_point() {
        assert_eq!(
            serde_json::to_string(&SqlValue::Integer(1972)).unwrap(),
            "1972"
        );
    }

    #[test]
    fn real_serializes_with_decimal_point() {
        assert_eq!(serde_json::to_string(&SqlValue::Real(8.5)).unwrap(), "8.5");
    }

    #[test]
    fn text_serializes_as_string() {
        assert_eq!(
            serde_json::to_string(&SqlValue::Text("Godfather, The".into())).unwrap(),
            "\"Godfather, The\""
        );
    }

    #[test]
    fn blob_serializes_as_base64_string() {
        assert_eq!(
            serde_json::to_string(&SqlValue::Blob(vec![0xDE, 0xAD, 0xBE, 0xEF])).unwrap(),
            "\"3q2+7w==\""
        );
    }
}
