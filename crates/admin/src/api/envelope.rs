//! List response normalization.
//!
//! List endpoints are not guaranteed to answer with a bare JSON array; some
//! deployments wrap the rows in an envelope. Everything that tolerates that
//! lives here so the rest of the crate only ever sees a `Vec<T>`.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Envelope fields checked after the resource's own key.
const ENVELOPE_FIELDS: [&str; 2] = ["results", "data"];

/// Fields that mark an object as an error report rather than a list.
const ERROR_FIELDS: [&str; 3] = ["detail", "error", "message"];

/// Which candidate shape a list response matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListShape {
    /// A bare JSON array.
    BareArray,
    /// An object carrying the rows under this field.
    Envelope(String),
    /// `{}`, or no body at all.
    Empty,
    /// An object reporting an error instead of rows.
    ErrorMessage(String),
    /// An unrecognized object whose values were taken as the rows.
    ExtractedValues,
    /// An unrecognized object with nothing usable in it.
    Unrecognized,
    /// A string, number or boolean.
    NotAList,
}

/// Reduce any list response body to its rows.
///
/// Candidates are tried in order: bare array, an object with a
/// `primary_key`/`results`/`data` array, an empty object, an object with an
/// error message, any other object (its first array field, else its object
/// values), and finally any other value. Never fails; the worst case is an
/// empty list.
#[must_use]
pub fn normalize_list(body: Option<Value>, primary_key: &str) -> (ListShape, Vec<Value>) {
    let (shape, rows) = match body {
        None | Some(Value::Null) => (ListShape::Empty, Vec::new()),
        Some(Value::Array(rows)) => (ListShape::BareArray, rows),
        Some(Value::Object(object)) => normalize_object(object, primary_key),
        Some(_) => (ListShape::NotAList, Vec::new()),
    };

    match &shape {
        ListShape::BareArray => {}
        ListShape::ErrorMessage(message) => {
            warn!(key = primary_key, message = %message, "List endpoint returned an error object");
        }
        ListShape::ExtractedValues | ListShape::Unrecognized | ListShape::NotAList => {
            warn!(key = primary_key, shape = ?shape, "Unexpected list response shape");
        }
        ListShape::Envelope(_) | ListShape::Empty => {
            debug!(key = primary_key, shape = ?shape, "Normalized list response");
        }
    }

    (shape, rows)
}

fn normalize_object(mut object: Map<String, Value>, primary_key: &str) -> (ListShape, Vec<Value>) {
    for field in std::iter::once(primary_key).chain(ENVELOPE_FIELDS) {
        if object.get(field).is_some_and(Value::is_array)
            && let Some(Value::Array(rows)) = object.remove(field)
        {
            return (ListShape::Envelope(field.to_owned()), rows);
        }
    }

    if object.is_empty() {
        return (ListShape::Empty, Vec::new());
    }

    if let Some(message) = ERROR_FIELDS
        .iter()
        .find_map(|field| object.get(*field).and_then(Value::as_str))
    {
        return (ListShape::ErrorMessage(message.to_owned()), Vec::new());
    }

    if let Some(rows) = object.values_mut().find_map(|value| match value {
        Value::Array(rows) => Some(std::mem::take(rows)),
        _ => None,
    }) {
        return (ListShape::ExtractedValues, rows);
    }

    // Objects keyed by id, e.g. {"1": {...}, "2": {...}}.
    if object.values().all(Value::is_object) {
        return (
            ListShape::ExtractedValues,
            object.into_iter().map(|(_, value)| value).collect(),
        );
    }

    (ListShape::Unrecognized, Vec::new())
}

/// Deserialize each row on its own, skipping rows that do not fit `T`.
#[must_use]
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Vec<T> {
    let total = rows.len();
    let decoded: Vec<T> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed list row");
                None
            }
        })
        .collect();

    if decoded.len() < total {
        debug!(kept = decoded.len(), total, "Some list rows were dropped");
    }
    decoded
}
