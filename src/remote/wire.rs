//! Request and response shapes of the remote trip script.
//!
//! Responses are JSON text. Any body may instead be
//! `{"status":"error","message":...}`, which is checked before the
//! success shape is decoded.

use crate::data::trip::{format_date, parse_wire_date, Trip};
use crate::remote::error::{StoreError, StoreResult};
use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const GET_ALL_ACTION: &str = "getAll";

#[derive(Serialize, Debug, PartialEq)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum StoreRequest<'a> {
    Save {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<&'a str>,
        #[serde(rename = "startDate")]
        start_date: String,
        #[serde(rename = "endDate")]
        end_date: String,
    },
    Delete {
        id: &'a str,
    },
}

impl<'a> StoreRequest<'a> {
    pub fn save(id: Option<&'a str>, start: NaiveDate, end: NaiveDate) -> Self {
        StoreRequest::Save {
            id,
            start_date: format_date(start),
            end_date: format_date(end),
        }
    }

    pub fn delete(id: &'a str) -> Self {
        StoreRequest::Delete { id }
    }
}

#[derive(Deserialize, Debug)]
struct ListResponse {
    trips: Vec<WireTrip>,
}

/// Every field is optional so one bad row cannot sink the whole list.
#[derive(Deserialize, Debug)]
struct WireTrip {
    #[serde(default)]
    id: Option<Value>,
    #[serde(rename = "startDate", default)]
    start_date: Option<Value>,
    #[serde(rename = "endDate", default)]
    end_date: Option<Value>,
    #[serde(rename = "lastModified", default)]
    last_modified: Option<Value>,
}

#[derive(Deserialize, Debug)]
struct SaveResponse {
    id: Value,
}

/// Strings stay as-is, numbers use their JSON text, null is absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn parse_body(body: &str) -> StoreResult<Value> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| StoreError::Transport(format!("malformed response body: {e}")))?;
    if value.get("status").and_then(Value::as_str) == Some("error") {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        return Err(StoreError::Application(message));
    }
    Ok(value)
}

fn decode<T: for<'de> Deserialize<'de>>(value: Value) -> StoreResult<T> {
    serde_json::from_value(value)
        .map_err(|e| StoreError::Transport(format!("unexpected response shape: {e}")))
}

pub fn parse_list_response(body: &str) -> StoreResult<Vec<Trip>> {
    let response: ListResponse = decode(parse_body(body)?)?;
    let mut trips = Vec::with_capacity(response.trips.len());
    for entry in response.trips {
        let Some(id) = entry.id.as_ref().and_then(scalar_text) else {
            warn!("skipping trip without id");
            continue;
        };
        let start_raw = entry.start_date.as_ref().and_then(Value::as_str);
        let end_raw = entry.end_date.as_ref().and_then(Value::as_str);
        let (Some(start), Some(end)) = (
            start_raw.and_then(parse_wire_date),
            end_raw.and_then(parse_wire_date),
        ) else {
            warn!(
                "skipping trip {id}: unparseable dates {:?} / {:?}",
                entry.start_date, entry.end_date
            );
            continue;
        };
        let modified = entry.last_modified.as_ref().and_then(scalar_text);
        match Trip::new(&id, start, end, modified.as_deref()) {
            Ok(trip) => trips.push(trip),
            Err(e) => warn!("skipping trip {id}: {e}"),
        }
    }
    Ok(trips)
}

pub fn parse_save_response(body: &str) -> StoreResult<String> {
    let response: SaveResponse = decode(parse_body(body)?)?;
    scalar_text(&response.id)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| StoreError::Transport("save response carried an empty id".to_string()))
}

pub fn parse_delete_response(body: &str) -> StoreResult<()> {
    if body.trim().is_empty() {
        return Ok(());
    }
    parse_body(body).map(|_| ())
}
