use crate::data::trip::{check_range, Trip};
use crate::remote::error::{StoreError, StoreResult};
use crate::remote::wire::{
    parse_delete_response, parse_list_response, parse_save_response, StoreRequest, GET_ALL_ACTION,
};
use chrono::NaiveDate;
use log::{debug, info};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
/// Background polls run on the UI thread, so they give up early.
pub const POLL_TIMEOUT: Duration = Duration::from_secs(3);

/// Save, list and delete against the remote trip store.
pub trait TripStore {
    fn fetch_all(&self) -> StoreResult<Vec<Trip>>;

    /// Background variant of [`TripStore::fetch_all`]; may use a tighter deadline.
    fn poll(&self) -> StoreResult<Vec<Trip>> {
        self.fetch_all()
    }

    /// Returns the server-assigned id. The result is provisional until a
    /// fetch shows the trip, see [`save_and_confirm`].
    fn save(&self, id: Option<&str>, start: NaiveDate, end: NaiveDate) -> StoreResult<String>;

    fn delete(&self, id: &str) -> StoreResult<()>;
}

/// Blocking HTTP client for the spreadsheet-backed script endpoint.
pub struct HttpTripStore {
    client: reqwest::blocking::Client,
    endpoint: Option<String>,
}

impl HttpTripStore {
    pub fn new(endpoint: Option<&str>) -> StoreResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(HttpTripStore {
            client,
            endpoint: endpoint.map(str::to_string),
        })
    }

    fn endpoint(&self) -> StoreResult<&str> {
        self.endpoint.as_deref().ok_or(StoreError::NotConfigured)
    }

    fn post(&self, request: &StoreRequest) -> StoreResult<String> {
        let url = self.endpoint()?;
        let body = serde_json::to_string(request)
            .map_err(|e| StoreError::Transport(format!("could not encode request: {e}")))?;
        debug!("POST {url} {body}");
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "text/plain;charset=utf-8")
            .body(body)
            .send()?;
        if !response.status().is_success() {
            return Err(StoreError::Transport(format!(
                "request failed with status: {}",
                response.status()
            )));
        }
        Ok(response.text()?)
    }

    fn get_all(&self, timeout: Duration) -> StoreResult<Vec<Trip>> {
        let url = self.endpoint()?;
        debug!("GET {url}?action={GET_ALL_ACTION}");
        let response = self
            .client
            .get(url)
            .query(&[("action", GET_ALL_ACTION)])
            .timeout(timeout)
            .send()?;
        if !response.status().is_success() {
            return Err(StoreError::Transport(format!(
                "request failed with status: {}",
                response.status()
            )));
        }
        let trips = parse_list_response(&response.text()?)?;
        debug!("fetched {} trip(s)", trips.len());
        Ok(trips)
    }
}

impl TripStore for HttpTripStore {
    fn fetch_all(&self) -> StoreResult<Vec<Trip>> {
        self.get_all(REQUEST_TIMEOUT)
    }

    fn poll(&self) -> StoreResult<Vec<Trip>> {
        self.get_all(POLL_TIMEOUT)
    }

    fn save(&self, id: Option<&str>, start: NaiveDate, end: NaiveDate) -> StoreResult<String> {
        check_range(start, end)?;
        let id = parse_save_response(&self.post(&StoreRequest::save(id, start, end))?)?;
        info!("saved trip {id}");
        Ok(id)
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        parse_delete_response(&self.post(&StoreRequest::delete(id))?)?;
        info!("deleted trip {id}");
        Ok(())
    }
}

/// Saves, then re-fetches to prove the write landed.
///
/// Returns the new id and the fresh list. A missing id after a reported
/// success is [`StoreError::NotPropagated`].
pub fn save_and_confirm<S: TripStore + ?Sized>(
    store: &S,
    id: Option<&str>,
    start: NaiveDate,
    end: NaiveDate,
) -> StoreResult<(String, Vec<Trip>)> {
    let new_id = store.save(id, start, end)?;
    let trips = store.fetch_all()?;
    if !trips.iter().any(|t| t.id == new_id) {
        return Err(StoreError::NotPropagated(new_id));
    }
    Ok((new_id, trips))
}

pub fn delete_and_refresh<S: TripStore + ?Sized>(store: &S, id: &str) -> StoreResult<Vec<Trip>> {
    store.delete(id)?;
    store.fetch_all()
}
