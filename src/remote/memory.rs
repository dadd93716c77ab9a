//! In-memory store used by tests in place of the HTTP endpoint.

use crate::data::trip::{check_range, Trip};
use crate::remote::client::TripStore;
use crate::remote::error::{StoreError, StoreResult};
use crate::remote::wire::parse_list_response;
use chrono::NaiveDate;
use std::cell::{Cell, RefCell};

#[derive(Default)]
pub struct MemoryStore {
    pub trips: RefCell<Vec<Trip>>,
    next_id: Cell<u32>,
    revision: Cell<u32>,
    /// Report success on save without keeping the trip.
    pub drop_writes: Cell<bool>,
    /// When set, every call fails with this error.
    pub fail_with: RefCell<Option<StoreError>>,
    pub fetch_count: Cell<usize>,
    /// When set, list calls decode this body as the endpoint would.
    pub list_body: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn with_trips(trips: Vec<Trip>) -> Self {
        let store = MemoryStore::default();
        *store.trips.borrow_mut() = trips;
        store
    }

    fn check_failure(&self) -> StoreResult<()> {
        match self.fail_with.borrow().as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn bump(&self) -> String {
        self.revision.set(self.revision.get() + 1);
        self.revision.get().to_string()
    }
}

impl TripStore for MemoryStore {
    fn fetch_all(&self) -> StoreResult<Vec<Trip>> {
        self.fetch_count.set(self.fetch_count.get() + 1);
        self.check_failure()?;
        if let Some(body) = self.list_body.borrow().as_deref() {
            return parse_list_response(body);
        }
        Ok(self.trips.borrow().clone())
    }

    fn save(&self, id: Option<&str>, start: NaiveDate, end: NaiveDate) -> StoreResult<String> {
        check_range(start, end)?;
        self.check_failure()?;
        let id = match id {
            Some(id) => id.to_string(),
            None => {
                self.next_id.set(self.next_id.get() + 1);
                format!("T{}", self.next_id.get())
            }
        };
        if self.drop_writes.get() {
            return Ok(id);
        }
        let marker = self.bump();
        let trip = Trip::new(&id, start, end, Some(&marker))?;
        let mut trips = self.trips.borrow_mut();
        match trips.iter_mut().find(|t| t.id == id) {
            Some(existing) => *existing = trip,
            None => trips.push(trip),
        }
        Ok(id)
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        self.check_failure()?;
        self.trips.borrow_mut().retain(|t| t.id != id);
        Ok(())
    }
}
