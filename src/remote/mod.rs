pub mod client;
pub mod error;
#[cfg(test)]
pub mod memory;
pub mod wire;

pub use client::{delete_and_refresh, save_and_confirm, HttpTripStore, TripStore};
pub use error::{StoreError, StoreResult};
