pub mod delete;
pub mod holidays;
pub mod init;
pub mod root;
pub mod save;
pub mod trips;

use crate::data::AppSettings;
use crate::remote::HttpTripStore;
use anyhow::Result;

/// Builds the HTTP store from settings. A missing endpoint is not an error
/// here; each store call reports it.
pub(crate) fn open_store(settings: &AppSettings) -> Result<HttpTripStore> {
    Ok(HttpTripStore::new(settings.endpoint())?)
}
