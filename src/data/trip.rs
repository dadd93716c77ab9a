use chrono::NaiveDate;
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A persisted trip as held in the local read-only cache.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trip {
    pub id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Opaque change marker; only used for the sync fingerprint.
    pub last_modified: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("trip starts {start} after it ends {end}")]
pub struct InvalidTripRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Inclusive ranges only: a one-day trip has `start == end`.
pub fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), InvalidTripRange> {
    if start > end {
        return Err(InvalidTripRange { start, end });
    }
    Ok(())
}

impl Trip {
    pub fn new(
        id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        last_modified: Option<&str>,
    ) -> Result<Self, InvalidTripRange> {
        check_range(start_date, end_date)?;
        Ok(Trip {
            id: id.to_string(),
            start_date,
            end_date,
            last_modified: last_modified.map(str::to_string),
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Inclusive length in days.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// Parses a wire date such as `2025-06-05` or `2025-06-05T00:00:00.000Z`.
///
/// Only the leading `YYYY-MM-DD` is read, split into integers and built as a
/// plain calendar date; any time or zone suffix is discarded so the day can
/// never shift.
pub fn parse_wire_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split(['T', ' ']).next()?;
    let mut parts = date_part.splitn(3, '-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Order-sensitive concatenation of `id` and `last_modified` for each trip.
/// Not collision resistant; only used to skip redundant refreshes.
pub fn sync_fingerprint(trips: &[Trip]) -> String {
    let mut out = String::new();
    for trip in trips {
        out.push_str(&trip.id);
        out.push_str(trip.last_modified.as_deref().unwrap_or(""));
    }
    out
}

/// First trip in list order whose range contains `date`.
pub fn trip_on(trips: &[Trip], date: NaiveDate) -> Option<&Trip> {
    trips.iter().find(|t| t.contains(date))
}
