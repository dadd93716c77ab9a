use crate::calc::selector::DraftRange;
use crate::data::trip::{trip_on, Trip};
use chrono::NaiveDate;
use log::debug;

/// What governs a single calendar date. Rendering only looks at this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayRole {
    DraftBoundary { is_start: bool, is_end: bool },
    DraftInterior,
    TripBoundary { is_start: bool, is_end: bool },
    TripInterior,
    Plain,
}

impl DayRole {
    pub fn is_draft(self) -> bool {
        matches!(self, DayRole::DraftBoundary { .. } | DayRole::DraftInterior)
    }

    pub fn is_trip(self) -> bool {
        matches!(self, DayRole::TripBoundary { .. } | DayRole::TripInterior)
    }
}

/// Draft-vs-trip ownership of one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation<'a> {
    pub owned_by_draft: bool,
    pub trip: Option<&'a Trip>,
    pub is_start: bool,
    pub is_end: bool,
    pub is_interior: bool,
    /// Owned by a trip and not touched by the draft at all.
    pub saved_distinct: bool,
}

/// Decides which entity governs `date`.
///
/// Draft boundaries suppress trip boundaries one boundary at a time: a
/// draft with only a start set still lets a trip's end date show as an end.
pub fn reconcile<'a>(date: NaiveDate, trips: &'a [Trip], draft: &DraftRange) -> Reconciliation<'a> {
    let trip = trip_on(trips, date);
    if trip.is_some() && trips.iter().filter(|t| t.contains(date)).count() > 1 {
        debug!("overlapping trips on {date}; using the first in list order");
    }

    let is_start = match draft.start() {
        Some(start) => date == start,
        None => trip.is_some_and(|t| t.start_date == date),
    };
    let is_end = match draft.end() {
        Some(end) => date == end,
        None => trip.is_some_and(|t| t.end_date == date),
    };
    let draft_interior = draft
        .complete_range()
        .is_some_and(|(start, end)| start < date && date < end);
    let is_interior = match draft.complete_range() {
        Some(_) => draft_interior,
        None => trip.is_some_and(|t| t.start_date < date && date < t.end_date),
    };

    let touches_draft =
        draft.start() == Some(date) || draft.end() == Some(date) || draft_interior;

    Reconciliation {
        owned_by_draft: draft.covers(date),
        trip,
        is_start,
        is_end,
        is_interior,
        saved_distinct: trip.is_some() && !touches_draft,
    }
}

impl Reconciliation<'_> {
    pub fn role(&self) -> DayRole {
        if self.owned_by_draft {
            if self.is_start || self.is_end {
                DayRole::DraftBoundary {
                    is_start: self.is_start,
                    is_end: self.is_end,
                }
            } else {
                DayRole::DraftInterior
            }
        } else if self.trip.is_some() {
            if self.is_start || self.is_end {
                DayRole::TripBoundary {
                    is_start: self.is_start,
                    is_end: self.is_end,
                }
            } else {
                // Includes trip boundaries suppressed by the draft.
                DayRole::TripInterior
            }
        } else {
            DayRole::Plain
        }
    }
}
