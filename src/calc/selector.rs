use chrono::NaiveDate;

/// Which of the three selection states a draft is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Empty,
    Partial,
    Complete,
}

/// The in-progress, unsaved start/end selection.
///
/// Only [`DraftRange::click`] and [`DraftRange::reset`] change it, so
/// `start <= end` always holds when both are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DraftRange {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl DraftRange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    pub fn state(&self) -> SelectionState {
        match (self.start, self.end) {
            (None, _) => SelectionState::Empty,
            (Some(_), None) => SelectionState::Partial,
            (Some(_), Some(_)) => SelectionState::Complete,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.state() == SelectionState::Empty
    }

    /// The range to save, only when complete.
    pub fn complete_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.start.zip(self.end)
    }

    /// Applies one date click and returns the new state.
    ///
    /// - empty: the date becomes the start
    /// - partial: an earlier date restarts, the same date cancels, a later date ends
    /// - complete: any date starts over
    pub fn click(&mut self, date: NaiveDate) -> SelectionState {
        *self = match (self.start, self.end) {
            (Some(start), None) if date == start => DraftRange::default(),
            (Some(start), None) if date > start => DraftRange {
                start: Some(start),
                end: Some(date),
            },
            _ => DraftRange {
                start: Some(date),
                end: None,
            },
        };
        self.state()
    }

    pub fn reset(&mut self) {
        *self = DraftRange::default();
    }

    /// True when `date` is inside the draft. With only a start set, just
    /// that exact date matches.
    pub fn covers(&self, date: NaiveDate) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= date && date <= end,
            (Some(start), None) => start == date,
            _ => false,
        }
    }
}
