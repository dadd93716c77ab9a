use crate::data::persistence::Persistable;
use crate::data::trip::{format_date, DATE_FORMAT};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HolidayKind {
    /// Day off.
    #[default]
    Holiday,
    /// Make-up workday that compensates for an adjacent holiday.
    Workday,
}

impl HolidayKind {
    pub fn label(self) -> &'static str {
        match self {
            HolidayKind::Holiday => "Holiday",
            HolidayKind::Workday => "Make-up workday",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Holiday {
    pub name: String,
    pub date: String,
    #[serde(default)]
    pub kind: HolidayKind,
}

impl Holiday {
    pub fn new(name: &str, date: &str, kind: HolidayKind) -> Self {
        Holiday {
            name: name.to_string(),
            date: date.to_string(),
            kind,
        }
    }
}

/// Static, read-only holiday table keyed by `YYYY-MM-DD`.
#[derive(Serialize, Deserialize, Default, Debug)]
pub struct HolidayData {
    pub holidays: Vec<Holiday>,
}

impl Persistable for HolidayData {
    fn filename() -> &'static str {
        "holidays.yaml"
    }
}

impl HolidayData {
    pub fn add(&mut self, holiday: Holiday) {
        self.holidays.push(holiday);
    }

    /// Adds one entry per day in `[start, end]`.
    pub fn add_span(&mut self, name: &str, start: NaiveDate, end: NaiveDate, kind: HolidayKind) {
        for date in start.iter_days().take_while(|d| *d <= end) {
            self.add(Holiday::new(name, &format_date(date), kind));
        }
    }

    /// Date-keyed view of the table; build once per render. Later entries
    /// for the same date win, and unparseable dates are left out.
    pub fn holiday_map(&self) -> HashMap<NaiveDate, &Holiday> {
        let mut map = HashMap::new();
        for h in &self.holidays {
            if let Ok(date) = NaiveDate::parse_from_str(&h.date, DATE_FORMAT) {
                map.insert(date, h);
            }
        }
        map
    }

    /// Single-date lookup with the same precedence as [`HolidayData::holiday_map`].
    pub fn lookup(&self, date: NaiveDate) -> Option<&Holiday> {
        let key = format_date(date);
        self.holidays.iter().rev().find(|h| h.date == key)
    }
}
