use crate::calc::reconcile::{reconcile, DayRole};
use crate::calc::selector::DraftRange;
use crate::data::{Holiday, HolidayData, Trip};
use chrono::{Datelike, Duration, NaiveDate};

/// One rendered calendar square.
#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub holiday: Option<Holiday>,
    pub role: DayRole,
    /// Persisted-only day, drawn with less emphasis.
    pub saved_distinct: bool,
    /// Padding days are never clickable.
    pub interactive: bool,
}

pub(crate) fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    match (
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
        NaiveDate::from_ymd_opt(year, month, 1),
    ) {
        (Some(next), Some(first)) => next.signed_duration_since(first).num_days() as u32,
        _ => 0,
    }
}

pub(crate) fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let new_total = date.month() as i32 - 1 + months;
    let new_month = (new_total.rem_euclid(12) + 1) as u32;
    let new_year = date.year() + new_total.div_euclid(12);
    let new_day = date.day().min(days_in_month(new_year, new_month));
    NaiveDate::from_ymd_opt(new_year, new_month, new_day).unwrap_or(date)
}

/// First day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn next_month(displayed: NaiveDate) -> NaiveDate {
    add_months(first_of_month(displayed), 1)
}

pub fn prev_month(displayed: NaiveDate) -> NaiveDate {
    add_months(first_of_month(displayed), -1)
}

pub fn current_month(today: NaiveDate) -> NaiveDate {
    first_of_month(today)
}

/// Every date from the Sunday on or before the 1st to the Saturday on or
/// after the last day of the month. Always a multiple of 7 long.
pub fn month_grid(displayed: NaiveDate) -> Vec<NaiveDate> {
    let first = first_of_month(displayed);
    let last = first
        + Duration::days(days_in_month(first.year(), first.month()) as i64 - 1);
    let grid_start = first - Duration::days(first.weekday().num_days_from_sunday() as i64);
    let grid_end = last + Duration::days(6 - last.weekday().num_days_from_sunday() as i64);
    grid_start
        .iter_days()
        .take_while(|d| *d <= grid_end)
        .collect()
}

/// Annotates the month grid with today, holidays and draft/trip ownership.
pub fn build_cells(
    displayed: NaiveDate,
    today: NaiveDate,
    draft: &DraftRange,
    trips: &[Trip],
    holidays: &HolidayData,
) -> Vec<DayCell> {
    let month = first_of_month(displayed);
    let holiday_map = holidays.holiday_map();
    month_grid(month)
        .into_iter()
        .map(|date| {
            let in_month = date.year() == month.year() && date.month() == month.month();
            let reconciled = reconcile(date, trips, draft);
            DayCell {
                date,
                in_month,
                is_today: date == today,
                holiday: holiday_map.get(&date).map(|h| (*h).clone()),
                role: reconciled.role(),
                saved_distinct: reconciled.saved_distinct,
                interactive: in_month,
            }
        })
        .collect()
}

/// Month the calendar should jump to, if any.
///
/// A draft start wins. Otherwise the earliest trip that has not ended yet,
/// falling back to the trip with the latest start. Trips are sorted by
/// start first, so the input order does not matter.
pub fn auto_target_month(draft: &DraftRange, trips: &[Trip], today: NaiveDate) -> Option<NaiveDate> {
    if let Some(start) = draft.start() {
        return Some(first_of_month(start));
    }
    let mut sorted: Vec<&Trip> = trips.iter().collect();
    sorted.sort_by_key(|t| t.start_date);
    sorted
        .iter()
        .find(|t| t.end_date >= today)
        .or(sorted.last())
        .map(|t| first_of_month(t.start_date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::HolidayKind;
    use chrono::Weekday;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_grid_is_whole_weeks_for_every_month() {
        for year in [2023, 2024, 2025, 2026] {
            for month in 1..=12 {
                let grid = month_grid(d(year, month, 1));
                assert_eq!(grid.len() % 7, 0, "{year}-{month}");
                assert_eq!(grid[0].weekday(), Weekday::Sun);
                assert_eq!(grid[grid.len() - 1].weekday(), Weekday::Sat);
                assert!(grid.windows(2).all(|w| w[1] == w[0].succ_opt().unwrap()));
            }
        }
    }

    #[test]
    fn test_grid_june_2025_padding() {
        // June 1 2025 is a Sunday, June 30 a Monday.
        let grid = month_grid(d(2025, 6, 15));
        assert_eq!(grid[0], d(2025, 6, 1));
        assert_eq!(grid[grid.len() - 1], d(2025, 7, 5));
        assert_eq!(grid.len(), 35);
    }

    #[test]
    fn test_grid_february_2026_exact_four_weeks() {
        // Feb 1 2026 is a Sunday and Feb 28 a Saturday.
        let grid = month_grid(d(2026, 2, 1));
        assert_eq!(grid.len(), 28);
    }

    #[test]
    fn test_grid_six_week_month() {
        // Aug 2026 starts on Saturday and has 31 days.
        let grid = month_grid(d(2026, 8, 1));
        assert_eq!(grid.len(), 42);
        assert_eq!(grid[0], d(2026, 7, 26));
    }

    #[test]
    fn test_cells_mark_padding_and_today() {
        let holidays = HolidayData::default();
        let cells = build_cells(d(2025, 7, 1), d(2025, 7, 4), &DraftRange::new(), &[], &holidays);
        // July 1 2025 is a Tuesday: Jun 29, Jun 30 are padding.
        assert!(!cells[0].in_month);
        assert!(!cells[0].interactive);
        assert!(cells[2].in_month);
        assert!(cells[2].interactive);
        let today: Vec<_> = cells.iter().filter(|c| c.is_today).collect();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].date, d(2025, 7, 4));
    }

    #[test]
    fn test_cells_carry_holidays() {
        let mut holidays = HolidayData::default();
        holidays.add(Holiday::new("National Day", "2025-10-01", HolidayKind::Holiday));
        holidays.add(Holiday::new("National Day", "2025-09-28", HolidayKind::Workday));
        let cells = build_cells(d(2025, 10, 1), d(2025, 1, 1), &DraftRange::new(), &[], &holidays);
        let oct1 = cells.iter().find(|c| c.date == d(2025, 10, 1)).unwrap();
        assert_eq!(oct1.holiday.as_ref().unwrap().kind, HolidayKind::Holiday);
        let sep28 = cells.iter().find(|c| c.date == d(2025, 9, 28)).unwrap();
        assert!(!sep28.in_month);
        assert_eq!(sep28.holiday.as_ref().unwrap().kind, HolidayKind::Workday);
    }

    #[test]
    fn test_cells_carry_roles() {
        let trips = vec![Trip::new("T1", d(2025, 6, 10), d(2025, 6, 12), None).unwrap()];
        let mut draft = DraftRange::new();
        draft.click(d(2025, 6, 20));
        let cells = build_cells(d(2025, 6, 1), d(2025, 1, 1), &draft, &trips, &HolidayData::default());
        let at = |day| cells.iter().find(|c| c.date == d(2025, 6, day)).unwrap();
        assert!(at(10).role.is_trip());
        assert!(at(11).saved_distinct);
        assert!(at(20).role.is_draft());
        assert_eq!(at(25).role, DayRole::Plain);
    }

    #[test]
    fn test_add_months_across_year() {
        assert_eq!(add_months(d(2025, 11, 15), 3), d(2026, 2, 15));
        assert_eq!(add_months(d(2025, 1, 15), -1), d(2024, 12, 15));
    }

    #[test]
    fn test_add_months_clamps_month_end() {
        assert_eq!(add_months(d(2025, 1, 31), 1), d(2025, 2, 28));
        assert_eq!(add_months(d(2024, 1, 31), 1), d(2024, 2, 29));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2025, 1), 31);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 12), 31);
    }

    #[test]
    fn test_month_name_known_and_unknown() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(13), "Unknown");
    }

    #[test]
    fn test_navigation_steps() {
        assert_eq!(next_month(d(2025, 12, 31)), d(2026, 1, 1));
        assert_eq!(prev_month(d(2025, 1, 20)), d(2024, 12, 1));
        assert_eq!(current_month(d(2025, 3, 14)), d(2025, 3, 1));
    }

    #[test]
    fn test_auto_target_prefers_draft_start() {
        let trips = vec![Trip::new("T1", d(2025, 9, 1), d(2025, 9, 3), None).unwrap()];
        let mut draft = DraftRange::new();
        draft.click(d(2025, 11, 20));
        assert_eq!(auto_target_month(&draft, &trips, d(2025, 6, 1)), Some(d(2025, 11, 1)));
    }

    #[test]
    fn test_auto_target_nearest_upcoming_trip() {
        let trips = vec![
            Trip::new("late", d(2025, 12, 1), d(2025, 12, 3), None).unwrap(),
            Trip::new("past", d(2025, 1, 1), d(2025, 1, 3), None).unwrap(),
            Trip::new("soon", d(2025, 8, 1), d(2025, 8, 3), None).unwrap(),
        ];
        assert_eq!(
            auto_target_month(&DraftRange::new(), &trips, d(2025, 6, 1)),
            Some(d(2025, 8, 1))
        );
    }

    #[test]
    fn test_auto_target_ongoing_trip_counts_as_upcoming() {
        let trips = vec![Trip::new("now", d(2025, 5, 28), d(2025, 6, 4), None).unwrap()];
        assert_eq!(
            auto_target_month(&DraftRange::new(), &trips, d(2025, 6, 1)),
            Some(d(2025, 5, 1))
        );
    }

    #[test]
    fn test_auto_target_falls_back_to_latest_trip() {
        let trips = vec![
            Trip::new("b", d(2025, 3, 1), d(2025, 3, 3), None).unwrap(),
            Trip::new("a", d(2025, 1, 1), d(2025, 1, 3), None).unwrap(),
        ];
        assert_eq!(
            auto_target_month(&DraftRange::new(), &trips, d(2025, 6, 1)),
            Some(d(2025, 3, 1))
        );
    }

    #[test]
    fn test_auto_target_none_without_trips_or_draft() {
        assert_eq!(auto_target_month(&DraftRange::new(), &[], d(2025, 6, 1)), None);
    }
}
