use crate::data::app_settings::SettingsWrapper;
use crate::data::{AppSettings, HolidayData, HolidayKind, Persistable};
use anyhow::Result;
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

pub fn run() -> Result<()> {
    let dir = crate::data::persistence::get_data_dir()?;
    fs::create_dir_all(&dir)?;
    run_in_dir(&dir)?;
    println!("Data files initialized successfully.");
    println!("Set `settings.endpoint` in {} to your trip store URL.", dir.join("config.yaml").display());
    Ok(())
}

/// Writes all default data files into `dir`. Exposed for unit testing.
pub(crate) fn run_in_dir(dir: &Path) -> Result<()> {
    write_config(dir)?;
    write_holidays(dir)?;
    Ok(())
}

fn write_config(dir: &Path) -> Result<()> {
    SettingsWrapper {
        settings: AppSettings::default(),
    }
    .save_to(dir)
}

fn write_holidays(dir: &Path) -> Result<()> {
    let mut data = HolidayData::default();
    init_holidays(&mut data);
    data.save_to(dir)
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap_or_default()
}

fn init_holidays(data: &mut HolidayData) {
    use HolidayKind::{Holiday, Workday};

    data.add_span("New Year's Day", d(2025, 1, 1), d(2025, 1, 1), Holiday);
    data.add_span("Spring Festival", d(2025, 1, 26), d(2025, 1, 26), Workday);
    data.add_span("Spring Festival", d(2025, 1, 28), d(2025, 2, 4), Holiday);
    data.add_span("Spring Festival", d(2025, 2, 8), d(2025, 2, 8), Workday);
    data.add_span("Qingming Festival", d(2025, 4, 4), d(2025, 4, 6), Holiday);
    data.add_span("Labour Day", d(2025, 4, 27), d(2025, 4, 27), Workday);
    data.add_span("Labour Day", d(2025, 5, 1), d(2025, 5, 5), Holiday);
    data.add_span("Dragon Boat Festival", d(2025, 5, 31), d(2025, 6, 2), Holiday);
    data.add_span("National Day", d(2025, 9, 28), d(2025, 9, 28), Workday);
    data.add_span("National Day", d(2025, 10, 1), d(2025, 10, 8), Holiday);
    data.add_span("National Day", d(2025, 10, 11), d(2025, 10, 11), Workday);

    data.add_span("New Year's Day", d(2026, 1, 1), d(2026, 1, 3), Holiday);
    data.add_span("New Year's Day", d(2026, 1, 4), d(2026, 1, 4), Workday);
    data.add_span("Spring Festival", d(2026, 2, 14), d(2026, 2, 14), Workday);
    data.add_span("Spring Festival", d(2026, 2, 15), d(2026, 2, 23), Holiday);
    data.add_span("Spring Festival", d(2026, 2, 28), d(2026, 2, 28), Workday);
    data.add_span("Qingming Festival", d(2026, 4, 4), d(2026, 4, 6), Holiday);
    data.add_span("Labour Day", d(2026, 5, 1), d(2026, 5, 5), Holiday);
    data.add_span("Labour Day", d(2026, 5, 9), d(2026, 5, 9), Workday);
    data.add_span("Dragon Boat Festival", d(2026, 6, 19), d(2026, 6, 21), Holiday);
    data.add_span("National Day", d(2026, 9, 20), d(2026, 9, 20), Workday);
    data.add_span("Mid-Autumn Festival", d(2026, 9, 25), d(2026, 9, 27), Holiday);
    data.add_span("National Day", d(2026, 10, 1), d(2026, 10, 7), Holiday);
    data.add_span("National Day", d(2026, 10, 10), d(2026, 10, 10), Workday);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_run_in_dir_creates_all_files() {
        let tmp = TempDir::new().unwrap();
        run_in_dir(tmp.path()).unwrap();
        assert!(tmp.path().join("config.yaml").exists(), "config.yaml missing");
        assert!(tmp.path().join("holidays.yaml").exists(), "holidays.yaml missing");
    }

    #[test]
    fn test_config_yaml_is_parseable_as_settings() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path()).unwrap();
        let content = fs::read_to_string(tmp.path().join("config.yaml")).unwrap();
        assert!(content.contains("settings"));
        assert!(content.contains("poll_interval_secs"));
        let wrapper = SettingsWrapper::load_from(tmp.path()).unwrap();
        assert_eq!(wrapper.settings, AppSettings::default());
    }

    #[test]
    fn test_holidays_file_has_expected_count() {
        let tmp = TempDir::new().unwrap();
        write_holidays(tmp.path()).unwrap();
        let data = HolidayData::load_from(tmp.path()).unwrap();
        // 2025: 28 days off + 5 make-up days; 2026: 33 days off + 6 make-up days.
        assert_eq!(data.holidays.len(), 72);
    }

    #[test]
    fn test_default_holidays_include_makeup_workdays() {
        let mut data = HolidayData::default();
        init_holidays(&mut data);
        assert_eq!(data.lookup(d(2025, 9, 28)).unwrap().kind, HolidayKind::Workday);
        assert_eq!(data.lookup(d(2025, 10, 8)).unwrap().kind, HolidayKind::Holiday);
        assert!(data.lookup(d(2025, 10, 9)).is_none());
    }

    #[test]
    fn test_default_holiday_dates_are_unique() {
        let mut data = HolidayData::default();
        init_holidays(&mut data);
        assert_eq!(data.holiday_map().len(), data.holidays.len());
    }
}
