use crate::data::{HolidayData, Persistable};
use anyhow::Result;

pub fn run() -> Result<()> {
    let holiday_data = HolidayData::load()?;
    write_holidays(&holiday_data, &mut std::io::stdout())
}

pub(crate) fn write_holidays<W: std::io::Write>(data: &HolidayData, out: &mut W) -> Result<()> {
    writeln!(out, "Holidays")?;
    writeln!(out, "---")?;
    writeln!(out, "  {:<14} {:<16} {}", "Date", "Kind", "Name")?;
    for h in &data.holidays {
        writeln!(out, "  {:<14} {:<16} {}", h.date, h.kind.label(), h.name)?;
    }
    writeln!(out, "---")?;
    writeln!(out, "Total: {} day(s)", data.holidays.len())?;
    Ok(())
}
