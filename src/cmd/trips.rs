use crate::data::trip::format_date;
use crate::data::{AppSettings, Trip};
use crate::remote::TripStore;
use anyhow::Result;

pub fn run(settings: &AppSettings) -> Result<()> {
    let store = super::open_store(settings)?;
    let trips = store.fetch_all()?;
    write_trips(&trips, &mut std::io::stdout())
}

pub(crate) fn write_trips<W: std::io::Write>(trips: &[Trip], out: &mut W) -> Result<()> {
    writeln!(out, "Trips")?;
    writeln!(out, "---")?;
    writeln!(
        out,
        "  {:<4} {:<20} {:<12} {:<12} {}",
        "#", "Id", "Start", "End", "Days"
    )?;
    for (i, t) in trips.iter().enumerate() {
        writeln!(
            out,
            "  {:<4} {:<20} {:<12} {:<12} {}",
            i + 1,
            t.id,
            format_date(t.start_date),
            format_date(t.end_date),
            t.days()
        )?;
    }
    writeln!(out, "---")?;
    writeln!(out, "Total: {} trip(s)", trips.len())?;
    Ok(())
}
