use crate::data::trip::format_date;
use crate::data::AppSettings;
use crate::remote::{save_and_confirm, TripStore};
use anyhow::Result;
use chrono::NaiveDate;

pub fn run(settings: &AppSettings, id: Option<&str>, start: NaiveDate, end: NaiveDate) -> Result<()> {
    let store = super::open_store(settings)?;
    save_with(&store, id, start, end, &mut std::io::stdout())
}

pub(crate) fn save_with<S, W>(
    store: &S,
    id: Option<&str>,
    start: NaiveDate,
    end: NaiveDate,
    out: &mut W,
) -> Result<()>
where
    S: TripStore + ?Sized,
    W: std::io::Write,
{
    let (new_id, trips) = save_and_confirm(store, id, start, end)?;
    writeln!(
        out,
        "Saved trip {} ({} – {})",
        new_id,
        format_date(start),
        format_date(end)
    )?;
    writeln!(out, "Total: {} trip(s)", trips.len())?;
    Ok(())
}
