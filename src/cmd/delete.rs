use crate::data::AppSettings;
use crate::remote::{delete_and_refresh, TripStore};
use anyhow::Result;

pub fn run(settings: &AppSettings, id: &str) -> Result<()> {
    let store = super::open_store(settings)?;
    delete_with(&store, id, &mut std::io::stdout())
}

pub(crate) fn delete_with<S, W>(store: &S, id: &str, out: &mut W) -> Result<()>
where
    S: TripStore + ?Sized,
    W: std::io::Write,
{
    let remaining = delete_and_refresh(store, id)?;
    writeln!(out, "Deleted trip {id}; {} trip(s) remain", remaining.len())?;
    Ok(())
}
