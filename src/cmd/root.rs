use crate::data::{AppSettings, HolidayData, Persistable};
use crate::ui::calendar_view::{run_app, App};
use crate::ui::{restore_terminal, setup_terminal};
use anyhow::Result;
use chrono::Local;
use std::time::Instant;

pub fn run(settings: &AppSettings) -> Result<()> {
    let holiday_data = HolidayData::load()?;
    let store = super::open_store(settings)?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen
        );
        original_hook(info);
    }));

    let mut terminal = setup_terminal()?;

    let today = Local::now().date_naive();
    let mut app = App::new(&store, &holiday_data, settings, today);
    app.initial_load(Instant::now());

    let result = run_app(&mut terminal, &mut app);

    restore_terminal(&mut terminal)?;

    result
}
