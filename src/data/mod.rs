pub mod app_settings;
pub mod holiday;
pub mod persistence;
pub mod trip;

pub use app_settings::AppSettings;
pub use holiday::{Holiday, HolidayData, HolidayKind};
pub use persistence::Persistable;
pub use trip::Trip;
