pub mod grid;
pub mod reconcile;
pub mod selector;
pub mod sync;

pub use grid::{auto_target_month, build_cells, DayCell};
pub use reconcile::DayRole;
pub use selector::{DraftRange, SelectionState};
pub use sync::{SyncLoop, SyncOutcome};
