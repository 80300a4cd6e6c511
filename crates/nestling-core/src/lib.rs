// nestling-core: Data-synchronization core between nestling-api and the UI.

pub mod error;
pub mod format;
pub mod service;
pub mod sync;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use service::{Dashboard, DashboardConfig};
pub use sync::{OnChange, Poller, SyncState};
