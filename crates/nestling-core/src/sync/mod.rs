// ── Synchronization primitives ──
//
// Two trigger policies over one shared subscription core: a fixed-period
// schedule (`Poller`) and dependency-change / on-demand runs (`OnChange`).
// Both observe the same ordering discipline: overlapping fetches are
// permitted, and only the most recently initiated cycle's result may be
// accepted.

mod on_change;
mod poll;
mod state;

pub use on_change::OnChange;
pub use poll::Poller;
pub use state::SyncState;
