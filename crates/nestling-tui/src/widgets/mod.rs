pub mod status_badge;
pub mod urgency;
