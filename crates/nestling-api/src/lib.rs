// nestling-api: Typed async HTTP gateway for the nestling monitor backend.
//
// One module per remote resource family; every call goes through the
// shared validation and error-normalization policy in `client`.

pub mod client;
pub mod diaper;
pub mod error;
pub mod feeding;
pub mod sleep;
pub mod system;

pub use client::{ApiClient, GatewayConfig};
pub use error::Error;

pub use diaper::{DiaperEvent, DiaperKind, DiaperStats, LastChange};
pub use feeding::{FeedingEvent, FeedingKind};
pub use sleep::{NightSleep, SleepDay, SleepStats, Urgency, WakeWindow};
pub use system::{AwakeStatus, Health};
