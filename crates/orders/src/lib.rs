//! `ordermill-orders` — order records and the approval state machine.

pub mod order;

pub use order::{Order, OrderStatus};
