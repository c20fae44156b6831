//! Database operations for the `outlets` table.

mod read;
mod types;
mod write;

pub use read::{get_outlet_by_id, list_all_outlets, list_outlets, search_outlets};
pub use types::{NewOutlet, OutletRow};
pub use write::replace_all_outlets;
