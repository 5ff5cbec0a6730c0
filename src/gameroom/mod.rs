pub mod event;
pub mod hub;
pub mod manager;
pub mod state;

pub use event::{Event, EventReply};
pub use hub::TableHub;
pub use manager::HubManager;
pub use state::{Seat, TableConfig};
