mod machine;
mod state;

pub use machine::{Inventory, Product, SaleRecord, VendingMachine};
pub use state::{Accepted, Denial, Event, Response, State};
