pub mod config;
pub mod error;
pub mod item;
pub mod ledger;
pub mod store;
pub mod traits;

pub use config::*;
pub use error::*;
pub use item::*;
pub use ledger::*;
pub use store::*;
pub use traits::*;
