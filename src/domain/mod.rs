mod balance;
mod entry;
mod ledger;
mod money;

pub use balance::*;
pub use entry::*;
pub use ledger::*;
pub use money::*;
