pub mod memory;
pub mod user;

pub use memory::{MemoryUserStore, demo_user};
pub use user::{Balances, PgUserStore, StoreError, SwapOutcome, User, UserStore};
