//! Email login and the user/score table behind it.

pub mod email;
pub mod login;
pub mod store;

pub use email::{Email, InvalidEmail};
pub use login::{LoginError, login};
pub use store::{JsonFileStore, MemoryStore, ScoreStore, StoreError, UserRecord};
