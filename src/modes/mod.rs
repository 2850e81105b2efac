pub mod human;
pub mod login;

pub use human::HumanMode;
pub use login::LoginMode;
