//! Snake Arcade - terminal Snake behind an email login
//!
//! This library provides:
//! - Core game logic on a wrap-around board (game module)
//! - Email login and the user/score table (account module)
//! - Personal-best tracking for a logged-in player (session module)
//! - TUI rendering and keyboard input (render, input modules)
//! - The interactive login and play loops (modes module)

pub mod account;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod session;
