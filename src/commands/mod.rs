//! Command implementations
//!
//! `interactive` owns the session lifecycle, `menu` the dialogue itself.

pub mod interactive;
pub mod menu;

pub use interactive::run as interactive_run;
pub use menu::{Menu, Screen};
