//! `eggman-desktop`
//!
//! **Responsibility:** terminal front-end for the equipment inventory.
//!
//! The console plays the part of the rendering layer: it draws the counters,
//! the filtered list and the form, forwards user commands to the
//! [`InventoryStore`](eggman_inventory::InventoryStore) and redraws when the
//! store reports a change.

pub mod command;
pub mod config;
pub mod render;
pub mod shell;

pub use command::{Command, ParseCommandError};
pub use config::AppConfig;
pub use shell::{Shell, Terminal};
