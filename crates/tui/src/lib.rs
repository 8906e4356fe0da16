pub mod cli;
pub mod commands;
pub mod config;
pub mod tui;

pub use duet_core as core;
pub use duet_core::countdown;
pub use duet_core::manager;
pub use duet_core::model;
pub use duet_core::store;

pub use duet_core::AppConfig;
