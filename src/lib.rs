pub use duet_tui::cli;
pub use duet_tui::commands;
pub use duet_tui::config;
pub use duet_tui::tui;
pub use duet_tui::AppConfig;

pub use duet_core as core;
pub use duet_core::countdown;
pub use duet_core::manager;
pub use duet_core::model;
pub use duet_core::store;
