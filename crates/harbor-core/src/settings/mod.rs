pub mod layout;
pub mod repository;

pub use layout::{LastSelection, LayoutChange, LayoutKey, PanelLayout};
pub use repository::SettingsStore;
