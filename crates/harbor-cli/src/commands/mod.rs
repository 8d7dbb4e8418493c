pub mod layout;
pub mod projects;
pub mod sessions;
