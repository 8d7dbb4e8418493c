//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: `Session`, `SessionStatus` and the placeholder id format
//! - `repository`: `SessionSource` trait for reading recorded sessions

mod model;
mod repository;

pub use model::{
    PLACEHOLDER_PREFIX, Session, SessionStatus, is_placeholder_id, new_placeholder_id,
    truncate_preview,
};
pub use repository::SessionSource;
