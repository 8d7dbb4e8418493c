mod book;
mod mount;

pub use book::SessionBook;
pub use mount::{
    ConversationMount, ReconcileOutcome, RenderKey, SessionHandle, ViewEvent, ViewNotifier,
};
