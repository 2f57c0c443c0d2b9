//! Chat: turning questions into replies and keeping the conversation log

pub mod composer;
pub mod session;

pub use composer::{ResponseComposer, CANNED_REPLIES};
pub use session::ChatSession;
