//! pdf-qa: ask questions about an uploaded PDF
//!
//! Upload a PDF, extract its text, and get answers drawn from that text by a
//! pretrained extractive question-answering model. Questions the model cannot
//! answer confidently fall back to a small table of canned replies.

pub mod chat;
pub mod config;
pub mod error;
pub mod extraction;
pub mod qa;
pub mod server;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use types::{
    answer::{AnswerOutcome, CandidateAnswer},
    chat::ChatTurn,
    document::DocumentContext,
};
