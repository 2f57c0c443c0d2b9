//! Core types for the PDF Q&A server

pub mod answer;
pub mod chat;
pub mod document;

pub use answer::{AnswerOutcome, CandidateAnswer};
pub use chat::ChatTurn;
pub use document::{DocumentContext, SharedDocument};
