#![allow(clippy::missing_docs_in_private_items)]

pub mod answer;
pub mod greeting;
pub mod sanitize;

pub use answer::{answer_question, answer_question_with_context, MAX_DOCUMENT_CHARS};
