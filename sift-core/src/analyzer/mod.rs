//! Text analysis.
//!
//! The engine treats tokenization as an external collaborator with a tiny
//! surface: split raw text into whitespace-delimited words. Validation and
//! stop-word filtering live with the index, not here.

pub mod tokenizer;

pub use tokenizer::split_words;
