// file: src/tokenizer/mod.rs
// description: token counting used to size the training corpus
// reference: https://docs.rs/tokenizers

mod counter;

pub use counter::{HfTokenizer, TokenCounter, WhitespaceCounter, estimate_tokens};
