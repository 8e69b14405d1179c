// file: src/inference/mod.rs
// description: completion backend, prompt formatting and chat session state
// reference: internal module structure

pub mod backend;
pub mod prompt;
pub mod session;
pub mod transcript;

pub use backend::{CompletionBackend, CompletionParams, LlamaServerClient};
pub use prompt::{ChatExchange, format_prompt};
pub use session::{ChatReply, ChatSession};
pub use transcript::{render_transcript, transcript_file_name};
