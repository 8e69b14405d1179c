// file: src/server/mod.rs
// description: browser chat ui served over axum
// reference: https://docs.rs/axum

mod routes;

pub use routes::{ChatRequest, ChatResponse, ChatState, SaveResponse, router, serve};
