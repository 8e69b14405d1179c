// file: src/inference/transcript.rs
// description: markdown rendering of saved chat history
// reference: https://docs.rs/chrono

use crate::inference::prompt::ChatExchange;
use chrono::{DateTime, TimeZone};

pub const TRANSCRIPT_TITLE: &str = "# AI Research Assistant Chat History";

pub fn render_transcript(history: &[ChatExchange]) -> String {
    let mut out = format!("{}\n\n", TRANSCRIPT_TITLE);

    for (i, exchange) in history.iter().enumerate() {
        out.push_str(&format!(
            "## Exchange {}\n\n**User:** {}\n\n**Assistant:** {}\n\n---\n\n",
            i + 1,
            exchange.user,
            exchange.assistant
        ));
    }

    out
}

pub fn transcript_file_name<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("chat_history_{}.txt", at.format("%Y%m%d_%H%M%S"))
}
