use std::path::PathBuf;

use serde::Serialize;

pub const SUMMARY_SYSTEM_PROMPT: &str = "You summarise transcripts about food, nutrition and cooking. \
Reply with a short paragraph followed by a bullet list of the key takeaways.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptRecord {
    pub path: PathBuf,
    pub text: String,
    pub translated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRecord {
    pub path: PathBuf,
    pub summary: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeechRecord {
    pub path: PathBuf,
    pub voice: String,
    pub model: String,
}

pub fn render_summary_markdown(summary: &str) -> String {
    format!("# Summary\n\n{}\n", summary.trim())
}
