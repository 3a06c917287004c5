use serde::Serialize;

/// Counts shown next to the recognized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct TextStats {
    /// Unicode scalar values in the raw text, whitespace included.
    pub characters: usize,
    /// `'\n'` occurrences plus one. An empty string still counts one line.
    pub lines: usize,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        Self {
            characters: text.chars().count(),
            lines: text.matches('\n').count() + 1,
        }
    }
}

/// Engine output for one capture, kept exactly as returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionResult {
    pub text: String,
    pub stats: TextStats,
}

impl RecognitionResult {
    pub fn new(text: String) -> Self {
        let stats = TextStats::of(&text);
        Self { text, stats }
    }

    /// False when the text is empty once surrounding whitespace is ignored.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}
