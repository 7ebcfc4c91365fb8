use crate::signal::Debounce;
use crate::InputConfig;

/// Media URL text field. Keystrokes only commit after a quiet period, or
/// straight away when the user confirms with Enter.
#[derive(Debug, Clone)]
pub struct UrlInput {
    text: String,
    pending: Debounce<String>,
}

impl UrlInput {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            text: String::new(),
            pending: Debounce::new(config.url_debounce_ms),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn edit(&mut self, text: impl Into<String>, now_ms: u64) {
        self.text = text.into();
        self.pending.push(self.text.clone(), now_ms);
    }

    /// Enter pressed. Releases the pending edit early; with nothing pending
    /// there is nothing to commit.
    pub fn confirm(&mut self) -> Option<String> {
        self.pending.confirm().and_then(Self::non_empty)
    }

    pub fn poll(&mut self, now_ms: u64) -> Option<String> {
        self.pending.poll(now_ms).and_then(Self::non_empty)
    }

    fn non_empty(text: String) -> Option<String> {
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> UrlInput {
        UrlInput::new(&InputConfig::default())
    }

    #[test]
    fn commits_after_a_quiet_second() {
        let mut input = input();
        input.edit("https://exa", 0);
        input.edit("https://example.com/v.mp4", 400);
        assert_eq!(input.poll(1_000), None);
        assert_eq!(
            input.poll(1_400).as_deref(),
            Some("https://example.com/v.mp4")
        );
        assert_eq!(input.poll(5_000), None);
    }

    #[test]
    fn enter_wins_the_race() {
        let mut input = input();
        input.edit(" clip.webm ", 0);
        assert_eq!(input.confirm().as_deref(), Some("clip.webm"));
        assert_eq!(input.poll(2_000), None);
    }

    #[test]
    fn enter_without_an_edit_commits_nothing() {
        let mut input = input();
        assert_eq!(input.confirm(), None);

        input.edit("clip.webm", 0);
        assert_eq!(input.poll(1_000).as_deref(), Some("clip.webm"));
        assert_eq!(input.confirm(), None);
        assert_eq!(input.text(), "clip.webm");
    }

    #[test]
    fn blank_text_never_commits() {
        let mut input = input();
        input.edit("   ", 0);
        assert_eq!(input.poll(1_000), None);
        assert_eq!(input.confirm(), None);
    }
}
