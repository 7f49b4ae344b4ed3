/// The comment being typed in the comment sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentDraft {
    text: String,
    in_flight: bool,
}

impl CommentDraft {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn edit(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Returns the trimmed content to send, or `None` if the draft is blank or a submission is already in flight.
    pub fn submit(&mut self) -> Option<String> {
        let content = self.text.trim();
        if self.in_flight || content.is_empty() {
            return None;
        }

        let content = content.to_string();
        self.in_flight = true;
        Some(content)
    }

    pub fn succeed(&mut self) {
        self.in_flight = false;
        self.text.clear();
    }

    /// Keeps the text so the user can try again.
    pub fn fail(&mut self) {
        self.in_flight = false;
    }
}
