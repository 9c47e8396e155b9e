//! Location input field.

/// One editable text field plus the callback that receives each submission.
pub struct SearchBar<F>
where
    F: FnMut(String),
{
    text: String,
    on_submit: F,
}

impl<F> SearchBar<F>
where
    F: FnMut(String),
{
    pub fn new(on_submit: F) -> Self {
        Self { text: String::new(), on_submit }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn push(&mut self, ch: char) {
        self.text.push(ch);
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Hands the field value to the callback exactly as typed. The field keeps
    /// its contents afterwards.
    pub fn submit(&mut self) {
        (self.on_submit)(self.text.clone());
    }
}

impl<F> std::fmt::Debug for SearchBar<F>
where
    F: FnMut(String),
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchBar").field("text", &self.text).finish_non_exhaustive()
    }
}
