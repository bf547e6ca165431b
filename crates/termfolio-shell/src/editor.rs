/// Mirror of the input surface's current value. Character insertion happens
/// in the renderer; the shell only ever sees whole-line replacements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditor {
    text: String,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, raw: impl Into<String>) {
        self.text = raw.into();
    }

    pub fn current_text(&self) -> &str {
        &self.text
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_whole_line() {
        let mut editor = LineEditor::new();
        editor.set_text("hel");
        editor.set_text("help me");
        assert_eq!(editor.current_text(), "help me");
        editor.set_text("");
        assert_eq!(editor.current_text(), "");
        editor.set_text("  ");
        editor.clear();
        assert_eq!(editor.current_text(), "");
    }
}
