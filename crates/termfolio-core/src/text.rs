use serde::{Deserialize, Serialize};

/// Semantic styling carried by a run of output text. Renderers decide what
/// each kind looks like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "href")]
pub enum Emphasis {
    Plain,
    Highlight,
    Accent,
    Success,
    Warning,
    Error,
    Link(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub emphasis: Emphasis,
}

/// Output text as an ordered list of emphasis segments. Newlines live inside
/// segment text; use [`RichText::lines`] to get line-oriented runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText {
    segments: Vec<Segment>,
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain_text(text: impl Into<String>) -> Self {
        Self::new().plain(text)
    }

    pub fn error_text(text: impl Into<String>) -> Self {
        Self::new().error(text)
    }

    pub fn success_text(text: impl Into<String>) -> Self {
        Self::new().success(text)
    }

    pub fn push(&mut self, text: impl Into<String>, emphasis: Emphasis) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.segments.last_mut()
            && last.emphasis == emphasis
        {
            last.text.push_str(&text);
            return;
        }
        self.segments.push(Segment { text, emphasis });
    }

    pub fn styled(mut self, text: impl Into<String>, emphasis: Emphasis) -> Self {
        self.push(text, emphasis);
        self
    }

    pub fn plain(self, text: impl Into<String>) -> Self {
        self.styled(text, Emphasis::Plain)
    }

    pub fn highlight(self, text: impl Into<String>) -> Self {
        self.styled(text, Emphasis::Highlight)
    }

    pub fn accent(self, text: impl Into<String>) -> Self {
        self.styled(text, Emphasis::Accent)
    }

    pub fn success(self, text: impl Into<String>) -> Self {
        self.styled(text, Emphasis::Success)
    }

    pub fn warning(self, text: impl Into<String>) -> Self {
        self.styled(text, Emphasis::Warning)
    }

    pub fn error(self, text: impl Into<String>) -> Self {
        self.styled(text, Emphasis::Error)
    }

    pub fn link(self, text: impl Into<String>, href: impl Into<String>) -> Self {
        self.styled(text, Emphasis::Link(href.into()))
    }

    pub fn newline(self) -> Self {
        self.plain("\n")
    }

    /// Appends all segments of `other`.
    pub fn append(&mut self, other: RichText) {
        for segment in other.segments {
            self.push(segment.text, segment.emphasis);
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True when any segment carries the given emphasis.
    pub fn has_emphasis(&self, emphasis: &Emphasis) -> bool {
        self.segments.iter().any(|s| &s.emphasis == emphasis)
    }

    pub fn to_plain_string(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Splits the text on newlines, keeping each run's emphasis. An empty
    /// text yields a single empty line.
    pub fn lines(&self) -> Vec<Vec<Segment>> {
        let mut lines = vec![Vec::new()];
        for segment in &self.segments {
            let mut pieces = segment.text.split('\n');
            if let Some(first) = pieces.next()
                && !first.is_empty()
                && let Some(current) = lines.last_mut()
            {
                current.push(Segment {
                    text: first.to_string(),
                    emphasis: segment.emphasis.clone(),
                });
            }
            for piece in pieces {
                let mut line = Vec::new();
                if !piece.is_empty() {
                    line.push(Segment {
                        text: piece.to_string(),
                        emphasis: segment.emphasis.clone(),
                    });
                }
                lines.push(line);
            }
        }
        lines
    }
}

impl From<&str> for RichText {
    fn from(value: &str) -> Self {
        Self::plain_text(value)
    }
}
