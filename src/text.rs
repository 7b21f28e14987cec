/// Inline style flags. Flags are independent, so a run can be bold,
/// italic and struck through at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub code: bool,
    pub link: bool,
    pub image: bool,
}

impl Style {
    pub fn is_plain(&self) -> bool {
        *self == Style::default()
    }
}

/// A run of literal text sharing one set of style flags.
///
/// Links and images also carry the bracketed description and the
/// parenthesized target; their `value` is the description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segment {
    pub value: String,
    pub style: Style,
    pub description: Option<String>,
    pub target: Option<String>,
}

impl Segment {
    pub fn new(value: impl Into<String>, style: Style) -> Self {
        Self {
            value: value.into(),
            style,
            description: None,
            target: None,
        }
    }
}

/// One logical span of inline content, in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextNode {
    pub segments: Vec<Segment>,
}

impl TextNode {
    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// Concatenation of all segment values, styles dropped.
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.value.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a TextNode {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
