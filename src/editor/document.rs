/// Initial content shown before any report has been generated.
pub const PLACEHOLDER_DOCUMENT: &str = "<h1>AI Report Generator</h1>\
    <p>Enter a URL and watch magic happen! 🚀</p>\
    <blockquote>Insights await your exploration...</blockquote>";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Ordered,
}

/// A formatting command, and the state it toggles on the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Bold,
    Italic,
    Underline,
    Align(Alignment),
    List(ListKind),
}

/// The narrow surface the shell needs from a rich-text editing widget.
pub trait DocumentEditor: Send {
    fn apply_bold(&mut self);
    fn apply_italic(&mut self);
    fn apply_underline(&mut self);
    fn set_alignment(&mut self, alignment: Alignment);
    fn toggle_list(&mut self, kind: ListKind);
    fn is_active(&self, format: Format) -> bool;
    /// Serialized document content.
    fn content(&self) -> String;
    /// Replaces the whole document.
    fn set_content(&mut self, html: String);
}

/// In-process document: serialized HTML plus the selection's formatting state.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    html: String,
    bold: bool,
    italic: bool,
    underline: bool,
    alignment: Alignment,
    list: Option<ListKind>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::with_content(PLACEHOLDER_DOCUMENT)
    }

    pub fn with_content(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            bold: false,
            italic: false,
            underline: false,
            alignment: Alignment::default(),
            list: None,
        }
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentEditor for MemoryDocument {
    fn apply_bold(&mut self) {
        self.bold = !self.bold;
    }

    fn apply_italic(&mut self) {
        self.italic = !self.italic;
    }

    fn apply_underline(&mut self) {
        self.underline = !self.underline;
    }

    fn set_alignment(&mut self, alignment: Alignment) {
        self.alignment = alignment;
    }

    fn toggle_list(&mut self, kind: ListKind) {
        self.list = if self.list == Some(kind) {
            None
        } else {
            Some(kind)
        };
    }

    fn is_active(&self, format: Format) -> bool {
        match format {
            Format::Bold => self.bold,
            Format::Italic => self.italic,
            Format::Underline => self.underline,
            Format::Align(alignment) => self.alignment == alignment,
            Format::List(kind) => self.list == Some(kind),
        }
    }

    fn content(&self) -> String {
        self.html.clone()
    }

    fn set_content(&mut self, html: String) {
        // New content starts with a fresh selection.
        *self = Self::with_content(html);
    }
}
