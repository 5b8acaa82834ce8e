use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::Content;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn generate_id(prefix: &str) -> String {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id}")
}

/// Input flavour for [`Tag::Input`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputKind {
    #[default]
    Text,
    Hidden,
    Email,
    Number,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Div,
    Form,
    Input(InputKind),
    Select,
    Option,
    Textarea,
    Button,
    Table,
    TableBody,
    Row,
    Cell,
    Span,
}

impl Tag {
    /// Whether elements with this tag submit a value with their form.
    pub fn is_field(&self) -> bool {
        matches!(self, Self::Input(_) | Self::Select | Self::Textarea)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    // Identity
    pub id: String,
    pub tag: Tag,

    // Content
    pub content: Content,

    // Form state
    pub name: Option<String>,
    pub value: String,
    pub disabled: bool,

    // Visual
    pub hidden: bool,
    pub classes: Vec<String>,

    // Custom data storage (record ids, serialized blobs, etc.)
    pub data: HashMap<String, String>,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            id: generate_id("el"),
            tag: Tag::Div,
            content: Content::None,
            name: None,
            value: String::new(),
            disabled: false,
            hidden: false,
            classes: Vec::new(),
            data: HashMap::new(),
        }
    }
}

impl Element {
    fn tagged(prefix: &str, tag: Tag) -> Self {
        Self {
            id: generate_id(prefix),
            tag,
            ..Default::default()
        }
    }

    pub fn div() -> Self {
        Self::tagged("div", Tag::Div)
    }

    pub fn form() -> Self {
        Self::tagged("form", Tag::Form)
    }

    /// Create a named text input.
    pub fn input(name: impl Into<String>) -> Self {
        Self::tagged("input", Tag::Input(InputKind::Text)).name(name)
    }

    /// Create a hidden input carrying a submitted value.
    pub fn hidden_input(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::tagged("hidden", Tag::Input(InputKind::Hidden))
            .name(name)
            .value(value)
    }

    pub fn select(name: impl Into<String>) -> Self {
        Self::tagged("select", Tag::Select).name(name)
    }

    /// Create a select option. The label is stored as the element's text.
    pub fn option(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            content: Content::Text(label.into()),
            ..Self::tagged("option", Tag::Option)
        }
        .value(value)
    }

    pub fn textarea(name: impl Into<String>) -> Self {
        Self::tagged("textarea", Tag::Textarea).name(name)
    }

    pub fn button(label: impl Into<String>) -> Self {
        Self {
            content: Content::Text(label.into()),
            ..Self::tagged("button", Tag::Button)
        }
    }

    pub fn table() -> Self {
        Self::tagged("table", Tag::Table)
    }

    pub fn table_body() -> Self {
        Self::tagged("tbody", Tag::TableBody)
    }

    pub fn row() -> Self {
        Self::tagged("row", Tag::Row)
    }

    pub fn cell(text: impl Into<String>) -> Self {
        Self {
            content: Content::Text(text.into()),
            ..Self::tagged("cell", Tag::Cell)
        }
    }

    pub fn span(text: impl Into<String>) -> Self {
        Self {
            content: Content::Text(text.into()),
            ..Self::tagged("span", Tag::Span)
        }
    }

    // Identity
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    // Form state
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn kind(mut self, kind: InputKind) -> Self {
        if let Tag::Input(_) = self.tag {
            self.tag = Tag::Input(kind);
        }
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    // Visual
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.add_class(class);
        self
    }

    /// Attach a data attribute.
    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    // Children
    pub fn child(mut self, child: Element) -> Self {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            _ => self.content = Content::Children(vec![child]),
        }
        self
    }

    pub fn children(mut self, children: Vec<Element>) -> Self {
        self.content = Content::Children(children);
        self
    }

    // Accessors
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn child_elements(&self) -> &[Element] {
        match &self.content {
            Content::Children(children) => children,
            _ => &[],
        }
    }

    /// Mutable access to the children list, creating it for empty elements.
    /// Returns `None` for text elements.
    pub fn child_elements_mut(&mut self) -> Option<&mut Vec<Element>> {
        if let Content::None = self.content {
            self.content = Content::Children(Vec::new());
        }
        match &mut self.content {
            Content::Children(children) => Some(children),
            _ => None,
        }
    }

    pub fn data_attr(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.insert(key.into(), value.into());
    }

    pub fn remove_data(&mut self, key: &str) -> Option<String> {
        self.data.remove(key)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !self.has_class(&class) {
            self.classes.push(class);
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Whether this element submits a value: a field tag with a name.
    pub fn is_named_field(&self) -> bool {
        self.tag.is_field() && self.name.is_some()
    }
}
