//! Tag events and attributes produced by the markup tokenizer.

use au_span::Span;
use smol_str::SmolStr;
use std::fmt;

/// Whether a tag event is an opening or a closing occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TagKind {
    /// `<name ...>` or `<name ... />`
    Open,
    /// `</name>`
    Close,
}

/// A single open or close occurrence of a markup element.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagEvent {
    /// Open or close.
    pub kind: TagKind,
    /// The tag name, lower-cased.
    pub name: SmolStr,
    /// Attributes in source order. Always empty for close events.
    pub attributes: Vec<Attribute>,
    /// Span from `<` to just past `>`.
    pub span: Span,
    /// `<name ... />`
    pub self_closing: bool,
}

impl TagEvent {
    /// Create an open tag event.
    pub fn open(name: impl Into<SmolStr>, attributes: Vec<Attribute>, span: Span) -> Self {
        Self {
            kind: TagKind::Open,
            name: name.into(),
            attributes,
            span,
            self_closing: false,
        }
    }

    /// Create a close tag event.
    pub fn close(name: impl Into<SmolStr>, span: Span) -> Self {
        Self {
            kind: TagKind::Close,
            name: name.into(),
            attributes: Vec::new(),
            span,
            self_closing: false,
        }
    }

    /// Check if this is an opening occurrence.
    pub fn is_open(&self) -> bool {
        self.kind == TagKind::Open
    }

    /// Offset where the tag starts (`<`).
    pub fn start_offset(&self) -> u32 {
        self.span.start
    }

    /// Offset just past the closing `>`.
    pub fn end_offset(&self) -> u32 {
        self.span.end
    }

    /// Find an attribute by its raw name (case-insensitive).
    pub fn attribute(&self, raw_name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|a| a.raw_name.eq_ignore_ascii_case(raw_name))
    }

    /// Get an attribute value by raw name.
    pub fn attribute_value(&self, raw_name: &str) -> Option<&str> {
        self.attribute(raw_name).and_then(|a| a.value.as_deref())
    }

    /// Iterate over attributes that carry a binding command.
    pub fn binding_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|a| a.is_binding())
    }
}

/// An attribute on an open tag.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    /// The attribute name exactly as written (`value.bind`).
    pub raw_name: SmolStr,
    /// The target property (`value` for `value.bind`). Equal to `raw_name`
    /// for plain attributes.
    pub name: SmolStr,
    /// The binding command, if the name encodes one.
    pub binding: Option<BindingType>,
    /// The attribute value (None for boolean attributes).
    pub value: Option<String>,
    /// The span of the whole attribute.
    pub span: Span,
    /// The span of the attribute name.
    pub name_span: Span,
    /// The span of the value, excluding quotes.
    pub value_span: Option<Span>,
}

impl Attribute {
    /// Create an attribute, classifying a binding command in its name.
    pub fn new(
        raw_name: impl Into<SmolStr>,
        value: Option<String>,
        span: Span,
        name_span: Span,
        value_span: Option<Span>,
    ) -> Self {
        let raw_name = raw_name.into();
        let (name, binding) = match split_binding_name(&raw_name) {
            Some((target, command)) => (SmolStr::from(target), Some(BindingType::parse(command))),
            None => (raw_name.clone(), None),
        };
        Self {
            raw_name,
            name,
            binding,
            value,
            span,
            name_span,
            value_span,
        }
    }

    /// Check if this attribute is a binding attribute.
    pub fn is_binding(&self) -> bool {
        self.binding.is_some()
    }

    /// The value, or the empty string for boolean attributes.
    pub fn value_or_empty(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

/// Split `target.command` into its parts. Names with no dot, several dots,
/// or an empty side are plain attributes.
fn split_binding_name(raw: &str) -> Option<(&str, &str)> {
    let (target, command) = raw.split_once('.')?;
    if target.is_empty() || command.is_empty() || command.contains('.') {
        return None;
    }
    Some((target, command))
}

/// The binding command of a binding attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BindingType {
    Bind,
    OneWay,
    TwoWay,
    OneTime,
    ToView,
    FromView,
    Trigger,
    Delegate,
    Capture,
    Call,
    /// `repeat.for`
    For,
    /// `view-model.ref`
    Ref,
    /// Any other command, kept verbatim.
    Other(SmolStr),
}

impl BindingType {
    /// Classify a command name. Unknown commands become [`BindingType::Other`].
    pub fn parse(command: &str) -> Self {
        match command {
            "bind" => Self::Bind,
            "one-way" => Self::OneWay,
            "two-way" => Self::TwoWay,
            "one-time" => Self::OneTime,
            "to-view" => Self::ToView,
            "from-view" => Self::FromView,
            "trigger" => Self::Trigger,
            "delegate" => Self::Delegate,
            "capture" => Self::Capture,
            "call" => Self::Call,
            "for" => Self::For,
            "ref" => Self::Ref,
            other => Self::Other(other.into()),
        }
    }

    /// Get the command as written in markup.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bind => "bind",
            Self::OneWay => "one-way",
            Self::TwoWay => "two-way",
            Self::OneTime => "one-time",
            Self::ToView => "to-view",
            Self::FromView => "from-view",
            Self::Trigger => "trigger",
            Self::Delegate => "delegate",
            Self::Capture => "capture",
            Self::Call => "call",
            Self::For => "for",
            Self::Ref => "ref",
            Self::Other(s) => s.as_str(),
        }
    }

    /// Check if this is an event command (`trigger`, `delegate`, `capture`).
    pub fn is_event(&self) -> bool {
        matches!(self, Self::Trigger | Self::Delegate | Self::Capture)
    }
}

impl fmt::Display for BindingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(raw: &str) -> Attribute {
        Attribute::new(raw, Some("x".into()), Span::default(), Span::default(), None)
    }

    #[test]
    fn test_binding_classification() {
        let a = attr("value.two-way");
        assert_eq!(a.name.as_str(), "value");
        assert_eq!(a.binding, Some(BindingType::TwoWay));

        let a = attr("repeat.for");
        assert_eq!(a.binding, Some(BindingType::For));

        let a = attr("click.custom");
        assert_eq!(a.binding, Some(BindingType::Other("custom".into())));
    }

    #[test]
    fn test_plain_attributes() {
        assert!(!attr("class").is_binding());
        assert!(!attr(".bind").is_binding());
        assert!(!attr("value.").is_binding());
        assert!(!attr("a.b.c").is_binding());
    }

    #[test]
    fn test_attribute_lookup_is_case_insensitive() {
        let tag = TagEvent::open("import", vec![attr("FROM")], Span::new(0, 10));
        assert_eq!(tag.attribute_value("from"), Some("x"));
        assert!(tag.attribute("as").is_none());
    }
}
