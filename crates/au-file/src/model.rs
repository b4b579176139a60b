//! The structured model of one template file.

use au_expression::{Expression, ExpressionError};
use au_markup::{BindingType, TagEvent};
use au_span::Span;
use smol_str::SmolStr;
use std::path::{Path, PathBuf};

/// Everything extracted from one template file.
///
/// Built fresh by [`crate::FileModelBuilder::build`] and returned by value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileModel {
    /// Path the model was built for.
    pub file_name: PathBuf,
    /// Markup and behavior code live in one `.au` file.
    pub is_single_file_component: bool,
    /// Names from the `bindable` attribute of the `template` element.
    pub template_bindable_names: Vec<String>,
    /// `import` and `require` tags, in document order.
    pub imports: Vec<Import>,
    /// Embedded and companion code blocks.
    pub script_blocks: Vec<ScriptBlock>,
    /// Binding attributes, in document and attribute order.
    pub binding_commands: Vec<BindingCommand>,
    /// `${...}` occurrences, left to right.
    pub string_interpolations: Vec<StringInterpolation>,
    /// Binding and interpolation expressions that failed to parse.
    pub expression_errors: Vec<ExpressionFailure>,
}

impl FileModel {
    /// Create an empty model for `file_name`.
    pub fn new(file_name: impl Into<PathBuf>) -> Self {
        let file_name = file_name.into();
        let is_single_file_component = is_single_file_component(&file_name);
        Self {
            file_name,
            is_single_file_component,
            template_bindable_names: Vec::new(),
            imports: Vec::new(),
            script_blocks: Vec::new(),
            binding_commands: Vec::new(),
            string_interpolations: Vec::new(),
            expression_errors: Vec::new(),
        }
    }

    /// TypeScript blocks, companion block first when present.
    pub fn typescript_blocks(&self) -> impl Iterator<Item = &ScriptBlock> {
        self.script_blocks
            .iter()
            .filter(|block| block.lang == ScriptLang::TypeScript)
    }

    pub fn javascript_blocks(&self) -> impl Iterator<Item = &ScriptBlock> {
        self.script_blocks
            .iter()
            .filter(|block| block.lang == ScriptLang::JavaScript)
    }

    /// The companion block, if the behavior lives in a separate file.
    pub fn companion_block(&self) -> Option<&ScriptBlock> {
        self.script_blocks
            .iter()
            .find(|block| matches!(block.origin, ScriptOrigin::Companion(_)))
    }
}

/// `.au` files carry their own behavior code.
pub fn is_single_file_component(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "au")
}

/// `app.html` -> `app.ts`
pub fn companion_path(path: &Path) -> PathBuf {
    path.with_extension("ts")
}

/// An `import` or `require` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Import {
    /// The `from` attribute.
    pub from: String,
    /// The `as` attribute.
    pub as_name: Option<String>,
}

/// Language of a script block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScriptLang {
    TypeScript,
    JavaScript,
}

impl ScriptLang {
    /// Classify the `type` attribute of a `script` tag.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "application/typescript" | "text/typescript" => Some(Self::TypeScript),
            "application/javascript" | "text/javascript" => Some(Self::JavaScript),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::JavaScript => "javascript",
        }
    }
}

/// Where a script block's code came from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScriptOrigin {
    /// An inline `<script>` element. `close` stays `None` until the
    /// matching close tag is seen.
    Inline {
        open: TagEvent,
        close: Option<TagEvent>,
    },
    /// The companion `.ts` file of a `.html` template.
    Companion(PathBuf),
}

/// A block of behavior code.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScriptBlock {
    pub lang: ScriptLang,
    pub origin: ScriptOrigin,
    /// The code between the script tags, or the companion file content.
    pub code: String,
    /// The first declared class, for inline TypeScript blocks.
    pub class_name: Option<String>,
}

impl ScriptBlock {
    /// An inline block waiting for its close tag.
    pub fn inline(lang: ScriptLang, open: TagEvent) -> Self {
        Self {
            lang,
            origin: ScriptOrigin::Inline { open, close: None },
            code: String::new(),
            class_name: None,
        }
    }

    /// A TypeScript block read from a companion file.
    pub fn companion(path: PathBuf, code: String) -> Self {
        Self {
            lang: ScriptLang::TypeScript,
            origin: ScriptOrigin::Companion(path),
            code,
            class_name: None,
        }
    }

    /// The opening `<script>` tag of an inline block.
    pub fn open_tag(&self) -> Option<&TagEvent> {
        match &self.origin {
            ScriptOrigin::Inline { open, .. } => Some(open),
            ScriptOrigin::Companion(_) => None,
        }
    }

    /// The closing `</script>` tag of an inline block, once matched.
    pub fn close_tag(&self) -> Option<&TagEvent> {
        match &self.origin {
            ScriptOrigin::Inline { close, .. } => close.as_ref(),
            ScriptOrigin::Companion(_) => None,
        }
    }

    /// Companion blocks are complete on creation.
    pub fn is_closed(&self) -> bool {
        match &self.origin {
            ScriptOrigin::Inline { close, .. } => close.is_some(),
            ScriptOrigin::Companion(_) => true,
        }
    }
}

/// A binding attribute such as `value.bind="firstName"`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BindingCommand {
    /// The attribute name as written (`value.bind`).
    pub name: SmolStr,
    /// The target property (`value`).
    pub target: SmolStr,
    pub binding_type: BindingType,
    /// Parsed attribute value. Spans are relative to `raw_value`.
    pub expression: Expression,
    /// The attribute value as written.
    pub raw_value: String,
    /// Span of the whole attribute in the file.
    pub span: Span,
}

/// A `${...}` occurrence in the raw text.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StringInterpolation {
    /// The full match, including `${` and `}`.
    pub raw_match: String,
    /// Parsed inner expression. Spans are relative to the inner text.
    pub expression: Expression,
    /// Span of `raw_match` in the file.
    pub span: Span,
}

/// An expression that was skipped because it did not parse.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpressionFailure {
    /// The expression text.
    pub text: String,
    /// Span of `text` in the file.
    pub span: Span,
    pub error: ExpressionError,
}

impl ExpressionFailure {
    /// Span of the error in the file.
    pub fn error_span(&self) -> Span {
        self.error.span.offset_by(self.span.start)
    }
}
