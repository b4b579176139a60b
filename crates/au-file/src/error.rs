//! Errors that abort a file-model build.

use au_markup::MarkupError;
use au_span::Span;
use smol_str::SmolStr;
use std::io;
use std::path::PathBuf;

/// Result type for building a file model.
pub type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A tag is missing an attribute it cannot do without (`from` on
    /// `import`/`require`).
    #[error("<{tag}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        tag: SmolStr,
        attribute: &'static str,
        span: Span,
    },

    #[error("failed to read companion file {}", path.display())]
    Companion {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read template {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to tokenize markup: {0}")]
    Markup(#[from] MarkupError),
}

impl BuildError {
    /// Location in the template, when the error has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::MissingAttribute { span, .. } => Some(*span),
            Self::Markup(err) => Some(err.span),
            Self::Companion { .. } | Self::Read { .. } => None,
        }
    }
}
