//! File model builder for Aurelia templates.
//!
//! [`FileModelBuilder`] consumes the tag-event stream of a template and
//! assembles a [`FileModel`]: bindable names, imports, script blocks
//! (inline or from the companion `.ts` file), binding commands and
//! `${...}` interpolations.
//!
//! ```no_run
//! # async fn run() -> au_file::BuildResult<()> {
//! let model = au_file::parse_file("src/app.html").await?;
//! for import in &model.imports {
//!     println!("{}", import.from);
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod error;
pub mod interpolation;
pub mod model;
pub mod reader;
pub mod script;

pub use builder::FileModelBuilder;
pub use error::{BuildError, BuildResult};
pub use model::*;
pub use reader::{CompanionReader, FsCompanionReader};
pub use script::extract_class_name;

use std::path::Path;

/// Read a template from disk and build its model with the default
/// tokenizer, expression parser and companion reader.
pub async fn parse_file(path: impl AsRef<Path>) -> BuildResult<FileModel> {
    let path = path.as_ref();
    let raw_text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| BuildError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    FileModelBuilder::default().build(path, &raw_text).await
}
