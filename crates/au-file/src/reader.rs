//! Reading companion behavior files.

use async_trait::async_trait;
use std::io;
use std::path::Path;

/// Reads the companion `.ts` file of a `.html` template.
#[async_trait]
pub trait CompanionReader: Send + Sync {
    async fn read(&self, path: &Path) -> io::Result<String>;
}

/// Reads companion files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsCompanionReader;

#[async_trait]
impl CompanionReader for FsCompanionReader {
    async fn read(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }
}
