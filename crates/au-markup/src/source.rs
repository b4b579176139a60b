//! The tag-stream seam consumed by the file-model builder and the validator.

use crate::ast::TagEvent;
use crate::error::MarkupResult;
use async_trait::async_trait;

/// Produces the ordered tag-event sequence for a document.
///
/// Obtaining the stream may suspend (an out-of-process tokenizer, a
/// language-server round trip), so the call is async.
#[async_trait]
pub trait TagSource: Send + Sync {
    /// Tokenize `text` into tag events in document order.
    async fn tokenize(&self, text: &str) -> MarkupResult<Vec<TagEvent>>;

    /// Tokenize `text` and keep only element occurrences (open tags), which
    /// is the structural view the validator iterates.
    async fn elements(&self, text: &str) -> MarkupResult<Vec<TagEvent>> {
        let mut events = self.tokenize(text).await?;
        events.retain(TagEvent::is_open);
        Ok(events)
    }
}

/// The built-in [`TagSource`], backed by [`crate::tokenize`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlTagSource;

#[async_trait]
impl TagSource for HtmlTagSource {
    async fn tokenize(&self, text: &str) -> MarkupResult<Vec<TagEvent>> {
        let events = crate::tokenizer::tokenize(text)?;
        tracing::trace!(count = events.len(), "tokenized markup");
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_elements_drops_close_events() {
        let elements = HtmlTagSource
            .elements("<div><span></span></div>")
            .await
            .unwrap();
        let names: Vec<_> = elements.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["div", "span"]);
    }
}
