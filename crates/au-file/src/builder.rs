//! Assembles a [`FileModel`] from a template's tag-event stream.

use crate::error::{BuildError, BuildResult};
use crate::interpolation::find_interpolations;
use crate::model::*;
use crate::reader::{CompanionReader, FsCompanionReader};
use crate::script::extract_class_name;
use au_expression::{
    BindingExpressionParser, Expression, ExpressionError, ExpressionKind, ExpressionParser,
};
use au_markup::{Attribute, BindingType, HtmlTagSource, TagEvent, TagKind, TagSource};
use au_span::Span;
use std::path::Path;

/// Builds file models. Holds only shared collaborators, so one builder can
/// serve any number of `build` calls.
pub struct FileModelBuilder {
    tags: Box<dyn TagSource>,
    expressions: Box<dyn ExpressionParser>,
    companions: Box<dyn CompanionReader>,
}

impl Default for FileModelBuilder {
    fn default() -> Self {
        Self::new(HtmlTagSource, BindingExpressionParser, FsCompanionReader)
    }
}

impl FileModelBuilder {
    /// Create a builder from its collaborators.
    pub fn new(
        tags: impl TagSource + 'static,
        expressions: impl ExpressionParser + 'static,
        companions: impl CompanionReader + 'static,
    ) -> Self {
        Self {
            tags: Box::new(tags),
            expressions: Box::new(expressions),
            companions: Box::new(companions),
        }
    }

    /// Build the model for `path` whose content is `raw_text`.
    ///
    /// For `.html` templates the companion `.ts` file is read as well.
    /// Expressions that fail to parse are recorded in
    /// [`FileModel::expression_errors`] and otherwise skipped.
    pub async fn build(&self, path: impl AsRef<Path>, raw_text: &str) -> BuildResult<FileModel> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "building file model");

        let events = self.tags.tokenize(raw_text).await?;
        let mut model = FileModel::new(path);

        if !model.is_single_file_component {
            let companion = companion_path(path);
            let code = self
                .companions
                .read(&companion)
                .await
                .map_err(|source| BuildError::Companion {
                    path: companion.clone(),
                    source,
                })?;
            model
                .script_blocks
                .push(ScriptBlock::companion(companion, code));
        }

        // One entry per open `<script>` still waiting for its close tag;
        // `None` for scripts of a type that yields no block.
        let mut pending: Vec<Option<usize>> = Vec::new();

        for event in &events {
            match (event.kind, event.name.as_str()) {
                (TagKind::Open, "template") => {
                    model.template_bindable_names = bindable_names(event);
                }
                (TagKind::Open, "import" | "require") => {
                    model.imports.push(import(event)?);
                }
                (TagKind::Open, "script") => {
                    let slot = event
                        .attribute_value("type")
                        .and_then(ScriptLang::from_mime)
                        .map(|lang| {
                            model
                                .script_blocks
                                .push(ScriptBlock::inline(lang, event.clone()));
                            model.script_blocks.len() - 1
                        });
                    if !event.self_closing {
                        pending.push(slot);
                    }
                }
                (TagKind::Open, "style") => {}
                (TagKind::Open, _) => self.collect_bindings(event, &mut model),
                (TagKind::Close, "script") => {
                    if let Some(Some(index)) = pending.pop() {
                        close_script(&mut model.script_blocks[index], event, raw_text);
                    }
                }
                (TagKind::Close, _) => {}
            }
        }

        self.collect_interpolations(raw_text, &mut model);

        tracing::debug!(
            imports = model.imports.len(),
            scripts = model.script_blocks.len(),
            bindings = model.binding_commands.len(),
            interpolations = model.string_interpolations.len(),
            skipped = model.expression_errors.len(),
            "built file model"
        );
        Ok(model)
    }

    fn collect_bindings(&self, event: &TagEvent, model: &mut FileModel) {
        for attribute in event.binding_attributes() {
            let Some(binding_type) = &attribute.binding else {
                continue;
            };
            let raw_value = attribute.value_or_empty();
            let value_span = attribute.value_span.unwrap_or(attribute.span);

            match self.parse_binding(attribute, binding_type, raw_value) {
                Ok(expression) => model.binding_commands.push(BindingCommand {
                    name: attribute.raw_name.clone(),
                    target: attribute.name.clone(),
                    binding_type: binding_type.clone(),
                    expression,
                    raw_value: raw_value.to_string(),
                    span: attribute.span,
                }),
                Err(error) => record_failure(model, raw_value, value_span, error),
            }
        }
    }

    fn parse_binding(
        &self,
        attribute: &Attribute,
        binding_type: &BindingType,
        raw_value: &str,
    ) -> Result<Expression, ExpressionError> {
        if *binding_type == BindingType::For {
            return self.expressions.parse_iteration(raw_value);
        }
        // `value.bind` with no value binds to the property of the same name.
        if raw_value.trim().is_empty() && !binding_type.is_event() {
            return Ok(Expression::new(
                ExpressionKind::AccessScope {
                    name: attribute.name.clone(),
                    ancestor: 0,
                },
                Span::empty(0),
            ));
        }
        self.expressions.parse(raw_value)
    }

    fn collect_interpolations(&self, raw_text: &str, model: &mut FileModel) {
        for found in find_interpolations(raw_text) {
            if !found.closed {
                let error = ExpressionError::unexpected_end(
                    "'}'",
                    Span::empty(found.inner_span.len()),
                );
                record_failure(model, found.inner, found.inner_span, error);
                continue;
            }
            match self.expressions.parse(found.inner) {
                Ok(expression) => model.string_interpolations.push(StringInterpolation {
                    raw_match: found.raw.to_string(),
                    expression,
                    span: found.span,
                }),
                Err(error) => record_failure(model, found.inner, found.inner_span, error),
            }
        }
    }
}

/// `bindable="first, last"` -> `["first", "last"]`
fn bindable_names(event: &TagEvent) -> Vec<String> {
    match event.attribute_value("bindable") {
        Some(value) if !value.trim().is_empty() => value
            .split(',')
            .map(|name| name.trim().to_string())
            .collect(),
        _ => Vec::new(),
    }
}

fn import(event: &TagEvent) -> BuildResult<Import> {
    let from = event
        .attribute_value("from")
        .ok_or_else(|| BuildError::MissingAttribute {
            tag: event.name.clone(),
            attribute: "from",
            span: event.span,
        })?;
    Ok(Import {
        from: from.to_string(),
        as_name: event.attribute_value("as").map(str::to_string),
    })
}

/// Attach the close tag and extract the code between the tags.
fn close_script(block: &mut ScriptBlock, close_event: &TagEvent, raw_text: &str) {
    let ScriptOrigin::Inline { open, close } = &mut block.origin else {
        return;
    };
    if close.is_some() {
        return;
    }
    let code = Span::new(open.end_offset(), close_event.start_offset())
        .slice(raw_text)
        .unwrap_or_default()
        .to_string();
    *close = Some(close_event.clone());

    if block.lang == ScriptLang::TypeScript {
        block.class_name = extract_class_name(&code);
    }
    block.code = code;
}

fn record_failure(model: &mut FileModel, text: &str, span: Span, error: ExpressionError) {
    tracing::warn!(
        file = %model.file_name.display(),
        expression = text,
        offset = span.start,
        "skipping expression: {}",
        error
    );
    model.expression_errors.push(ExpressionFailure {
        text: text.to_string(),
        span,
        error,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use au_markup::MarkupResult;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io;
    use std::path::PathBuf;

    /// Serves companion files from memory.
    #[derive(Default)]
    struct MemoryReader(HashMap<PathBuf, String>);

    impl MemoryReader {
        fn with(path: &str, code: &str) -> Self {
            let mut files = HashMap::new();
            files.insert(PathBuf::from(path), code.to_string());
            Self(files)
        }
    }

    #[async_trait]
    impl CompanionReader for MemoryReader {
        async fn read(&self, path: &Path) -> io::Result<String> {
            self.0
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such companion"))
        }
    }

    fn builder() -> FileModelBuilder {
        FileModelBuilder::new(
            HtmlTagSource,
            BindingExpressionParser,
            MemoryReader::default(),
        )
    }

    #[tokio::test]
    async fn test_imports_in_document_order() {
        let source = r#"<template>
  <require from="./a"></require>
  <import from="./b" as="bee"></import>
</template>"#;
        let model = builder().build("app.au", source).await.unwrap();
        assert_eq!(
            model.imports,
            vec![
                Import {
                    from: "./a".to_string(),
                    as_name: None,
                },
                Import {
                    from: "./b".to_string(),
                    as_name: Some("bee".to_string()),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_import_without_from_fails() {
        let err = builder()
            .build("app.au", r#"<require as="x"></require>"#)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::MissingAttribute {
                attribute: "from",
                ..
            }
        ));
        assert_eq!(err.span(), Some(Span::new(0, 16)));
    }

    #[tokio::test]
    async fn test_bindable_names_trimmed() {
        let model = builder()
            .build("app.au", r#"<template bindable="first,  last , middle"></template>"#)
            .await
            .unwrap();
        assert_eq!(model.template_bindable_names, vec!["first", "last", "middle"]);

        let model = builder()
            .build("app.au", "<template></template>")
            .await
            .unwrap();
        assert!(model.template_bindable_names.is_empty());
    }

    #[tokio::test]
    async fn test_last_template_wins() {
        let source = r#"<template bindable="a"></template><template bindable="b"></template>"#;
        let model = builder().build("app.au", source).await.unwrap();
        assert_eq!(model.template_bindable_names, vec!["b"]);
    }

    #[tokio::test]
    async fn test_inline_typescript_block() {
        let source =
            r#"<template></template><script type="application/typescript">export class Foo { }</script>"#;
        let model = builder().build("foo.au", source).await.unwrap();
        assert!(model.is_single_file_component);

        let blocks: Vec<_> = model.typescript_blocks().collect();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].code, "export class Foo { }");
        assert_eq!(blocks[0].class_name.as_deref(), Some("Foo"));
        assert!(blocks[0].is_closed());
        assert_eq!(blocks[0].open_tag().unwrap().name.as_str(), "script");
        assert_eq!(blocks[0].close_tag().unwrap().name.as_str(), "script");
    }

    #[tokio::test]
    async fn test_javascript_block_has_no_class_name() {
        let source = r#"<script type="text/javascript">class Foo {}</script>"#;
        let model = builder().build("foo.au", source).await.unwrap();
        let blocks: Vec<_> = model.javascript_blocks().collect();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].code, "class Foo {}");
        assert_eq!(blocks[0].class_name, None);
    }

    #[tokio::test]
    async fn test_unrecognised_script_does_not_steal_close() {
        let source = r#"<script type="text/template"><p></p></script>
<script type="text/typescript">class Bar {}</script>"#;
        let model = builder().build("foo.au", source).await.unwrap();
        assert_eq!(model.script_blocks.len(), 1);
        assert_eq!(model.script_blocks[0].code, "class Bar {}");
        assert_eq!(model.script_blocks[0].class_name.as_deref(), Some("Bar"));
    }

    #[tokio::test]
    async fn test_typescript_without_class() {
        let source = r#"<script type="application/typescript">export const x = 1;</script>"#;
        let model = builder().build("foo.au", source).await.unwrap();
        assert_eq!(model.script_blocks[0].class_name, None);
    }

    #[tokio::test]
    async fn test_companion_block() {
        let builder = FileModelBuilder::new(
            HtmlTagSource,
            BindingExpressionParser,
            MemoryReader::with("src/app.ts", "export class App {}"),
        );
        let model = builder
            .build("src/app.html", "<template></template>")
            .await
            .unwrap();
        assert!(!model.is_single_file_component);
        assert_eq!(model.script_blocks.len(), 1);

        let companion = model.companion_block().unwrap();
        assert_eq!(companion.lang, ScriptLang::TypeScript);
        assert_eq!(
            companion.origin,
            ScriptOrigin::Companion(PathBuf::from("src/app.ts"))
        );
        assert_eq!(companion.code, "export class App {}");
        assert_eq!(companion.class_name, None);
    }

    #[tokio::test]
    async fn test_missing_companion_fails() {
        let err = builder()
            .build("src/app.html", "<template></template>")
            .await
            .unwrap_err();
        match err {
            BuildError::Companion { path, source } => {
                assert_eq!(path, PathBuf::from("src/app.ts"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("Expected companion error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_binding_commands() {
        let source = r#"<template>
  <input value.two-way="firstName" disabled>
  <button click.delegate="save()" class="btn">Save</button>
  <li repeat.for="item of items"></li>
  <name-tag first.bind></name-tag>
</template>"#;
        let model = builder().build("form.au", source).await.unwrap();
        let summary: Vec<_> = model
            .binding_commands
            .iter()
            .map(|b| (b.name.as_str(), b.expression.to_string()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("value.two-way", "firstName".to_string()),
                ("click.delegate", "save()".to_string()),
                ("repeat.for", "item of items".to_string()),
                ("first.bind", "first".to_string()),
            ]
        );
        assert_eq!(model.binding_commands[0].binding_type, BindingType::TwoWay);
        assert_eq!(model.binding_commands[0].target.as_str(), "value");
        assert_eq!(model.binding_commands[0].raw_value, "firstName");
        assert!(matches!(
            model.binding_commands[2].expression.kind,
            ExpressionKind::ForOf { .. }
        ));
    }

    #[tokio::test]
    async fn test_malformed_expression_is_skipped() {
        let source = r#"<input value.bind="a +" title.bind="ok">"#;
        let model = builder().build("form.au", source).await.unwrap();
        assert_eq!(model.binding_commands.len(), 1);
        assert_eq!(model.binding_commands[0].raw_value, "ok");

        assert_eq!(model.expression_errors.len(), 1);
        let failure = &model.expression_errors[0];
        assert_eq!(failure.text, "a +");
        assert_eq!(failure.span, Span::new(19, 22));
    }

    #[tokio::test]
    async fn test_string_interpolations() {
        let source = "<p>${first} ${last}</p>";
        let model = builder().build("name.au", source).await.unwrap();
        let found: Vec<_> = model
            .string_interpolations
            .iter()
            .map(|i| (i.raw_match.as_str(), i.expression.to_string(), i.span))
            .collect();
        assert_eq!(
            found,
            vec![
                ("${first}", "first".to_string(), Span::new(3, 11)),
                ("${last}", "last".to_string(), Span::new(12, 19)),
            ]
        );
    }

    #[tokio::test]
    async fn test_bad_interpolation_recorded() {
        let model = builder()
            .build("name.au", "<p>${a b}</p>")
            .await
            .unwrap();
        assert!(model.string_interpolations.is_empty());
        assert_eq!(model.expression_errors.len(), 1);
        assert_eq!(model.expression_errors[0].span, Span::new(5, 8));
        assert_eq!(model.expression_errors[0].error_span(), Span::new(7, 8));
    }

    #[tokio::test]
    async fn test_interpolations_with_inner_braces() {
        let source = "<p>${ items | join:'}' }</p><p>${ {a: 1}.a }</p>";
        let model = builder().build("list.au", source).await.unwrap();
        assert!(model.expression_errors.is_empty());
        let raw: Vec<_> = model
            .string_interpolations
            .iter()
            .map(|i| i.raw_match.as_str())
            .collect();
        assert_eq!(raw, vec!["${ items | join:'}' }", "${ {a: 1}.a }"]);
    }

    #[tokio::test]
    async fn test_multiline_interpolation() {
        let model = builder()
            .build("sum.au", "<p>${ a +\n b }</p>")
            .await
            .unwrap();
        assert_eq!(model.string_interpolations.len(), 1);
        assert_eq!(model.string_interpolations[0].expression.to_string(), "(a + b)");
        assert_eq!(model.string_interpolations[0].span, Span::new(3, 14));
    }

    #[tokio::test]
    async fn test_unclosed_interpolation_recorded() {
        let model = builder()
            .build("open.au", "<p>${ a +\n b</p>")
            .await
            .unwrap();
        assert!(model.string_interpolations.is_empty());
        assert_eq!(model.expression_errors.len(), 1);
        let failure = &model.expression_errors[0];
        assert_eq!(failure.span, Span::new(5, 16));
        assert_eq!(failure.error.code, au_expression::ExprErrorCode::UnexpectedEnd);
        assert_eq!(failure.error_span(), Span::empty(16));
    }

    #[tokio::test]
    async fn test_build_is_idempotent() {
        let source = r#"<template bindable="a, b">
  <require from="./x" as="y"></require>
  <div if.bind="a" title="${b | upper}"></div>
  <script type="text/typescript">export class X {}</script>
</template>"#;
        let builder = builder();
        let first = builder.build("x.au", source).await.unwrap();
        let second = builder.build("x.au", source).await.unwrap();
        assert_eq!(first, second);
    }

    /// A tag source that yields a fixed stream.
    struct FixedTags(Vec<TagEvent>);

    #[async_trait]
    impl TagSource for FixedTags {
        async fn tokenize(&self, _text: &str) -> MarkupResult<Vec<TagEvent>> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_unmatched_script_close_is_ignored() {
        let tags = FixedTags(vec![TagEvent::close("script", Span::new(0, 9))]);
        let builder = FileModelBuilder::new(tags, BindingExpressionParser, MemoryReader::default());
        let model = builder.build("x.au", "</script>").await.unwrap();
        assert!(model.script_blocks.is_empty());
    }
}
