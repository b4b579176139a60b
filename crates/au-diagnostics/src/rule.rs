//! The attribute rule protocol.

use crate::{Diagnostic, DiagnosticCode, TextDocument};
use au_markup::{Attribute, TagEvent};

/// A policy checked against every attribute of every element.
///
/// Rules are stateless and shared across validation calls. `diagnostic` is
/// only called after `matches` returned true for the same arguments.
pub trait AttributeRule: Send + Sync {
    /// The code of the diagnostics this rule produces.
    fn code(&self) -> DiagnosticCode;

    /// Unique identifier for this rule.
    fn id(&self) -> &'static str {
        self.code().as_str()
    }

    /// Description of what this rule checks.
    fn description(&self) -> &str;

    /// Check whether the rule applies to `attribute` on `element`.
    fn matches(&self, attribute: &Attribute, element: &TagEvent, document: &TextDocument) -> bool;

    /// Build the diagnostic for a matching attribute.
    fn diagnostic(
        &self,
        attribute: &Attribute,
        element: &TagEvent,
        document: &TextDocument,
    ) -> Diagnostic;
}
