//! `attr_list` suffix that marks links which could not be resolved.

use crate::report::Reporter;

/// Name of the markdown extension that renders `{: ...}` attribute lists.
pub const ATTR_LIST_EXTENSION: &str = "attr_list";

/// Optional `{: attrs}` suffix appended to unresolved links.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Space-joined attribute names, or `None` when annotation is off.
    attrs: Option<String>,
}

impl Annotation {
    /// Annotation that never appends anything.
    pub const fn disabled() -> Self {
        return Self { attrs: None };
    }

    /// Derive the annotation from the configured attribute names and the
    /// active markdown extensions.
    ///
    /// Attribute names without the `attr_list` extension cannot render, so the
    /// feature is switched off and the mismatch is reported once here.
    pub fn from_settings(attributes: &[String], extensions: &[String], reporter: &dyn Reporter) -> Self {
        if attributes.is_empty() {
            return Self::disabled();
        }
        if !extensions.iter().any(|e| return e == ATTR_LIST_EXTENSION) {
            reporter.configuration_mismatch();
            return Self::disabled();
        }
        return Self {
            attrs: Some(attributes.join(" ")),
        };
    }

    /// Whether a suffix will be appended to unresolved links.
    pub const fn is_active(&self) -> bool {
        return self.attrs.is_some();
    }

    /// `link` with the suffix appended when `unresolved` and annotation is on.
    pub fn apply(&self, link: String, unresolved: bool) -> String {
        return match &self.attrs {
            Some(attrs) if unresolved => format!("{link}{{: {attrs}}}"),
            _ => link,
        };
    }
}
