//! Core domain types for source links and the permalinks derived from them.

/// Class token carried by every injected permalink. Must never equal a
/// generator source-link class, or a second pass would treat injected
/// anchors as candidates.
pub const PERMALINK_CLASS: &str = "srclink-permalink";

/// Inline style applied to injected permalinks. Spacing only.
pub const PERMALINK_STYLE: &str = "margin-right: 0.5em";

/// Result of resolving one generator source link. Built fresh for each
/// candidate element and dropped once that element is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLinkDescriptor {
    /// Line number taken verbatim from the href fragment. Always ASCII digits.
    pub line_fragment: String,
    /// The href as it appeared on the page.
    pub raw_href: String,
    /// Path of the source file relative to the project root, page suffix stripped.
    pub relative_path: String,
}

/// An anchor to insert in front of a generator source link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permalink {
    /// Visible link text, `[src on <label>]`.
    pub text: String,
    /// Absolute URL into the hosted repository, ending in `#L<line>`.
    pub url: String,
}

impl Permalink {
    /// Build the permalink for a resolved source link.
    pub fn new(base_url: &str, hosting_label: &str, source: &SourceLinkDescriptor) -> Self {
        return Self {
            text: format!("[src on {hosting_label}]"),
            url: format!("{base_url}{}#L{}", source.relative_path, source.line_fragment),
        };
    }
}
