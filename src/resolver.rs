//! Path resolution: map a rustdoc source-view href to a repository path and line.
//!
//! Rustdoc renders the project's sources under `src/<crate>/` with one
//! `.html` page per source file, and links items to them as
//! `../src/<crate>/<path>.rs.html#<line>`. Everything that depends on that
//! convention lives in this module.

use crate::types::SourceLinkDescriptor;

/// Separator between the doc root and the source-view tree inside an href.
const SOURCE_SEPARATOR: &str = "/src/";

/// Prefix used by hrefs emitted from pages at the doc root.
const SOURCE_PREFIX: &str = "src/";

/// Suffix the generator appends to every rendered source page.
const PAGE_SUFFIX: &str = ".html";

/// Resolve a generator source link into a project-relative path and line.
///
/// Returns `None` when the link points outside the project's own source tree
/// (a dependency's sources bundled into the same doc set) or when the href
/// does not follow the generator's convention: no separator, no page suffix,
/// empty path segments, or a fragment that is not a plain line number.
pub fn resolve(href: &str, project_root_marker: &str) -> Option<SourceLinkDescriptor> {
    let remainder = source_tree_remainder(href)?;
    let (root_segment, rest) = remainder.split_once('/')?;
    if root_segment != project_root_marker {
        return None;
    }

    let (page_path, fragment) = rest.split_once('#')?;
    let line_fragment = parse_line_fragment(fragment)?;
    let relative_path = page_path.strip_suffix(PAGE_SUFFIX)?;
    if !has_only_nonempty_segments(relative_path) {
        return None;
    }

    return Some(SourceLinkDescriptor {
        line_fragment: line_fragment.to_string(),
        raw_href: href.to_string(),
        relative_path: relative_path.to_string(),
    });
}

/// The part of the href after the first source-tree separator.
fn source_tree_remainder(href: &str) -> Option<&str> {
    if let Some((_, remainder)) = href.split_once(SOURCE_SEPARATOR) {
        return Some(remainder);
    }
    return href.strip_prefix(SOURCE_PREFIX);
}

/// Accept only a non-empty run of ASCII digits. Ranges such as `10-20` and
/// anything else non-numeric are rejected rather than guessed at.
fn parse_line_fragment(fragment: &str) -> Option<&str> {
    if fragment.is_empty() || !fragment.bytes().all(|b| return b.is_ascii_digit()) {
        return None;
    }
    return Some(fragment);
}

/// Reject paths like `a//b.rs` or `/b.rs` that would produce a broken URL.
fn has_only_nonempty_segments(path: &str) -> bool {
    return !path.is_empty() && path.split('/').all(|segment| return !segment.is_empty());
}
