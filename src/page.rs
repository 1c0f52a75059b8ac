//! The page capability the injector works against.
//!
//! The injector never parses markup itself. Anything that can list the
//! generator's source-link elements, read their hrefs, and insert a sibling
//! in front of one can be enriched: rendered HTML files in production, an
//! in-memory tree in tests.

use crate::types::Permalink;

/// A rendered documentation page, seen only through its source links.
pub trait PageTree {
    /// Opaque handle to one candidate link element on this page.
    type Link: Copy;

    /// Enumerate the elements carrying any of the given marker classes,
    /// in document order.
    fn source_links(&self, classes: &[String]) -> Vec<Self::Link>;

    /// The element's `href` attribute, if it has one.
    fn href(&self, link: Self::Link) -> Option<String>;

    /// Whether the element is already immediately preceded by this permalink.
    fn is_preceded_by(&self, link: Self::Link, permalink: &Permalink) -> bool;

    /// Insert the permalink as the element's immediate preceding sibling.
    fn insert_before(&mut self, link: Self::Link, permalink: &Permalink);
}
