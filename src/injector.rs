//! The injection pass: one permalink in front of every resolvable source link.

use serde::Serialize;

use crate::config::LinkConfig;
use crate::page::PageTree;
use crate::resolver;
use crate::types::Permalink;

/// What one pass did to one page. Counts add up across a doc tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InjectReport {
    /// Source links already preceded by their permalink from an earlier pass.
    pub already_linked: usize,
    /// Elements carrying a generator source-link class.
    pub candidates: usize,
    /// Permalinks inserted.
    pub inserted: usize,
    /// Candidates whose href did not resolve into the project's sources.
    pub skipped: usize,
}

impl InjectReport {
    /// Add another page's counts to this one.
    pub fn absorb(&mut self, other: &Self) {
        self.already_linked = self.already_linked.saturating_add(other.already_linked);
        self.candidates = self.candidates.saturating_add(other.candidates);
        self.inserted = self.inserted.saturating_add(other.inserted);
        self.skipped = self.skipped.saturating_add(other.skipped);
    }
}

/// Run the pass over one page.
///
/// Links outside the project, or with hrefs the resolver rejects, are left
/// alone. A link already preceded by the exact permalink it would get is
/// left alone too, so running the pass over its own output changes nothing.
pub fn inject<P: PageTree>(page: &mut P, config: &LinkConfig) -> InjectReport {
    let mut report = InjectReport::default();

    for link in page.source_links(&config.link_classes) {
        report.candidates = report.candidates.saturating_add(1);

        let Some(permalink) = permalink_for(page.href(link).as_deref(), config) else {
            report.skipped = report.skipped.saturating_add(1);
            continue;
        };

        if page.is_preceded_by(link, &permalink) {
            report.already_linked = report.already_linked.saturating_add(1);
            continue;
        }

        page.insert_before(link, &permalink);
        report.inserted = report.inserted.saturating_add(1);
    }

    return report;
}

/// The permalink an href should get, or `None` if it gets none.
pub fn permalink_for(href: Option<&str>, config: &LinkConfig) -> Option<Permalink> {
    let source = resolver::resolve(href?, &config.project_root_marker)?;
    let permalink = Permalink::new(&config.repository_base_url, &config.hosting_label, &source);
    tracing::trace!(href = %source.raw_href, url = %permalink.url, "resolved source link");
    return Some(permalink);
}
