//! Rendered HTML pages as a [`PageTree`].
//!
//! Rustdoc output is not well-formed XML, and the pass only ever needs
//! anchor start tags, so the page is kept as text: anchor tags are located
//! with a regex, insertions are buffered as byte offsets, and the page is
//! spliced back together on [`HtmlPage::render`]. Untouched bytes are
//! reproduced exactly.

use std::sync::LazyLock;

use regex::Regex;

use crate::page::PageTree;
use crate::types::{PERMALINK_CLASS, PERMALINK_STYLE, Permalink};

/// Matches an `<a ...>` start tag. `\b` keeps `<abbr>` and `<aside>` out.
static ANCHOR_TAG: LazyLock<Regex> = LazyLock::new(|| {
    return Regex::new(r"(?i)<a\b[^>]*>").expect("valid regex");
});

/// Matches one `name=value` attribute with a double-, single-, or un-quoted value.
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    return Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
        .expect("valid regex");
});

/// One anchor start tag found in the page.
#[derive(Debug, Clone)]
struct AnchorTag {
    /// Whitespace-separated tokens of the `class` attribute.
    classes: Vec<String>,
    /// Decoded `href` attribute, if present.
    href: Option<String>,
    /// Byte offset of the `<` that opens the tag.
    start: usize,
}

/// A rendered documentation page held as text.
#[derive(Debug)]
pub struct HtmlPage {
    /// Every anchor start tag, in document order.
    anchors: Vec<AnchorTag>,
    /// Markup to splice in, keyed by the byte offset it goes in front of.
    insertions: Vec<(usize, String)>,
    /// The page exactly as read.
    source: String,
}

impl HtmlPage {
    /// Index the anchor tags of a page.
    pub fn parse(source: String) -> Self {
        let anchors = ANCHOR_TAG
            .find_iter(&source)
            .map(|tag| return parse_anchor_tag(tag.start(), tag.as_str()))
            .collect();

        return Self {
            anchors,
            insertions: Vec::new(),
            source,
        };
    }

    /// Whether any permalink has been inserted since parsing.
    pub fn is_modified(&self) -> bool {
        return !self.insertions.is_empty();
    }

    /// The page with all buffered insertions applied.
    pub fn render(&self) -> String {
        let extra: usize = self.insertions.iter().map(|(_, html)| return html.len()).sum();
        let mut out = String::with_capacity(self.source.len().saturating_add(extra));

        let mut ordered: Vec<&(usize, String)> = self.insertions.iter().collect();
        ordered.sort_by_key(|(offset, _)| return *offset);

        let mut copied = 0_usize;
        for (offset, html) in ordered {
            out.push_str(self.source.get(copied..*offset).unwrap_or_default());
            out.push_str(html);
            copied = *offset;
        }
        out.push_str(self.source.get(copied..).unwrap_or_default());

        return out;
    }
}

impl PageTree for HtmlPage {
    /// Index into the page's anchor list.
    type Link = usize;

    fn source_links(&self, classes: &[String]) -> Vec<usize> {
        return self
            .anchors
            .iter()
            .enumerate()
            .filter(|(_, anchor)| return anchor.classes.iter().any(|c| return classes.contains(c)))
            .map(|(index, _)| return index)
            .collect();
    }

    fn href(&self, link: usize) -> Option<String> {
        return self.anchors.get(link)?.href.clone();
    }

    fn is_preceded_by(&self, link: usize, permalink: &Permalink) -> bool {
        let Some(anchor) = self.anchors.get(link) else {
            return false;
        };
        let before = self.source.get(..anchor.start).unwrap_or_default();
        return before.trim_end().ends_with(&render_permalink(permalink));
    }

    fn insert_before(&mut self, link: usize, permalink: &Permalink) {
        if let Some(anchor) = self.anchors.get(link) {
            self.insertions.push((anchor.start, render_permalink(permalink)));
        }
    }
}

/// Extract the attributes the pass cares about from one start tag.
fn parse_anchor_tag(start: usize, tag: &str) -> AnchorTag {
    let mut classes = Vec::new();
    let mut href = None;

    // Skip the `<a` itself so the element name is never taken for an attribute.
    let attributes = tag.get(2..).unwrap_or_default();
    for cap in ATTRIBUTE.captures_iter(attributes) {
        let Some(name) = cap.get(1) else {
            continue;
        };
        let value = cap
            .get(2)
            .or_else(|| return cap.get(3))
            .or_else(|| return cap.get(4))
            .map_or("", |m| return m.as_str());

        match name.as_str().to_ascii_lowercase().as_str() {
            "class" => classes = value.split_ascii_whitespace().map(String::from).collect(),
            "href" => href = Some(decode_entities(value)),
            _ => {},
        }
    }

    return AnchorTag { classes, href, start };
}

/// Serialize a permalink as an anchor element.
fn render_permalink(permalink: &Permalink) -> String {
    return format!(
        r#"<a class="{PERMALINK_CLASS}" href="{}" style="{PERMALINK_STYLE}">{}</a>"#,
        escape(&permalink.url),
        escape(&permalink.text),
    );
}

/// Escape text for use in an attribute value or element content.
fn escape(text: &str) -> String {
    return text
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
}

/// Undo the entity escapes that can appear in an attribute value.
fn decode_entities(value: &str) -> String {
    return value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test code")]
mod tests {
    use super::*;

    fn classes(names: &[&str]) -> Vec<String> {
        return names.iter().map(|n| return (*n).to_string()).collect();
    }

    fn permalink() -> Permalink {
        return Permalink {
            text: "[src on GitLab]".to_string(),
            url: "https://gitlab.com/creato/pub-sub/blob/master/lib.rs#L42".to_string(),
        };
    }

    #[test]
    fn finds_links_by_class_token() {
        let page = HtmlPage::parse(
            r#"<a class="rightside src" href="../src/a/lib.rs.html#1">Source</a>
               <a class="srclink" href='../src/a/lib.rs.html#2'>[src]</a>
               <a class="source-ish" href="../src/a/lib.rs.html#3">no</a>
               <a href="struct.Foo.html">Foo</a>"#
                .to_string(),
        );

        let links = page.source_links(&classes(&["srclink", "src"]));
        assert_eq!(links, vec![0, 1]);
        assert_eq!(page.href(0).as_deref(), Some("../src/a/lib.rs.html#1"));
        assert_eq!(page.href(1).as_deref(), Some("../src/a/lib.rs.html#2"));
    }

    #[test]
    fn ignores_other_elements_starting_with_a() {
        let page = HtmlPage::parse(r#"<abbr class="src">x</abbr><aside class="src"></aside>"#.to_string());
        assert!(page.source_links(&classes(&["src"])).is_empty());
    }

    #[test]
    fn decodes_href_entities() {
        let page = HtmlPage::parse(r#"<a class="src" href="../src/a/x.rs.html?a=1&amp;b=2#4">s</a>"#.to_string());
        assert_eq!(page.href(0).as_deref(), Some("../src/a/x.rs.html?a=1&b=2#4"));
    }

    #[test]
    fn anchor_without_href() {
        let page = HtmlPage::parse(r#"<a class="src" id="x">s</a>"#.to_string());
        assert_eq!(page.source_links(&classes(&["src"])), vec![0]);
        assert_eq!(page.href(0), None);
    }

    #[test]
    fn unmodified_page_renders_identically() {
        let source = "<html><body><a class=\"src\" href=\"x\">s</a>\n</body></html>\n".to_string();
        let page = HtmlPage::parse(source.clone());
        assert!(!page.is_modified());
        assert_eq!(page.render(), source);
    }

    #[test]
    fn inserts_directly_before_anchor() {
        let mut page = HtmlPage::parse(r#"<span><a class="src" href="x">Source</a></span>"#.to_string());
        page.insert_before(0, &permalink());

        assert!(page.is_modified());
        assert_eq!(
            page.render(),
            "<span><a class=\"srclink-permalink\" \
             href=\"https://gitlab.com/creato/pub-sub/blob/master/lib.rs#L42\" \
             style=\"margin-right: 0.5em\">[src on GitLab]</a>\
             <a class=\"src\" href=\"x\">Source</a></span>"
        );
    }

    #[test]
    fn detects_existing_permalink() {
        let mut page = HtmlPage::parse(r#"<a class="src" href="x">Source</a>"#.to_string());
        page.insert_before(0, &permalink());

        let reparsed = HtmlPage::parse(page.render());
        let links = reparsed.source_links(&classes(&["src"]));
        assert_eq!(links, vec![1]);
        assert!(reparsed.is_preceded_by(1, &permalink()));

        let other = Permalink {
            text: "[src on GitLab]".to_string(),
            url: "https://gitlab.com/creato/pub-sub/blob/master/lib.rs#L43".to_string(),
        };
        assert!(!reparsed.is_preceded_by(1, &other));
    }

    #[test]
    fn escapes_generated_markup() {
        let mut page = HtmlPage::parse(r#"<a class="src" href="x">s</a>"#.to_string());
        let link = Permalink {
            text: "[src on <Git&Co>]".to_string(),
            url: "https://example.org/a\"b".to_string(),
        };
        page.insert_before(0, &link);

        let rendered = page.render();
        assert!(rendered.contains("href=\"https://example.org/a&quot;b\""));
        assert!(rendered.contains(">[src on &lt;Git&amp;Co&gt;]</a>"));
    }

    #[test]
    fn splices_multiple_insertions_in_order() {
        let mut page = HtmlPage::parse(r#"<a class="src" href="1">a</a> | <a class="src" href="2">b</a>"#.to_string());
        let first = Permalink { text: "one".to_string(), url: "u1".to_string() };
        let second = Permalink { text: "two".to_string(), url: "u2".to_string() };
        page.insert_before(1, &second);
        page.insert_before(0, &first);

        let rendered = page.render();
        let one = rendered.find(">one<").unwrap();
        let a = rendered.find(">a<").unwrap();
        let two = rendered.find(">two<").unwrap();
        let b = rendered.find(">b<").unwrap();
        assert!(one < a && a < two && two < b);
    }
}
