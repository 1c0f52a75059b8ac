//! CLI commands for srclink: inject, resolve, init.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde::Serialize;
use walkdir::WalkDir;

use crate::config::{CONFIG_FILE, ConfigOverrides, LinkConfig};
use crate::error::Error;
use crate::html::HtmlPage;
use crate::injector::{self, InjectReport};

/// Directory under the doc root holding the generator's own source viewer.
const SOURCE_VIEW_DIR: &str = "src";

/// How run results are printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Machine-readable summary.
    Json,
    /// One line per changed page plus a totals line.
    #[default]
    Text,
}

/// A page the pass inserted at least one permalink into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangedPage {
    /// Permalinks inserted into this page.
    pub inserted: usize,
    /// Page path relative to the doc root.
    pub path: PathBuf,
}

/// Totals for one run over a documentation tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Pages that received permalinks, in walk order.
    pub changed: Vec<ChangedPage>,
    /// Whether changed pages were left unwritten.
    pub dry_run: bool,
    /// HTML pages visited.
    pub pages: usize,
    /// Summed per-page reports.
    pub report: InjectReport,
}

/// Inject permalinks into every page under `doc_root` and print a summary.
///
/// # Errors
///
/// Returns errors from config loading, the doc tree walk, or page I/O.
pub fn inject(
    doc_root: &Path,
    overrides: &ConfigOverrides,
    dry_run: bool,
    format: OutputFormat,
) -> Result<(), Error> {
    let config = LinkConfig::load(Path::new("."), overrides)?;
    let summary = run(doc_root, &config, dry_run)?;
    print_summary(&summary, format)?;
    return Ok(());
}

/// Walk a documentation tree and run the pass over every rendered page.
/// Pages are written back only when a permalink was inserted, and never
/// when `dry_run` is set.
///
/// # Errors
///
/// Returns `Error::DocRootNotFound` if `doc_root` is not a directory,
/// or `Error::Io` if a page cannot be read or written.
pub fn run(doc_root: &Path, config: &LinkConfig, dry_run: bool) -> Result<RunSummary, Error> {
    if !doc_root.is_dir() {
        return Err(Error::DocRootNotFound { path: doc_root.to_path_buf() });
    }

    let mut summary = RunSummary {
        dry_run,
        ..RunSummary::default()
    };

    for entry in WalkDir::new(doc_root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| return e.file_type().is_file())
        .filter(|e| return e.path().extension().is_some_and(|ext| return ext == "html"))
    {
        let page_path = entry.path();
        let relative = page_path.strip_prefix(doc_root).unwrap_or(page_path);
        if is_source_view_page(relative) {
            continue;
        }

        summary.pages = summary.pages.saturating_add(1);
        let Some(report) = process_page(page_path, config, dry_run)? else {
            continue;
        };

        summary.report.absorb(&report);
        if report.inserted > 0 {
            summary.changed.push(ChangedPage {
                inserted: report.inserted,
                path: relative.to_path_buf(),
            });
        }
    }

    tracing::info!(
        pages = summary.pages,
        changed = summary.changed.len(),
        inserted = summary.report.inserted,
        "pass complete"
    );
    return Ok(summary);
}

/// Run the pass over one page file. Returns `None` for pages that are not
/// UTF-8, which the generator never emits and are left alone.
///
/// # Errors
///
/// Returns `Error::Io` if the page cannot be read or written.
fn process_page(path: &Path, config: &LinkConfig, dry_run: bool) -> Result<Option<InjectReport>, Error> {
    let Ok(source) = String::from_utf8(std::fs::read(path)?) else {
        tracing::warn!(path = %path.display(), "skipping page that is not valid UTF-8");
        return Ok(None);
    };

    let mut page = HtmlPage::parse(source);
    let report = injector::inject(&mut page, config);

    if page.is_modified() {
        if dry_run {
            tracing::debug!(path = %path.display(), inserted = report.inserted, "dry run, not writing");
        } else {
            std::fs::write(path, page.render())?;
            tracing::debug!(path = %path.display(), inserted = report.inserted, "page updated");
        }
    }

    return Ok(Some(report));
}

/// Pages under `src/` are the generator's source viewer, not API pages.
fn is_source_view_page(relative: &Path) -> bool {
    return relative
        .components()
        .next()
        .is_some_and(|c| return c.as_os_str() == SOURCE_VIEW_DIR);
}

/// Print a run summary to stdout.
///
/// # Errors
///
/// Returns `Error::Json` if the JSON summary cannot be serialized.
pub fn print_summary(summary: &RunSummary, format: OutputFormat) -> Result<(), Error> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(summary)?),
        OutputFormat::Text => {
            for page in &summary.changed {
                println!("LINKED  {} ({})", page.path.display(), page.inserted);
            }
            let verb = if summary.dry_run { "Would insert" } else { "Inserted" };
            println!(
                "{verb} {} permalinks into {} of {} pages ({} skipped, {} already linked)",
                summary.report.inserted,
                summary.changed.len(),
                summary.pages,
                summary.report.skipped,
                summary.report.already_linked,
            );
        },
    }
    return Ok(());
}

/// Print the permalink one href would receive.
/// Exits with 1 when the href is not applicable, so scripts can test it.
///
/// # Errors
///
/// Returns errors from config loading.
pub fn resolve(href: &str, overrides: &ConfigOverrides) -> Result<ExitCode, Error> {
    let config = LinkConfig::load(Path::new("."), overrides)?;

    return match injector::permalink_for(Some(href), &config) {
        Some(permalink) => {
            println!("{}  {}", permalink.text, permalink.url);
            Ok(ExitCode::SUCCESS)
        },
        None => {
            println!("not applicable: {href}");
            Ok(ExitCode::from(1))
        },
    };
}

/// Write or update `.srclink.toml` in the working directory.
///
/// # Errors
///
/// Returns `Error::ParseFailed` if an existing config can't be parsed,
/// or `Error::Io` if reading or writing fails.
pub fn init(hosting_label: &str, repository_base_url: &str, project_root_marker: &str) -> Result<(), Error> {
    let root = PathBuf::from(".");
    write_config(&root, hosting_label, repository_base_url, project_root_marker)?;
    println!("Wrote {CONFIG_FILE}");
    return Ok(());
}

/// Set the three required keys in `root/.srclink.toml`, keeping any other
/// keys, comments, and formatting already in the file.
///
/// # Errors
///
/// Returns `Error::ParseFailed` if the existing file is not valid TOML,
/// or `Error::Io` on read or write failure.
fn write_config(
    root: &Path,
    hosting_label: &str,
    repository_base_url: &str,
    project_root_marker: &str,
) -> Result<(), Error> {
    let config_path = root.join(CONFIG_FILE);
    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(Error::Io(e)),
    };

    let mut doc: toml_edit::DocumentMut = content.parse().map_err(|e: toml_edit::TomlError| {
        return Error::ParseFailed {
            file: config_path.clone(),
            reason: e.to_string(),
        };
    })?;

    doc["hosting_label"] = toml_edit::value(hosting_label);
    doc["repository_base_url"] = toml_edit::value(repository_base_url);
    doc["project_root_marker"] = toml_edit::value(project_root_marker);

    std::fs::write(&config_path, doc.to_string())?;
    return Ok(());
}
