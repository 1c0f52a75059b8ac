use crate::config::CONFIG_FILE;
use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic: what happened, and
/// how to fix it where there is a fix.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::DocRootNotFound { path } => render_doc_root_not_found(&path.display().to_string()),
        Error::MissingConfig { field } => render_missing_config(field),
        _ => render_generic(e),
    }
}

fn render_generic(e: &Error) -> String {
    match e {
        Error::ParseFailed { file, reason } => format!("\
# Error: Parse Failed

Could not parse `{}`: {reason}
", file.display()),

        Error::TomlDe(e) => format!("\
# Error: Invalid {CONFIG_FILE}

{e}

## Fix

Valid keys are `hosting_label`, `repository_base_url`,
`project_root_marker`, and `link_classes`.
"),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),

        Error::Watch { reason } => format!("\
# Error: Watch Failed

{reason}
"),

        // Already handled in render_error, but need exhaustive match.
        _ => format!("\
# Error

{e}
"),
    }
}

fn render_doc_root_not_found(path: &str) -> String {
    format!("\
# Error: Documentation Not Found

`{path}` is not a directory.

## Fix

Generate the documentation first, then point srclink at it:

    cargo doc
    srclink inject target/doc
")
}

fn render_missing_config(field: &str) -> String {
    let flag = match field {
        "hosting_label" => "--label",
        "project_root_marker" => "--root-marker",
        "repository_base_url" => "--base-url",
        _ => "--help",
    };

    format!("\
# Error: Missing Config

No value for `{field}`.

## Fix

Set it in `{CONFIG_FILE}`:

    srclink init --label GitLab --base-url https://gitlab.com/<owner>/<repo>/blob/master/ --root-marker <crate_name>

Or pass it on the command line with `{flag}`.
")
}
