use std::path::Path;

use wikibridge::config::CONFIG_FILE;
use wikibridge::error::Error;

/// ANSI bold, used for markdown headings on a terminal.
const BOLD: &str = "\x1b[1m";
/// ANSI reset.
const RESET: &str = "\x1b[0m";

/// Render an error as markdown with bold headings and print it to stderr.
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
    return match e {
        Error::DocsDirNotFound { path } => render_docs_dir_not_found(path),
        Error::TomlDe(inner) => format!(
            "\
# Error: Invalid Config

`{CONFIG_FILE}` could not be parsed:

{inner}

## Fix

Known keys are `docs_dir`, `exclude`, `invalid_link_attributes`,
`markdown_extensions` and the `[toc]` table with `separator`.
"
        ),
        Error::Io(inner) => format!(
            "\
# Error: I/O

{inner}
"
        ),
        Error::WalkDir(inner) => format!(
            "\
# Error: Directory Walk

{inner}
"
        ),
        Error::Watch { reason } => format!(
            "\
# Error: Watch

{reason}
"
        ),
    };
}

/// Diagnostic for a docs directory that does not exist.
fn render_docs_dir_not_found(path: &Path) -> String {
    return format!(
        "\
# Error: Docs Directory Not Found

`{}` does not exist.

## Fix

Set `docs_dir` in `{CONFIG_FILE}`, or run from the project root.
",
        path.display()
    );
}
