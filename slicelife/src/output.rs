//! Output file naming.
//!
//! Output files are named `[{prefix}_]slice_of_life_{dir}_{count}.{ext}`,
//! where `{dir}` is the source directory's base name with every character
//! outside `[a-zA-Z0-9]` replaced by `_`, and `{count}` is the number of
//! images found in it.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Fixed stem shared by every output file.
pub const OUTPUT_STEM: &str = "slice_of_life";

fn unsafe_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^a-zA-Z0-9]").expect("valid regex"))
}

/// Replace every non-alphanumeric ASCII character with `_`.
pub fn sanitize_component(name: &str) -> String {
    unsafe_chars().replace_all(name, "_").into_owned()
}

/// Build the output file name for a composition.
///
/// An empty (or whitespace-only) prefix is treated as no prefix. A directory
/// without a base name (such as `/`) contributes an empty component.
pub fn output_filename(
    prefix: Option<&str>,
    directory: &Path,
    count: usize,
    extension: &str,
) -> String {
    let dir = directory
        .file_name()
        .map(|n| sanitize_component(&n.to_string_lossy()))
        .unwrap_or_default();

    let prefix = match prefix.map(str::trim) {
        Some(p) if !p.is_empty() => format!("{}_", p),
        _ => String::new(),
    };

    format!("{}{}_{}_{}.{}", prefix, OUTPUT_STEM, dir, count, extension)
}
