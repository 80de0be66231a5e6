/// Longest title prefix kept in an output file name, in characters.
pub const MAX_TITLE_CHARS: usize = 90;

/// File name for a rendered short: `<safe title>_<first 8 chars of id>.mp4`.
///
/// The title keeps alphanumerics, spaces, `-` and `_`, is trimmed and cut to
/// [`MAX_TITLE_CHARS`]; an empty result becomes `short`.
pub fn output_file_name(title: &str, external_id: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let safe: String = kept.trim().chars().take(MAX_TITLE_CHARS).collect();
    let safe = if safe.is_empty() { "short" } else { safe.as_str() };
    let id: String = external_id.chars().take(8).collect();
    format!("{safe}_{id}.mp4")
}

#[cfg(test)]
#[path = "../../tests/unit/compose/naming.rs"]
mod tests;
