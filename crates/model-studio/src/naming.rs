//! Human-readable model names derived from file paths

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Derive a model name from a model file or folder path.
///
/// Takes the last path segment, accepting both `/` and `\` as separators,
/// and strips its extension. Returns `None` when nothing usable is left.
///
/// ```
/// use model_studio::naming::model_name_from_path;
///
/// assert_eq!(model_name_from_path("a/b/c.ckpt").as_deref(), Some("c"));
/// assert_eq!(
///     model_name_from_path("models\\checkpoint\\myModel.ckpt").as_deref(),
///     Some("myModel")
/// );
/// ```
pub fn model_name_from_path(path: &str) -> Option<String> {
    let trimmed = path.trim().trim_end_matches(is_separator);
    let segment = trimmed.rsplit(is_separator).next()?;

    let name = match segment.rsplit_once('.') {
        Some((stem, _extension)) if !stem.is_empty() => stem,
        Some(_) => return None,
        None => segment,
    };

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
