//! Small helpers shared by the table core and the plugins.

/// Returns the page numbers to show in a pagination window.
///
/// The window is centered on `current_page` and pulled back when it would
/// run past `page_count`. `current_page` is clamped into `[1, page_count]`
/// and `window_size` to at most `page_count`, so the result always has
/// `min(window_size, page_count)` contiguous ascending entries.
///
/// # Example
///
/// ```
/// use salesgrid_lib::util::pages_to_show;
///
/// assert_eq!(pages_to_show(5, 10, 5), vec![3, 4, 5, 6, 7]);
/// assert_eq!(pages_to_show(10, 10, 5), vec![6, 7, 8, 9, 10]);
/// assert!(pages_to_show(1, 0, 5).is_empty());
/// ```
pub fn pages_to_show(current_page: usize, page_count: usize, window_size: usize) -> Vec<usize> {
    if page_count == 0 || window_size == 0 {
        return Vec::new();
    }

    let current = current_page.clamp(1, page_count);
    let window = window_size.min(page_count);

    let mut start = current.saturating_sub(window / 2).max(1);
    let mut end = start + window - 1;

    if end > page_count {
        end = page_count;
        start = (end + 1).saturating_sub(window).max(1);
    }

    (start..=end).collect()
}

/// Joins class names into one space-separated string, dropping blanks and duplicates.
///
/// Each entry may itself hold several space-separated names. First occurrence wins
/// the position.
pub fn class_names<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut classes: Vec<String> = Vec::new();
    for name in names {
        for class in name.as_ref().split_whitespace() {
            if !classes.iter().any(|c| c == class) {
                classes.push(class.to_string());
            }
        }
    }
    classes.join(" ")
}

/// Like [`class_names`], but only includes names whose flag is `true`.
pub fn class_names_if<'a, I>(names: I) -> String
where
    I: IntoIterator<Item = (&'a str, bool)>,
{
    class_names(names.into_iter().filter(|(_, on)| *on).map(|(name, _)| name))
}

/// Uppercases the first character of `s`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
