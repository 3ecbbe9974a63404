//! Alternate renderings of plain response text

/// `plain` as HTML (line breaks become `<br>`) and as trimmed lines.
///
/// Empty lines are kept so line `i` always corresponds to line `i` of the
/// input; `""` renders as `("", [""])`.
pub fn render(plain: &str) -> (String, Vec<String>) {
    let normalized = plain.replace("\r\n", "\n");
    let html = normalized.replace('\n', "<br>");
    let lines = normalized.split('\n').map(|l| l.trim().to_string()).collect();
    (html, lines)
}
