pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Fills `PLACEHOLDER`-style words in a template in a single pass, so substituted text is never
/// scanned for placeholders again
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    static PLACEHOLDER: once_cell::sync::Lazy<regex::Regex> =
        once_cell::sync::Lazy::new(|| regex::Regex::new(r"\b[A-Z][A-Z_]+\b").expect("impossible"));

    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures| {
            let word = &caps[0];
            match values.iter().find(|(key, _)| *key == word) {
                Some((_, value)) => value.to_string(),
                None => word.to_string(),
            }
        })
        .into_owned()
}

/// Characters left alone in `filename*` (RFC 5987 attr-char)
const ATTR_CHAR: &percent_encoding::AsciiSet = &percent_encoding::NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// `attachment` disposition with an ASCII fallback name plus the exact UTF-8 name
pub fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        percent_encoding::utf8_percent_encode(file_name, ATTR_CHAR)
    )
}

/// Percent-encodes a file name for use as a single URL path segment
pub fn url_path_segment(s: &str) -> String {
    percent_encoding::utf8_percent_encode(s, percent_encoding::NON_ALPHANUMERIC).to_string()
}
