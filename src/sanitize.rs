/// Replaces every character that's reserved in file names on common platforms with `_`
///
/// Everything else, including non-ASCII, is left alone. Titles that sanitize to the same string
/// end up at the same output path.
pub fn sanitize(title: &str) -> String {
    static RESERVED: once_cell::sync::Lazy<regex::Regex> = once_cell::sync::Lazy::new(|| {
        regex::Regex::new(r#"[<>:"/\\|?*]"#).expect("impossible")
    });

    RESERVED.replace_all(title, "_").into_owned()
}
