//! Download names and the `Content-Disposition` header.

/// The `.pdf` file name for a request.
///
/// Missing, empty or whitespace-only names fall back to `default`. Path
/// separators and control characters are replaced with `_`. `.pdf` is
/// always appended, so `informe.pdf` downloads as `informe.pdf.pdf`.
pub fn download_name(requested: Option<&str>, default: &str) -> String {
    let base = requested
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default);

    let mut name: String = base
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    name.push_str(".pdf");
    name
}

/// `attachment` disposition carrying `name` twice: an ASCII-only
/// `filename="…"` for old clients and an RFC 5987 `filename*` with the
/// exact UTF-8 name.
pub fn content_disposition(name: &str) -> String {
    let fallback: String = name
        .chars()
        .map(|c| match c {
            '"' | '\\' | '/' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(name)
    )
}
