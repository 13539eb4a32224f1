use url::Url;

use super::errors::ServeError;

/// HTML 文本与属性转义
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// 按路径段百分号编码，生成以 `/` 开头的链接路径
///
/// 段内的 `/`、`%`、`?`、`#` 等字符都会被编码，空段被忽略。
pub fn encode_path<'a>(segments: impl IntoIterator<Item = &'a str>) -> Result<String, ServeError> {
    let mut url =
        Url::parse("http://localhost/").map_err(|e| ServeError::Render(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| ServeError::Render("cannot build link path".into()))?
        .pop_if_empty()
        .extend(segments.into_iter().filter(|s| !s.is_empty()));
    Ok(url.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn encodes_each_segment() {
        assert_eq!(encode_path(["movies", "a b.mp4"]).unwrap(), "/movies/a%20b.mp4");
        assert_eq!(encode_path(["100%", "x#y?.mkv"]).unwrap(), "/100%25/x%23y%3F.mkv");
        assert_eq!(encode_path(["", "clip.mp4"]).unwrap(), "/clip.mp4");
    }

    #[test]
    fn empty_segments_yield_root() {
        assert_eq!(encode_path(std::iter::empty()).unwrap(), "/");
    }
}
