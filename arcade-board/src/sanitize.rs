use url::Url;

/// Escape text for use inside element content or a quoted attribute.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape text the way element content serializes it: only `&`, `<` and `>`.
/// Quotes stay literal.
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escaped href for a profile link, or `None` when the value is not an
/// absolute http(s) URL.
pub fn safe_profile_href(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let url = Url::parse(value).ok()?;
    match url.scheme() {
        "http" | "https" => Some(escape_html(url.as_str())),
        _ => None,
    }
}

/// JSON embedded in a `<script>` block must not close the element early.
pub fn escape_script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<script>alert("x & 'y'")</script>"#),
            "&lt;script&gt;alert(&quot;x &amp; &#39;y&#39;&quot;)&lt;/script&gt;"
        );
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(escape_html("Ana María 李"), "Ana María 李");
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn escaping_is_not_reinterpreted() {
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }

    #[test]
    fn text_escape_keeps_quotes() {
        assert_eq!(escape_text(r#"O'Brien & "Ace" <b>"#), r#"O'Brien &amp; "Ace" &lt;b&gt;"#);
    }

    #[test]
    fn profile_href_rejects_script_urls() {
        assert_eq!(safe_profile_href("javascript:alert(1)"), None);
        assert_eq!(safe_profile_href("not a url"), None);
        assert_eq!(safe_profile_href("  "), None);
        assert_eq!(
            safe_profile_href("https://example.com/p?a=1&b=2").as_deref(),
            Some("https://example.com/p?a=1&amp;b=2")
        );
    }

    #[test]
    fn script_json_cannot_close_the_tag() {
        assert_eq!(escape_script_json(r#"{"a":"</script>"}"#), r#"{"a":"<\/script>"}"#);
    }
}
