//! Minimal HTML shell shared by every page.

/// Escape text for use in element content and quoted attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Wrap `body` (already escaped markup) in a complete document.
pub fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

/// Full-screen single message, used for loading, empty and error states.
pub fn message_page(title: &str, class: &str, message: &str) -> String {
    layout(
        title,
        &format!(
            "<div class=\"status\"><p class=\"{}\">{}</p></div>",
            escape(class),
            escape(message)
        ),
    )
}

/// Site footer with the copyright line for `year` and the policy links.
pub fn footer(year: i32) -> String {
    format!(
        "<footer>\n<p>&copy; {year} E-Commerce Store. All rights reserved.</p>\n\
         <nav>\n<a href=\"#\">Privacy Policy</a>\n<a href=\"#\">Terms of Service</a>\n\
         <a href=\"#\">Contact Us</a>\n</nav>\n</footer>"
    )
}

/// [`footer`] for the current UTC year.
pub fn site_footer() -> String {
    footer(time::OffsetDateTime::now_utc().year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn layout_escapes_title_but_not_body() {
        let page = layout("Chairs & Tables", "<main>ok</main>");
        assert!(page.contains("<title>Chairs &amp; Tables</title>"));
        assert!(page.contains("<main>ok</main>"));
    }

    #[test]
    fn message_page_escapes_message() {
        let page = message_page("Error", "error", "<script>");
        assert!(page.contains("<p class=\"error\">&lt;script&gt;</p>"));
    }

    #[test]
    fn footer_carries_year_and_policy_links() {
        let html = footer(2026);
        assert!(html.contains("&copy; 2026 E-Commerce Store. All rights reserved."));
        assert!(html.contains("Privacy Policy"));
        assert!(html.contains("Terms of Service"));
        assert!(html.contains("Contact Us"));
    }
}
