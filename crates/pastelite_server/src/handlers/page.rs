//! Minimal HTML rendering of a paste.

use super::request_now;
use crate::{error::HttpError, models::paste::Paste, AppError, AppState};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use pastelite_core::id::is_valid_id;

const PAGE_STYLE: &str = "body { font-family: sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; } \
.info { display: flex; flex-wrap: wrap; gap: 1.5rem; color: #555; margin-bottom: 1rem; } \
pre { background: #f6f8fa; border: 1px solid #ddd; padding: 1rem; overflow-x: auto; white-space: pre-wrap; word-wrap: break-word; } \
.error { color: #d32f2f; }";

/// Render a paste as HTML, counting the view like the JSON endpoint does.
///
/// # Errors
/// Store failures surface as JSON errors; absent or expired pastes render an
/// HTML 404 page.
pub async fn paste_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, HttpError> {
    if !is_valid_id(&id) {
        return Ok(not_found_page());
    }
    let now = request_now(&state.config, &headers)?;
    match state.store.read(&id, now) {
        Ok(Some(paste)) => Ok(Html(render_paste(&paste)).into_response()),
        Ok(None) | Err(AppError::NotFoundOrExpired) => Ok(not_found_page()),
        Err(err) => Err(err.into()),
    }
}

fn render_paste(paste: &Paste) -> String {
    let remaining = paste
        .remaining_views()
        .map(|views| views.to_string())
        .unwrap_or_else(|| "Unlimited".to_string());
    let expires = match paste.expires_at {
        Some(at) => format!("Expires: {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => "Never expires".to_string(),
    };
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Paste: {id}</title>\n<style>{style}</style>\n</head>\n<body>\n<div class=\"info\">\n<span><strong>Paste ID:</strong> {id}</span>\n<span><strong>Views:</strong> {views}</span>\n<span><strong>Remaining Views:</strong> {remaining}</span>\n<span><strong>{expires}</strong></span>\n</div>\n<pre>{content}</pre>\n</body>\n</html>\n",
        id = escape_html(&paste.id),
        style = PAGE_STYLE,
        views = paste.views,
        remaining = remaining,
        expires = expires,
        content = escape_html(&paste.content),
    )
}

fn not_found_page() -> Response {
    let body = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Paste Not Found</title>\n<style>{}</style>\n</head>\n<body>\n<h1 class=\"error\">Paste Not Found</h1>\n<p>The paste you're looking for doesn't exist or has expired.</p>\n</body>\n</html>\n",
        PAGE_STYLE
    );
    (StatusCode::NOT_FOUND, Html(body)).into_response()
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample(max_views: Option<u64>, views: u64) -> Paste {
        let created_at = Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap();
        Paste {
            id: "abcDEF0123".to_string(),
            content: "<script>alert('x')</script> & \"more\"".to_string(),
            ttl_seconds: Some(60),
            max_views,
            views,
            created_at,
            expires_at: Some(created_at + chrono::TimeDelta::seconds(60)),
        }
    }

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html("<a href=\"x\">Tom & Jerry's</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#039;s&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn rendered_page_escapes_content_and_reports_counts() {
        let html = render_paste(&sample(Some(3), 1));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#039;x&#039;)&lt;/script&gt; &amp; &quot;more&quot;"));
        assert!(html.contains("<strong>Views:</strong> 1"));
        assert!(html.contains("<strong>Remaining Views:</strong> 2"));
        assert!(html.contains("Expires: 2024-06-01 08:31:00 UTC"));

        let unlimited = render_paste(&Paste {
            expires_at: None,
            ..sample(None, 4)
        });
        assert!(unlimited.contains("Unlimited"));
        assert!(unlimited.contains("Never expires"));
    }

    #[test]
    fn not_found_page_uses_404_status() {
        assert_eq!(not_found_page().status(), StatusCode::NOT_FOUND);
    }
}
