use scraper::{Html, Selector};
use std::sync::OnceLock;

fn selector(cell: &'static OnceLock<Selector>, css: &str) -> &'static Selector {
    cell.get_or_init(|| Selector::parse(css).expect("static selector"))
}

/// Hidden `form_build_id` value from the login form.
pub fn extract_form_build_id(html: &str) -> Option<String> {
    static FORM_BUILD_ID: OnceLock<Selector> = OnceLock::new();
    let document = Html::parse_document(html);
    document
        .select(selector(&FORM_BUILD_ID, r#"input[name="form_build_id"]"#))
        .next()
        .and_then(|el| el.value().attr("value"))
        .map(str::to_string)
}

/// `<meta name="csrf-token">` content from the registration page.
pub fn extract_csrf_token(html: &str) -> Option<String> {
    static CSRF: OnceLock<Selector> = OnceLock::new();
    let document = Html::parse_document(html);
    document
        .select(selector(&CSRF, r#"meta[name="csrf-token"]"#))
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::to_string)
}

/// Logged-in pages carry a logout link.
pub fn is_logged_in(html: &str) -> bool {
    html.contains("user/logout")
}
