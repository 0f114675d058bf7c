use std::path::Path;
use urlsdigest::config::{CliOverrides, CrawlerSettings, DigestOptions, EngineKind, Settings};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A paragraph long enough to survive the default word-count threshold
pub const LONG_PARAGRAPH: &str =
    "This paragraph has comfortably more than ten words so the extractor keeps it.";

/// Wraps `body` in a minimal HTML page with navigation chrome
pub fn html_page(title: &str, body: &str) -> String {
    format!(
        r#"<html><head><title>{title}</title></head><body>
        <nav><a href="/">Home</a></nav>
        <main><h1>{title}</h1><p>{body}</p></main>
        </body></html>"#
    )
}

/// Mounts a GET handler returning an HTML page
pub async fn mount_html(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

/// Mounts a GET handler returning a bare status code
pub async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Options for an HTTP-engine run without the terminal monitor
pub fn http_options(output: &Path, settings: CrawlerSettings) -> DigestOptions {
    let settings = Settings {
        crawler: settings,
        ..Default::default()
    };
    let cli = CliOverrides {
        output: Some(output.to_path_buf()),
        engine: Some(EngineKind::Http),
        monitor: Some(false),
        ..Default::default()
    };
    DigestOptions::resolve(&settings, &cli).unwrap()
}
