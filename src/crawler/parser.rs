//! Readable-content extraction
//!
//! This module turns a rendered HTML page into Markdown:
//! - Strips page chrome (site header, footer, sidebars) outside the content
//! - Picks the content roots (`main`, otherwise every `article`, otherwise `body`)
//! - Drops non-content elements (scripts, navigation, forms)
//! - Converts the rest with `htmd`
//! - Filters out paragraphs that are too short to be content

use htmd::HtmlToMarkdown;
use scraper::{ElementRef, Html, Selector};

/// Page chrome, removed unless it sits inside a content section
const PAGE_CHROME: &str = "header, footer, aside";

/// Elements that never carry readable content
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "nav", "form", "iframe", "svg", "template",
];

/// Extracts the readable content of an HTML page as Markdown
///
/// # Arguments
///
/// * `html` - The full page HTML
/// * `word_count_threshold` - Plain paragraphs with fewer words are dropped
///   (0 keeps everything)
///
/// # Example
///
/// ```
/// use urlsdigest::crawler::extract_markdown;
///
/// let html = r#"<html><body><nav>Menu</nav><main><h1>Title</h1><p>Hello</p></main></body></html>"#;
/// let markdown = extract_markdown(html, 0);
/// assert!(markdown.contains("# Title"));
/// assert!(markdown.contains("Hello"));
/// assert!(!markdown.contains("Menu"));
/// ```
pub fn extract_markdown(html: &str, word_count_threshold: usize) -> String {
    let mut document = Html::parse_document(html);
    strip_page_chrome(&mut document);

    let markdown = select_content_roots(&document)
        .iter()
        .map(|root| convert_to_markdown(root).trim().to_string())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    filter_short_paragraphs(&markdown, word_count_threshold)
        .trim()
        .to_string()
}

/// Removes site-level headers, footers and sidebars
///
/// The same elements inside an `article` or `main` belong to the content
/// (an article's own title block, for example) and are kept.
fn strip_page_chrome(document: &mut Html) {
    let Ok(selector) = Selector::parse(PAGE_CHROME) else {
        return;
    };

    let chrome: Vec<_> = document
        .select(&selector)
        .filter(|element| !inside_content_section(element))
        .map(|element| element.id())
        .collect();

    for id in chrome {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

fn inside_content_section(element: &ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| is_content_section(&ancestor))
}

fn is_content_section(element: &ElementRef) -> bool {
    let value = element.value();
    matches!(value.name(), "article" | "main") || value.attr("role") == Some("main")
}

/// Returns the outer HTML of the content roots, in document order
///
/// A `main` region wins. Without one, every top-level `article` is a root,
/// so listing pages keep all their entries. Otherwise the whole `body` is
/// used.
fn select_content_roots(document: &Html) -> Vec<String> {
    if let Some(main) = select_all(document, "main, [role='main']").into_iter().next() {
        return vec![main.html()];
    }

    let articles: Vec<String> = select_all(document, "article")
        .into_iter()
        .filter(|article| {
            !article
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|ancestor| ancestor.value().name() == "article")
        })
        .map(|article| article.html())
        .collect();
    if !articles.is_empty() {
        return articles;
    }

    match select_all(document, "body").into_iter().next() {
        Some(body) => vec![body.html()],
        None => vec![document.root_element().html()],
    }
}

fn select_all<'a>(document: &'a Html, selector: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(selector) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

fn convert_to_markdown(html: &str) -> String {
    let converter = HtmlToMarkdown::builder()
        .skip_tags(SKIPPED_TAGS.to_vec())
        .build();

    match converter.convert(html) {
        Ok(markdown) => markdown,
        Err(e) => {
            tracing::warn!("Markdown conversion failed, falling back to plain text: {}", e);
            plain_text(html)
        }
    }
}

fn plain_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment
        .root_element()
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drops Markdown paragraphs with fewer than `threshold` words
///
/// Headings, list items, block quotes, tables, images and code (fenced or
/// indented) are always kept. A threshold of 0 returns the input unchanged.
pub fn filter_short_paragraphs(markdown: &str, threshold: usize) -> String {
    if threshold == 0 {
        return markdown.to_string();
    }

    let mut kept = Vec::new();
    let mut in_fence = false;

    for block in markdown.split("\n\n") {
        let block = block.trim_matches('\n');
        if block.trim().is_empty() {
            continue;
        }

        let fence_markers = block
            .lines()
            .filter(|line| line.trim_start().starts_with("```"))
            .count();

        let keep = in_fence
            || fence_markers > 0
            || is_structural_block(block)
            || block.split_whitespace().count() >= threshold;

        if fence_markers % 2 == 1 {
            in_fence = !in_fence;
        }

        if keep {
            kept.push(block);
        }
    }

    kept.join("\n\n")
}

/// Returns true for blocks that are structure rather than running prose
fn is_structural_block(block: &str) -> bool {
    if block.starts_with("    ") || block.starts_with('\t') {
        return true;
    }

    let line = block.trim_start();
    line.starts_with('#')
        || line.starts_with('>')
        || line.starts_with('|')
        || line.starts_with("- ")
        || line.starts_with("* ")
        || line.starts_with("+ ")
        || line.starts_with("![")
        || is_ordered_list_item(line)
}

fn is_ordered_list_item(line: &str) -> bool {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && (line[digits..].starts_with(". ") || line[digits..].starts_with(") "))
}
