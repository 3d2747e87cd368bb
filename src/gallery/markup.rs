use crate::api::ImageResult;
use crate::preview::PreviewModule;

use super::GalleryRenderer;

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
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

/// Markup for a single photo card.
pub fn card_markup(item: &ImageResult) -> String {
    let full = escape_html(&item.full_image_url);
    let thumb = escape_html(&item.thumbnail_url);
    let alt = escape_html(&item.tags);
    let mut out = String::new();
    out.push_str("<div class=\"photo-card\">\n");
    out.push_str(&format!("  <a href=\"{full}\">\n"));
    out.push_str(&format!(
        "    <img class=\"photo-img\" src=\"{thumb}\" alt=\"{alt}\" loading=\"lazy\" />\n"
    ));
    out.push_str("  </a>\n");
    out.push_str("  <div class=\"info\">\n");
    for (label, value) in [
        ("Likes", item.likes),
        ("Views", item.views),
        ("Downloads", item.downloads),
    ] {
        out.push_str(&format!(
            "    <p class=\"info-item\"><b>{label}</b><span class=\"info__span\">{value}</span></p>\n"
        ));
    }
    out.push_str("  </div>\n");
    out.push_str("</div>\n");
    out
}

/// Gallery rendered as HTML card markup.
#[derive(Debug, Default, Clone)]
pub struct HtmlGallery<P> {
    markup: String,
    links: Vec<String>,
    preview: P,
}

impl<P: PreviewModule> HtmlGallery<P> {
    pub const fn new(preview: P) -> Self {
        Self {
            markup: String::new(),
            links: Vec::new(),
            preview,
        }
    }

    /// Inner markup of the gallery container.
    pub fn container_markup(&self) -> &str {
        &self.markup
    }

    /// Standalone HTML page wrapping the gallery.
    pub fn document(&self, title: &str) -> String {
        let title = escape_html(title);
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\" />\n\
             <title>{title}</title>\n<style>\n{STYLE}</style>\n</head>\n<body>\n\
             <h1>{title}</h1>\n<div class=\"gallery\">\n{}</div>\n</body>\n</html>\n",
            self.markup
        )
    }
}

impl<P: PreviewModule> GalleryRenderer for HtmlGallery<P> {
    fn render(&mut self, items: &[ImageResult]) -> Option<usize> {
        for item in items {
            self.markup.push_str(&card_markup(item));
            self.links.push(item.full_image_url.clone());
        }
        let links: Vec<&str> = self.links.iter().map(String::as_str).collect();
        self.preview.refresh(&links);
        self.links.len().checked_sub(1)
    }

    fn clear(&mut self) {
        self.markup.clear();
        self.links.clear();
        self.preview.refresh(&[]);
    }

    fn len(&self) -> usize {
        self.links.len()
    }
}

const STYLE: &str = "\
body { font-family: sans-serif; margin: 24px; }
.gallery { display: flex; flex-wrap: wrap; gap: 24px; }
.photo-card { width: 360px; border: 1px solid #ddd; border-radius: 4px; overflow: hidden; }
.photo-img { display: block; width: 100%; height: 240px; object-fit: cover; }
.info { display: flex; justify-content: space-around; padding: 8px 0; }
.info-item { display: flex; flex-direction: column; align-items: center; margin: 0; }
";
