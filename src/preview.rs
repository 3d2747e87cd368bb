//! Full-size image preview.

/// Receives the current set of preview links after every render batch.
pub trait PreviewModule {
    fn refresh(&mut self, links: &[&str]);
}

/// Preview that ignores refreshes (batch export has no viewer).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPreview;

impl PreviewModule for NoPreview {
    fn refresh(&mut self, _links: &[&str]) {}
}

/// Lightbox over the gallery's full-size links.
///
/// Navigation loops at both ends.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Lightbox {
    links: Vec<String>,
    current: Option<usize>,
}

impl Lightbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn links(&self) -> &[String] {
        &self.links
    }

    pub const fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub const fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_link(&self) -> Option<&str> {
        self.current
            .and_then(|idx| self.links.get(idx))
            .map(String::as_str)
    }

    /// Open the preview at `index`. Returns false if there is no such link.
    pub fn open(&mut self, index: usize) -> bool {
        if index >= self.links.len() {
            return false;
        }
        self.current = Some(index);
        true
    }

    pub const fn close(&mut self) {
        self.current = None;
    }

    pub fn next(&mut self) {
        let len = self.links.len();
        if let Some(idx) = self.current.as_mut()
            && len > 0
        {
            *idx = (*idx + 1) % len;
        }
    }

    pub fn prev(&mut self) {
        let len = self.links.len();
        if let Some(idx) = self.current.as_mut()
            && len > 0
        {
            *idx = (*idx + len - 1) % len;
        }
    }
}

impl PreviewModule for Lightbox {
    fn refresh(&mut self, links: &[&str]) {
        self.links = links.iter().map(|link| (*link).to_string()).collect();
        if self.current.is_some_and(|idx| idx >= self.links.len()) {
            self.current = None;
        }
    }
}
