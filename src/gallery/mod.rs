//! Result cards.
//!
//! A [`GalleryRenderer`] appends one card per [`ImageResult`] and tells its
//! preview module about the new links. [`CardGrid`] keeps the cards for the
//! terminal grid; [`HtmlGallery`] builds escaped markup.

mod markup;

pub use markup::{HtmlGallery, card_markup, escape_html};

use crate::api::ImageResult;
use crate::preview::PreviewModule;

/// Append-only card container.
pub trait GalleryRenderer {
    /// Append one card per item, in order.
    ///
    /// Returns the index of the last card after appending, or `None` when the
    /// gallery is still empty.
    fn render(&mut self, items: &[ImageResult]) -> Option<usize>;

    /// Remove every card.
    fn clear(&mut self);

    /// Number of cards currently rendered.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cards kept as data for the terminal grid.
#[derive(Debug, Default, Clone)]
pub struct CardGrid<P> {
    cards: Vec<ImageResult>,
    preview: P,
}

impl<P: PreviewModule> CardGrid<P> {
    pub const fn new(preview: P) -> Self {
        Self {
            cards: Vec::new(),
            preview,
        }
    }

    pub fn cards(&self) -> &[ImageResult] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&ImageResult> {
        self.cards.get(index)
    }

    pub const fn preview(&self) -> &P {
        &self.preview
    }

    pub const fn preview_mut(&mut self) -> &mut P {
        &mut self.preview
    }

    fn refresh_preview(&mut self) {
        let links: Vec<&str> = self
            .cards
            .iter()
            .map(|card| card.full_image_url.as_str())
            .collect();
        self.preview.refresh(&links);
    }
}

impl<P: PreviewModule> GalleryRenderer for CardGrid<P> {
    fn render(&mut self, items: &[ImageResult]) -> Option<usize> {
        self.cards.extend_from_slice(items);
        self.refresh_preview();
        self.cards.len().checked_sub(1)
    }

    fn clear(&mut self) {
        self.cards.clear();
        self.refresh_preview();
    }

    fn len(&self) -> usize {
        self.cards.len()
    }
}

/// Rows needed to lay out `cards` cards in `columns` columns.
pub const fn grid_rows(cards: usize, columns: usize) -> usize {
    if columns == 0 {
        return 0;
    }
    cards.div_ceil(columns)
}
