//! Downloaded preview image cache.

use std::collections::{HashMap, VecDeque};

use image::DynamicImage;

/// Decoded full-size images keyed by URL, oldest evicted first.
#[derive(Debug, Default)]
pub struct ImageCache {
    entries: HashMap<String, DynamicImage>,
    order: VecDeque<String>,
    max_size: usize,
}

impl ImageCache {
    /// Create a new image cache with the given maximum number of entries.
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_size,
        }
    }

    pub fn get(&self, url: &str) -> Option<&DynamicImage> {
        self.entries.get(url)
    }

    pub fn insert(&mut self, url: String, image: DynamicImage) {
        if self.entries.contains_key(&url) {
            self.entries.insert(url, image);
            return;
        }

        self.order.push_back(url.clone());
        self.entries.insert(url, image);

        while self.entries.len() > self.max_size {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            } else {
                break;
            }
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
