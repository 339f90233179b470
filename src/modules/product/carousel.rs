use std::num::NonZeroUsize;

/// Cyclic position over a non-empty image list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    len: NonZeroUsize,
    index: usize,
}

impl Carousel {
    pub fn new(len: NonZeroUsize) -> Self {
        Self { len, index: 0 }
    }

    /// Start at `index`, or at the first slot when it is out of range.
    pub fn starting_at(len: NonZeroUsize, index: usize) -> Self {
        let mut carousel = Self::new(len);
        carousel.select(index);
        carousel
    }

    pub fn len(&self) -> usize {
        self.len.get()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Navigation controls are only worth showing with more than one image.
    pub fn has_controls(&self) -> bool {
        self.len() > 1
    }

    pub fn next_index(&self) -> usize {
        (self.index + 1) % self.len()
    }

    pub fn prev_index(&self) -> usize {
        (self.index + self.len() - 1) % self.len()
    }

    pub fn next(&mut self) {
        self.index = self.next_index();
    }

    pub fn prev(&mut self) {
        self.index = self.prev_index();
    }

    /// Jump to `index`; ignored when out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.len() {
            self.index = index;
            true
        } else {
            false
        }
    }
}
