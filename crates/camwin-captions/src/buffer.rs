use std::{collections::VecDeque, num::NonZeroUsize};

/// One line of text produced by the captioner for a single frame.
///
/// Captions are intentionally not `Clone`: a caption lives in exactly one
/// buffer slot and is moved, never copied, when it overflows into another
/// buffer.
#[derive(Debug, PartialEq, Eq)]
pub struct Caption(Box<str>);

impl Caption {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into().into_boxed_str())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Caption {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Caption {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl PartialEq<&str> for Caption {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// Capacity-bounded FIFO of captions.
///
/// Appending to a full buffer evicts the oldest caption, so the buffer
/// always holds the most recent `capacity` captions in insertion order.
#[derive(Debug)]
pub struct CaptionBuffer {
    entries: VecDeque<Caption>,
    capacity: NonZeroUsize,
    total_added: u64,
}

impl CaptionBuffer {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.get()),
            capacity,
            total_added: 0,
        }
    }

    /// Appends `caption` and returns the evicted oldest caption, if the
    /// buffer was already full.
    pub fn push(&mut self, caption: Caption) -> Option<Caption> {
        self.entries.push_back(caption);
        self.total_added += 1;

        if self.entries.len() > self.capacity.get() {
            self.entries.pop_front()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Number of captions ever pushed, including evicted ones.
    pub fn total_added(&self) -> u64 {
        self.total_added
    }

    /// Iterates from the oldest to the newest caption.
    pub fn iter(
        &self,
    ) -> impl DoubleEndedIterator<Item = &Caption> + ExactSizeIterator + Clone + '_ {
        self.entries.iter()
    }

    /// Iterates caption texts from the oldest to the newest.
    pub fn texts(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator + Clone + '_ {
        self.entries.iter().map(Caption::as_str)
    }
}

/// A primary caption buffer whose evictions overflow into a secondary one.
///
/// Both halves share the same capacity. A caption pushed out of the primary
/// is moved to the tail of the secondary; the secondary then drops its own
/// oldest entry if it is over capacity. No caption is ever held by both.
#[derive(Debug)]
pub struct DualCaptionBuffer {
    primary: CaptionBuffer,
    secondary: CaptionBuffer,
}

impl DualCaptionBuffer {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            primary: CaptionBuffer::new(capacity),
            secondary: CaptionBuffer::new(capacity),
        }
    }

    /// Appends `caption` to the primary buffer and returns the caption that
    /// fell out of the secondary buffer, if any.
    pub fn push(&mut self, caption: Caption) -> Option<Caption> {
        let overflow = self.primary.push(caption)?;
        self.secondary.push(overflow)
    }

    pub fn primary(&self) -> &CaptionBuffer {
        &self.primary
    }

    pub fn secondary(&self) -> &CaptionBuffer {
        &self.secondary
    }

    /// Number of captions held by both buffers together.
    pub fn len(&self) -> usize {
        self.primary.len() + self.secondary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    /// Number of captions ever pushed into the primary buffer.
    pub fn total_added(&self) -> u64 {
        self.primary.total_added()
    }
}
