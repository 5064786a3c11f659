//! Informational messages shown above the picker.
//!
//! A new message is drawn uniformly at random every time the picker
//! presentation is switched.

use rand::Rng;

/// Messages shown above the picker.
pub const MESSAGES: [&str; 9] = [
    "Free lighting what's up",
    "This one really brings out your eyes",
    "Change the background color of your screen, or screens 😎 open another window!",
    "Inspired by Julie Schiro's \"secret monitor hack\". Thank you Julie!",
    "soft light, for everyone",
    "soft light, it's lit (travis scott reverb)",
    "Look how beautiful you are!",
    "\"When will my reflection show, who I am, inside.\"",
    "Free video conferencing lighting",
];

/// Chooses which message to show next.
pub trait MessageSource: Send {
    /// Index in `0..count`. `count` is never zero.
    fn next_index(&mut self, count: usize) -> usize;
}

/// Uniform random choice using the thread RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomMessages;

impl MessageSource for RandomMessages {
    fn next_index(&mut self, count: usize) -> usize {
        rand::thread_rng().gen_range(0..count)
    }
}

/// Cycles through a fixed sequence of indices. Used for deterministic runs.
#[derive(Debug, Clone)]
pub struct SequenceMessages {
    indices: Vec<usize>,
    pos: usize,
}

impl SequenceMessages {
    /// Source yielding `indices` in order, repeating.
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices, pos: 0 }
    }
}

impl MessageSource for SequenceMessages {
    fn next_index(&mut self, count: usize) -> usize {
        if self.indices.is_empty() {
            return 0;
        }
        let index = self.indices[self.pos % self.indices.len()];
        self.pos += 1;
        index % count
    }
}
