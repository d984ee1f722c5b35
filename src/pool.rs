//! Stopped hearts waiting to be reused.

use std::collections::VecDeque;

use crate::heart::HeartParticle;

/// FIFO of stopped hearts: the first one stopped is the first one reused.
#[derive(Debug, Default)]
pub struct ParticlePool {
    hearts: VecDeque<HeartParticle>,
}

impl ParticlePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a heart; it is stopped if it was still running.
    pub fn push(&mut self, mut heart: HeartParticle) {
        heart.stop();
        self.hearts.push_back(heart);
    }

    pub fn pop(&mut self) -> Option<HeartParticle> {
        self.hearts.pop_front()
    }

    pub fn len(&self) -> usize {
        self.hearts.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.hearts.is_empty()
    }
}
