// src/treemap/counter.rs

use std::sync::atomic::{AtomicUsize, Ordering};

/// Zählt die noch ausstehenden Knotenschritte einer Zerlegung herunter
#[derive(Debug)]
pub struct CompletionCounter {
    remaining: AtomicUsize,
}

impl CompletionCounter {
    pub fn new(total: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(total),
        }
    }

    /// Meldet einen abgeschlossenen Schritt; gibt den neuen Stand zurück
    pub fn complete_one(&self) -> usize {
        self.complete_many(1)
    }

    /// Meldet `count` abgeschlossene Schritte, z.B. einen übersprungenen Teilbaum
    pub fn complete_many(&self, count: usize) -> usize {
        let previous = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |remaining| {
                Some(remaining.saturating_sub(count))
            })
            .unwrap_or_else(|current| current);
        previous.saturating_sub(count)
    }

    /// Setzt den Zähler auf null, etwa nach einem nicht behebbaren Fehler
    pub fn drain(&self) -> usize {
        self.remaining.swap(0, Ordering::AcqRel)
    }

    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }

    pub fn is_finished(&self) -> bool {
        self.remaining() == 0
    }
}
