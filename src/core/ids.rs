//! Injizierbare ID- und Zeitquellen für neu erzeugte Beziehungen.

use std::time::{SystemTime, UNIX_EPOCH};

/// Liefert eindeutige, monoton wachsende IDs.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Zähler-basierter Generator: `<prefix>-1`, `<prefix>-2`, …
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Zeitquelle in Epoch-Millisekunden.
pub trait Clock {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

/// Feste Zeit für Tests und reproduzierbare Ausgaben.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}
