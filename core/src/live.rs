//! Rolling window behind the real-time view.
//!
//! The caller owns the window and threads it through every update:
//! `window = window.push(reading)`. Nothing here is process-wide.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::series::Series;
use crate::types::{Field, Reading};

/// Points kept per chart on the live page.
pub const DEFAULT_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredWindow")]
pub struct LiveWindow {
    capacity: usize,
    readings: VecDeque<Reading>,
}

/// Wire form of a window; rebuilt through [`LiveWindow::new`] and `push` so a
/// stored state obeys the same capacity rules as a fresh one.
#[derive(Deserialize)]
struct StoredWindow {
    capacity: usize,
    #[serde(default)]
    readings: VecDeque<Reading>,
}

impl From<StoredWindow> for LiveWindow {
    fn from(stored: StoredWindow) -> Self {
        stored
            .readings
            .into_iter()
            .fold(LiveWindow::new(stored.capacity), LiveWindow::push)
    }
}

/// Last known GPS fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
    pub altitude: Option<f64>,
}

impl Default for LiveWindow {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl LiveWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            readings: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends `reading`, evicting the oldest entries beyond capacity.
    #[must_use]
    pub fn push(mut self, reading: Reading) -> Self {
        self.readings.push_back(reading);
        while self.readings.len() > self.capacity {
            self.readings.pop_front();
        }
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn latest(&self) -> Option<&Reading> {
        self.readings.back()
    }

    /// Chart points for `field` in arrival order, oldest first.
    pub fn values(&self, field: Field) -> Vec<Option<f64>> {
        self.readings.iter().map(|r| r.value(field)).collect()
    }

    pub fn series(&self, field: Field) -> Series {
        self.readings.iter().filter_map(|r| r.sample(field)).collect()
    }

    /// Most recent reading that carried both coordinates.
    pub fn position(&self) -> Option<Position> {
        self.readings.iter().rev().find_map(|r| {
            Some(Position {
                lat: r.lat?,
                lon: r.lon?,
                altitude: r.altitude,
            })
        })
    }
}
