// ── Address history ──
//
// Linear back/forward stack of locations. Push drops any forward entries,
// replace rewrites the current one. Navigation returns the location the
// caller must re-hydrate its views from.

use tracing::debug;

use crate::table::address::{AddressChange, HistoryMode, Location};

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Location>,
    index: usize,
}

impl History {
    pub fn new(initial: Location) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
        }
    }

    pub fn current(&self) -> &Location {
        // `entries` is never empty and `index` always points into it.
        &self.entries[self.index]
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn push(&mut self, location: Location) {
        if *self.current() == location {
            return;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(location);
        self.index += 1;
        debug!(location = %self.current(), "history push");
    }

    pub fn replace(&mut self, location: Location) {
        debug!(%location, "history replace");
        self.entries[self.index] = location;
    }

    /// Apply a view-model change against the current location.
    pub fn apply(&mut self, change: &AddressChange) -> &Location {
        let next = change.apply_to(self.current());
        match change.mode {
            HistoryMode::Push => self.push(next),
            HistoryMode::Replace => self.replace(next),
        }
        self.current()
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn back(&mut self) -> Option<&Location> {
        if !self.can_go_back() {
            return None;
        }
        self.index -= 1;
        Some(self.current())
    }

    pub fn forward(&mut self) -> Option<&Location> {
        if !self.can_go_forward() {
            return None;
        }
        self.index += 1;
        Some(self.current())
    }
}
