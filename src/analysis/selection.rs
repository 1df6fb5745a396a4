//! Year selection state.
//!
//! Every selection is stamped with a generation number. A computation
//! started for an older selection is discarded when it completes, so a
//! slow request can never overwrite the breakdown of a newer one.

use crate::analysis::aggregate_titles_for_year;
use crate::models::{TitleBreakdown, ValidRow};
use tracing::debug;

/// Which year, if any, the user has selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Unselected,
    Selected(u32),
}

impl SelectionState {
    pub fn year(self) -> Option<u32> {
        match self {
            SelectionState::Selected(year) => Some(year),
            SelectionState::Unselected => None,
        }
    }
}

/// Handle for one initiated selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionTicket {
    generation: u64,
    year: u32,
}

impl SelectionTicket {
    pub fn year(&self) -> u32 {
        self.year
    }
}

/// Tracks the selected year and which request is the latest.
#[derive(Debug, Default)]
pub struct SelectionController {
    state: SelectionState,
    generation: u64,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Select `year` and issue a ticket that supersedes all earlier ones.
    pub fn begin(&mut self, year: u32) -> SelectionTicket {
        self.generation += 1;
        self.state = SelectionState::Selected(year);
        debug!("Selection #{} started for {}", self.generation, year);

        SelectionTicket {
            generation: self.generation,
            year,
        }
    }

    /// True if no selection was started after `ticket`.
    pub fn is_current(&self, ticket: &SelectionTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Compute the breakdown for `ticket`, or `None` if it was superseded.
    pub fn complete(
        &self,
        ticket: SelectionTicket,
        rows: &[ValidRow],
    ) -> Option<Vec<TitleBreakdown>> {
        if !self.is_current(&ticket) {
            debug!(
                "Discarding selection #{} for {} (latest is #{})",
                ticket.generation, ticket.year, self.generation
            );
            return None;
        }

        Some(aggregate_titles_for_year(rows, ticket.year))
    }

    /// Select `year` and compute its breakdown immediately.
    ///
    /// Always recomputes, even if `year` is already selected.
    pub fn select(&mut self, rows: &[ValidRow], year: u32) -> Vec<TitleBreakdown> {
        let ticket = self.begin(year);
        aggregate_titles_for_year(rows, ticket.year)
    }
}
