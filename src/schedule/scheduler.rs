use std::collections::HashMap;

use crate::config::RosterConfig;
use super::types::{AssignmentBoard, Availability, Person, PersonStats, Warning, WarningKind, WarningLog};

/// Mutable state for one roster run: board, per-person stats and warnings.
/// The allocator and residual pass are implemented on this type and are the
/// only code that mutates it.
pub struct Scheduler<'a> {
    pub(super) config: &'a RosterConfig,
    pub(super) availability: &'a Availability,
    pub(super) board: AssignmentBoard,
    pub(super) stats: HashMap<Person, PersonStats>,
    pub(super) warnings: WarningLog,
}

/// Finished result of a run.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub board: AssignmentBoard,
    pub stats: HashMap<Person, PersonStats>,
    pub warnings: WarningLog,
}

impl Schedule {
    pub fn stats_for(&self, person: &str) -> Option<&PersonStats> {
        self.stats.get(person)
    }
}

impl<'a> Scheduler<'a> {
    /// # Panics
    ///
    /// Panics if `availability` was not built with the slot and day counts
    /// of `config`. Tables from [`crate::parser::read_availability`] always
    /// match.
    pub fn new(config: &'a RosterConfig, availability: &'a Availability) -> Self {
        let days = config.days.len();
        assert!(
            availability.slot_count() == config.slots.len() && availability.day_count() == days,
            "availability is {}x{} (slots x days) but config has {}x{}",
            availability.slot_count(),
            availability.day_count(),
            config.slots.len(),
            days
        );
        Self {
            config,
            availability,
            board: AssignmentBoard::new(days, config.slots.len()),
            stats: HashMap::new(),
            warnings: WarningLog::default(),
        }
    }

    /// Runs the daily pass followed by the residual pass.
    pub fn run(mut self) -> Schedule {
        self.run_daily_pass();
        self.run_residual_pass();
        log::info!(
            "Roster complete: {} people placed, {} warnings",
            self.stats.values().filter(|s| s.total > 0).count(),
            self.warnings.len()
        );
        self.finish()
    }

    pub fn finish(self) -> Schedule {
        Schedule {
            board: self.board,
            stats: self.stats,
            warnings: self.warnings,
        }
    }

    /// Both caps still leave room for the person on `day`.
    pub fn can_assign(&self, person: &str, day: usize) -> bool {
        match self.stats.get(person) {
            Some(stats) => stats.total < self.config.weekly_cap && stats.daily[day] < self.config.daily_cap,
            None => true,
        }
    }

    pub fn board(&self) -> &AssignmentBoard {
        &self.board
    }

    pub fn stats(&self, person: &str) -> Option<&PersonStats> {
        self.stats.get(person)
    }

    pub fn warnings(&self) -> &WarningLog {
        &self.warnings
    }

    pub(super) fn required(&self, slot: usize) -> u32 {
        self.config.slots[slot].required
    }

    // People without an entry have not been assigned yet.
    pub(super) fn total(&self, person: &str) -> u32 {
        self.stats.get(person).map(|s| s.total).unwrap_or(0)
    }

    pub(super) fn days_served(&self, person: &str) -> usize {
        self.stats.get(person).map(|s| s.days_served()).unwrap_or(0)
    }

    pub(super) fn commit(&mut self, person: &str, day: usize, slot: usize) {
        log::debug!(
            "{}-{}: assigned {}",
            self.config.days[day],
            self.config.slots[slot].name,
            person
        );
        self.board.push(day, slot, person.to_string());
        let days = self.config.days.len();
        self.stats
            .entry(person.to_string())
            .or_insert_with(|| PersonStats::new(days))
            .record(day);
    }

    pub(super) fn warn(&mut self, day: Option<usize>, slot: Option<usize>, kind: WarningKind) {
        let warning = Warning {
            day: day.map(|d| self.config.days[d].clone()),
            slot: slot.map(|s| self.config.slots[s].name.clone()),
            kind,
        };
        self.warnings.push(warning);
    }
}
