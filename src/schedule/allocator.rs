use super::scheduler::Scheduler;
use super::types::WarningKind;

impl<'a> Scheduler<'a> {
    /// Fills up to `required` seats of (day, slot) from its candidates and
    /// returns how many were placed.
    ///
    /// Candidates are ranked once, before any seat is filled, by
    /// (availability count, assignments so far, distinct days served). The
    /// sort is stable so equal keys keep their availability order. Each seat
    /// then takes the highest-ranked candidate still under both caps.
    pub fn allocate(&mut self, day: usize, slot: usize, required: u32) -> u32 {
        let availability = self.availability;
        let candidates = availability.candidates(slot, day);
        if candidates.is_empty() {
            self.warn(Some(day), Some(slot), WarningKind::NoCandidates);
            return 0;
        }

        let mut ranked: Vec<&'a str> = candidates.iter().map(|p| p.as_str()).collect();
        ranked.sort_by_key(|p| {
            (
                availability.availability_count(p),
                self.total(p),
                self.days_served(p),
            )
        });

        let mut assigned: Vec<&str> = Vec::new();
        for _ in 0..required {
            let pick = ranked.iter().copied().find(|p| {
                !assigned.contains(p) && !self.board.contains(day, slot, p) && self.can_assign(p, day)
            });
            match pick {
                Some(person) => {
                    self.commit(person, day, slot);
                    assigned.push(person);
                }
                None => break,
            }
        }

        let count = assigned.len() as u32;
        if count < required {
            self.warn(
                Some(day),
                Some(slot),
                WarningKind::Shortfall {
                    required,
                    assigned: count,
                    candidates: ranked.iter().map(|p| p.to_string()).collect(),
                },
            );
        }
        count
    }

    /// Phase 1: every day, daytime slots in order, then the evening slot.
    pub fn run_daily_pass(&mut self) {
        let daytime: Vec<usize> = self.config.daytime_slots().collect();
        let evening: Vec<usize> = self.config.evening_slots().collect();

        for day in 0..self.config.days.len() {
            for &slot in &daytime {
                self.allocate(day, slot, self.required(slot));
            }
            for &slot in &evening {
                let required = self.required(slot);
                let count = self.allocate(day, slot, required);
                if count > 0 && count < required {
                    self.warn(
                        Some(day),
                        Some(slot),
                        WarningKind::EveningPartial { required, assigned: count },
                    );
                }
            }
        }
        log::info!("Daily pass finished with {} warnings", self.warnings.len());
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{RosterConfig, SlotConfig};
    use crate::schedule::types::{Availability, WarningKind};
    use crate::schedule::Scheduler;

    fn config() -> RosterConfig {
        RosterConfig::default()
    }

    #[test]
    fn fills_seats_in_candidate_order_when_keys_tie() {
        let config = config();
        let mut availability = Availability::new(5, 5);
        availability.insert(0, 0, ["A", "B", "C"]);

        let mut scheduler = Scheduler::new(&config, &availability);
        assert_eq!(scheduler.allocate(0, 0, 2), 2);
        assert_eq!(scheduler.board().assigned(0, 0), ["A", "B"]);
        assert!(scheduler.warnings().is_empty());
    }

    #[test]
    fn scarce_people_rank_first() {
        let config = config();
        let mut availability = Availability::new(5, 5);
        availability.insert(0, 0, ["A", "B", "C"]);
        availability.insert(1, 1, ["A", "B"]);
        availability.insert(2, 2, ["A"]);

        let mut scheduler = Scheduler::new(&config, &availability);
        scheduler.allocate(0, 0, 2);
        assert_eq!(scheduler.board().assigned(0, 0), ["C", "B"]);
    }

    #[test]
    fn prior_assignments_rank_later() {
        let config = config();
        let mut availability = Availability::new(5, 5);
        availability.insert(0, 0, ["A", "B"]);
        availability.insert(1, 1, ["A", "B"]);

        let mut scheduler = Scheduler::new(&config, &availability);
        scheduler.allocate(0, 0, 1);
        assert_eq!(scheduler.board().assigned(0, 0), ["A"]);
        scheduler.allocate(1, 1, 1);
        assert_eq!(scheduler.board().assigned(1, 1), ["B"]);
    }

    #[test]
    fn fewer_days_served_ranks_first() {
        let mut config = config();
        config.weekly_cap = 3;
        let mut availability = Availability::new(5, 5);
        availability.insert(0, 0, ["A"]);
        availability.insert(1, 0, ["A"]);
        availability.insert(2, 0, ["B"]);
        availability.insert(0, 1, ["B"]);
        availability.insert(3, 2, ["B", "A"]);

        let mut scheduler = Scheduler::new(&config, &availability);
        scheduler.allocate(0, 0, 1);
        scheduler.allocate(0, 1, 1);
        scheduler.allocate(0, 2, 1);
        scheduler.allocate(1, 0, 1);
        // Same availability and total; A has served one day, B two.
        assert_eq!(scheduler.stats("A").unwrap().total, 2);
        assert_eq!(scheduler.stats("B").unwrap().total, 2);

        assert_eq!(scheduler.allocate(2, 3, 1), 1);
        assert_eq!(scheduler.board().assigned(2, 3), ["A"]);
    }

    #[test]
    fn ranking_is_fixed_for_the_whole_call() {
        let mut config = config();
        config.weekly_cap = 3;
        let mut availability = Availability::new(5, 5);
        availability.insert(0, 1, ["X"]);
        availability.insert(1, 1, ["X"]);
        availability.insert(0, 0, ["Y"]);
        availability.insert(2, 1, ["Y"]);
        availability.insert(3, 0, ["Y", "X"]);

        let mut scheduler = Scheduler::new(&config, &availability);
        scheduler.allocate(1, 0, 1);
        scheduler.allocate(1, 1, 1);
        scheduler.allocate(0, 0, 1);
        scheduler.allocate(1, 2, 1);

        // X ranks ahead of Y on days served. Once both hold a Monday seat
        // their keys tie and a fresh sort would put Y back in front.
        assert_eq!(scheduler.allocate(0, 3, 3), 2);
        assert_eq!(scheduler.board().assigned(0, 3), ["X", "Y"]);
        let warning = scheduler.warnings().iter().last().unwrap();
        assert_eq!(
            warning.kind,
            WarningKind::Shortfall {
                required: 3,
                assigned: 2,
                candidates: vec!["X".into(), "Y".into()],
            }
        );
    }

    #[test]
    fn shortfall_when_candidates_are_capped() {
        let config = config();
        let mut availability = Availability::new(5, 5);
        availability.insert(0, 0, ["A", "B"]);
        availability.insert(1, 0, ["A", "B", "C"]);
        availability.insert(2, 0, ["A", "B"]);

        let mut scheduler = Scheduler::new(&config, &availability);
        scheduler.allocate(0, 0, 2);
        scheduler.allocate(0, 2, 2);
        // A and B are at the weekly cap, only C is left.
        assert_eq!(scheduler.allocate(0, 1, 3), 1);
        assert_eq!(scheduler.board().assigned(0, 1), ["C"]);

        let warning = scheduler.warnings().iter().last().unwrap();
        assert_eq!(
            warning.kind,
            WarningKind::Shortfall {
                required: 3,
                assigned: 1,
                candidates: vec!["C".into(), "A".into(), "B".into()],
            }
        );
        assert!(warning.to_string().contains("需要3人，实际分配1人"));
    }

    #[test]
    fn empty_cell_warns_and_assigns_nobody() {
        let config = config();
        let availability = Availability::new(5, 5);
        let mut scheduler = Scheduler::new(&config, &availability);
        assert_eq!(scheduler.allocate(2, 3, 3), 0);
        let messages = scheduler.warnings().messages();
        assert_eq!(messages, vec!["周三-8-9节: 无可用值班人员".to_string()]);
    }

    #[test]
    fn daily_cap_is_enforced() {
        let mut config = config();
        config.weekly_cap = 5;
        config.daily_cap = 1;
        let mut availability = Availability::new(5, 5);
        availability.insert(0, 0, ["A"]);
        availability.insert(1, 0, ["A"]);

        let mut scheduler = Scheduler::new(&config, &availability);
        assert_eq!(scheduler.allocate(0, 0, 1), 1);
        assert_eq!(scheduler.allocate(0, 1, 1), 0);
        assert!(!scheduler.can_assign("A", 0));
        assert!(scheduler.can_assign("A", 1));
    }

    #[test]
    fn evening_partial_adds_second_warning() {
        let config = config();
        let mut availability = Availability::new(5, 5);
        availability.insert(4, 0, ["A"]);

        let mut scheduler = Scheduler::new(&config, &availability);
        scheduler.run_daily_pass();

        let monday_evening: Vec<_> = scheduler
            .warnings()
            .iter()
            .filter(|w| w.day.as_deref() == Some("周一") && w.slot.as_deref() == Some("10-11节"))
            .map(|w| w.kind.clone())
            .collect();
        assert_eq!(monday_evening.len(), 2);
        assert!(matches!(monday_evening[0], WarningKind::Shortfall { .. }));
        assert_eq!(
            monday_evening[1],
            WarningKind::EveningPartial { required: 2, assigned: 1 }
        );
    }

    #[test]
    fn daytime_slots_run_before_evening() {
        let mut config = config();
        config.slots = vec![
            SlotConfig::new("night", 1, true),
            SlotConfig::new("day", 1, false),
        ];
        config.weekly_cap = 1;
        let mut availability = Availability::new(2, 5);
        availability.insert(0, 0, ["A"]);
        availability.insert(1, 0, ["A"]);

        let mut scheduler = Scheduler::new(&config, &availability);
        scheduler.run_daily_pass();
        assert_eq!(scheduler.board().assigned(0, 1), ["A"]);
        assert!(scheduler.board().assigned(0, 0).is_empty());
    }
}
