use super::scheduler::Scheduler;
use super::types::WarningKind;

impl<'a> Scheduler<'a> {
    /// Phase 2: walks every observed person in first-seen order and tries to
    /// give them one more seat in a slot that is still short. Daytime slots
    /// are searched day by day first; the evening slot is only tried when no
    /// daytime seat qualifies. Anyone who fits nowhere is logged as
    /// unplaceable, including people already seated by the daily pass.
    pub fn run_residual_pass(&mut self) {
        let availability = self.availability;
        let daytime: Vec<usize> = self.config.daytime_slots().collect();
        let evening: Vec<usize> = self.config.evening_slots().collect();

        let mut placed = 0usize;
        for person in availability.people() {
            let seat = self
                .find_seat(person, &daytime)
                .or_else(|| self.find_seat(person, &evening));
            match seat {
                Some((day, slot)) => {
                    self.commit(person, day, slot);
                    placed += 1;
                }
                None => self.warn(
                    None,
                    None,
                    WarningKind::Unplaceable {
                        person: person.clone(),
                    },
                ),
            }
        }
        log::info!(
            "Residual pass placed {} of {} people",
            placed,
            availability.people().len()
        );
    }

    /// First (day, slot) in day order, then `slots` order, that the person
    /// may take right now.
    fn find_seat(&self, person: &str, slots: &[usize]) -> Option<(usize, usize)> {
        (0..self.config.days.len()).find_map(|day| {
            slots
                .iter()
                .copied()
                .find(|&slot| self.qualifies(person, day, slot))
                .map(|slot| (day, slot))
        })
    }

    fn qualifies(&self, person: &str, day: usize, slot: usize) -> bool {
        self.availability.contains(slot, day, person)
            && self.can_assign(person, day)
            && (self.board.count(day, slot) as u32) < self.required(slot)
            && !self.board.contains(day, slot, person)
    }
}
