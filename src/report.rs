//! Read-only view of a finished roster, shaped for output.

use serde::Serialize;

use crate::config::RosterConfig;
use crate::schedule::{Availability, Person, Schedule, Scheduler};

pub const EVENING_SHORT_MARKER: &str = "（晚间人手不足）";

#[derive(Debug, Clone, Serialize)]
pub struct GridCell {
    pub day: String,
    pub assigned: Vec<Person>,
    /// Comma-joined names plus a shortfall marker, as shown in the grid.
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GridRow {
    pub slot: String,
    pub required: u32,
    pub cells: Vec<GridCell>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PersonSummary {
    pub name: Person,
    pub total: u32,
    pub days_served: usize,
    pub days: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RosterReport {
    pub days: Vec<String>,
    pub grid: Vec<GridRow>,
    pub people: Vec<PersonSummary>,
    pub warnings: Vec<String>,
}

impl RosterReport {
    pub fn build(schedule: &Schedule, availability: &Availability, config: &RosterConfig) -> Self {
        let grid = config
            .slots
            .iter()
            .enumerate()
            .map(|(slot, slot_config)| GridRow {
                slot: slot_config.name.clone(),
                required: slot_config.required,
                cells: config
                    .days
                    .iter()
                    .enumerate()
                    .map(|(day, day_name)| {
                        let assigned = schedule.board.assigned(day, slot).to_vec();
                        let status = cell_status(&assigned, slot_config.required, slot_config.evening);
                        GridCell {
                            day: day_name.clone(),
                            assigned,
                            status,
                        }
                    })
                    .collect(),
            })
            .collect();

        let mut names: Vec<&Person> = availability.people().iter().collect();
        names.sort();
        let people = names
            .into_iter()
            .map(|name| match schedule.stats_for(name) {
                Some(stats) => PersonSummary {
                    name: name.clone(),
                    total: stats.total,
                    days_served: stats.days_served(),
                    days: stats.served_days().map(|d| config.days[d].clone()).collect(),
                },
                None => PersonSummary {
                    name: name.clone(),
                    total: 0,
                    days_served: 0,
                    days: Vec::new(),
                },
            })
            .collect();

        Self {
            days: config.days.clone(),
            grid,
            people,
            warnings: schedule.warnings.messages(),
        }
    }

    /// Rows of the grid sheet: header `时间, <days...>`, then one row per slot.
    pub fn grid_table(&self) -> Vec<Vec<String>> {
        let mut rows = Vec::with_capacity(self.grid.len() + 1);
        let mut header = vec!["时间".to_string()];
        header.extend(self.days.iter().cloned());
        rows.push(header);
        for row in &self.grid {
            let mut line = vec![row.slot.clone()];
            line.extend(row.cells.iter().map(|c| c.status.clone()));
            rows.push(line);
        }
        rows
    }

    pub fn stats_table(&self) -> Vec<Vec<String>> {
        let mut rows = vec![vec![
            "姓名".to_string(),
            "总值班次数".to_string(),
            "值班天数".to_string(),
            "具体日期".to_string(),
        ]];
        for person in &self.people {
            rows.push(vec![
                person.name.clone(),
                person.total.to_string(),
                person.days_served.to_string(),
                person.days.join(", "),
            ]);
        }
        rows
    }

    /// `None` when there is nothing to warn about, so the sheet is omitted.
    pub fn warning_table(&self) -> Option<Vec<Vec<String>>> {
        if self.warnings.is_empty() {
            return None;
        }
        let mut rows = vec![vec!["警告信息".to_string()]];
        rows.extend(self.warnings.iter().map(|w| vec![w.clone()]));
        Some(rows)
    }
}

fn cell_status(assigned: &[Person], required: u32, evening: bool) -> String {
    let mut status = assigned.join(",");
    let count = assigned.len() as u32;
    if count < required {
        if evening && count >= 1 {
            status.push_str(EVENING_SHORT_MARKER);
        } else {
            status.push_str(&format!("（需补{}人）", required - count));
        }
    }
    status
}

/// Runs both phases over `availability` and builds the report.
pub fn build_roster(availability: &Availability, config: &RosterConfig) -> RosterReport {
    let schedule = Scheduler::new(config, availability).run();
    RosterReport::build(&schedule, availability, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_markers() {
        let names = |n: &[&str]| n.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(cell_status(&names(&["A", "B"]), 2, false), "A,B");
        assert_eq!(cell_status(&names(&["A"]), 3, false), "A（需补2人）");
        assert_eq!(cell_status(&names(&[]), 2, false), "（需补2人）");
        assert_eq!(cell_status(&names(&["A"]), 2, true), "A（晚间人手不足）");
        assert_eq!(cell_status(&names(&[]), 2, true), "（需补2人）");
    }

    #[test]
    fn warning_table_is_omitted_when_empty() {
        let config = RosterConfig::default();
        let mut availability = Availability::new(5, 5);
        for slot in 0..5 {
            for day in 0..5 {
                let names: Vec<String> = (0..config.slots[slot].required)
                    .map(|i| format!("P{}-{}-{}", slot, day, i))
                    .collect();
                availability.insert(slot, day, names);
            }
        }
        // A fully staffed daily pass leaves nothing to report.
        let mut scheduler = Scheduler::new(&config, &availability);
        scheduler.run_daily_pass();
        let report = RosterReport::build(&scheduler.finish(), &availability, &config);
        assert!(report.warning_table().is_none());
        assert_eq!(report.grid_table().len(), 6);
        assert_eq!(report.stats_table().len(), 1 + availability.people().len());
    }

    #[test]
    fn stats_are_sorted_by_name_and_list_days() {
        let config = RosterConfig::default();
        let mut availability = Availability::new(5, 5);
        availability.insert(0, 2, ["B", "A"]);
        availability.insert(1, 0, ["B"]);

        let report = build_roster(&availability, &config);
        let names: Vec<&str> = report.people.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);

        let b = &report.people[1];
        assert_eq!(b.total, 2);
        assert_eq!(b.days_served, 2);
        assert_eq!(b.days, vec!["周一", "周三"]);
        assert_eq!(report.stats_table()[2][3], "周一, 周三");
        assert!(report.warning_table().is_some());
    }
}
