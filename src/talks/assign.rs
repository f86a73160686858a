use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use chrono::NaiveTime;
use csv::ReaderBuilder;

use crate::config::{parse_clock, TalksConfig};
use crate::error::RosterResult;
use crate::parser::split_names;
use super::session::{TalkSession, TalkTime};

/// Assistant on-duty table: rows are slots, columns are days.
#[derive(Debug, Clone, Default)]
pub struct AssistantTimetable {
    days: HashSet<String>,
    cells: HashMap<(String, String), Vec<String>>, // (slot, day) -> assistants
}

impl AssistantTimetable {
    /// The first column names the slot; every other header is a day.
    pub fn read<R: Read>(reader: R) -> RosterResult<Self> {
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = reader.headers()?.clone();
        let days: Vec<String> = headers
            .iter()
            .skip(1)
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut timetable = Self {
            days: days.iter().filter(|d| !d.is_empty()).cloned().collect(),
            cells: HashMap::new(),
        };
        for result in reader.records() {
            let record = result?;
            let slot = record.get(0).unwrap_or("").trim();
            if slot.is_empty() {
                continue;
            }
            for (i, day) in days.iter().enumerate() {
                if day.is_empty() {
                    continue;
                }
                let cell = record.get(i + 1).unwrap_or("");
                timetable
                    .cells
                    .insert((slot.to_string(), day.clone()), split_names(cell));
            }
        }
        log::info!(
            "Loaded assistant timetable with {} days and {} cells",
            timetable.days.len(),
            timetable.cells.len()
        );
        Ok(timetable)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> RosterResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::read(file)
    }

    pub fn has_day(&self, day: &str) -> bool {
        self.days.contains(day)
    }

    /// `None` when the day is not a column or the slot has no row.
    pub fn assistants(&self, slot: &str, day: &str) -> Option<&[String]> {
        self.cells
            .get(&(slot.to_string(), day.to_string()))
            .map(|v| v.as_slice())
    }
}

/// Compiled form of [`TalksConfig`].
#[derive(Debug, Clone)]
pub struct TalkRules {
    windows: Vec<(NaiveTime, NaiveTime, String)>,
    evening_from: NaiveTime,
    evening_slot: String,
    assistants_per_talk: usize,
    placeholder: String,
    manual_marker: String,
    skipped_marker: String,
    skip_venues: Vec<String>,
}

impl TalkRules {
    pub fn from_config(config: &TalksConfig) -> RosterResult<Self> {
        let windows = config
            .windows
            .iter()
            .map(|w| -> RosterResult<_> {
                Ok((parse_clock(&w.start)?, parse_clock(&w.end)?, w.slot.clone()))
            })
            .collect::<RosterResult<Vec<_>>>()?;
        Ok(Self {
            windows,
            evening_from: parse_clock(&config.evening_from)?,
            evening_slot: config.evening_slot.clone(),
            assistants_per_talk: config.assistants_per_talk,
            placeholder: config.placeholder.clone(),
            manual_marker: config.manual_marker.clone(),
            skipped_marker: config.skipped_marker.clone(),
            skip_venues: config
                .skip_venues
                .iter()
                .filter(|v| !v.trim().is_empty())
                .cloned()
                .collect(),
        })
    }

    /// Duty slot a talk starting at `start` falls into.
    pub fn slot_for(&self, start: NaiveTime) -> Option<&str> {
        self.windows
            .iter()
            .find(|(from, until, _)| *from <= start && start < *until)
            .map(|(_, _, slot)| slot.as_str())
            .or_else(|| (start >= self.evening_from).then_some(self.evening_slot.as_str()))
    }

    /// The assistant cell for one session.
    pub fn assistants_for(
        &self,
        session: &TalkSession,
        time: Option<&TalkTime>,
        timetable: &AssistantTimetable,
    ) -> String {
        if self.skip_venues.iter().any(|v| session.venue.contains(v.as_str())) {
            return self.skipped_marker.clone();
        }
        let weekday = session.weekday.trim();
        let Some(slot) = time.and_then(|t| self.slot_for(t.start)) else {
            return self.manual_marker.clone();
        };
        if !timetable.has_day(weekday) {
            return self.manual_marker.clone();
        }
        let Some(assistants) = timetable.assistants(slot, weekday) else {
            log::warn!("No timetable row for slot '{}', session {} needs manual assignment", slot, session.index);
            return self.manual_marker.clone();
        };

        let mut chosen: Vec<&str> = assistants
            .iter()
            .take(self.assistants_per_talk)
            .map(String::as_str)
            .collect();
        while chosen.len() < self.assistants_per_talk {
            chosen.push(&self.placeholder);
        }
        chosen.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> TalkRules {
        TalkRules::from_config(&TalksConfig::default()).unwrap()
    }

    fn clock(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn timetable() -> AssistantTimetable {
        let csv = "\u{feff},周一,周二\n\
                   1-2节,\"甲（组长）,乙,丙\",丁\n\
                   6-7节,,戊\n";
        AssistantTimetable::read(csv.as_bytes()).unwrap()
    }

    fn session(venue: &str, weekday: &str) -> TalkSession {
        TalkSession {
            index: "1".into(),
            company: "Acme".into(),
            company_type: "民企".into(),
            contact: "王".into(),
            phone: "1".into(),
            venue: venue.into(),
            weekday: weekday.into(),
            starts_at: String::new(),
            ends_at: String::new(),
        }
    }

    fn at(h: u32, m: u32) -> TalkTime {
        TalkTime {
            date: chrono::NaiveDate::from_ymd_opt(2025, 5, 19).unwrap(),
            start: clock(h, m),
            end: clock(h + 1, m),
        }
    }

    #[test]
    fn maps_start_times_to_slots() {
        let rules = rules();
        assert_eq!(rules.slot_for(clock(9, 0)), Some("1-2节"));
        assert_eq!(rules.slot_for(clock(9, 59)), Some("1-2节"));
        assert_eq!(rules.slot_for(clock(10, 0)), None);
        assert_eq!(rules.slot_for(clock(10, 30)), Some("3-5节"));
        assert_eq!(rules.slot_for(clock(16, 30)), Some("8-9节"));
        assert_eq!(rules.slot_for(clock(19, 0)), Some("10-11节"));
        assert_eq!(rules.slot_for(clock(23, 59)), Some("10-11节"));
        assert_eq!(rules.slot_for(clock(13, 0)), None);
    }

    #[test]
    fn takes_first_assistants_in_order() {
        let out = rules().assistants_for(&session("教学楼", "周一"), Some(&at(9, 0)), &timetable());
        assert_eq!(out, "甲, 乙");
    }

    #[test]
    fn pads_with_placeholder() {
        let rules = rules();
        let table = timetable();
        assert_eq!(
            rules.assistants_for(&session("教学楼", "周二"), Some(&at(9, 0)), &table),
            "丁, 备用助理"
        );
        assert_eq!(
            rules.assistants_for(&session("教学楼", "周一"), Some(&at(14, 30)), &table),
            "备用助理, 备用助理"
        );
    }

    #[test]
    fn skipped_venue_wins() {
        let out = rules().assistants_for(&session("麦庐园报告厅", "周一"), None, &timetable());
        assert_eq!(out, " ");
    }

    #[test]
    fn manual_when_lookup_fails() {
        let rules = rules();
        let table = timetable();
        // no slot for the start time
        assert_eq!(
            rules.assistants_for(&session("教学楼", "周一"), Some(&at(13, 0)), &table),
            "需手动分配"
        );
        // unparsed time
        assert_eq!(rules.assistants_for(&session("教学楼", "周一"), None, &table), "需手动分配");
        // unknown weekday
        assert_eq!(
            rules.assistants_for(&session("教学楼", "周六"), Some(&at(9, 0)), &table),
            "需手动分配"
        );
        // slot row missing from the timetable
        assert_eq!(
            rules.assistants_for(&session("教学楼", "周一"), Some(&at(10, 30)), &table),
            "需手动分配"
        );
    }
}
