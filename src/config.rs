//! Roster configuration.
//!
//! Everything the allocator treats as a constant lives here: the ordered
//! days, the ordered slots with their headcount and evening flag, and the
//! weekly/daily caps. The talk-assistant rules ride along under `[talks]`.
//! All fields default to the built-in vocabulary, so a TOML file only has
//! to name what it changes.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{RosterError, RosterResult};

/// A recurring duty period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotConfig {
    pub name: String,
    pub required: u32,
    #[serde(default)]
    pub evening: bool,
}

impl SlotConfig {
    pub fn new(name: &str, required: u32, evening: bool) -> Self {
        Self {
            name: name.to_string(),
            required,
            evening,
        }
    }
}

/// Maps a talk start time in `[start, end)` onto a duty slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalkWindow {
    pub start: String,
    pub end: String,
    pub slot: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TalksConfig {
    pub assistants_per_talk: usize,
    pub placeholder: String,
    pub manual_marker: String,
    pub skipped_marker: String,
    pub skip_venues: Vec<String>,
    pub evening_slot: String,
    pub evening_from: String,
    pub windows: Vec<TalkWindow>,
}

impl Default for TalksConfig {
    fn default() -> Self {
        let window = |start: &str, end: &str, slot: &str| TalkWindow {
            start: start.to_string(),
            end: end.to_string(),
            slot: slot.to_string(),
        };
        Self {
            assistants_per_talk: 2,
            placeholder: "备用助理".to_string(),
            manual_marker: "需手动分配".to_string(),
            skipped_marker: " ".to_string(),
            skip_venues: vec!["麦庐园".to_string()],
            evening_slot: "10-11节".to_string(),
            evening_from: "18:30".to_string(),
            windows: vec![
                window("09:00", "10:00", "1-2节"),
                window("10:30", "12:00", "3-5节"),
                window("14:30", "15:30", "6-7节"),
                window("16:00", "17:00", "8-9节"),
                window("18:30", "23:59", "10-11节"),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Maximum assignments per person across the week.
    pub weekly_cap: u32,
    /// Maximum assignments per person on a single day.
    pub daily_cap: u32,
    pub days: Vec<String>,
    /// Header of the column that names the slot of each availability row.
    pub slot_column: String,
    pub slots: Vec<SlotConfig>,
    pub talks: TalksConfig,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            weekly_cap: 2,
            daily_cap: 2,
            days: ["周一", "周二", "周三", "周四", "周五"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
            slot_column: "时间".to_string(),
            slots: vec![
                SlotConfig::new("1-2节", 2, false),
                SlotConfig::new("3-5节", 3, false),
                SlotConfig::new("6-7节", 2, false),
                SlotConfig::new("8-9节", 3, false),
                SlotConfig::new("10-11节", 2, true),
            ],
            talks: TalksConfig::default(),
        }
    }
}

impl RosterConfig {
    /// Loads and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> RosterResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> RosterResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> RosterResult<()> {
        if self.weekly_cap == 0 || self.daily_cap == 0 {
            return Err(RosterError::InvalidConfig(
                "caps must be at least 1".to_string(),
            ));
        }
        if self.days.is_empty() {
            return Err(RosterError::InvalidConfig("no days configured".to_string()));
        }
        if self.slots.is_empty() {
            return Err(RosterError::InvalidConfig("no slots configured".to_string()));
        }
        ensure_unique("day", self.days.iter())?;
        ensure_unique("slot", self.slots.iter().map(|s| &s.name))?;

        let talks = &self.talks;
        if self.slot_index(&talks.evening_slot).is_none() {
            return Err(RosterError::InvalidConfig(format!(
                "talk evening slot '{}' is not a configured slot",
                talks.evening_slot
            )));
        }
        parse_clock(&talks.evening_from)?;
        for window in &talks.windows {
            if self.slot_index(&window.slot).is_none() {
                return Err(RosterError::InvalidConfig(format!(
                    "talk window slot '{}' is not a configured slot",
                    window.slot
                )));
            }
            if parse_clock(&window.start)? >= parse_clock(&window.end)? {
                return Err(RosterError::InvalidConfig(format!(
                    "talk window {}-{} is empty",
                    window.start, window.end
                )));
            }
        }
        Ok(())
    }

    pub fn day_index(&self, name: &str) -> Option<usize> {
        self.days.iter().position(|d| d == name)
    }

    pub fn slot_index(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.name == name)
    }

    /// Indices of non-evening slots, in configured order.
    pub fn daytime_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.evening)
            .map(|(i, _)| i)
    }

    pub fn evening_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.evening)
            .map(|(i, _)| i)
    }
}

fn ensure_unique<'a>(what: &str, names: impl Iterator<Item = &'a String>) -> RosterResult<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(RosterError::InvalidConfig(format!(
                "duplicate {} '{}'",
                what, name
            )));
        }
    }
    Ok(())
}

/// Parses `HH:MM` (seconds tolerated).
pub fn parse_clock(value: &str) -> RosterResult<NaiveTime> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| RosterError::InvalidTime {
            value: value.to_string(),
        })
}
