use std::fmt;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::ReaderBuilder;
use serde::Deserialize;

use crate::error::RosterResult;

/// One recruitment talk as exported from the booking sheet.
#[derive(Debug, Clone, Deserialize)]
pub struct TalkSession {
    #[serde(rename = "场次")]
    pub index: String,
    #[serde(rename = "单位名称")]
    pub company: String,
    #[serde(rename = "单位性质")]
    pub company_type: String,
    #[serde(rename = "联系人")]
    pub contact: String,
    #[serde(rename = "联系电话")]
    pub phone: String,
    #[serde(rename = "招聘地点")]
    pub venue: String,
    #[serde(rename = "星期")]
    pub weekday: String,
    #[serde(rename = "宣讲会开始时间")]
    pub starts_at: String,
    #[serde(rename = "宣讲会结束时间")]
    pub ends_at: String,
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
}

/// Date and start/end clock of a talk. The date comes from the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TalkTime {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TalkTime {
    pub fn parse(starts_at: &str, ends_at: &str) -> Option<Self> {
        let start = parse_datetime(starts_at)?;
        let end = parse_datetime(ends_at)?;
        Some(Self {
            date: start.date(),
            start: start.time(),
            end: end.time(),
        })
    }
}

/// `YYYY-MM-DD HH:MM-HH:MM`
impl fmt::Display for TalkTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.date.format("%Y-%m-%d"),
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

pub fn read_sessions<R: Read>(reader: R) -> RosterResult<Vec<TalkSession>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut sessions = Vec::new();
    for result in reader.deserialize() {
        let session: TalkSession = result?;
        sessions.push(session);
    }
    log::info!("Loaded {} talk sessions", sessions.len());
    Ok(sessions)
}

pub fn load_sessions<P: AsRef<Path>>(path: P) -> RosterResult<Vec<TalkSession>> {
    let file = std::fs::File::open(path)?;
    read_sessions(file)
}
