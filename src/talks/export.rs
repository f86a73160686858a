use std::path::Path;

use csv::Writer;
use serde::Serialize;

use crate::error::RosterResult;
use super::assign::{AssistantTimetable, TalkRules};
use super::session::{TalkSession, TalkTime};

/// A session row of the contact sheet, with the talk window collapsed into
/// one column and the assistants appended.
#[derive(Debug, Clone, Serialize)]
pub struct TalkRow {
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
    #[serde(rename = "宣讲时间")]
    pub time: String,
    #[serde(rename = "对接助理")]
    pub assistants: String,
}

pub fn build_talk_rows(
    sessions: &[TalkSession],
    timetable: &AssistantTimetable,
    rules: &TalkRules,
) -> Vec<TalkRow> {
    sessions
        .iter()
        .map(|session| {
            let time = TalkTime::parse(&session.starts_at, &session.ends_at);
            let time_text = match &time {
                Some(t) => t.to_string(),
                None => {
                    log::warn!(
                        "Session {}: could not parse '{}' - '{}'",
                        session.index,
                        session.starts_at,
                        session.ends_at
                    );
                    format!("{}-{}", session.starts_at.trim(), session.ends_at.trim())
                }
            };
            TalkRow {
                index: session.index.clone(),
                company: session.company.clone(),
                company_type: session.company_type.clone(),
                contact: session.contact.clone(),
                phone: session.phone.clone(),
                venue: session.venue.clone(),
                weekday: session.weekday.clone(),
                time: time_text,
                assistants: rules.assistants_for(session, time.as_ref(), timetable),
            }
        })
        .collect()
}

pub fn write_talk_rows<P: AsRef<Path>>(rows: &[TalkRow], path: P) -> RosterResult<()> {
    let mut writer = Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
