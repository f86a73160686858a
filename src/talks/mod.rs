//! Pairs recruitment-talk sessions with on-duty assistants.

pub mod session;
pub mod assign;
pub mod export;

pub use session::{load_sessions, read_sessions, TalkSession, TalkTime};
pub use assign::{AssistantTimetable, TalkRules};
pub use export::{build_talk_rows, write_talk_rows, TalkRow};
