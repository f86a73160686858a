use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

pub type Person = String;

/// Who may serve in each (slot, day). Built once from input, read-only after.
#[derive(Debug, Clone, Serialize)]
pub struct Availability {
    cells: Vec<Vec<Vec<Person>>>, // [slot][day] -> candidates
    people: Vec<Person>,          // first-seen order
    counts: HashMap<Person, u32>,
}

impl Availability {
    pub fn new(slot_count: usize, day_count: usize) -> Self {
        Self {
            cells: vec![vec![Vec::new(); day_count]; slot_count],
            people: Vec::new(),
            counts: HashMap::new(),
        }
    }

    /// Adds candidates to a cell. Names already present in the cell are
    /// skipped, so each (slot, day) counts at most once toward a person's
    /// availability count.
    pub fn insert<I, S>(&mut self, slot: usize, day: usize, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<Person>,
    {
        let cell = &mut self.cells[slot][day];
        for name in names {
            let name = name.into();
            if cell.contains(&name) {
                continue;
            }
            let count = self.counts.entry(name.clone()).or_insert(0);
            if *count == 0 {
                self.people.push(name.clone());
            }
            *count += 1;
            cell.push(name);
        }
    }

    pub fn candidates(&self, slot: usize, day: usize) -> &[Person] {
        &self.cells[slot][day]
    }

    pub fn contains(&self, slot: usize, day: usize, person: &str) -> bool {
        self.cells[slot][day].iter().any(|p| p == person)
    }

    /// Number of (slot, day) cells the person appears in.
    pub fn availability_count(&self, person: &str) -> u32 {
        self.counts.get(person).copied().unwrap_or(0)
    }

    /// Every person observed, in first-seen order.
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn slot_count(&self) -> usize {
        self.cells.len()
    }

    pub fn day_count(&self) -> usize {
        self.cells.first().map(|row| row.len()).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonStats {
    pub total: u32,
    pub daily: Vec<u32>, // indexed by day
}

impl PersonStats {
    pub fn new(day_count: usize) -> Self {
        Self {
            total: 0,
            daily: vec![0; day_count],
        }
    }

    /// Days with at least one assignment.
    pub fn served_days(&self) -> impl Iterator<Item = usize> + '_ {
        self.daily
            .iter()
            .enumerate()
            .filter(|(_, &n)| n > 0)
            .map(|(day, _)| day)
    }

    pub fn days_served(&self) -> usize {
        self.served_days().count()
    }

    pub(crate) fn record(&mut self, day: usize) {
        self.total += 1;
        self.daily[day] += 1;
    }
}

/// Assigned people per (day, slot), in assignment order.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentBoard {
    cells: Vec<Vec<Vec<Person>>>, // [day][slot]
}

impl AssignmentBoard {
    pub fn new(day_count: usize, slot_count: usize) -> Self {
        Self {
            cells: vec![vec![Vec::new(); slot_count]; day_count],
        }
    }

    pub fn assigned(&self, day: usize, slot: usize) -> &[Person] {
        &self.cells[day][slot]
    }

    pub fn count(&self, day: usize, slot: usize) -> usize {
        self.cells[day][slot].len()
    }

    pub fn contains(&self, day: usize, slot: usize, person: &str) -> bool {
        self.cells[day][slot].iter().any(|p| p == person)
    }

    /// True if the person holds any seat anywhere on the board.
    pub fn is_assigned(&self, person: &str) -> bool {
        self.cells
            .iter()
            .flatten()
            .any(|cell| cell.iter().any(|p| p == person))
    }

    pub(crate) fn push(&mut self, day: usize, slot: usize, person: Person) {
        self.cells[day][slot].push(person);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WarningKind {
    NoCandidates,
    Shortfall {
        required: u32,
        assigned: u32,
        candidates: Vec<Person>,
    },
    EveningPartial {
        required: u32,
        assigned: u32,
    },
    Unplaceable {
        person: Person,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub day: Option<String>,
    pub slot: Option<String>,
    #[serde(flatten)]
    pub kind: WarningKind,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let day = self.day.as_deref().unwrap_or("");
        let slot = self.slot.as_deref().unwrap_or("");
        match &self.kind {
            WarningKind::NoCandidates => write!(f, "{}-{}: 无可用值班人员", day, slot),
            WarningKind::Shortfall {
                required,
                assigned,
                candidates,
            } => write!(
                f,
                "{}-{}: 需要{}人，实际分配{}人 (候选：{:?})",
                day, slot, required, assigned, candidates
            ),
            WarningKind::EveningPartial { required, assigned } => write!(
                f,
                "{}-{}: 晚间时段分配不足（{}/{}）",
                day, slot, assigned, required
            ),
            WarningKind::Unplaceable { person } => {
                write!(f, "无法为 {} 安排值班，请检查可用时间", person)
            }
        }
    }
}

/// Append-only record of everything the allocator could not satisfy.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct WarningLog {
    entries: Vec<Warning>,
}

impl WarningLog {
    pub(crate) fn push(&mut self, warning: Warning) {
        log::warn!("{}", warning);
        self.entries.push(warning);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Warning> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries.iter().map(|w| w.to_string()).collect()
    }
}
