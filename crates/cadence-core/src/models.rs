use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    #[serde(with = "uuid::serde::compact")]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum Priority {
    None,
    Low,
    Medium,
    High,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid priority: {0}")]
pub struct ParsePriorityError(String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Priority::None),
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}

/// Fixed-interval step of a recurrence rule. `None` is the terminal state
/// for standalone occurrences and for occurrences severed from a series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum RecurrenceKind {
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl std::fmt::Display for RecurrenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecurrenceKind::None => write!(f, "none"),
            RecurrenceKind::Daily => write!(f, "daily"),
            RecurrenceKind::Weekly => write!(f, "weekly"),
            RecurrenceKind::Monthly => write!(f, "monthly"),
            RecurrenceKind::Yearly => write!(f, "yearly"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid recurrence kind: {0}")]
pub struct ParseRecurrenceKindError(String);

impl FromStr for RecurrenceKind {
    type Err = ParseRecurrenceKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(RecurrenceKind::None),
            "daily" => Ok(RecurrenceKind::Daily),
            "weekly" => Ok(RecurrenceKind::Weekly),
            "monthly" => Ok(RecurrenceKind::Monthly),
            "yearly" => Ok(RecurrenceKind::Yearly),
            _ => Err(ParseRecurrenceKindError(s.to_string())),
        }
    }
}

/// A recurrence rule: the step kind plus the optional bounds. `until` is
/// inclusive; `count` is capped at [`crate::recurrence::OCCURRENCE_CAP`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Recurrence {
    #[sqlx(rename = "recurrence_kind")]
    pub kind: RecurrenceKind,
    #[sqlx(rename = "recurrence_until")]
    pub until: Option<DateTime<Utc>>,
    #[sqlx(rename = "recurrence_count")]
    pub count: Option<u32>,
}

impl Recurrence {
    pub fn none() -> Self {
        Self {
            kind: RecurrenceKind::None,
            until: None,
            count: None,
        }
    }

    pub fn every(kind: RecurrenceKind) -> Self {
        Self {
            kind,
            until: None,
            count: None,
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.kind != RecurrenceKind::None
    }
}

impl Default for Recurrence {
    fn default() -> Self {
        Self::none()
    }
}

/// One concrete, dated event instance, whether standalone or part of a
/// series.
///
/// Series invariants:
/// - `series_id` set ⇔ `is_series_member` ⇔ `series_position` defined
/// - positions within one series are unique and contiguous from 0
/// - `completed` ⇔ `completed_at` is set
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Occurrence {
    pub id: Uuid,
    pub name: String,
    pub notes: Option<String>,
    pub location: Option<String>,
    pub participants: Json<Vec<String>>,
    pub tags: Json<Vec<String>>,
    pub priority: Priority,
    pub color: Option<String>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    #[sqlx(flatten)]
    pub recurrence: Recurrence,
    pub series_id: Option<Uuid>,
    pub series_position: Option<u32>,
    pub is_series_member: bool,
    pub project_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Occurrence {
    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_recurring()
    }

    /// Fixed duration of this occurrence, when both timestamps are set.
    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.start_at, self.end_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

impl Default for Occurrence {
    fn default() -> Self {
        Self {
            id: Uuid::now_v7(),
            name: "".to_string(),
            notes: None,
            location: None,
            participants: Json(Vec::new()),
            tags: Json(Vec::new()),
            priority: Priority::None,
            color: None,
            start_at: None,
            end_at: None,
            completed: false,
            completed_at: None,
            recurrence: Recurrence::none(),
            series_id: None,
            series_position: None,
            is_series_member: false,
            project_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

/// The template an edit or create submission carries: every user-editable
/// field of an occurrence, before ids and series bookkeeping are applied.
#[derive(Debug, Clone, Default)]
pub struct OccurrenceDraft {
    pub name: String,
    pub notes: Option<String>,
    pub location: Option<String>,
    pub participants: Vec<String>,
    pub tags: Vec<String>,
    pub priority: Option<Priority>,
    pub color: Option<String>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub recurrence: Recurrence,
    /// Resolved through [`crate::repository::ProjectLookup`]. On an edit,
    /// `None` (or an empty string) means the project association is left
    /// alone.
    pub project_name: Option<String>,
}

impl OccurrenceDraft {
    /// Materializes the draft into an occurrence under the given id.
    ///
    /// Series bookkeeping and project linkage stay unset; the
    /// completed/completed_at pairing is normalized here so a form
    /// submission with a bare checkbox still satisfies the invariant.
    pub fn to_occurrence(&self, id: Uuid) -> Occurrence {
        let completed_at = if self.completed {
            self.completed_at.or_else(|| Some(Utc::now()))
        } else {
            None
        };
        Occurrence {
            id,
            name: self.name.clone(),
            notes: self.notes.clone(),
            location: self.location.clone(),
            participants: Json(self.participants.clone()),
            tags: Json(self.tags.clone()),
            priority: self.priority.unwrap_or(Priority::None),
            color: self.color.clone(),
            start_at: self.start_at,
            end_at: self.end_at,
            completed: self.completed,
            completed_at,
            recurrence: self.recurrence.clone(),
            series_id: None,
            series_position: None,
            is_series_member: false,
            project_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

/// Scope of an edit submission against a recurring occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditScope {
    /// Affect only the selected occurrence, severing it from its series.
    ThisOccurrence,
    /// Regenerate the entire series from the submitted template.
    EntireSeries,
}

impl std::fmt::Display for EditScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditScope::ThisOccurrence => write!(f, "occurrence"),
            EditScope::EntireSeries => write!(f, "series"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid edit scope: {0}")]
pub struct ParseEditScopeError(String);

impl FromStr for EditScope {
    type Err = ParseEditScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "occurrence" | "this" => Ok(EditScope::ThisOccurrence),
            "series" | "entire" | "all" => Ok(EditScope::EntireSeries),
            _ => Err(ParseEditScopeError(s.to_string())),
        }
    }
}

/// Caller-owned description of one submission. Replaces any notion of a
/// "currently editing" record held outside the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditSession {
    /// No prior record exists; the draft is new.
    Create,
    /// The draft replaces (part of) an existing record.
    Edit { target: Uuid, scope: EditScope },
}

/// What a submission produced.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// One standalone occurrence was written.
    Standalone(Occurrence),
    /// A series member was converted to a standalone occurrence; its
    /// siblings were left untouched.
    Severed(Occurrence),
    /// A series was (re)generated; `occurrences` is the full new
    /// membership in position order.
    Series {
        series_id: Uuid,
        occurrences: Vec<Occurrence>,
    },
}
