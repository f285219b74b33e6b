//! Expansion of an authored template into a concrete series of dated
//! occurrences.
//!
//! Stepping is calendar arithmetic, not fixed millisecond deltas: adding a
//! month to Jan 31 lands on the last day of February. All math is on UTC
//! timestamps; the rule kinds are fixed-interval only.

use chrono::{DateTime, Days, Months, Utc};
use uuid::Uuid;

use crate::completion::CompletionStateMap;
use crate::error::CoreError;
use crate::models::{Occurrence, OccurrenceDraft, Recurrence, RecurrenceKind};
use crate::series::{IdGenerator, SeriesStamper};

/// Hard cap on generated occurrences when a rule carries no count of its
/// own. Keeps an endless rule from expanding without bound.
pub const OCCURRENCE_CAP: u32 = 100;

/// Pure template-to-series expansion. No store access, no side effects.
pub struct RecurrenceExpander;

impl RecurrenceExpander {
    /// Expands `draft` under `rule` into the full series membership, in
    /// position order.
    ///
    /// The draft's start time anchors the series; its end time, when set,
    /// fixes a duration that every generated occurrence reuses. Generation
    /// stops at the rule's count (default [`OCCURRENCE_CAP`]) or at the
    /// first candidate date past `rule.until` — an occurrence landing
    /// exactly on `until` is still included.
    ///
    /// Completion fields come from `carry` for positions it was captured
    /// for, and from the draft for everything else.
    pub fn expand(
        draft: &OccurrenceDraft,
        rule: &Recurrence,
        carry: &CompletionStateMap,
        series_id: Uuid,
        ids: &dyn IdGenerator,
    ) -> Result<Vec<Occurrence>, CoreError> {
        let start = draft.start_at.ok_or_else(|| {
            CoreError::InvalidInput("A repeating event needs a start time.".to_string())
        })?;
        let duration = draft.end_at.map(|end| end - start);

        let cap = rule.count.unwrap_or(OCCURRENCE_CAP).min(OCCURRENCE_CAP);
        let mut occurrences = Vec::with_capacity(cap as usize);
        let mut current = start;

        for position in 0..cap {
            if let Some(until) = rule.until {
                if current > until {
                    break;
                }
            }

            let mut occurrence = draft.to_occurrence(ids.next_id());
            occurrence.start_at = Some(current);
            occurrence.end_at = duration.map(|d| current + d);
            occurrence.recurrence = rule.clone();
            if let Some(state) = carry.state_for(position) {
                occurrence.completed = state.completed;
                occurrence.completed_at = state.completed_at;
            }
            SeriesStamper::stamp(&mut occurrence, series_id, position);
            occurrences.push(occurrence);

            current = step(current, rule.kind)?;
        }

        Ok(occurrences)
    }
}

/// Advances a date by one interval of the given kind.
fn step(current: DateTime<Utc>, kind: RecurrenceKind) -> Result<DateTime<Utc>, CoreError> {
    let next = match kind {
        RecurrenceKind::Daily => current.checked_add_days(Days::new(1)),
        RecurrenceKind::Weekly => current.checked_add_days(Days::new(7)),
        RecurrenceKind::Monthly => current.checked_add_months(Months::new(1)),
        RecurrenceKind::Yearly => current.checked_add_months(Months::new(12)),
        RecurrenceKind::None => {
            return Err(CoreError::InvalidInput(
                "Cannot expand a non-repeating rule.".to_string(),
            ))
        }
    };

    next.ok_or_else(|| {
        CoreError::InvalidInput("Recurrence stepped past the supported date range.".to_string())
    })
}
