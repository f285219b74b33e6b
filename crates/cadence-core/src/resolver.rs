//! Edit-scope resolution: what one submitted template does to the store.
//!
//! Every submission runs to completion before returning. Validation happens
//! before the first store call; once store calls begin, errors propagate
//! unchanged and nothing is rolled back — the delete-then-insert sequence
//! of a series regeneration is not atomic.

use chrono::Utc;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::completion::CompletionStateMap;
use crate::error::CoreError;
use crate::models::{EditScope, EditSession, Occurrence, OccurrenceDraft, SubmitOutcome};
use crate::recurrence::{RecurrenceExpander, OCCURRENCE_CAP};
use crate::repository::{EventStore, ProjectLookup};
use crate::series::{IdGenerator, SeriesStamper, UuidV7Generator};

/// Orchestrates create, edit, and delete submissions against the event
/// store, honoring the caller's chosen scope.
pub struct EditScopeResolver<S, P> {
    store: S,
    projects: P,
    ids: Box<dyn IdGenerator>,
}

impl<S: EventStore, P: ProjectLookup> EditScopeResolver<S, P> {
    pub fn new(store: S, projects: P) -> Self {
        Self::with_id_generator(store, projects, Box::new(UuidV7Generator))
    }

    pub fn with_id_generator(store: S, projects: P, ids: Box<dyn IdGenerator>) -> Self {
        Self {
            store,
            projects,
            ids,
        }
    }

    /// Applies one submission. The session says whether the draft is new
    /// or replaces an existing record, and at what scope.
    #[instrument(skip(self, draft))]
    pub async fn submit(
        &self,
        draft: OccurrenceDraft,
        session: EditSession,
    ) -> Result<SubmitOutcome, CoreError> {
        validate_draft(&draft)?;

        match session {
            EditSession::Create => self.create(draft).await,
            EditSession::Edit { target, scope } => {
                let current = self
                    .store
                    .find_by_id(target)
                    .await?
                    .ok_or_else(|| CoreError::NotFound(target.to_string()))?;

                match scope {
                    EditScope::ThisOccurrence => self.edit_single(draft, current).await,
                    EditScope::EntireSeries
                        if current.is_series_member
                            || current.is_recurring()
                            || draft.recurrence.is_recurring() =>
                    {
                        self.edit_series(draft, current).await
                    }
                    // Series scope against a plain record with a plain
                    // draft degrades to an ordinary edit.
                    EditScope::EntireSeries => self.edit_single(draft, current).await,
                }
            }
        }
    }

    /// Removes exactly one occurrence. Never cascades to siblings and
    /// never triggers a regeneration.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), CoreError> {
        self.store.delete(id).await
    }

    /// Flips the completion pair. `completed_at` is written exactly when
    /// the flag transitions to true and cleared when it transitions back;
    /// re-completing an already-completed occurrence keeps the original
    /// timestamp.
    pub async fn set_completed(
        &self,
        id: Uuid,
        completed: bool,
    ) -> Result<Occurrence, CoreError> {
        let mut occurrence = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        match (occurrence.completed, completed) {
            (false, true) => {
                occurrence.completed = true;
                occurrence.completed_at = Some(Utc::now());
            }
            (true, false) => {
                occurrence.completed = false;
                occurrence.completed_at = None;
            }
            _ => return Ok(occurrence),
        }
        occurrence.updated_at = Utc::now();
        self.store.save(&occurrence).await?;
        Ok(occurrence)
    }

    /// True iff `occurrence` is the only record in the store referencing
    /// its project, and the submitted project name leaves that association
    /// alone. Such an occurrence is kept through a regeneration as the
    /// project's anchor so the project never transiently has zero events.
    pub async fn is_last_event_in_project(
        &self,
        occurrence: &Occurrence,
        new_project_name: Option<&str>,
    ) -> Result<bool, CoreError> {
        let Some(project_id) = occurrence.project_id else {
            return Ok(false);
        };

        let name_unchanged = match new_project_name {
            None | Some("") => true,
            Some(name) => self
                .projects
                .find_by_id(project_id)
                .await?
                .map(|project| project.name == name)
                .unwrap_or(false),
        };
        if !name_unchanged {
            return Ok(false);
        }

        let references = self.store.find_by_project(project_id).await?;
        Ok(references.iter().all(|o| o.id == occurrence.id))
    }

    async fn create(&self, draft: OccurrenceDraft) -> Result<SubmitOutcome, CoreError> {
        let project_id = match draft.project_name.as_deref() {
            Some(name) if !name.is_empty() => Some(self.require_project(name).await?),
            _ => None,
        };

        if draft.recurrence.is_recurring() {
            let series_id = self.ids.next_id();
            let rule = draft.recurrence.clone();
            let mut occurrences = RecurrenceExpander::expand(
                &draft,
                &rule,
                &CompletionStateMap::new(),
                series_id,
                self.ids.as_ref(),
            )?;
            for occurrence in &mut occurrences {
                occurrence.project_id = project_id;
                self.store.save(occurrence).await?;
            }
            debug!(%series_id, generated = occurrences.len(), "created series");
            Ok(SubmitOutcome::Series {
                series_id,
                occurrences,
            })
        } else {
            let mut occurrence = draft.to_occurrence(self.ids.next_id());
            occurrence.project_id = project_id;
            self.store.save(&occurrence).await?;
            Ok(SubmitOutcome::Standalone(occurrence))
        }
    }

    /// Saves the draft under the target's original id as a standalone
    /// record. Siblings are not read, deleted, or regenerated.
    async fn edit_single(
        &self,
        draft: OccurrenceDraft,
        current: Occurrence,
    ) -> Result<SubmitOutcome, CoreError> {
        let was_member = current.is_series_member;

        let mut occurrence = draft.to_occurrence(current.id);
        occurrence.created_at = current.created_at;
        occurrence.project_id = self.project_for_edit(&draft, &current).await?;
        SeriesStamper::sever(&mut occurrence);
        self.store.save(&occurrence).await?;

        if was_member {
            Ok(SubmitOutcome::Severed(occurrence))
        } else {
            Ok(SubmitOutcome::Standalone(occurrence))
        }
    }

    /// Replaces the target's whole series with a fresh expansion of the
    /// draft, carrying completion state across by position.
    async fn edit_series(
        &self,
        draft: OccurrenceDraft,
        current: Occurrence,
    ) -> Result<SubmitOutcome, CoreError> {
        // A plain repeating occurrence that was never split into siblings
        // is its own sole member.
        let members = match current.series_id {
            Some(series_id) => self.store.find_by_series(series_id).await?,
            None => vec![current.clone()],
        };

        let carry = CompletionStateMap::capture(&members);
        let project_id = self.project_for_edit(&draft, &current).await?;
        let stamper = SeriesStamper::new(self.ids.as_ref());
        let series_id = stamper.series_id_for(Some(&current));

        // Delete the old membership. At most one member survives as the
        // project anchor until the new records exist.
        let mut anchor: Option<Uuid> = None;
        for member in &members {
            if anchor.is_none()
                && self
                    .is_last_event_in_project(member, draft.project_name.as_deref())
                    .await?
            {
                debug!(member = %member.id, "keeping project anchor through regeneration");
                anchor = Some(member.id);
                continue;
            }
            self.store.delete(member.id).await?;
        }

        if !draft.recurrence.is_recurring() {
            return self.dissolve_series(draft, current, carry, project_id, anchor).await;
        }

        let rule = draft.recurrence.clone();
        let mut occurrences =
            RecurrenceExpander::expand(&draft, &rule, &carry, series_id, self.ids.as_ref())?;
        for occurrence in &mut occurrences {
            occurrence.project_id = project_id;
            self.store.save(occurrence).await?;
        }

        if let Some(anchor_id) = anchor {
            self.store.delete(anchor_id).await?;
        }

        debug!(%series_id, regenerated = occurrences.len(), "regenerated series");
        Ok(SubmitOutcome::Series {
            series_id,
            occurrences,
        })
    }

    /// A series edit whose draft no longer repeats: the series collapses
    /// into one standalone record under the target's id, keeping the
    /// target's captured completion state.
    async fn dissolve_series(
        &self,
        draft: OccurrenceDraft,
        current: Occurrence,
        carry: CompletionStateMap,
        project_id: Option<Uuid>,
        anchor: Option<Uuid>,
    ) -> Result<SubmitOutcome, CoreError> {
        let mut occurrence = draft.to_occurrence(current.id);
        occurrence.created_at = current.created_at;
        occurrence.project_id = project_id;
        if let Some(state) = carry.state_for(current.series_position.unwrap_or(0)) {
            occurrence.completed = state.completed;
            occurrence.completed_at = state.completed_at;
        }
        SeriesStamper::sever(&mut occurrence);
        self.store.save(&occurrence).await?;

        if let Some(anchor_id) = anchor {
            if anchor_id != occurrence.id {
                self.store.delete(anchor_id).await?;
            }
        }

        Ok(SubmitOutcome::Standalone(occurrence))
    }

    async fn project_for_edit(
        &self,
        draft: &OccurrenceDraft,
        current: &Occurrence,
    ) -> Result<Option<Uuid>, CoreError> {
        match draft.project_name.as_deref() {
            Some(name) if !name.is_empty() => Ok(Some(self.require_project(name).await?)),
            // Empty or absent: the user did not touch the project field.
            _ => Ok(current.project_id),
        }
    }

    async fn require_project(&self, name: &str) -> Result<Uuid, CoreError> {
        self.projects
            .find_by_name(name)
            .await?
            .map(|project| project.id)
            .ok_or_else(|| CoreError::NotFound(name.to_string()))
    }
}

/// Boundary validation. Runs before any store mutation; nothing is
/// auto-corrected.
fn validate_draft(draft: &OccurrenceDraft) -> Result<(), CoreError> {
    if draft.name.trim().is_empty() {
        return Err(CoreError::InvalidInput("An event needs a name.".to_string()));
    }

    if let (Some(start), Some(end)) = (draft.start_at, draft.end_at) {
        if end <= start {
            return Err(CoreError::InvalidInput(
                "An event must end after it starts.".to_string(),
            ));
        }
    }

    if let Some(count) = draft.recurrence.count {
        if count < 1 || count > OCCURRENCE_CAP {
            return Err(CoreError::InvalidInput(format!(
                "Repeat count must be between 1 and {}.",
                OCCURRENCE_CAP
            )));
        }
    }

    if draft.recurrence.is_recurring() {
        let Some(start) = draft.start_at else {
            return Err(CoreError::InvalidInput(
                "A repeating event needs a start time.".to_string(),
            ));
        };
        if let Some(until) = draft.recurrence.until {
            if until < start {
                return Err(CoreError::InvalidInput(
                    "The repeat end date is before the event start.".to_string(),
                ));
            }
        }
    }

    Ok(())
}
