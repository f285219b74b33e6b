//! Series identity: who mints series ids and how occurrences are stamped
//! into, or severed from, a series.

use uuid::Uuid;

use crate::models::{Occurrence, Recurrence};

/// Source of fresh identifiers. Injected rather than called ambiently so
/// tests can substitute a deterministic generator.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> Uuid;
}

/// Default generator: time-ordered UUIDv7, matching the ids used for all
/// other records.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV7Generator;

impl IdGenerator for UuidV7Generator {
    fn next_id(&self) -> Uuid {
        Uuid::now_v7()
    }
}

/// Assigns and clears the series-linking attributes on occurrences.
pub struct SeriesStamper<'a> {
    ids: &'a dyn IdGenerator,
}

impl<'a> SeriesStamper<'a> {
    pub fn new(ids: &'a dyn IdGenerator) -> Self {
        Self { ids }
    }

    /// Stable series id for a (re)generation: reuse the edited
    /// occurrence's series id when it has one, mint a fresh id otherwise.
    pub fn series_id_for(&self, existing: Option<&Occurrence>) -> Uuid {
        existing
            .and_then(|occurrence| occurrence.series_id)
            .unwrap_or_else(|| self.ids.next_id())
    }

    /// Marks an occurrence as the series member at `position`. The three
    /// series fields are only ever written together.
    pub fn stamp(occurrence: &mut Occurrence, series_id: Uuid, position: u32) {
        occurrence.series_id = Some(series_id);
        occurrence.series_position = Some(position);
        occurrence.is_series_member = true;
    }

    /// Converts an occurrence back to a standalone record: series fields
    /// cleared, recurrence terminal.
    pub fn sever(occurrence: &mut Occurrence) {
        occurrence.series_id = None;
        occurrence.series_position = None;
        occurrence.is_series_member = false;
        occurrence.recurrence = Recurrence::none();
    }
}
