//! Packer service
//!
//! The operations a front-end drives. Every mutating operation takes
//! `&mut self`, so actions are serialized: a refinement or toggle cannot start
//! while another action on the history is in flight.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{ClarificationQuestion, PackingList, Trip, simplify};
use crate::history::{HistoryError, TripHistory};
use crate::merge;
use crate::oracle::{Oracle, OracleError};
use crate::reconcile;
use crate::templates;

#[derive(Debug, Error)]
pub enum PackerError {
    /// Suggestion step failed; no trip was created
    #[error("could not build list: {0}")]
    Generate(#[source] OracleError),

    /// Refinement failed; the previous list is untouched
    #[error("could not update list: {0}")]
    Refine(#[source] OracleError),

    #[error("trip description is empty")]
    EmptyDescription,

    #[error("refinement request is empty")]
    EmptyRequest,

    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Result of a list generation
#[derive(Debug, Clone)]
pub struct Generated {
    /// Templates the list was built from, in selection order
    pub templates: Vec<String>,
    pub trip: Trip,
}

/// Trip packing context: oracle plus history
pub struct Packer {
    oracle: Oracle,
    history: TripHistory,
}

impl Packer {
    pub fn new(oracle: Oracle, history: TripHistory) -> Self {
        debug!(trips = history.len(), "Packer::new: called");
        Self { oracle, history }
    }

    pub fn history(&self) -> &TripHistory {
        &self.history
    }

    /// Questions worth asking before generation; empty when none or on failure
    pub async fn clarification_questions(&self, description: &str) -> Vec<ClarificationQuestion> {
        debug!("clarification_questions: called");
        if description.trim().is_empty() {
            return Vec::new();
        }
        self.oracle.clarification_questions(description).await
    }

    /// Build a list for a new trip and put it at the front of the history
    ///
    /// The description is stored trimmed of surrounding whitespace. Template
    /// selection cannot fail. A failed suggestion step aborts with nothing
    /// committed.
    pub async fn generate_list(&mut self, description: &str) -> Result<Generated, PackerError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(PackerError::EmptyDescription);
        }
        info!(description_len = description.len(), "generate_list: called");

        let names = templates::names();
        let selected = self.oracle.select_relevant_templates(description, &names).await;
        let base = merge::build_base_list(&selected[..]);

        let suggestions = self
            .oracle
            .generate_suggestions(description, &base)
            .await
            .map_err(|e| {
                warn!(error = %e, "generate_list: suggestions failed");
                PackerError::Generate(e)
            })?;

        let merged = merge::merge_suggestions(base, suggestions);
        let trip = Trip::new(description, reconcile::mint_list(merged));
        info!(trip_id = %trip.id, templates = ?selected, "generate_list: trip created");

        let trip = self.history.prepend(trip).clone();
        Ok(Generated {
            templates: selected,
            trip,
        })
    }

    /// Apply a free-text edit to a trip's list
    ///
    /// Packed flags carry over by (category, item) key; every id is re-minted.
    /// On failure the trip is left exactly as it was.
    pub async fn refine_list(&mut self, trip_id: &str, request: &str) -> Result<&Trip, PackerError> {
        let request = request.trim();
        if request.is_empty() {
            return Err(PackerError::EmptyRequest);
        }
        info!(%trip_id, "refine_list: called");

        let current: PackingList = self
            .history
            .get(trip_id)
            .ok_or_else(|| HistoryError::TripNotFound(trip_id.to_string()))?
            .packing_list
            .clone();

        let refined = self.oracle.refine_list(request, &current).await.map_err(|e| {
            warn!(%trip_id, error = %e, "refine_list: refinement failed");
            PackerError::Refine(e)
        })?;

        let mut refined = merge::normalize(refined);
        merge::restore_provenance(&mut refined, &simplify(&current));
        let list = reconcile::carry_packed_state(&current, refined);

        Ok(self.history.replace_list(trip_id, list)?)
    }

    /// Flip one item's packed flag; returns the new flag
    pub fn toggle_packed(&mut self, trip_id: &str, category_index: usize, item_index: usize) -> Result<bool, PackerError> {
        debug!(%trip_id, %category_index, %item_index, "toggle_packed: called");
        Ok(self.history.toggle(trip_id, category_index, item_index)?)
    }

    /// All trips, most recent first
    pub fn list_history(&self) -> &[Trip] {
        self.history.trips()
    }

    /// Trip with exactly this id
    pub fn select_trip(&self, trip_id: &str) -> Option<&Trip> {
        self.history.get(trip_id)
    }

    /// Trip by exact id or unique id prefix
    pub fn resolve_trip(&self, reference: &str) -> Result<&Trip, PackerError> {
        Ok(self.history.resolve(reference)?)
    }

    /// Forget every trip
    pub fn clear_history(&mut self) -> Result<(), PackerError> {
        Ok(self.history.clear()?)
    }
}
