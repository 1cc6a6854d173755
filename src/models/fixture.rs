//! Fixture (bracket + roster + status) and the collaborator traits around it.

use crate::logic::{
    create_bracket, get_rankings, report_result, undo_result, LedgerDelta, ResultReport, UndoReport,
};
use crate::models::bracket::{BracketGraph, EngineError};
use crate::models::competitor::{Competitor, CompetitorId};
use crate::models::game::MatchId;
use crate::models::rankings::Rankings;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

/// Unique identifier for a fixture.
pub type FixtureId = Uuid;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureStatus {
    #[default]
    Active,
    Completed,
    /// Results are frozen until resumed.
    Paused,
}

/// Source of the competitor list a fixture is started from.
pub trait RosterProvider {
    /// Competitors in seeding order.
    fn competitors(&self) -> Vec<Competitor>;
}

impl RosterProvider for [Competitor] {
    fn competitors(&self) -> Vec<Competitor> {
        self.to_vec()
    }
}

impl RosterProvider for Vec<Competitor> {
    fn competitors(&self) -> Vec<Competitor> {
        self.clone()
    }
}

/// A bracket being played: graph, rankings, roster and status.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Fixture {
    pub id: FixtureId,
    pub competitors: Vec<Competitor>,
    pub graph: BracketGraph,
    /// Filled once the bracket completes.
    pub rankings: Option<Rankings>,
    pub status: FixtureStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Fixture {
    /// Generate the bracket for a roster. A single competitor completes the fixture on the spot.
    pub fn start<R: RosterProvider + ?Sized>(roster: &R) -> Result<Self, EngineError> {
        let competitors = roster.competitors();
        let graph = create_bracket(&competitors)?;
        let rankings = if graph.is_complete() {
            Some(get_rankings(&graph)?)
        } else {
            None
        };
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            competitors,
            status: if rankings.is_some() {
                FixtureStatus::Completed
            } else {
                FixtureStatus::Active
            },
            graph,
            rankings,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn competitor(&self, id: CompetitorId) -> Option<&Competitor> {
        self.competitors.iter().find(|c| c.id == id)
    }

    /// Report a result (Active only). The ledger delta is applied to the roster here.
    pub fn report_result(
        &mut self,
        match_id: MatchId,
        winner_id: CompetitorId,
    ) -> Result<ResultReport, EngineError> {
        if self.status != FixtureStatus::Active {
            return Err(EngineError::FixtureNotActive(self.id));
        }
        let report = report_result(&self.graph, match_id, winner_id)?;
        self.graph = report.graph.clone();
        self.rankings = report.rankings.clone();
        if report.completed {
            self.status = FixtureStatus::Completed;
        }
        self.apply_ledger(&report.ledger_delta);
        self.updated_at = Utc::now();
        Ok(report)
    }

    /// Undo a result (Active or Completed). Undoing the deciding match reopens the fixture.
    pub fn undo_result(&mut self, match_id: MatchId) -> Result<UndoReport, EngineError> {
        if self.status == FixtureStatus::Paused {
            return Err(EngineError::FixtureNotActive(self.id));
        }
        let report = undo_result(&self.graph, match_id)?;
        self.graph = report.graph.clone();
        if !self.graph.is_complete() {
            self.rankings = None;
            self.status = FixtureStatus::Active;
        }
        self.apply_ledger(&report.ledger_delta);
        self.updated_at = Utc::now();
        Ok(report)
    }

    pub fn pause(&mut self) -> Result<(), EngineError> {
        if self.status != FixtureStatus::Active {
            return Err(EngineError::FixtureNotActive(self.id));
        }
        self.status = FixtureStatus::Paused;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), EngineError> {
        if self.status != FixtureStatus::Paused {
            return Err(EngineError::FixtureNotActive(self.id));
        }
        self.status = FixtureStatus::Active;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// The graph is already committed; a roster mismatch only affects the history display.
    fn apply_ledger(&mut self, deltas: &[LedgerDelta]) {
        for delta in deltas {
            if let Err(e) = delta.apply(&mut self.competitors) {
                log::warn!("fixture {}: opponent history not updated: {}", self.id, e);
            }
        }
    }
}

/// Persistence adapter for fixtures. Last write wins; no transactions.
pub trait FixtureStore {
    fn get(&self, id: FixtureId) -> Option<Fixture>;
    fn set(&self, fixture: Fixture);
    fn remove(&self, id: FixtureId) -> Option<Fixture>;
}

/// Process-local store (used by the web binary and in tests).
#[derive(Debug, Default)]
pub struct MemoryFixtureStore {
    fixtures: RwLock<HashMap<FixtureId, Fixture>>,
}

impl MemoryFixtureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fixtures
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop fixtures not updated within `max_idle`. Returns how many were removed.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let cutoff = Utc::now() - max_idle;
        let mut fixtures = self.fixtures.write().unwrap_or_else(PoisonError::into_inner);
        let before = fixtures.len();
        fixtures.retain(|_, f| f.updated_at >= cutoff);
        before - fixtures.len()
    }
}

impl FixtureStore for MemoryFixtureStore {
    fn get(&self, id: FixtureId) -> Option<Fixture> {
        self.fixtures
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    fn set(&self, fixture: Fixture) {
        self.fixtures
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(fixture.id, fixture);
    }

    fn remove(&self, id: FixtureId) -> Option<Fixture> {
        self.fixtures
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
    }
}
