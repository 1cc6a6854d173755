//! Data structures for the bracket engine: competitors, matches, the bracket graph, rankings, fixtures.

mod bracket;
mod competitor;
mod fixture;
mod game;
mod rankings;

pub use bracket::{BracketGraph, EngineError};
pub use competitor::{Competitor, CompetitorId, CompetitorStats, MatchOutcome, OpponentRecord};
pub use fixture::{
    Fixture, FixtureId, FixtureStatus, FixtureStore, MemoryFixtureStore, RosterProvider,
};
pub use game::{Bracket, Match, MatchId, MatchState, Side, Slot, SlotRef, SlotSource};
pub use rankings::{Placement, Rankings};
