//! Double-elimination bracket engine: bracket generation, match state machine, rankings and
//! opponent history for knockout competitions of any size.

pub mod logic;
pub mod models;

pub use logic::{
    bracket_size, compute_rankings, create_bracket, generate, get_rankings, record_result,
    remove_result, report_result, seed_positions, shuffle_seeding, undo_result, LedgerDelta,
    ResultReport, Reversal, Transition, UndoReport,
};
pub use models::{
    Bracket, BracketGraph, Competitor, CompetitorId, CompetitorStats, EngineError, Fixture,
    FixtureId, FixtureStatus, FixtureStore, Match, MatchId, MatchOutcome, MatchState,
    MemoryFixtureStore, OpponentRecord, Placement, Rankings, RosterProvider, Side, Slot, SlotRef,
    SlotSource,
};
