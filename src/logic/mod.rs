//! Bracket engine behaviour: seeding, generation, match state machine, rankings, ledger.

mod facade;
mod generator;
mod ledger;
mod rankings;
mod seeding;
mod state_machine;

pub use facade::{create_bracket, get_rankings, report_result, undo_result, ResultReport, UndoReport};
pub use generator::generate;
pub use ledger::{record_result, remove_result, LedgerDelta};
pub use rankings::compute_rankings;
pub use seeding::{bracket_size, seed_positions, shuffle_seeding};
pub use state_machine::{Reversal, Transition};
