//! 服務層模組
//!
//! 提供盤面狀態管理、計分流程與批次估計

pub mod estimate;
pub mod scoring;
pub mod state;

pub use estimate::{estimate_score, ScoreEstimate};
pub use scoring::{play_hand, score_hand, ScoreResult};
pub use state::{BlindState, BoardState};
