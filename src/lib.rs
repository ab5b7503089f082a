//! Joker 計分引擎
//!
//! - `game`: 卡牌、牌型、Joker、消耗品、Voucher、商店等規則定義
//! - `service`: 盤面狀態與計分流程

pub mod game;
pub mod service;

pub use game::{Consumable, GameConfig, HandId, Joker, JokerId, PlayingCard};
pub use service::{estimate_score, play_hand, score_hand, BlindState, BoardState, ScoreResult};
