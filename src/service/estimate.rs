//! 批次估計機率性出牌的分數
//!
//! 每次試驗在複製的盤面上獨立計分，各自使用以 `seed + i` 初始化的 `StdRng`，
//! 所以同一個 seed 的結果可以重現。

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::game::cards::PlayingCard;

use super::scoring::score_hand;
use super::state::{BlindState, BoardState};

/// 分數分布摘要
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreEstimate {
    pub trials: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

pub fn estimate_score(
    played: &[PlayingCard],
    board: &BoardState,
    blind: &BlindState,
    trials: usize,
    seed: u64,
) -> ScoreEstimate {
    assert!(trials > 0, "estimate needs at least one trial");

    let scores: Vec<f64> = (0..trials)
        .into_par_iter()
        .map(|i| {
            let mut board = board.clone();
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
            score_hand(played, &mut board, blind, &mut rng).score
        })
        .collect();

    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = scores.iter().sum::<f64>() / trials as f64;
    ScoreEstimate { trials, mean, min, max }
}

// ============================================================================
// 單元測試
// ============================================================================
