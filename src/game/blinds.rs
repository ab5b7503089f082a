//! Blind 類型與目標分數

/// Blind 類型，依出現順序排列
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlindType {
    Small,
    Big,
    Boss,
}

/// (過關獎勵, 分數倍數)
const BLIND_TABLE: [(i64, f64); 3] = [(3, 1.0), (4, 1.5), (5, 2.0)];

impl BlindType {
    pub const ALL: [BlindType; 3] = [BlindType::Small, BlindType::Big, BlindType::Boss];

    pub fn reward(&self) -> i64 {
        BLIND_TABLE[*self as usize].0
    }

    pub fn score_multiplier(&self) -> f64 {
        BLIND_TABLE[*self as usize].1
    }

    /// 同一 Ante 內的下一個 Blind；Boss 之後回傳 None
    pub fn next(&self) -> Option<BlindType> {
        Self::ALL.get(*self as usize + 1).copied()
    }
}

/// 各 Ante 的基礎分數（White Stake），索引即 Ante
const ANTE_BASE_SCORES: [i64; 9] = [100, 300, 800, 2_000, 5_000, 11_000, 20_000, 35_000, 50_000];

pub const MAX_ANTE: u32 = 8;

pub fn base_score(ante: u32) -> Option<i64> {
    ANTE_BASE_SCORES.get(ante as usize).copied()
}

/// 過關所需分數：基礎分數 × Blind 倍數
pub fn required_score(ante: u32, blind: BlindType) -> Option<i64> {
    base_score(ante).map(|base| (base as f64 * blind.score_multiplier()) as i64)
}

// ============================================================================
// 單元測試
// ============================================================================
