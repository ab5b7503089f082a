//! 牌型定義與等級表

use super::constants::HAND_TYPE_COUNT;

/// 牌型 ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandId {
    HighCard,
    Pair,
    TwoPair,
    ThreeKind,
    Straight,
    Flush,
    FullHouse,
    FourKind,
    StraightFlush,
    RoyalFlush,
    // 進階牌型
    FiveKind,    // 5 張相同點數
    FlushHouse,  // Flush + Full House
    FlushFive,   // Flush + Five of a Kind
}

impl HandId {
    pub const ALL: [HandId; HAND_TYPE_COUNT] = [
        HandId::HighCard,
        HandId::Pair,
        HandId::TwoPair,
        HandId::ThreeKind,
        HandId::Straight,
        HandId::Flush,
        HandId::FullHouse,
        HandId::FourKind,
        HandId::StraightFlush,
        HandId::RoyalFlush,
        HandId::FiveKind,
        HandId::FlushHouse,
        HandId::FlushFive,
    ];

    /// 獲取牌型的基礎 chips 和 mult
    pub fn base_values(&self) -> (i64, i64) {
        match self {
            HandId::HighCard => (5, 1),
            HandId::Pair => (10, 2),
            HandId::TwoPair => (20, 2),
            HandId::ThreeKind => (30, 3),
            HandId::Straight => (30, 4),
            HandId::Flush => (35, 4),
            HandId::FullHouse => (40, 4),
            HandId::FourKind => (60, 7),
            HandId::StraightFlush => (100, 8),
            HandId::RoyalFlush => (100, 8),
            HandId::FiveKind => (120, 12),
            HandId::FlushHouse => (140, 14),
            HandId::FlushFive => (160, 16),
        }
    }

    /// 每升一級增加的 chips 和 mult
    pub fn level_delta(&self) -> (i64, i64) {
        match self {
            HandId::HighCard => (10, 1),
            HandId::Pair => (15, 1),
            HandId::TwoPair => (20, 1),
            HandId::ThreeKind => (20, 2),
            HandId::Straight => (30, 3),
            HandId::Flush => (15, 2),
            HandId::FullHouse => (25, 2),
            HandId::FourKind => (30, 3),
            HandId::StraightFlush => (40, 4),
            HandId::RoyalFlush => (40, 4),
            HandId::FiveKind => (35, 3),
            HandId::FlushHouse => (40, 4),
            HandId::FlushFive => (50, 3),
        }
    }

    pub fn to_index(&self) -> usize {
        *self as usize
    }

    /// 牌型是否包含順子
    pub fn is_straight(&self) -> bool {
        matches!(self, HandId::Straight | HandId::StraightFlush | HandId::RoyalFlush)
    }

    /// 牌型是否包含同花
    pub fn is_flush(&self) -> bool {
        matches!(
            self,
            HandId::Flush
                | HandId::StraightFlush
                | HandId::RoyalFlush
                | HandId::FlushHouse
                | HandId::FlushFive
        )
    }
}

/// 手牌計分基礎值（已套用等級）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandScore {
    pub chips: i64,
    pub mult: i64,
}

/// 單一牌型的等級紀錄
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandLevel {
    pub id: HandId,
    pub level: u32,
    pub times_played: u32,
}

impl HandLevel {
    pub fn new(id: HandId) -> Self {
        Self {
            id,
            level: 1,
            times_played: 0,
        }
    }

    /// base + delta × (level − 1)
    pub fn current_score(&self) -> HandScore {
        let (base_chips, base_mult) = self.id.base_values();
        let (delta_chips, delta_mult) = self.id.level_delta();
        let extra = self.level.saturating_sub(1) as i64;
        HandScore {
            chips: base_chips + delta_chips * extra,
            mult: base_mult + delta_mult * extra,
        }
    }
}

/// 牌型等級表
///
/// 以 [`HandId`] 索引的固定陣列，建立後每個牌型都必定存在。
#[derive(Clone, Debug)]
pub struct HandLevels {
    levels: [HandLevel; HAND_TYPE_COUNT],
}

impl Default for HandLevels {
    fn default() -> Self {
        Self::new()
    }
}

impl HandLevels {
    pub fn new() -> Self {
        Self {
            levels: HandId::ALL.map(HandLevel::new),
        }
    }

    pub fn get(&self, id: HandId) -> &HandLevel {
        &self.levels[id.to_index()]
    }

    pub fn increase_level(&mut self, id: HandId) {
        self.levels[id.to_index()].level += 1;
    }

    /// 降一級，最低為 1
    pub fn decrease_level(&mut self, id: HandId) {
        let entry = &mut self.levels[id.to_index()];
        entry.level = entry.level.saturating_sub(1).max(1);
    }

    pub fn record_played(&mut self, id: HandId) {
        self.levels[id.to_index()].times_played += 1;
    }

    pub fn iter(&self) -> impl Iterator<Item = &HandLevel> {
        self.levels.iter()
    }
}

// ============================================================================
// 單元測試
// ============================================================================
