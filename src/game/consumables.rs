//! 消耗品系統
//!
//! 兩種類型：
//! - Tarot: 修改卡牌、產生金錢或其他消耗品
//! - Planet: 升級牌型
//!
//! 這裡只放定義與槽位；套用效果需要整個盤面，在 `service::state` 實作。

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use super::cards::{Enhancement, Suit};
use super::constants::CONSUMABLE_COST;
use super::hand_types::HandId;

/// Tarot 卡數量
pub const TAROT_COUNT: usize = 22;
/// Planet 卡數量
pub const PLANET_COUNT: usize = 12;

/// 消耗品無法套用的原因
///
/// 回傳錯誤時盤面不會被修改。
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConsumableError {
    #[error("too many cards selected: at most {max}, got {got}")]
    TooManySelected { max: usize, got: usize },
    #[error("too few cards selected: at least {min}, got {got}")]
    TooFewSelected { min: usize, got: usize },
    #[error("no free consumable slot")]
    NoFreeConsumableSlot,
    #[error("no free joker slot")]
    NoFreeJokerSlot,
    #[error("no consumable has been used yet")]
    NothingToCopy,
    #[error("no joker without an edition")]
    NoEligibleJoker,
    #[error("no consumable in slot {0}")]
    NoSuchSlot(usize),
}

// ============================================================================
// Tarot
// ============================================================================

/// Tarot 卡 ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TarotId {
    /// 複製最後使用的 Tarot/Planet
    TheFool,
    TheMagician,
    /// 創造最多 2 張 Planet 卡
    TheHighPriestess,
    TheEmpress,
    /// 創造最多 2 張 Tarot 卡
    TheEmperor,
    TheHierophant,
    TheLovers,
    TheChariot,
    Justice,
    /// 金錢翻倍（最多 +$20）
    TheHermit,
    /// 1/4 機率加 Foil/Holo/Poly 到隨機 Joker
    TheWheelOfFortune,
    /// 選中牌點數 +1
    Strength,
    /// 銷毀最多 2 張選中的牌
    TheHangedMan,
    /// 選 2 張牌，左邊變成右邊的複製
    Death,
    /// 獲得 Joker 總售價（最多 $50）
    Temperance,
    TheDevil,
    TheTower,
    TheStar,
    TheMoon,
    TheSun,
    /// 創造隨機 Joker
    Judgement,
    TheWorld,
}

impl TarotId {
    pub const ALL: [TarotId; TAROT_COUNT] = [
        TarotId::TheFool,
        TarotId::TheMagician,
        TarotId::TheHighPriestess,
        TarotId::TheEmpress,
        TarotId::TheEmperor,
        TarotId::TheHierophant,
        TarotId::TheLovers,
        TarotId::TheChariot,
        TarotId::Justice,
        TarotId::TheHermit,
        TarotId::TheWheelOfFortune,
        TarotId::Strength,
        TarotId::TheHangedMan,
        TarotId::Death,
        TarotId::Temperance,
        TarotId::TheDevil,
        TarotId::TheTower,
        TarotId::TheStar,
        TarotId::TheMoon,
        TarotId::TheSun,
        TarotId::Judgement,
        TarotId::TheWorld,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TarotId::TheFool => "The Fool",
            TarotId::TheMagician => "The Magician",
            TarotId::TheHighPriestess => "The High Priestess",
            TarotId::TheEmpress => "The Empress",
            TarotId::TheEmperor => "The Emperor",
            TarotId::TheHierophant => "The Hierophant",
            TarotId::TheLovers => "The Lovers",
            TarotId::TheChariot => "The Chariot",
            TarotId::Justice => "Justice",
            TarotId::TheHermit => "The Hermit",
            TarotId::TheWheelOfFortune => "The Wheel of Fortune",
            TarotId::Strength => "Strength",
            TarotId::TheHangedMan => "The Hanged Man",
            TarotId::Death => "Death",
            TarotId::Temperance => "Temperance",
            TarotId::TheDevil => "The Devil",
            TarotId::TheTower => "The Tower",
            TarotId::TheStar => "The Star",
            TarotId::TheMoon => "The Moon",
            TarotId::TheSun => "The Sun",
            TarotId::Judgement => "Judgement",
            TarotId::TheWorld => "The World",
        }
    }

    /// 需要選擇的牌數量 (min, max)；(0, 0) 表示不需要選牌
    pub fn selection_count(&self) -> (usize, usize) {
        match self {
            TarotId::TheMagician
            | TarotId::TheEmpress
            | TarotId::TheHierophant
            | TarotId::Strength
            | TarotId::TheHangedMan => (1, 2),
            TarotId::TheLovers
            | TarotId::TheChariot
            | TarotId::Justice
            | TarotId::TheDevil
            | TarotId::TheTower => (1, 1),
            TarotId::TheStar | TarotId::TheMoon | TarotId::TheSun | TarotId::TheWorld => (1, 3),
            TarotId::Death => (2, 2),
            _ => (0, 0),
        }
    }

    /// 把選中牌改成的增強類型
    pub fn enhancement(&self) -> Option<Enhancement> {
        match self {
            TarotId::TheMagician => Some(Enhancement::Lucky),
            TarotId::TheEmpress => Some(Enhancement::Mult),
            TarotId::TheHierophant => Some(Enhancement::Bonus),
            TarotId::TheLovers => Some(Enhancement::Wild),
            TarotId::TheChariot => Some(Enhancement::Steel),
            TarotId::Justice => Some(Enhancement::Glass),
            TarotId::TheDevil => Some(Enhancement::Gold),
            TarotId::TheTower => Some(Enhancement::Stone),
            _ => None,
        }
    }

    /// 把選中牌改成的花色
    pub fn suit(&self) -> Option<Suit> {
        match self {
            TarotId::TheStar => Some(Suit::Diamonds),
            TarotId::TheMoon => Some(Suit::Clubs),
            TarotId::TheSun => Some(Suit::Hearts),
            TarotId::TheWorld => Some(Suit::Spades),
            _ => None,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&TarotId::TheFool)
    }
}

// ============================================================================
// Planet
// ============================================================================

/// Planet 卡 ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlanetId {
    Pluto,
    Mercury,
    Uranus,
    Venus,
    Saturn,
    Jupiter,
    Earth,
    Mars,
    Neptune,
    PlanetX,
    Ceres,
    Eris,
}

impl PlanetId {
    pub const ALL: [PlanetId; PLANET_COUNT] = [
        PlanetId::Pluto,
        PlanetId::Mercury,
        PlanetId::Uranus,
        PlanetId::Venus,
        PlanetId::Saturn,
        PlanetId::Jupiter,
        PlanetId::Earth,
        PlanetId::Mars,
        PlanetId::Neptune,
        PlanetId::PlanetX,
        PlanetId::Ceres,
        PlanetId::Eris,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PlanetId::Pluto => "Pluto",
            PlanetId::Mercury => "Mercury",
            PlanetId::Uranus => "Uranus",
            PlanetId::Venus => "Venus",
            PlanetId::Saturn => "Saturn",
            PlanetId::Jupiter => "Jupiter",
            PlanetId::Earth => "Earth",
            PlanetId::Mars => "Mars",
            PlanetId::Neptune => "Neptune",
            PlanetId::PlanetX => "Planet X",
            PlanetId::Ceres => "Ceres",
            PlanetId::Eris => "Eris",
        }
    }

    /// 對應升級的牌型
    ///
    /// Neptune 只升級 Straight Flush，Royal Flush 沒有對應的 Planet。
    pub fn hand_id(&self) -> HandId {
        match self {
            PlanetId::Pluto => HandId::HighCard,
            PlanetId::Mercury => HandId::Pair,
            PlanetId::Uranus => HandId::TwoPair,
            PlanetId::Venus => HandId::ThreeKind,
            PlanetId::Saturn => HandId::Straight,
            PlanetId::Jupiter => HandId::Flush,
            PlanetId::Earth => HandId::FullHouse,
            PlanetId::Mars => HandId::FourKind,
            PlanetId::Neptune => HandId::StraightFlush,
            PlanetId::PlanetX => HandId::FiveKind,
            PlanetId::Ceres => HandId::FlushHouse,
            PlanetId::Eris => HandId::FlushFive,
        }
    }

    /// 升級該牌型的 Planet
    pub fn for_hand(id: HandId) -> Option<PlanetId> {
        Self::ALL.iter().copied().find(|p| p.hand_id() == id)
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&PlanetId::Pluto)
    }
}

// ============================================================================
// Consumable
// ============================================================================

/// 消耗品
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Consumable {
    Tarot(TarotId),
    Planet(PlanetId),
}

impl Consumable {
    pub fn name(&self) -> &'static str {
        match self {
            Consumable::Tarot(t) => t.name(),
            Consumable::Planet(p) => p.name(),
        }
    }

    pub fn cost(&self) -> i64 {
        CONSUMABLE_COST
    }

    pub fn selection_count(&self) -> (usize, usize) {
        match self {
            Consumable::Tarot(t) => t.selection_count(),
            Consumable::Planet(_) => (0, 0),
        }
    }

    /// 檢查選牌數量
    ///
    /// 需要選牌的消耗品收到 0 張視為呼叫端錯誤，直接 panic。
    pub fn check_selection(&self, selected: usize) -> Result<(), ConsumableError> {
        let (min, max) = self.selection_count();
        assert!(
            min == 0 || selected > 0,
            "{} requires a card selection",
            self.name()
        );
        if selected > max {
            return Err(ConsumableError::TooManySelected { max, got: selected });
        }
        if selected < min {
            return Err(ConsumableError::TooFewSelected { min, got: selected });
        }
        Ok(())
    }
}

/// 消耗品槽位
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsumableSlots {
    items: Vec<Consumable>,
    capacity: usize,
}

impl ConsumableSlots {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn items(&self) -> &[Consumable] {
        &self.items
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    /// 放入消耗品，槽位已滿回傳 false
    pub fn add(&mut self, consumable: Consumable) -> bool {
        if self.is_full() {
            return false;
        }
        self.items.push(consumable);
        true
    }

    /// 放回指定位置（使用失敗時還原用）
    pub fn insert(&mut self, index: usize, consumable: Consumable) {
        let index = index.min(self.items.len());
        self.items.insert(index, consumable);
    }

    pub fn take(&mut self, index: usize) -> Option<Consumable> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.items.len())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planet_hand_type_mapping() {
        assert_eq!(PlanetId::Pluto.hand_id(), HandId::HighCard);
        assert_eq!(PlanetId::Mercury.hand_id(), HandId::Pair);
        assert_eq!(PlanetId::Neptune.hand_id(), HandId::StraightFlush);
        assert_eq!(PlanetId::Eris.hand_id(), HandId::FlushFive);
        assert_eq!(PlanetId::for_hand(HandId::RoyalFlush), None);
        assert_eq!(PlanetId::for_hand(HandId::Flush), Some(PlanetId::Jupiter));
    }

    #[test]
    fn test_planets_cover_distinct_hands() {
        for (i, a) in PlanetId::ALL.iter().enumerate() {
            for b in &PlanetId::ALL[i + 1..] {
                assert_ne!(a.hand_id(), b.hand_id());
            }
        }
    }

    #[test]
    fn test_selection_counts() {
        assert_eq!(TarotId::Death.selection_count(), (2, 2));
        assert_eq!(TarotId::TheStar.selection_count(), (1, 3));
        assert_eq!(TarotId::TheHermit.selection_count(), (0, 0));
        assert_eq!(Consumable::Planet(PlanetId::Mars).selection_count(), (0, 0));
    }

    #[test]
    fn test_check_selection() {
        let death = Consumable::Tarot(TarotId::Death);
        assert_eq!(
            death.check_selection(1),
            Err(ConsumableError::TooFewSelected { min: 2, got: 1 })
        );
        assert_eq!(
            death.check_selection(3),
            Err(ConsumableError::TooManySelected { max: 2, got: 3 })
        );
        assert!(death.check_selection(2).is_ok());
        assert!(Consumable::Tarot(TarotId::TheHermit).check_selection(0).is_ok());
    }

    #[test]
    #[should_panic(expected = "requires a card selection")]
    fn test_empty_selection_panics() {
        let _ = Consumable::Tarot(TarotId::TheLovers).check_selection(0);
    }

    #[test]
    fn test_consumable_slots() {
        let mut slots = ConsumableSlots::new(2);
        assert!(slots.add(Consumable::Tarot(TarotId::TheFool)));
        assert!(slots.add(Consumable::Planet(PlanetId::Pluto)));
        assert!(slots.is_full());
        assert!(!slots.add(Consumable::Tarot(TarotId::Death)));

        let taken = slots.take(0);
        assert_eq!(taken, Some(Consumable::Tarot(TarotId::TheFool)));
        assert_eq!(slots.remaining(), 1);
        assert_eq!(slots.take(5), None);
    }

    #[test]
    fn test_enhancing_tarots() {
        let enhancing: Vec<TarotId> = TarotId::ALL
            .iter()
            .copied()
            .filter(|t| t.enhancement().is_some())
            .collect();
        assert_eq!(enhancing.len(), 8);
        for tarot in enhancing {
            assert!(tarot.selection_count().0 >= 1);
        }
    }
}
