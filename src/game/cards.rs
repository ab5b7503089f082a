//! 卡牌和增強系統定義
//!
//! 每張牌有三個互相獨立的修飾槽（Enhancement / Edition / Seal），
//! 全部透過 [`ScoreModifier`] 提供統一的數值投影。

use rand::Rng;

use super::constants::{GLASS_SHATTER_CHANCE, LUCKY_MONEY_CHANCE, LUCKY_MULT_CHANCE};

/// 以機率擲骰
///
/// 抽一個 [0,1) 均勻值，與 `chance * probability_modifier`（上限 1）比較。
pub fn roll<R: Rng + ?Sized>(rng: &mut R, chance: f64, probability_modifier: f64) -> bool {
    rng.gen::<f64>() <= (chance * probability_modifier).min(1.0)
}

// ============================================================================
// 修飾器數值介面
// ============================================================================

/// 計分修飾器的統一數值介面
///
/// 未覆寫的投影回傳中性元素：加法類為 0，乘法類為 1.0。
pub trait ScoreModifier {
    fn chip_contribution(&self) -> i64 {
        0
    }

    fn mult_addend<R: Rng + ?Sized>(&self, _rng: &mut R, _probability_modifier: f64) -> i64 {
        0
    }

    fn mult_factor(&self) -> f64 {
        1.0
    }

    fn scored_money<R: Rng + ?Sized>(&self, _rng: &mut R, _probability_modifier: f64) -> i64 {
        0
    }

    fn end_of_round_money(&self) -> i64 {
        0
    }
}

// ============================================================================
// 點數與花色
// ============================================================================

/// 花色
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Suit {
    Spades,
    Diamonds,
    Hearts,
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Diamonds, Suit::Hearts, Suit::Clubs];

    pub fn to_int(&self) -> u8 {
        match self {
            Suit::Spades => 0,
            Suit::Diamonds => 1,
            Suit::Hearts => 2,
            Suit::Clubs => 3,
        }
    }
}

/// 點數（Ace = 1）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    Ace = 1,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// 順序值 1..=13（Ace 為 1，A 高順子另外處理）
    pub fn to_int(&self) -> u8 {
        *self as u8
    }

    /// 點數本身的 chips
    pub fn chips(&self) -> i64 {
        match self {
            Rank::Ace => 11,
            Rank::Jack | Rank::Queen | Rank::King => 10,
            other => other.to_int() as i64,
        }
    }

    pub fn is_face(&self) -> bool {
        matches!(self, Rank::Jack | Rank::Queen | Rank::King)
    }

    /// 下一個點數，K 之後回到 A
    pub fn next(&self) -> Rank {
        Self::ALL[(self.to_int() % 13) as usize]
    }
}

// ============================================================================
// 修飾槽
// ============================================================================

/// 卡片增強類型
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Enhancement {
    #[default]
    None,
    Bonus, // +50 chips
    Mult,  // +4 mult
    Wild,  // 可當任意花色
    Glass, // x2 Mult，1/4 機率破碎
    Steel, // x1.5 Mult（在手牌中時）
    Stone, // chips 固定 50，不計花色/點數
    Gold,  // 回合結束時留在手中 +$3
    Lucky, // 1/5 機率 +20 Mult，1/15 機率 +$20
}

impl Enhancement {
    /// 是否取代點數 chips（而非疊加）
    pub fn replaces_base_chips(&self) -> bool {
        matches!(self, Enhancement::Stone)
    }

    pub fn replacement_chips(&self) -> i64 {
        match self {
            Enhancement::Stone => 50,
            _ => 0,
        }
    }

    /// 是否可當任意花色
    pub fn is_wild(&self) -> bool {
        matches!(self, Enhancement::Wild)
    }

    /// 是否沒有花色與點數
    pub fn is_suitless(&self) -> bool {
        matches!(self, Enhancement::Stone)
    }

    /// 留在手中時的乘法加成（Steel）
    pub fn held_mult_factor(&self) -> f64 {
        match self {
            Enhancement::Steel => 1.5,
            _ => 1.0,
        }
    }

    /// Glass 破碎判定
    pub fn shatters<R: Rng + ?Sized>(&self, rng: &mut R, probability_modifier: f64) -> bool {
        match self {
            Enhancement::Glass => roll(rng, GLASS_SHATTER_CHANCE, probability_modifier),
            _ => false,
        }
    }
}

impl ScoreModifier for Enhancement {
    fn chip_contribution(&self) -> i64 {
        match self {
            Enhancement::Bonus => 50,
            _ => 0,
        }
    }

    fn mult_addend<R: Rng + ?Sized>(&self, rng: &mut R, probability_modifier: f64) -> i64 {
        match self {
            Enhancement::Mult => 4,
            Enhancement::Lucky if roll(rng, LUCKY_MULT_CHANCE, probability_modifier) => 20,
            _ => 0,
        }
    }

    fn mult_factor(&self) -> f64 {
        match self {
            Enhancement::Glass => 2.0,
            _ => 1.0,
        }
    }

    fn scored_money<R: Rng + ?Sized>(&self, rng: &mut R, probability_modifier: f64) -> i64 {
        match self {
            Enhancement::Lucky if roll(rng, LUCKY_MONEY_CHANCE, probability_modifier) => 20,
            _ => 0,
        }
    }

    fn end_of_round_money(&self) -> i64 {
        match self {
            Enhancement::Gold => 3,
            _ => 0,
        }
    }
}

/// 卡片封印類型
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Seal {
    #[default]
    None,
    Gold,   // 打出時 +$3
    Red,    // 觸發 2 次
    Blue,   // 回合結束留在手中時創建 Planet 卡
    Purple, // 棄掉時創建 Tarot 卡
}

impl Seal {
    /// 額外觸發次數
    pub fn retriggers(&self) -> u32 {
        match self {
            Seal::Red => 1,
            _ => 0,
        }
    }

    pub fn creates_planet(&self) -> bool {
        matches!(self, Seal::Blue)
    }

    pub fn creates_tarot(&self) -> bool {
        matches!(self, Seal::Purple)
    }
}

impl ScoreModifier for Seal {
    fn scored_money<R: Rng + ?Sized>(&self, _rng: &mut R, _probability_modifier: f64) -> i64 {
        match self {
            Seal::Gold => 3,
            _ => 0,
        }
    }
}

/// 卡片版本類型（Joker 共用）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Edition {
    #[default]
    Base,
    Foil,        // +50 chips
    Holographic, // +10 mult
    Polychrome,  // x1.5 mult
    Negative,    // +1 Joker slot
}

impl Edition {
    pub fn is_negative(&self) -> bool {
        matches!(self, Edition::Negative)
    }

    /// Joker 帶版本時的額外售價
    pub fn surcharge(&self) -> i64 {
        match self {
            Edition::Base => 0,
            Edition::Foil => 2,
            Edition::Holographic => 3,
            Edition::Polychrome | Edition::Negative => 5,
        }
    }
}

impl ScoreModifier for Edition {
    fn chip_contribution(&self) -> i64 {
        match self {
            Edition::Foil => 50,
            _ => 0,
        }
    }

    fn mult_addend<R: Rng + ?Sized>(&self, _rng: &mut R, _probability_modifier: f64) -> i64 {
        match self {
            Edition::Holographic => 10,
            _ => 0,
        }
    }

    fn mult_factor(&self) -> f64 {
        match self {
            Edition::Polychrome => 1.5,
            _ => 1.0,
        }
    }
}

// ============================================================================
// 撲克牌
// ============================================================================

/// 單次觸發的數值貢獻
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardTrigger {
    pub chips: i64,
    pub mult: i64,
    pub mult_factor: f64,
    pub money: i64,
}

/// 撲克牌
///
/// 相等比較只看點數、花色、chips 總和、版本和封印，不看增強。
#[derive(Clone, Copy, Debug)]
pub struct PlayingCard {
    pub rank: Rank,
    pub suit: Suit,
    pub enhancement: Enhancement,
    pub edition: Edition,
    pub seal: Seal,
    pub bonus_chips: i64, // 永久 chips 加成
}

impl PartialEq for PlayingCard {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank
            && self.suit == other.suit
            && self.chip_total() == other.chip_total()
            && self.edition == other.edition
            && self.seal == other.seal
    }
}

impl Eq for PlayingCard {}

impl PlayingCard {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self {
            rank,
            suit,
            enhancement: Enhancement::None,
            edition: Edition::Base,
            seal: Seal::None,
            bonus_chips: 0,
        }
    }

    pub fn with_enhancement(mut self, enhancement: Enhancement) -> Self {
        self.enhancement = enhancement;
        self
    }

    pub fn with_edition(mut self, edition: Edition) -> Self {
        self.edition = edition;
        self
    }

    pub fn with_seal(mut self, seal: Seal) -> Self {
        self.seal = seal;
        self
    }

    /// 點數 chips 加永久加成
    pub fn chip_total(&self) -> i64 {
        self.rank.chips() + self.bonus_chips
    }

    /// 實際計分 chips（Stone 取代點數 chips）
    pub fn effective_chips(&self) -> i64 {
        if self.enhancement.replaces_base_chips() {
            self.enhancement.replacement_chips()
        } else {
            self.chip_total() + self.enhancement.chip_contribution()
        }
    }

    /// 有效花色集合：Wild 為全部，Stone 為空
    pub fn effective_suits(&self) -> Vec<Suit> {
        Suit::ALL.iter().copied().filter(|&s| self.has_suit(s)).collect()
    }

    pub fn has_suit(&self, suit: Suit) -> bool {
        if self.enhancement.is_suitless() {
            false
        } else if self.enhancement.is_wild() {
            true
        } else {
            self.suit == suit
        }
    }

    pub fn is_stone(&self) -> bool {
        self.enhancement.is_suitless()
    }

    /// 是否為人頭牌（Pareidolia 下所有牌都是）
    pub fn is_face(&self, pareidolia: bool) -> bool {
        pareidolia || self.rank.is_face()
    }

    /// 觸發次數（Red Seal +1）
    pub fn trigger_count(&self) -> u32 {
        1 + self.seal.retriggers()
    }

    /// 計分時單次觸發的貢獻
    ///
    /// Lucky 的 mult 與 money 各自獨立擲骰。
    pub fn trigger<R: Rng + ?Sized>(&self, rng: &mut R, probability_modifier: f64) -> CardTrigger {
        let mult = self.enhancement.mult_addend(rng, probability_modifier)
            + self.edition.mult_addend(rng, probability_modifier);
        let money = self.enhancement.scored_money(rng, probability_modifier)
            + self.seal.scored_money(rng, probability_modifier);
        CardTrigger {
            chips: self.effective_chips() + self.edition.chip_contribution(),
            mult,
            mult_factor: self.enhancement.mult_factor() * self.edition.mult_factor(),
            money,
        }
    }

    /// 留在手中時的乘法加成
    pub fn held_mult_factor(&self) -> f64 {
        self.enhancement.held_mult_factor()
    }

    /// 回合結束留在手中的金幣
    pub fn end_of_round_money(&self) -> i64 {
        self.enhancement.end_of_round_money() + self.edition.end_of_round_money()
    }
}

/// 標準 52 張牌組
pub fn standard_deck() -> Vec<PlayingCard> {
    let mut deck = Vec::with_capacity(52);
    for &suit in Suit::ALL.iter() {
        for &rank in Rank::ALL.iter() {
            deck.push(PlayingCard::new(rank, suit));
        }
    }
    deck
}

// ============================================================================
// 單元測試
// ============================================================================
