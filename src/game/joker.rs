//! Joker 系統
//!
//! 每個 Joker 由 `JokerId` 靜態分發，透過統一的 hook 介面貢獻分數：
//! - 每張計分牌：`card_chips` / `card_mult`
//! - 整手牌：`hand_chips` / `hand_mult` / `hand_mult_factor` / `hand_money`
//! - 事件：`on_hand_scored`（可能要求移除自己或升級牌型）、`on_round_end`
//!
//! 未涉及的 hook 回傳中性元素。

use rand::Rng;

use super::cards::{roll, Edition, Enhancement, PlayingCard, Rank, Suit};
use super::hand_types::HandId;
use super::scoring::{HandContents, JokerRules};
use super::vouchers::{discount_rate, VoucherId};

// ============================================================================
// Joker ID
// ============================================================================

/// Joker 數量
pub const JOKER_COUNT: usize = 37;

/// 稀有度
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

/// Joker 的效果分類
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JokerKind {
    Chips,
    AdditiveMult,
    MultiplicativeMult,
    Effect,
    Retrigger,
    Economy,
}

/// Joker 唯一識別碼
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JokerId {
    // ====== 基礎 Mult / Chips ======
    Joker,           // +4 Mult
    GreedyJoker,     // +3 Mult per Diamond
    LustyJoker,      // +3 Mult per Heart
    WrathfulJoker,   // +3 Mult per Spade
    GluttonousJoker, // +3 Mult per Club
    JollyJoker,      // +8 Mult (Pair)
    ZanyJoker,       // +12 Mult (Three of a Kind)
    MadJoker,        // +10 Mult (Two Pair)
    CrazyJoker,      // +12 Mult (Straight)
    DrollJoker,      // +10 Mult (Flush)
    SlyJoker,        // +50 Chips (Pair)
    WilyJoker,       // +100 Chips (Three of a Kind)
    CleverJoker,     // +80 Chips (Two Pair)
    DeviousJoker,    // +100 Chips (Straight)
    CraftyJoker,     // +80 Chips (Flush)
    HalfJoker,       // +20 Mult if <=3 cards

    // ====== 每張計分牌 ======
    Scholar,    // Aces give +20 Chips and +4 Mult
    ScaryFace,  // Face cards give +30 Chips
    SmileyFace, // Face cards give +5 Mult
    Fibonacci,  // Ace/2/3/5/8 give +8 Mult

    // ====== 乘法 ======
    JokerStencil, // X1 Mult per empty Joker slot
    TheDuo,       // X2 Mult if hand contains Pair
    TheTrio,      // X3 Mult if hand contains Three of a Kind
    Cavendish,    // X3 Mult, 1/1000 chance to self-destruct

    // ====== 狀態 ======
    RideTheBus, // +1 Mult per consecutive hand without scoring face card
    GrosMichel, // +15 Mult, 1/6 chance to self-destruct
    SpaceJoker, // 1/4 chance to upgrade played hand level

    // ====== 經濟 ======
    Egg,          // +$3 sell value per round
    GoldenJoker,  // +$4 at end of round
    GoldenTicket, // +$4 per scored Gold card

    // ====== 規則修改 ======
    FourFingers,   // Straights/Flushes can be made with 4 cards
    Pareidolia,    // All cards count as Face cards
    Showman,       // Shop may show duplicates
    OopsAll6s,     // Doubles all probabilities
    ChaosTheClown, // 1 free reroll per shop
    Hack,          // Retrigger 2/3/4/5 cards
    Mime,          // Retrigger abilities of cards held in hand
}

impl JokerId {
    pub const ALL: [JokerId; JOKER_COUNT] = [
        JokerId::Joker,
        JokerId::GreedyJoker,
        JokerId::LustyJoker,
        JokerId::WrathfulJoker,
        JokerId::GluttonousJoker,
        JokerId::JollyJoker,
        JokerId::ZanyJoker,
        JokerId::MadJoker,
        JokerId::CrazyJoker,
        JokerId::DrollJoker,
        JokerId::SlyJoker,
        JokerId::WilyJoker,
        JokerId::CleverJoker,
        JokerId::DeviousJoker,
        JokerId::CraftyJoker,
        JokerId::HalfJoker,
        JokerId::Scholar,
        JokerId::ScaryFace,
        JokerId::SmileyFace,
        JokerId::Fibonacci,
        JokerId::JokerStencil,
        JokerId::TheDuo,
        JokerId::TheTrio,
        JokerId::Cavendish,
        JokerId::RideTheBus,
        JokerId::GrosMichel,
        JokerId::SpaceJoker,
        JokerId::Egg,
        JokerId::GoldenJoker,
        JokerId::GoldenTicket,
        JokerId::FourFingers,
        JokerId::Pareidolia,
        JokerId::Showman,
        JokerId::OopsAll6s,
        JokerId::ChaosTheClown,
        JokerId::Hack,
        JokerId::Mime,
    ];

    /// 獲取 Joker 的基礎成本
    pub fn base_cost(&self) -> i64 {
        match self {
            JokerId::Joker => 2,
            JokerId::JollyJoker | JokerId::SlyJoker => 3,
            JokerId::ZanyJoker | JokerId::MadJoker | JokerId::CrazyJoker | JokerId::DrollJoker => 4,
            JokerId::WilyJoker | JokerId::CleverJoker | JokerId::DeviousJoker | JokerId::CraftyJoker => 4,
            JokerId::GreedyJoker
            | JokerId::LustyJoker
            | JokerId::WrathfulJoker
            | JokerId::GluttonousJoker => 5,
            JokerId::HalfJoker => 5,
            JokerId::Scholar | JokerId::ScaryFace | JokerId::SmileyFace => 4,
            JokerId::Fibonacci => 8,
            JokerId::JokerStencil => 8,
            JokerId::TheDuo | JokerId::TheTrio => 8,
            JokerId::Cavendish => 4,
            JokerId::RideTheBus => 6,
            JokerId::GrosMichel => 5,
            JokerId::SpaceJoker => 5,
            JokerId::Egg => 4,
            JokerId::GoldenJoker => 6,
            JokerId::GoldenTicket => 5,
            JokerId::FourFingers => 7,
            JokerId::Pareidolia | JokerId::Showman | JokerId::Mime => 5,
            JokerId::OopsAll6s | JokerId::ChaosTheClown => 4,
            JokerId::Hack => 6,
        }
    }

    pub fn rarity(&self) -> Rarity {
        match self {
            JokerId::JokerStencil
            | JokerId::FourFingers
            | JokerId::Mime
            | JokerId::Showman
            | JokerId::OopsAll6s
            | JokerId::Hack
            | JokerId::Pareidolia
            | JokerId::Fibonacci
            | JokerId::SpaceJoker => Rarity::Uncommon,
            JokerId::TheDuo | JokerId::TheTrio => Rarity::Rare,
            _ => Rarity::Common,
        }
    }

    pub fn kind(&self) -> JokerKind {
        match self {
            JokerId::SlyJoker
            | JokerId::WilyJoker
            | JokerId::CleverJoker
            | JokerId::DeviousJoker
            | JokerId::CraftyJoker
            | JokerId::ScaryFace => JokerKind::Chips,
            JokerId::JokerStencil | JokerId::TheDuo | JokerId::TheTrio | JokerId::Cavendish => {
                JokerKind::MultiplicativeMult
            }
            JokerId::Hack | JokerId::Mime => JokerKind::Retrigger,
            JokerId::Egg | JokerId::GoldenJoker | JokerId::GoldenTicket => JokerKind::Economy,
            JokerId::FourFingers
            | JokerId::Pareidolia
            | JokerId::Showman
            | JokerId::OopsAll6s
            | JokerId::ChaosTheClown
            | JokerId::SpaceJoker => JokerKind::Effect,
            _ => JokerKind::AdditiveMult,
        }
    }

    /// 按稀有度獲取 Joker 列表
    pub fn by_rarity(rarity: Rarity) -> Vec<JokerId> {
        Self::ALL.iter().copied().filter(|j| j.rarity() == rarity).collect()
    }

    /// 花色類 Joker 對應的花色
    fn suit(&self) -> Option<Suit> {
        match self {
            JokerId::GreedyJoker => Some(Suit::Diamonds),
            JokerId::LustyJoker => Some(Suit::Hearts),
            JokerId::WrathfulJoker => Some(Suit::Spades),
            JokerId::GluttonousJoker => Some(Suit::Clubs),
            _ => None,
        }
    }
}

// ============================================================================
// 計分上下文與事件
// ============================================================================

/// 整手牌 hook 的上下文
pub struct HandContext<'a> {
    pub id: HandId,
    pub scored: &'a [PlayingCard],
    pub contents: HandContents,
    pub rules: &'a JokerRules,
    /// 計分開始時的 Joker 快照
    pub roster: &'a [Joker],
    pub joker_slots: usize,
}

impl HandContext<'_> {
    fn has_scored_face(&self) -> bool {
        self.scored
            .iter()
            .any(|c| !c.is_stone() && c.is_face(self.rules.pareidolia))
    }
}

/// `on_hand_scored` 要求套用到盤面的變更
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JokerEvent {
    /// 從名單中移除自己
    Destroyed,
    /// 升級牌型
    LevelUp(HandId),
}

// ============================================================================
// Joker 實例
// ============================================================================

/// 盤面上的 Joker
#[derive(Clone, Debug, PartialEq)]
pub struct Joker {
    pub id: JokerId,
    pub edition: Edition,
    /// Ride the Bus 連續次數
    pub counter: u32,
    /// Egg 累積的額外售價
    pub extra_sell_value: i64,
}

impl Joker {
    pub fn new(id: JokerId) -> Self {
        Self {
            id,
            edition: Edition::Base,
            counter: 0,
            extra_sell_value: 0,
        }
    }

    pub fn with_edition(mut self, edition: Edition) -> Self {
        self.edition = edition;
        self
    }

    pub fn is_negative(&self) -> bool {
        self.edition.is_negative()
    }

    /// 購買價格：(基礎 + 版本加價) 套用 Voucher 折扣後向下取整
    pub fn cost(&self, vouchers: &[VoucherId]) -> i64 {
        let full = (self.id.base_cost() + self.edition.surcharge()) as f64;
        (full * (1.0 - discount_rate(vouchers))).floor() as i64
    }

    /// 售價：價格的一半（向下取整，最少 1）加上累積售價
    pub fn sell_value(&self, vouchers: &[VoucherId]) -> i64 {
        (self.cost(vouchers) / 2).max(1) + self.extra_sell_value
    }

    // ------------------------------------------------------------------
    // 每張計分牌
    // ------------------------------------------------------------------

    pub fn card_chips(&self, card: &PlayingCard, rules: &JokerRules) -> i64 {
        if card.is_stone() {
            return 0;
        }
        match self.id {
            JokerId::Scholar if card.rank == Rank::Ace => 20,
            JokerId::ScaryFace if card.is_face(rules.pareidolia) => 30,
            _ => 0,
        }
    }

    pub fn card_mult(&self, card: &PlayingCard, rules: &JokerRules) -> i64 {
        if card.is_stone() {
            return 0;
        }
        match self.id {
            JokerId::Scholar if card.rank == Rank::Ace => 4,
            JokerId::SmileyFace if card.is_face(rules.pareidolia) => 5,
            JokerId::Fibonacci
                if matches!(
                    card.rank,
                    Rank::Ace | Rank::Two | Rank::Three | Rank::Five | Rank::Eight
                ) =>
            {
                8
            }
            _ => 0,
        }
    }

    // ------------------------------------------------------------------
    // 整手牌
    // ------------------------------------------------------------------

    pub fn hand_chips(&self, ctx: &HandContext) -> i64 {
        let c = &ctx.contents;
        match self.id {
            JokerId::SlyJoker if c.pair => 50,
            JokerId::WilyJoker if c.three => 100,
            JokerId::CleverJoker if c.two_pair => 80,
            JokerId::DeviousJoker if c.straight => 100,
            JokerId::CraftyJoker if c.flush => 80,
            _ => 0,
        }
    }

    pub fn hand_mult(&self, ctx: &HandContext) -> i64 {
        let c = &ctx.contents;
        if let Some(suit) = self.id.suit() {
            let matching = ctx.scored.iter().filter(|card| card.has_suit(suit)).count();
            return 3 * matching as i64;
        }
        match self.id {
            JokerId::Joker => 4,
            JokerId::JollyJoker if c.pair => 8,
            JokerId::ZanyJoker if c.three => 12,
            JokerId::MadJoker if c.two_pair => 10,
            JokerId::CrazyJoker if c.straight => 12,
            JokerId::DrollJoker if c.flush => 10,
            JokerId::HalfJoker if ctx.scored.len() <= 3 => 20,
            JokerId::GrosMichel => 15,
            JokerId::RideTheBus if !ctx.has_scored_face() => self.counter as i64 + 1,
            _ => 0,
        }
    }

    pub fn hand_mult_factor(&self, ctx: &HandContext) -> f64 {
        match self.id {
            JokerId::TheDuo if ctx.contents.pair => 2.0,
            JokerId::TheTrio if ctx.contents.three => 3.0,
            JokerId::Cavendish => 3.0,
            JokerId::JokerStencil => {
                // Stencil 自己也算空位
                let occupied = ctx
                    .roster
                    .iter()
                    .filter(|j| !j.is_negative() && j.id != JokerId::JokerStencil)
                    .count();
                ctx.joker_slots.saturating_sub(occupied).max(1) as f64
            }
            _ => 1.0,
        }
    }

    pub fn hand_money(&self, ctx: &HandContext) -> i64 {
        match self.id {
            JokerId::GoldenTicket => {
                let gold = ctx
                    .scored
                    .iter()
                    .filter(|c| c.enhancement == Enhancement::Gold)
                    .count();
                4 * gold as i64
            }
            _ => 0,
        }
    }

    // ------------------------------------------------------------------
    // 事件
    // ------------------------------------------------------------------

    /// 一手牌計分完畢後呼叫，每次計分每個 Joker 恰好一次
    pub fn on_hand_scored<R: Rng + ?Sized>(
        &mut self,
        ctx: &HandContext,
        rng: &mut R,
    ) -> Option<JokerEvent> {
        let probability = ctx.rules.probability_modifier;
        match self.id {
            JokerId::RideTheBus => {
                self.counter = if ctx.has_scored_face() { 0 } else { self.counter + 1 };
                None
            }
            JokerId::GrosMichel if roll(rng, 1.0 / 6.0, probability) => Some(JokerEvent::Destroyed),
            JokerId::Cavendish if roll(rng, 1.0 / 1000.0, probability) => Some(JokerEvent::Destroyed),
            JokerId::SpaceJoker if roll(rng, 1.0 / 4.0, probability) => Some(JokerEvent::LevelUp(ctx.id)),
            _ => None,
        }
    }

    pub fn on_round_end(&mut self) {
        if self.id == JokerId::Egg {
            self.extra_sell_value += 3;
        }
    }

    pub fn end_of_round_money(&self) -> i64 {
        match self.id {
            JokerId::GoldenJoker => 4,
            _ => 0,
        }
    }
}

// ============================================================================
// 單元測試
// ============================================================================
