//! 遊戲常量定義

// ============================================================================
// 遊戲規則常量
// ============================================================================

pub const HAND_SIZE: usize = 8;          // 手牌數量
pub const MAX_SELECTED: usize = 5;       // 最多選擇 5 張打出
pub const JOKER_SLOTS: usize = 5;        // Joker 欄位數
pub const CONSUMABLE_SLOTS: usize = 2;   // 消耗品槽位
pub const PLAYS_PER_BLIND: i32 = 4;      // 每 Blind 出牌次數
pub const DISCARDS_PER_BLIND: i32 = 3;   // 每 Blind 棄牌次數
pub const STARTING_MONEY: i64 = 4;       // 起始金幣

// ============================================================================
// 商店常量
// ============================================================================

pub const SHOP_BUYABLE_SLOTS: usize = 2; // 商店卡牌槽位
pub const SHOP_VOUCHER_SLOTS: usize = 1; // 商店 Voucher 槽位
pub const BASE_REROLL_PRICE: i64 = 5;    // 基礎 reroll 費用
pub const CONSUMABLE_COST: i64 = 3;      // Tarot / Planet 售價

// ============================================================================
// 機率常量
// ============================================================================

pub const LUCKY_MULT_CHANCE: f64 = 1.0 / 5.0;
pub const LUCKY_MONEY_CHANCE: f64 = 1.0 / 15.0;
pub const GLASS_SHATTER_CHANCE: f64 = 1.0 / 4.0;

pub const HAND_TYPE_COUNT: usize = 13;   // 含進階牌型: FiveKind, FlushHouse, FlushFive
