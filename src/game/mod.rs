//! 遊戲核心模組
//!
//! 包含規則資料與不需要整個盤面的邏輯：
//! - `constants`: 遊戲常量
//! - `cards`: 卡牌、增強、封印、版本定義
//! - `decks`: 牌組存放
//! - `hand_types`: 牌型定義與等級表
//! - `scoring`: 牌型判定
//! - `joker`: Joker 系統
//! - `consumables`: 消耗品系統 (Tarot/Planet)
//! - `vouchers`: Voucher 永久升級系統
//! - `shop`: 商店系統
//! - `blinds`: Blind 與目標分數
//! - `config`: 遊戲設定

pub mod constants;
pub mod cards;
pub mod decks;
pub mod hand_types;
pub mod scoring;
pub mod joker;
pub mod consumables;
pub mod vouchers;
pub mod shop;
pub mod blinds;
pub mod config;

pub use cards::{CardTrigger, Edition, Enhancement, PlayingCard, Rank, ScoreModifier, Seal, Suit, standard_deck};
pub use decks::Deck;
pub use hand_types::{HandId, HandLevel, HandLevels, HandScore};
pub use scoring::{classify, classify_with_rules, HandClassification, HandContents, JokerRules};
pub use joker::{HandContext, Joker, JokerEvent, JokerId, JokerKind, Rarity, JOKER_COUNT};
pub use consumables::{Consumable, ConsumableError, ConsumableSlots, PlanetId, TarotId};
pub use vouchers::{VoucherId, VOUCHER_COUNT};
pub use shop::{Shop, ShopError, ShopItem};
pub use blinds::{required_score, BlindType};
pub use config::{BoardConfig, ConfigError, GameConfig, ShopConfig};
