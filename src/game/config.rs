//! 遊戲設定
//!
//! 以 JSON 載入，缺少的欄位使用預設值。

use serde::Deserialize;
use thiserror::Error;

use super::constants::{
    BASE_REROLL_PRICE, CONSUMABLE_SLOTS, DISCARDS_PER_BLIND, HAND_SIZE, JOKER_SLOTS,
    PLAYS_PER_BLIND, SHOP_BUYABLE_SLOTS, SHOP_VOUCHER_SLOTS, STARTING_MONEY,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// 盤面設定
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub starting_money: i64,
    pub joker_slots: usize,
    pub consumable_slots: usize,
    pub hand_size: usize,
    pub hands_per_round: i32,
    pub discards_per_round: i32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            starting_money: STARTING_MONEY,
            joker_slots: JOKER_SLOTS,
            consumable_slots: CONSUMABLE_SLOTS,
            hand_size: HAND_SIZE,
            hands_per_round: PLAYS_PER_BLIND,
            discards_per_round: DISCARDS_PER_BLIND,
        }
    }
}

/// 商店設定
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    pub buyable_slots: usize,
    pub voucher_slots: usize,
    pub base_reroll_price: i64,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            buyable_slots: SHOP_BUYABLE_SLOTS,
            voucher_slots: SHOP_VOUCHER_SLOTS,
            base_reroll_price: BASE_REROLL_PRICE,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board: BoardConfig,
    pub shop: ShopConfig,
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.board.hand_size == 0 {
            return Err(ConfigError::Zero("board.hand_size"));
        }
        if self.board.hands_per_round <= 0 {
            return Err(ConfigError::Zero("board.hands_per_round"));
        }
        Ok(())
    }
}

// ============================================================================
// 單元測試
// ============================================================================
