//! 商店系統
//!
//! 處理商品生成與 Reroll 計價；扣款與放入盤面由 `service::state` 負責。

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use super::cards::Edition;
use super::config::ShopConfig;
use super::consumables::{Consumable, PlanetId, TarotId};
use super::joker::{Joker, JokerId, Rarity};
use super::vouchers::{discount_rate, edition_rate, extra_shop_slots, reroll_discount, VoucherId};

/// 每個商品槽出現 Tarot / Planet 的機率
const TAROT_RATE: f64 = 1.0 / 7.0;
const PLANET_RATE: f64 = 1.0 / 7.0;

/// Joker 稀有度機率（Common / Uncommon，其餘為 Rare）
const COMMON_RATE: f64 = 0.70;
const UNCOMMON_RATE: f64 = 0.25;

/// Joker 版本基礎機率
const POLYCHROME_RATE: f64 = 0.003;
const HOLOGRAPHIC_RATE: f64 = 0.014;
const FOIL_RATE: f64 = 0.02;

/// 商店操作失敗的原因
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ShopError {
    #[error("not enough money: need {cost}, have {money}")]
    InsufficientFunds { cost: i64, money: i64 },
    #[error("no item at index {0}")]
    NoSuchItem(usize),
    #[error("no free joker slot")]
    NoFreeJokerSlot,
    #[error("no free consumable slot")]
    NoFreeConsumableSlot,
    #[error("voucher {0:?} is already owned or missing its prerequisite")]
    VoucherUnavailable(VoucherId),
}

/// 商店物品
#[derive(Clone, Debug, PartialEq)]
pub enum ShopItem {
    Joker(Joker),
    Consumable(Consumable),
}

impl ShopItem {
    /// 套用 Voucher 折扣後的價格
    pub fn cost(&self, vouchers: &[VoucherId]) -> i64 {
        match self {
            ShopItem::Joker(joker) => joker.cost(vouchers),
            ShopItem::Consumable(c) => discounted(c.cost(), vouchers),
        }
    }
}

fn discounted(price: i64, vouchers: &[VoucherId]) -> i64 {
    (price as f64 * (1.0 - discount_rate(vouchers))).floor() as i64
}

/// 商店
#[derive(Clone, Debug)]
pub struct Shop {
    pub items: Vec<ShopItem>,
    pub vouchers: Vec<VoucherId>,
    config: ShopConfig,
    reroll_count: i64,
    free_reroll_used: bool,
}

impl Default for Shop {
    fn default() -> Self {
        Self::new(ShopConfig::default())
    }
}

impl Shop {
    pub fn new(config: ShopConfig) -> Self {
        Self {
            items: Vec::new(),
            vouchers: Vec::new(),
            config,
            reroll_count: 0,
            free_reroll_used: false,
        }
    }

    /// 進入新一輪商店
    ///
    /// `round` 從 1 開始；第 1、4、7… 輪刷新 Voucher。Reroll 計價歸零。
    pub fn restock<R: Rng + ?Sized>(
        &mut self,
        round: u32,
        jokers: &[Joker],
        owned_vouchers: &[VoucherId],
        rng: &mut R,
    ) {
        self.reroll_count = 0;
        self.free_reroll_used = false;

        if round % 3 == 1 {
            self.vouchers.clear();
            let mut available = VoucherId::available(owned_vouchers);
            available.shuffle(rng);
            available.truncate(self.config.voucher_slots);
            self.vouchers = available;
        }

        self.refresh(jokers, owned_vouchers, rng);
        debug!(
            "shop restocked for round {}: {} items, {} vouchers",
            round,
            self.items.len(),
            self.vouchers.len()
        );
    }

    /// 重新生成可購買的商品
    pub fn refresh<R: Rng + ?Sized>(&mut self, jokers: &[Joker], owned_vouchers: &[VoucherId], rng: &mut R) {
        self.items.clear();
        let showman = jokers.iter().any(|j| j.id == JokerId::Showman);
        let slots = self.config.buyable_slots + extra_shop_slots(owned_vouchers);

        for _ in 0..slots {
            let roll: f64 = rng.gen();
            let item = if roll < TAROT_RATE {
                Some(ShopItem::Consumable(Consumable::Tarot(TarotId::random(rng))))
            } else if roll < TAROT_RATE + PLANET_RATE {
                Some(ShopItem::Consumable(Consumable::Planet(PlanetId::random(rng))))
            } else {
                let taken: Vec<JokerId> = jokers
                    .iter()
                    .map(|j| j.id)
                    .chain(self.items.iter().filter_map(|item| match item {
                        ShopItem::Joker(j) => Some(j.id),
                        ShopItem::Consumable(_) => None,
                    }))
                    .collect();
                let exclude: &[JokerId] = if showman { &[] } else { &taken };
                sample_joker(rng, exclude, edition_rate(owned_vouchers)).map(ShopItem::Joker)
            };
            if let Some(item) = item {
                self.items.push(item);
            }
        }
    }

    /// 目前的 Reroll 價格
    pub fn reroll_cost(&self, jokers: &[Joker], owned_vouchers: &[VoucherId]) -> i64 {
        if self.has_free_reroll(jokers) {
            return 0;
        }
        (self.config.base_reroll_price + self.reroll_count - reroll_discount(owned_vouchers)).max(0)
    }

    fn has_free_reroll(&self, jokers: &[Joker]) -> bool {
        !self.free_reroll_used && jokers.iter().any(|j| j.id == JokerId::ChaosTheClown)
    }

    /// Reroll 並回傳這次的價格（扣款由呼叫端處理）
    pub fn reroll<R: Rng + ?Sized>(
        &mut self,
        jokers: &[Joker],
        owned_vouchers: &[VoucherId],
        rng: &mut R,
    ) -> i64 {
        let cost = self.reroll_cost(jokers, owned_vouchers);
        if self.has_free_reroll(jokers) {
            self.free_reroll_used = true;
        } else {
            self.reroll_count += 1;
        }
        self.refresh(jokers, owned_vouchers, rng);
        cost
    }

    pub fn item_cost(&self, index: usize, vouchers: &[VoucherId]) -> Result<i64, ShopError> {
        self.items
            .get(index)
            .map(|item| item.cost(vouchers))
            .ok_or(ShopError::NoSuchItem(index))
    }

    pub fn take(&mut self, index: usize) -> Result<ShopItem, ShopError> {
        if index < self.items.len() {
            Ok(self.items.remove(index))
        } else {
            Err(ShopError::NoSuchItem(index))
        }
    }

    pub fn voucher_cost(&self, index: usize, vouchers: &[VoucherId]) -> Result<i64, ShopError> {
        self.vouchers
            .get(index)
            .map(|v| discounted(v.cost(), vouchers))
            .ok_or(ShopError::NoSuchItem(index))
    }

    pub fn take_voucher(&mut self, index: usize) -> Result<VoucherId, ShopError> {
        if index < self.vouchers.len() {
            Ok(self.vouchers.remove(index))
        } else {
            Err(ShopError::NoSuchItem(index))
        }
    }
}

/// 依稀有度抽一個 Joker 並擲版本
///
/// 抽到的稀有度沒有可用 Joker 時，退回從全部可用 Joker 中抽。
pub fn sample_joker<R: Rng + ?Sized>(rng: &mut R, exclude: &[JokerId], edition_rate: f64) -> Option<Joker> {
    let roll: f64 = rng.gen();
    let rarity = if roll < COMMON_RATE {
        Rarity::Common
    } else if roll < COMMON_RATE + UNCOMMON_RATE {
        Rarity::Uncommon
    } else {
        Rarity::Rare
    };

    let mut pool: Vec<JokerId> = JokerId::by_rarity(rarity)
        .into_iter()
        .filter(|id| !exclude.contains(id))
        .collect();
    if pool.is_empty() {
        pool = JokerId::ALL
            .iter()
            .copied()
            .filter(|id| id.rarity() != Rarity::Legendary && !exclude.contains(id))
            .collect();
    }
    let id = *pool.choose(rng)?;

    let roll: f64 = rng.gen();
    let edition = if roll < POLYCHROME_RATE * edition_rate {
        Edition::Polychrome
    } else if roll < (POLYCHROME_RATE + HOLOGRAPHIC_RATE) * edition_rate {
        Edition::Holographic
    } else if roll < (POLYCHROME_RATE + HOLOGRAPHIC_RATE + FOIL_RATE) * edition_rate {
        Edition::Foil
    } else {
        Edition::Base
    };
    Some(Joker::new(id).with_edition(edition))
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn shop_jokers(shop: &Shop) -> Vec<JokerId> {
        shop.items
            .iter()
            .filter_map(|item| match item {
                ShopItem::Joker(j) => Some(j.id),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_shop_restock() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut shop = Shop::default();
        shop.restock(1, &[], &[], &mut rng);

        assert_eq!(shop.items.len(), 2);
        assert_eq!(shop.vouchers.len(), 1);
        for item in &shop.items {
            assert!(item.cost(&[]) > 0);
        }
    }

    #[test]
    fn test_vouchers_refresh_every_third_round() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut shop = Shop::default();
        shop.restock(1, &[], &[], &mut rng);
        let first = shop.vouchers.clone();

        shop.restock(2, &[], &[], &mut rng);
        assert_eq!(shop.vouchers, first);
        shop.restock(3, &[], &[], &mut rng);
        assert_eq!(shop.vouchers, first);

        shop.vouchers.clear();
        shop.restock(4, &[], &[], &mut rng);
        assert_eq!(shop.vouchers.len(), 1);
    }

    #[test]
    fn test_no_duplicates_without_showman() {
        let mut rng = StdRng::seed_from_u64(123);
        let owned: Vec<Joker> = JokerId::by_rarity(Rarity::Common)
            .into_iter()
            .map(Joker::new)
            .collect();
        let mut shop = Shop::new(ShopConfig {
            buyable_slots: 6,
            ..ShopConfig::default()
        });
        for round in 1..40 {
            shop.restock(round, &owned, &[], &mut rng);
            let offered = shop_jokers(&shop);
            for (i, id) in offered.iter().enumerate() {
                assert!(!owned.iter().any(|j| j.id == *id));
                assert!(!offered[i + 1..].contains(id));
            }
        }
    }

    #[test]
    fn test_sample_joker_rarity_fallback() {
        let mut rng = StdRng::seed_from_u64(9);
        let all: Vec<JokerId> = JokerId::ALL.to_vec();
        assert!(sample_joker(&mut rng, &all, 1.0).is_none());

        let mut keep_one = all.clone();
        keep_one.retain(|id| *id != JokerId::TheDuo);
        for _ in 0..20 {
            let joker = sample_joker(&mut rng, &keep_one, 1.0).unwrap();
            assert_eq!(joker.id, JokerId::TheDuo);
        }
    }

    #[test]
    fn test_edition_rate_scales() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut with_edition = 0;
        for _ in 0..2000 {
            let joker = sample_joker(&mut rng, &[], 20.0).unwrap();
            if joker.edition != Edition::Base {
                with_edition += 1;
            }
        }
        // 20 倍時約 74% 帶版本
        assert!(with_edition > 1200);
    }

    #[test]
    fn test_reroll_cost_increases_and_resets() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut shop = Shop::default();
        shop.restock(1, &[], &[], &mut rng);

        assert_eq!(shop.reroll_cost(&[], &[]), 5);
        assert_eq!(shop.reroll(&[], &[], &mut rng), 5);
        assert_eq!(shop.reroll_cost(&[], &[]), 6);
        shop.reroll(&[], &[], &mut rng);
        assert_eq!(shop.reroll_cost(&[], &[]), 7);

        shop.restock(2, &[], &[], &mut rng);
        assert_eq!(shop.reroll_cost(&[], &[]), 5);
    }

    #[test]
    fn test_chaos_free_reroll() {
        let mut rng = StdRng::seed_from_u64(42);
        let jokers = vec![Joker::new(JokerId::ChaosTheClown)];
        let mut shop = Shop::default();
        shop.restock(1, &jokers, &[], &mut rng);

        assert_eq!(shop.reroll(&jokers, &[], &mut rng), 0);
        assert_eq!(shop.reroll(&jokers, &[], &mut rng), 5);
        assert_eq!(shop.reroll_cost(&jokers, &[]), 6);
    }

    #[test]
    fn test_reroll_discount_voucher() {
        let shop = Shop::default();
        assert_eq!(shop.reroll_cost(&[], &[VoucherId::RerollSurplus]), 3);
    }

    #[test]
    fn test_take_missing_item() {
        let mut shop = Shop::default();
        assert_eq!(shop.take(0), Err(ShopError::NoSuchItem(0)));
        assert_eq!(shop.item_cost(3, &[]), Err(ShopError::NoSuchItem(3)));
    }

    #[test]
    fn test_consumable_discount() {
        let item = ShopItem::Consumable(Consumable::Planet(PlanetId::Mars));
        assert_eq!(item.cost(&[]), 3);
        assert_eq!(item.cost(&[VoucherId::ClearanceSale]), 2);
        assert_eq!(item.cost(&[VoucherId::Liquidation]), 1);
    }
}
