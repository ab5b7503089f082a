//! 盤面狀態管理
//!
//! `BoardState` 是整局持續的狀態（牌組、金錢、Joker、牌型等級、消耗品、Voucher），
//! `BlindState` 是單一 Blind 內的暫時狀態（手牌、目標分數、剩餘出牌/棄牌次數）。
//! 消耗品效果、商店交易、棄牌與回合結算都在這裡修改盤面。

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::game::blinds::{required_score, BlindType};
use crate::game::cards::{roll, Edition, PlayingCard};
use crate::game::config::BoardConfig;
use crate::game::consumables::{Consumable, ConsumableError, ConsumableSlots, PlanetId, TarotId};
use crate::game::decks::Deck;
use crate::game::hand_types::{HandId, HandLevels};
use crate::game::joker::{Joker, JokerId};
use crate::game::scoring::{classify_with_rules, HandClassification, JokerRules};
use crate::game::shop::{sample_joker, Shop, ShopError, ShopItem};
use crate::game::vouchers::{
    extra_consumable_slots, extra_discards, extra_hands, extra_joker_slots, VoucherId,
};

/// Wheel of Fortune 成功機率
const WHEEL_OF_FORTUNE_CHANCE: f64 = 1.0 / 4.0;
/// Hermit 最多給的金錢
const HERMIT_CAP: i64 = 20;
/// Temperance 最多給的金錢
const TEMPERANCE_CAP: i64 = 50;
/// High Priestess / Emperor 最多創造的張數
const CREATE_COUNT: usize = 2;

// ============================================================================
// Blind 狀態
// ============================================================================

/// 單一 Blind 內的狀態
#[derive(Clone, Debug)]
pub struct BlindState {
    /// 目前手中持有（未打出）的牌
    pub hand: Vec<PlayingCard>,
    pub required_score: i64,
    pub current_score: f64,
    pub hands_remaining: i32,
    pub discards_remaining: i32,
    /// 由 `BoardState::start_blind` 開始時記錄，決定過關獎勵
    pub blind_type: Option<BlindType>,
}

impl BlindState {
    pub fn new(hand: Vec<PlayingCard>, required_score: i64, hands: i32, discards: i32) -> Self {
        Self {
            hand,
            required_score,
            current_score: 0.0,
            hands_remaining: hands,
            discards_remaining: discards,
            blind_type: None,
        }
    }

    pub fn is_cleared(&self) -> bool {
        self.current_score >= self.required_score as f64
    }

    /// 沒有過關且沒有出牌次數
    pub fn is_failed(&self) -> bool {
        !self.is_cleared() && self.hands_remaining <= 0
    }

    /// 從手牌中取出選中的牌（保持手牌順序）
    ///
    /// 索引超出手牌範圍視為呼叫端錯誤。
    pub fn take_selected(&mut self, selected: &[usize]) -> Vec<PlayingCard> {
        let indices = normalize_selection(selected, self.hand.len());
        let taken: Vec<PlayingCard> = indices.iter().map(|&i| self.hand[i]).collect();
        for &i in indices.iter().rev() {
            self.hand.remove(i);
        }
        taken
    }
}

/// 排序並去除重複的選牌索引
fn normalize_selection(selected: &[usize], hand_len: usize) -> Vec<usize> {
    let mut indices = selected.to_vec();
    indices.sort_unstable();
    indices.dedup();
    if let Some(&last) = indices.last() {
        assert!(
            last < hand_len,
            "selected index {} outside held hand of {} cards",
            last,
            hand_len
        );
    }
    indices
}

// ============================================================================
// 盤面狀態
// ============================================================================

/// 整局持續的盤面狀態
#[derive(Clone, Debug)]
pub struct BoardState {
    pub deck: Deck,
    pub money: i64,
    /// Joker 名單，順序即觸發順序
    pub jokers: Vec<Joker>,
    pub hand_levels: HandLevels,
    pub consumables: ConsumableSlots,
    pub vouchers: Vec<VoucherId>,
    pub ante: u32,
    /// 從 1 開始
    pub round: u32,
    pub hand_size: usize,
    pub hands_per_round: i32,
    pub discards_per_round: i32,
    /// 最後使用的消耗品（The Fool 不記錄）
    pub last_used_consumable: Option<Consumable>,
    pub last_played: Option<HandId>,
    base_joker_slots: usize,
    base_consumable_slots: usize,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new(&BoardConfig::default())
    }
}

impl BoardState {
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            deck: Deck::standard(),
            money: config.starting_money,
            jokers: Vec::new(),
            hand_levels: HandLevels::new(),
            consumables: ConsumableSlots::new(config.consumable_slots),
            vouchers: Vec::new(),
            ante: 1,
            round: 1,
            hand_size: config.hand_size,
            hands_per_round: config.hands_per_round,
            discards_per_round: config.discards_per_round,
            last_used_consumable: None,
            last_played: None,
            base_joker_slots: config.joker_slots,
            base_consumable_slots: config.consumable_slots,
        }
    }

    /// 目前 Joker 規則修改
    pub fn rules(&self) -> JokerRules {
        JokerRules::from_jokers(&self.jokers)
    }

    /// 牌型判定（套用 Four Fingers 等規則）
    pub fn classify(&self, played: &[PlayingCard]) -> HandClassification {
        classify_with_rules(played, &self.rules())
    }

    // ------------------------------------------------------------------
    // Blind
    // ------------------------------------------------------------------

    /// 開始新的 Blind：收回並重洗牌組，發出手牌
    ///
    /// Ante 超出分數表時回傳 None。
    pub fn start_blind<R: Rng + ?Sized>(&mut self, blind: BlindType, rng: &mut R) -> Option<BlindState> {
        let required = required_score(self.ante, blind)?;
        self.deck.reset(rng);
        let hand = self.deck.deal(self.hand_size);
        let mut state = BlindState::new(
            hand,
            required,
            self.hands_per_round + extra_hands(&self.vouchers),
            self.discards_per_round + extra_discards(&self.vouchers),
        );
        state.blind_type = Some(blind);
        debug!("started {:?} blind at ante {}: {} required", blind, self.ante, required);
        Some(state)
    }

    /// 棄牌並補牌
    ///
    /// Purple Seal 的牌在有空槽時各創造一張 Tarot。回傳棄掉的牌。
    pub fn discard<R: Rng + ?Sized>(
        &mut self,
        blind: &mut BlindState,
        selected: &[usize],
        rng: &mut R,
    ) -> Vec<PlayingCard> {
        assert!(blind.discards_remaining > 0, "no discards remaining");
        let discarded = blind.take_selected(selected);
        blind.discards_remaining -= 1;

        for _ in discarded.iter().filter(|c| c.seal.creates_tarot()) {
            if !self.consumables.add(Consumable::Tarot(TarotId::random(rng))) {
                break;
            }
        }

        let refill = self.hand_size.saturating_sub(blind.hand.len());
        blind.hand.extend(self.deck.deal(refill));
        discarded
    }

    // ------------------------------------------------------------------
    // Joker
    // ------------------------------------------------------------------

    pub fn joker_slots(&self) -> usize {
        self.base_joker_slots + extra_joker_slots(&self.vouchers)
    }

    /// Negative Joker 不佔槽位
    pub fn occupied_joker_slots(&self) -> usize {
        self.jokers.iter().filter(|j| !j.is_negative()).count()
    }

    pub fn has_free_joker_slot(&self) -> bool {
        self.occupied_joker_slots() < self.joker_slots()
    }

    /// 加入 Joker，槽位已滿回傳 false
    pub fn add_joker(&mut self, joker: Joker) -> bool {
        if !joker.is_negative() && !self.has_free_joker_slot() {
            return false;
        }
        self.jokers.push(joker);
        true
    }

    /// 賣出 Joker，回傳獲得的金錢
    pub fn sell_joker(&mut self, index: usize) -> Option<i64> {
        if index >= self.jokers.len() {
            return None;
        }
        let joker = self.jokers.remove(index);
        let value = joker.sell_value(&self.vouchers);
        self.money += value;
        info!("sold {:?} for ${}", joker.id, value);
        Some(value)
    }

    // ------------------------------------------------------------------
    // Voucher
    // ------------------------------------------------------------------

    /// 取得 Voucher；已擁有或缺少前置時回傳 false
    pub fn buy_voucher(&mut self, voucher: VoucherId) -> bool {
        if !voucher.is_available(&self.vouchers) {
            return false;
        }
        self.vouchers.push(voucher);
        self.consumables
            .set_capacity(self.base_consumable_slots + extra_consumable_slots(&self.vouchers));
        true
    }

    // ------------------------------------------------------------------
    // 商店
    // ------------------------------------------------------------------

    pub fn open_shop<R: Rng + ?Sized>(&self, shop: &mut Shop, rng: &mut R) {
        shop.restock(self.round, &self.jokers, &self.vouchers, rng);
    }

    /// 購買商店商品，扣除折扣後價格
    pub fn buy_from_shop(&mut self, shop: &mut Shop, index: usize) -> Result<(), ShopError> {
        let cost = shop.item_cost(index, &self.vouchers)?;
        if self.money < cost {
            return Err(ShopError::InsufficientFunds { cost, money: self.money });
        }
        match &shop.items[index] {
            ShopItem::Joker(j) if !j.is_negative() && !self.has_free_joker_slot() => {
                return Err(ShopError::NoFreeJokerSlot);
            }
            ShopItem::Consumable(_) if self.consumables.is_full() => {
                return Err(ShopError::NoFreeConsumableSlot);
            }
            _ => {}
        }

        let item = shop.take(index)?;
        self.money -= cost;
        debug!("bought {:?} for ${}", item, cost);
        match item {
            ShopItem::Joker(joker) => {
                self.jokers.push(joker);
            }
            ShopItem::Consumable(consumable) => {
                self.consumables.add(consumable);
            }
        }
        Ok(())
    }

    pub fn buy_shop_voucher(&mut self, shop: &mut Shop, index: usize) -> Result<VoucherId, ShopError> {
        let cost = shop.voucher_cost(index, &self.vouchers)?;
        let voucher = shop.vouchers[index];
        if !voucher.is_available(&self.vouchers) {
            return Err(ShopError::VoucherUnavailable(voucher));
        }
        if self.money < cost {
            return Err(ShopError::InsufficientFunds { cost, money: self.money });
        }
        shop.take_voucher(index)?;
        self.money -= cost;
        self.buy_voucher(voucher);
        Ok(voucher)
    }

    /// Reroll 商店，回傳支付的金額
    pub fn reroll_shop<R: Rng + ?Sized>(&mut self, shop: &mut Shop, rng: &mut R) -> Result<i64, ShopError> {
        let cost = shop.reroll_cost(&self.jokers, &self.vouchers);
        if self.money < cost {
            return Err(ShopError::InsufficientFunds { cost, money: self.money });
        }
        shop.reroll(&self.jokers, &self.vouchers, rng);
        self.money -= cost;
        Ok(cost)
    }

    // ------------------------------------------------------------------
    // 消耗品
    // ------------------------------------------------------------------

    /// 放入消耗品槽
    pub fn acquire_consumable(&mut self, consumable: Consumable) -> Result<(), ConsumableError> {
        if self.consumables.add(consumable) {
            Ok(())
        } else {
            Err(ConsumableError::NoFreeConsumableSlot)
        }
    }

    /// 使用消耗品槽中的一張；失敗時放回原位
    pub fn use_consumable_slot<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        hand: &mut Vec<PlayingCard>,
        selected: &[usize],
        rng: &mut R,
    ) -> Result<Consumable, ConsumableError> {
        let consumable = self
            .consumables
            .take(index)
            .ok_or(ConsumableError::NoSuchSlot(index))?;
        match self.use_consumable(consumable, hand, selected, rng) {
            Ok(()) => Ok(consumable),
            Err(e) => {
                self.consumables.insert(index, consumable);
                Err(e)
            }
        }
    }

    /// 套用消耗品效果
    ///
    /// `hand` 是目前持有的手牌，`selected` 是選中牌在手牌中的索引。
    /// 被修改的牌同步更新到牌組。回傳錯誤時盤面與手牌都不變。
    pub fn use_consumable<R: Rng + ?Sized>(
        &mut self,
        consumable: Consumable,
        hand: &mut Vec<PlayingCard>,
        selected: &[usize],
        rng: &mut R,
    ) -> Result<(), ConsumableError> {
        let indices = normalize_selection(selected, hand.len());
        consumable.check_selection(indices.len())?;

        match consumable {
            Consumable::Planet(planet) => {
                self.hand_levels.increase_level(planet.hand_id());
            }
            Consumable::Tarot(tarot) => self.apply_tarot(tarot, hand, &indices, rng)?,
        }

        if consumable != Consumable::Tarot(TarotId::TheFool) {
            self.last_used_consumable = Some(consumable);
        }
        debug!("used {} on {} cards", consumable.name(), indices.len());
        Ok(())
    }

    fn apply_tarot<R: Rng + ?Sized>(
        &mut self,
        tarot: TarotId,
        hand: &mut Vec<PlayingCard>,
        indices: &[usize],
        rng: &mut R,
    ) -> Result<(), ConsumableError> {
        if let Some(enhancement) = tarot.enhancement() {
            self.modify_cards(hand, indices, |c| c.with_enhancement(enhancement));
            return Ok(());
        }
        if let Some(suit) = tarot.suit() {
            self.modify_cards(hand, indices, |c| PlayingCard { suit, ..c });
            return Ok(());
        }

        match tarot {
            TarotId::TheFool => {
                let last = self.last_used_consumable.ok_or(ConsumableError::NothingToCopy)?;
                self.acquire_consumable(last)?;
            }
            TarotId::TheHighPriestess => {
                self.create_consumables(|rng| Consumable::Planet(PlanetId::random(rng)), rng)?;
            }
            TarotId::TheEmperor => {
                self.create_consumables(|rng| Consumable::Tarot(TarotId::random(rng)), rng)?;
            }
            TarotId::TheHermit => {
                self.money += self.money.clamp(0, HERMIT_CAP);
            }
            TarotId::TheWheelOfFortune => {
                let eligible: Vec<usize> = (0..self.jokers.len())
                    .filter(|&i| self.jokers[i].edition == Edition::Base)
                    .collect();
                if eligible.is_empty() {
                    return Err(ConsumableError::NoEligibleJoker);
                }
                if roll(rng, WHEEL_OF_FORTUNE_CHANCE, self.rules().probability_modifier) {
                    if let Some(&target) = eligible.choose(rng) {
                        let edition = wheel_edition(rng);
                        self.jokers[target].edition = edition;
                        info!("wheel of fortune gave {:?} to {:?}", edition, self.jokers[target].id);
                    }
                }
            }
            TarotId::Strength => {
                self.modify_cards(hand, indices, |c| PlayingCard { rank: c.rank.next(), ..c });
            }
            TarotId::TheHangedMan => {
                let doomed: Vec<PlayingCard> = indices.iter().map(|&i| hand[i]).collect();
                for &i in indices.iter().rev() {
                    hand.remove(i);
                }
                self.deck.destroy(&doomed);
            }
            TarotId::Death => {
                let (left, right) = (indices[0], indices[1]);
                let old = hand[left];
                let copy = hand[right];
                self.deck.replace(&old, copy);
                hand[left] = copy;
            }
            TarotId::Temperance => {
                let total: i64 = self.jokers.iter().map(|j| j.sell_value(&self.vouchers)).sum();
                self.money += total.min(TEMPERANCE_CAP);
            }
            TarotId::Judgement => {
                if !self.has_free_joker_slot() {
                    return Err(ConsumableError::NoFreeJokerSlot);
                }
                let owned: Vec<JokerId> = self.jokers.iter().map(|j| j.id).collect();
                let exclude: &[JokerId] = if self.rules().showman { &[] } else { &owned };
                let joker = sample_joker(rng, exclude, 1.0).ok_or(ConsumableError::NoEligibleJoker)?;
                self.jokers.push(joker.with_edition(Edition::Base));
            }
            _ => unreachable!("{:?} is handled by enhancement or suit", tarot),
        }
        Ok(())
    }

    /// 修改選中的牌並同步牌組
    fn modify_cards(
        &mut self,
        hand: &mut [PlayingCard],
        indices: &[usize],
        f: impl Fn(PlayingCard) -> PlayingCard,
    ) {
        for &i in indices {
            let updated = f(hand[i]);
            self.deck.replace(&hand[i], updated);
            hand[i] = updated;
        }
    }

    /// 在空槽中創造最多兩張消耗品
    fn create_consumables<R: Rng + ?Sized>(
        &mut self,
        make: impl Fn(&mut R) -> Consumable,
        rng: &mut R,
    ) -> Result<(), ConsumableError> {
        let count = self.consumables.remaining().min(CREATE_COUNT);
        if count == 0 {
            return Err(ConsumableError::NoFreeConsumableSlot);
        }
        for _ in 0..count {
            self.consumables.add(make(rng));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // 回合結算
    // ------------------------------------------------------------------

    /// 回合結束：Blind 獎勵、手中的 Gold 牌、Joker 回合金錢、Blue Seal Planet
    ///
    /// 回傳獲得的金錢並推進回合數。擊敗 Boss 後進入下一個 Ante。
    pub fn end_round(&mut self, blind: &BlindState) -> i64 {
        let rules = self.rules();
        let mut gained = 0;

        if let Some(blind_type) = blind.blind_type.filter(|_| blind.is_cleared()) {
            gained += blind_type.reward();
            if blind_type == BlindType::Boss {
                self.ante += 1;
            }
        }

        for card in &blind.hand {
            let triggers = card.trigger_count() + rules.mime_count;
            gained += card.end_of_round_money() * triggers as i64;
        }

        for joker in &mut self.jokers {
            gained += joker.end_of_round_money();
            joker.on_round_end();
        }

        if let Some(planet) = self.last_played.and_then(PlanetId::for_hand) {
            for _ in blind.hand.iter().filter(|c| c.seal.creates_planet()) {
                if !self.consumables.add(Consumable::Planet(planet)) {
                    break;
                }
            }
        }

        self.money += gained;
        self.round += 1;
        debug!("round ended: +${}, now round {}", gained, self.round);
        gained
    }
}

/// Wheel of Fortune 的版本：Foil 50% / Holographic 35% / Polychrome 15%
fn wheel_edition<R: Rng + ?Sized>(rng: &mut R) -> Edition {
    let roll: f64 = rng.gen();
    if roll < 0.5 {
        Edition::Foil
    } else if roll < 0.85 {
        Edition::Holographic
    } else {
        Edition::Polychrome
    }
}

// ============================================================================
// 單元測試
// ============================================================================
