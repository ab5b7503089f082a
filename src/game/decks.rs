//! 牌組存放
//!
//! 牌組分成尚未發出的 `remaining` 和已發出的 `played` 兩堆。
//! 發牌從 `remaining` 尾端取出並記錄到 `played`；`reset` 把兩堆合併重洗。
//! 牌的比較一律用值相等（見 [`PlayingCard`] 的 `PartialEq`）。

use rand::seq::SliceRandom;
use rand::Rng;

use super::cards::{standard_deck, PlayingCard};

/// 牌組
#[derive(Clone, Debug, Default)]
pub struct Deck {
    remaining: Vec<PlayingCard>,
    played: Vec<PlayingCard>,
}

impl Deck {
    pub fn new(cards: Vec<PlayingCard>) -> Self {
        Self {
            remaining: cards,
            played: Vec::new(),
        }
    }

    /// 標準 52 張（未洗牌）
    pub fn standard() -> Self {
        Self::new(standard_deck())
    }

    pub fn remaining(&self) -> &[PlayingCard] {
        &self.remaining
    }

    pub fn played(&self) -> &[PlayingCard] {
        &self.played
    }

    /// 全部牌數（兩堆合計）
    pub fn len(&self) -> usize {
        self.remaining.len() + self.played.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.remaining.shuffle(rng);
    }

    /// 發出最多 `n` 張牌
    pub fn deal(&mut self, n: usize) -> Vec<PlayingCard> {
        let take = n.min(self.remaining.len());
        let split = self.remaining.len() - take;
        let mut dealt = self.remaining.split_off(split);
        dealt.reverse();
        self.played.extend(dealt.iter().copied());
        dealt
    }

    /// 加入新牌並重洗未發出的牌
    pub fn add<R: Rng + ?Sized>(&mut self, cards: &[PlayingCard], rng: &mut R) {
        self.remaining.extend_from_slice(cards);
        self.shuffle(rng);
    }

    /// 永久移除牌（先找已發出的堆，再找未發出的堆）
    ///
    /// 回傳實際移除的張數。
    pub fn destroy(&mut self, cards: &[PlayingCard]) -> usize {
        let mut removed = 0;
        for card in cards {
            if let Some(pos) = self.played.iter().position(|c| c == card) {
                self.played.remove(pos);
                removed += 1;
            } else if let Some(pos) = self.remaining.iter().position(|c| c == card) {
                self.remaining.remove(pos);
                removed += 1;
            }
        }
        removed
    }

    /// 以新版本取代牌組中的某張牌（消耗品修改手牌時同步用）
    pub fn replace(&mut self, old: &PlayingCard, new: PlayingCard) -> bool {
        let slot = self
            .played
            .iter_mut()
            .find(|c| *c == old)
            .or_else(|| self.remaining.iter_mut().find(|c| *c == old));
        match slot {
            Some(card) => {
                *card = new;
                true
            }
            None => false,
        }
    }

    /// 把已發出的牌收回並重洗
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.remaining.append(&mut self.played);
        self.shuffle(rng);
    }
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::cards::{Enhancement, Rank, Suit};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_deal_moves_cards_to_played() {
        let mut deck = Deck::standard();
        let hand = deck.deal(8);
        assert_eq!(hand.len(), 8);
        assert_eq!(deck.remaining().len(), 44);
        assert_eq!(deck.played().len(), 8);
        assert_eq!(deck.len(), 52);
    }

    #[test]
    fn test_deal_more_than_remaining() {
        let mut deck = Deck::new(vec![PlayingCard::new(Rank::Ace, Suit::Spades)]);
        let hand = deck.deal(5);
        assert_eq!(hand.len(), 1);
        assert!(deck.deal(1).is_empty());
    }

    #[test]
    fn test_destroy_prefers_played_store() {
        let mut deck = Deck::standard();
        let hand = deck.deal(3);
        assert_eq!(deck.destroy(&hand[..2]), 2);
        assert_eq!(deck.played().len(), 1);
        assert_eq!(deck.len(), 50);

        // 未發出的牌也可以被移除
        let card = deck.remaining()[0];
        assert_eq!(deck.destroy(&[card]), 1);
        assert_eq!(deck.len(), 49);
    }

    #[test]
    fn test_destroy_missing_card_is_noop() {
        let mut deck = Deck::new(vec![PlayingCard::new(Rank::Ace, Suit::Spades)]);
        let removed = deck.destroy(&[PlayingCard::new(Rank::King, Suit::Hearts)]);
        assert_eq!(removed, 0);
        assert_eq!(deck.len(), 1);
    }

    #[test]
    fn test_replace_updates_card() {
        let mut deck = Deck::standard();
        let hand = deck.deal(1);
        let upgraded = hand[0].with_enhancement(Enhancement::Glass);
        assert!(deck.replace(&hand[0], upgraded));
        assert_eq!(deck.played()[0].enhancement, Enhancement::Glass);
    }

    #[test]
    fn test_reset_restores_all_cards() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut deck = Deck::standard();
        deck.shuffle(&mut rng);
        deck.deal(20);
        deck.reset(&mut rng);
        assert_eq!(deck.remaining().len(), 52);
        assert!(deck.played().is_empty());
    }

    #[test]
    fn test_add_cards() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut deck = Deck::standard();
        deck.add(&[PlayingCard::new(Rank::Ace, Suit::Hearts)], &mut rng);
        assert_eq!(deck.len(), 53);
    }
}
