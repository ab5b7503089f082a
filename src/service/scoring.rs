//! 計分服務
//!
//! 單次線性計分流程：
//! 1. 判定牌型，取得該牌型目前等級的 chips / mult
//! 2. 依打出順序處理每張計分牌（含重觸發），之後乘上手中持有牌的效果，再套用 Joker 的每張牌 hook
//! 3. 依名單順序套用 Joker 的整手牌 hook 與 Joker 自身版本
//! 4. 分數 = chips × mult，最後結算金錢、銷毀的牌與 Joker 事件

use log::{debug, info, trace};
use rand::Rng;

use crate::game::cards::{PlayingCard, ScoreModifier};
use crate::game::constants::MAX_SELECTED;
use crate::game::hand_types::HandId;
use crate::game::joker::{HandContext, Joker, JokerEvent};
use crate::game::scoring::{classify_with_rules, HandContents};

use super::state::{BlindState, BoardState};

/// 單次計分結果
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreResult {
    pub id: HandId,
    pub scored: Vec<PlayingCard>,
    pub chips: i64,
    pub mult: f64,
    pub score: f64,
    /// 本次計分獲得的金錢（已加到盤面）
    pub money: i64,
    /// 破碎的 Glass 牌（已從牌組移除）
    pub destroyed: Vec<PlayingCard>,
    /// 自我銷毀而離開名單的 Joker
    pub removed_jokers: Vec<Joker>,
}

/// 計算打出的牌的分數並套用副作用
///
/// `blind.hand` 是打出後仍留在手中的牌。會修改盤面的金錢、牌組、Joker 名單與牌型等級。
pub fn score_hand<R: Rng + ?Sized>(
    played: &[PlayingCard],
    board: &mut BoardState,
    blind: &BlindState,
    rng: &mut R,
) -> ScoreResult {
    assert!(!played.is_empty(), "cannot score an empty hand");

    let rules = board.rules();
    let probability = rules.probability_modifier;
    let classification = classify_with_rules(played, &rules);
    let id = classification.id;
    board.hand_levels.record_played(id);

    let base = board.hand_levels.get(id).current_score();
    let mut chips = base.chips;
    let mut mult = base.mult as f64;
    let mut money = 0;
    let mut destroyed = Vec::new();

    // 每張計分牌
    for card in &classification.scored {
        let triggers = card.trigger_count() + rules.extra_triggers(card);
        for t in 0..triggers {
            let trigger = card.trigger(rng, probability);
            chips += trigger.chips;
            mult += trigger.mult as f64;
            mult *= trigger.mult_factor;
            money += trigger.money;
            trace!(
                "{:?} of {:?} trigger {}: chips {} mult {}",
                card.rank,
                card.suit,
                t + 1,
                chips,
                mult
            );

            if t == 0 && card.enhancement.shatters(rng, probability) {
                destroyed.push(*card);
            }
        }

        for held in &blind.hand {
            let factor = held.held_mult_factor();
            if factor != 1.0 {
                let held_triggers = held.trigger_count() + rules.mime_count;
                mult *= factor.powi(held_triggers as i32);
            }
        }

        for joker in &board.jokers {
            chips += joker.card_chips(card, &rules);
            mult += joker.card_mult(card, &rules) as f64;
        }
    }

    // 整手牌：在快照上呼叫，名單變更留到最後
    let snapshot = board.jokers.clone();
    let ctx = HandContext {
        id,
        scored: &classification.scored,
        contents: HandContents::of(&classification),
        rules: &rules,
        roster: &snapshot,
        joker_slots: board.joker_slots(),
    };
    for joker in &snapshot {
        chips += joker.hand_chips(&ctx);
        mult += joker.hand_mult(&ctx) as f64;
        mult *= joker.hand_mult_factor(&ctx);
        money += joker.hand_money(&ctx);

        chips += joker.edition.chip_contribution();
        mult += joker.edition.mult_addend(rng, probability) as f64;
        mult *= joker.edition.mult_factor();
    }

    let score = chips as f64 * mult;

    // Joker 事件：每個 Joker 恰好一次，移除在迴圈後套用
    let mut leaving = Vec::new();
    for (index, joker) in board.jokers.iter_mut().enumerate() {
        match joker.on_hand_scored(&ctx, rng) {
            Some(JokerEvent::Destroyed) => leaving.push(index),
            Some(JokerEvent::LevelUp(target)) => {
                board.hand_levels.increase_level(target);
                info!("{:?} levelled up {:?}", joker.id, target);
            }
            None => {}
        }
    }
    let mut removed_jokers = Vec::with_capacity(leaving.len());
    for &index in leaving.iter().rev() {
        let joker = board.jokers.remove(index);
        info!("{:?} left the roster", joker.id);
        removed_jokers.push(joker);
    }
    removed_jokers.reverse();

    board.money += money;
    if !destroyed.is_empty() {
        let removed = board.deck.destroy(&destroyed);
        info!("{} glass cards shattered", removed);
    }
    board.last_played = Some(id);

    debug!(
        "scored {:?}: {} chips x {} mult = {} (+${})",
        id, chips, mult, score, money
    );

    ScoreResult {
        id,
        scored: classification.scored,
        chips,
        mult,
        score,
        money,
        destroyed,
        removed_jokers,
    }
}

/// 從手牌打出選中的牌並計分
///
/// 扣一次出牌次數、累加 Blind 分數並補牌。
pub fn play_hand<R: Rng + ?Sized>(
    board: &mut BoardState,
    blind: &mut BlindState,
    selected: &[usize],
    rng: &mut R,
) -> ScoreResult {
    assert!(blind.hands_remaining > 0, "no hands remaining");
    let played = blind.take_selected(selected);
    assert!(
        played.len() <= MAX_SELECTED,
        "at most {} cards can be played, got {}",
        MAX_SELECTED,
        played.len()
    );

    let result = score_hand(&played, board, blind, rng);
    blind.current_score += result.score;
    blind.hands_remaining -= 1;

    let refill = board.hand_size.saturating_sub(blind.hand.len());
    blind.hand.extend(board.deck.deal(refill));
    result
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::cards::{Edition, Enhancement, Rank, Seal, Suit};
    use crate::game::joker::JokerId;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_cards(ranks_suits: &[(u8, u8)]) -> Vec<PlayingCard> {
        ranks_suits
            .iter()
            .map(|&(r, s)| PlayingCard::new(Rank::ALL[(r - 1) as usize], Suit::ALL[s as usize]))
            .collect()
    }

    fn empty_blind() -> BlindState {
        BlindState::new(Vec::new(), 300, 4, 3)
    }

    fn never() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    #[test]
    fn test_single_ace() {
        let mut board = BoardState::default();
        let result = score_hand(&make_cards(&[(1, 2)]), &mut board, &empty_blind(), &mut never());
        assert_eq!(result.id, HandId::HighCard);
        assert_eq!(result.chips, 16);
        assert_eq!(result.mult, 1.0);
        assert_eq!(result.score, 16.0);
        assert_eq!(board.last_played, Some(HandId::HighCard));
        assert_eq!(board.hand_levels.get(HandId::HighCard).times_played, 1);
    }

    #[test]
    fn test_pair_uses_level() {
        let mut board = BoardState::default();
        board.hand_levels.increase_level(HandId::Pair);
        let played = make_cards(&[(5, 0), (5, 1), (9, 2)]);
        let result = score_hand(&played, &mut board, &empty_blind(), &mut never());
        // (25 + 5 + 5) × 3
        assert_eq!(result.scored.len(), 2);
        assert_eq!(result.chips, 35);
        assert_eq!(result.score, 105.0);
    }

    #[test]
    fn test_order_add_then_multiply() {
        let mut board = BoardState::default();
        let played = vec![PlayingCard::new(Rank::Ace, Suit::Hearts)
            .with_enhancement(Enhancement::Mult)
            .with_edition(Edition::Polychrome)];
        let result = score_hand(&played, &mut board, &empty_blind(), &mut never());
        // (1 + 4) × 1.5
        assert_eq!(result.mult, 7.5);
    }

    #[test]
    fn test_hack_retriggers_low_cards() {
        let mut board = BoardState::default();
        board.add_joker(Joker::new(JokerId::Hack));
        let played = make_cards(&[(3, 0)]);
        let result = score_hand(&played, &mut board, &empty_blind(), &mut never());
        assert_eq!(result.chips, 5 + 3 + 3);
    }

    #[test]
    fn test_gold_seal_pays_per_trigger() {
        let mut board = BoardState::default();
        let start = board.money;
        let played = vec![PlayingCard::new(Rank::King, Suit::Spades)
            .with_seal(Seal::Gold)];
        let result = score_hand(&played, &mut board, &empty_blind(), &mut never());
        assert_eq!(result.money, 3);
        assert_eq!(board.money, start + 3);
    }

    #[test]
    fn test_glass_shatters_once_after_scoring() {
        let mut board = BoardState::default();
        let dealt = board.deck.deal(1)[0];
        let glass = dealt.with_enhancement(Enhancement::Glass).with_seal(Seal::Red);
        board.deck.replace(&dealt, glass);
        let hand = vec![glass];
        let result = score_hand(&hand, &mut board, &empty_blind(), &mut StepRng::new(0, 0));
        // 兩次觸發都計分
        assert_eq!(result.mult, 4.0);
        assert_eq!(result.destroyed.len(), 1);
        assert_eq!(board.deck.len(), 51);
    }

    #[test]
    fn test_joker_per_card_and_per_hand_hooks() {
        let mut board = BoardState::default();
        board.add_joker(Joker::new(JokerId::ScaryFace));
        board.add_joker(Joker::new(JokerId::JollyJoker));
        board.add_joker(Joker::new(JokerId::TheDuo));
        let played = make_cards(&[(13, 0), (13, 1)]);
        let result = score_hand(&played, &mut board, &empty_blind(), &mut never());
        // chips: 10 + 10 + 30 + 10 + 30，mult: (2 + 8) × 2
        assert_eq!(result.chips, 90);
        assert_eq!(result.mult, 20.0);
        assert_eq!(result.score, 1800.0);
    }

    #[test]
    fn test_joker_edition_folded_per_hand() {
        let mut board = BoardState::default();
        board.add_joker(Joker::new(JokerId::Joker).with_edition(Edition::Foil));
        board.add_joker(Joker::new(JokerId::Joker).with_edition(Edition::Holographic));
        let result = score_hand(&make_cards(&[(2, 0)]), &mut board, &empty_blind(), &mut never());
        assert_eq!(result.chips, 5 + 2 + 50);
        assert_eq!(result.mult, 1.0 + 4.0 + 4.0 + 10.0);
    }

    #[test]
    fn test_space_joker_levels_after_scoring() {
        let mut board = BoardState::default();
        board.add_joker(Joker::new(JokerId::SpaceJoker));
        let result = score_hand(&make_cards(&[(2, 0)]), &mut board, &empty_blind(), &mut StepRng::new(0, 0));
        assert_eq!(result.chips, 7);
        assert_eq!(board.hand_levels.get(HandId::HighCard).level, 2);
    }

    #[test]
    fn test_cavendish_leaves_roster() {
        let mut board = BoardState::default();
        board.add_joker(Joker::new(JokerId::Joker));
        board.add_joker(Joker::new(JokerId::Cavendish));
        let result = score_hand(&make_cards(&[(2, 0)]), &mut board, &empty_blind(), &mut StepRng::new(0, 0));
        assert_eq!(result.mult, (1.0 + 4.0) * 3.0);
        assert_eq!(result.removed_jokers, vec![Joker::new(JokerId::Cavendish)]);
        assert_eq!(board.jokers, vec![Joker::new(JokerId::Joker)]);
    }

    #[test]
    #[should_panic(expected = "empty hand")]
    fn test_empty_hand_panics() {
        let mut board = BoardState::default();
        score_hand(&[], &mut board, &empty_blind(), &mut never());
    }

    #[test]
    fn test_play_hand_updates_blind() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut board = BoardState::default();
        let mut blind = board
            .start_blind(crate::game::blinds::BlindType::Small, &mut rng)
            .unwrap();
        let result = play_hand(&mut board, &mut blind, &[0, 1], &mut rng);
        assert!(result.score > 0.0);
        assert_eq!(blind.current_score, result.score);
        assert_eq!(blind.hands_remaining, 3);
        assert_eq!(blind.hand.len(), 8);
    }
}
