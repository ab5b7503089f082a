//! 牌型判定
//!
//! 輸入打出的牌與 Joker 規則，輸出牌型以及實際計分的牌（scored subset）。
//! High Card 是最終退路，所以判定永遠成功。

use super::cards::{PlayingCard, Rank, Suit};
use super::hand_types::HandId;
use super::joker::{Joker, JokerId};

// ============================================================================
// Joker Rules - 規則修改類 Joker 的效果
// ============================================================================

/// Joker 規則修改
///
/// 從 Joker 列表彙整出會改變判定或計分規則的效果：
/// - FourFingers: 順子/同花只需 4 張牌
/// - Pareidolia: 所有牌視為人頭牌
/// - Showman: 商店可出現重複的牌
/// - Hack: 2/3/4/5 重觸發（可疊加）
/// - Mime: 手中持有牌能力重觸發（可疊加）
/// - OopsAll6s: 所有機率 x2（可疊加）
#[derive(Clone, Debug)]
pub struct JokerRules {
    pub four_fingers: bool,
    pub pareidolia: bool,
    pub showman: bool,
    pub hack_count: u32,
    pub mime_count: u32,
    pub probability_modifier: f64,
}

impl Default for JokerRules {
    fn default() -> Self {
        Self {
            four_fingers: false,
            pareidolia: false,
            showman: false,
            hack_count: 0,
            mime_count: 0,
            probability_modifier: 1.0,
        }
    }
}

impl JokerRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 Joker 列表構建規則
    pub fn from_jokers(jokers: &[Joker]) -> Self {
        let mut rules = Self::new();
        for joker in jokers {
            match joker.id {
                JokerId::FourFingers => rules.four_fingers = true,
                JokerId::Pareidolia => rules.pareidolia = true,
                JokerId::Showman => rules.showman = true,
                JokerId::Hack => rules.hack_count += 1,
                JokerId::Mime => rules.mime_count += 1,
                JokerId::OopsAll6s => rules.probability_modifier *= 2.0,
                _ => {}
            }
        }
        rules
    }

    /// 獲取順子/同花所需的最少張數
    pub fn min_cards_for_straight_flush(&self) -> usize {
        if self.four_fingers {
            4
        } else {
            5
        }
    }

    /// 某張計分牌的額外觸發次數（Hack）
    pub fn extra_triggers(&self, card: &PlayingCard) -> u32 {
        if !card.is_stone()
            && matches!(card.rank, Rank::Two | Rank::Three | Rank::Four | Rank::Five)
        {
            self.hack_count
        } else {
            0
        }
    }
}

// ============================================================================
// 判定結果
// ============================================================================

/// 牌型判定結果
#[derive(Clone, Debug, PartialEq)]
pub struct HandClassification {
    pub id: HandId,
    /// 實際計分的牌，保持打出順序
    pub scored: Vec<PlayingCard>,
}

/// 計分牌「包含」哪些牌型（Joker 條件用）
///
/// 以點數分組計算，所以 4 張同點同時包含 Pair、Three 和 Two Pair。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HandContents {
    pub pair: bool,
    pub three: bool,
    pub two_pair: bool,
    pub four: bool,
    pub straight: bool,
    pub flush: bool,
}

impl HandContents {
    pub fn of(classification: &HandClassification) -> Self {
        let counts = rank_counts(&classification.scored);
        let pairs: usize = counts.iter().map(|&(_, n)| n / 2).sum();
        Self {
            pair: counts.iter().any(|&(_, n)| n >= 2),
            three: counts.iter().any(|&(_, n)| n >= 3),
            two_pair: pairs >= 2,
            four: counts.iter().any(|&(_, n)| n >= 4),
            straight: classification.id.is_straight(),
            flush: classification.id.is_flush(),
        }
    }
}

// ============================================================================
// 判定邏輯
// ============================================================================

/// 判定手牌牌型（不含 Joker 規則）
pub fn classify(played: &[PlayingCard]) -> HandClassification {
    classify_with_rules(played, &JokerRules::default())
}

/// 判定手牌牌型（考慮 Joker 規則修改）
///
/// Stone 牌不參與點數/花色判定，但永遠列入計分牌。
pub fn classify_with_rules(played: &[PlayingCard], rules: &JokerRules) -> HandClassification {
    let mut groups = rank_counts(played);
    // 張數多的在前；同張數時點數大的在前（A 最大）
    groups.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| high_order(b.0).cmp(&high_order(a.0))));

    let top = groups.first().map_or(0, |g| g.1);
    let second = groups.get(1).map_or(0, |g| g.1);

    let required = rules.min_cards_for_straight_flush();
    let is_flush = Suit::ALL
        .iter()
        .any(|&suit| played.iter().filter(|c| c.has_suit(suit)).count() >= required);
    let ranks: Vec<Rank> = groups.iter().map(|g| g.0).collect();
    let is_straight = has_straight(&ranks, required);
    let is_full_house = top >= 3 && second >= 2;

    let id = if is_flush && is_straight && is_royal(&ranks, required) {
        HandId::RoyalFlush
    } else if is_flush && is_straight {
        HandId::StraightFlush
    } else if is_flush && is_full_house {
        HandId::FlushHouse
    } else if is_flush && top >= 5 {
        HandId::FlushFive
    } else if is_straight {
        HandId::Straight
    } else if is_flush {
        HandId::Flush
    } else if top >= 5 {
        HandId::FiveKind
    } else if top == 4 {
        HandId::FourKind
    } else if is_full_house {
        HandId::FullHouse
    } else if top == 3 {
        HandId::ThreeKind
    } else if top >= 2 && second >= 2 {
        HandId::TwoPair
    } else if top == 2 {
        HandId::Pair
    } else {
        HandId::HighCard
    };

    let selected: &[Rank] = match id {
        HandId::RoyalFlush
        | HandId::StraightFlush
        | HandId::FlushHouse
        | HandId::FlushFive
        | HandId::Straight
        | HandId::Flush => {
            return HandClassification {
                id,
                scored: played.to_vec(),
            }
        }
        HandId::FullHouse | HandId::TwoPair => &ranks[..ranks.len().min(2)],
        _ => &ranks[..ranks.len().min(1)],
    };

    let scored = played
        .iter()
        .filter(|c| c.is_stone() || selected.contains(&c.rank))
        .copied()
        .collect();
    HandClassification { id, scored }
}

/// 點數分組（首次出現順序），排除 Stone 牌
fn rank_counts(cards: &[PlayingCard]) -> Vec<(Rank, usize)> {
    let mut groups: Vec<(Rank, usize)> = Vec::new();
    for card in cards.iter().filter(|c| !c.is_stone()) {
        match groups.iter_mut().find(|g| g.0 == card.rank) {
            Some(group) => group.1 += 1,
            None => groups.push((card.rank, 1)),
        }
    }
    groups
}

/// A 當作最大的排序值
fn high_order(rank: Rank) -> u8 {
    match rank {
        Rank::Ace => 14,
        other => other.to_int(),
    }
}

/// 點數出現表，索引為排序值；A 同時記在 1 和 14
fn rank_presence(ranks: &[Rank]) -> [bool; 15] {
    let mut present = [false; 15];
    for rank in ranks {
        present[rank.to_int() as usize] = true;
        if *rank == Rank::Ace {
            present[14] = true;
        }
    }
    present
}

/// 是否有長度 >= `required` 的連續段
fn has_run(present: &[bool], required: usize) -> bool {
    let mut run = 0;
    for &is_present in present {
        run = if is_present { run + 1 } else { 0 };
        if run >= required {
            return true;
        }
    }
    false
}

/// 不重複點數中的順子（A 可高可低）
fn has_straight(ranks: &[Rank], required: usize) -> bool {
    has_run(&rank_presence(ranks)[1..], required)
}

/// 順子段落完全落在 10..=A 之間；多出的散牌不影響
fn is_royal(ranks: &[Rank], required: usize) -> bool {
    has_run(&rank_presence(ranks)[10..], required)
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::cards::Enhancement;
    use proptest::prelude::*;

    fn make_cards(ranks_suits: &[(u8, u8)]) -> Vec<PlayingCard> {
        ranks_suits
            .iter()
            .map(|&(r, s)| PlayingCard::new(Rank::ALL[(r - 1) as usize], Suit::ALL[s as usize]))
            .collect()
    }

    fn four_fingers() -> JokerRules {
        JokerRules {
            four_fingers: true,
            ..JokerRules::default()
        }
    }

    #[test]
    fn test_high_card_scores_highest() {
        let cards = make_cards(&[(2, 0), (1, 1), (6, 2), (11, 3)]);
        let result = classify(&cards);
        assert_eq!(result.id, HandId::HighCard);
        assert_eq!(result.scored, make_cards(&[(1, 1)]));
    }

    #[test]
    fn test_single_card_is_high_card() {
        let cards = make_cards(&[(7, 2)]);
        let result = classify(&cards);
        assert_eq!(result.id, HandId::HighCard);
        assert_eq!(result.scored.len(), 1);
    }

    #[test]
    fn test_pair_scores_only_pair() {
        let cards = make_cards(&[(2, 0), (9, 1), (9, 2), (8, 3), (10, 0)]);
        let result = classify(&cards);
        assert_eq!(result.id, HandId::Pair);
        assert_eq!(result.scored, make_cards(&[(9, 1), (9, 2)]));
    }

    #[test]
    fn test_two_pair() {
        let cards = make_cards(&[(2, 0), (2, 1), (8, 2), (8, 3), (10, 0)]);
        let result = classify(&cards);
        assert_eq!(result.id, HandId::TwoPair);
        assert_eq!(result.scored.len(), 4);
    }

    #[test]
    fn test_three_of_a_kind() {
        let cards = make_cards(&[(5, 0), (5, 1), (5, 2), (8, 3), (10, 0)]);
        let result = classify(&cards);
        assert_eq!(result.id, HandId::ThreeKind);
        assert_eq!(result.scored.len(), 3);
    }

    #[test]
    fn test_four_of_a_kind_is_not_two_pair() {
        let cards = make_cards(&[(7, 0), (7, 1), (7, 2), (7, 3), (10, 0)]);
        let result = classify(&cards);
        assert_eq!(result.id, HandId::FourKind);
        assert_eq!(result.scored.len(), 4);
        let contents = HandContents::of(&result);
        assert!(contents.two_pair && contents.three && contents.pair);
    }

    #[test]
    fn test_full_house() {
        let cards = make_cards(&[(5, 0), (5, 1), (5, 2), (8, 0), (8, 1)]);
        let result = classify(&cards);
        assert_eq!(result.id, HandId::FullHouse);
        assert_eq!(result.scored.len(), 5);
    }

    #[test]
    fn test_straight() {
        let cards = make_cards(&[(5, 0), (6, 1), (7, 2), (8, 3), (9, 0)]);
        assert_eq!(classify(&cards).id, HandId::Straight);
    }

    #[test]
    fn test_straight_wheel_and_broadway() {
        let wheel = make_cards(&[(1, 0), (2, 1), (3, 2), (4, 3), (5, 0)]);
        assert_eq!(classify(&wheel).id, HandId::Straight);
        let broadway = make_cards(&[(10, 0), (11, 1), (12, 2), (13, 3), (1, 0)]);
        assert_eq!(classify(&broadway).id, HandId::Straight);
    }

    #[test]
    fn test_no_wraparound_straight() {
        let cards = make_cards(&[(12, 0), (13, 1), (1, 2), (2, 3), (3, 0)]);
        assert_eq!(classify(&cards).id, HandId::HighCard);
    }

    #[test]
    fn test_flush() {
        let cards = make_cards(&[(2, 0), (4, 0), (6, 0), (8, 0), (10, 0)]);
        let result = classify(&cards);
        assert_eq!(result.id, HandId::Flush);
        assert_eq!(result.scored.len(), 5);
    }

    #[test]
    fn test_straight_and_royal_flush() {
        let straight_flush = make_cards(&[(5, 2), (6, 2), (7, 2), (8, 2), (9, 2)]);
        assert_eq!(classify(&straight_flush).id, HandId::StraightFlush);
        let royal = make_cards(&[(10, 3), (11, 3), (12, 3), (13, 3), (1, 3)]);
        assert_eq!(classify(&royal).id, HandId::RoyalFlush);
    }

    #[test]
    fn test_flush_house_and_flush_five() {
        let flush_house = make_cards(&[(5, 2), (5, 2), (5, 2), (9, 2), (9, 2)]);
        assert_eq!(classify(&flush_house).id, HandId::FlushHouse);
        let flush_five = make_cards(&[(10, 2); 5]);
        assert_eq!(classify(&flush_five).id, HandId::FlushFive);
        let five = make_cards(&[(10, 2), (10, 2), (10, 1), (10, 0), (10, 3)]);
        assert_eq!(classify(&five).id, HandId::FiveKind);
    }

    #[test]
    fn test_wild_card_flush() {
        let mut cards = make_cards(&[(2, 2), (4, 2), (6, 2), (8, 2), (10, 0)]);
        assert_eq!(classify(&cards).id, HandId::HighCard);
        cards[4].enhancement = Enhancement::Wild;
        assert_eq!(classify(&cards).id, HandId::Flush);
    }

    #[test]
    fn test_stone_cards_always_scored() {
        let mut cards = make_cards(&[(1, 0), (6, 1), (6, 2)]);
        cards[0].enhancement = Enhancement::Stone;
        let result = classify(&cards);
        assert_eq!(result.id, HandId::Pair);
        assert_eq!(result.scored.len(), 3);

        let lone_stone = vec![cards[0]];
        let result = classify(&lone_stone);
        assert_eq!(result.id, HandId::HighCard);
        assert_eq!(result.scored.len(), 1);
    }

    #[test]
    fn test_stone_blocks_flush() {
        let mut cards = make_cards(&[(2, 2), (4, 2), (6, 2), (8, 2), (10, 2)]);
        cards[0].enhancement = Enhancement::Stone;
        assert_eq!(classify(&cards).id, HandId::HighCard);
    }

    #[test]
    fn test_four_fingers_flush_and_straight() {
        let flush = make_cards(&[(2, 2), (4, 2), (6, 2), (8, 2)]);
        assert_eq!(classify(&flush).id, HandId::HighCard);
        assert_eq!(classify_with_rules(&flush, &four_fingers()).id, HandId::Flush);

        let straight = make_cards(&[(3, 0), (4, 1), (5, 2), (6, 3), (11, 0)]);
        assert_eq!(classify(&straight).id, HandId::HighCard);
        assert_eq!(classify_with_rules(&straight, &four_fingers()).id, HandId::Straight);
    }

    #[test]
    fn test_four_fingers_royal_subsets() {
        let low = make_cards(&[(10, 1), (11, 1), (12, 1), (13, 1)]);
        assert_eq!(classify_with_rules(&low, &four_fingers()).id, HandId::RoyalFlush);
        let high = make_cards(&[(1, 1), (11, 1), (12, 1), (13, 1)]);
        assert_eq!(classify_with_rules(&high, &four_fingers()).id, HandId::RoyalFlush);
        let not_royal = make_cards(&[(9, 1), (10, 1), (11, 1), (12, 1)]);
        assert_eq!(classify_with_rules(&not_royal, &four_fingers()).id, HandId::StraightFlush);
    }

    #[test]
    fn test_four_fingers_royal_with_kicker() {
        let kicker = make_cards(&[(2, 2), (10, 2), (11, 2), (12, 2), (13, 2)]);
        let result = classify_with_rules(&kicker, &four_fingers());
        assert_eq!(result.id, HandId::RoyalFlush);
        assert_eq!(result.scored.len(), 5);

        let ace_kicker = make_cards(&[(5, 0), (1, 0), (11, 0), (12, 0), (13, 0)]);
        assert_eq!(classify_with_rules(&ace_kicker, &four_fingers()).id, HandId::RoyalFlush);

        // 沒有 Four Fingers 時 9-K 不是 Royal
        let nine_high = make_cards(&[(9, 2), (10, 2), (11, 2), (12, 2), (13, 2)]);
        assert_eq!(classify(&nine_high).id, HandId::StraightFlush);
    }

    #[test]
    fn test_joker_rules_from_jokers() {
        let jokers = vec![
            Joker::new(JokerId::FourFingers),
            Joker::new(JokerId::Pareidolia),
            Joker::new(JokerId::OopsAll6s),
            Joker::new(JokerId::OopsAll6s),
            Joker::new(JokerId::Hack),
        ];
        let rules = JokerRules::from_jokers(&jokers);
        assert!(rules.four_fingers);
        assert!(rules.pareidolia);
        assert!(!rules.showman);
        assert_eq!(rules.probability_modifier, 4.0);
        assert_eq!(rules.hack_count, 1);
        assert_eq!(rules.extra_triggers(&make_cards(&[(3, 0)])[0]), 1);
        assert_eq!(rules.extra_triggers(&make_cards(&[(6, 0)])[0]), 0);
    }

    fn card_strategy() -> impl Strategy<Value = PlayingCard> {
        (0usize..13, 0usize..4).prop_map(|(r, s)| PlayingCard::new(Rank::ALL[r], Suit::ALL[s]))
    }

    proptest! {
        #[test]
        fn prop_five_of_a_rank(rank in 0usize..13, suits in prop::collection::vec(0usize..4, 5)) {
            let cards: Vec<PlayingCard> = suits
                .iter()
                .map(|&s| PlayingCard::new(Rank::ALL[rank], Suit::ALL[s]))
                .collect();
            let same_suit = suits.iter().all(|&s| s == suits[0]);
            let expected = if same_suit { HandId::FlushFive } else { HandId::FiveKind };
            prop_assert_eq!(classify(&cards).id, expected);
        }

        #[test]
        fn prop_suited_distinct_ranks_are_flush(
            ranks in prop::sample::subsequence((1u8..=13).collect::<Vec<_>>(), 5),
            suit in 0usize..4,
        ) {
            let consecutive = ranks[4] - ranks[0] == 4;
            let royal = ranks == vec![1, 10, 11, 12, 13];
            prop_assume!(!consecutive && !royal);
            let cards: Vec<PlayingCard> = ranks
                .iter()
                .map(|&r| PlayingCard::new(Rank::ALL[(r - 1) as usize], Suit::ALL[suit]))
                .collect();
            prop_assert_eq!(classify(&cards).id, HandId::Flush);
        }

        #[test]
        fn prop_stones_do_not_change_category(
            cards in prop::collection::vec(card_strategy(), 1..=4),
            stones in 0usize..=1,
        ) {
            let base = classify(&cards);
            let mut with_stones = cards.clone();
            for _ in 0..stones {
                with_stones.push(PlayingCard::new(Rank::Ace, Suit::Spades).with_enhancement(Enhancement::Stone));
            }
            let result = classify(&with_stones);
            prop_assert_eq!(result.id, base.id);
            prop_assert_eq!(result.scored.len(), base.scored.len() + stones);
        }
    }
}
