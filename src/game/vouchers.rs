//! Voucher 永久升級系統
//!
//! 每個商店最多 1 個 Voucher 可購買，效果持續整局遊戲。
//!
//! # 架構
//!
//! 使用聲明式 `VOUCHER_DEFS` 表定義所有 Voucher 的元數據；
//! 效果不存成累計欄位，而是每次從已擁有列表推導（`discount_rate` 等）。
//! 依賴關係以 `VoucherId` 值比較。

use rand::seq::SliceRandom;
use rand::Rng;

/// Voucher 數量
pub const VOUCHER_COUNT: usize = 36;

// ============================================================================
// Voucher 定義系統
// ============================================================================

/// Voucher 定義結構
#[derive(Clone, Copy, Debug)]
pub struct VoucherDef {
    pub id: VoucherId,
    pub name: &'static str,
    pub cost: i64,
    /// 前置需求（升級版需要基礎版）
    pub prerequisite: Option<VoucherId>,
}

/// Voucher 定義表（順序與 `to_index()` 一致）
pub static VOUCHER_DEFS: [VoucherDef; VOUCHER_COUNT] = [
    // ========== 基礎 Voucher (0-17) ==========
    VoucherDef { id: VoucherId::Overstock, name: "Overstock", cost: 10, prerequisite: None },
    VoucherDef { id: VoucherId::ClearanceSale, name: "Clearance Sale", cost: 10, prerequisite: None },
    VoucherDef { id: VoucherId::Hone, name: "Hone", cost: 10, prerequisite: None },
    VoucherDef { id: VoucherId::RerollSurplus, name: "Reroll Surplus", cost: 10, prerequisite: None },
    VoucherDef { id: VoucherId::CrystalBall, name: "Crystal Ball", cost: 10, prerequisite: None },
    VoucherDef { id: VoucherId::Telescope, name: "Telescope", cost: 10, prerequisite: None },
    VoucherDef { id: VoucherId::Grabber, name: "Grabber", cost: 10, prerequisite: None },
    VoucherDef { id: VoucherId::Wasteful, name: "Wasteful", cost: 10, prerequisite: None },
    VoucherDef { id: VoucherId::SeedMoney, name: "Seed Money", cost: 10, prerequisite: None },
    VoucherDef { id: VoucherId::Blank, name: "Blank", cost: 10, prerequisite: None },
    VoucherDef { id: VoucherId::PaintBrush, name: "Paint Brush", cost: 10, prerequisite: None },
    VoucherDef { id: VoucherId::TarotMerchant, name: "Tarot Merchant", cost: 10, prerequisite: None },
    VoucherDef { id: VoucherId::PlanetMerchant, name: "Planet Merchant", cost: 10, prerequisite: None },
    VoucherDef { id: VoucherId::MagicTrick, name: "Magic Trick", cost: 10, prerequisite: None },
    VoucherDef { id: VoucherId::Hieroglyph, name: "Hieroglyph", cost: 10, prerequisite: None },
    VoucherDef { id: VoucherId::DirectorsCut, name: "Director's Cut", cost: 10, prerequisite: None },
    VoucherDef { id: VoucherId::Observatory, name: "Observatory", cost: 10, prerequisite: None },
    VoucherDef { id: VoucherId::OmenGlobe, name: "Omen Globe", cost: 10, prerequisite: None },
    // ========== 升級 Voucher (18-35) ==========
    VoucherDef { id: VoucherId::OverstockPlus, name: "Overstock Plus", cost: 10, prerequisite: Some(VoucherId::Overstock) },
    VoucherDef { id: VoucherId::Liquidation, name: "Liquidation", cost: 10, prerequisite: Some(VoucherId::ClearanceSale) },
    VoucherDef { id: VoucherId::GlowUp, name: "Glow Up", cost: 10, prerequisite: Some(VoucherId::Hone) },
    VoucherDef { id: VoucherId::RerollGlut, name: "Reroll Glut", cost: 10, prerequisite: Some(VoucherId::RerollSurplus) },
    VoucherDef { id: VoucherId::Nebula, name: "Nebula", cost: 10, prerequisite: Some(VoucherId::CrystalBall) },
    VoucherDef { id: VoucherId::Nadir, name: "Nadir", cost: 10, prerequisite: Some(VoucherId::Telescope) },
    VoucherDef { id: VoucherId::NachoTong, name: "Nacho Tong", cost: 10, prerequisite: Some(VoucherId::Grabber) },
    VoucherDef { id: VoucherId::Recyclomancy, name: "Recyclomancy", cost: 10, prerequisite: Some(VoucherId::Wasteful) },
    VoucherDef { id: VoucherId::MoneyTree, name: "Money Tree", cost: 10, prerequisite: Some(VoucherId::SeedMoney) },
    VoucherDef { id: VoucherId::Antimatter, name: "Antimatter", cost: 10, prerequisite: Some(VoucherId::Blank) },
    VoucherDef { id: VoucherId::Palette, name: "Palette", cost: 10, prerequisite: Some(VoucherId::PaintBrush) },
    VoucherDef { id: VoucherId::TarotTycoon, name: "Tarot Tycoon", cost: 10, prerequisite: Some(VoucherId::TarotMerchant) },
    VoucherDef { id: VoucherId::PlanetTycoon, name: "Planet Tycoon", cost: 10, prerequisite: Some(VoucherId::PlanetMerchant) },
    VoucherDef { id: VoucherId::Illusion, name: "Illusion", cost: 10, prerequisite: Some(VoucherId::MagicTrick) },
    VoucherDef { id: VoucherId::Petroglyph, name: "Petroglyph", cost: 10, prerequisite: Some(VoucherId::Hieroglyph) },
    VoucherDef { id: VoucherId::Retcon, name: "Retcon", cost: 10, prerequisite: Some(VoucherId::DirectorsCut) },
    VoucherDef { id: VoucherId::ObservatoryPlus, name: "Observatory Plus", cost: 10, prerequisite: Some(VoucherId::Observatory) },
    VoucherDef { id: VoucherId::CrystalBallPlus, name: "Crystal Ball Plus", cost: 10, prerequisite: Some(VoucherId::OmenGlobe) },
];

/// Voucher ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VoucherId {
    // ========== 基礎 Voucher ==========
    /// 商店 +1 卡槽
    Overstock,
    /// 所有物品 -25%
    ClearanceSale,
    /// Foil/Holo/Poly 出現率 x2
    Hone,
    /// Reroll 費用 -$2
    RerollSurplus,
    /// 消耗品槽 +1
    CrystalBall,
    Telescope,
    /// +1 hand per round
    Grabber,
    /// +1 discard per round
    Wasteful,
    SeedMoney,
    /// 不做任何事
    Blank,
    PaintBrush,
    TarotMerchant,
    PlanetMerchant,
    MagicTrick,
    Hieroglyph,
    DirectorsCut,
    Observatory,
    /// 消耗品槽 +1
    OmenGlobe,

    // ========== 升級 Voucher（需要先買基礎版）==========
    /// 再 +1 商店卡槽
    OverstockPlus,
    /// 所有物品 -50%
    Liquidation,
    /// Foil/Holo/Poly 出現率 x4
    GlowUp,
    /// Reroll 費用再 -$2
    RerollGlut,
    Nebula,
    Nadir,
    /// 再 +1 hand
    NachoTong,
    /// 再 +1 discard
    Recyclomancy,
    MoneyTree,
    /// Joker 槽 +1
    Antimatter,
    Palette,
    TarotTycoon,
    PlanetTycoon,
    Illusion,
    Petroglyph,
    Retcon,
    ObservatoryPlus,
    CrystalBallPlus,
}

impl VoucherId {
    pub fn to_index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        VOUCHER_DEFS.get(index).map(|def| def.id)
    }

    fn def(&self) -> &'static VoucherDef {
        &VOUCHER_DEFS[self.to_index()]
    }

    pub fn name(&self) -> &'static str {
        self.def().name
    }

    pub fn cost(&self) -> i64 {
        self.def().cost
    }

    pub fn prerequisite(&self) -> Option<VoucherId> {
        self.def().prerequisite
    }

    /// 尚未擁有且前置需求已滿足
    pub fn is_available(&self, owned: &[VoucherId]) -> bool {
        !owned.contains(self) && self.prerequisite().map_or(true, |p| owned.contains(&p))
    }

    /// 所有目前可以出現在商店的 Voucher
    pub fn available(owned: &[VoucherId]) -> Vec<VoucherId> {
        VOUCHER_DEFS
            .iter()
            .map(|def| def.id)
            .filter(|v| v.is_available(owned))
            .collect()
    }

    /// 隨機選擇一個可用的 Voucher
    pub fn random_available<R: Rng + ?Sized>(rng: &mut R, owned: &[VoucherId]) -> Option<VoucherId> {
        Self::available(owned).choose(rng).copied()
    }
}

// ============================================================================
// 效果推導
// ============================================================================

/// 商品折扣比例（兩張折扣券互斥，取較大者）
pub fn discount_rate(owned: &[VoucherId]) -> f64 {
    if owned.contains(&VoucherId::Liquidation) {
        0.5
    } else if owned.contains(&VoucherId::ClearanceSale) {
        0.25
    } else {
        0.0
    }
}

/// 版本出現率倍數
pub fn edition_rate(owned: &[VoucherId]) -> f64 {
    if owned.contains(&VoucherId::GlowUp) {
        4.0
    } else if owned.contains(&VoucherId::Hone) {
        2.0
    } else {
        1.0
    }
}

fn count_owned(owned: &[VoucherId], targets: &[VoucherId]) -> usize {
    targets.iter().filter(|t| owned.contains(t)).count()
}

pub fn extra_joker_slots(owned: &[VoucherId]) -> usize {
    count_owned(owned, &[VoucherId::Antimatter])
}

pub fn extra_consumable_slots(owned: &[VoucherId]) -> usize {
    count_owned(owned, &[VoucherId::CrystalBall, VoucherId::OmenGlobe])
}

pub fn extra_shop_slots(owned: &[VoucherId]) -> usize {
    count_owned(owned, &[VoucherId::Overstock, VoucherId::OverstockPlus])
}

pub fn reroll_discount(owned: &[VoucherId]) -> i64 {
    2 * count_owned(owned, &[VoucherId::RerollSurplus, VoucherId::RerollGlut]) as i64
}

pub fn extra_hands(owned: &[VoucherId]) -> i32 {
    count_owned(owned, &[VoucherId::Grabber, VoucherId::NachoTong]) as i32
}

pub fn extra_discards(owned: &[VoucherId]) -> i32 {
    count_owned(owned, &[VoucherId::Wasteful, VoucherId::Recyclomancy]) as i32
}

// ============================================================================
// 單元測試
// ============================================================================
