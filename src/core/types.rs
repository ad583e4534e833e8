//! Core type definitions used throughout the codebase

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for NPCs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NpcId(pub u32);

impl fmt::Display for NpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{:04}", self.0)
    }
}

/// Unique identifier for creatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CreatureId(pub u32);

impl fmt::Display for CreatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{:04}", self.0)
    }
}

/// Unique identifier for quests
///
/// Built from generator bytes rather than OS entropy so a seeded run
/// always produces the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestId(pub Uuid);

impl QuestId {
    pub fn from_rng(rng: &mut ChaCha8Rng) -> Self {
        let bytes: [u8; 16] = rng.gen();
        Self(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }
}

impl fmt::Display for QuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Either kind of entity that can hold gold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityRef {
    Npc(NpcId),
    Creature(CreatureId),
}

/// Difficulty / challenge tier, always within 1..=10
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Tier(u8);

impl Tier {
    pub const MIN: Tier = Tier(1);
    pub const MAX: Tier = Tier(10);

    /// Clamp any integer into the tier range
    pub fn clamped(value: i32) -> Self {
        Self(value.clamp(Self::MIN.0 as i32, Self::MAX.0 as i32) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn offset(self, delta: i32) -> Self {
        Self::clamped(self.0 as i32 + delta)
    }

    pub fn all() -> impl Iterator<Item = Tier> {
        (Self::MIN.0..=Self::MAX.0).map(Tier)
    }

    pub fn distance(self, other: Tier) -> u8 {
        self.0.abs_diff(other.0)
    }
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!("tier {} outside 1..=10", value))
        }
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.0
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inclusive integer range read from config files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub min: u32,
    pub max: u32,
}

impl Span {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut ChaCha8Rng) -> u32 {
        if self.max <= self.min {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }

    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }
}

/// Width and height of a footprint, in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub const fn square(side: usize) -> Self {
        Self { width: side, height: side }
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

/// The six ability scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub strength: u8,
    pub dexterity: u8,
    pub constitution: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub charisma: u8,
}

impl Default for Stats {
    fn default() -> Self {
        Self::uniform(10)
    }
}

impl Stats {
    pub const fn uniform(value: u8) -> Self {
        Self {
            strength: value,
            dexterity: value,
            constitution: value,
            intelligence: value,
            wisdom: value,
            charisma: value,
        }
    }

    pub fn get(&self, attribute: Attribute) -> u8 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Dexterity => self.dexterity,
            Attribute::Constitution => self.constitution,
            Attribute::Intelligence => self.intelligence,
            Attribute::Wisdom => self.wisdom,
            Attribute::Charisma => self.charisma,
        }
    }

    pub fn get_mut(&mut self, attribute: Attribute) -> &mut u8 {
        match attribute {
            Attribute::Strength => &mut self.strength,
            Attribute::Dexterity => &mut self.dexterity,
            Attribute::Constitution => &mut self.constitution,
            Attribute::Intelligence => &mut self.intelligence,
            Attribute::Wisdom => &mut self.wisdom,
            Attribute::Charisma => &mut self.charisma,
        }
    }

    /// Standard d20 modifier: (score - 10) / 2, rounded down
    pub fn modifier(&self, attribute: Attribute) -> i32 {
        (self.get(attribute) as i32 - 10).div_euclid(2)
    }
}

/// Social role of an NPC
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NpcStatus {
    Child,
    Commoner,
    Guard,
    Merchant,
    Mage,
    Thief,
    Cultist,
    Ruler,
}

impl NpcStatus {
    /// Level band an NPC of this status is generated in
    pub fn level_range(&self) -> Span {
        match self {
            NpcStatus::Child => Span::new(1, 1),
            NpcStatus::Commoner => Span::new(1, 3),
            NpcStatus::Merchant => Span::new(1, 4),
            NpcStatus::Guard | NpcStatus::Thief => Span::new(2, 5),
            NpcStatus::Mage | NpcStatus::Cultist => Span::new(3, 6),
            NpcStatus::Ruler => Span::new(8, 10),
        }
    }
}

impl fmt::Display for NpcStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Moral/ethical alignment of a faction or realm
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Disposition {
    LawfulGood,
    LawfulNeutral,
    TrueNeutral,
    ChaoticNeutral,
    LawfulEvil,
    ChaoticEvil,
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Disposition::LawfulGood => "Lawful Good",
            Disposition::LawfulNeutral => "Lawful Neutral",
            Disposition::TrueNeutral => "True Neutral",
            Disposition::ChaoticNeutral => "Chaotic Neutral",
            Disposition::LawfulEvil => "Lawful Evil",
            Disposition::ChaoticEvil => "Chaotic Evil",
        };
        f.write_str(label)
    }
}

/// The closed roster of factions a world can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FactionKind {
    RoyalGuard,
    MerchantsGuild,
    MagesGuild,
    ThievesGuild,
    CrimsonHand,
}

impl FactionKind {
    pub const ALL: [FactionKind; 5] = [
        FactionKind::RoyalGuard,
        FactionKind::MerchantsGuild,
        FactionKind::MagesGuild,
        FactionKind::ThievesGuild,
        FactionKind::CrimsonHand,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FactionKind::RoyalGuard => "Royal Guard",
            FactionKind::MerchantsGuild => "Merchants' Guild",
            FactionKind::MagesGuild => "Mages' Guild",
            FactionKind::ThievesGuild => "Thieves' Guild",
            FactionKind::CrimsonHand => "Crimson Hand",
        }
    }

    /// Status every member of this faction takes on
    pub fn member_status(&self) -> NpcStatus {
        match self {
            FactionKind::RoyalGuard => NpcStatus::Guard,
            FactionKind::MerchantsGuild => NpcStatus::Merchant,
            FactionKind::MagesGuild => NpcStatus::Mage,
            FactionKind::ThievesGuild => NpcStatus::Thief,
            FactionKind::CrimsonHand => NpcStatus::Cultist,
        }
    }

    pub fn disposition(&self) -> Disposition {
        match self {
            FactionKind::RoyalGuard => Disposition::LawfulGood,
            FactionKind::MerchantsGuild => Disposition::LawfulNeutral,
            FactionKind::MagesGuild => Disposition::TrueNeutral,
            FactionKind::ThievesGuild => Disposition::ChaoticNeutral,
            FactionKind::CrimsonHand => Disposition::LawfulEvil,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FactionKind::RoyalGuard => "Sworn protectors of the crown, its roads and its gates.",
            FactionKind::MerchantsGuild => "A powerful consortium of traders and artisans.",
            FactionKind::MagesGuild => "Keepers of arcane lore who sell their secrets dearly.",
            FactionKind::ThievesGuild => {
                "A shadowy network of spies, burglars and smugglers operating in plain sight."
            }
            FactionKind::CrimsonHand => "A secret order that trades in blood oaths and forbidden rites.",
        }
    }
}

impl fmt::Display for FactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Quest archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QuestKind {
    Fetch,
    Kill,
    Clear,
    Escort,
    Investigate,
}

impl fmt::Display for QuestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_tier_clamps() {
        assert_eq!(Tier::clamped(0), Tier::MIN);
        assert_eq!(Tier::clamped(42), Tier::MAX);
        assert_eq!(Tier::clamped(5).offset(-1).get(), 4);
        assert_eq!(Tier::MAX.offset(1), Tier::MAX);
        assert_eq!(Tier::all().count(), 10);
    }

    #[test]
    fn test_tier_rejects_out_of_range() {
        assert!(Tier::try_from(0u8).is_err());
        assert!(Tier::try_from(11u8).is_err());
        assert_eq!(Tier::try_from(7u8).unwrap().get(), 7);
    }

    #[test]
    fn test_quest_id_is_seed_stable() {
        let mut a = ChaCha8Rng::seed_from_u64(42);
        let mut b = ChaCha8Rng::seed_from_u64(42);
        assert_eq!(QuestId::from_rng(&mut a), QuestId::from_rng(&mut b));
        assert_ne!(QuestId::from_rng(&mut a), QuestId::from_rng(&mut a));
    }

    #[test]
    fn test_span_sample_within_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let span = Span::new(2, 4);
        for _ in 0..100 {
            let v = span.sample(&mut rng);
            assert!((2..=4).contains(&v));
        }
        assert_eq!(Span::new(3, 3).sample(&mut rng), 3);
    }

    #[test]
    fn test_stat_modifier() {
        let mut stats = Stats::uniform(10);
        assert_eq!(stats.modifier(Attribute::Strength), 0);
        *stats.get_mut(Attribute::Strength) = 15;
        assert_eq!(stats.modifier(Attribute::Strength), 2);
        *stats.get_mut(Attribute::Wisdom) = 7;
        assert_eq!(stats.modifier(Attribute::Wisdom), -2);
    }

    #[test]
    fn test_every_faction_has_distinct_member_status() {
        let mut statuses: Vec<NpcStatus> =
            FactionKind::ALL.iter().map(|k| k.member_status()).collect();
        statuses.sort();
        statuses.dedup();
        assert_eq!(statuses.len(), FactionKind::ALL.len());
    }
}
