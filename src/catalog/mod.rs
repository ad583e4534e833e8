//! Read-only lookup catalogs supplied to the forge
//!
//! Everything here is loaded once before the cascade starts and never
//! mutated afterwards. Generators refer to entries by name.

mod loader;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::error::{ForgeError, Result};
use crate::core::types::{Attribute, FactionKind, NpcStatus, QuestKind, Tier};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityBonus {
    pub ability: Attribute,
    pub value: i8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Race {
    pub name: String,
    #[serde(default)]
    pub ability_bonuses: Vec<AbilityBonus>,
    pub speed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterClass {
    pub name: String,
    pub hit_die: u32,
    pub primary_ability: Attribute,
    /// Statuses this class is preferred for
    #[serde(default)]
    pub roles: Vec<NpcStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Weapon,
    Armor,
    Misc,
    Consumable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EquipSlot {
    Head,
    Chest,
    MainHand,
    OffHand,
    Ring,
    Neck,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub kind: ItemKind,
    pub value: u64,
    #[serde(default)]
    pub slot: Option<EquipSlot>,
}

/// Guild-taught ability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub description: String,
    pub tier: Tier,
    pub cost: u64,
    pub guild: FactionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureTemplate {
    pub name: String,
    pub tier: Tier,
    pub xp: u32,
    #[serde(default)]
    pub boss: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestTemplate {
    pub kind: QuestKind,
    pub title: String,
    pub description: String,
    pub min_tier: Tier,
    pub max_tier: Tier,
}

impl QuestTemplate {
    pub fn covers(&self, tier: Tier) -> bool {
        self.min_tier <= tier && tier <= self.max_tier
    }
}

/// Fixed gear each role is outfitted with
pub fn role_gear(status: NpcStatus) -> &'static [&'static str] {
    match status {
        NpcStatus::Guard => &["Longsword", "Chain Mail", "Shield"],
        NpcStatus::Thief => &["Dagger", "Leather Armor"],
        NpcStatus::Mage => &["Quarterstaff", "Robes"],
        NpcStatus::Cultist => &["Dagger", "Robes"],
        NpcStatus::Ruler => &["Crown", "Longsword", "Plate Armor"],
        NpcStatus::Merchant => &["Signet Ring"],
        NpcStatus::Commoner | NpcStatus::Child => &[],
    }
}

const ROLES: [NpcStatus; 8] = [
    NpcStatus::Child,
    NpcStatus::Commoner,
    NpcStatus::Guard,
    NpcStatus::Merchant,
    NpcStatus::Mage,
    NpcStatus::Thief,
    NpcStatus::Cultist,
    NpcStatus::Ruler,
];

/// All catalogs the cascade reads from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub races: Vec<Race>,
    pub classes: Vec<CharacterClass>,
    pub alignments: Vec<Alignment>,
    pub items: Vec<Item>,
    pub abilities: Vec<Ability>,
    pub creatures: Vec<CreatureTemplate>,
    pub quest_templates: Vec<QuestTemplate>,
}

impl Catalog {
    pub fn item(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.name == name)
    }

    pub fn ability(&self, name: &str) -> Option<&Ability> {
        self.abilities.iter().find(|a| a.name == name)
    }

    /// Classes that list `status` among their roles
    pub fn classes_for(&self, status: NpcStatus) -> Vec<&CharacterClass> {
        self.classes.iter().filter(|c| c.roles.contains(&status)).collect()
    }

    pub fn guild_abilities(&self, guild: FactionKind) -> impl Iterator<Item = &Ability> {
        self.abilities.iter().filter(move |a| a.guild == guild)
    }

    pub fn regular_creatures(&self) -> impl Iterator<Item = &CreatureTemplate> {
        self.creatures.iter().filter(|c| !c.boss)
    }

    pub fn boss_creatures(&self) -> impl Iterator<Item = &CreatureTemplate> {
        self.creatures.iter().filter(|c| c.boss)
    }

    /// Reject catalogs the cascade cannot work from
    pub fn validate(&self) -> Result<()> {
        require_non_empty("races", self.races.len())?;
        require_non_empty("classes", self.classes.len())?;
        require_non_empty("alignments", self.alignments.len())?;
        require_non_empty("items", self.items.len())?;
        require_non_empty("creatures", self.creatures.len())?;

        require_unique("race", self.races.iter().map(|r| r.name.as_str()))?;
        require_unique("class", self.classes.iter().map(|c| c.name.as_str()))?;
        require_unique("alignment", self.alignments.iter().map(|a| a.name.as_str()))?;
        require_unique("item", self.items.iter().map(|i| i.name.as_str()))?;
        require_unique("ability", self.abilities.iter().map(|a| a.name.as_str()))?;
        require_unique("creature", self.creatures.iter().map(|c| c.name.as_str()))?;

        if self.regular_creatures().next().is_none() {
            return Err(ForgeError::Catalog("no regular creature templates".into()));
        }
        if self.boss_creatures().next().is_none() {
            return Err(ForgeError::Catalog("no boss creature templates".into()));
        }

        for status in ROLES {
            for gear in role_gear(status) {
                if self.item(gear).is_none() {
                    return Err(ForgeError::Catalog(format!(
                        "{} gear item '{}' missing from item catalog",
                        status, gear
                    )));
                }
            }
        }

        for template in &self.quest_templates {
            if template.min_tier > template.max_tier {
                return Err(ForgeError::Catalog(format!(
                    "quest template '{}' has min_tier {} above max_tier {}",
                    template.title, template.min_tier, template.max_tier
                )));
            }
        }

        Ok(())
    }
}

fn require_non_empty(list: &str, len: usize) -> Result<()> {
    if len == 0 {
        return Err(ForgeError::Catalog(format!("{} list is empty", list)));
    }
    Ok(())
}

fn require_unique<'a>(kind: &str, names: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = AHashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(ForgeError::Catalog(format!("duplicate {} '{}'", kind, name)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog_is_valid() {
        let catalog = Catalog::embedded().unwrap();
        assert!(catalog.validate().is_ok());
        assert!(catalog.boss_creatures().count() >= 1);
        assert!(!catalog.classes_for(NpcStatus::Mage).is_empty());
    }

    #[test]
    fn test_missing_gear_is_rejected() {
        let mut catalog = Catalog::embedded().unwrap();
        catalog.items.retain(|i| i.name != "Crown");
        let err = catalog.validate().unwrap_err();
        assert!(err.to_string().contains("Crown"));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut catalog = Catalog::embedded().unwrap();
        let dup = catalog.races[0].clone();
        catalog.races.push(dup);
        assert!(matches!(catalog.validate(), Err(ForgeError::Catalog(_))));
    }

    #[test]
    fn test_empty_creatures_rejected() {
        let mut catalog = Catalog::embedded().unwrap();
        catalog.creatures.retain(|c| !c.boss);
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_template_tier_cover() {
        let catalog = Catalog::embedded().unwrap();
        let t = catalog
            .quest_templates
            .iter()
            .find(|t| t.max_tier < Tier::MAX)
            .unwrap();
        assert!(t.covers(t.min_tier));
        assert!(!t.covers(Tier::MAX));
    }
}
