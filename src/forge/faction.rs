//! Factions and the relations between them

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::core::types::{Disposition, FactionKind, NpcId};

/// What a faction cares about; drives inter-faction relations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Interest {
    Order,
    Justice,
    Prosperity,
    Tradition,
    Control,
    Power,
    Supremacy,
    Balance,
    Knowledge,
    Preservation,
    Freedom,
    Domination,
    Wealth,
    Anarchy,
}

impl Interest {
    /// Interests a faction of the given disposition chooses from
    pub fn table(disposition: Disposition) -> &'static [Interest] {
        use Interest::*;
        match disposition {
            Disposition::LawfulGood => &[Order, Justice, Prosperity],
            Disposition::LawfulNeutral => &[Order, Tradition, Prosperity],
            Disposition::TrueNeutral => &[Balance, Knowledge, Preservation],
            Disposition::ChaoticNeutral => &[Freedom, Wealth, Anarchy],
            Disposition::LawfulEvil => &[Control, Power, Supremacy],
            Disposition::ChaoticEvil => &[Domination, Wealth, Anarchy],
        }
    }

    fn opposes(&self) -> &'static [Interest] {
        use Interest::*;
        match self {
            Order => &[Anarchy],
            Justice => &[Supremacy, Domination],
            Prosperity => &[Domination],
            Tradition => &[Anarchy],
            Control => &[Anarchy, Freedom],
            Power => &[Balance],
            Supremacy => &[Balance],
            Balance => &[Power, Supremacy, Anarchy],
            Domination => &[Justice, Prosperity],
            Freedom => &[Control],
            Knowledge | Preservation | Wealth | Anarchy => &[],
        }
    }

    /// Symmetric conflict test
    pub fn conflicts_with(&self, other: Interest) -> bool {
        self.opposes().contains(&other) || other.opposes().contains(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Relation {
    Allied,
    Neutral,
    Hostile,
}

impl Relation {
    pub fn between(a: &[Interest], b: &[Interest]) -> Self {
        if a.iter().any(|x| b.iter().any(|y| x.conflicts_with(*y))) {
            Relation::Hostile
        } else if a.iter().any(|x| b.contains(x)) {
            Relation::Allied
        } else {
            Relation::Neutral
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Symmetric relation matrix, stored in both directions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionRelations(BTreeMap<FactionKind, BTreeMap<FactionKind, Relation>>);

impl FactionRelations {
    pub fn set(&mut self, a: FactionKind, b: FactionKind, relation: Relation) {
        self.0.entry(a).or_default().insert(b, relation);
        self.0.entry(b).or_default().insert(a, relation);
    }

    pub fn get(&self, a: FactionKind, b: FactionKind) -> Option<Relation> {
        self.0.get(&a).and_then(|row| row.get(&b)).copied()
    }

    /// Each unordered pair once, lower kind first
    pub fn pairs(&self) -> impl Iterator<Item = (FactionKind, FactionKind, Relation)> + '_ {
        self.0.iter().flat_map(|(a, row)| {
            row.iter()
                .filter(move |(b, _)| a < *b)
                .map(move |(b, r)| (*a, *b, *r))
        })
    }

    pub fn hostile_to(&self, kind: FactionKind) -> Vec<FactionKind> {
        self.0
            .get(&kind)
            .map(|row| {
                row.iter()
                    .filter(|(_, r)| **r == Relation::Hostile)
                    .map(|(k, _)| *k)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_symmetric(&self) -> bool {
        self.0.iter().all(|(a, row)| {
            row.iter().all(|(b, r)| self.get(*b, *a) == Some(*r))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faction {
    pub kind: FactionKind,
    pub name: String,
    pub disposition: Disposition,
    pub description: String,
    pub interests: Vec<Interest>,
    /// Always one of `members` when set
    pub leader: Option<NpcId>,
    /// Runner-up of the leadership election
    pub right_hand: Option<NpcId>,
    pub members: Vec<NpcId>,
}

impl Faction {
    pub fn new(kind: FactionKind) -> Self {
        Self {
            kind,
            name: kind.name().to_string(),
            disposition: kind.disposition(),
            description: kind.description().to_string(),
            interests: Vec::new(),
            leader: None,
            right_hand: None,
            members: Vec::new(),
        }
    }
}
