//! WorldState - the aggregate every cascade stage builds on

use ahash::AHashSet;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::core::types::{CreatureId, Disposition, FactionKind, NpcId, QuestId};
use crate::forge::creature::Creature;
use crate::forge::faction::{Faction, FactionRelations};
use crate::forge::location::{Location, LocationKind};
use crate::forge::map::WorldMap;
use crate::forge::names;
use crate::forge::npc::Npc;
use crate::forge::player::PlayerCharacter;
use crate::forge::quest::Quest;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// In-game clock; `tick` counts minutes since midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameTime {
    pub day: u32,
    pub tick: u32,
}

impl GameTime {
    pub fn new(day: u32, hour: u32) -> Self {
        Self {
            day,
            tick: hour * 60,
        }
    }

    pub fn advance(&mut self, minutes: u32) {
        let total = self.tick + minutes;
        self.day += total / MINUTES_PER_DAY;
        self.tick = total % MINUTES_PER_DAY;
    }

    pub fn hour(&self) -> u32 {
        self.tick / 60
    }

    pub fn minute(&self) -> u32 {
        self.tick % 60
    }
}

impl Default for GameTime {
    fn default() -> Self {
        Self::new(1, 6)
    }
}

impl fmt::Display for GameTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Day {}, {:02}:{:02}", self.day, self.hour(), self.minute())
    }
}

/// The realm the capital belongs to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kingdom {
    pub name: String,
    pub capital: String,
    pub disposition: Option<Disposition>,
    pub ruler: Option<NpcId>,
    pub garrison: Vec<NpcId>,
}

/// Narrative hook fired by the downstream agent when `key` happens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChronicleTrigger {
    pub key: String,
    pub outcome: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarHistory {
    pub name: String,
    pub aggressor: FactionKind,
    pub defender: FactionKind,
    pub summary: String,
}

/// The world being forged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    pub seed: u64,
    pub map: WorldMap,
    pub realm: Kingdom,
    pub player: PlayerCharacter,
    pub locations: BTreeMap<String, Location>,
    pub factions: BTreeMap<FactionKind, Faction>,
    pub relations: FactionRelations,
    pub npcs: BTreeMap<NpcId, Npc>,
    pub creatures: BTreeMap<CreatureId, Creature>,
    pub quests: BTreeMap<QuestId, Quest>,
    /// Size of the gold pool shared out by the economy
    pub total_gold: u64,
    pub time: GameTime,
    pub chronicle: Vec<ChronicleTrigger>,
    pub histories: Vec<WarHistory>,
    /// Scene descriptions keyed `BIOME_PHASE_WEATHER`
    pub prose: BTreeMap<String, String>,
    #[serde(skip)]
    npc_names: AHashSet<String>,
    next_npc_id: u32,
    next_creature_id: u32,
    next_family_id: u32,
}

impl WorldState {
    pub fn new(seed: u64, map: WorldMap, player: PlayerCharacter, total_gold: u64) -> Self {
        Self {
            seed,
            map,
            realm: Kingdom::default(),
            player,
            locations: BTreeMap::new(),
            factions: BTreeMap::new(),
            relations: FactionRelations::default(),
            npcs: BTreeMap::new(),
            creatures: BTreeMap::new(),
            quests: BTreeMap::new(),
            total_gold,
            time: GameTime::default(),
            chronicle: Vec::new(),
            histories: Vec::new(),
            prose: BTreeMap::new(),
            npc_names: AHashSet::new(),
            next_npc_id: 1,
            next_creature_id: 1,
            next_family_id: 1,
        }
    }

    pub fn next_npc_id(&mut self) -> NpcId {
        let id = NpcId(self.next_npc_id);
        self.next_npc_id += 1;
        id
    }

    /// Draw a person name from `make`, redrawing while it is already worn
    pub fn draw_npc_name(&self, rng: &mut ChaCha8Rng, make: impl Fn(&mut ChaCha8Rng) -> String) -> String {
        let mut name = make(rng);
        for _ in 0..16 {
            if !self.npc_names.contains(&name) {
                break;
            }
            name = make(rng);
        }
        name
    }

    /// Reserve `name` for a new NPC; a name already worn gets a numeral suffix
    pub fn register_npc_name(&mut self, rng: &mut ChaCha8Rng, name: String) -> String {
        if self.npc_names.insert(name.clone()) {
            return name;
        }
        names::unique(rng, &mut self.npc_names, |_| name.clone())
    }

    pub fn next_creature_id(&mut self) -> CreatureId {
        let id = CreatureId(self.next_creature_id);
        self.next_creature_id += 1;
        id
    }

    pub fn next_family_id(&mut self) -> u32 {
        let id = self.next_family_id;
        self.next_family_id += 1;
        id
    }

    pub fn locations_of(&self, kind: LocationKind) -> impl Iterator<Item = &Location> {
        self.locations.values().filter(move |l| l.kind == kind)
    }

    pub fn placed_locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values().filter(|l| l.is_placed())
    }

    pub fn npc_name(&self, id: NpcId) -> &str {
        self.npcs.get(&id).map(|n| n.name.as_str()).unwrap_or("<unknown>")
    }

    /// Faction leader, if the faction exists and has one
    pub fn leader_of(&self, kind: FactionKind) -> Option<&Npc> {
        self.factions
            .get(&kind)
            .and_then(|f| f.leader)
            .and_then(|id| self.npcs.get(&id))
    }

    pub fn distributed_gold(&self) -> u64 {
        self.npcs.values().map(|n| n.gold).sum::<u64>()
            + self.creatures.values().map(|c| c.gold).sum::<u64>()
    }
}
