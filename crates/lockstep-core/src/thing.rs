//! Things: the simulation entities whose state is checksummed per turn.
//!
//! Live things are threaded through eight per-category linked lists via
//! [`Thing::next_of_class`]. The categories are also the granularity of
//! the desync breakdown.

use std::fmt;

use crate::checksum::{Checksum, ChecksumFold};
use crate::id::{GameTurn, ThingIndex};

// ── ThingCategory ───────────────────────────────────────────────

/// One of the eight thing lists summed independently per turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ThingCategory {
    /// Living creatures.
    Creatures,
    /// Placed traps.
    Traps,
    /// Projectiles in flight.
    Shots,
    /// Objects lying on the map.
    Objects,
    /// Visual and gameplay effects.
    Effects,
    /// Creature corpses.
    DeadCreatures,
    /// Effect generators.
    EffectGens,
    /// Doors.
    Doors,
}

impl ThingCategory {
    /// Number of categories.
    pub const COUNT: usize = 8;

    /// Every category, in the order checksums are stored and reported.
    pub const ALL: [ThingCategory; Self::COUNT] = [
        Self::Creatures,
        Self::Traps,
        Self::Shots,
        Self::Objects,
        Self::Effects,
        Self::DeadCreatures,
        Self::EffectGens,
        Self::Doors,
    ];

    /// Position of this category within [`ALL`](Self::ALL).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human-readable label used in desync reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Creatures => "Creatures",
            Self::Traps => "Traps",
            Self::Shots => "Shots",
            Self::Objects => "Objects",
            Self::Effects => "Effects",
            Self::DeadCreatures => "Dead Creatures",
            Self::EffectGens => "Effect Generators",
            Self::Doors => "Doors",
        }
    }
}

impl fmt::Display for ThingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── ThingClass ──────────────────────────────────────────────────

/// Class of a thing. The discriminants are the class ids folded into
/// the per-thing checksum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ThingClass {
    /// Map object.
    Object = 1,
    /// Projectile.
    Shot = 2,
    /// Single particle of an effect. Not synchronized.
    EffectElem = 3,
    /// Corpse.
    DeadCreature = 4,
    /// Creature.
    Creature = 5,
    /// Effect.
    Effect = 6,
    /// Effect generator.
    EffectGen = 7,
    /// Trap.
    Trap = 8,
    /// Door.
    Door = 9,
    /// Positional sound source. Not synchronized.
    AmbientSnd = 12,
    /// Cave-in.
    CaveIn = 13,
}

impl ThingClass {
    /// Whether things of this class are part of the lockstep state.
    ///
    /// Ambient sounds and effect elements are cosmetic and may legally
    /// differ between peers, so they checksum to zero.
    pub fn is_synchronized(self) -> bool {
        !matches!(self, Self::AmbientSnd | Self::EffectElem)
    }
}

// ── Thing ───────────────────────────────────────────────────────

/// A position on the map in sub-tile units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MapPos {
    /// East-west coordinate.
    pub x: i32,
    /// North-south coordinate.
    pub y: i32,
    /// Height.
    pub z: i32,
}

/// Creature-only state that lockstep must keep identical.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CreatureInstance {
    /// Turn the current instance (spell, attack) started.
    pub inst_turn: u32,
    /// Id of the instance being played.
    pub instance_id: u16,
}

/// The checksummed state of one thing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Thing {
    /// Slot in the global thing table.
    pub index: ThingIndex,
    /// Whether the slot is allocated.
    pub exists: bool,
    /// Class of the thing.
    pub class: ThingClass,
    /// Model within the class.
    pub model: u16,
    /// Owning player slot.
    pub owner: u8,
    /// Turn the thing was created.
    pub creation_turn: GameTurn,
    /// Per-thing RNG state.
    pub random_seed: u32,
    /// Position on the map.
    pub mappos: MapPos,
    /// Health points.
    pub health: i32,
    /// Current animation frame.
    pub current_frame: u16,
    /// Frame count of the current animation.
    pub max_frames: u16,
    /// Next thing in the same category list, or [`ThingIndex::NONE`].
    pub next_of_class: ThingIndex,
    /// Creature control state, present for creatures only.
    pub creature: Option<CreatureInstance>,
}

impl Thing {
    /// Per-thing checksum.
    ///
    /// Zero for things that no longer exist or whose class is not
    /// synchronized. Otherwise a polynomial fold of identity, position,
    /// health and animation state, plus instance state for creatures.
    pub fn checksum(&self) -> Checksum {
        if !self.exists || !self.class.is_synchronized() {
            return 0;
        }
        let mut fold = ChecksumFold::new()
            .add(self.index.0 as u32)
            .add(self.class as u32)
            .add(self.model as u32)
            .add(self.owner as u32)
            .add(self.creation_turn.0)
            .add(self.random_seed)
            .add(self.mappos.x as u32)
            .add(self.mappos.y as u32)
            .add(self.mappos.z as u32)
            .add(self.health as u32)
            .add(self.current_frame as u32)
            .add(self.max_frames as u32);
        if self.class == ThingClass::Creature {
            if let Some(inst) = self.creature {
                fold = fold.add(inst.inst_turn).add(inst.instance_id as u32);
            }
        }
        fold.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(index: u16) -> Thing {
        Thing {
            index: ThingIndex(index),
            exists: true,
            class: ThingClass::Object,
            model: 3,
            owner: 1,
            creation_turn: GameTurn(10),
            random_seed: 77,
            mappos: MapPos { x: 256, y: 512, z: 0 },
            health: 100,
            current_frame: 0,
            max_frames: 4,
            next_of_class: ThingIndex::NONE,
            creature: None,
        }
    }

    #[test]
    fn categories_are_in_storage_order() {
        for (i, cat) in ThingCategory::ALL.iter().enumerate() {
            assert_eq!(cat.index(), i);
        }
    }

    #[test]
    fn deleted_thing_checksums_to_zero() {
        let mut t = object(5);
        t.exists = false;
        assert_eq!(t.checksum(), 0);
    }

    #[test]
    fn cosmetic_classes_checksum_to_zero() {
        let mut t = object(5);
        t.class = ThingClass::AmbientSnd;
        assert_eq!(t.checksum(), 0);
        t.class = ThingClass::EffectElem;
        assert_eq!(t.checksum(), 0);
    }

    #[test]
    fn position_change_changes_checksum() {
        let a = object(5);
        let mut b = object(5);
        b.mappos.x += 1;
        assert_ne!(a.checksum(), b.checksum());
    }

    #[test]
    fn creature_instance_state_is_folded() {
        let mut a = object(9);
        a.class = ThingClass::Creature;
        a.creature = Some(CreatureInstance {
            inst_turn: 4,
            instance_id: 2,
        });
        let mut b = a.clone();
        b.creature = Some(CreatureInstance {
            inst_turn: 5,
            instance_id: 2,
        });
        assert_ne!(a.checksum(), b.checksum());
    }

    #[test]
    fn instance_state_ignored_for_non_creatures() {
        let a = object(9);
        let mut b = object(9);
        b.creature = Some(CreatureInstance {
            inst_turn: 5,
            instance_id: 2,
        });
        assert_eq!(a.checksum(), b.checksum());
    }
}
