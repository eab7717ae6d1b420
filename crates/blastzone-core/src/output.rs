//! Fire-and-forget side channel from the simulation to presentation.
//!
//! The core never calls into audio or rendering. Instead it records what
//! happened as [`Event`]s, stamped with the tick and an in-tick sequence
//! number, and the host drains them once per frame. Nothing in the
//! simulation reads the log back, so draining (or ignoring) it can never
//! change the outcome of a tick.
//!
//! # Example
//!
//! ```
//! use blastzone_core::entity::EntityId;
//! use blastzone_core::output::{Event, EventLog, SoundCue};
//!
//! let mut log = EventLog::new();
//! log.push(7, Event::Sound(SoundCue::Fire));
//! log.push(7, Event::EntityDestroyed { entity: EntityId::new(3), destroyer: None });
//!
//! let records = log.drain();
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1].sequence, 1);
//! assert!(log.is_empty());
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{EffectKind, EntityId, EntityTag, PickupKind};

// =============================================================================
// Events
// =============================================================================

/// Named sound cue for the audio layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// A barrel fired.
    Fire,
    /// Ammo was refilled by a pickup.
    Reload,
    /// Health was restored by a pickup.
    Heal,
    /// A speed boost was collected.
    SpeedUp,
}

/// Something that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A barrel fired a projectile.
    ProjectileFired {
        /// Entity owning the barrel.
        shooter: EntityId,
        /// The new projectile.
        projectile: EntityId,
    },
    /// A visual effect appeared.
    EffectSpawned {
        /// The new effect entity.
        effect: EntityId,
        /// Effect kind.
        kind: EffectKind,
        /// Where it appeared.
        position: Vec2,
    },
    /// A sound should play.
    Sound(SoundCue),
    /// A projectile damaged something.
    DamageDealt {
        /// Entity that fired the projectile.
        source: EntityId,
        /// Entity that took the damage.
        target: EntityId,
        /// Damage amount.
        amount: f32,
    },
    /// An entity left the world.
    EntityDestroyed {
        /// The destroyed entity.
        entity: EntityId,
        /// Entity responsible, if any.
        destroyer: Option<EntityId>,
    },
    /// A tank collected a pickup.
    PickupConsumed {
        /// The collecting tank.
        tank: EntityId,
        /// The consumed pickup.
        pickup: EntityId,
        /// What it did.
        kind: PickupKind,
    },
    /// A timed item effect ended on a tank.
    ItemExpired {
        /// The tank that held the item.
        tank: EntityId,
        /// The item kind.
        kind: PickupKind,
    },
    /// An item box absorbed a hit.
    BoxWorn {
        /// The box.
        item_box: EntityId,
        /// Hits left.
        remaining: u32,
    },
    /// An entity was added to the world after construction.
    EntitySpawned {
        /// The new entity.
        entity: EntityId,
        /// Its category.
        tag: EntityTag,
    },
}

// =============================================================================
// Event Log
// =============================================================================

/// An event stamped with when it was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Tick during which the event happened.
    pub tick: u64,
    /// Position within the tick, starting at 0.
    pub sequence: u32,
    /// What happened.
    pub event: Event,
}

/// Append-only buffer of events, drained by the host.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
    current_tick: u64,
    next_sequence: u32,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `event` as happening during `tick`.
    pub fn push(&mut self, tick: u64, event: Event) {
        if tick != self.current_tick {
            self.current_tick = tick;
            self.next_sequence = 0;
        }
        self.records.push(EventRecord {
            tick,
            sequence: self.next_sequence,
            event,
        });
        self.next_sequence += 1;
    }

    /// Removes and returns every recorded event, oldest first.
    pub fn drain(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.records)
    }

    /// Recorded events not yet drained.
    #[must_use]
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Number of undrained events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` when nothing is waiting to be drained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
