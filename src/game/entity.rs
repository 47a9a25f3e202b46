//! # Entities
//!
//! Runtime records for the player and the enemies that spawners produce.
//!
//! The engine core only tracks stats and timers; movement and combat
//! resolution live in the host runtime. [`Entity::tick`] advances the timers
//! and reports the action an enemy wants to take this frame, if any.

use crate::game::{Position, TileType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for entities.
pub type EntityId = Uuid;

/// Creates a new unique entity ID.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4()
}

/// Seconds between shield points once regeneration has kicked in.
const SHIELD_REGEN_INTERVAL: f32 = 0.5;

/// Seconds an entity must wait between portal jumps.
const TELEPORT_COOLDOWN: f32 = 1.0;

/// What an entity is, plus its kind-specific state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    /// Ranged enemy firing on a fixed cadence.
    Fighter { shoot_cooldown: f32, shoot_timer: f32 },
    /// Support enemy that rallies nearby fighters; no timers of its own.
    Flagman,
    /// Melee enemy that detonates when the player gets close.
    Suicider { trigger_radius: f32 },
    /// Enemy that charges up, then detonates in place.
    Bomber {
        charge_time: f32,
        charge_timer: f32,
        charging: bool,
    },
}

/// An action an entity wants resolved by the host runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityAction {
    Shoot,
    Detonate,
}

/// A live entity: the player or one enemy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Position,
    pub hp: i32,
    pub max_hp: i32,
    pub shield: i32,
    pub max_shield: i32,
    /// Seconds without damage before the shield starts regenerating.
    pub shield_regen_delay: f32,
    /// Tiles per second.
    pub max_speed: f32,
    regen_timer: f32,
    teleport_timer: f32,
}

impl Entity {
    fn new(
        kind: EntityKind,
        position: Position,
        max_hp: i32,
        max_shield: i32,
        shield_regen_delay: f32,
        max_speed: f32,
    ) -> Self {
        Self {
            id: new_entity_id(),
            kind,
            position,
            hp: max_hp,
            max_hp,
            shield: max_shield,
            max_shield,
            shield_regen_delay,
            max_speed,
            regen_timer: 0.0,
            teleport_timer: 0.0,
        }
    }

    /// The player, at full health and shield.
    pub fn player(position: Position) -> Self {
        Self::new(EntityKind::Player, position, 100, 50, 3.0, 6.0)
    }

    /// The enemy an enemy tile stands for, or `None` for non-enemy tiles.
    pub fn from_tile(tile: TileType, position: Position) -> Option<Self> {
        Some(match tile {
            TileType::EnemyFighter => Self::new(
                EntityKind::Fighter {
                    shoot_cooldown: 1.5,
                    shoot_timer: 1.5,
                },
                position,
                30,
                0,
                0.0,
                4.0,
            ),
            TileType::EnemyFlagman => Self::new(EntityKind::Flagman, position, 20, 20, 5.0, 3.0),
            TileType::EnemySuicider => Self::new(
                EntityKind::Suicider { trigger_radius: 3.0 },
                position,
                15,
                0,
                0.0,
                7.0,
            ),
            TileType::EnemyBomber => Self::new(
                EntityKind::Bomber {
                    charge_time: 2.0,
                    charge_timer: 0.0,
                    charging: false,
                },
                position,
                40,
                0,
                0.0,
                2.5,
            ),
            _ => return None,
        })
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Advances timers by `dt` seconds and reports a pending action.
    pub fn tick(&mut self, dt: f32) -> Option<EntityAction> {
        self.teleport_timer = (self.teleport_timer - dt).max(0.0);

        if self.shield < self.max_shield {
            self.regen_timer += dt;
            while self.regen_timer >= self.shield_regen_delay + SHIELD_REGEN_INTERVAL
                && self.shield < self.max_shield
            {
                self.shield += 1;
                self.regen_timer -= SHIELD_REGEN_INTERVAL;
            }
        }

        match &mut self.kind {
            EntityKind::Fighter {
                shoot_cooldown,
                shoot_timer,
            } => {
                *shoot_timer -= dt;
                if *shoot_timer <= 0.0 {
                    *shoot_timer = *shoot_cooldown;
                    return Some(EntityAction::Shoot);
                }
            }
            EntityKind::Bomber {
                charge_timer,
                charging,
                ..
            } => {
                if *charging {
                    *charge_timer -= dt;
                    if *charge_timer <= 0.0 {
                        *charging = false;
                        return Some(EntityAction::Detonate);
                    }
                }
            }
            _ => {}
        }
        None
    }

    /// Applies damage, shield first, and restarts the regeneration delay.
    pub fn take_hit(&mut self, damage: i32) {
        self.regen_timer = 0.0;
        let absorbed = damage.min(self.shield);
        self.shield -= absorbed;
        self.hp -= damage - absorbed;
    }

    /// Starts a bomber's detonation charge. No-op for other kinds or while
    /// already charging.
    pub fn start_charge(&mut self) {
        if let EntityKind::Bomber {
            charge_time,
            charge_timer,
            charging,
        } = &mut self.kind
        {
            if !*charging {
                *charge_timer = *charge_time;
                *charging = true;
            }
        }
    }

    /// Whether a suicider at its current position would trigger on `target`.
    pub fn should_trigger(&self, target: Position) -> bool {
        match self.kind {
            EntityKind::Suicider { trigger_radius } => {
                self.position.euclidean_distance(target) <= trigger_radius as f64
            }
            _ => false,
        }
    }

    /// Jumps to `dest` if the teleport cooldown has elapsed.
    pub fn teleport(&mut self, dest: Position) -> bool {
        if self.teleport_timer > 0.0 {
            return false;
        }
        self.position = dest;
        self.teleport_timer = TELEPORT_COOLDOWN;
        true
    }
}
