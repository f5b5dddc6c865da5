/// Timed and consumable power-up effects.
///
/// At most one instance per kind is active; activating a kind again replaces
/// the running instance and restarts its timer.

use crate::entities::{Millis, PowerUpKind, Rarity};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerUpEffect {
    pub duration: Millis,
    pub multiplier: f64,
    /// Uses before expiry, for kinds consumed by completing words.
    pub words: Option<u32>,
}

/// Base effect of each kind before rarity scaling.
pub fn base_effect(kind: PowerUpKind) -> PowerUpEffect {
    let (duration, multiplier, words) = match kind {
        PowerUpKind::Speed => (3000.0, 1.5, None),
        PowerUpKind::TimeWarp => (5000.0, 0.5, None),
        PowerUpKind::Shield => (4000.0, 1.0, None),
        PowerUpKind::Multiplier => (6000.0, 2.0, Some(3)),
        PowerUpKind::LaserFocus => (6000.0, 1.0, None),
        PowerUpKind::Freeze => (5000.0, 0.0, None),
    };
    PowerUpEffect { duration, multiplier, words }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub rarity: Rarity,
    pub start_time: Millis,
    pub duration: Millis,
    pub multiplier: f64,
    pub words_left: Option<u32>,
}

impl PowerUp {
    /// Consumables expire on use count alone; the rest on elapsed time.
    pub fn is_expired(&self, now: Millis) -> bool {
        match self.words_left {
            Some(left) => left == 0,
            None => now - self.start_time >= self.duration,
        }
    }

    pub fn remaining(&self, now: Millis) -> Remaining {
        match self.words_left {
            Some(left) => Remaining::Words(left),
            None => Remaining::Millis((self.duration - (now - self.start_time)).max(0.0)),
        }
    }
}

/// What is left of a power-up, in whichever unit it expires by.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Remaining {
    Millis(Millis),
    Words(u32),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PowerUpSystem {
    active: Vec<PowerUp>,
}

impl PowerUpSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activate_power_up(&mut self, kind: PowerUpKind, rarity: Rarity, now: Millis) -> PowerUp {
        let base = base_effect(kind);
        let factor = rarity.factor();
        let multiplier = if base.multiplier != 1.0 {
            base.multiplier * factor
        } else {
            base.multiplier
        };

        let power_up = PowerUp {
            kind,
            rarity,
            start_time: now,
            duration: base.duration * factor,
            multiplier,
            words_left: base.words,
        };

        self.active.retain(|p| p.kind != kind);
        self.active.push(power_up.clone());
        log::info!("Power-up activated: {} ({:?})", kind.name(), rarity);
        power_up
    }

    /// Drop expired instances.
    pub fn update_power_ups(&mut self, now: Millis) {
        self.active.retain(|p| !p.is_expired(now));
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.active.iter().any(|p| p.kind == kind)
    }

    pub fn get_power_up(&self, kind: PowerUpKind) -> Option<&PowerUp> {
        self.active.iter().find(|p| p.kind == kind)
    }

    pub fn get_time_remaining(&self, kind: PowerUpKind, now: Millis) -> Option<Remaining> {
        self.get_power_up(kind).map(|p| p.remaining(now))
    }

    /// Multiplier of an active instance of `kind`, if any.
    pub fn multiplier_of(&self, kind: PowerUpKind) -> Option<f64> {
        self.get_power_up(kind).map(|p| p.multiplier)
    }

    pub fn consume_multiplier_use(&mut self) {
        if let Some(p) = self.active.iter_mut().find(|p| p.kind == PowerUpKind::Multiplier) {
            if let Some(left) = p.words_left.as_mut() {
                *left = left.saturating_sub(1);
            }
        }
    }

    pub fn active(&self) -> &[PowerUp] {
        &self.active
    }

    pub fn reset(&mut self) {
        self.active.clear();
    }
}
