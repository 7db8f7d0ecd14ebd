//! Per-character consumable pools: action points and leveled spell slots.
//! This module exists so spending rules are identical for attacks, abilities and spells.
//! It does not own turn timing; refresh and recovery are triggered by callers.

use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActionPoints {
    current: u32,
    max: u32,
}

impl ActionPoints {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn refresh(&mut self) {
        self.current = self.max;
    }

    pub fn has_enough(&self, amount: u32) -> bool {
        self.current >= amount
    }

    /// Spends `amount` if available. Leaves the pool untouched on failure.
    pub fn consume(&mut self, amount: u32) -> bool {
        if !self.has_enough(amount) {
            return false;
        }
        self.current -= amount;
        true
    }

    /// Empties the pool for the rest of the turn (used by stun effects).
    pub fn drain(&mut self) {
        self.current = 0;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SpellSlots {
    current: BTreeMap<u8, u32>,
    max: BTreeMap<u8, u32>,
}

impl SpellSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a full table from `(level, count)` pairs.
    pub fn with_levels(levels: &[(u8, u32)]) -> Self {
        let max: BTreeMap<u8, u32> = levels.iter().copied().collect();
        Self { current: max.clone(), max }
    }

    pub fn current(&self, level: u8) -> u32 {
        self.current.get(&level).copied().unwrap_or(0)
    }

    pub fn max(&self, level: u8) -> u32 {
        self.max.get(&level).copied().unwrap_or(0)
    }

    pub fn levels(&self) -> impl Iterator<Item = u8> + '_ {
        self.max.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.max.is_empty()
    }

    pub fn has_slot(&self, level: u8) -> bool {
        self.current(level) > 0
    }

    /// Spends one slot of exactly `level`. There is no upcast fallback.
    pub fn consume(&mut self, level: u8) -> bool {
        match self.current.get_mut(&level) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    /// Restores every level up to and including `max_level`.
    pub fn recover(&mut self, max_level: u8) {
        for (level, max) in self.max.range(..=max_level) {
            self.current.insert(*level, *max);
        }
    }
}
