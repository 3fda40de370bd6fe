//! Terminal mode registry.
//!
//! Modes are tracked as a set of integers. ANSI modes are stored under their
//! public number; DEC private modes are shifted left by [`PRIVATE_SHIFT`] so
//! that, for example, private mode 4 (DECSCLM) cannot collide with ANSI
//! mode 4 (IRM). The named constants below are pre-shifted.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Offset applied to DEC private mode numbers.
pub const PRIVATE_SHIFT: u32 = 5;

/// IRM — insert/replace mode (ANSI).
pub const IRM: u32 = 4;
/// LNM — linefeed/new-line mode (ANSI). Reset on a fresh screen.
pub const LNM: u32 = 20;

/// DECCOLM — 132-column mode.
pub const DECCOLM: u32 = 3 << PRIVATE_SHIFT;
/// DECSCNM — screen-wide reverse video.
pub const DECSCNM: u32 = 5 << PRIVATE_SHIFT;
/// DECOM — origin mode; cursor addressing relative to the scroll region.
pub const DECOM: u32 = 6 << PRIVATE_SHIFT;
/// DECAWM — autowrap. Set on a fresh screen.
pub const DECAWM: u32 = 7 << PRIVATE_SHIFT;
/// DECTCEM — text cursor enable. Set on a fresh screen.
pub const DECTCEM: u32 = 25 << PRIVATE_SHIFT;

/// The set of currently asserted modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modes {
    set: BTreeSet<u32>,
}

impl Modes {
    /// Power-on state: autowrap on, cursor visible.
    pub fn new() -> Self {
        let mut set = BTreeSet::new();
        set.insert(DECAWM);
        set.insert(DECTCEM);
        Self { set }
    }

    /// Encode a wire-level mode number into its registry key.
    pub fn encode(mode: u32, private: bool) -> u32 {
        if private {
            mode << PRIVATE_SHIFT
        } else {
            mode
        }
    }

    pub fn contains(&self, mode: u32) -> bool {
        self.set.contains(&mode)
    }

    pub fn insert(&mut self, mode: u32) {
        self.set.insert(mode);
    }

    pub fn remove(&mut self, mode: u32) {
        self.set.remove(&mode);
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.set.iter().copied()
    }
}

impl Default for Modes {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_on_modes() {
        let modes = Modes::new();
        assert!(modes.contains(DECAWM));
        assert!(modes.contains(DECTCEM));
        assert!(!modes.contains(LNM));
        assert!(!modes.contains(DECOM));
    }

    #[test]
    fn private_modes_do_not_collide_with_ansi() {
        let mut modes = Modes::new();
        modes.insert(Modes::encode(4, false)); // IRM
        assert!(modes.contains(IRM));
        assert!(!modes.contains(Modes::encode(4, true)));
    }

    #[test]
    fn encode_shifts_private_numbers() {
        assert_eq!(Modes::encode(7, true), DECAWM);
        assert_eq!(Modes::encode(20, false), LNM);
    }
}
