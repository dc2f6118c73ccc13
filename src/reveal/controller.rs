//! RevealController - per-unit hover/click state machine
//!
//! ```text
//!            enter              click
//!   Hidden ─────────► Partially ─────────► Fully
//!     ▲  ◄─────────              │          │
//!     │     leave                │          │
//!     └──────────────────────────┴── click ─┘
//! ```
//!
//! Hover effects are suppressed while a unit is fully revealed. Click is a
//! toggle: a second click hides the unit again.

use rand::rngs::ThreadRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::session::UnitId;
use super::unit::{RevealState, RevealUnit};
use crate::error::RevealError;

// =============================================================================
// Pointer interface
// =============================================================================

/// The three pointer interactions a host forwards to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerEvent {
    Enter,
    Leave,
    Activate,
}

impl PointerEvent {
    /// Accepts both engine names and the DOM event names hosts listen for
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "enter" | "mouseenter" | "pointerenter" => Some(PointerEvent::Enter),
            "leave" | "mouseleave" | "pointerleave" => Some(PointerEvent::Leave),
            "activate" | "click" => Some(PointerEvent::Activate),
            _ => None,
        }
    }
}

/// Anything that routes pointer events to units by id
pub trait PointerHandler {
    fn on_pointer(&mut self, id: UnitId, event: PointerEvent) -> Result<RevealState, RevealError>;
}

// =============================================================================
// Partial reveal
// =============================================================================

/// How many letters a hover shows for a word of `n` letters.
///
/// | n     | count                  |
/// |-------|------------------------|
/// | ≤ 4   | 1                      |
/// | 5-6   | 1 or 2                 |
/// | 7-8   | 2 or 3                 |
/// | ≥ 9   | `n/3 ..= n/2` (floored) |
///
/// A fresh draw is made on every call. Never exceeds `n`.
pub fn reveal_count<R: Rng + ?Sized>(n: usize, rng: &mut R) -> usize {
    let count = match n {
        0 => 0,
        1..=4 => 1,
        5..=6 => rng.gen_range(1..=2),
        7..=8 => rng.gen_range(2..=3),
        _ => rng.gen_range(n / 3..=n / 2),
    };
    count.min(n)
}

// =============================================================================
// RevealController
// =============================================================================

pub struct RevealController<R = ThreadRng> {
    rng: R,
}

impl Default for RevealController<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl RevealController<ThreadRng> {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl<R: Rng> RevealController<R> {
    /// Controller drawing from a caller-supplied source (seeded in tests)
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Show a fresh random subset of letters
    pub fn hover_enter(&mut self, unit: &mut RevealUnit) -> RevealState {
        if unit.state() == RevealState::FullyRevealed {
            return RevealState::FullyRevealed;
        }

        unit.clear_marks();
        let count = reveal_count(unit.len(), &mut self.rng);
        for index in rand::seq::index::sample(&mut self.rng, unit.len(), count).iter() {
            unit.mark(index);
        }

        let state = if count > 0 {
            RevealState::PartiallyRevealed
        } else {
            RevealState::Hidden
        };
        unit.set_state(state);
        state
    }

    pub fn hover_leave(&mut self, unit: &mut RevealUnit) -> RevealState {
        if unit.state() == RevealState::FullyRevealed {
            return RevealState::FullyRevealed;
        }
        unit.clear_marks();
        unit.set_state(RevealState::Hidden);
        RevealState::Hidden
    }

    /// Toggle the sticky full reveal
    pub fn activate(&mut self, unit: &mut RevealUnit) -> RevealState {
        unit.clear_marks();
        let state = if unit.state() == RevealState::FullyRevealed {
            RevealState::Hidden
        } else {
            RevealState::FullyRevealed
        };
        unit.set_state(state);
        state
    }

    pub fn dispatch(&mut self, unit: &mut RevealUnit, event: PointerEvent) -> RevealState {
        match event {
            PointerEvent::Enter => self.hover_enter(unit),
            PointerEvent::Leave => self.hover_leave(unit),
            PointerEvent::Activate => self.activate(unit),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RevealStyle;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(seed: u64) -> RevealController<StdRng> {
        RevealController::with_rng(StdRng::seed_from_u64(seed))
    }

    fn unit(token: &str) -> RevealUnit {
        RevealUnit::build(token, RevealStyle::Blur).unwrap()
    }

    #[test]
    fn test_parse_event_names() {
        assert_eq!(PointerEvent::parse("mouseenter"), Some(PointerEvent::Enter));
        assert_eq!(PointerEvent::parse("leave"), Some(PointerEvent::Leave));
        assert_eq!(PointerEvent::parse("click"), Some(PointerEvent::Activate));
        assert_eq!(PointerEvent::parse("dblclick"), None);
    }

    #[test]
    fn test_hover_round_trip() {
        let mut controller = seeded(1);
        let mut unit = unit("obsidian");

        assert_eq!(controller.hover_enter(&mut unit), RevealState::PartiallyRevealed);
        assert!(unit.marked_count() >= 1);

        assert_eq!(controller.hover_leave(&mut unit), RevealState::Hidden);
        assert_eq!(unit.marked_count(), 0);
        assert!(unit.visible_indices().is_empty());
    }

    #[test]
    fn test_hover_enter_redraws_each_time() {
        let mut controller = seeded(7);
        let mut unit = unit("extraordinary");

        for _ in 0..50 {
            controller.hover_enter(&mut unit);
            let marked = unit.marked_count();
            assert!((13 / 3..=13 / 2).contains(&marked), "marked {}", marked);
        }
    }

    #[test]
    fn test_click_toggles() {
        let mut controller = seeded(3);
        let mut unit = unit("test");

        assert_eq!(controller.activate(&mut unit), RevealState::FullyRevealed);
        assert_eq!(unit.visible_indices(), vec![0, 1, 2, 3]);

        assert_eq!(controller.activate(&mut unit), RevealState::Hidden);
        assert!(unit.visible_indices().is_empty());
    }

    #[test]
    fn test_full_reveal_clears_partial_marks() {
        let mut controller = seeded(5);
        let mut unit = unit("wonderful");

        controller.hover_enter(&mut unit);
        assert!(unit.marked_count() > 0);

        controller.activate(&mut unit);
        assert_eq!(unit.marked_count(), 0);
        assert_eq!(unit.state(), RevealState::FullyRevealed);
    }

    #[test]
    fn test_hover_ignored_while_fully_revealed() {
        let mut controller = seeded(9);
        let mut unit = unit("wonderful");
        controller.activate(&mut unit);

        assert_eq!(controller.hover_enter(&mut unit), RevealState::FullyRevealed);
        assert_eq!(unit.marked_count(), 0);
        assert_eq!(controller.hover_leave(&mut unit), RevealState::FullyRevealed);
        assert_eq!(unit.visible_indices().len(), 9);
    }

    #[test]
    fn test_second_click_returns_to_hidden_with_no_marks() {
        let mut controller = seeded(11);
        let mut unit = unit("wonderful");

        controller.dispatch(&mut unit, PointerEvent::Enter);
        controller.dispatch(&mut unit, PointerEvent::Activate);
        assert_eq!(controller.dispatch(&mut unit, PointerEvent::Activate), RevealState::Hidden);
        assert_eq!(unit.marked_count(), 0);
    }

    #[test]
    fn test_reveal_count_small_words() {
        let mut rng = StdRng::seed_from_u64(0);
        for n in 1..=4 {
            assert_eq!(reveal_count(n, &mut rng), 1);
        }
        assert_eq!(reveal_count(0, &mut rng), 0);
    }
}
