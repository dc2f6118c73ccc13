//! RevealUnit - the letter-addressable interactive unit built from a token
//!
//! A unit owns one `LetterCell` per grapheme cluster of its token, in token
//! order. Building is deterministic; randomness only enters through the
//! controller.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::config::RevealStyle;
use crate::error::RevealError;

// =============================================================================
// Types
// =============================================================================

/// Reveal state of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum RevealState {
    #[default]
    Hidden,
    PartiallyRevealed,
    FullyRevealed,
}

impl RevealState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevealState::Hidden => "hidden",
            RevealState::PartiallyRevealed => "partiallyRevealed",
            RevealState::FullyRevealed => "fullyRevealed",
        }
    }
}

/// One grapheme of a token plus its hover-driven visibility flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterCell {
    ch: String,
    temporarily_visible: bool,
}

impl LetterCell {
    fn new(ch: &str) -> Self {
        Self {
            ch: ch.to_string(),
            temporarily_visible: false,
        }
    }

    pub fn ch(&self) -> &str {
        &self.ch
    }

    pub fn is_temporarily_visible(&self) -> bool {
        self.temporarily_visible
    }
}

/// Serializable render model handed to hosts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitView {
    pub token: String,
    pub state: RevealState,
    pub style: RevealStyle,
    /// Space-separated CSS classes for the unit element
    pub classes: String,
    pub cells: Vec<CellView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub ch: String,
    pub visible: bool,
    pub classes: String,
}

// =============================================================================
// RevealUnit
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealUnit {
    token: String,
    cells: Vec<LetterCell>,
    state: RevealState,
    style: RevealStyle,
}

impl RevealUnit {
    /// Build a hidden unit from `token`. Tokens from the scanner are never
    /// empty, so an empty token is a caller bug.
    pub fn build(token: &str, style: RevealStyle) -> Result<Self, RevealError> {
        debug_assert!(!token.is_empty(), "reveal unit built from empty token");
        if token.is_empty() {
            return Err(RevealError::MalformedToken);
        }

        let cells = token.graphemes(true).map(LetterCell::new).collect();

        Ok(Self {
            token: token.to_string(),
            cells,
            state: RevealState::Hidden,
            style,
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn cells(&self) -> &[LetterCell] {
        &self.cells
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn style(&self) -> RevealStyle {
        self.style
    }

    /// Number of letter cells (never zero)
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether cell `index` is currently shown. Full reveal shows everything.
    pub fn is_cell_visible(&self, index: usize) -> bool {
        match self.cells.get(index) {
            None => false,
            Some(_) if self.state == RevealState::FullyRevealed => true,
            Some(cell) => cell.temporarily_visible,
        }
    }

    /// Indices of the cells currently shown, ascending
    pub fn visible_indices(&self) -> Vec<usize> {
        (0..self.cells.len())
            .filter(|&i| self.is_cell_visible(i))
            .collect()
    }

    /// Number of cells flagged by the last partial reveal
    pub fn marked_count(&self) -> usize {
        self.cells.iter().filter(|c| c.temporarily_visible).count()
    }

    pub fn css_classes(&self) -> String {
        let mut classes = format!("reveal-unit {}", self.style.css_class());
        match self.state {
            RevealState::Hidden => {}
            RevealState::PartiallyRevealed => classes.push_str(" is-peeking"),
            RevealState::FullyRevealed => classes.push_str(" is-revealed"),
        }
        classes
    }

    pub fn view(&self) -> UnitView {
        let cells = self
            .cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let visible = self.is_cell_visible(i);
                CellView {
                    ch: cell.ch.clone(),
                    visible,
                    classes: if visible {
                        "reveal-letter is-visible".to_string()
                    } else {
                        "reveal-letter".to_string()
                    },
                }
            })
            .collect();

        UnitView {
            token: self.token.clone(),
            state: self.state,
            style: self.style,
            classes: self.css_classes(),
            cells,
        }
    }

    // -------------------------------------------------------------------------
    // State mutation (controller only)
    // -------------------------------------------------------------------------

    pub(crate) fn clear_marks(&mut self) {
        for cell in &mut self.cells {
            cell.temporarily_visible = false;
        }
    }

    pub(crate) fn mark(&mut self, index: usize) {
        if let Some(cell) = self.cells.get_mut(index) {
            cell.temporarily_visible = true;
        }
    }

    pub(crate) fn set_state(&mut self, state: RevealState) {
        self.state = state;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_preserves_letters() {
        let unit = RevealUnit::build("obsidian", RevealStyle::Blur).unwrap();
        let letters: Vec<&str> = unit.cells().iter().map(|c| c.ch()).collect();
        assert_eq!(letters, vec!["o", "b", "s", "i", "d", "i", "a", "n"]);
        assert_eq!(unit.len(), 8);
        assert_eq!(unit.state(), RevealState::Hidden);
        assert_eq!(unit.marked_count(), 0);
        assert!(unit.visible_indices().is_empty());
    }

    #[test]
    fn test_build_keeps_underscores_and_digits() {
        let unit = RevealUnit::build("a_1", RevealStyle::Underline).unwrap();
        let letters: Vec<&str> = unit.cells().iter().map(|c| c.ch()).collect();
        assert_eq!(letters, vec!["a", "_", "1"]);
        assert_eq!(unit.style(), RevealStyle::Underline);
    }

    #[test]
    fn test_build_splits_graphemes() {
        // "e" + combining acute accent is one cell
        let unit = RevealUnit::build("cafe\u{301}", RevealStyle::Blur).unwrap();
        assert_eq!(unit.len(), 4);
        assert_eq!(unit.cells()[3].ch(), "e\u{301}");
    }

    #[test]
    #[should_panic(expected = "empty token")]
    #[cfg(debug_assertions)]
    fn test_empty_token_asserts_in_debug() {
        let _ = RevealUnit::build("", RevealStyle::Blur);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_empty_token_is_malformed_in_release() {
        assert_eq!(RevealUnit::build("", RevealStyle::Blur), Err(RevealError::MalformedToken));
    }

    #[test]
    fn test_full_reveal_shows_every_cell() {
        let mut unit = RevealUnit::build("test", RevealStyle::Blur).unwrap();
        unit.set_state(RevealState::FullyRevealed);
        assert_eq!(unit.visible_indices(), vec![0, 1, 2, 3]);
        assert!(!unit.is_cell_visible(4));
    }

    #[test]
    fn test_view_classes() {
        let mut unit = RevealUnit::build("ab", RevealStyle::Underline).unwrap();
        assert_eq!(unit.view().classes, "reveal-unit reveal-underline");

        unit.mark(1);
        unit.set_state(RevealState::PartiallyRevealed);
        let view = unit.view();
        assert_eq!(view.classes, "reveal-unit reveal-underline is-peeking");
        assert_eq!(view.cells[0].classes, "reveal-letter");
        assert_eq!(view.cells[1].classes, "reveal-letter is-visible");
        assert!(view.cells[1].visible);

        unit.clear_marks();
        unit.set_state(RevealState::FullyRevealed);
        assert_eq!(unit.view().classes, "reveal-unit reveal-underline is-revealed");
    }
}
