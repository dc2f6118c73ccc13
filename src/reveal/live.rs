//! RegionTransformer (live) - decorations for the visible window of an editor
//!
//! Every rebuild starts from nothing: the units the editor's region owned
//! are released, the visible window is rescanned and a fresh decoration
//! set is produced. Units of other regions in the same session survive. A marker the
//! selection touches stays raw (marked text) so it can still be edited;
//! every other marker becomes a unit widget.

use std::ops::Range;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::scanner::MarkerMatch;
use super::session::{RegionId, RevealSession, UnitId};

// =============================================================================
// Viewport
// =============================================================================

/// What the live transformer needs to know about an editing surface
pub trait Viewport {
    /// Full document text; ranges index into it by byte
    fn text(&self) -> &str;

    fn visible_ranges(&self) -> Vec<Range<usize>>;

    /// Selection ranges; an empty range is a caret
    fn selection_ranges(&self) -> Vec<Range<usize>>;
}

/// Plain snapshot of an editor viewport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportSnapshot<'a> {
    pub text: &'a str,
    pub visible: Vec<Range<usize>>,
    pub selection: Vec<Range<usize>>,
}

impl<'a> ViewportSnapshot<'a> {
    /// Whole document visible, caret at `caret`
    pub fn full(text: &'a str, caret: usize) -> Self {
        Self {
            text,
            visible: vec![0..text.len()],
            selection: vec![caret..caret],
        }
    }
}

impl Viewport for ViewportSnapshot<'_> {
    fn text(&self) -> &str {
        self.text
    }

    fn visible_ranges(&self) -> Vec<Range<usize>> {
        self.visible.clone()
    }

    fn selection_ranges(&self) -> Vec<Range<usize>> {
        self.selection.clone()
    }
}

// =============================================================================
// Decorations
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Decoration {
    /// Replace `from..to` with the unit's widget
    Widget { from: usize, to: usize, id: UnitId },
    /// Leave `from..to` as text, styled as raw marker syntax
    Mark { from: usize, to: usize, token: String },
}

impl Decoration {
    pub fn range(&self) -> Range<usize> {
        match self {
            Decoration::Widget { from, to, .. } | Decoration::Mark { from, to, .. } => *from..*to,
        }
    }
}

/// Result of one live rebuild, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveFrame {
    pub decorations: Vec<Decoration>,
}

impl LiveFrame {
    pub fn units(&self) -> Vec<UnitId> {
        self.decorations
            .iter()
            .filter_map(|d| match d {
                Decoration::Widget { id, .. } => Some(*id),
                Decoration::Mark { .. } => None,
            })
            .collect()
    }

    pub fn mark_count(&self) -> usize {
        self.decorations
            .iter()
            .filter(|d| matches!(d, Decoration::Mark { .. }))
            .count()
    }
}

// =============================================================================
// Rebuild
// =============================================================================

/// Rebuild decorations for the visible window. Units `region` got from the
/// previous rebuild are discarded.
pub fn rebuild_window<V, R>(session: &mut RevealSession<R>, region: RegionId, viewport: &V) -> LiveFrame
where
    V: Viewport,
    R: Rng,
{
    session.release_region(region);

    let text = viewport.text();
    let selection = viewport.selection_ranges();
    let mut frame = LiveFrame::default();

    for window in line_windows(text, &viewport.visible_ranges()) {
        let matches: Vec<MarkerMatch> = session.scanner().scan(&text[window.clone()]).collect();

        for m in matches {
            let from = window.start + m.start;
            let to = window.start + m.end;

            if touches_selection(from, to, &selection) {
                frame.decorations.push(Decoration::Mark { from, to, token: m.token });
                continue;
            }

            match session.build_unit_in(region, &m.token) {
                Ok(id) => frame.decorations.push(Decoration::Widget { from, to, id }),
                Err(_e) => {
                    #[cfg(target_arch = "wasm32")]
                    web_sys::console::warn_1(&wasm_bindgen::JsValue::from_str(&format!(
                        "[RegionTransformer] marker at {}..{} left raw: {}",
                        from, to, _e
                    )));
                }
            }
        }
    }

    frame
}

/// Inclusive on both ends: a caret right before or right after the marker
/// still counts as inside it.
fn touches_selection(from: usize, to: usize, selection: &[Range<usize>]) -> bool {
    selection.iter().any(|sel| {
        let (lo, hi) = if sel.start <= sel.end {
            (sel.start, sel.end)
        } else {
            (sel.end, sel.start)
        };
        lo <= to && hi >= from
    })
}

/// Widen visible ranges to whole lines, then merge overlapping ones
fn line_windows(text: &str, visible: &[Range<usize>]) -> Vec<Range<usize>> {
    let mut windows: Vec<Range<usize>> = visible
        .iter()
        .filter(|r| r.start <= r.end)
        .map(|r| {
            let start = floor_char_boundary(text, r.start);
            let end = floor_char_boundary(text, r.end);
            let line_start = text[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
            let line_end = text[end..].find('\n').map(|i| end + i).unwrap_or(text.len());
            line_start..line_end
        })
        .collect();
    windows.sort_by_key(|w| w.start);

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(windows.len());
    for window in windows {
        match merged.last_mut() {
            Some(last) if window.start <= last.end => last.end = last.end.max(window.end),
            _ => merged.push(window),
        }
    }
    merged
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

// =============================================================================
// Tests
// =============================================================================
