//! RegionTransformer (one-shot) - substitutes markers in static content
//!
//! Works over any tree exposing its text leaves through `ContentTree`.
//! Each leaf holding markers is replaced by a fragment sequence: the text
//! between markers kept verbatim, each marker swapped for a reveal unit.
//! Leaves already inside a unit rendering are skipped, so running the pass
//! twice creates nothing new. Units are filed under the caller's region;
//! release that region before rendering fresh content into it.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::session::{RegionId, RevealSession, UnitId};
use crate::error::RevealError;

// =============================================================================
// Types
// =============================================================================

/// Replacement piece for a text leaf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Fragment {
    Text { text: String },
    Unit { id: UnitId },
}

/// Abstract content tree the transformer walks
pub trait ContentTree {
    type Leaf: Copy;

    /// Text-bearing leaves in document order
    fn text_leaves(&self) -> Vec<Self::Leaf>;

    fn leaf_text(&self, leaf: Self::Leaf) -> Option<&str>;

    /// True if the leaf sits inside an existing reveal unit rendering
    fn is_within_unit(&self, leaf: Self::Leaf) -> bool;

    fn replace_leaf(&mut self, leaf: Self::Leaf, fragments: Vec<Fragment>);
}

/// Counters from a single pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformReport {
    pub leaves_scanned: usize,
    pub leaves_skipped: usize,
    pub leaves_replaced: usize,
    pub units_created: usize,
}

// =============================================================================
// Segmentation
// =============================================================================

/// Split `text` into fragments, building one unit per marker in `region`.
/// Returns `None` when the text has no markers.
pub fn segment_text<R: Rng>(
    session: &mut RevealSession<R>,
    region: RegionId,
    text: &str,
) -> Result<Option<Vec<Fragment>>, RevealError> {
    let matches: Vec<_> = session.scanner().scan(text).collect();
    if matches.is_empty() {
        return Ok(None);
    }

    let mut fragments = Vec::with_capacity(matches.len() * 2 + 1);
    let mut cursor = 0;
    for m in matches {
        if m.start > cursor {
            fragments.push(Fragment::Text {
                text: text[cursor..m.start].to_string(),
            });
        }
        let id = session.build_unit_in(region, &m.token)?;
        fragments.push(Fragment::Unit { id });
        cursor = m.end;
    }
    if cursor < text.len() {
        fragments.push(Fragment::Text {
            text: text[cursor..].to_string(),
        });
    }

    Ok(Some(fragments))
}

// =============================================================================
// One-shot pass
// =============================================================================

/// Replace every marker in `tree` with a reveal unit owned by `region`
pub fn materialize<T, R>(tree: &mut T, session: &mut RevealSession<R>, region: RegionId) -> TransformReport
where
    T: ContentTree,
    R: Rng,
{
    let mut report = TransformReport::default();

    for leaf in tree.text_leaves() {
        if tree.is_within_unit(leaf) {
            report.leaves_skipped += 1;
            continue;
        }
        let Some(text) = tree.leaf_text(leaf) else {
            continue;
        };
        report.leaves_scanned += 1;

        if !session.scanner().has_match(text) {
            continue;
        }
        let text = text.to_string();

        let before = session.len();
        match segment_text(session, region, &text) {
            Ok(Some(fragments)) => {
                report.units_created += session.len() - before;
                report.leaves_replaced += 1;
                tree.replace_leaf(leaf, fragments);
            }
            Ok(None) => {}
            Err(_e) => {
                // Leave the original text in place
                #[cfg(target_arch = "wasm32")]
                web_sys::console::warn_1(&wasm_bindgen::JsValue::from_str(&format!(
                    "[RegionTransformer] leaf left untransformed: {}",
                    _e
                )));
            }
        }
    }

    report
}

// =============================================================================
// Tests
// =============================================================================
