//! RevealCore: Marker Scanner + Progressive-Disclosure Reveal Units
//!
//! A Rust/WASM implementation of the KittClouds "reveal" annotation engine.
//! Text written as `<prefix><word>` (default `re:word`) is turned into an
//! interactive unit whose letters stay hidden until hovered (a few random
//! letters peek through) or clicked (the whole word shows, click again to
//! hide).
//!
//! # Architecture
//!
//! ## Reveal Components
//! - `scanner.rs` - MarkerScanner: `<prefix><word>` detection via Regex
//! - `unit.rs` - RevealUnit: letter cells + reveal state, built from a token
//! - `controller.rs` - RevealController: hover/click state machine, partial reveal sampling
//! - `session.rs` - RevealSession: units grouped by region, pointer routing by id
//! - `transform.rs` - One-shot RegionTransformer over any `ContentTree`
//! - `tree.rs` - DocumentTree: arena content tree + HTML rendering
//! - `live.rs` - Live RegionTransformer: viewport decorations for editors
//!
//! ## Ambient
//! - `config.rs` - RevealConfig snapshot (prefix, style, word syntax)
//! - `error.rs` - RevealError
//! - `wasm.rs` - RevealEngine JS bindings
//!
//! # Usage (Rust)
//! ```rust
//! use revealcore::{materialize, DocumentTree, RevealConfig, RevealSession};
//!
//! let mut session = RevealSession::new(RevealConfig::default()).unwrap();
//! let region = session.open_region().unwrap();
//! let mut tree = DocumentTree::default();
//! tree.append_text(tree.root(), "Please re:obsidian now");
//!
//! let report = materialize(&mut tree, &mut session, region);
//! assert_eq!(report.units_created, 1);
//!
//! // Re-render: drop the region's units, then transform the fresh content
//! session.release_region(region);
//! assert!(session.is_empty());
//! ```

pub mod config;
pub mod error;
pub mod reveal;
pub mod wasm;

// Public exports
pub use config::*;
pub use error::*;
pub use reveal::*;
pub use wasm::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("revealcore v{}", env!("CARGO_PKG_VERSION"))
}
