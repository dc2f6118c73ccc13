//! JS bindings for the reveal engine
//!
//! ```javascript,ignore
//! import init, { RevealEngine } from 'revealcore';
//!
//! await init();
//! const engine = new RevealEngine({ prefix: 're:', revealStyle: 'blur' });
//!
//! // Reading view: one region per rendered block, released on re-render
//! const region = engine.openRegion();
//! const segments = engine.segment(textNode.data, region);
//! engine.releaseRegion(region);
//!
//! // Wire pointer events
//! el.addEventListener('mouseenter', () => render(engine.pointer(id, 'enter')));
//!
//! // Editing view: decorations for the visible window
//! const frame = engine.liveFrame(doc, [[from, to]], [[anchor, head]]);
//! ```

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::RevealConfig;
use crate::reveal::{
    rebuild_window, reveal_count, scan, segment_text, Fragment, PointerEvent, PointerHandler,
    RegionId, RevealSession, UnitId, ViewportSnapshot,
};

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| {
        web_sys::console::error_1(&format!("[RevealEngine] Serialization failed: {:?}", e).into());
        JsValue::from_str(&format!("Serialization error: {}", e))
    })
}

fn parse_ranges(value: JsValue) -> Result<Vec<std::ops::Range<usize>>, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(Vec::new());
    }
    let pairs: Vec<(usize, usize)> = serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid ranges: {}", e)))?;
    Ok(pairs.into_iter().map(|(from, to)| from..to).collect())
}

fn parse_config(value: JsValue) -> Result<RevealConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(RevealConfig::default());
    }
    let config: RevealConfig = serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse config: {}", e)))?;
    config
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(config)
}

// =============================================================================
// RevealEngine
// =============================================================================

#[wasm_bindgen]
pub struct RevealEngine {
    session: RevealSession,
    live_region: RegionId,
}

#[wasm_bindgen]
impl RevealEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<RevealEngine, JsValue> {
        let config = parse_config(config)?;
        let mut session = RevealSession::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let live_region = session
            .open_region()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { session, live_region })
    }

    /// Replace the settings snapshot; existing units keep their style
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, config: JsValue) -> Result<(), JsValue> {
        let config = parse_config(config)?;
        self.session
            .set_config(config)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Marker matches in `text` with the current prefix
    #[wasm_bindgen]
    pub fn scan(&self, text: &str) -> Result<JsValue, JsValue> {
        let matches: Vec<_> = self.session.scanner().scan(text).collect();
        to_js(&matches)
    }

    /// New region handle for a block of rendered content
    #[wasm_bindgen(js_name = openRegion)]
    pub fn open_region(&mut self) -> Result<u32, JsValue> {
        self.session
            .open_region()
            .map(|region| region.0)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Drop the units of one region (re-rendered or unmounted); returns
    /// how many were dropped
    #[wasm_bindgen(js_name = releaseRegion)]
    pub fn release_region(&mut self, region: u32) -> usize {
        self.session.release_region(RegionId(region))
    }

    /// One-shot transform of a single text leaf into `region` (the shared
    /// region when omitted). Returns `null` when the text has no markers,
    /// otherwise `[{kind:"text",text}|{kind:"unit",id}]`.
    #[wasm_bindgen]
    pub fn segment(&mut self, text: &str, region: Option<u32>) -> Result<JsValue, JsValue> {
        let region = region.map(RegionId).unwrap_or(RegionId::SHARED);
        let fragments: Option<Vec<Fragment>> = segment_text(&mut self.session, region, text)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        match fragments {
            Some(fragments) => to_js(&fragments),
            None => Ok(JsValue::NULL),
        }
    }

    /// Route a pointer event ("enter" | "leave" | "click" ...) and return
    /// the unit's new view
    #[wasm_bindgen]
    pub fn pointer(&mut self, id: u32, event: &str) -> Result<JsValue, JsValue> {
        let event = PointerEvent::parse(event)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown pointer event: {}", event)))?;
        let id = UnitId(id);
        self.session
            .on_pointer(id, event)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.view(id.0)
    }

    #[wasm_bindgen]
    pub fn view(&self, id: u32) -> Result<JsValue, JsValue> {
        let view = self
            .session
            .view(UnitId(id))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        to_js(&view)
    }

    /// Rebuild decorations for an editor viewport. Ranges are `[from, to]`
    /// byte-offset pairs. Only the previous frame's units are dropped.
    #[wasm_bindgen(js_name = liveFrame)]
    pub fn live_frame(&mut self, text: &str, visible: JsValue, selection: JsValue) -> Result<JsValue, JsValue> {
        let viewport = ViewportSnapshot {
            text,
            visible: parse_ranges(visible)?,
            selection: parse_ranges(selection)?,
        };
        let frame = rebuild_window(&mut self.session, self.live_region, &viewport);
        to_js(&frame)
    }

    /// Drop every unit of every region
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.session.reset();
    }

    #[wasm_bindgen(js_name = unitCount)]
    pub fn unit_count(&self) -> usize {
        self.session.len()
    }
}

// =============================================================================
// Free functions
// =============================================================================

#[wasm_bindgen(js_name = scanMarkers)]
pub fn scan_markers(text: &str, prefix: &str) -> Result<JsValue, JsValue> {
    let matches = scan(text, prefix).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&matches)
}

/// Draw a partial-reveal letter count for a word of `n` letters
#[wasm_bindgen(js_name = revealCount)]
pub fn js_reveal_count(n: usize) -> usize {
    reveal_count(n, &mut rand::thread_rng())
}
