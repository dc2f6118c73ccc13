//! RevealSession - the units built for one content surface
//!
//! Binds a configuration snapshot, a compiled scanner and a controller to
//! the units created from them. Units belong to a region, so one region can
//! be re-rendered or unmounted without touching the others. A unit id is
//! never handed out twice by the same session: once its unit is released
//! the id stays unknown.

use std::collections::BTreeMap;

use rand::rngs::ThreadRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::controller::{PointerEvent, PointerHandler, RevealController};
use super::scanner::MarkerScanner;
use super::unit::{RevealState, RevealUnit, UnitView};
use crate::config::RevealConfig;
use crate::error::RevealError;

/// Handle to a unit inside a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Handle to a group of units released together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(pub u32);

impl RegionId {
    /// Region that `build_unit` files units under
    pub const SHARED: RegionId = RegionId(0);
}

#[derive(Debug)]
struct Slot {
    region: RegionId,
    unit: RevealUnit,
}

pub struct RevealSession<R = ThreadRng> {
    config: RevealConfig,
    scanner: MarkerScanner,
    controller: RevealController<R>,
    units: BTreeMap<UnitId, Slot>,
    next_unit: u64,
    next_region: u64,
}

/// Take the next id from `counter`, failing once it no longer fits in a u32
fn allocate(counter: &mut u64) -> Result<u32, RevealError> {
    let id = u32::try_from(*counter).map_err(|_| RevealError::IdsExhausted)?;
    *counter += 1;
    Ok(id)
}

impl RevealSession<ThreadRng> {
    pub fn new(config: RevealConfig) -> Result<Self, RevealError> {
        Self::with_controller(config, RevealController::new())
    }
}

impl<R: Rng> RevealSession<R> {
    pub fn with_rng(config: RevealConfig, rng: R) -> Result<Self, RevealError> {
        Self::with_controller(config, RevealController::with_rng(rng))
    }

    fn with_controller(config: RevealConfig, controller: RevealController<R>) -> Result<Self, RevealError> {
        config.validate()?;
        let scanner = MarkerScanner::new(&config.prefix, config.word_syntax)?;
        Ok(Self {
            config,
            scanner,
            controller,
            units: BTreeMap::new(),
            next_unit: 0,
            // 0 is RegionId::SHARED
            next_region: 1,
        })
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    pub fn scanner(&self) -> &MarkerScanner {
        &self.scanner
    }

    /// Swap in a new snapshot. Existing units keep the style they were
    /// built with; only later builds and scans see the change.
    pub fn set_config(&mut self, config: RevealConfig) -> Result<(), RevealError> {
        config.validate()?;
        self.scanner = MarkerScanner::new(&config.prefix, config.word_syntax)?;
        self.config = config;
        Ok(())
    }

    /// Hand out a region handle no other caller of this session holds
    pub fn open_region(&mut self) -> Result<RegionId, RevealError> {
        allocate(&mut self.next_region).map(RegionId)
    }

    /// Build a hidden unit with the current style in the shared region
    pub fn build_unit(&mut self, token: &str) -> Result<UnitId, RevealError> {
        self.build_unit_in(RegionId::SHARED, token)
    }

    /// Build a hidden unit with the current style, owned by `region`
    pub fn build_unit_in(&mut self, region: RegionId, token: &str) -> Result<UnitId, RevealError> {
        let unit = RevealUnit::build(token, self.config.reveal_style)?;
        let id = UnitId(allocate(&mut self.next_unit)?);
        self.units.insert(id, Slot { region, unit });
        Ok(id)
    }

    pub fn unit(&self, id: UnitId) -> Option<&RevealUnit> {
        self.units.get(&id).map(|slot| &slot.unit)
    }

    pub fn region_of(&self, id: UnitId) -> Option<RegionId> {
        self.units.get(&id).map(|slot| slot.region)
    }

    /// Live units in id order
    pub fn units(&self) -> impl Iterator<Item = (UnitId, &RevealUnit)> {
        self.units.iter().map(|(id, slot)| (*id, &slot.unit))
    }

    pub fn view(&self, id: UnitId) -> Result<UnitView, RevealError> {
        self.unit(id)
            .map(RevealUnit::view)
            .ok_or(RevealError::UnknownUnit(id))
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn region_len(&self, region: RegionId) -> usize {
        self.units.values().filter(|slot| slot.region == region).count()
    }

    /// Drop the units owned by `region` (re-rendered or unmounted).
    /// Returns how many were dropped.
    pub fn release_region(&mut self, region: RegionId) -> usize {
        let before = self.units.len();
        self.units.retain(|_, slot| slot.region != region);
        before - self.units.len()
    }

    /// Discard every unit in every region; outstanding ids become unknown
    pub fn reset(&mut self) {
        self.units.clear();
    }
}

impl<R: Rng> PointerHandler for RevealSession<R> {
    fn on_pointer(&mut self, id: UnitId, event: PointerEvent) -> Result<RevealState, RevealError> {
        let slot = self.units.get_mut(&id).ok_or(RevealError::UnknownUnit(id))?;
        Ok(self.controller.dispatch(&mut slot.unit, event))
    }
}
