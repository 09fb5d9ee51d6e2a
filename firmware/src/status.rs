#![cfg_attr(not(target_os = "none"), allow(dead_code))]

//! Shared status storage for the firmware target.
//!
//! The pairing, battery and keymap subsystems record their state here; the
//! indicator reads it back through [`SharedStatus`], which implements the
//! `indicator-core` source traits without touching shared mutable state
//! directly.

use indicator_core::sources::{ActiveLayers, BatteryGauge, ConnectivitySource};
use portable_atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

const PROFILE_CONNECTED: u8 = 1 << 0;
const PROFILE_OPEN: u8 = 1 << 1;

/// Battery charge in percent (0 == unknown).
static STATE_OF_CHARGE: AtomicU8 = AtomicU8::new(0);
/// Index of the active host profile.
static ACTIVE_PROFILE: AtomicU8 = AtomicU8::new(0);
/// Connected/open flags for the active profile.
static PROFILE_FLAGS: AtomicU8 = AtomicU8::new(PROFILE_OPEN);
/// Whether this peripheral half is linked to its central.
static CENTRAL_LINKED: AtomicBool = AtomicBool::new(false);
/// Bitmask of active keymap layers (bit n == layer n).
static LAYER_MASK: AtomicU32 = AtomicU32::new(1);

/// Stores the latest battery charge.
pub fn record_state_of_charge(percent: u8) {
    STATE_OF_CHARGE.store(percent.min(100), Ordering::Relaxed);
}

/// Records the active host profile and its connection state.
pub fn record_profile(index: u8, connected: bool, open: bool) {
    let mut flags = 0;
    if connected {
        flags |= PROFILE_CONNECTED;
    }
    if open {
        flags |= PROFILE_OPEN;
    }
    ACTIVE_PROFILE.store(index, Ordering::Relaxed);
    PROFILE_FLAGS.store(flags, Ordering::Relaxed);
}

/// Records whether the split link to the central is up.
pub fn record_central_link(linked: bool) {
    CENTRAL_LINKED.store(linked, Ordering::Relaxed);
}

/// Marks a keymap layer active or inactive. Layers above 31 are ignored.
pub fn record_layer(layer: u8, active: bool) {
    let Some(bit) = 1u32.checked_shl(u32::from(layer)) else {
        return;
    };
    if active {
        LAYER_MASK.fetch_or(bit, Ordering::Relaxed);
    } else {
        LAYER_MASK.fetch_and(!bit, Ordering::Relaxed);
    }
}

/// Clears every recorded value back to its power-on state.
#[cfg(test)]
pub fn reset() {
    STATE_OF_CHARGE.store(0, Ordering::Relaxed);
    ACTIVE_PROFILE.store(0, Ordering::Relaxed);
    PROFILE_FLAGS.store(PROFILE_OPEN, Ordering::Relaxed);
    CENTRAL_LINKED.store(false, Ordering::Relaxed);
    LAYER_MASK.store(1, Ordering::Relaxed);
}

fn highest_layer(mask: u32) -> u8 {
    match mask.checked_ilog2() {
        Some(index) => u8::try_from(index).unwrap_or(u8::MAX),
        None => 0,
    }
}

/// Zero-sized view over the shared status atomics.
#[derive(Copy, Clone, Debug, Default)]
pub struct SharedStatus;

impl ConnectivitySource for SharedStatus {
    fn active_profile_index(&self) -> u8 {
        ACTIVE_PROFILE.load(Ordering::Relaxed)
    }

    fn is_active_profile_connected(&self) -> bool {
        PROFILE_FLAGS.load(Ordering::Relaxed) & PROFILE_CONNECTED != 0
    }

    fn is_active_profile_open(&self) -> bool {
        PROFILE_FLAGS.load(Ordering::Relaxed) & PROFILE_OPEN != 0
    }

    fn is_linked_to_central(&self) -> bool {
        CENTRAL_LINKED.load(Ordering::Relaxed)
    }
}

impl BatteryGauge for SharedStatus {
    fn state_of_charge(&self) -> u8 {
        STATE_OF_CHARGE.load(Ordering::Relaxed)
    }
}

impl ActiveLayers for SharedStatus {
    fn highest_active_layer(&self) -> u8 {
        highest_layer(LAYER_MASK.load(Ordering::Relaxed))
    }
}
