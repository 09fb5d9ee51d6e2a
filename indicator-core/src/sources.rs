//! Queries the indicator makes against the surrounding subsystems.

/// Wireless pairing state.
///
/// Central (or standalone) boards answer the profile queries; split
/// peripherals answer [`ConnectivitySource::is_linked_to_central`].
pub trait ConnectivitySource {
    /// Index of the active host profile.
    fn active_profile_index(&self) -> u8;

    /// Whether the active profile currently has a connected host.
    fn is_active_profile_connected(&self) -> bool;

    /// Whether the active profile slot is open (not paired to any host).
    fn is_active_profile_open(&self) -> bool;

    /// Whether this peripheral half is linked to its central.
    fn is_linked_to_central(&self) -> bool;
}

/// Battery charge readout.
pub trait BatteryGauge {
    /// Charge in percent, `0` while the level is not yet known.
    fn state_of_charge(&self) -> u8;
}

/// Keymap layer state.
pub trait ActiveLayers {
    /// Index of the highest active layer, `0` for the base layer.
    fn highest_active_layer(&self) -> u8;
}

impl<T: ConnectivitySource + ?Sized> ConnectivitySource for &T {
    fn active_profile_index(&self) -> u8 {
        (**self).active_profile_index()
    }

    fn is_active_profile_connected(&self) -> bool {
        (**self).is_active_profile_connected()
    }

    fn is_active_profile_open(&self) -> bool {
        (**self).is_active_profile_open()
    }

    fn is_linked_to_central(&self) -> bool {
        (**self).is_linked_to_central()
    }
}

impl<T: BatteryGauge + ?Sized> BatteryGauge for &T {
    fn state_of_charge(&self) -> u8 {
        (**self).state_of_charge()
    }
}

impl<T: ActiveLayers + ?Sized> ActiveLayers for &T {
    fn highest_active_layer(&self) -> u8 {
        (**self).highest_active_layer()
    }
}
