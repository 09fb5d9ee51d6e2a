#![no_std]

// Shared logic for the status indicator.
//
// Everything here stays portable across the MCU firmware and the host
// emulator: no standard library, no executor, no logging. Hardware, timing and
// the surrounding subsystems are reached through the traits in `light`,
// `sources` and `embedded_hal_async::delay::DelayNs`.

pub mod blink;
pub mod boot;
pub mod config;
pub mod events;
pub mod gauge;
pub mod light;
pub mod mappers;
pub mod queue;
pub mod readiness;
pub mod renderer;
pub mod sources;
