//! Host stand-ins for the board.
//!
//! [`SimulatedDevice`] holds the state the pairing, battery and keymap
//! subsystems would report on hardware. The remaining types let the core
//! renderer and boot sequencer run on threads: a console light, a sleeping
//! delay and a bounded channel for blink requests.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread;
use std::time::{Duration, Instant};

use embedded_hal_async::delay::DelayNs;
use indicator_core::blink::BlinkRequest;
use indicator_core::light::IndicatorLight;
use indicator_core::queue::{
    BLINK_QUEUE_DEPTH, BlinkDequeueError, BlinkEnqueueError, BlinkQueueConsumer,
    BlinkQueueProducer,
};
use indicator_core::sources::{ActiveLayers, BatteryGauge, ConnectivitySource};

/// Highest layer index the layer mask can hold.
pub const MAX_LAYER: u8 = 31;

/// Connection state of the active host profile.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ProfileLink {
    Connected,
    Open,
    Paired,
}

impl ProfileLink {
    pub const fn label(self) -> &'static str {
        match self {
            ProfileLink::Connected => "connected",
            ProfileLink::Open => "open",
            ProfileLink::Paired => "paired",
        }
    }
}

/// Subsystem state shared between the command loop and the indicator threads.
pub struct SimulatedDevice {
    charge: AtomicU8,
    profile: AtomicU8,
    connected: AtomicBool,
    open: AtomicBool,
    linked: AtomicBool,
    layers: AtomicU32,
}

impl SimulatedDevice {
    /// Starts on profile 0 (open), unlinked, base layer only.
    pub const fn new(charge: u8) -> Self {
        Self {
            charge: AtomicU8::new(charge),
            profile: AtomicU8::new(0),
            connected: AtomicBool::new(false),
            open: AtomicBool::new(true),
            linked: AtomicBool::new(false),
            layers: AtomicU32::new(1),
        }
    }

    pub fn set_charge(&self, percent: u8) {
        self.charge.store(percent.min(100), Ordering::Relaxed);
    }

    pub fn set_profile(&self, index: u8, link: ProfileLink) {
        self.profile.store(index, Ordering::Relaxed);
        self.connected
            .store(link == ProfileLink::Connected, Ordering::Relaxed);
        self.open.store(link == ProfileLink::Open, Ordering::Relaxed);
    }

    pub fn set_central_link(&self, linked: bool) {
        self.linked.store(linked, Ordering::Relaxed);
    }

    /// Returns `false` when `layer` is beyond [`MAX_LAYER`].
    pub fn set_layer(&self, layer: u8, active: bool) -> bool {
        let Some(bit) = 1u32.checked_shl(u32::from(layer)) else {
            return false;
        };
        if active {
            self.layers.fetch_or(bit, Ordering::Relaxed);
        } else {
            self.layers.fetch_and(!bit, Ordering::Relaxed);
        }
        true
    }

    pub fn profile_link(&self) -> ProfileLink {
        if self.is_active_profile_connected() {
            ProfileLink::Connected
        } else if self.is_active_profile_open() {
            ProfileLink::Open
        } else {
            ProfileLink::Paired
        }
    }
}

impl ConnectivitySource for SimulatedDevice {
    fn active_profile_index(&self) -> u8 {
        self.profile.load(Ordering::Relaxed)
    }

    fn is_active_profile_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    fn is_active_profile_open(&self) -> bool {
        self.open.load(Ordering::Relaxed)
    }

    fn is_linked_to_central(&self) -> bool {
        self.linked.load(Ordering::Relaxed)
    }
}

impl BatteryGauge for SimulatedDevice {
    fn state_of_charge(&self) -> u8 {
        self.charge.load(Ordering::Relaxed)
    }
}

impl ActiveLayers for SimulatedDevice {
    fn highest_active_layer(&self) -> u8 {
        match self.layers.load(Ordering::Relaxed).checked_ilog2() {
            Some(index) => u8::try_from(index).unwrap_or(MAX_LAYER),
            None => 0,
        }
    }
}

/// Creates the bounded blink queue shared by producers and the renderer.
pub fn blink_queue() -> (HostProducer, HostConsumer) {
    let (sender, receiver) = mpsc::sync_channel(BLINK_QUEUE_DEPTH);
    (HostProducer { sender }, HostConsumer { receiver })
}

#[derive(Clone)]
pub struct HostProducer {
    sender: SyncSender<BlinkRequest>,
}

impl BlinkQueueProducer for HostProducer {
    fn try_enqueue(&mut self, request: BlinkRequest) -> Result<(), BlinkEnqueueError> {
        self.sender.try_send(request).map_err(|err| match err {
            TrySendError::Full(_) => BlinkEnqueueError::QueueFull,
            TrySendError::Disconnected(_) => BlinkEnqueueError::Disconnected,
        })
    }
}

pub struct HostConsumer {
    receiver: Receiver<BlinkRequest>,
}

impl HostConsumer {
    /// Drains whatever is queued right now without waiting.
    #[cfg(test)]
    pub fn drain(&self) -> Vec<BlinkRequest> {
        self.receiver.try_iter().collect()
    }
}

impl BlinkQueueConsumer for HostConsumer {
    async fn dequeue(&mut self) -> Result<BlinkRequest, BlinkDequeueError> {
        // the renderer owns its thread, so blocking here is fine
        self.receiver
            .recv()
            .map_err(|_| BlinkDequeueError::Disconnected)
    }
}

/// Delay that parks the calling thread.
#[derive(Copy, Clone, Debug, Default)]
pub struct HostDelay;

impl DelayNs for HostDelay {
    async fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    async fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

/// Prints every light transition with the time since start.
pub struct ConsoleLight {
    started_at: Instant,
}

impl ConsoleLight {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }

    fn print(&self, index: u8, state: &str) {
        println!("{} led {index} {state}", Timestamp(self.started_at.elapsed()));
    }
}

impl IndicatorLight for ConsoleLight {
    fn turn_on(&mut self, index: u8) {
        self.print(index, "on");
    }

    fn turn_off(&mut self, index: u8) {
        self.print(index, "off");
    }
}

/// Elapsed time rendered as `[   1.234s]`.
pub struct Timestamp(pub Duration);

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>8.3}s]", self.0.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use indicator_core::blink::BlinkRate;

    #[test]
    fn profile_links_map_to_source_flags() {
        let device = SimulatedDevice::new(100);
        assert_eq!(device.profile_link(), ProfileLink::Open);

        device.set_profile(2, ProfileLink::Connected);
        assert_eq!(device.active_profile_index(), 2);
        assert!(device.is_active_profile_connected());
        assert!(!device.is_active_profile_open());

        device.set_profile(2, ProfileLink::Paired);
        assert_eq!(device.profile_link(), ProfileLink::Paired);
    }

    #[test]
    fn layer_mask_tracks_highest_active_layer() {
        let device = SimulatedDevice::new(100);
        assert_eq!(device.highest_active_layer(), 0);
        assert!(device.set_layer(2, true));
        assert!(device.set_layer(5, true));
        assert_eq!(device.highest_active_layer(), 5);
        assert!(device.set_layer(5, false));
        assert_eq!(device.highest_active_layer(), 2);
        assert!(!device.set_layer(32, true));
    }

    #[test]
    fn charge_saturates_at_one_hundred() {
        let device = SimulatedDevice::new(0);
        device.set_charge(140);
        assert_eq!(device.state_of_charge(), 100);
    }

    #[test]
    fn host_queue_rejects_when_full() {
        let (mut producer, consumer) = blink_queue();
        for _ in 0..BLINK_QUEUE_DEPTH {
            producer
                .try_enqueue(BlinkRequest::new(BlinkRate::Slow, 10))
                .expect("queue has room");
        }
        assert_eq!(
            producer.try_enqueue(BlinkRequest::new(BlinkRate::Fast, 10)),
            Err(BlinkEnqueueError::QueueFull)
        );
        let drained = consumer.drain();
        assert_eq!(drained.len(), BLINK_QUEUE_DEPTH);
        assert!(drained.iter().all(|request| request.rate == BlinkRate::Slow));
    }

    #[test]
    fn dropped_consumer_disconnects_producers() {
        let (mut producer, consumer) = blink_queue();
        drop(consumer);
        assert_eq!(
            producer.try_enqueue(BlinkRequest::new(BlinkRate::Slow, 10)),
            Err(BlinkEnqueueError::Disconnected)
        );
    }

    #[test]
    fn timestamp_pads_seconds() {
        let text = Timestamp(Duration::from_millis(1_234)).to_string();
        assert_eq!(text, "[   1.234s]");
    }
}
