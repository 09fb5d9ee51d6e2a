//! Indicator plumbing bridging firmware tasks with `indicator-core`.
//!
//! Owns the concrete channel types behind the blink queue and the event
//! ingress, the adapters that let them satisfy the core queue traits, and the
//! logging around dispatch and boot.

pub mod events;

use embassy_sync::channel::{Channel, Receiver, Sender, TrySendError};
use indicator_core::blink::BlinkRequest;
use indicator_core::boot::BootReport;
use indicator_core::events::{Dispatch, EventListener, IndicatorEvent};
use indicator_core::mappers::{ConnectivityState, EventRouter};
use indicator_core::queue::{
    BLINK_QUEUE_DEPTH, BlinkDequeueError, BlinkEnqueueError, BlinkQueueConsumer,
    BlinkQueueProducer,
};
use indicator_core::readiness::ReadinessFlag;
use indicator_core::sources::{ActiveLayers, ConnectivitySource};

use crate::status::SharedStatus;

#[cfg(not(target_os = "none"))]
pub type IndicatorMutex = embassy_sync::blocking_mutex::raw::NoopRawMutex;
#[cfg(target_os = "none")]
pub type IndicatorMutex = embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

/// Router wired to the shared status atomics.
pub type IndicatorRouter = EventRouter<SharedStatus, SharedStatus>;

/// Queue carrying blink requests to the renderer task.
pub type BlinkChannel = Channel<IndicatorMutex, BlinkRequest, BLINK_QUEUE_DEPTH>;

/// Convenience sender type alias for the blink queue.
pub type BlinkSender<'a> = Sender<'a, IndicatorMutex, BlinkRequest, BLINK_QUEUE_DEPTH>;

/// Convenience receiver type alias for the blink queue.
pub type BlinkReceiver<'a> = Receiver<'a, IndicatorMutex, BlinkRequest, BLINK_QUEUE_DEPTH>;

/// Adapter that exposes the Embassy channel sender as a core producer.
pub struct BlinkProducer<'a> {
    sender: BlinkSender<'a>,
}

impl<'a> BlinkProducer<'a> {
    /// Creates a new adapter that wraps the provided sender.
    pub fn new(sender: BlinkSender<'a>) -> Self {
        Self { sender }
    }
}

impl BlinkQueueProducer for BlinkProducer<'_> {
    fn try_enqueue(&mut self, request: BlinkRequest) -> Result<(), BlinkEnqueueError> {
        match self.sender.try_send(request) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(BlinkEnqueueError::QueueFull),
        }
    }
}

/// Adapter that exposes the Embassy channel receiver as the core consumer.
pub struct BlinkConsumer<'a> {
    receiver: BlinkReceiver<'a>,
}

impl<'a> BlinkConsumer<'a> {
    /// Creates a new adapter that wraps the provided receiver.
    pub fn new(receiver: BlinkReceiver<'a>) -> Self {
        Self { receiver }
    }
}

impl BlinkQueueConsumer for BlinkConsumer<'_> {
    async fn dequeue(&mut self) -> Result<BlinkRequest, BlinkDequeueError> {
        Ok(self.receiver.receive().await)
    }
}

/// Hands `event` to the router and logs what it queued.
pub fn dispatch<S, K, Q>(
    router: &EventRouter<S, K>,
    event: &IndicatorEvent,
    readiness: &ReadinessFlag,
    queue: &mut Q,
) -> Dispatch
where
    S: ConnectivitySource,
    K: ActiveLayers,
    Q: BlinkQueueProducer,
{
    let dispatch = router.on_event(event, readiness.state(), queue);
    log_dispatch(event.label(), dispatch);
    dispatch
}

/// Logs the outcome of the boot sequence.
pub fn report_boot(report: &BootReport) {
    if let Some(battery) = report.battery {
        log_boot_battery(battery.level, battery.retries, battery.dispatch);
    }
    if let Some(connectivity) = report.connectivity {
        log_boot_connectivity(connectivity.state, connectivity.dispatch);
    }
    log_boot_complete();
}

/// Logs one rendered request.
pub fn report_rendered(request: &BlinkRequest) {
    log_rendered(request);
}

fn connectivity_label(state: ConnectivityState) -> (&'static str, u8) {
    match state {
        ConnectivityState::ProfileConnected(index) => ("profile connected", index),
        ConnectivityState::ProfileOpen(index) => ("profile open", index),
        ConnectivityState::ProfileDisconnected(index) => ("profile not connected", index),
        ConnectivityState::LinkedToCentral => ("peripheral linked", 0),
        ConnectivityState::UnlinkedFromCentral => ("peripheral not linked", 0),
    }
}

#[cfg(target_os = "none")]
fn log_dispatch(event: &'static str, dispatch: Dispatch) {
    match dispatch {
        Dispatch::NotReady => defmt::debug!("indicator: {} event before boot, dropped", event),
        Dispatch::Ignored => defmt::debug!("indicator: {} event, nothing to show", event),
        Dispatch::Queued(tally) if tally.dropped > 0 => defmt::warn!(
            "indicator: {} event queued={} dropped={} (queue full)",
            event,
            tally.accepted,
            tally.dropped
        ),
        Dispatch::Queued(tally) => {
            defmt::info!("indicator: {} event queued={}", event, tally.accepted);
        }
    }
}

#[cfg(not(target_os = "none"))]
fn log_dispatch(event: &'static str, dispatch: Dispatch) {
    match dispatch {
        Dispatch::NotReady => println!("indicator: {event} event before boot, dropped"),
        Dispatch::Ignored => println!("indicator: {event} event, nothing to show"),
        Dispatch::Queued(tally) if tally.dropped > 0 => println!(
            "indicator: {} event queued={} dropped={} (queue full)",
            event, tally.accepted, tally.dropped
        ),
        Dispatch::Queued(tally) => println!("indicator: {} event queued={}", event, tally.accepted),
    }
}

#[cfg(target_os = "none")]
fn log_boot_battery(level: u8, retries: u8, dispatch: Dispatch) {
    if level == 0 {
        defmt::info!(
            "boot: battery level undetermined after {} retries, blinking off",
            retries
        );
    } else {
        defmt::info!("boot: battery level {}%", level);
    }
    if dispatch.dropped() > 0 {
        defmt::warn!("boot: battery indication dropped (queue full)");
    }
}

#[cfg(not(target_os = "none"))]
fn log_boot_battery(level: u8, retries: u8, dispatch: Dispatch) {
    if level == 0 {
        println!("boot: battery level undetermined after {retries} retries, blinking off");
    } else {
        println!("boot: battery level {level}%");
    }
    if dispatch.dropped() > 0 {
        println!("boot: battery indication dropped (queue full)");
    }
}

#[cfg(target_os = "none")]
fn log_boot_connectivity(state: ConnectivityState, dispatch: Dispatch) {
    let (label, index) = connectivity_label(state);
    defmt::info!(
        "boot: {} (profile {}), blinking {}",
        label,
        index,
        state.rate().label()
    );
    if dispatch.dropped() > 0 {
        defmt::warn!("boot: connectivity indication dropped (queue full)");
    }
}

#[cfg(not(target_os = "none"))]
fn log_boot_connectivity(state: ConnectivityState, dispatch: Dispatch) {
    let (label, index) = connectivity_label(state);
    println!(
        "boot: {label} (profile {index}), blinking {}",
        state.rate().label()
    );
    if dispatch.dropped() > 0 {
        println!("boot: connectivity indication dropped (queue full)");
    }
}

#[cfg(target_os = "none")]
fn log_boot_complete() {
    defmt::info!("boot: indicator ready");
}

#[cfg(not(target_os = "none"))]
fn log_boot_complete() {
    println!("boot: indicator ready");
}

#[cfg(target_os = "none")]
fn log_rendered(request: &BlinkRequest) {
    defmt::debug!(
        "indicator: rendered rate={} duration={}ms gap={}ms first={}",
        request.rate.label(),
        request.duration_ms,
        request.gap_after_ms,
        request.is_first
    );
}

#[cfg(not(target_os = "none"))]
fn log_rendered(request: &BlinkRequest) {
    println!(
        "indicator: rendered rate={} duration={}ms gap={}ms first={}",
        request.rate.label(),
        request.duration_ms,
        request.gap_after_ms,
        request.is_first
    );
}
