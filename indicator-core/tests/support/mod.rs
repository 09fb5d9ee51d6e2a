#![allow(dead_code)]

use core::cell::{Cell, RefCell};

use embedded_hal_async::delay::DelayNs;
use heapless::{Deque, Vec as HeaplessVec};
use indicator_core::blink::BlinkRequest;
use indicator_core::light::IndicatorLight;
use indicator_core::queue::{
    BLINK_QUEUE_DEPTH, BlinkDequeueError, BlinkEnqueueError, BlinkQueueConsumer,
    BlinkQueueProducer,
};
use indicator_core::sources::{ActiveLayers, BatteryGauge, ConnectivitySource};

/// Something observable that happened to the light or the clock.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Step {
    On(u8),
    Off(u8),
    SleepMs(u32),
    SleepNs(u32),
}

pub type Timeline = RefCell<HeaplessVec<Step, 128>>;

pub fn timeline() -> Timeline {
    RefCell::new(HeaplessVec::new())
}

pub fn steps(timeline: &Timeline) -> HeaplessVec<Step, 128> {
    timeline.borrow().clone()
}

pub fn sleeps(timeline: &Timeline) -> HeaplessVec<u32, 128> {
    timeline
        .borrow()
        .iter()
        .filter_map(|step| match step {
            Step::SleepMs(ms) => Some(*ms),
            _ => None,
        })
        .collect()
}

pub struct RecordingLight<'a> {
    timeline: &'a Timeline,
}

impl<'a> RecordingLight<'a> {
    pub fn new(timeline: &'a Timeline) -> Self {
        Self { timeline }
    }
}

impl IndicatorLight for RecordingLight<'_> {
    fn turn_on(&mut self, index: u8) {
        push(self.timeline, Step::On(index));
    }

    fn turn_off(&mut self, index: u8) {
        push(self.timeline, Step::Off(index));
    }
}

pub struct RecordingDelay<'a> {
    timeline: &'a Timeline,
}

impl<'a> RecordingDelay<'a> {
    pub fn new(timeline: &'a Timeline) -> Self {
        Self { timeline }
    }
}

impl DelayNs for RecordingDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        push(self.timeline, Step::SleepNs(ns));
    }

    async fn delay_ms(&mut self, ms: u32) {
        push(self.timeline, Step::SleepMs(ms));
    }
}

fn push(timeline: &Timeline, step: Step) {
    timeline
        .borrow_mut()
        .push(step)
        .expect("timeline capacity exceeded");
}

/// Bounded FIFO standing in for the blink channel. Dequeueing from an empty
/// queue reports disconnection so renderer loops terminate in tests.
pub struct MockQueue {
    items: Deque<BlinkRequest, BLINK_QUEUE_DEPTH>,
}

impl MockQueue {
    pub fn new() -> Self {
        Self {
            items: Deque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn requests(&self) -> HeaplessVec<BlinkRequest, BLINK_QUEUE_DEPTH> {
        self.items.iter().copied().collect()
    }
}

impl BlinkQueueProducer for MockQueue {
    fn try_enqueue(&mut self, request: BlinkRequest) -> Result<(), BlinkEnqueueError> {
        self.items
            .push_back(request)
            .map_err(|_| BlinkEnqueueError::QueueFull)
    }
}

impl BlinkQueueConsumer for MockQueue {
    async fn dequeue(&mut self) -> Result<BlinkRequest, BlinkDequeueError> {
        self.items
            .pop_front()
            .ok_or(BlinkDequeueError::Disconnected)
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct FakeConnectivity {
    pub profile: u8,
    pub connected: bool,
    pub open: bool,
    pub linked: bool,
}

impl FakeConnectivity {
    pub fn connected(profile: u8) -> Self {
        Self {
            profile,
            connected: true,
            ..Self::default()
        }
    }

    pub fn open(profile: u8) -> Self {
        Self {
            profile,
            open: true,
            ..Self::default()
        }
    }

    pub fn paired(profile: u8) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    pub fn linked(linked: bool) -> Self {
        Self {
            linked,
            ..Self::default()
        }
    }
}

impl ConnectivitySource for FakeConnectivity {
    fn active_profile_index(&self) -> u8 {
        self.profile
    }

    fn is_active_profile_connected(&self) -> bool {
        self.connected
    }

    fn is_active_profile_open(&self) -> bool {
        self.open
    }

    fn is_linked_to_central(&self) -> bool {
        self.linked
    }
}

/// Battery gauge that replays a script of readings, repeating the last one.
pub struct ScriptedBattery {
    readings: &'static [u8],
    reads: Cell<usize>,
}

impl ScriptedBattery {
    pub fn new(readings: &'static [u8]) -> Self {
        Self {
            readings,
            reads: Cell::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl BatteryGauge for ScriptedBattery {
    fn state_of_charge(&self) -> u8 {
        let index = self.reads.get().min(self.readings.len() - 1);
        self.reads.set(self.reads.get() + 1);
        self.readings[index]
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct FakeKeymap {
    pub highest: u8,
}

impl ActiveLayers for FakeKeymap {
    fn highest_active_layer(&self) -> u8 {
        self.highest
    }
}
