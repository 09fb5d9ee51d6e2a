mod support;

use embassy_futures::block_on;
use indicator_core::blink::{BlinkRate, BlinkRequest};
use indicator_core::boot::{BATTERY_READ_RETRIES, BATTERY_RETRY_DELAY_MS, BootSequencer};
use indicator_core::config::{IndicatorConfig, Reporting};
use indicator_core::events::Dispatch;
use indicator_core::mappers::{BatteryBand, ConnectivityMapper, ConnectivityState};
use indicator_core::readiness::{Readiness, ReadinessFlag};

use support::{FakeConnectivity, MockQueue, RecordingDelay, ScriptedBattery, sleeps, timeline};

const CONFIG: IndicatorConfig = IndicatorConfig::DEFAULT;

// initial read plus nine zero retries, then 50 on the tenth retry
const LATE_BATTERY: [u8; 11] = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 50];

#[test]
fn late_battery_reading_is_shown_instead_of_off() {
    let battery = ScriptedBattery::new(&LATE_BATTERY);
    let connectivity = ConnectivityMapper::new(CONFIG, FakeConnectivity::connected(0));
    let sequencer = BootSequencer::new(CONFIG, &battery, &connectivity);
    let readiness = ReadinessFlag::new();
    let timeline = timeline();
    let mut delay = RecordingDelay::new(&timeline);
    let mut queue = MockQueue::new();

    let report = block_on(sequencer.run(&mut queue, &mut delay, &readiness));

    let readout = report.battery.expect("battery reporting is enabled");
    assert_eq!(readout.level, 50);
    assert_eq!(readout.retries, BATTERY_READ_RETRIES);
    assert_eq!(readout.band, BatteryBand::Medium);
    assert_eq!(battery.reads(), LATE_BATTERY.len());

    let requests = queue.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[0],
        BlinkRequest::new(BlinkRate::Fast, CONFIG.timing.battery_blink_ms).first()
    );
    assert_eq!(requests[1].rate, BlinkRate::Off);
    assert!(!requests[1].is_first);
}

#[test]
fn battery_still_unknown_after_retries_shows_off() {
    let battery = ScriptedBattery::new(&[0]);
    let connectivity = ConnectivityMapper::new(CONFIG, FakeConnectivity::paired(1));
    let sequencer = BootSequencer::new(CONFIG, &battery, &connectivity);
    let readiness = ReadinessFlag::new();
    let timeline = timeline();
    let mut delay = RecordingDelay::new(&timeline);
    let mut queue = MockQueue::new();

    let report = block_on(sequencer.run(&mut queue, &mut delay, &readiness));

    let readout = report.battery.expect("battery reporting is enabled");
    assert_eq!(readout.level, 0);
    assert_eq!(readout.band, BatteryBand::Undetermined);
    assert_eq!(battery.reads(), 1 + usize::from(BATTERY_READ_RETRIES));
    assert_eq!(
        queue.requests()[0],
        BlinkRequest::new(BlinkRate::Off, CONFIG.timing.battery_blink_ms).first()
    );
}

#[test]
fn sequence_waits_for_battery_indication_before_connectivity() {
    let battery = ScriptedBattery::new(&[90]);
    let connectivity = ConnectivityMapper::new(CONFIG, FakeConnectivity::open(2));
    let sequencer = BootSequencer::new(CONFIG, &battery, &connectivity);
    let readiness = ReadinessFlag::new();
    let timeline = timeline();
    let mut delay = RecordingDelay::new(&timeline);
    let mut queue = MockQueue::new();

    assert_eq!(readiness.state(), Readiness::Booting);
    let report = block_on(sequencer.run(&mut queue, &mut delay, &readiness));

    let timing = CONFIG.timing;
    assert_eq!(
        sleeps(&timeline).as_slice(),
        &[
            u32::from(timing.boot_delay_ms),
            u32::from(timing.battery_blink_ms) + u32::from(timing.interval_ms),
        ]
    );
    assert_eq!(readiness.state(), Readiness::Ready);

    let requests = queue.requests();
    assert_eq!(requests[0].rate, BlinkRate::Slow);
    assert_eq!(
        requests[1],
        BlinkRequest::new(BlinkRate::Fast, timing.output_blink_ms)
    );

    let shown = report.connectivity.expect("connectivity reporting is enabled");
    assert_eq!(shown.state, ConnectivityState::ProfileOpen(2));
    assert_eq!(shown.dispatch.accepted(), 1);
}

#[test]
fn retries_are_spaced_by_retry_delay() {
    let battery = ScriptedBattery::new(&[0, 0, 42]);
    let connectivity = ConnectivityMapper::new(CONFIG, FakeConnectivity::connected(0));
    let sequencer = BootSequencer::new(CONFIG, &battery, &connectivity);
    let timeline = timeline();
    let mut delay = RecordingDelay::new(&timeline);

    let (level, retries) = block_on(sequencer.read_battery(&mut delay));

    assert_eq!((level, retries), (42, 2));
    assert_eq!(
        sleeps(&timeline).as_slice(),
        &[BATTERY_RETRY_DELAY_MS, BATTERY_RETRY_DELAY_MS]
    );
}

#[test]
fn low_battery_band_is_queued_without_a_visible_pattern() {
    let battery = ScriptedBattery::new(&[10]);
    let connectivity = ConnectivityMapper::new(CONFIG, FakeConnectivity::connected(0));
    let sequencer = BootSequencer::new(CONFIG, &battery, &connectivity);
    let readiness = ReadinessFlag::new();
    let timeline = timeline();
    let mut delay = RecordingDelay::new(&timeline);
    let mut queue = MockQueue::new();

    let report = block_on(sequencer.run(&mut queue, &mut delay, &readiness));

    let readout = report.battery.expect("battery reporting is enabled");
    assert_eq!(readout.band, BatteryBand::Low);
    assert_eq!(queue.requests()[0].rate, BlinkRate::Off);
    assert!(queue.requests()[0].is_first);
}

#[test]
fn disabled_battery_reporting_skips_readout_and_settle_delay() {
    let config = CONFIG.with_reporting(Reporting {
        connectivity: true,
        battery: false,
        layer: true,
    });
    let battery = ScriptedBattery::new(&[75]);
    let connectivity = ConnectivityMapper::new(config, FakeConnectivity::connected(0));
    let sequencer = BootSequencer::new(config, &battery, &connectivity);
    let readiness = ReadinessFlag::new();
    let timeline = timeline();
    let mut delay = RecordingDelay::new(&timeline);
    let mut queue = MockQueue::new();

    let report = block_on(sequencer.run(&mut queue, &mut delay, &readiness));

    assert_eq!(report.battery, None);
    assert_eq!(battery.reads(), 0);
    assert_eq!(
        sleeps(&timeline).as_slice(),
        &[u32::from(config.timing.boot_delay_ms)]
    );
    assert_eq!(queue.requests().len(), 1);
    assert_eq!(readiness.state(), Readiness::Ready);
}

#[test]
fn readiness_is_set_even_when_queue_is_full() {
    use indicator_core::queue::{BLINK_QUEUE_DEPTH, BlinkQueueProducer};

    let battery = ScriptedBattery::new(&[60]);
    let connectivity = ConnectivityMapper::new(CONFIG, FakeConnectivity::connected(0));
    let sequencer = BootSequencer::new(CONFIG, &battery, &connectivity);
    let readiness = ReadinessFlag::new();
    let timeline = timeline();
    let mut delay = RecordingDelay::new(&timeline);
    let mut queue = MockQueue::new();
    for _ in 0..BLINK_QUEUE_DEPTH {
        queue
            .try_enqueue(BlinkRequest::new(BlinkRate::Slow, 1))
            .expect("queue has room");
    }

    let report = block_on(sequencer.run(&mut queue, &mut delay, &readiness));

    assert_eq!(report.battery.map(|readout| readout.dispatch.dropped()), Some(1));
    assert!(matches!(
        report.connectivity.map(|shown| shown.dispatch),
        Some(Dispatch::Queued(tally)) if tally.dropped == 1
    ));
    assert_eq!(readiness.state(), Readiness::Ready);
}
