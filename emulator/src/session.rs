use std::thread;

use embassy_futures::block_on;
use indicator_core::boot::{BootReport, BootSequencer};
use indicator_core::config::{IndicatorConfig, SplitRole};
use indicator_core::events::{
    BatteryStateChanged, ConnectivityChanged, Dispatch, EventListener, IndicatorEvent,
    LayerStateChanged,
};
use indicator_core::mappers::{ConnectivityState, EventRouter};
use indicator_core::readiness::ReadinessFlag;
use indicator_core::renderer::Renderer;
use indicator_core::sources::{ActiveLayers, BatteryGauge, ConnectivitySource};

use crate::device::{self, ConsoleLight, HostDelay, HostProducer, SimulatedDevice};
use crate::grammar::Command;

/// Charge the simulated gauge reports at power-on.
const INITIAL_CHARGE: u8 = 100;

pub const HELP_TOPICS: &[(&str, &str)] = &[
    (
        "battery",
        "battery <0-100>                     - set the charge and raise a battery event",
    ),
    (
        "profile",
        "profile <n> connected|open|paired   - switch the active host profile",
    ),
    (
        "link",
        "link up|down                        - set the split link to the central",
    ),
    (
        "layer",
        "layer <0-31> on|off                 - activate or release a keymap layer",
    ),
    (
        "status",
        "status                              - display the simulated device state",
    ),
    (
        "help",
        "help [topic]                        - show help for a command",
    ),
];

type EmulatorRouter = EventRouter<&'static SimulatedDevice, &'static SimulatedDevice>;

/// Command loop state: the simulated subsystems and the indicator's ingress.
pub struct Session {
    config: IndicatorConfig,
    device: &'static SimulatedDevice,
    router: &'static EmulatorRouter,
    readiness: &'static ReadinessFlag,
    queue: HostProducer,
}

impl Session {
    /// Builds a session and starts the renderer and boot threads.
    pub fn start(role: SplitRole) -> Self {
        let (queue, mut consumer) = device::blink_queue();
        let session = Self::new(role, queue);

        let config = session.config;
        thread::spawn(move || {
            let mut renderer = Renderer::from_config(ConsoleLight::new(), HostDelay, &config);
            let err = block_on(renderer.run(&mut consumer));
            eprintln!("renderer stopped: {err}");
        });

        let device = session.device;
        let router = session.router;
        let readiness = session.readiness;
        let mut boot_queue = session.queue.clone();
        thread::spawn(move || {
            let sequencer = BootSequencer::new(config, device, router.connectivity());
            let report = block_on(sequencer.run(&mut boot_queue, &mut HostDelay, readiness));
            for line in describe_boot(&report) {
                println!("{line}");
            }
        });

        session
    }

    /// The router and device live for the rest of the process, like the
    /// statics they stand in for on hardware.
    fn new(role: SplitRole, queue: HostProducer) -> Self {
        let config = IndicatorConfig::DEFAULT.with_role(role);
        let device: &'static SimulatedDevice =
            Box::leak(Box::new(SimulatedDevice::new(INITIAL_CHARGE)));
        let router: &'static EmulatorRouter =
            Box::leak(Box::new(EventRouter::new(config, device, device)));
        let readiness: &'static ReadinessFlag = Box::leak(Box::new(ReadinessFlag::new()));

        Self {
            config,
            device,
            router,
            readiness,
            queue,
        }
    }

    pub fn handle_command(&mut self, line: &str) -> Vec<String> {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(err) => return vec![format!("ERR {err}")],
        };

        match command {
            Command::Battery(percent) => {
                self.device.set_charge(percent);
                self.raise(BatteryStateChanged {
                    state_of_charge: percent,
                })
            }
            Command::Profile { index, link } => {
                self.device.set_profile(index, link);
                self.raise(ConnectivityChanged)
            }
            Command::Link(linked) => {
                self.device.set_central_link(linked);
                self.raise(ConnectivityChanged)
            }
            Command::Layer { layer, active } => {
                self.device.set_layer(layer, active);
                self.raise(LayerStateChanged { layer, active })
            }
            Command::Status => self.status(),
            Command::Help(topic) => help(topic),
        }
    }

    fn raise(&mut self, event: impl Into<IndicatorEvent>) -> Vec<String> {
        let event = event.into();
        let dispatch = self
            .router
            .on_event(&event, self.readiness.state(), &mut self.queue);
        vec![describe_dispatch(event.label(), dispatch)]
    }

    fn status(&self) -> Vec<String> {
        let device = self.device;
        let role = match self.config.role {
            SplitRole::Central => "central",
            SplitRole::Peripheral => "peripheral",
        };
        let state = if self.readiness.state().is_ready() {
            "ready"
        } else {
            "booting"
        };
        let connectivity = ConnectivityState::observe(self.config.role, &device);
        vec![
            format!("role: {role} ({state})"),
            format!("battery: {}%", device.state_of_charge()),
            format!(
                "profile: {} {}",
                device.active_profile_index(),
                device.profile_link().label()
            ),
            format!(
                "central link: {}",
                if device.is_linked_to_central() {
                    "up"
                } else {
                    "down"
                }
            ),
            format!("highest layer: {}", device.highest_active_layer()),
            format!("connectivity: {}", describe_connectivity(connectivity)),
        ]
    }
}

fn help(topic: Option<&str>) -> Vec<String> {
    match topic {
        None => {
            let mut lines = vec!["Commands:".to_string()];
            lines.extend(HELP_TOPICS.iter().map(|(_, usage)| format!("  {usage}")));
            lines.push("  exit                                - leave the emulator".to_string());
            lines
        }
        Some(topic) => match HELP_TOPICS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(topic))
        {
            Some((_, usage)) => vec![(*usage).to_string()],
            None => vec![format!("ERR unknown help topic `{topic}`")],
        },
    }
}

fn describe_dispatch(event: &str, dispatch: Dispatch) -> String {
    match dispatch {
        Dispatch::NotReady => format!("{event}: ignored, still booting"),
        Dispatch::Ignored => format!("{event}: nothing to show"),
        Dispatch::Queued(tally) if tally.dropped > 0 => format!(
            "{event}: queued {} blink(s), dropped {} (queue full)",
            tally.accepted, tally.dropped
        ),
        Dispatch::Queued(tally) => format!("{event}: queued {} blink(s)", tally.accepted),
    }
}

fn describe_connectivity(state: ConnectivityState) -> String {
    let detail = match state {
        ConnectivityState::ProfileConnected(index) => format!("profile {index} connected"),
        ConnectivityState::ProfileOpen(index) => format!("profile {index} open"),
        ConnectivityState::ProfileDisconnected(index) => format!("profile {index} not connected"),
        ConnectivityState::LinkedToCentral => "linked to central".to_string(),
        ConnectivityState::UnlinkedFromCentral => "not linked to central".to_string(),
    };
    format!("{detail}, blinks {}", state.rate().label())
}

fn describe_boot(report: &BootReport) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(battery) = report.battery {
        lines.push(format!(
            "boot: battery {}% after {} retries, {}",
            battery.level,
            battery.retries,
            describe_dispatch("startup battery", battery.dispatch)
        ));
    }
    if let Some(connectivity) = report.connectivity {
        lines.push(format!(
            "boot: {}",
            describe_connectivity(connectivity.state)
        ));
    }
    lines.push("boot: indicator ready".to_string());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    use indicator_core::blink::{BlinkRate, BlinkRequest};
    use indicator_core::queue::BLINK_QUEUE_DEPTH;

    use crate::device::HostConsumer;

    fn ready_session(role: SplitRole) -> (Session, HostConsumer) {
        let (queue, consumer) = device::blink_queue();
        let session = Session::new(role, queue);
        session.readiness.mark_ready();
        (session, consumer)
    }

    fn rates(requests: &[BlinkRequest]) -> Vec<BlinkRate> {
        requests.iter().map(|request| request.rate).collect()
    }

    #[test]
    fn events_before_boot_are_reported_and_dropped() {
        let (queue, consumer) = device::blink_queue();
        let mut session = Session::new(SplitRole::Central, queue);

        let lines = session.handle_command("battery 3");
        assert_eq!(lines, vec!["battery: ignored, still booting".to_string()]);
        assert!(consumer.drain().is_empty());
        assert_eq!(session.device.state_of_charge(), 3);
    }

    #[test]
    fn central_commands_queue_matching_blinks() {
        let (mut session, consumer) = ready_session(SplitRole::Central);

        session.handle_command("battery 4");
        session.handle_command("battery 50");
        session.handle_command("profile 1 paired");
        session.handle_command("profile 1 connected");
        session.handle_command("layer 2 on");
        let lines = session.handle_command("layer 2 off");
        assert_eq!(lines, vec!["layer: nothing to show".to_string()]);

        assert_eq!(
            rates(&consumer.drain()),
            vec![
                BlinkRate::Fast,
                BlinkRate::Slow,
                BlinkRate::Off,
                BlinkRate::Frantic,
                BlinkRate::Medium,
            ]
        );
    }

    #[test]
    fn peripheral_reports_link_and_skips_layers() {
        let (mut session, consumer) = ready_session(SplitRole::Peripheral);

        session.handle_command("link up");
        session.handle_command("link down");
        let lines = session.handle_command("layer 3 on");
        assert_eq!(lines, vec!["layer: nothing to show".to_string()]);

        assert_eq!(
            rates(&consumer.drain()),
            vec![BlinkRate::Slow, BlinkRate::Fast]
        );
    }

    #[test]
    fn full_queue_reports_dropped_blinks() {
        let (mut session, consumer) = ready_session(SplitRole::Central);

        for _ in 0..BLINK_QUEUE_DEPTH - 1 {
            session.handle_command("link up");
        }
        let lines = session.handle_command("layer 3 on");
        assert_eq!(
            lines,
            vec!["layer: queued 1 blink(s), dropped 2 (queue full)".to_string()]
        );
        assert_eq!(consumer.drain().len(), BLINK_QUEUE_DEPTH);
    }

    #[test]
    fn status_describes_device_state() {
        let (mut session, _consumer) = ready_session(SplitRole::Central);
        session.handle_command("profile 2 open");
        session.handle_command("layer 5 on");

        let lines = session.handle_command("status");
        assert_eq!(lines[0], "role: central (ready)");
        assert_eq!(lines[1], "battery: 100%");
        assert_eq!(lines[2], "profile: 2 open");
        assert_eq!(lines[4], "highest layer: 5");
        assert_eq!(lines[5], "connectivity: profile 2 open, blinks fast");
    }

    #[test]
    fn help_lists_topics_and_rejects_unknown_ones() {
        let (mut session, _consumer) = ready_session(SplitRole::Central);
        let lines = session.handle_command("help");
        assert_eq!(lines.len(), HELP_TOPICS.len() + 2);
        assert_eq!(
            session.handle_command("help nope"),
            vec!["ERR unknown help topic `nope`".to_string()]
        );
    }
}
