//! Connectivity indications.

use crate::blink::{BlinkRate, BlinkRequest};
use crate::config::{IndicatorConfig, SplitRole};
use crate::events::{ConnectivityChanged, Dispatch, EventListener};
use crate::queue::{BlinkQueueProducer, EnqueueTally};
use crate::readiness::Readiness;
use crate::sources::ConnectivitySource;

/// Observed connectivity, already resolved for the configured role.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConnectivityState {
    ProfileConnected(u8),
    ProfileOpen(u8),
    ProfileDisconnected(u8),
    LinkedToCentral,
    UnlinkedFromCentral,
}

impl ConnectivityState {
    /// Queries `source` the way `role` requires.
    #[must_use]
    pub fn observe<S: ConnectivitySource>(role: SplitRole, source: &S) -> Self {
        match role {
            SplitRole::Central => {
                let profile = source.active_profile_index();
                if source.is_active_profile_connected() {
                    ConnectivityState::ProfileConnected(profile)
                } else if source.is_active_profile_open() {
                    ConnectivityState::ProfileOpen(profile)
                } else {
                    ConnectivityState::ProfileDisconnected(profile)
                }
            }
            SplitRole::Peripheral => {
                if source.is_linked_to_central() {
                    ConnectivityState::LinkedToCentral
                } else {
                    ConnectivityState::UnlinkedFromCentral
                }
            }
        }
    }

    #[must_use]
    pub const fn rate(self) -> BlinkRate {
        match self {
            ConnectivityState::ProfileConnected(_) => BlinkRate::Off,
            ConnectivityState::ProfileOpen(_) | ConnectivityState::UnlinkedFromCentral => {
                BlinkRate::Fast
            }
            ConnectivityState::ProfileDisconnected(_) | ConnectivityState::LinkedToCentral => {
                BlinkRate::Slow
            }
        }
    }
}

/// Connectivity that was observed and what was queued for it.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ConnectivityIndication {
    pub state: ConnectivityState,
    pub dispatch: Dispatch,
}

/// Maps connectivity changes to a single indication.
#[derive(Clone, Debug)]
pub struct ConnectivityMapper<S> {
    config: IndicatorConfig,
    source: S,
}

impl<S: ConnectivitySource> ConnectivityMapper<S> {
    #[must_use]
    pub const fn new(config: IndicatorConfig, source: S) -> Self {
        Self { config, source }
    }

    /// Current connectivity as seen by this mapper.
    #[must_use]
    pub fn state(&self) -> ConnectivityState {
        ConnectivityState::observe(self.config.role, &self.source)
    }

    /// The indication for `state`.
    #[must_use]
    pub const fn request_for(&self, state: ConnectivityState) -> BlinkRequest {
        BlinkRequest::new(state.rate(), self.config.timing.output_blink_ms)
    }

    /// The indication for the current connectivity, ignoring readiness.
    #[must_use]
    pub fn request(&self) -> BlinkRequest {
        self.request_for(self.state())
    }

    /// Enqueues the current indication regardless of readiness.
    ///
    /// Used by the boot sequencer before readiness is set.
    pub fn indicate<Q: BlinkQueueProducer>(&self, queue: &mut Q) -> ConnectivityIndication {
        let state = self.state();
        let mut tally = EnqueueTally::default();
        tally.record(queue.try_enqueue(self.request_for(state)));
        ConnectivityIndication {
            state,
            dispatch: Dispatch::Queued(tally),
        }
    }
}

impl<S: ConnectivitySource> EventListener<ConnectivityChanged> for ConnectivityMapper<S> {
    fn on_event<Q: BlinkQueueProducer>(
        &self,
        _: &ConnectivityChanged,
        readiness: Readiness,
        queue: &mut Q,
    ) -> Dispatch {
        if !readiness.is_ready() {
            return Dispatch::NotReady;
        }
        self.indicate(queue).dispatch
    }
}
