//! Queue abstractions between event producers and the renderer.
//!
//! Producers (mappers, the boot sequencer) push [`BlinkRequest`]s without ever
//! blocking; the renderer is the single consumer and waits for work. Firmware
//! backs these traits with an `embassy-sync` channel, the emulator with a std
//! `sync_channel`.

use core::{fmt, future::Future};

use crate::blink::BlinkRequest;

/// Number of requests the blink queue holds before it starts dropping.
pub const BLINK_QUEUE_DEPTH: usize = 16;

/// Error surfaced when a request cannot be enqueued.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BlinkEnqueueError {
    /// Queue has reached its maximum capacity; the request was discarded.
    QueueFull,
    /// Queue has been disconnected from its consumer.
    Disconnected,
}

impl fmt::Display for BlinkEnqueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlinkEnqueueError::QueueFull => f.write_str("blink queue full"),
            BlinkEnqueueError::Disconnected => f.write_str("blink queue disconnected"),
        }
    }
}

/// Error surfaced when the consumer side can no longer receive.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BlinkDequeueError {
    /// Every producer has been dropped.
    Disconnected,
}

impl fmt::Display for BlinkDequeueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlinkDequeueError::Disconnected => f.write_str("blink queue disconnected"),
        }
    }
}

/// Trait implemented by producers that push requests into the blink queue.
pub trait BlinkQueueProducer {
    /// Attempts to enqueue a request without blocking.
    ///
    /// # Errors
    ///
    /// [`BlinkEnqueueError::QueueFull`] when the queue has no free slot; the
    /// caller must not block or retry.
    fn try_enqueue(&mut self, request: BlinkRequest) -> Result<(), BlinkEnqueueError>;
}

/// Trait implemented by the single consumer that drains the blink queue.
pub trait BlinkQueueConsumer {
    /// Waits until a request is available.
    ///
    /// Resolves to an error only when the transport reports that every
    /// producer is gone; embassy channels never do.
    fn dequeue(&mut self) -> impl Future<Output = Result<BlinkRequest, BlinkDequeueError>>;
}

/// Tally of a batch of enqueue attempts.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct EnqueueTally {
    pub accepted: u8,
    pub dropped: u8,
}

impl EnqueueTally {
    /// Records the outcome of one enqueue attempt.
    pub fn record(&mut self, result: Result<(), BlinkEnqueueError>) {
        match result {
            Ok(()) => self.accepted = self.accepted.saturating_add(1),
            Err(_) => self.dropped = self.dropped.saturating_add(1),
        }
    }

    /// Total attempts recorded.
    #[must_use]
    pub const fn attempted(&self) -> u8 {
        self.accepted.saturating_add(self.dropped)
    }
}

/// Pushes every request, dropping the ones that do not fit.
pub fn enqueue_all<Q, I>(queue: &mut Q, requests: I) -> EnqueueTally
where
    Q: BlinkQueueProducer + ?Sized,
    I: IntoIterator<Item = BlinkRequest>,
{
    let mut tally = EnqueueTally::default();
    for request in requests {
        tally.record(queue.try_enqueue(request));
    }
    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blink::BlinkRate;

    struct LimitedQueue {
        capacity: usize,
        items: heapless::Vec<BlinkRequest, 4>,
    }

    impl BlinkQueueProducer for LimitedQueue {
        fn try_enqueue(&mut self, request: BlinkRequest) -> Result<(), BlinkEnqueueError> {
            if self.items.len() >= self.capacity {
                return Err(BlinkEnqueueError::QueueFull);
            }
            self.items
                .push(request)
                .map_err(|_| BlinkEnqueueError::QueueFull)
        }
    }

    #[test]
    fn enqueue_all_counts_drops_once_full() {
        let mut queue = LimitedQueue {
            capacity: 2,
            items: heapless::Vec::new(),
        };
        let request = BlinkRequest::new(BlinkRate::Frantic, 100);

        let tally = enqueue_all(&mut queue, [request; 3]);

        assert_eq!(tally.accepted, 2);
        assert_eq!(tally.dropped, 1);
        assert_eq!(tally.attempted(), 3);
        assert_eq!(queue.items.as_slice(), &[request; 2]);
    }
}
