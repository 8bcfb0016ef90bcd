// In-process fan-out of engine notices to SSE subscribers
//
// One broadcast channel carries every notice with its topic; subscribers
// filter on their side. At-most-once, no replay: a send with no receivers
// is dropped silently, and a lagging receiver loses the oldest entries.

use tokio::sync::broadcast;

use evento_core::{Notice, Notifier, Topic};

const CHANNEL_CAPACITY: usize = 256;

/// A notice together with the topic it was published on
#[derive(Debug, Clone)]
pub struct Envelope {
    pub topic: Topic,
    pub notice: Notice,
}

impl Envelope {
    /// True when a subscriber to `topic` should see this envelope.
    /// Event-topic subscribers also get global notices, so one stream
    /// serves event pages that show announcements.
    pub fn visible_on(&self, topic: Topic) -> bool {
        self.topic == topic || self.topic == Topic::Global
    }
}

pub struct BroadcastHub {
    tx: broadcast::Sender<Envelope>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Envelope> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for BroadcastHub {
    fn publish(&self, topic: Topic, notice: Notice) {
        // Err here only means nobody is listening right now
        let _ = self.tx.send(Envelope { topic, notice });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn seat_update(event_id: Uuid) -> Notice {
        Notice::SeatUpdate {
            event_id,
            participants_count: 1,
            waitlist_count: 0,
        }
    }

    #[tokio::test]
    async fn subscribers_receive_published_notices() {
        let hub = BroadcastHub::new();
        let mut rx = hub.subscribe();
        let event_id = Uuid::now_v7();

        hub.publish(Topic::Event(event_id), seat_update(event_id));

        let envelope = rx.recv().await.unwrap();
        assert_eq!(envelope.topic, Topic::Event(event_id));
        assert_eq!(envelope.notice, seat_update(event_id));
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let hub = BroadcastHub::new();
        hub.publish(Topic::Global, seat_update(Uuid::now_v7()));
    }

    #[test]
    fn event_topic_sees_its_own_and_global_only() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        let own = Envelope {
            topic: Topic::Event(a),
            notice: seat_update(a),
        };
        let other = Envelope {
            topic: Topic::Event(b),
            notice: seat_update(b),
        };
        let global = Envelope {
            topic: Topic::Global,
            notice: Notice::RegistrationActivity { event_id: b },
        };

        assert!(own.visible_on(Topic::Event(a)));
        assert!(!other.visible_on(Topic::Event(a)));
        assert!(global.visible_on(Topic::Event(a)));
        assert!(global.visible_on(Topic::Global));
        assert!(!own.visible_on(Topic::Global));
    }
}
