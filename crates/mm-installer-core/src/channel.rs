//! Topic-based event channel between the engine and the orchestrator.
//!
//! Handlers run synchronously on the emitting task, in subscription order.
//! Payloads are the JSON text of [`InstallerEvent`]; decoding is left to the
//! subscriber so malformed output can be surfaced instead of dropped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::event::{EnginePhase, InstallerEvent, INSTALLER_EVENT_TOPIC};
use crate::model::{clamp_progress, AlertKey, AlertLevel};

type Handler = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    topics: HashMap<String, Vec<(u64, Handler)>>,
}

/// Shared registry of topic listeners. Cloning yields another handle to the
/// same registry.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Mutex<Listeners>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `topic`. The returned handle releases the
    /// listener when unsubscribed or dropped.
    pub fn subscribe<F>(&self, topic: &str, handler: F) -> Subscription
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let mut listeners = self.lock();
        listeners.next_id += 1;
        let id = listeners.next_id;
        listeners
            .topics
            .entry(topic.to_string())
            .or_default()
            .push((id, Arc::new(handler)));
        debug!(topic, id, "listener subscribed");
        Subscription {
            bus: self.clone(),
            topic: topic.to_string(),
            id,
            released: false,
        }
    }

    /// Deliver `payload` to every listener of `topic`. Returns how many
    /// listeners received it.
    pub fn emit(&self, topic: &str, payload: &str) -> usize {
        // Snapshot handlers so a handler may unsubscribe without deadlocking.
        let handlers: Vec<Handler> = match self.lock().topics.get(topic) {
            Some(entries) => entries.iter().map(|(_, handler)| handler.clone()).collect(),
            None => Vec::new(),
        };
        for handler in &handlers {
            handler(payload);
        }
        handlers.len()
    }

    pub fn listener_count(&self, topic: &str) -> usize {
        self.lock().topics.get(topic).map(Vec::len).unwrap_or(0)
    }

    /// Emitter that broadcasts to every installer topic listener.
    pub fn emitter(&self) -> EventEmitter {
        EventEmitter {
            bus: self.clone(),
            topic: INSTALLER_EVENT_TOPIC.to_string(),
            target: None,
        }
    }

    /// Deliver `payload` to the single listener `id`. Returns false once
    /// that listener has been released.
    fn emit_to(&self, topic: &str, id: u64, payload: &str) -> bool {
        let handler = self.lock().topics.get(topic).and_then(|entries| {
            entries
                .iter()
                .find(|(entry_id, _)| *entry_id == id)
                .map(|(_, handler)| handler.clone())
        });
        match handler {
            Some(handler) => {
                handler(payload);
                true
            }
            None => false,
        }
    }

    fn release(&self, topic: &str, id: u64) -> bool {
        let mut listeners = self.lock();
        let Some(entries) = listeners.topics.get_mut(topic) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        let removed = entries.len() != before;
        if entries.is_empty() {
            listeners.topics.remove(topic);
        }
        removed
    }

    fn lock(&self) -> MutexGuard<'_, Listeners> {
        // A panicking handler must not wedge the channel for later runs.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Listener registration scoped to one run.
pub struct Subscription {
    bus: EventBus,
    topic: String,
    id: u64,
    released: bool,
}

impl Subscription {
    /// Emitter that reaches only this listener. Once the subscription is
    /// released its payloads are dropped, even if another run has since
    /// subscribed to the same topic.
    pub fn emitter(&self) -> EventEmitter {
        EventEmitter {
            bus: self.bus.clone(),
            topic: self.topic.clone(),
            target: Some(self.id),
        }
    }

    /// Release the listener now.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if self.bus.release(&self.topic, self.id) {
            debug!(topic = %self.topic, id = self.id, "listener released");
        } else {
            warn!(topic = %self.topic, id = self.id, "listener was already gone on release");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

/// Engine-side publisher for installer events.
#[derive(Clone)]
pub struct EventEmitter {
    bus: EventBus,
    topic: String,
    target: Option<u64>,
}

impl EventEmitter {
    pub fn emit(&self, event: &InstallerEvent) {
        match event.encode() {
            Ok(payload) => self.emit_raw(&payload),
            Err(err) => warn!(kind = event.kind(), %err, "failed to encode installer event"),
        }
    }

    /// Forward an already-encoded payload, e.g. a line of engine output.
    pub fn emit_raw(&self, payload: &str) {
        match self.target {
            None => {
                self.bus.emit(&self.topic, payload);
            }
            Some(id) => {
                if !self.bus.emit_to(&self.topic, id, payload) {
                    debug!(topic = %self.topic, id, "dropping payload for a released listener");
                }
            }
        }
    }

    pub fn change_phase(&self, phase: EnginePhase) {
        self.emit(&InstallerEvent::ChangePhase { phase });
    }

    pub fn change_detail(&self, detail: impl Into<String>) {
        self.emit(&InstallerEvent::ChangeDetail {
            detail: detail.into(),
        });
    }

    pub fn update_progress(&self, progress: f32) {
        self.emit(&InstallerEvent::UpdateProgress {
            progress: clamp_progress(progress),
        });
    }

    pub fn add_alert(&self, level: AlertLevel, key: AlertKey) {
        self.emit(&InstallerEvent::AddAlert {
            level,
            translation_key: key.as_key().to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collecting(bus: &EventBus, topic: &str) -> (Subscription, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let sub = bus.subscribe(topic, move |payload| {
            sink.lock().unwrap().push(payload.to_string());
        });
        (sub, seen)
    }

    #[test]
    fn delivers_in_emission_order() {
        let bus = EventBus::new();
        let (_sub, seen) = collecting(&bus, INSTALLER_EVENT_TOPIC);
        let emitter = bus.emitter();
        emitter.change_phase(EnginePhase::DownloadMods);
        emitter.change_detail("a.jar");
        emitter.update_progress(0.5);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen[0].contains("changePhase"));
        assert!(seen[1].contains("a.jar"));
        assert!(seen[2].contains("0.5"));
    }

    #[test]
    fn unsubscribe_and_drop_release_exactly_once() {
        let bus = EventBus::new();
        let (first, seen) = collecting(&bus, INSTALLER_EVENT_TOPIC);
        let (second, _) = collecting(&bus, INSTALLER_EVENT_TOPIC);
        assert_eq!(bus.listener_count(INSTALLER_EVENT_TOPIC), 2);

        first.unsubscribe();
        assert_eq!(bus.listener_count(INSTALLER_EVENT_TOPIC), 1);
        drop(second);
        assert_eq!(bus.listener_count(INSTALLER_EVENT_TOPIC), 0);

        assert_eq!(bus.emit(INSTALLER_EVENT_TOPIC, "{}"), 0);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn topics_are_isolated() {
        let bus = EventBus::new();
        let (_sub, seen) = collecting(&bus, "other://topic");
        bus.emitter().change_detail("ignored");
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn subscription_emitter_goes_quiet_after_release() {
        let bus = EventBus::new();
        let (first, first_seen) = collecting(&bus, INSTALLER_EVENT_TOPIC);
        let stale = first.emitter();
        stale.change_detail("first");
        first.unsubscribe();

        let (second, second_seen) = collecting(&bus, INSTALLER_EVENT_TOPIC);
        stale.change_phase(EnginePhase::LaunchModLoader);
        second.emitter().change_detail("second");

        assert_eq!(first_seen.lock().unwrap().len(), 1);
        let second_seen = second_seen.lock().unwrap();
        assert_eq!(second_seen.len(), 1);
        assert!(second_seen[0].contains("second"));
    }

    #[test]
    fn emitter_clamps_progress_before_encoding() {
        let bus = EventBus::new();
        let (_sub, seen) = collecting(&bus, INSTALLER_EVENT_TOPIC);
        bus.emitter().update_progress(f32::NAN);
        let payload = seen.lock().unwrap()[0].clone();
        assert_eq!(
            InstallerEvent::decode(&payload),
            Ok(InstallerEvent::UpdateProgress { progress: 0.0 })
        );
    }
}
