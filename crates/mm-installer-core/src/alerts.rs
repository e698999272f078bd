//! Ordered, individually dismissible run alerts.

use indexmap::IndexMap;

use crate::model::{AlertLevel, AlertMessage};

/// Stable identity assigned when an alert is appended.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlertId(u64);

impl AlertId {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub id: AlertId,
    pub level: AlertLevel,
    pub message: AlertMessage,
    /// Localized text, or the raw key when the locale has no entry.
    pub text: String,
}

#[derive(Debug, Default)]
pub struct AlertQueue {
    next_id: u64,
    alerts: IndexMap<AlertId, Alert>,
}

impl AlertQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: AlertLevel, message: AlertMessage, text: String) -> AlertId {
        self.next_id += 1;
        let id = AlertId(self.next_id);
        self.alerts.insert(
            id,
            Alert {
                id,
                level,
                message,
                text,
            },
        );
        id
    }

    /// Remove one alert, keeping the relative order of the rest. The id
    /// lookup is hashed; closing the gap shifts every later alert, so
    /// removal is O(n) in the queue length.
    pub fn dismiss(&mut self, id: AlertId) -> Option<Alert> {
        self.alerts.shift_remove(&id)
    }

    pub fn get(&self, id: AlertId) -> Option<&Alert> {
        self.alerts.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.values()
    }

    pub fn ids(&self) -> Vec<AlertId> {
        self.alerts.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(queue: &mut AlertQueue, text: &str) -> AlertId {
        queue.push(
            AlertLevel::Warning,
            AlertMessage::Unresolved(text.to_string()),
            text.to_string(),
        )
    }

    fn texts(queue: &AlertQueue) -> Vec<&str> {
        queue.iter().map(|alert| alert.text.as_str()).collect()
    }

    #[test]
    fn removing_middle_alert_keeps_others_in_order() {
        let mut queue = AlertQueue::new();
        let _a = push(&mut queue, "A");
        let b = push(&mut queue, "B");
        let _c = push(&mut queue, "C");

        let removed = queue.dismiss(b).expect("B present");
        assert_eq!(removed.text, "B");
        assert_eq!(texts(&queue), vec!["A", "C"]);
    }

    #[test]
    fn ids_stay_valid_across_removals_and_appends() {
        let mut queue = AlertQueue::new();
        let a = push(&mut queue, "A");
        let b = push(&mut queue, "B");
        queue.dismiss(a);
        let c = push(&mut queue, "C");

        // A second dismissal of the same id is a no-op.
        assert!(queue.dismiss(a).is_none());
        assert_eq!(queue.get(b).map(|alert| alert.text.as_str()), Some("B"));
        assert_eq!(queue.ids(), vec![b, c]);
    }

    #[test]
    fn duplicates_are_kept() {
        let mut queue = AlertQueue::new();
        push(&mut queue, "same");
        push(&mut queue, "same");
        assert_eq!(queue.len(), 2);
    }
}
