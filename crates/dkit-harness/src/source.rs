//! Recording event source.

use dkit_core::{EventSource, SignalBinding, SignalKind, SubscribeError, SubscriptionId};

/// An [`EventSource`] that records subscription traffic.
///
/// Optionally rejects a set of signal kinds so error paths can be tested.
#[derive(Debug, Default)]
pub struct RecordingEventSource {
    next_id: u64,
    active: Vec<(SubscriptionId, SignalKind, SignalBinding)>,
    removed: Vec<SubscriptionId>,
    rejected: Vec<SignalKind>,
}

impl RecordingEventSource {
    /// An event source that accepts every signal kind.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse subscriptions for `kind`.
    #[must_use]
    pub fn rejecting(mut self, kind: SignalKind) -> Self {
        self.rejected.push(kind);
        self
    }

    /// Currently installed subscriptions.
    #[must_use]
    pub fn active(&self) -> &[(SubscriptionId, SignalKind, SignalBinding)] {
        &self.active
    }

    /// The binding installed for `kind`, if any.
    #[must_use]
    pub fn binding_of(&self, kind: SignalKind) -> Option<SignalBinding> {
        self.active
            .iter()
            .find(|(_, k, _)| *k == kind)
            .map(|(_, _, binding)| *binding)
    }

    /// Ids that have been unsubscribed.
    #[must_use]
    pub fn removed(&self) -> &[SubscriptionId] {
        &self.removed
    }
}

impl EventSource for RecordingEventSource {
    fn subscribe(
        &mut self,
        kind: SignalKind,
        binding: &SignalBinding,
    ) -> Result<SubscriptionId, SubscribeError> {
        if self.rejected.contains(&kind) {
            return Err(SubscribeError::Unsupported(kind));
        }
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.active.push((id, kind, *binding));
        Ok(id)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.active.retain(|(active_id, _, _)| *active_id != id);
        self.removed.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_assigns_unique_ids() {
        let mut source = RecordingEventSource::new();
        let a = source
            .subscribe(SignalKind::Scroll, &SignalBinding::viewport())
            .unwrap();
        let b = source
            .subscribe(SignalKind::Resize, &SignalBinding::viewport())
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(source.active().len(), 2);
    }

    #[test]
    fn unsubscribe_removes() {
        let mut source = RecordingEventSource::new();
        let id = source
            .subscribe(SignalKind::Scroll, &SignalBinding::viewport())
            .unwrap();
        source.unsubscribe(id);
        assert!(source.active().is_empty());
        assert_eq!(source.removed(), &[id]);
    }

    #[test]
    fn rejection() {
        let mut source = RecordingEventSource::new().rejecting(SignalKind::Wheel);
        let err = source
            .subscribe(SignalKind::Wheel, &SignalBinding::viewport())
            .unwrap_err();
        assert_eq!(err, SubscribeError::Unsupported(SignalKind::Wheel));
    }
}
