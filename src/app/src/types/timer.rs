use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Name of the recurring door status refresh
pub const DOOR_STATES_TIMER: &str = "doorStates";
/// Name of the one-shot timer returning from the message view
pub const MESSAGE_DISMISS_TIMER: &str = "messageDismiss";

/// Door status refresh interval
pub const DOOR_STATES_INTERVAL_MS: u64 = 8_000;
/// Delay before the message view returns home
pub const MESSAGE_DISMISS_DELAY_MS: u64 = 4_500;

/// Handle of a timer scheduled in the shell
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

/// Live timer handles keyed by task name
///
/// At most one handle is live per name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimerTable {
    live: BTreeMap<String, TimerId>,
    next_id: u64,
}

impl TimerTable {
    /// Register a fresh handle for `name`, returning the replaced handle (to be cancelled) and the new one.
    pub fn arm(&mut self, name: &str) -> (Option<TimerId>, TimerId) {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let stale = self.live.insert(name.to_string(), id);
        (stale, id)
    }

    /// Remove the handle for `name`, if any.
    pub fn disarm(&mut self, name: &str) -> Option<TimerId> {
        self.live.remove(name)
    }

    /// Remove the handle for `name` if it is `id`; a mismatch means the firing is stale.
    pub fn take_if_live(&mut self, name: &str, id: TimerId) -> bool {
        if self.live.get(name) == Some(&id) {
            self.live.remove(name);
            true
        } else {
            false
        }
    }

    pub fn live(&self, name: &str) -> Option<TimerId> {
        self.live.get(name).copied()
    }

    /// Name owning `id`, if it is still live
    pub fn name_of(&self, id: TimerId) -> Option<&str> {
        self.live
            .iter()
            .find_map(|(name, live)| (*live == id).then_some(name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arming_twice_replaces_the_live_handle() {
        let mut table = TimerTable::default();

        let (stale, first) = table.arm(DOOR_STATES_TIMER);
        assert_eq!(stale, None);

        let (stale, second) = table.arm(DOOR_STATES_TIMER);
        assert_eq!(stale, Some(first));
        assert_ne!(first, second);
        assert_eq!(table.live(DOOR_STATES_TIMER), Some(second));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn stale_firing_is_rejected() {
        let mut table = TimerTable::default();
        let (_, first) = table.arm(MESSAGE_DISMISS_TIMER);
        let (_, second) = table.arm(MESSAGE_DISMISS_TIMER);

        assert!(!table.take_if_live(MESSAGE_DISMISS_TIMER, first));
        assert!(table.take_if_live(MESSAGE_DISMISS_TIMER, second));
        assert!(table.is_empty());
    }

    #[test]
    fn name_of_finds_live_handles_only() {
        let mut table = TimerTable::default();
        let (_, poll) = table.arm(DOOR_STATES_TIMER);
        let (_, dismiss) = table.arm(MESSAGE_DISMISS_TIMER);

        assert_eq!(table.name_of(poll), Some(DOOR_STATES_TIMER));
        assert_eq!(table.name_of(dismiss), Some(MESSAGE_DISMISS_TIMER));

        table.disarm(DOOR_STATES_TIMER);
        assert_eq!(table.name_of(poll), None);
    }
}
