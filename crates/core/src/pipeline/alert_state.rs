use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::shared::constants::ALERT_COOLDOWN_SECS;

/// Notification that a privileged identity was seen.
///
/// Produced on the capture thread, delivered to the display context over a
/// channel; display code is never called from the producer.
#[derive(Clone, Debug, PartialEq)]
pub struct AlertEvent {
    pub label: String,
    pub at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertPhase {
    Idle,
    Active,
}

/// State machine for the target-acquired overlay.
///
/// The overlay persists until an explicit `acknowledge` or `reset`; there
/// is no automatic return to `Idle`. Repeated sightings of the same label
/// are suppressed for the cooldown window to avoid re-alert spam. Shared
/// between the capture thread (`notify`) and the operator context
/// (`acknowledge`) behind one short mutex held by the owner.
pub struct AlertState {
    phase: AlertPhase,
    active_label: Option<String>,
    last_shown: HashMap<String, DateTime<Utc>>,
    cooldown: Duration,
}

impl AlertState {
    pub fn new() -> Self {
        Self::with_cooldown(Duration::seconds(ALERT_COOLDOWN_SECS))
    }

    pub fn with_cooldown(cooldown: Duration) -> Self {
        Self {
            phase: AlertPhase::Idle,
            active_label: None,
            last_shown: HashMap::new(),
            cooldown,
        }
    }

    pub fn phase(&self) -> AlertPhase {
        self.phase
    }

    pub fn active_label(&self) -> Option<&str> {
        self.active_label.as_deref()
    }

    /// Registers a known-identity sighting. Returns the event to deliver,
    /// or `None` when the sighting is suppressed (already active and the
    /// label's cooldown has not elapsed).
    pub fn notify(&mut self, label: &str, now: DateTime<Utc>) -> Option<AlertEvent> {
        let cooled_down = match self.last_shown.get(label) {
            None => true,
            Some(&last) => now - last > self.cooldown,
        };
        if self.phase == AlertPhase::Active && !cooled_down {
            return None;
        }

        self.phase = AlertPhase::Active;
        self.active_label = Some(label.to_string());
        self.last_shown.insert(label.to_string(), now);
        Some(AlertEvent {
            label: label.to_string(),
            at: now,
        })
    }

    /// Operator action clearing the overlay.
    pub fn acknowledge(&mut self) {
        self.phase = AlertPhase::Idle;
        self.active_label = None;
    }

    /// Session-boundary reset: forces `Idle` and forgets per-label
    /// cooldowns so a new session starts clean.
    pub fn reset(&mut self) {
        self.phase = AlertPhase::Idle;
        self.active_label = None;
        self.last_shown.clear();
    }
}

impl Default for AlertState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap() + Duration::seconds(secs)
    }

    #[test]
    fn test_initial_state_is_idle() {
        let state = AlertState::new();
        assert_eq!(state.phase(), AlertPhase::Idle);
        assert!(state.active_label().is_none());
    }

    #[test]
    fn test_first_notify_activates_and_emits() {
        let mut state = AlertState::new();
        let event = state.notify("Mara", at(0)).unwrap();
        assert_eq!(event.label, "Mara");
        assert_eq!(event.at, at(0));
        assert_eq!(state.phase(), AlertPhase::Active);
        assert_eq!(state.active_label(), Some("Mara"));
    }

    #[test]
    fn test_sightings_within_cooldown_are_suppressed() {
        // t=0 and t=5: exactly one event
        let mut state = AlertState::new();
        assert!(state.notify("Mara", at(0)).is_some());
        assert!(state.notify("Mara", at(5)).is_none());
        assert_eq!(state.phase(), AlertPhase::Active);
    }

    #[test]
    fn test_sighting_after_cooldown_re_emits() {
        // t=0 and t=11: two events
        let mut state = AlertState::new();
        assert!(state.notify("Mara", at(0)).is_some());
        assert!(state.notify("Mara", at(11)).is_some());
    }

    #[test]
    fn test_cooldown_boundary_is_exclusive() {
        let mut state = AlertState::new();
        assert!(state.notify("Mara", at(0)).is_some());
        // exactly 10s: not yet elapsed (strictly greater required)
        assert!(state.notify("Mara", at(10)).is_none());
    }

    #[test]
    fn test_cooldown_is_per_label() {
        let mut state = AlertState::with_cooldown(Duration::seconds(10));
        assert!(state.notify("Mara", at(0)).is_some());
        // Different label within Mara's cooldown still fires
        assert!(state.notify("Iris", at(2)).is_some());
        assert_eq!(state.active_label(), Some("Iris"));
    }

    #[test]
    fn test_acknowledge_returns_to_idle() {
        let mut state = AlertState::new();
        state.notify("Mara", at(0));
        state.acknowledge();
        assert_eq!(state.phase(), AlertPhase::Idle);
        assert!(state.active_label().is_none());
    }

    #[test]
    fn test_acknowledge_does_not_clear_cooldown() {
        let mut state = AlertState::new();
        state.notify("Mara", at(0));
        state.acknowledge();
        // Idle phase re-activates but only because phase is Idle; the
        // cooldown map is intact, so the Active-phase gate would still hold.
        assert!(state.notify("Mara", at(5)).is_some());
    }

    #[test]
    fn test_reset_clears_cooldowns() {
        let mut state = AlertState::new();
        state.notify("Mara", at(0));
        state.reset();
        assert_eq!(state.phase(), AlertPhase::Idle);
        assert!(state.notify("Mara", at(1)).is_some());
    }

    #[test]
    fn test_no_automatic_expiry_while_suppressed() {
        let mut state = AlertState::new();
        state.notify("Mara", at(0));
        state.notify("Mara", at(5));
        // Still active: nothing but acknowledge/reset clears the overlay
        assert_eq!(state.phase(), AlertPhase::Active);
    }
}
