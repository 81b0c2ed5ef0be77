//! Trigger handling: when do the words start falling.
//!
//! A widget activates at most once per mount. The controller is a three-state
//! machine, `Idle -> Armed -> Active`, advanced by observations the host
//! feeds in. `Armed` means the relevant listeners are bound; an observation
//! arriving before [`arm`](ActivationController::arm) is dropped, and every
//! observation after activation is a no-op. There is no way back: deactivation
//! happens only by tearing the widget down.
//!
//! The `observe_*` methods return `true` exactly when that call caused the
//! transition to `Active`, which is the host's cue to start a simulation
//! session.

use crate::config::Trigger;

/// Fraction of the widget that must be visible before a scroll trigger fires.
pub const VISIBILITY_THRESHOLD: f32 = 0.1;

/// Where the controller is in its one-way life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationState {
    /// Constructed, listeners not bound yet.
    Idle,
    /// Listeners bound, waiting for the trigger condition.
    Armed,
    /// Triggered. Terminal.
    Active,
}

/// The activation state machine for one mounted widget.
#[derive(Debug)]
pub struct ActivationController {
    trigger: Trigger,
    state: ActivationState,
}

impl ActivationController {
    /// A controller for `trigger`. `Trigger::Auto` is active immediately;
    /// everything else starts idle.
    pub fn new(trigger: Trigger) -> Self {
        let state = match trigger {
            Trigger::Auto => ActivationState::Active,
            _ => ActivationState::Idle,
        };
        Self { trigger, state }
    }

    #[inline]
    pub fn state(&self) -> ActivationState {
        self.state
    }

    #[inline]
    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == ActivationState::Active
    }

    /// Mark the trigger's listeners as bound. No-op unless idle.
    pub fn arm(&mut self) {
        if self.state == ActivationState::Idle {
            self.state = ActivationState::Armed;
        }
    }

    /// Report how much of the widget is visible, in `0.0..=1.0`.
    ///
    /// Returns `true` when this report activated a scroll-triggered widget.
    pub fn observe_visibility(&mut self, fraction: f32) -> bool {
        if self.trigger == Trigger::Scroll && fraction >= VISIBILITY_THRESHOLD {
            self.fire()
        } else {
            false
        }
    }

    /// Report a click inside the widget.
    pub fn observe_click(&mut self) -> bool {
        if self.trigger == Trigger::Click {
            self.fire()
        } else {
            false
        }
    }

    /// Report the pointer hovering the widget.
    pub fn observe_hover(&mut self) -> bool {
        if self.trigger == Trigger::Hover {
            self.fire()
        } else {
            false
        }
    }

    fn fire(&mut self) -> bool {
        if self.state == ActivationState::Armed {
            self.state = ActivationState::Active;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_is_active_from_construction() {
        let ctl = ActivationController::new(Trigger::Auto);
        assert!(ctl.is_active());
        assert_eq!(ctl.state(), ActivationState::Active);
    }

    #[test]
    fn test_arm_does_not_disturb_auto() {
        let mut ctl = ActivationController::new(Trigger::Auto);
        ctl.arm();
        assert!(ctl.is_active());
    }

    #[test]
    fn test_scroll_activates_exactly_once_at_threshold() {
        let mut ctl = ActivationController::new(Trigger::Scroll);
        ctl.arm();

        assert!(!ctl.observe_visibility(0.05));
        assert!(!ctl.is_active());

        // Threshold is inclusive
        assert!(ctl.observe_visibility(0.1));
        assert!(ctl.is_active());

        // Later reports change nothing and do not re-fire
        assert!(!ctl.observe_visibility(0.9));
        assert!(!ctl.observe_visibility(0.0));
        assert!(ctl.is_active());
    }

    #[test]
    fn test_click_activates_exactly_once() {
        let mut ctl = ActivationController::new(Trigger::Click);
        ctl.arm();
        assert!(ctl.observe_click());
        assert!(!ctl.observe_click());
        assert!(ctl.is_active());
    }

    #[test]
    fn test_hover_activates_exactly_once() {
        let mut ctl = ActivationController::new(Trigger::Hover);
        ctl.arm();
        assert!(ctl.observe_hover());
        assert!(!ctl.observe_hover());
        assert!(ctl.is_active());
    }

    #[test]
    fn test_mismatched_observations_are_ignored() {
        let mut scroll = ActivationController::new(Trigger::Scroll);
        scroll.arm();
        assert!(!scroll.observe_click());
        assert!(!scroll.observe_hover());
        assert!(!scroll.is_active());

        let mut click = ActivationController::new(Trigger::Click);
        click.arm();
        assert!(!click.observe_visibility(1.0));
        assert!(!click.observe_hover());
        assert!(!click.is_active());
    }

    #[test]
    fn test_observations_before_arming_are_dropped() {
        let mut ctl = ActivationController::new(Trigger::Click);
        assert!(!ctl.observe_click());
        assert_eq!(ctl.state(), ActivationState::Idle);

        ctl.arm();
        assert!(ctl.observe_click());
    }

    #[test]
    fn test_double_arm_is_harmless() {
        let mut ctl = ActivationController::new(Trigger::Hover);
        ctl.arm();
        ctl.arm();
        assert_eq!(ctl.state(), ActivationState::Armed);
        assert!(ctl.observe_hover());
        ctl.arm();
        assert!(ctl.is_active());
    }
}
