// Character state machine

use std::fmt;
use std::time::Duration;

/// Represents the current behaviour of the character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CharacterState {
    /// Standing still
    #[default]
    Idle,
    /// Walking in any direction
    Move,
    /// Playing a kick cycle
    Kick,
    /// Knocked back after touching an obstacle
    Hurt,
    /// Shift held without movement
    Crouch,
    /// Shift held while moving, half speed
    Sneak,
}

/// Transition requests. Each event names the state it asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateEvent {
    Idle,
    Move,
    Kick,
    Hurt,
    Crouch,
    Sneak,
}

/// Timers a state arms when it is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedExit {
    /// One-shot kick cycle, repeats while the trigger is held
    KickCycle,
    /// Hurt window, resolves to Move or Idle
    HurtWindow,
}

impl StateEvent {
    pub const ALL: [StateEvent; 6] = [
        Self::Idle,
        Self::Move,
        Self::Kick,
        Self::Hurt,
        Self::Crouch,
        Self::Sneak,
    ];

    pub fn target(&self) -> CharacterState {
        match self {
            Self::Idle => CharacterState::Idle,
            Self::Move => CharacterState::Move,
            Self::Kick => CharacterState::Kick,
            Self::Hurt => CharacterState::Hurt,
            Self::Crouch => CharacterState::Crouch,
            Self::Sneak => CharacterState::Sneak,
        }
    }

    /// Move if moving, otherwise Idle
    pub fn settle(is_moving: bool) -> Self {
        if is_moving {
            Self::Move
        } else {
            Self::Idle
        }
    }

    /// Parse an upper-case event name ("IDLE", "KICK", ...)
    #[allow(dead_code)]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.target().animation_name().eq_ignore_ascii_case(name))
    }
}

impl CharacterState {
    pub const ALL: [CharacterState; 6] = [
        Self::Idle,
        Self::Move,
        Self::Kick,
        Self::Hurt,
        Self::Crouch,
        Self::Sneak,
    ];

    /// Transition table. Anything not listed is silently ignored.
    pub fn accepts(&self, event: StateEvent) -> bool {
        use StateEvent as E;
        match self {
            Self::Idle => matches!(event, E::Move | E::Kick | E::Hurt | E::Crouch | E::Sneak),
            Self::Move => matches!(event, E::Idle | E::Kick | E::Hurt | E::Crouch | E::Sneak),
            Self::Kick => matches!(event, E::Idle | E::Move | E::Hurt),
            Self::Hurt => matches!(event, E::Idle | E::Move),
            Self::Crouch => matches!(event, E::Idle | E::Move | E::Kick | E::Hurt | E::Sneak),
            Self::Sneak => matches!(event, E::Idle | E::Move | E::Kick | E::Hurt | E::Crouch),
        }
    }

    /// Kick and Hurt are never interrupted by stance or movement rules
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Kick | Self::Hurt)
    }

    /// Shift-driven stances
    pub fn is_stance(&self) -> bool {
        matches!(self, Self::Crouch | Self::Sneak)
    }

    /// States the idle/move auto rule may switch between
    pub fn follows_motion(&self) -> bool {
        matches!(self, Self::Idle | Self::Move)
    }

    pub fn timed_exit(&self) -> Option<TimedExit> {
        match self {
            Self::Kick => Some(TimedExit::KickCycle),
            Self::Hurt => Some(TimedExit::HurtWindow),
            _ => None,
        }
    }

    /// Get the animation name for this state
    pub fn animation_name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Move => "move",
            Self::Kick => "kick",
            Self::Hurt => "hurt",
            Self::Crouch => "crouch",
            Self::Sneak => "sneak",
        }
    }
}

impl fmt::Display for CharacterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.animation_name())
    }
}

/// An accepted state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: CharacterState,
    pub to: CharacterState,
}

/// State machine that owns the active character state
#[derive(Debug)]
pub struct CharacterStateMachine {
    current_state: CharacterState,
    /// Simulation time the current state was entered
    entered_at: Duration,
    transitions: u64,
}

impl Default for CharacterStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterStateMachine {
    pub fn new() -> Self {
        Self {
            current_state: CharacterState::Idle,
            entered_at: Duration::ZERO,
            transitions: 0,
        }
    }

    /// Get the current state
    pub fn state(&self) -> CharacterState {
        self.current_state
    }

    /// Time spent in the current state
    pub fn time_in_state(&self, now: Duration) -> Duration {
        now.saturating_sub(self.entered_at)
    }

    /// Number of accepted transitions so far
    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    /// Apply an event at simulation time `now`.
    ///
    /// Returns the transition if one happened. Events the current state does
    /// not accept, and requests for the state already active, return `None`.
    pub fn send(&mut self, event: StateEvent, now: Duration) -> Option<Transition> {
        let from = self.current_state;
        let to = event.target();

        if from == to || !from.accepts(event) {
            log::trace!("Ignoring {:?} in state {}", event, from);
            return None;
        }

        let held_for = self.time_in_state(now);
        self.current_state = to;
        self.entered_at = now;
        self.transitions += 1;
        log::debug!(
            "state transition: {} -> {} (after {:?}, #{})",
            from,
            to,
            held_for,
            self.transition_count()
        );

        Some(Transition { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine_in(state: CharacterState) -> CharacterStateMachine {
        let mut sm = CharacterStateMachine::new();
        if state != CharacterState::Idle {
            // Every state is reachable from Idle in one step
            sm.send(
                StateEvent::ALL
                    .into_iter()
                    .find(|e| e.target() == state)
                    .unwrap(),
                Duration::ZERO,
            )
            .unwrap();
        }
        sm
    }

    #[test]
    fn test_initial_state() {
        let sm = CharacterStateMachine::new();
        assert_eq!(sm.state(), CharacterState::Idle);
        assert_eq!(sm.transition_count(), 0);
    }

    #[test]
    fn test_state_transition() {
        let mut sm = CharacterStateMachine::new();
        let t = sm.send(StateEvent::Move, Duration::from_millis(5));
        assert_eq!(
            t,
            Some(Transition {
                from: CharacterState::Idle,
                to: CharacterState::Move
            })
        );
        assert_eq!(sm.state(), CharacterState::Move);
        assert_eq!(
            sm.time_in_state(Duration::from_millis(105)),
            Duration::from_millis(100)
        );
    }

    #[test]
    fn test_rejected_events_change_nothing() {
        for state in CharacterState::ALL {
            for event in StateEvent::ALL {
                if state.accepts(event) {
                    continue;
                }
                let mut sm = machine_in(state);
                let count = sm.transition_count();
                assert_eq!(sm.send(event, Duration::from_secs(1)), None);
                assert_eq!(sm.state(), state, "{:?} moved {:?}", event, state);
                assert_eq!(sm.transition_count(), count);
            }
        }
    }

    #[test]
    fn test_same_state_request_is_noop() {
        for state in CharacterState::ALL {
            let mut sm = machine_in(state);
            let count = sm.transition_count();
            let same = StateEvent::ALL
                .into_iter()
                .find(|e| e.target() == state)
                .unwrap();
            assert_eq!(sm.send(same, Duration::from_secs(1)), None);
            assert_eq!(sm.transition_count(), count);
        }
    }

    #[test]
    fn test_hurt_only_leaves_to_idle_or_move() {
        let hurt = CharacterState::Hurt;
        assert!(hurt.accepts(StateEvent::Idle));
        assert!(hurt.accepts(StateEvent::Move));
        assert!(!hurt.accepts(StateEvent::Kick));
        assert!(!hurt.accepts(StateEvent::Crouch));
        assert!(!hurt.accepts(StateEvent::Sneak));
    }

    #[test]
    fn test_kick_cannot_enter_stance() {
        let kick = CharacterState::Kick;
        assert!(!kick.accepts(StateEvent::Crouch));
        assert!(!kick.accepts(StateEvent::Sneak));
        assert!(kick.accepts(StateEvent::Hurt));
    }

    #[test]
    fn test_stances_swap_freely() {
        let mut sm = machine_in(CharacterState::Crouch);
        assert!(sm.send(StateEvent::Sneak, Duration::ZERO).is_some());
        assert!(sm.send(StateEvent::Crouch, Duration::ZERO).is_some());
        assert!(sm.send(StateEvent::Kick, Duration::ZERO).is_some());
    }

    #[test]
    fn test_timed_exits() {
        assert_eq!(CharacterState::Kick.timed_exit(), Some(TimedExit::KickCycle));
        assert_eq!(CharacterState::Hurt.timed_exit(), Some(TimedExit::HurtWindow));
        assert_eq!(CharacterState::Sneak.timed_exit(), None);
    }

    #[test]
    fn test_state_groups() {
        assert!(CharacterState::Kick.is_locked());
        assert!(CharacterState::Hurt.is_locked());
        assert!(!CharacterState::Sneak.is_locked());
        assert!(CharacterState::Crouch.is_stance());
        assert!(CharacterState::Idle.follows_motion());
        assert!(!CharacterState::Crouch.follows_motion());
    }

    #[test]
    fn test_event_names() {
        assert_eq!(StateEvent::from_name("KICK"), Some(StateEvent::Kick));
        assert_eq!(StateEvent::from_name("sneak"), Some(StateEvent::Sneak));
        assert_eq!(StateEvent::from_name("TEST"), None);
        assert_eq!(StateEvent::settle(true), StateEvent::Move);
        assert_eq!(StateEvent::settle(false), StateEvent::Idle);
    }

    #[test]
    fn test_animation_names() {
        assert_eq!(CharacterState::Idle.animation_name(), "idle");
        assert_eq!(CharacterState::Move.to_string(), "move");
        assert_eq!(CharacterState::Sneak.animation_name(), "sneak");
    }
}
