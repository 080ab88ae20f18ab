// Simulation context
//
// Owns every piece of mutable state: clock, input, body, state machine,
// obstacles, status and pending timers. One `tick` runs:
//
// 1. advance the clock and fire due timers (kick cycle, hurt window,
//    stance timeout) in deadline order
// 2. stance arbitration, movement integration, idle/move auto rule
// 3. obstacle collisions
//
// Everything happens on the caller's thread; timers are deadlines on the
// virtual clock, not OS timers.

use std::time::Duration;

use glam::Vec2;

use super::characters::{
    CharacterState, CharacterStateMachine, PlayerBody, StateEvent, TimedExit, Transition,
};
use super::collision::{CollisionResolver, Obstacle};
use super::config::SimConfig;
use super::obstacles::ObstacleField;
use super::physics::{MovementFacts, PhysicsEngine};
use super::sink::{RenderSink, WorldBounds};
use super::status::{DinoSkin, PlayerStatus};
use crate::core::math::clamp_axes;
use crate::engine::input::{InputState, Key, KeyEdge};
use crate::engine::startup::StartupGate;
use crate::engine::timer::{TimerQueue, TimerSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    KickCycle,
    HurtWindow,
    StanceTimeout,
}

/// An ongoing kick: exists from the kick request until the trigger is
/// released and the running cycle has finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KickSession {
    /// Kick trigger still held
    pub held: bool,
    /// Start of the most recent kick cycle
    pub last_kick_at: Duration,
}

pub struct Simulation {
    config: SimConfig,
    clock: Duration,

    input: InputState,
    body: PlayerBody,
    machine: CharacterStateMachine,
    physics: PhysicsEngine,
    collisions: CollisionResolver,
    status: PlayerStatus,

    timers: TimerQueue<TimerKind>,
    kick_timer: TimerSlot,
    hurt_timer: TimerSlot,
    stance_timer: TimerSlot,

    kick: Option<KickSession>,
    /// End of the current hurt window
    hurt_until: Option<Duration>,
    last_facts: MovementFacts,

    gate: StartupGate,
    sink: Option<Box<dyn RenderSink>>,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        Self {
            clock: Duration::ZERO,
            input: InputState::new(),
            body: PlayerBody::new(config.world.spawn_position),
            machine: CharacterStateMachine::new(),
            physics: PhysicsEngine::new(config.movement.clone(), config.world.bound_margin),
            collisions: CollisionResolver::new(&config.combat),
            status: PlayerStatus::new(config.combat.max_health),
            timers: TimerQueue::new(),
            kick_timer: TimerSlot::new(),
            hurt_timer: TimerSlot::new(),
            stance_timer: TimerSlot::new(),
            kick: None,
            hurt_until: None,
            last_facts: MovementFacts::default(),
            gate: StartupGate::new(config.timing.asset_fallback()),
            sink: None,
            config,
        }
    }

    // ---- collaborators ----------------------------------------------------

    /// Attach the presentation layer. Nothing emitted before this is replayed.
    pub fn attach_sink(&mut self, sink: Box<dyn RenderSink>) {
        self.sink = Some(sink);
    }

    fn with_sink(&mut self, f: impl FnOnce(&mut dyn RenderSink)) {
        match self.sink.as_deref_mut() {
            Some(sink) => f(sink),
            None => log::trace!("No render sink attached, dropping notification"),
        }
    }

    fn world_bounds(&self) -> WorldBounds {
        self.sink
            .as_deref()
            .and_then(|s| s.world_bounds())
            .unwrap_or_else(|| self.config.world.default_bounds.into())
    }

    // ---- startup ----------------------------------------------------------

    /// Sprite assets finished loading. Only the first call (or the fallback
    /// deadline, whichever is first) initialises the simulation.
    pub fn signal_assets_ready(&mut self) {
        if self.gate.signal_ready() {
            self.initialize();
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.gate.is_open()
    }

    fn initialize(&mut self) {
        log::info!("Simulation initialised ({:?})", self.gate.state());
        let state = self.state();
        let health = self.status.health();
        self.with_sink(|s| {
            s.on_state_changed(state);
            s.notify_health_changed(health);
        });
    }

    // ---- input ------------------------------------------------------------

    /// Feed a translated key edge
    pub fn handle_key_edge(&mut self, edge: KeyEdge) {
        match edge.key {
            Some(key) => self.handle_key(key, edge.pressed),
            None if edge.pressed => self.input.note_activity(),
            None => {}
        }
    }

    /// Feed a key by browser-style name. Unknown names only count as activity.
    #[allow(dead_code)]
    pub fn handle_key_name(&mut self, name: &str, pressed: bool) {
        self.handle_key_edge(KeyEdge {
            key: Key::from_name(name),
            pressed,
        });
    }

    pub fn handle_key(&mut self, key: Key, pressed: bool) {
        let was_held = self.input.is_held(key);
        self.input.set_key(key, pressed);

        if key == Key::Space {
            match (pressed, was_held) {
                (true, false) => self.press_kick(),
                (false, _) => self.release_kick(),
                _ => {}
            }
        }
    }

    /// Drop every held key (focus lost)
    pub fn release_all_keys(&mut self) {
        self.input.release_all();
        self.release_kick();
    }

    fn press_kick(&mut self) {
        if !self.is_initialized() {
            return;
        }
        self.kick = Some(KickSession {
            held: true,
            last_kick_at: self.clock,
        });
        self.status.set_kicking(true);
        if self.state() != CharacterState::Kick {
            self.send(StateEvent::Kick);
        }
    }

    fn release_kick(&mut self) {
        self.status.set_kicking(false);
        if let Some(session) = self.kick.as_mut() {
            session.held = false;
            if !self.kick_timer.is_armed() {
                self.end_kick_session();
            }
        }
    }

    fn end_kick_session(&mut self) {
        self.kick = None;
        self.status.set_kicking(false);
    }

    // ---- direct actions ---------------------------------------------------

    /// Request a state directly, as the on-screen buttons do.
    ///
    /// An accepted Idle also stops the body and Move nudges it so the idle/move auto
    /// rule does not immediately undo the request. Crouch and Sneak fall
    /// back to Idle/Move after the stance timeout. Returns whether the
    /// state changed.
    pub fn request(&mut self, event: StateEvent) -> bool {
        if !self.is_initialized() {
            return false;
        }

        // A held trigger keeps its session
        if event == StateEvent::Kick && self.kick.is_none() {
            self.kick = Some(KickSession {
                held: false,
                last_kick_at: self.clock,
            });
        }

        let changed = self.send(event);
        let now_in_target = self.state() == event.target();

        match event {
            StateEvent::Kick if changed => {
                if let Some(session) = self.kick.as_mut() {
                    session.last_kick_at = self.clock;
                }
            }
            StateEvent::Kick => {
                let idle_session = self.kick.is_some_and(|k| !k.held);
                if idle_session && !self.kick_timer.is_armed() {
                    self.end_kick_session();
                }
            }
            StateEvent::Idle if changed => {
                self.body.velocity = Vec2::ZERO;
            }
            StateEvent::Move if now_in_target && !self.is_moving() => {
                let nudge = self.config.movement.move_request_nudge;
                self.body.velocity = Vec2::new(nudge * self.body.facing.sign(), 0.0);
            }
            StateEvent::Crouch | StateEvent::Sneak if now_in_target => {
                let delay = self.config.timing.stance_timeout();
                self.stance_timer
                    .arm(&mut self.timers, self.clock, delay, TimerKind::StanceTimeout);
            }
            _ => {}
        }

        changed
    }

    /// Switch sprite sheet and re-sync the animation driver
    pub fn change_character(&mut self, skin: DinoSkin) {
        if self.status.set_skin(skin) {
            let state = self.state();
            self.with_sink(|s| s.on_skin_changed(skin, state));
        }
    }

    /// Restore full health
    pub fn reset_health(&mut self) {
        if let Some(health) = self.status.reset_health() {
            self.with_sink(|s| s.notify_health_changed(health));
        }
    }

    // ---- obstacles --------------------------------------------------------

    pub fn set_obstacles(&mut self, obstacles: Vec<Obstacle>) {
        self.collisions.set_obstacles(obstacles);
    }

    /// Replace the obstacle set with a fresh batch placed away from the player
    pub fn regenerate_obstacles(&mut self, field: &mut ObstacleField) {
        let bounds = self.world_bounds();
        let obstacles = field.generate(&self.config.world, bounds, self.body.position);
        self.collisions.set_obstacles(obstacles);
    }

    #[allow(dead_code)]
    pub fn obstacles(&self) -> &[Obstacle] {
        self.collisions.obstacles()
    }

    // ---- tick -------------------------------------------------------------

    /// Advance the simulation by `dt`
    pub fn tick(&mut self, dt: Duration) {
        self.clock += dt;

        if self.gate.poll_fallback(self.clock) {
            self.initialize();
        }
        if !self.is_initialized() {
            return;
        }

        self.run_due_timers();
        self.with_sink(|s| s.advance(dt));
        self.step();
    }

    fn step(&mut self) {
        if !self.input.has_started() {
            return;
        }

        if let Some(event) = self.physics.stance_request(&self.input, self.state()) {
            self.send(event);
        }

        let bounds = self.world_bounds();
        let facing = self.body.facing;
        let state = self.state();
        let facts = self
            .physics
            .integrate(&mut self.body, &self.input, state, bounds);
        self.last_facts = facts;

        if self.body.facing != facing {
            let facing = self.body.facing;
            self.with_sink(|s| s.on_facing_changed(facing));
        }

        if let Some(event) = self.physics.motion_request(self.state(), &facts) {
            self.send(event);
        }

        self.check_collisions();
    }

    fn check_collisions(&mut self) {
        let state = self.state();
        let Some(hit) = self.collisions.resolve(&mut self.body, state) else {
            return;
        };
        // Bounce may not push past the normal cap
        self.body.velocity = clamp_axes(self.body.velocity, self.config.movement.max_velocity);

        log::info!("Hit obstacle #{} for {} damage", hit.obstacle, hit.damage);
        let health = self.status.take_damage(hit.damage);
        self.with_sink(|s| {
            if let Some(health) = health {
                s.notify_health_changed(health);
            }
            s.notify_damage(hit.damage);
        });

        self.status.set_hurt(true);
        self.hurt_until = Some(self.clock + self.config.timing.hurt_window());
        self.send(StateEvent::Hurt);
    }

    // ---- transitions and timers -------------------------------------------

    /// Apply an event to the state machine and run entry effects
    fn send(&mut self, event: StateEvent) -> bool {
        let Some(Transition { from, to }) = self.machine.send(event, self.clock) else {
            return false;
        };

        // A stance timeout belongs to the stance it was armed in
        if from.is_stance() {
            self.stance_timer.disarm(&mut self.timers);
        }

        if to == CharacterState::Sneak {
            let cap = self.config.movement.max_velocity * self.config.movement.sneak_factor;
            self.body.velocity = clamp_axes(self.body.velocity, cap);
        }

        match to.timed_exit() {
            Some(TimedExit::KickCycle) => {
                let delay = self.config.timing.kick_cycle();
                self.kick_timer
                    .arm(&mut self.timers, self.clock, delay, TimerKind::KickCycle);
            }
            Some(TimedExit::HurtWindow) => {
                let delay = self.config.timing.hurt_window();
                self.hurt_timer
                    .arm(&mut self.timers, self.clock, delay, TimerKind::HurtWindow);
            }
            None => {}
        }

        self.with_sink(|s| s.on_state_changed(to));
        true
    }

    fn run_due_timers(&mut self) {
        while let Some(fired) = self.timers.pop_due(self.clock) {
            match fired.kind {
                TimerKind::KickCycle if self.kick_timer.claim(fired.handle) => {
                    self.finish_kick_cycle(fired.deadline);
                }
                TimerKind::HurtWindow if self.hurt_timer.claim(fired.handle) => {
                    self.finish_hurt_window();
                }
                TimerKind::StanceTimeout if self.stance_timer.claim(fired.handle) => {
                    if self.state().is_stance() {
                        self.send(StateEvent::settle(self.is_moving()));
                    }
                }
                _ => log::debug!("Stale timer {:?} ignored", fired.kind),
            }
        }
    }

    fn finish_kick_cycle(&mut self, at: Duration) {
        let held = self.kick.is_some_and(|k| k.held);

        if self.state() != CharacterState::Kick {
            // Interrupted (hurt); the session lives on only while the key is down
            if !held {
                self.end_kick_session();
            }
            return;
        }

        self.with_sink(|s| s.on_kick_cycle_complete(held));

        if held {
            if let Some(session) = self.kick.as_mut() {
                session.last_kick_at = at;
            }
            let delay = self.config.timing.kick_cycle();
            self.kick_timer
                .arm(&mut self.timers, at, delay, TimerKind::KickCycle);
        } else {
            self.end_kick_session();
            self.send(StateEvent::settle(self.is_moving()));
        }
    }

    fn finish_hurt_window(&mut self) {
        self.hurt_until = None;
        self.status.set_hurt(false);
        if self.state() == CharacterState::Hurt {
            self.send(StateEvent::settle(self.is_moving()));
        }
    }

    // ---- accessors --------------------------------------------------------

    pub fn state(&self) -> CharacterState {
        self.machine.state()
    }

    #[allow(dead_code)]
    pub fn body(&self) -> &PlayerBody {
        &self.body
    }

    #[allow(dead_code)]
    pub fn body_mut(&mut self) -> &mut PlayerBody {
        &mut self.body
    }

    pub fn status(&self) -> &PlayerStatus {
        &self.status
    }

    /// Mutable status, for subscribing listeners
    pub fn status_mut(&mut self) -> &mut PlayerStatus {
        &mut self.status
    }

    #[allow(dead_code)]
    pub fn kick_session(&self) -> Option<KickSession> {
        self.kick
    }

    /// Time left in the hurt window, if one is open
    #[allow(dead_code)]
    pub fn hurt_window_remaining(&self) -> Option<Duration> {
        self.hurt_until.map(|end| end.saturating_sub(self.clock))
    }

    #[allow(dead_code)]
    pub fn last_facts(&self) -> MovementFacts {
        self.last_facts
    }

    pub fn is_moving(&self) -> bool {
        self.body.is_moving(self.config.movement.moving_threshold)
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}
