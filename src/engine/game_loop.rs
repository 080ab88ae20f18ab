/// Frame clock for the window front-end
///
/// Converts wall-clock frames into a whole number of fixed simulation
/// ticks. The simulation itself never reads the wall clock; it only sees
/// the fixed `tick_duration()` handed to it by the caller.
use std::time::{Duration, Instant};

/// Target simulation rate (60 ticks per second)
pub const TICKS_PER_SECOND: u32 = 60;
const FIXED_TIMESTEP: Duration = Duration::from_micros(1_000_000 / TICKS_PER_SECOND as u64);

/// Maximum number of ticks per frame to prevent spiral of death
const MAX_TICKS_PER_FRAME: u32 = 5;

pub struct GameLoop {
    /// Unconsumed wall time
    accumulator: Duration,

    /// Time of last frame
    last_frame_time: Instant,

    /// Whether the simulation is paused
    paused: bool,

    /// Current frame number
    frame_count: u64,

    /// Total ticks handed out
    tick_count: u64,
}

impl GameLoop {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self {
            accumulator: Duration::ZERO,
            last_frame_time: now,
            paused: false,
            frame_count: 0,
            tick_count: 0,
        }
    }

    /// Begin a new frame, returns the number of fixed ticks to run
    pub fn begin_frame(&mut self) -> u32 {
        self.begin_frame_at(Instant::now())
    }

    pub fn begin_frame_at(&mut self, now: Instant) -> u32 {
        let frame_time = now.saturating_duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.frame_count += 1;

        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut ticks = 0;
        while self.accumulator >= FIXED_TIMESTEP && ticks < MAX_TICKS_PER_FRAME {
            self.accumulator -= FIXED_TIMESTEP;
            ticks += 1;
        }

        // Drop the backlog we refused to simulate instead of carrying it forward
        if ticks == MAX_TICKS_PER_FRAME && self.accumulator >= FIXED_TIMESTEP {
            log::debug!("Frame took {:?}, dropping backlog", frame_time);
            self.accumulator = Duration::ZERO;
        }

        self.tick_count += ticks as u64;
        ticks
    }

    /// Duration of one simulation tick
    pub fn tick_duration(&self) -> Duration {
        FIXED_TIMESTEP
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Simulation paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.accumulator = Duration::ZERO;
            log::info!("Simulation resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_loop_creation() {
        let game_loop = GameLoop::new();
        assert_eq!(game_loop.frame_count(), 0);
        assert_eq!(game_loop.tick_count(), 0);
        assert!(!game_loop.is_paused());
    }

    #[test]
    fn test_tick_duration() {
        let game_loop = GameLoop::new();
        let secs = game_loop.tick_duration().as_secs_f32();
        assert!((secs - 1.0 / TICKS_PER_SECOND as f32).abs() < 0.0001);
    }

    #[test]
    fn test_one_tick_per_timestep() {
        let start = Instant::now();
        let mut game_loop = GameLoop::starting_at(start);

        assert_eq!(game_loop.begin_frame_at(start + FIXED_TIMESTEP), 1);
        assert_eq!(game_loop.begin_frame_at(start + FIXED_TIMESTEP * 3), 2);
        assert_eq!(game_loop.tick_count(), 3);
        assert_eq!(game_loop.frame_count(), 2);
    }

    #[test]
    fn test_short_frames_accumulate() {
        let start = Instant::now();
        let mut game_loop = GameLoop::starting_at(start);
        let half = FIXED_TIMESTEP / 2;

        assert_eq!(game_loop.begin_frame_at(start + half), 0);
        assert_eq!(game_loop.begin_frame_at(start + half * 2), 1);
    }

    #[test]
    fn test_long_frame_is_capped() {
        let start = Instant::now();
        let mut game_loop = GameLoop::starting_at(start);

        let ticks = game_loop.begin_frame_at(start + Duration::from_millis(300));
        assert_eq!(ticks, MAX_TICKS_PER_FRAME);

        // Backlog was dropped, so the next short frame runs nothing
        assert_eq!(
            game_loop.begin_frame_at(start + Duration::from_millis(301)),
            0
        );
    }

    #[test]
    fn test_paused_no_ticks() {
        let start = Instant::now();
        let mut game_loop = GameLoop::starting_at(start);
        game_loop.pause();

        assert_eq!(game_loop.begin_frame_at(start + Duration::from_millis(50)), 0);

        game_loop.resume();
        assert_eq!(
            game_loop.begin_frame_at(start + Duration::from_millis(50) + FIXED_TIMESTEP),
            1
        );
    }

    #[test]
    fn test_toggle_pause() {
        let mut game_loop = GameLoop::new();
        game_loop.toggle_pause();
        assert!(game_loop.is_paused());
        game_loop.toggle_pause();
        assert!(!game_loop.is_paused());
    }
}
