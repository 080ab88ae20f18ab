// Character animation driver

use std::collections::HashMap;
use std::time::Duration;

use super::body::Facing;
use super::state::CharacterState;
use crate::game::sink::RenderSink;
use crate::game::status::DinoSkin;

/// Frame range on the shared 24-frame sprite strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationClip {
    /// First frame index (inclusive)
    pub first: usize,
    /// Last frame index (inclusive)
    pub last: usize,
    /// Whether the clip wraps back to `first`
    pub looping: bool,
}

impl AnimationClip {
    /// Create a looping animation
    pub fn looping(first: usize, last: usize) -> Self {
        Self {
            first,
            last,
            looping: true,
        }
    }

    /// Create a one-shot animation (plays once)
    pub fn one_shot(first: usize, last: usize) -> Self {
        Self {
            first,
            last,
            looping: false,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.last - self.first + 1
    }

    /// Single-frame clips never need a frame timer
    pub fn is_static(&self) -> bool {
        self.first == self.last
    }

    /// Get the total duration of one animation cycle
    #[allow(dead_code)]
    pub fn total_duration(&self, frame_duration: Duration) -> Duration {
        frame_duration * self.frame_count() as u32
    }
}

/// Data needed to render the current animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationFrameData {
    pub skin: DinoSkin,
    pub frame_index: usize,
    pub flip_horizontal: bool,
}

/// Plays state clips frame by frame.
///
/// This is the default animation driver: it maps each state to a frame
/// range and playback mode and runs its own frame timer. Non-looping clips
/// hold their last frame; the simulation decides when the state ends.
#[derive(Debug)]
pub struct SpriteAnimator {
    clips: HashMap<CharacterState, AnimationClip>,
    current: CharacterState,
    frame: usize,
    frame_timer: Duration,
    frame_duration: Duration,
    playing: bool,
    skin: DinoSkin,
    flip_horizontal: bool,
}

impl SpriteAnimator {
    pub fn new(frame_duration: Duration) -> Self {
        Self {
            clips: HashMap::new(),
            current: CharacterState::Idle,
            frame: 0,
            frame_timer: Duration::ZERO,
            frame_duration,
            playing: false,
            skin: DinoSkin::default(),
            flip_horizontal: false,
        }
    }

    /// Create an animator with the dino sprite strip layout
    pub fn with_dino_clips(frame_duration: Duration) -> Self {
        let mut animator = Self::new(frame_duration);
        animator.add_clip(CharacterState::Idle, AnimationClip::looping(0, 3));
        animator.add_clip(CharacterState::Move, AnimationClip::looping(4, 9));
        animator.add_clip(CharacterState::Kick, AnimationClip::one_shot(10, 12));
        animator.add_clip(CharacterState::Hurt, AnimationClip::looping(13, 16));
        animator.add_clip(CharacterState::Crouch, AnimationClip::looping(17, 17));
        animator.add_clip(CharacterState::Sneak, AnimationClip::looping(18, 23));
        animator.play(CharacterState::Idle);
        animator
    }

    pub fn add_clip(&mut self, state: CharacterState, clip: AnimationClip) {
        self.clips.insert(state, clip);
    }

    /// Play the clip for `state` from its first frame
    pub fn play(&mut self, state: CharacterState) {
        self.current = state;
        self.frame_timer = Duration::ZERO;
        match self.clips.get(&state) {
            Some(clip) => {
                self.frame = clip.first;
                self.playing = !clip.is_static();
            }
            None => {
                log::warn!("No animation clip for state {}", state);
                self.playing = false;
            }
        }
    }

    /// Advance the frame timer
    pub fn update(&mut self, dt: Duration) {
        if !self.playing {
            return;
        }
        let Some(clip) = self.clips.get(&self.current).copied() else {
            return;
        };

        self.frame_timer += dt;
        while self.playing && self.frame_timer >= self.frame_duration {
            self.frame_timer -= self.frame_duration;
            self.frame += 1;

            if self.frame > clip.last {
                if clip.looping {
                    self.frame = clip.first;
                } else {
                    // Stay on last frame
                    self.frame = clip.last;
                    self.playing = false;
                }
            }
        }
    }

    #[allow(dead_code)]
    pub fn current_state(&self) -> CharacterState {
        self.current
    }

    /// Absolute frame index on the sprite strip
    #[allow(dead_code)]
    pub fn current_frame(&self) -> usize {
        self.frame
    }

    #[allow(dead_code)]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn skin(&self) -> DinoSkin {
        self.skin
    }

    pub fn set_flip_horizontal(&mut self, flip: bool) {
        self.flip_horizontal = flip;
    }

    pub fn frame_data(&self) -> AnimationFrameData {
        AnimationFrameData {
            skin: self.skin,
            frame_index: self.frame,
            flip_horizontal: self.flip_horizontal,
        }
    }
}

impl RenderSink for SpriteAnimator {
    fn on_state_changed(&mut self, state: CharacterState) {
        self.play(state);
    }

    fn on_kick_cycle_complete(&mut self, repeating: bool) {
        if repeating && self.current == CharacterState::Kick {
            self.play(CharacterState::Kick);
        }
    }

    fn on_skin_changed(&mut self, skin: DinoSkin, state: CharacterState) {
        self.skin = skin;
        self.play(state);
    }

    fn on_facing_changed(&mut self, facing: Facing) {
        self.set_flip_horizontal(facing == Facing::Left);
    }

    fn advance(&mut self, dt: Duration) {
        self.update(dt);
    }
}
