//! Game session: owns the current level, the player and the camera, and moves
//! between playing and the end-of-level states.

use tracing::{debug, info};

use crate::camera::Camera;
use crate::config::GameConfig;
use crate::constants::*;
use crate::events::SoundSink;
use crate::geometry::Rect;
use crate::level::{Level, Outcome};
use crate::player::{Player, PlayerInput};
use crate::render::{palette, Canvas};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Playing,
    GameOver,
    LevelComplete,
}

/// Input for one session tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionInput {
    pub player: PlayerInput,
    /// Rebuild the level after a game over
    pub restart: bool,
    /// Move on to the next level after completing one
    pub advance: bool,
    /// Zoom change requested this tick
    pub zoom: f32,
}

pub struct GameSession {
    pub level: Level,
    pub player: Player,
    pub camera: Camera,
    state: SessionState,
    message_timer: u32,
    config: GameConfig,
    seed: u64,
    levels_completed: u32,
    sound: Option<Box<dyn SoundSink>>,
}

impl GameSession {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let level = Level::new(&config, seed);
        let player = Player::new(level.start_position(), &config);
        let mut session = Self {
            level,
            player,
            camera: Camera::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            state: SessionState::Playing,
            message_timer: 0,
            config,
            seed,
            levels_completed: 0,
            sound: None,
        };
        session.follow_player();
        session
    }

    pub fn with_sound(mut self, sound: Box<dyn SoundSink>) -> Self {
        self.sound = Some(sound);
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Ticks left on the end-of-level message
    pub fn message_timer(&self) -> u32 {
        self.message_timer
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn levels_completed(&self) -> u32 {
        self.levels_completed
    }

    /// Advance the session by one fixed tick
    pub fn tick(&mut self, input: &SessionInput) -> SessionState {
        puffin::profile_function!();

        if input.zoom != 0.0 {
            self.camera.adjust_zoom(input.zoom);
        }

        match self.state {
            SessionState::Playing => self.tick_playing(input),
            SessionState::GameOver => {
                self.message_timer = self.message_timer.saturating_sub(1);
                if input.restart {
                    self.restart();
                }
            }
            SessionState::LevelComplete => {
                self.message_timer = self.message_timer.saturating_sub(1);
                if input.advance {
                    self.levels_completed += 1;
                    self.rebuild(self.seed.wrapping_add(1));
                }
            }
        }

        self.dispatch_events();
        self.state
    }

    fn tick_playing(&mut self, input: &SessionInput) {
        self.player.handle_input(&input.player, &self.level.dungeon.walls);
        self.follow_player();

        match self.level.update(&mut self.player) {
            Outcome::Continue => {}
            Outcome::GameOver => self.enter(SessionState::GameOver),
            Outcome::LevelComplete => self.enter(SessionState::LevelComplete),
        }
    }

    fn enter(&mut self, state: SessionState) {
        info!(?state, seed = self.seed, "session state changed");
        self.state = state;
        self.message_timer = MESSAGE_DURATION;
    }

    /// Throw away the level and player and build a fresh level
    pub fn restart(&mut self) {
        self.rebuild(self.seed.wrapping_add(1));
    }

    fn rebuild(&mut self, seed: u64) {
        info!(seed, "building level");
        self.seed = seed;
        self.level = Level::new(&self.config, seed);
        self.player = Player::new(self.level.start_position(), &self.config);
        self.state = SessionState::Playing;
        self.message_timer = 0;
        self.follow_player();
    }

    fn follow_player(&mut self) {
        self.camera.set_tracking_target(self.player.center());
        self.camera
            .update(self.level.dungeon.width, self.level.dungeon.height);
    }

    fn dispatch_events(&mut self) {
        for event in self.level.drain_events() {
            debug!(?event, "event");
            if let Some(sound) = self.sound.as_mut() {
                sound.play(event.sound_name());
            }
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        puffin::profile_function!();

        let screen = Rect::new(0.0, 0.0, self.camera.viewport_width, self.camera.viewport_height);
        canvas.fill_rect(screen, palette::BACKGROUND);

        self.level.draw(canvas, &self.camera);
        self.player
            .draw(canvas, &self.camera, &self.level.dungeon.walls);

        if self.state != SessionState::Playing {
            canvas.fill_rect(screen, palette::OVERLAY);
        }
    }
}
