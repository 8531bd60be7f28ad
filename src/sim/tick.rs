//! Fixed timestep simulation tick and the session state machine
//!
//! `Game` owns every subsystem and is the only place phases change. Pointer
//! input arrives between ticks and only touches the gesture tracker; throws
//! are validated here and handed to the simulator.

use glam::Vec2;

use super::collider::build_arena;
use super::crowd::CrowdBump;
use super::gesture::GestureTracker;
use super::launch::{LaunchMapper, LaunchParameters};
use super::scoring::{self, ShotOutcome};
use super::state::{
    AimFeedback, FrameSnapshot, GameEvent, GameOverSummary, GamePhase, HudSnapshot, LevelSummary,
    ProjectileView, SessionState, ShotPhase, ThrowRejected,
};
use super::target::TargetZone;
use super::world::{FlightResolution, Simulator};
use crate::levels::{LevelConfig, LevelTable};
use crate::secs_to_ticks;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Input commands for a single tick (one-shot intents)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start a new run from the menu (or after game over / game complete)
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// Reload the current level
    pub restart: bool,
    /// Advance after a level is complete
    pub next_level: bool,
    /// Back to the title screen
    pub menu: bool,
}

/// What happened to a released drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThrowAttempt {
    /// Pointer released with no gesture in progress
    NoGesture,
    /// Drag too short to count
    Discarded,
    Rejected(ThrowRejected),
    Accepted(LaunchParameters),
}

/// Composition root for one player session
#[derive(Debug, Clone)]
pub struct Game {
    tuning: Tuning,
    settings: Settings,
    levels: LevelTable,
    seed: u64,
    phase: GamePhase,
    shot: ShotPhase,
    level: LevelConfig,
    session: SessionState,
    /// Banked level scores and bonuses for the whole run
    run_score: u64,
    time_ticks: u64,
    gestures: GestureTracker,
    launcher: LaunchMapper,
    sim: Simulator,
    crowd: CrowdBump,
    events: Vec<GameEvent>,
}

impl Game {
    /// New game with default tuning, settings and the built-in levels
    pub fn new(seed: u64) -> Self {
        Self::with_config(Tuning::default(), Settings::default(), LevelTable::builtin(), seed)
    }

    pub fn with_config(tuning: Tuning, settings: Settings, levels: LevelTable, seed: u64) -> Self {
        let level = levels.get(levels.first_id()).clone();
        let session = SessionState::new(level.starting_balls, level.goal_shots);
        let gestures = GestureTracker::new(settings.smoothing, tuning.throw.min_drag_distance);
        let launcher = LaunchMapper::new(tuning.throw.clone());
        let sim = Simulator::new(tuning.physics.clone(), &tuning.arena);

        Self {
            tuning,
            settings,
            levels,
            seed,
            phase: GamePhase::Menu,
            shot: ShotPhase::Ready,
            level,
            session,
            run_score: 0,
            time_ticks: 0,
            gestures,
            launcher,
            sim,
            crowd: CrowdBump::new(seed),
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn shot_phase(&self) -> ShotPhase {
        self.shot
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    pub fn run_score(&self) -> u64 {
        self.run_score
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn simulator(&self) -> &Simulator {
        &self.sim
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Swap preferences at runtime (smoothing mode, preview)
    pub fn set_settings(&mut self, settings: Settings) {
        self.gestures.set_mode(settings.smoothing);
        self.settings = settings;
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn launch_origin(&self) -> Vec2 {
        Vec2::new(self.tuning.arena.launch_x, self.tuning.arena.launch_y)
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("Phase {} -> {}", from.as_str(), to.as_str());
        self.phase = to;
        self.events.push(GameEvent::StateChanged { from, to });
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            level: self.level.id,
            balls_remaining: self.session.balls_remaining,
            starting_balls: self.session.starting_balls,
            shots_made: self.session.shots_made,
            goal_shots: self.session.goal_shots,
            combo_streak: self.session.combo_streak,
            score: self.session.score,
            run_score: self.run_score,
        }
    }

    fn push_hud(&mut self) {
        let hud = self.hud();
        self.events.push(GameEvent::Hud(hud));
    }

    /// Renderer view of the current state
    pub fn frame(&self) -> FrameSnapshot {
        FrameSnapshot {
            phase: self.phase,
            projectile: self
                .sim
                .projectile()
                .filter(|p| p.is_active)
                .map(|p| ProjectileView {
                    position: p.position,
                    rotation: p.rotation,
                }),
            crowd_bump_active: self.crowd.is_active(),
            hud: self.hud(),
        }
    }

    // --- Level flow ---

    /// Load a level by number (unknown numbers fall back to the first level)
    pub fn load_level(&mut self, level: u32) {
        let config = self.levels.get(level).clone();
        log::info!("Loading level {}: {}", config.id, config.name);

        self.session = SessionState::new(config.starting_balls, config.goal_shots);
        self.shot = ShotPhase::Ready;
        self.sim.rebuild(
            build_arena(&self.tuning, &config),
            TargetZone::for_glass(&self.tuning.arena, config.glass_size),
        );
        self.crowd.configure(self.seed, &self.tuning.crowd, &config);
        if self.gestures.cancel() {
            self.events.push(GameEvent::AimCleared);
        }

        self.events.push(GameEvent::LevelLoaded {
            level: config.id,
            name: config.name.clone(),
            description: config.description.clone(),
            tutorial: config.tutorial,
            colliders: self.sim.colliders().to_vec(),
            target: *self.sim.target(),
        });
        self.level = config;
        self.push_hud();
    }

    /// New run from the first level
    pub fn start_game(&mut self) {
        self.run_score = 0;
        self.load_level(self.levels.first_id());
        self.set_phase(GamePhase::Playing);
    }

    pub fn restart_level(&mut self) {
        if self.phase == GamePhase::Menu {
            return;
        }
        self.load_level(self.level.id);
        self.set_phase(GamePhase::Playing);
    }

    /// Advance after a cleared level; past the last level the run ends
    pub fn next_level(&mut self) {
        if self.phase != GamePhase::LevelComplete {
            return;
        }
        match self.levels.next_id(self.level.id) {
            Some(next) => {
                self.load_level(next);
                self.set_phase(GamePhase::Playing);
            }
            None => {
                log::info!("All levels cleared, final score {}", self.run_score);
                self.events.push(GameEvent::GameComplete {
                    final_score: self.run_score,
                });
                self.return_to_menu();
            }
        }
    }

    pub fn return_to_menu(&mut self) {
        self.sim.clear();
        self.shot = ShotPhase::Ready;
        if self.gestures.cancel() {
            self.events.push(GameEvent::AimCleared);
        }
        self.set_phase(GamePhase::Menu);
    }

    pub fn pause(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        if self.gestures.cancel() {
            self.events.push(GameEvent::AimCleared);
        }
        self.set_phase(GamePhase::Paused);
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.set_phase(GamePhase::Playing);
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Playing => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => {}
        }
    }

    // --- Pointer input (playfield coordinates, seconds) ---

    pub fn pointer_down(&mut self, point: Vec2, time: f64) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.gestures.pointer_down(point, time);
    }

    pub fn pointer_move(&mut self, point: Vec2, time: f64) {
        let Some(gesture) = self.gestures.pointer_move(point, time) else {
            return;
        };
        if self.phase != GamePhase::Playing {
            return;
        }

        let smoothed = gesture.smoothed_vector;
        let params = self.launcher.map(smoothed);
        let origin = self.launch_origin();
        let preview = self.sim.preview_trajectory(
            origin,
            params.velocity,
            self.settings.preview_count(),
            self.settings.preview_horizon,
        );
        self.events.push(GameEvent::AimUpdated(AimFeedback {
            origin,
            vector: smoothed,
            force: params.force,
            ring_radius: self.launcher.ring_radius(params.force),
            preview,
        }));
    }

    /// Release the pointer; a long enough drag becomes a throw attempt
    pub fn pointer_up(&mut self, time: f64) -> ThrowAttempt {
        if !self.gestures.is_active() {
            return ThrowAttempt::NoGesture;
        }
        let finished = self.gestures.pointer_up(time);
        self.events.push(GameEvent::AimCleared);

        let Some(gesture) = finished else {
            return ThrowAttempt::Discarded;
        };
        let params = self.launcher.map(gesture.smoothed_vector);
        match self.throw(params) {
            Ok(()) => ThrowAttempt::Accepted(params),
            Err(reason) => ThrowAttempt::Rejected(reason),
        }
    }

    pub fn pointer_cancel(&mut self) {
        if self.gestures.cancel() {
            self.events.push(GameEvent::AimCleared);
        }
    }

    /// Validate and launch. Rejections leave every counter untouched.
    pub fn throw(&mut self, params: LaunchParameters) -> Result<(), ThrowRejected> {
        let result = self.try_throw(params);
        if let Err(reason) = result {
            log::info!("Throw rejected: {}", reason);
        }
        result
    }

    fn try_throw(&mut self, params: LaunchParameters) -> Result<(), ThrowRejected> {
        if self.phase != GamePhase::Playing {
            return Err(ThrowRejected::NotPlaying);
        }
        if self.session.balls_remaining == 0 {
            return Err(ThrowRejected::NoBallsRemaining);
        }
        if matches!(self.shot, ShotPhase::Resolved { grace_ticks } if grace_ticks > 0) {
            return Err(ThrowRejected::Cooldown);
        }
        if matches!(self.shot, ShotPhase::InFlight { .. }) {
            return Err(ThrowRejected::ProjectileInFlight);
        }

        // The bump nudges this flight only; the parameters stay as mapped
        let bump = self.crowd.active_offset();
        let velocity = params.velocity + bump.unwrap_or(Vec2::ZERO);
        self.sim.launch(self.launch_origin(), velocity)?;

        self.session.balls_remaining -= 1;
        self.shot = ShotPhase::InFlight {
            crowd_bump: bump.is_some(),
        };
        log::debug!(
            "Throw accepted: v={:?} force={:.1}, {} balls left",
            velocity,
            params.force,
            self.session.balls_remaining
        );
        self.events.push(GameEvent::ThrowAccepted {
            velocity,
            force: params.force,
            crowd_bump: bump.is_some(),
        });
        self.push_hud();
        Ok(())
    }

    // --- Simulation ---

    /// Advance by one fixed timestep
    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        if input.menu {
            self.return_to_menu();
            return;
        }
        if input.start
            && matches!(self.phase, GamePhase::Menu | GamePhase::GameOver)
        {
            self.start_game();
        }
        if input.restart {
            self.restart_level();
        }
        if input.next_level {
            self.next_level();
        }
        if input.pause {
            self.toggle_pause();
        }

        if self.phase != GamePhase::Playing {
            return;
        }

        self.time_ticks += 1;

        if let Some(offset) = self.crowd.step() {
            self.events.push(GameEvent::CrowdBump { offset });
        }

        match self.shot {
            ShotPhase::Ready => {}
            ShotPhase::Resolved { grace_ticks } => {
                let remaining = grace_ticks.saturating_sub(1);
                if remaining == 0 {
                    self.shot = ShotPhase::Ready;
                    self.events.push(GameEvent::ThrowReady);
                } else {
                    self.shot = ShotPhase::Resolved {
                        grace_ticks: remaining,
                    };
                }
            }
            ShotPhase::InFlight { crowd_bump } => {
                let report = self.sim.step(dt);
                self.events
                    .extend(report.bounces.into_iter().map(GameEvent::Bounce));
                if let Some(resolution) = report.resolution {
                    self.resolve_shot(resolution, crowd_bump);
                }
            }
        }
    }

    fn resolve_shot(&mut self, resolution: FlightResolution, crowd_bump: bool) {
        let bounce_count = self.sim.projectile().map_or(0, |p| p.bounce_count);
        let record = scoring::classify(
            resolution,
            bounce_count,
            crowd_bump,
            &self.session,
            &self.tuning.scoring,
        );
        scoring::apply_shot(&mut self.session, &record);
        log::info!(
            "Shot {:?}: {} bounces, +{} {}(score {})",
            record.outcome,
            record.bounce_count,
            record.points_awarded,
            record.bonus.map_or(String::new(), |b| format!("{} ", b.label())),
            self.session.score
        );

        let grace = match record.outcome {
            ShotOutcome::Hit => self.tuning.scoring.hit_grace,
            ShotOutcome::Miss | ShotOutcome::OutOfBounds => self.tuning.scoring.miss_grace,
        };
        self.events.push(GameEvent::ShotResolved(record));
        self.push_hud();

        let grace_ticks = secs_to_ticks(grace);
        if grace_ticks > 0 {
            self.shot = ShotPhase::Resolved { grace_ticks };
        } else {
            self.shot = ShotPhase::Ready;
            self.events.push(GameEvent::ThrowReady);
        }

        if self.session.goal_reached() {
            self.complete_level();
        } else if self.session.out_of_balls() {
            self.game_over();
        }
    }

    fn complete_level(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let bonus = scoring::efficiency_bonus(&self.session, &self.tuning.scoring);
        self.run_score += self.session.score + bonus;
        let summary = LevelSummary {
            level: self.level.id,
            name: self.level.name.clone(),
            score: self.session.score,
            balls_used: self.session.balls_used(),
            efficiency_bonus: bonus,
            run_score: self.run_score,
            has_next_level: self.levels.next_id(self.level.id).is_some(),
        };
        log::info!(
            "Level {} complete: {} points, {} balls used, bonus {}",
            summary.level,
            summary.score,
            summary.balls_used,
            bonus
        );
        self.set_phase(GamePhase::LevelComplete);
        self.events.push(GameEvent::LevelComplete(summary));
    }

    fn game_over(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let summary = GameOverSummary {
            level: self.level.id,
            score: self.session.score,
            shots_made: self.session.shots_made,
            goal_shots: self.session.goal_shots,
            run_score: self.run_score,
        };
        log::info!(
            "Game over on level {}: {}/{} shots",
            summary.level,
            summary.shots_made,
            summary.goal_shots
        );
        self.set_phase(GamePhase::GameOver);
        self.events.push(GameEvent::GameOver(summary));
    }
}

/// Advance the game by one fixed timestep
pub fn tick(game: &mut Game, input: &TickInput, dt: f32) {
    game.tick(input, dt);
}
