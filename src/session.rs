//! A running game session
//!
//! Owns the simulation state, the raw input, and the scheduling resources.
//! While the mode is `Playing` exactly one frame loop and one of each spawn
//! timer are live; every transition goes through `sync_schedule`, which
//! acquires them on entry and drops (cancels) them on exit.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::analytics::{AnalyticsEvent, AnalyticsSink, StampedEvent};
use crate::characters::{Character, Roster};
use crate::error::SessionError;
use crate::platform::{ScheduleHandle, Scheduler, Wakeup};
use crate::sim::{
    Control, Direction, EntityKind, FallingEntity, FrameReport, GameState, InputState,
    SessionMode, SpawnTimer, is_pause_key, key_direction, spawn_for_timer, tick,
};
use crate::tuning::Tuning;

/// Live scheduling for a playing session
struct RunHandles {
    _frames: ScheduleHandle,
    _timers: Vec<ScheduleHandle>,
}

/// Handed to the score-card renderer when a run ends
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameOverSummary {
    pub score: u32,
    pub lives_lost: u32,
    pub character: Character,
}

/// What the page needs to draw a frame
#[derive(Debug, Clone, Serialize)]
pub struct Hud<'a> {
    pub score: u32,
    pub lives: u32,
    pub mode: SessionMode,
    pub player_x: f32,
    pub direction: Direction,
    pub entities: &'a [FallingEntity],
    pub character: &'a Character,
}

pub struct Session<S: Scheduler, A: AnalyticsSink> {
    tuning: Tuning,
    state: GameState,
    input: InputState,
    scheduler: S,
    analytics: A,
    run: Option<RunHandles>,
    roster: Roster,
    character: Character,
    /// Seeds successive games
    seeds: Pcg32,
    lives_lost: u32,
    game_over: Option<GameOverSummary>,
}

impl<S: Scheduler, A: AnalyticsSink> Session<S, A> {
    /// Mount an idle session
    pub fn new(seed: u64, tuning: Tuning, scheduler: S, analytics: A) -> Self {
        let roster = Roster::new();
        let character = roster.default_character().clone();
        Self {
            state: GameState::idle(seed, &tuning),
            tuning,
            input: InputState::default(),
            scheduler,
            analytics,
            run: None,
            roster,
            character,
            seeds: Pcg32::seed_from_u64(seed),
            lives_lost: 0,
            game_over: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn mode(&self) -> SessionMode {
        self.state.mode
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn analytics(&self) -> &A {
        &self.analytics
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn hud(&self) -> Hud<'_> {
        Hud {
            score: self.state.score,
            lives: self.state.lives,
            mode: self.state.mode,
            player_x: self.state.player.x,
            direction: self.state.player.direction,
            entities: &self.state.entities,
            character: &self.character,
        }
    }

    /// Stamp and forward an analytics event
    pub fn track(&mut self, event: AnalyticsEvent) {
        let timestamp = self.scheduler.now_ms();
        self.analytics.record(StampedEvent { timestamp, event });
    }

    // === Commands ===

    /// Start (or restart) a game from scratch
    pub fn start(&mut self) {
        // Drop any running loop first so the new game gets fresh timers
        self.run = None;

        let seed = self.seeds.next_u64();
        self.state = GameState::new_game(seed, &self.tuning);
        self.input.reset();
        self.lives_lost = 0;
        self.game_over = None;

        self.track(AnalyticsEvent::GameStart);
        log::info!("Game started with seed: {}", seed);
        self.sync_schedule();
    }

    /// Playing <-> Paused; no-op in any other mode
    pub fn toggle_pause(&mut self) -> SessionMode {
        match self.state.mode {
            SessionMode::Playing => self.pause(),
            SessionMode::Paused => self.resume(),
            SessionMode::Idle | SessionMode::GameOver => {}
        }
        self.state.mode
    }

    pub fn pause(&mut self) {
        if self.state.mode == SessionMode::Playing {
            self.state.mode = SessionMode::Paused;
            log::info!("Paused");
            self.sync_schedule();
        }
    }

    pub fn resume(&mut self) {
        if self.state.mode == SessionMode::Paused {
            self.state.mode = SessionMode::Playing;
            log::info!("Resumed");
            self.sync_schedule();
        }
    }

    /// Opening the gallery pauses a running game
    pub fn open_character_selection(&mut self) {
        self.pause();
    }

    pub fn select_character(&mut self, id: &str) -> Result<&Character, SessionError> {
        let character = self
            .roster
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownCharacter(id.to_string()))?;

        self.track(AnalyticsEvent::CharacterSelected {
            character_id: character.id.clone(),
            character_name: character.name.clone(),
        });
        log::info!("Selected character {}", character.name);
        self.character = character;
        Ok(&self.character)
    }

    /// Summary of the last finished run, once
    pub fn take_game_over(&mut self) -> Option<GameOverSummary> {
        self.game_over.take()
    }

    // === Input events ===

    pub fn key_down(&mut self, key: &str) {
        if is_pause_key(key) {
            self.toggle_pause();
        } else if let Some(direction) = key_direction(key) {
            self.input.press(Control::Key(direction));
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if let Some(direction) = key_direction(key) {
            self.input.release(Control::Key(direction));
        }
    }

    /// Pointer/touch target in field percent; ignored unless playing
    pub fn point_at(&mut self, x: f32) {
        if self.state.is_running() {
            self.input.point_at(x);
        }
    }

    /// Pointer at `percent` across the play field; the sprite's centre is
    /// placed under it using the tuned player half-width
    pub fn point_at_finger(&mut self, percent: f32) {
        self.point_at(percent - self.tuning.player_half_width);
    }

    /// Finger lifted
    pub fn release_pointer(&mut self) {
        self.input.clear_target();
    }

    pub fn press_button(&mut self, direction: Direction) {
        if self.state.is_running() {
            self.input.press(Control::Button(direction));
        }
    }

    pub fn release_button(&mut self, direction: Direction) {
        self.input.release(Control::Button(direction));
    }

    // === Scheduled callbacks ===

    pub fn wake(&mut self, wakeup: Wakeup) {
        match wakeup {
            Wakeup::Frame => {
                self.on_frame();
            }
            Wakeup::Timer(timer) => {
                self.on_timer(timer);
            }
        }
    }

    /// One animation frame
    pub fn on_frame(&mut self) -> Option<FrameReport> {
        let report = tick(&mut self.state, &mut self.input, &self.tuning)?;

        if let Some(hit) = report.collision {
            if hit.kind == EntityKind::Hazard {
                self.lives_lost += 1;
            }
            if hit.game_over {
                self.finish();
            }
        }
        Some(report)
    }

    /// One spawn timer firing
    pub fn on_timer(&mut self, timer: SpawnTimer) -> Option<u32> {
        spawn_for_timer(&mut self.state, timer, &self.tuning)
    }

    fn finish(&mut self) {
        let summary = GameOverSummary {
            score: self.state.score,
            lives_lost: self.lives_lost,
            character: self.character.clone(),
        };
        self.track(AnalyticsEvent::GameOver {
            final_score: summary.score,
            lives_lost: summary.lives_lost,
        });
        log::info!("Game over with score {}", summary.score);
        self.game_over = Some(summary);
        self.sync_schedule();
    }

    /// Make the live scheduling match the current mode
    fn sync_schedule(&mut self) {
        match (self.state.is_running(), self.run.is_some()) {
            (true, false) => {
                let frames = self.scheduler.start_frames();
                let timers = SpawnTimer::ALL
                    .iter()
                    .map(|&timer| {
                        let period = timer.period_ms(&self.tuning);
                        self.scheduler.start_interval(timer, period)
                    })
                    .collect();
                self.run = Some(RunHandles {
                    _frames: frames,
                    _timers: timers,
                });
                log::debug!("Frame loop and spawn timers started");
            }
            (false, true) => {
                self.run = None;
                self.input.release_buttons();
                log::debug!("Frame loop and spawn timers stopped");
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PLAYER_START_X;
    use crate::platform::HeadlessScheduler;

    type TestSession = Session<HeadlessScheduler, Vec<StampedEvent>>;

    fn session() -> TestSession {
        Session::new(2024, Tuning::default(), HeadlessScheduler::new(), Vec::new())
    }

    fn assert_running(session: &TestSession, running: bool) {
        let scheduler = session.scheduler();
        if running {
            assert_eq!(scheduler.frame_loops(), 1);
            assert_eq!(scheduler.timers().len(), 2);
        } else {
            assert_eq!(scheduler.frame_loops(), 0);
            assert!(scheduler.timers().is_empty());
        }
    }

    #[test]
    fn test_mounts_idle() {
        let session = session();
        assert_eq!(session.mode(), SessionMode::Idle);
        assert_eq!(session.state().lives, 3);
        assert_running(&session, false);
    }

    #[test]
    fn test_start_acquires_schedule() {
        let mut session = session();
        session.start();
        assert_eq!(session.mode(), SessionMode::Playing);
        assert_running(&session, true);
        assert_eq!(
            session.scheduler().timers(),
            vec![(SpawnTimer::Falling, 500), (SpawnTimer::BonusLife, 15_000)]
        );
        assert_eq!(session.analytics()[0].event, AnalyticsEvent::GameStart);
    }

    #[test]
    fn test_pause_resume_releases_and_reacquires() {
        let mut session = session();
        session.start();
        session.on_timer(SpawnTimer::Falling);

        assert_eq!(session.toggle_pause(), SessionMode::Paused);
        assert_running(&session, false);
        let frozen = session.state().clone();

        // Stale callbacks after pausing are no-ops
        assert!(session.on_frame().is_none());
        assert!(session.on_timer(SpawnTimer::Falling).is_none());
        assert_eq!(session.state().entities, frozen.entities);

        assert_eq!(session.toggle_pause(), SessionMode::Playing);
        assert_running(&session, true);
        assert_eq!(session.scheduler().frame_starts(), 2);
    }

    #[test]
    fn test_pause_ignored_when_not_playing() {
        let mut session = session();
        assert_eq!(session.toggle_pause(), SessionMode::Idle);
        session.key_down(" ");
        assert_eq!(session.mode(), SessionMode::Idle);
        assert_running(&session, false);
    }

    #[test]
    fn test_restart_keeps_single_loop() {
        let mut session = session();
        session.start();
        session.start();
        assert_running(&session, true);
        assert_eq!(session.scheduler().frame_starts(), 2);
    }

    #[test]
    fn test_game_over_releases_schedule() {
        let mut session = session();
        session.start();
        session.state.lives = 1;
        session.state.entities.push(FallingEntity {
            id: 900,
            pos: glam::Vec2::new(50.0, 90.0),
            kind: EntityKind::Hazard,
        });

        let report = session.on_frame().unwrap();
        assert!(report.collision.unwrap().game_over);
        assert_eq!(session.mode(), SessionMode::GameOver);
        assert_running(&session, false);

        let summary = session.take_game_over().unwrap();
        assert_eq!(summary.lives_lost, 1);
        assert_eq!(summary.character.id, "xisk");
        assert!(session.take_game_over().is_none());
        assert_eq!(
            session.analytics().last().map(|e| e.event.name()),
            Some("game_over")
        );
    }

    #[test]
    fn test_pointer_ignored_unless_playing() {
        let mut session = session();
        session.point_at(80.0);
        session.press_button(Direction::Left);
        assert_eq!(session.input(), &InputState::default());

        session.start();
        session.point_at(80.0);
        assert_eq!(session.input().target, Some(80.0));
        session.release_pointer();
        assert_eq!(session.input().target, None);
    }

    #[test]
    fn test_finger_offset_follows_tuning() {
        let mut session = session();
        session.start();
        session.point_at_finger(60.0);
        assert_eq!(session.input().target, Some(55.0));

        let tuning = Tuning::from_json(r#"{ "player_half_width": 8.0 }"#).unwrap();
        let mut session = Session::new(1, tuning, HeadlessScheduler::new(), Vec::new());
        session.start();
        session.point_at_finger(60.0);
        assert_eq!(session.input().target, Some(52.0));
        session.point_at_finger(3.0);
        assert_eq!(session.input().target, Some(0.0));
    }

    #[test]
    fn test_key_events_drive_input() {
        let mut session = session();
        session.start();
        session.key_down("ArrowLeft");
        session.on_frame();
        assert_eq!(session.state().player.direction, Direction::Left);
        session.key_up("ArrowLeft");
        assert_eq!(session.input().held(), None);
    }

    #[test]
    fn test_select_character() {
        let mut session = session();
        let name = session.select_character("nft-3").unwrap().name.clone();
        assert_eq!(name, "GEMtard #3");
        assert_eq!(
            session.select_character("nope"),
            Err(SessionError::UnknownCharacter("nope".into()))
        );
        assert_eq!(session.character().id, "nft-3");
    }

    #[test]
    fn test_pause_releases_held_buttons() {
        let mut session = session();
        session.start();
        session.key_down("ArrowLeft");
        session.press_button(Direction::Right);
        session.pause();
        assert!(!session.input().button_right);
        assert!(session.input().key_left);

        session.key_up("ArrowLeft");
        session.resume();
        for _ in 0..10 {
            session.on_frame();
        }
        assert_eq!(session.state().player.x, PLAYER_START_X);
        assert_eq!(session.state().player.velocity, 0.0);
    }

    #[test]
    fn test_game_over_releases_held_buttons() {
        let mut session = session();
        session.start();
        session.press_button(Direction::Left);
        session.state.lives = 1;
        session.state.entities.push(FallingEntity {
            id: 901,
            pos: glam::Vec2::new(50.0, 90.0),
            kind: EntityKind::Hazard,
        });
        session.on_frame();
        assert_eq!(session.mode(), SessionMode::GameOver);
        assert_eq!(session.input().held(), None);
    }

    #[test]
    fn test_character_selection_pauses() {
        let mut session = session();
        session.start();
        session.open_character_selection();
        assert_eq!(session.mode(), SessionMode::Paused);
        assert_running(&session, false);
    }
}
