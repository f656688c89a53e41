use glam::Vec2;
use proptest::prelude::*;

use mining_rush::analytics::StampedEvent;
use mining_rush::consts::*;
use mining_rush::platform::{HeadlessScheduler, Wakeup};
use mining_rush::sim::{
    Control, Desire, Direction, EntityKind, FallingEntity, GameState, InputState, Player,
    SessionMode, SpawnTimer, tick,
};
use mining_rush::{Session, Tuning};

fn new_session(seed: u64) -> (Session<HeadlessScheduler, Vec<StampedEvent>>, HeadlessScheduler) {
    let scheduler = HeadlessScheduler::new();
    let session = Session::new(seed, Tuning::default(), scheduler.clone(), Vec::new());
    (session, scheduler)
}

#[derive(Debug, Clone)]
enum Step {
    Press(Control),
    Release(Control),
    Point(f32),
    Idle,
}

fn control() -> impl Strategy<Value = Control> {
    let direction = prop_oneof![Just(Direction::Left), Just(Direction::Right)];
    (any::<bool>(), direction).prop_map(|(key, d)| if key { Control::Key(d) } else { Control::Button(d) })
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        control().prop_map(Step::Press),
        control().prop_map(Step::Release),
        (-50.0f32..150.0).prop_map(Step::Point),
        Just(Step::Idle),
    ]
}

proptest! {
    #[test]
    fn player_stays_in_bounds(steps in prop::collection::vec(step(), 1..400)) {
        let tuning = Tuning::default();
        let mut state = GameState::new_game(1, &tuning);
        let mut input = InputState::default();

        for step in steps {
            match step {
                Step::Press(c) => input.press(c),
                Step::Release(c) => input.release(c),
                Step::Point(x) => input.point_at(x),
                Step::Idle => {}
            }
            tick(&mut state, &mut input, &tuning);

            let player = &state.player;
            prop_assert!(player.velocity.is_finite() && player.x.is_finite());
            prop_assert!(player.velocity.abs() <= MAX_PLAYER_SPEED);
            prop_assert!((FIELD_MIN..=FIELD_MAX).contains(&player.x));
            prop_assert!(player.velocity == 0.0 || player.velocity.abs() >= VELOCITY_EPSILON);
        }
    }

    #[test]
    fn idle_velocity_decays_by_friction(start in -MAX_PLAYER_SPEED..MAX_PLAYER_SPEED) {
        let tuning = Tuning::default();
        let mut player = Player { velocity: start, ..Player::default() };
        let mut prev = player.velocity;
        for _ in 0..20 {
            player.integrate(Desire::Idle, &tuning);
            if player.velocity != 0.0 {
                prop_assert!((player.velocity - prev * PLAYER_FRICTION).abs() < 1e-6);
            }
            prev = player.velocity;
        }
        prop_assert_eq!(player.velocity, 0.0);
    }
}

#[test]
fn start_resets_everything() {
    let (mut session, _) = new_session(5);
    session.start();
    session.key_down("ArrowRight");
    for _ in 0..50 {
        session.wake(Wakeup::Timer(SpawnTimer::Falling));
        session.wake(Wakeup::Frame);
    }
    assert!(!session.state().entities.is_empty());

    session.start();
    let state = session.state();
    assert_eq!(state.score, 0);
    assert_eq!(state.lives, 3);
    assert_eq!(state.mode, SessionMode::Playing);
    assert_eq!(state.player.x, PLAYER_START_X);
    assert_eq!(state.player.velocity, 0.0);
    assert!(state.entities.is_empty());
    assert!(state.consumed.is_empty());
    assert_eq!(session.input(), &InputState::default());
}

#[test]
fn restart_after_game_over() {
    let (mut session, scheduler) = new_session(11);
    session.start();

    // Chase the lowest rock until the lives run out
    let mut lives_seen = vec![session.state().lives];
    for frame in 0..20_000u32 {
        if session.mode() != SessionMode::Playing {
            break;
        }
        if frame % 30 == 0 {
            session.wake(Wakeup::Timer(SpawnTimer::Falling));
        }
        let target = session
            .state()
            .entities
            .iter()
            .filter(|e| e.kind == EntityKind::Hazard && e.pos.y < 88.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|e| e.pos.x);
        if let Some(x) = target {
            session.point_at(x);
        }
        session.wake(Wakeup::Frame);
        if session.state().lives != *lives_seen.last().unwrap() {
            lives_seen.push(session.state().lives);
        }
    }
    assert_eq!(lives_seen, vec![3, 2, 1, 0]);
    assert_eq!(session.mode(), SessionMode::GameOver);
    assert_eq!(scheduler.frame_loops(), 0);
    assert!(scheduler.timers().is_empty());
    assert!(session.take_game_over().is_some());

    // Restart from game over
    session.start();
    assert_eq!(session.mode(), SessionMode::Playing);
    assert_eq!(session.state().lives, 3);
    assert_eq!(scheduler.frame_loops(), 1);
    assert_eq!(scheduler.timers().len(), 2);

    let names: Vec<_> = session.analytics().iter().map(|e| e.event.name()).collect();
    assert_eq!(names, vec!["game_start", "game_over", "game_start"]);
}

#[test]
fn no_spawns_while_paused() {
    let (mut session, _) = new_session(3);
    session.start();
    session.key_down(" ");
    assert_eq!(session.mode(), SessionMode::Paused);

    for _ in 0..10 {
        session.wake(Wakeup::Timer(SpawnTimer::Falling));
        session.wake(Wakeup::Timer(SpawnTimer::BonusLife));
        session.wake(Wakeup::Frame);
    }
    assert!(session.state().entities.is_empty());
    assert_eq!(session.state().frames, 0);

    session.key_down(" ");
    assert_eq!(session.mode(), SessionMode::Playing);
    session.wake(Wakeup::Timer(SpawnTimer::BonusLife));
    assert_eq!(session.state().entities.len(), 1);
    assert_eq!(session.state().entities[0].kind, EntityKind::BonusLife);
}

#[test]
fn same_seed_same_game() {
    let play = |seed| {
        let (mut session, _) = new_session(seed);
        session.start();
        for frame in 0..2000u32 {
            if frame % 30 == 0 {
                session.wake(Wakeup::Timer(SpawnTimer::Falling));
            }
            if frame % 900 == 0 {
                session.wake(Wakeup::Timer(SpawnTimer::BonusLife));
            }
            if frame % 200 == 0 {
                session.point_at((frame % 100) as f32);
            }
            session.wake(Wakeup::Frame);
        }
        let state = session.state();
        (state.score, state.lives, state.mode, state.entities.clone())
    };
    assert_eq!(play(77), play(77));
}

#[test]
fn lingering_consumed_entity_counts_once() {
    let tuning = Tuning::default();
    let mut state = GameState::new_game(1, &tuning);
    let mut input = InputState::default();

    state.entities.push(FallingEntity {
        id: 7,
        pos: Vec2::new(50.0, 89.0),
        kind: EntityKind::Collectible,
    });
    tick(&mut state, &mut input, &tuning);
    assert_eq!(state.score, 1);

    // Re-insert it as if removal lagged behind; it must stay inert
    state.entities.push(FallingEntity {
        id: 7,
        pos: Vec2::new(50.0, 89.5),
        kind: EntityKind::Collectible,
    });
    for _ in 0..3 {
        tick(&mut state, &mut input, &tuning);
    }
    assert_eq!(state.score, 1);
    assert!(state.entities.iter().all(|e| e.id != 7));
}
