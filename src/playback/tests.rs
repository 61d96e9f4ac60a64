use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::fake::{self, FakeBackend};
use super::*;
use crate::error::PlayerError;

const SETTLE: Duration = Duration::from_millis(1000);

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

#[test]
fn cycling_mode_three_times_returns_to_start() {
    for start in [PlayMode::Sequential, PlayMode::Repeat, PlayMode::Shuffle] {
        assert_eq!(start.cycle().cycle().cycle(), start);
        assert_ne!(start.cycle(), start);
    }
    assert_eq!(PlayMode::Sequential.cycle(), PlayMode::Repeat);
    assert_eq!(PlayMode::Repeat.cycle(), PlayMode::Shuffle);
    assert_eq!(PlayMode::Shuffle.cycle(), PlayMode::Sequential);
}

#[test]
fn sequential_steps_wrap_or_stop_at_the_ends() {
    let mut r = rng();
    let fwd = Target::Step(Direction::Forward);
    let back = Target::Step(Direction::Backward);
    let wrap = SequentialBoundary::Wrap;
    let stop = SequentialBoundary::Stop;

    assert_eq!(resolve(PlayMode::Sequential, 0, fwd, 3, wrap, &mut r), Some(1));
    assert_eq!(resolve(PlayMode::Sequential, 2, fwd, 3, wrap, &mut r), Some(0));
    assert_eq!(resolve(PlayMode::Sequential, 0, back, 3, wrap, &mut r), Some(2));

    assert_eq!(resolve(PlayMode::Sequential, 2, fwd, 3, stop, &mut r), None);
    assert_eq!(resolve(PlayMode::Sequential, 0, back, 3, stop, &mut r), None);
    assert_eq!(resolve(PlayMode::Sequential, 1, back, 3, stop, &mut r), Some(0));
}

#[test]
fn explicit_index_is_honored_in_sequential_and_rejected_when_out_of_range() {
    let mut r = rng();
    for i in 0..4 {
        assert_eq!(
            resolve(PlayMode::Sequential, 0, Target::Index(i), 4, SequentialBoundary::Wrap, &mut r),
            Some(i)
        );
    }
    for mode in [PlayMode::Sequential, PlayMode::Repeat, PlayMode::Shuffle] {
        assert_eq!(
            resolve(mode, 0, Target::Index(4), 4, SequentialBoundary::Wrap, &mut r),
            None
        );
    }
}

#[test]
fn repeat_keeps_index_and_shuffle_stays_in_range() {
    let mut r = rng();
    for target in [
        Target::Step(Direction::Forward),
        Target::Step(Direction::Backward),
        Target::Index(0),
    ] {
        assert_eq!(
            resolve(PlayMode::Repeat, 3, target, 5, SequentialBoundary::Stop, &mut r),
            Some(3)
        );
    }

    for _ in 0..200 {
        let i = resolve(
            PlayMode::Shuffle,
            1,
            Target::Step(Direction::Forward),
            5,
            SequentialBoundary::Wrap,
            &mut r,
        )
        .unwrap();
        assert!(i < 5);
    }
}

#[test]
fn volume_clamps_any_input() {
    assert_eq!(clamp_volume(1.7), 1.0);
    assert_eq!(clamp_volume(-0.2), 0.0);
    assert_eq!(clamp_volume(0.3), 0.3);
    assert_eq!(clamp_volume(f32::NAN), 0.0);
    assert_eq!(clamp_volume(f32::INFINITY), 1.0);

    let mut store = PlayerStateStore::new(vec![secs(10)], 0, PlayMode::Sequential, 5.0);
    assert_eq!(store.snapshot().volume, 1.0);
    assert_eq!(store.set_volume(0.3), 0.3);
    assert_eq!(store.set_volume(0.3), 0.3);
    assert_eq!(store.set_volume(-3.0), 0.0);
}

#[test]
fn store_clamps_time_and_rejects_bad_indices() {
    let mut store = PlayerStateStore::new(vec![secs(10), secs(20)], 9, PlayMode::Sequential, 1.0);
    assert_eq!(store.snapshot().index, 0);

    assert_eq!(store.set_time(secs(15)), secs(10));
    store.set_index(1).unwrap();
    assert_eq!(store.set_time(secs(15)), secs(15));

    let before = store.snapshot();
    assert!(matches!(
        store.set_index(2),
        Err(PlayerError::IndexOutOfRange { index: 2, len: 2 })
    ));
    assert_eq!(store.snapshot(), before);
}

#[test]
fn engine_never_binds_two_resources() {
    let catalog = fake::catalog(&[("a", 10), ("b", 20)]);
    let (backend, deck) = FakeBackend::new();
    let mut engine = PlaybackEngine::new(backend);

    engine.load(0, catalog.get(0).unwrap(), 0.4).unwrap();
    engine.load(1, catalog.get(1).unwrap(), 0.4).unwrap();
    engine.load(0, catalog.get(0).unwrap(), 0.4).unwrap();

    let d = deck.borrow();
    assert_eq!(d.live, 1);
    assert_eq!(d.peak_live, 1);
    assert_eq!(d.volume, 0.4);
    assert_eq!(engine.bound_index(), Some(0));
}

#[test]
fn engine_play_failure_is_reported_not_raised() {
    let catalog = fake::catalog(&[("a", 10)]);
    let (backend, deck) = FakeBackend::new();
    let mut engine = PlaybackEngine::new(backend);

    assert!(!engine.play());

    engine.load(0, catalog.get(0).unwrap(), 1.0).unwrap();
    deck.borrow_mut().fail_play = true;
    assert!(!engine.play());
    deck.borrow_mut().fail_play = false;
    assert!(engine.play());
}

#[test]
fn engine_releases_on_drop() {
    let catalog = fake::catalog(&[("a", 10)]);
    let (backend, deck) = FakeBackend::new();
    {
        let mut engine = PlaybackEngine::new(backend);
        engine.load(0, catalog.get(0).unwrap(), 1.0).unwrap();
        assert_eq!(deck.borrow().live, 1);
    }
    assert_eq!(deck.borrow().live, 0);
    assert_eq!(deck.borrow().bound, None);
}

struct Rig {
    catalog: crate::catalog::Catalog,
    store: PlayerStateStore,
    engine: PlaybackEngine<FakeBackend>,
    coordinator: TransitionCoordinator,
    deck: std::rc::Rc<std::cell::RefCell<fake::Deck>>,
    rng: StdRng,
}

impl Rig {
    fn new(mode: PlayMode, boundary: SequentialBoundary) -> Self {
        let catalog = fake::catalog(&[("a", 10), ("b", 20), ("c", 30), ("d", 40)]);
        let (backend, deck) = FakeBackend::new();
        let mut engine = PlaybackEngine::new(backend);
        engine.load(0, catalog.get(0).unwrap(), 1.0).unwrap();
        let store = PlayerStateStore::new(catalog.durations(), 0, mode, 1.0);
        Self {
            catalog,
            store,
            engine,
            coordinator: TransitionCoordinator::new(SETTLE, boundary),
            deck,
            rng: rng(),
        }
    }

    fn start_playing(&mut self) {
        assert!(self.engine.play());
        self.store.set_playing(true);
    }

    fn switch(&mut self, target: Target, now: Instant) -> Result<SwitchOutcome, PlayerError> {
        self.coordinator.switch(
            target,
            &mut self.store,
            &mut self.engine,
            &self.catalog,
            &mut self.rng,
            now,
        )
    }

    fn service(&mut self, now: Instant) -> Option<bool> {
        self.coordinator
            .service(&mut self.store, &mut self.engine, now)
    }
}

#[test]
fn sequential_switch_sets_index_resets_time_and_resumes_after_settle() {
    for i in 0..4 {
        let mut rig = Rig::new(PlayMode::Sequential, SequentialBoundary::Wrap);
        let t0 = Instant::now();
        rig.start_playing();
        rig.store.set_time(secs(5));

        let outcome = rig.switch(Target::Index(i), t0).unwrap();
        assert_eq!(outcome.to(), i);

        let s = rig.store.snapshot();
        assert_eq!(s.index, i);
        assert_eq!(s.time, Duration::ZERO);
        assert!(!s.playing);

        assert_eq!(rig.service(t0 + SETTLE / 2), None);
        assert!(!rig.store.snapshot().playing);

        assert_eq!(rig.service(t0 + SETTLE), Some(true));
        assert!(rig.store.snapshot().playing);
        assert_eq!(rig.deck.borrow().bound, Some(fake::path(["a", "b", "c", "d"][i])));
    }
}

#[test]
fn paused_switch_does_not_resume() {
    let mut rig = Rig::new(PlayMode::Sequential, SequentialBoundary::Wrap);
    let t0 = Instant::now();

    let outcome = rig.switch(Target::Step(Direction::Forward), t0).unwrap();
    assert_eq!(
        outcome,
        SwitchOutcome::Switched {
            from: 0,
            to: 1,
            resume_pending: false
        }
    );
    assert_eq!(rig.service(t0 + SETTLE * 2), None);
    assert!(!rig.store.snapshot().playing);
}

#[test]
fn repeat_switch_keeps_index_and_resets_time() {
    let mut rig = Rig::new(PlayMode::Repeat, SequentialBoundary::Wrap);
    let t0 = Instant::now();
    rig.start_playing();
    rig.store.set_time(secs(8));

    rig.switch(Target::Step(Direction::Forward), t0).unwrap();
    rig.switch(Target::Index(3), t0).unwrap();

    let s = rig.store.snapshot();
    assert_eq!(s.index, 0);
    assert_eq!(s.time, Duration::ZERO);
}

#[test]
fn shuffle_switch_stays_in_range() {
    let mut rig = Rig::new(PlayMode::Shuffle, SequentialBoundary::Stop);
    let t0 = Instant::now();
    for _ in 0..50 {
        rig.switch(Target::Step(Direction::Forward), t0).unwrap();
        let s = rig.store.snapshot();
        assert!(s.index < rig.catalog.len());
        assert_eq!(rig.engine.bound_index(), Some(s.index));
    }
}

#[test]
fn out_of_range_switch_changes_nothing() {
    let mut rig = Rig::new(PlayMode::Sequential, SequentialBoundary::Stop);
    let t0 = Instant::now();
    rig.start_playing();
    rig.store.set_time(secs(3));
    let before = rig.store.snapshot();
    let generation = rig.coordinator.generation();

    assert!(matches!(
        rig.switch(Target::Step(Direction::Backward), t0),
        Err(PlayerError::IndexOutOfRange { index: -1, len: 4 })
    ));
    assert!(rig.switch(Target::Index(9), t0).is_err());

    assert_eq!(rig.store.snapshot(), before);
    assert_eq!(rig.coordinator.generation(), generation);
    assert_eq!(rig.deck.borrow().opened.len(), 1);
}

#[test]
fn failed_load_keeps_new_index_and_stops() {
    let mut rig = Rig::new(PlayMode::Sequential, SequentialBoundary::Wrap);
    let t0 = Instant::now();
    rig.start_playing();
    rig.deck.borrow_mut().fail_open.insert(fake::path("b"));

    let outcome = rig.switch(Target::Step(Direction::Forward), t0).unwrap();
    assert_eq!(outcome, SwitchOutcome::LoadFailed { from: 0, to: 1 });

    let s = rig.store.snapshot();
    assert_eq!(s.index, 1);
    assert!(!s.playing);
    assert_eq!(rig.engine.bound_index(), None);
    assert_eq!(rig.service(t0 + SETTLE), None);
    assert!(!rig.store.snapshot().playing);
}

#[test]
fn newer_switch_supersedes_pending_resume() {
    let mut rig = Rig::new(PlayMode::Sequential, SequentialBoundary::Wrap);
    let t0 = Instant::now();
    rig.start_playing();

    rig.switch(Target::Index(1), t0).unwrap();
    let first_generation = rig.coordinator.generation();
    rig.switch(Target::Index(2), t0 + SETTLE / 2).unwrap();
    assert!(rig.coordinator.generation() > first_generation);

    // The first resume is due here but belongs to a superseded switch.
    assert_eq!(rig.service(t0 + SETTLE), None);
    assert_eq!(rig.deck.borrow().play_calls, 1);
    assert!(!rig.store.snapshot().playing);

    assert_eq!(rig.service(t0 + SETTLE / 2 + SETTLE), Some(true));
    let d = rig.deck.borrow();
    assert_eq!(d.bound, Some(fake::path("c")));
    assert_eq!(d.live, 1);
    assert_eq!(d.play_calls, 2);
    assert_eq!(rig.store.snapshot().index, 2);
}

#[test]
fn supersede_drops_queued_resume() {
    let mut rig = Rig::new(PlayMode::Sequential, SequentialBoundary::Wrap);
    let t0 = Instant::now();
    rig.start_playing();

    rig.switch(Target::Index(1), t0).unwrap();
    assert!(rig.coordinator.resume_pending());
    rig.coordinator.supersede();
    assert!(!rig.coordinator.resume_pending());

    assert_eq!(rig.service(t0 + SETTLE), None);
    assert!(!rig.store.snapshot().playing);
}

#[test]
fn ready_signal_resumes_before_settle_delay() {
    let mut rig = Rig::new(PlayMode::Sequential, SequentialBoundary::Wrap);
    let t0 = Instant::now();
    rig.start_playing();
    rig.deck.borrow_mut().readiness = Readiness::Pending;

    rig.switch(Target::Index(1), t0).unwrap();
    assert_eq!(rig.service(t0), None);

    rig.deck.borrow_mut().readiness = Readiness::Ready;
    assert_eq!(rig.service(t0), Some(true));
    assert!(rig.store.snapshot().playing);
}

#[test]
fn failed_resume_leaves_playback_stopped() {
    let mut rig = Rig::new(PlayMode::Sequential, SequentialBoundary::Wrap);
    let t0 = Instant::now();
    rig.start_playing();

    rig.switch(Target::Index(1), t0).unwrap();
    rig.deck.borrow_mut().fail_play = true;
    assert_eq!(rig.service(t0 + SETTLE), Some(false));
    assert!(!rig.store.snapshot().playing);
}

#[test]
fn file_index_store_round_trips_and_tolerates_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("last_index");

    let mut store = FileIndexStore::new(path.clone());
    assert_eq!(store.load(), None);

    store.save(2).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "2");
    assert_eq!(FileIndexStore::new(path.clone()).load(), Some(2));

    std::fs::write(&path, "not a number").unwrap();
    assert_eq!(FileIndexStore::new(path).load(), None);
}
