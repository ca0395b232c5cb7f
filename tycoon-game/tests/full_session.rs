use chrono::{Duration, NaiveDate};
use tycoon_game::{
    Area, Catalog, ChallengeStatus, Clock, EngineConfig, LoginOutcome, ManualClock,
    PlayerSnapshot, Rejection, SeededSource, TycoonEngine,
};

type TestEngine = TycoonEngine<SeededSource, ManualClock>;

fn start(seed: u64) -> (TestEngine, ManualClock) {
    let clock = ManualClock::at_midnight(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    clock.advance(Duration::hours(7));
    let engine = TycoonEngine::new(
        EngineConfig::default(),
        Catalog::embedded().clone(),
        SeededSource::from_user_seed(seed),
        clock.clone(),
    );
    (engine, clock)
}

/// Work through every available task, hydrating or resting when low.
fn play_day(engine: &mut TestEngine, clock: &ManualClock) {
    for _ in 0..40 {
        let stamina = engine.character().stamina();
        if engine.character().hydration() < 30 {
            engine.drink_water();
            continue;
        }
        if stamina < 20 {
            engine.rest_character().unwrap();
            continue;
        }
        let ready: Vec<String> = engine
            .tasks()
            .iter()
            .filter(|task| !engine.cooldowns().is_on_cooldown(&task.id, clock.now()))
            .map(|task| task.id.clone())
            .collect();
        for task_id in ready {
            match engine.complete_task(&task_id) {
                Ok(_) | Err(Rejection::InsufficientEnergy) => {}
                Err(other) => panic!("unexpected rejection {other:?}"),
            }
        }
        clock.advance(Duration::seconds(30));
        engine.tick_now();
    }
}

#[test]
fn week_of_play_builds_streak_and_economy() {
    let (mut engine, clock) = start(0x5EED);
    let mut bonuses = 0;
    for day in 0..8 {
        let login = engine.start_session();
        if day == 0 {
            assert_eq!(login, LoginOutcome::Reset { streak: 1 });
        } else {
            assert_eq!(login.streak(), day + 1);
        }
        bonuses += login.bonus();
        play_day(&mut engine, &clock);
        let tomorrow = NaiveDate::from_ymd_opt(2024, 3, 2 + day).unwrap();
        clock.set(ManualClock::at_midnight(tomorrow).now() + Duration::hours(7));
    }

    let state = engine.state();
    assert_eq!(state.streak, 8);
    assert_eq!(state.stats.streak_record, 8);
    assert_eq!(bonuses, 10 + 15 + 20 + 25 + 30 + 70 + 80);
    assert!(state.stats.workouts_completed > 8);
    assert!(state.stats.coins_earned > 0);
    let fixed_income = u64::from(state.stats.water_drank) * 5;
    let lifetime = 100 + bonuses + fixed_income + state.stats.coins_earned;
    assert_eq!(state.coins, lifetime);
}

#[test]
fn spending_unlocks_areas_and_pool_grows() {
    let (mut engine, clock) = start(42);
    engine.start_session();
    while engine.state().coins < 600 {
        play_day(&mut engine, &clock);
        clock.advance(Duration::hours(1));
    }
    engine.purchase_upgrade("homearea").unwrap();
    assert!(engine.state().is_unlocked(Area::Home));
    let areas: Vec<Area> = engine.tasks().iter().map(|task| task.area).collect();
    assert_eq!(areas, vec![Area::Cardio, Area::Strength, Area::Home]);

    engine.select_area(Area::Home).unwrap();
    engine.rest_character().unwrap();
    assert_eq!(
        engine.select_area(Area::Wellness),
        Err(Rejection::AreaLocked {
            area: Area::Wellness
        })
    );
}

#[test]
fn challenges_roll_over_at_midnight() {
    let (mut engine, clock) = start(9);
    engine.start_session();
    let first: Vec<String> = engine.challenges().iter().map(|c| c.id.clone()).collect();
    assert_eq!(first.len(), 3);

    clock.advance(Duration::hours(16) + Duration::minutes(59));
    engine.tick_now();
    assert!(
        engine
            .challenges()
            .iter()
            .all(|c| c.status(clock.now()) != ChallengeStatus::Expired)
    );
    assert_eq!(
        engine
            .challenges()
            .iter()
            .map(|c| c.id.clone())
            .collect::<Vec<_>>(),
        first
    );

    clock.advance(Duration::minutes(1));
    let report = engine.tick_now();
    assert_eq!(report.challenges.expired, 3);
    assert_eq!(engine.challenges().len(), 3);
    assert!(engine.challenges().iter().all(|c| !first.contains(&c.id)));
}

#[test]
fn resumed_profile_regenerates_session_state() {
    let (mut engine, clock) = start(77);
    engine.start_session();
    play_day(&mut engine, &clock);
    let json = engine.snapshot().to_json().unwrap();

    let snapshot = PlayerSnapshot::from_json(&json).unwrap();
    let mut resumed = TycoonEngine::from_snapshot(
        snapshot,
        EngineConfig::default(),
        Catalog::embedded().clone(),
        SeededSource::from_user_seed(78),
        clock.clone(),
    );
    assert_eq!(resumed.state(), engine.state());
    assert!(resumed.cooldowns().is_empty());
    assert!(resumed.challenges().is_empty());

    assert_eq!(
        resumed.start_session(),
        LoginOutcome::AlreadyCheckedIn { streak: 1 }
    );
    assert_eq!(resumed.challenges().len(), 3);
}
