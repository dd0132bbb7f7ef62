//! Projectile animation driven end to end through the public API.

use physlab::prelude::*;

fn animation(params: MechanicsParams) -> ProjectileAnimation {
    LabConfig::default().animation(&params)
}

#[test]
fn default_launch_lands_after_flight_time_over_tick() {
    let params = MechanicsParams::default();
    let flight_time = Mechanics::compute_results(&params).unwrap().flight_time;
    let mut anim = animation(params);

    let frames = anim.run_to_end();
    let last = frames.last().unwrap();

    assert_eq!(
        last.state,
        AnimationState::Stopped {
            t: SimTime::from_nanos(1_400_000_000),
            reason: StopReason::Landed,
        }
    );
    // The last frame is the last tick still above ground.
    let expected_ticks = (flight_time / 0.05).floor() as u64;
    assert_eq!(last.tick, expected_ticks);
    assert!((last.t - last.tick as f64 * 0.05).abs() < 1e-12);
}

#[test]
fn frames_follow_the_trajectory() {
    let params = MechanicsParams::new(5.0, 15.0, 60.0);
    let trajectory = params.trajectory();
    let mut anim = animation(params);
    for frame in anim.run_to_end() {
        let (x, h) = trajectory.position_at(frame.t);
        assert!((frame.x - x).abs() < 1e-12);
        assert!((frame.h - h).abs() < 1e-12);
        assert!(frame.h >= 0.0);
    }
}

#[test]
fn pause_freezes_and_play_resumes() {
    let mut anim = animation(MechanicsParams::default());
    anim.apply(AnimationEvent::Play);
    for _ in 0..5 {
        anim.apply(AnimationEvent::Tick);
    }
    let paused = anim.apply(AnimationEvent::Pause);
    let frozen = anim.frame();
    for _ in 0..10 {
        assert_eq!(anim.apply(AnimationEvent::Tick), paused);
    }
    assert_eq!(anim.frame(), frozen);

    anim.apply(AnimationEvent::Play);
    anim.apply(AnimationEvent::Tick);
    assert_eq!(anim.state(), AnimationState::Running {
        t: SimTime::from_nanos(300_000_000)
    });
}

#[test]
fn reset_returns_to_launch_point() {
    let mut anim = animation(MechanicsParams::default());
    anim.run_to_end();
    assert!(anim.state().is_finished());

    assert_eq!(anim.apply(AnimationEvent::Reset), AnimationState::Idle);
    let frame = anim.frame();
    assert_eq!((frame.screen_x, frame.screen_y), (50.0, 300.0));
    assert_eq!(frame.tick, 0);
}

#[test]
fn replay_after_landing_is_identical() {
    let mut anim = animation(MechanicsParams::new(3.0, 18.0, 35.0));
    let first = anim.run_to_end();
    let second = anim.run_to_end();
    assert_eq!(first, second);
}

#[test]
fn flat_launch_lands_on_first_tick() {
    let mut anim = animation(MechanicsParams::new(5.0, 20.0, 0.0));
    let frames = anim.run_to_end();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[1].t, 0.0);
    assert!(frames[1].state.is_finished());
}

#[test]
fn custom_tick_interval() {
    let config = LabConfig::builder().tick_ms(10).build();
    let mut anim = config.animation(&MechanicsParams::default());
    let frames = anim.run_to_end();
    let last = frames.last().unwrap();
    assert_eq!(last.tick, 144);
    assert!((last.t - 1.44).abs() < 1e-12);
}

#[test]
fn transition_is_usable_without_the_driver() {
    let trajectory = Trajectory::launch(10.0, 45.0);
    let projection = ScreenProjection::default();
    let dt = AnimationClock::default().timestep();

    let mut state = AnimationState::Idle;
    for event in [AnimationEvent::Play, AnimationEvent::Tick, AnimationEvent::Tick] {
        state = physlab::engine::transition(state, event, &trajectory, &projection, dt);
    }
    assert_eq!(state, AnimationState::Running {
        t: SimTime::from_nanos(100_000_000)
    });
}
