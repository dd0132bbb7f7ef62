//! Projectile animation state machine.
//!
//! The animation is a pure function of `(state, event)`: nothing here owns a
//! timer. A driver (terminal loop, UI frame callback, test) feeds
//! [`AnimationEvent::Tick`] at a fixed interval and renders whatever state
//! comes back. Once the state leaves `Running`, further ticks are no-ops, so
//! stopping is synchronous and there is nothing left to cancel.
//!
//! ```text
//! Idle ──Play──▶ Running{t} ──Tick──▶ Running{t+dt}
//!                   │    │
//!                 Pause  └─Tick (h ≤ 0 or x ≥ limit)─▶ Stopped{t, Landed|OutOfBounds}
//!                   ▼
//!           Stopped{t, Paused} ──Play──▶ Running{t}
//! any ──Reset──▶ Idle
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::domains::mechanics::{MechanicsParams, Trajectory};
use crate::engine::clock::AnimationClock;
use crate::engine::SimTime;

/// Why the animation is not advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StopReason {
    /// Stopped by the user; `Play` resumes.
    Paused,
    /// The projectile reached the ground.
    Landed,
    /// The projectile left the drawable area.
    OutOfBounds,
}

/// Animation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum AnimationState {
    /// At the launch point, never started.
    #[default]
    Idle,
    /// Advancing; `t` is the time of the displayed frame.
    Running {
        /// Elapsed flight time.
        t: SimTime,
    },
    /// Not advancing; `t` is the last valid frame.
    Stopped {
        /// Elapsed flight time of the last valid frame.
        t: SimTime,
        /// Why it stopped.
        reason: StopReason,
    },
}

impl AnimationState {
    /// Flight time of the displayed frame.
    #[must_use]
    pub const fn time(&self) -> SimTime {
        match self {
            Self::Idle => SimTime::ZERO,
            Self::Running { t } | Self::Stopped { t, .. } => *t,
        }
    }

    /// True while ticks advance the animation.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    /// True once the flight has ended (landed or out of bounds).
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(
            self,
            Self::Stopped {
                reason: StopReason::Landed | StopReason::OutOfBounds,
                ..
            }
        )
    }

    /// Short label for readouts.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running { .. } => "running",
            Self::Stopped {
                reason: StopReason::Paused,
                ..
            } => "paused",
            Self::Stopped {
                reason: StopReason::Landed,
                ..
            } => "landed",
            Self::Stopped {
                reason: StopReason::OutOfBounds,
                ..
            } => "out-of-bounds",
        }
    }
}

/// Inputs to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationEvent {
    /// Start, resume or relaunch.
    Play,
    /// Stop advancing, keep position.
    Pause,
    /// One clock interval elapsed.
    Tick,
    /// Back to the launch point.
    Reset,
}

/// World-to-canvas mapping for the projectile view.
///
/// Canvas `y` grows downwards, so height is subtracted from the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ScreenProjection {
    /// Canvas x of the launch point (px).
    pub origin_x: f64,
    /// Canvas y of the ground line (px).
    pub origin_y: f64,
    /// Pixels per metre.
    #[validate(range(exclusive_min = 0.0))]
    pub scale: f64,
    /// Canvas x at which the projectile counts as out of bounds (px).
    pub x_limit: f64,
}

impl Default for ScreenProjection {
    fn default() -> Self {
        Self {
            origin_x: 50.0,
            origin_y: 300.0,
            scale: 15.0,
            x_limit: 700.0,
        }
    }
}

impl ScreenProjection {
    /// Map world `(x, h)` in metres to canvas pixels.
    #[must_use]
    pub fn to_screen(&self, x: f64, h: f64) -> (f64, f64) {
        (
            x.mul_add(self.scale, self.origin_x),
            h.mul_add(-self.scale, self.origin_y),
        )
    }

    /// True if world `x` maps at or past the canvas limit.
    #[must_use]
    pub fn is_out_of_bounds(&self, x: f64) -> bool {
        self.to_screen(x, 0.0).0 >= self.x_limit
    }
}

/// Apply one event.
///
/// Total over every `(state, event)` pair; combinations with no meaning
/// (ticking while idle, pausing while stopped) return the state unchanged.
#[must_use]
pub fn transition(
    state: AnimationState,
    event: AnimationEvent,
    trajectory: &Trajectory,
    projection: &ScreenProjection,
    dt: SimTime,
) -> AnimationState {
    use AnimationEvent as E;
    use AnimationState as S;

    match (state, event) {
        (_, E::Reset) => S::Idle,
        (S::Idle, E::Play) => S::Running { t: SimTime::ZERO },
        (
            S::Stopped {
                t,
                reason: StopReason::Paused,
            },
            E::Play,
        ) => S::Running { t },
        (S::Stopped { .. }, E::Play) => S::Running { t: SimTime::ZERO },
        (S::Running { t }, E::Pause) => S::Stopped {
            t,
            reason: StopReason::Paused,
        },
        (S::Running { t }, E::Tick) => {
            let next = t + dt;
            let secs = next.as_secs_f64();
            let (x, h) = trajectory.position_at(secs);
            if h.is_nan() || h <= 0.0 {
                S::Stopped {
                    t,
                    reason: StopReason::Landed,
                }
            } else if !x.is_finite() || projection.is_out_of_bounds(x) {
                S::Stopped {
                    t,
                    reason: StopReason::OutOfBounds,
                }
            } else {
                S::Running { t: next }
            }
        }
        (s, E::Play | E::Pause | E::Tick) => s,
    }
}

/// One rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationFrame {
    /// Ticks taken since launch.
    pub tick: u64,
    /// Flight time (s).
    pub t: f64,
    /// Horizontal distance (m).
    pub x: f64,
    /// Height (m).
    pub h: f64,
    /// Canvas x (px).
    pub screen_x: f64,
    /// Canvas y (px).
    pub screen_y: f64,
    /// State after this frame.
    pub state: AnimationState,
}

/// A projectile animation driven by an [`AnimationClock`].
#[derive(Debug, Clone)]
pub struct ProjectileAnimation {
    trajectory: Trajectory,
    projection: ScreenProjection,
    clock: AnimationClock,
    state: AnimationState,
}

impl ProjectileAnimation {
    /// Create an idle animation for the given launch.
    #[must_use]
    pub fn new(params: &MechanicsParams, projection: ScreenProjection, clock: AnimationClock) -> Self {
        Self {
            trajectory: params.trajectory(),
            projection,
            clock,
            state: AnimationState::Idle,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> AnimationState {
        self.state
    }

    /// The clock driving this animation.
    #[must_use]
    pub const fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    /// The trajectory being animated.
    #[must_use]
    pub const fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Apply an event and return the new state.
    ///
    /// The clock counts only ticks that advance the flight, so a frame's
    /// `tick` always equals `t / dt`. Reset and relaunch rewind it.
    pub fn apply(&mut self, event: AnimationEvent) -> AnimationState {
        let before = self.state;
        self.state = transition(
            before,
            event,
            &self.trajectory,
            &self.projection,
            self.clock.timestep(),
        );
        if event == AnimationEvent::Tick && before.is_running() && self.state.is_running() {
            self.clock.tick();
        }
        let relaunched = event == AnimationEvent::Play && before.is_finished();
        if event == AnimationEvent::Reset || relaunched {
            self.clock.reset();
        }
        if before != self.state && !self.state.is_running() {
            debug!(from = before.label(), to = self.state.label(), t = %self.state.time(), "animation stopped");
        }
        self.state
    }

    /// The frame for the current state.
    #[must_use]
    pub fn frame(&self) -> AnimationFrame {
        let t = self.state.time().as_secs_f64();
        let (x, h) = self.trajectory.position_at(t);
        let (screen_x, screen_y) = self.projection.to_screen(x, h);
        AnimationFrame {
            tick: self.clock.tick_count(),
            t,
            x,
            h,
            screen_x,
            screen_y,
            state: self.state,
        }
    }

    /// Play from the current state until the flight ends, the user-level tick
    /// cap on the clock is reached, or the animation otherwise stops.
    ///
    /// Returns the starting frame followed by one frame per tick.
    pub fn run_to_end(&mut self) -> Vec<AnimationFrame> {
        self.apply(AnimationEvent::Play);
        let mut frames = vec![self.frame()];
        while self.state.is_running() && !self.clock.exhausted() {
            self.apply(AnimationEvent::Tick);
            frames.push(self.frame());
        }
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clock::DEFAULT_TICK_NANOS;

    fn traj(v: f64, angle: f64) -> Trajectory {
        MechanicsParams::new(5.0, v, angle).trajectory()
    }

    fn dt() -> SimTime {
        AnimationClock::default().timestep()
    }

    fn step(state: AnimationState, event: AnimationEvent, t: &Trajectory) -> AnimationState {
        transition(state, event, t, &ScreenProjection::default(), dt())
    }

    #[test]
    fn test_idle_play_starts_at_zero() {
        let t = traj(10.0, 45.0);
        let s = step(AnimationState::Idle, AnimationEvent::Play, &t);
        assert_eq!(s, AnimationState::Running { t: SimTime::ZERO });
    }

    #[test]
    fn test_tick_advances() {
        let t = traj(10.0, 45.0);
        let s = step(AnimationState::Running { t: SimTime::ZERO }, AnimationEvent::Tick, &t);
        assert_eq!(s, AnimationState::Running { t: dt() });
    }

    #[test]
    fn test_pause_and_resume_keep_time() {
        let t = traj(10.0, 45.0);
        let at = SimTime::from_nanos(300_000_000);
        let paused = step(AnimationState::Running { t: at }, AnimationEvent::Pause, &t);
        assert_eq!(
            paused,
            AnimationState::Stopped {
                t: at,
                reason: StopReason::Paused
            }
        );
        assert_eq!(step(paused, AnimationEvent::Tick, &t), paused);
        assert_eq!(step(paused, AnimationEvent::Play, &t), AnimationState::Running { t: at });
    }

    #[test]
    fn test_landed_relaunches_from_zero() {
        let t = traj(10.0, 45.0);
        let landed = AnimationState::Stopped {
            t: SimTime::from_secs(1.4),
            reason: StopReason::Landed,
        };
        assert_eq!(
            step(landed, AnimationEvent::Play, &t),
            AnimationState::Running { t: SimTime::ZERO }
        );
    }

    #[test]
    fn test_reset_from_anywhere() {
        let t = traj(10.0, 45.0);
        for s in [
            AnimationState::Idle,
            AnimationState::Running { t: dt() },
            AnimationState::Stopped {
                t: dt(),
                reason: StopReason::OutOfBounds,
            },
        ] {
            assert_eq!(step(s, AnimationEvent::Reset, &t), AnimationState::Idle);
        }
    }

    #[test]
    fn test_idle_ignores_tick_and_pause() {
        let t = traj(10.0, 45.0);
        assert_eq!(step(AnimationState::Idle, AnimationEvent::Tick, &t), AnimationState::Idle);
        assert_eq!(step(AnimationState::Idle, AnimationEvent::Pause, &t), AnimationState::Idle);
    }

    #[test]
    fn test_flat_launch_lands_on_first_tick() {
        let t = traj(10.0, 0.0);
        let s = step(AnimationState::Running { t: SimTime::ZERO }, AnimationEvent::Tick, &t);
        assert_eq!(
            s,
            AnimationState::Stopped {
                t: SimTime::ZERO,
                reason: StopReason::Landed
            }
        );
    }

    #[test]
    fn test_default_flight_lands() {
        let mut anim = ProjectileAnimation::new(
            &MechanicsParams::default(),
            ScreenProjection::default(),
            AnimationClock::default(),
        );
        let frames = anim.run_to_end();
        let last = frames.last().copied().expect("frames");
        assert!(last.state.is_finished());
        assert!(matches!(
            last.state,
            AnimationState::Stopped {
                reason: StopReason::Landed,
                ..
            }
        ));
        // flight_time ≈ 1.4416 s, 50 ms ticks: the 29th tick would reach 1.45 s.
        assert_eq!(last.tick, 28);
        assert!((last.t - 1.40).abs() < 1e-9);
        assert!(last.h >= 0.0);
        assert_eq!(frames.len(), 30);
    }

    #[test]
    fn test_fast_launch_leaves_canvas() {
        let mut anim = ProjectileAnimation::new(
            &MechanicsParams::new(5.0, 30.0, 45.0),
            ScreenProjection::default(),
            AnimationClock::default(),
        );
        let frames = anim.run_to_end();
        let last = frames.last().copied().expect("frames");
        assert!(matches!(
            last.state,
            AnimationState::Stopped {
                reason: StopReason::OutOfBounds,
                ..
            }
        ));
        assert!(last.screen_x < 700.0);
        assert!(frames.iter().all(|f| f.screen_x < 700.0));
    }

    #[test]
    fn test_frames_never_below_ground() {
        for angle in [0.0, 15.0, 45.0, 75.0, 90.0] {
            let mut anim = ProjectileAnimation::new(
                &MechanicsParams::new(5.0, 12.0, angle),
                ScreenProjection::default(),
                AnimationClock::default(),
            );
            for f in anim.run_to_end() {
                assert!(f.h >= -1e-9, "angle {angle}: h = {}", f.h);
                assert!(f.screen_y <= 300.0 + 1e-6);
            }
        }
    }

    #[test]
    fn test_max_ticks_caps_run() {
        let mut clock = AnimationClock::default();
        clock.set_max_ticks(5);
        let mut anim =
            ProjectileAnimation::new(&MechanicsParams::default(), ScreenProjection::default(), clock);
        let frames = anim.run_to_end();
        assert_eq!(frames.len(), 6);
        assert!(anim.state().is_running());
    }

    #[test]
    fn test_stopping_tick_not_counted() {
        for velocity in [10.0, 30.0] {
            let mut anim = ProjectileAnimation::new(
                &MechanicsParams::new(5.0, velocity, 45.0),
                ScreenProjection::default(),
                AnimationClock::default(),
            );
            let frames = anim.run_to_end();
            assert!(anim.state().is_finished());
            for f in &frames {
                assert_eq!(SimTime::from_nanos(f.tick * DEFAULT_TICK_NANOS).as_secs_f64(), f.t);
            }
            assert_eq!(anim.clock().current_time(), anim.state().time());
        }
    }

    #[test]
    fn test_reset_rewinds_clock() {
        let mut anim = ProjectileAnimation::new(
            &MechanicsParams::default(),
            ScreenProjection::default(),
            AnimationClock::default(),
        );
        anim.apply(AnimationEvent::Play);
        anim.apply(AnimationEvent::Tick);
        anim.apply(AnimationEvent::Tick);
        assert_eq!(anim.clock().tick_count(), 2);
        assert_eq!(anim.apply(AnimationEvent::Reset), AnimationState::Idle);
        assert_eq!(anim.clock().tick_count(), 0);
        assert_eq!(anim.frame().t, 0.0);
    }

    #[test]
    fn test_pause_stops_clock() {
        let mut anim = ProjectileAnimation::new(
            &MechanicsParams::default(),
            ScreenProjection::default(),
            AnimationClock::default(),
        );
        anim.apply(AnimationEvent::Play);
        anim.apply(AnimationEvent::Tick);
        anim.apply(AnimationEvent::Pause);
        anim.apply(AnimationEvent::Tick);
        anim.apply(AnimationEvent::Tick);
        assert_eq!(anim.clock().tick_count(), 1);
        assert_eq!(anim.state().time(), SimTime::from_nanos(50_000_000));
    }

    #[test]
    fn test_projection() {
        let p = ScreenProjection::default();
        assert_eq!(p.to_screen(0.0, 0.0), (50.0, 300.0));
        assert_eq!(p.to_screen(2.0, 1.0), (80.0, 285.0));
        assert!(!p.is_out_of_bounds(43.0));
        assert!(p.is_out_of_bounds(43.4));
    }

    #[test]
    fn test_state_serde() {
        let s = AnimationState::Stopped {
            t: SimTime::from_nanos(5),
            reason: StopReason::OutOfBounds,
        };
        let json = serde_json::to_string(&s).expect("serialize");
        assert!(json.contains("\"state\":\"stopped\""));
        assert!(json.contains("out-of-bounds"));
        let back: AnimationState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, s);
    }
}
