//! Deterministic tween and timer facility
//!
//! Advanced explicitly by the host with a frame delta, so the same sequence
//! of `advance` calls always yields the same property values and cues.

use std::collections::HashMap;

use super::{Cue, Ease, Goal, Prop, Target, Tween, TweenFacility, TweenId};

/// One property interpolated by a tween
#[derive(Debug, Clone)]
struct Track {
    prop: Prop,
    from: f32,
    to: f32,
}

#[derive(Debug, Clone)]
struct ActiveTween {
    id: TweenId,
    target: Target,
    tracks: Vec<Track>,
    start_time: f64,
    duration: f32,
    ease: Ease,
    yoyo: bool,
    repeat: u32,
    started: bool,
    on_start: Option<Cue>,
    on_complete: Option<Cue>,
}

impl ActiveTween {
    fn total_duration(&self) -> f32 {
        self.duration * (self.repeat + 1) as f32
    }

    /// Position between `from` (0) and `to` (1) after easing and yoyo
    fn progress(&self, elapsed: f32) -> f32 {
        if self.duration <= 0.0 || elapsed >= self.total_duration() {
            let reversed = self.yoyo && self.repeat % 2 == 1;
            return if reversed { 0.0 } else { 1.0 };
        }
        let cycle = (elapsed / self.duration).floor();
        let local = (elapsed - cycle * self.duration) / self.duration;
        if self.yoyo && (cycle as u32) % 2 == 1 {
            self.ease.apply(1.0 - local)
        } else {
            self.ease.apply(local)
        }
    }
}

#[derive(Debug, Clone)]
struct Timer {
    due: f64,
    cue: Cue,
}

/// In-process [`TweenFacility`]
///
/// The clock is kept in `f64` so a scene left running for weeks still
/// resolves single frame steps.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    now: f64,
    tweens: Vec<ActiveTween>,
    /// Sorted by due time; equal times keep issue order
    timers: Vec<Timer>,
    values: HashMap<(Target, Prop), f32>,
    next_id: u64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since creation
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Advance by `dt` seconds, apply tween values and return due cues.
    ///
    /// Cues come back in the order: delayed calls, then tween starts and
    /// completions in issue order.
    pub fn advance(&mut self, dt: f32) -> Vec<Cue> {
        self.now += f64::from(dt.max(0.0));
        let now = self.now;
        let mut cues = Vec::new();

        let due = self.timers.partition_point(|t| t.due <= now);
        cues.extend(self.timers.drain(..due).map(|t| t.cue));

        let mut finished = Vec::new();
        for tween in &mut self.tweens {
            if !tween.started {
                tween.started = true;
                if let Some(cue) = tween.on_start.take() {
                    cues.push(cue);
                }
            }

            let elapsed = (now - tween.start_time).max(0.0) as f32;
            let p = tween.progress(elapsed);
            for track in &tween.tracks {
                let value = track.from + (track.to - track.from) * p;
                self.values.insert((tween.target, track.prop), value);
            }

            if elapsed >= tween.total_duration() {
                finished.push(tween.id);
                if let Some(cue) = tween.on_complete.take() {
                    cues.push(cue);
                }
            }
        }
        self.tweens.retain(|t| !finished.contains(&t.id));

        cues
    }

    /// Number of tweens still running
    pub fn active_tweens(&self) -> usize {
        self.tweens.len()
    }

    /// Number of delayed calls not yet due
    pub fn pending_calls(&self) -> usize {
        self.timers.len()
    }

    /// Whether any running tween animates `prop` on `target`
    pub fn is_animating(&self, target: Target, prop: Prop) -> bool {
        self.tweens
            .iter()
            .any(|t| t.target == target && t.tracks.iter().any(|tr| tr.prop == prop))
    }

    fn default_value(prop: Prop) -> f32 {
        match prop {
            Prop::Opacity => 1.0,
            _ => 0.0,
        }
    }
}

impl TweenFacility for Timeline {
    fn set(&mut self, target: Target, prop: Prop, value: f32) {
        self.values.insert((target, prop), value);
    }

    fn animate(&mut self, tween: Tween) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;

        if tween.overwrite {
            for active in &mut self.tweens {
                if active.target == tween.target {
                    active
                        .tracks
                        .retain(|tr| !tween.goals.iter().any(|(p, _)| *p == tr.prop));
                }
            }
            // A tween left with nothing to animate is killed along with its cues
            self.tweens.retain(|t| !t.tracks.is_empty());
        }

        let tracks = tween
            .goals
            .iter()
            .map(|&(prop, goal)| {
                let from = self.value(tween.target, prop);
                let to = match goal {
                    Goal::To(v) => v,
                    Goal::By(d) => from + d,
                };
                Track { prop, from, to }
            })
            .collect();

        self.tweens.push(ActiveTween {
            id,
            target: tween.target,
            tracks,
            start_time: self.now,
            duration: tween.duration.max(0.0),
            ease: tween.ease,
            yoyo: tween.yoyo,
            repeat: tween.repeat,
            started: false,
            on_start: tween.on_start,
            on_complete: tween.on_complete,
        });
        id
    }

    fn schedule(&mut self, delay: f32, cue: Cue) {
        let due = self.now + f64::from(delay.max(0.0));
        let at = self.timers.partition_point(|t| t.due <= due);
        self.timers.insert(at, Timer { due, cue });
    }

    fn value(&self, target: Target, prop: Prop) -> f32 {
        self.values
            .get(&(target, prop))
            .copied()
            .unwrap_or_else(|| Self::default_value(prop))
    }

    fn release(&mut self, target: Target) {
        self.tweens.retain(|t| t.target != target);
        self.values.retain(|(t, _), _| *t != target);
    }

    fn clear(&mut self) {
        self.tweens.clear();
        self.timers.clear();
        self.values.retain(|(t, _), _| *t == Target::Beam);
    }
}
