//! Keyframe animation: timed attribute values, discrete or interpolated.
//!
//! An `Animation` is a sorted keyframe list plus an elapsed-time machine
//! advanced once per tick. It yields the value to apply to its bound
//! attribute; the owning object does the applying. `AnimationManager` holds
//! named animations, tracks one current animation, and swallows the
//! exhaustion signal so a finished one-shot simply stops updating the bound
//! value.

use std::collections::HashMap;

use thiserror::Error;
use tui_starfire_types::PointF;

/// A value an animation can produce.
///
/// Interpolation pairs numerics with numerics (yielding `Float`) and points
/// with points (component-wise); any other pairing is a typed error, never a
/// silent fallback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyValue {
    Int(i64),
    Float(f32),
    Point(PointF),
}

impl KeyValue {
    fn as_f32(self) -> Option<f32> {
        match self {
            KeyValue::Int(v) => Some(v as f32),
            KeyValue::Float(v) => Some(v),
            KeyValue::Point(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub time: f32,
    pub value: KeyValue,
}

impl Keyframe {
    pub const fn new(time: f32, value: KeyValue) -> Self {
        Self { time, value }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum AnimationError {
    #[error("animation '{0}' requires at least one keyframe")]
    NoKeyframes(String),
    #[error("cannot interpolate between {0:?} and {1:?}")]
    UnknownTypes(KeyValue, KeyValue),
    #[error("sample time {time} outside keyframe window [{lo}, {hi}]")]
    BoundariesExceeded { time: f32, lo: f32, hi: f32 },
}

/// Result of advancing an animation by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frame {
    /// A value to apply to the bound attribute.
    Value(KeyValue),
    /// Nothing crossed this tick (discrete mode between keyframes).
    Idle,
    /// All keyframes consumed and `looped` is off; the animation is done.
    Finished,
}

#[derive(Debug, Clone)]
pub struct Animation {
    name: String,
    keys: Vec<Keyframe>,
    interp: bool,
    looped: bool,
    elapsed: f32,
    index: usize,
    finished: bool,
}

impl Animation {
    /// Keyframes are sorted ascending by time regardless of input order.
    /// Zero keyframes fails construction.
    pub fn new(
        name: &str,
        mut keys: Vec<Keyframe>,
        interp: bool,
        looped: bool,
    ) -> Result<Self, AnimationError> {
        if keys.is_empty() {
            return Err(AnimationError::NoKeyframes(name.to_string()));
        }
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Ok(Self {
            name: name.to_string(),
            keys,
            interp,
            looped,
            elapsed: 0.0,
            index: 0,
            finished: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    fn rewind(&mut self) {
        self.elapsed = 0.0;
        self.index = 0;
        self.finished = false;
    }

    /// Advance the internal timer by `dt` seconds and sample.
    pub fn advance(&mut self, dt: f32) -> Result<Frame, AnimationError> {
        if self.finished {
            if self.looped {
                self.rewind();
            } else {
                return Ok(Frame::Finished);
            }
        }
        self.elapsed += dt;
        if self.interp {
            self.advance_interpolated()
        } else {
            Ok(self.advance_discrete())
        }
    }

    /// Discrete mode: apply each keyframe's literal value as its time is
    /// reached-or-passed. Several keyframes crossed in one tick collapse to
    /// the last one.
    fn advance_discrete(&mut self) -> Frame {
        let mut emitted = None;
        while self.index < self.keys.len() && self.elapsed >= self.keys[self.index].time {
            emitted = Some(self.keys[self.index].value);
            self.index += 1;
        }
        if self.index == self.keys.len() {
            self.finished = true;
        }
        match emitted {
            Some(v) => Frame::Value(v),
            None => Frame::Idle,
        }
    }

    /// Interpolated mode: advance past any keyframes whose time has been
    /// reached, then blend between the current and next keyframe
    /// proportional to elapsed time. The last keyframe applies literally and
    /// finalizes the animation.
    fn advance_interpolated(&mut self) -> Result<Frame, AnimationError> {
        while self.index + 1 < self.keys.len() && self.elapsed >= self.keys[self.index + 1].time {
            self.index += 1;
        }
        if self.index + 1 == self.keys.len() {
            self.finished = true;
            return Ok(Frame::Value(self.keys[self.index].value));
        }
        let a = self.keys[self.index];
        let b = self.keys[self.index + 1];
        Ok(Frame::Value(interpolate(a, b, self.elapsed)?))
    }
}

/// Linear interpolation between two keyframes at absolute time `t`.
///
/// Point values are decomposed and blended per component; they are never run
/// through the scalar path.
fn interpolate(a: Keyframe, b: Keyframe, t: f32) -> Result<KeyValue, AnimationError> {
    if t < a.time || t > b.time {
        return Err(AnimationError::BoundariesExceeded {
            time: t,
            lo: a.time,
            hi: b.time,
        });
    }
    let span = b.time - a.time;
    let frac = if span <= f32::EPSILON {
        1.0
    } else {
        (t - a.time) / span
    };
    match (a.value, b.value) {
        (KeyValue::Point(p), KeyValue::Point(q)) => Ok(KeyValue::Point(PointF::new(
            p.x + (q.x - p.x) * frac,
            p.y + (q.y - p.y) * frac,
        ))),
        (va, vb) => match (va.as_f32(), vb.as_f32()) {
            (Some(fa), Some(fb)) => Ok(KeyValue::Float(fa + (fb - fa) * frac)),
            _ => Err(AnimationError::UnknownTypes(va, vb)),
        },
    }
}

/// Named animation registry with one current animation.
#[derive(Debug, Clone, Default)]
pub struct AnimationManager {
    animations: HashMap<String, Animation>,
    current: Option<String>,
}

impl AnimationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an animation under its own name. The first added animation
    /// becomes current.
    pub fn add(&mut self, animation: Animation) {
        let name = animation.name().to_string();
        if self.current.is_none() {
            self.current = Some(name.clone());
        }
        self.animations.insert(name, animation);
    }

    /// Switch the current animation by name. Returns false when unknown.
    pub fn set_current(&mut self, name: &str) -> bool {
        if self.animations.contains_key(name) {
            self.current = Some(name.to_string());
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Advance the current animation, returning a value to apply if any.
    ///
    /// Exhaustion is swallowed (returns `None`): a finished one-shot simply
    /// stops driving the bound attribute.
    pub fn update(&mut self, dt: f32) -> Result<Option<KeyValue>, AnimationError> {
        let Some(name) = self.current.as_ref() else {
            return Ok(None);
        };
        let Some(animation) = self.animations.get_mut(name) else {
            return Ok(None);
        };
        match animation.advance(dt)? {
            Frame::Value(v) => Ok(Some(v)),
            Frame::Idle | Frame::Finished => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(t: f32, v: i64) -> Keyframe {
        Keyframe::new(t, KeyValue::Int(v))
    }

    #[test]
    fn zero_keyframes_fails_construction() {
        let err = Animation::new("blink", Vec::new(), false, false).unwrap_err();
        assert_eq!(err, AnimationError::NoKeyframes("blink".to_string()));
    }

    #[test]
    fn keyframes_sort_on_construction() {
        let mut a =
            Animation::new("seq", vec![key(2.0, 30), key(0.0, 10), key(1.0, 20)], false, false)
                .unwrap();
        assert_eq!(a.advance(0.0).unwrap(), Frame::Value(KeyValue::Int(10)));
        assert_eq!(a.advance(1.0).unwrap(), Frame::Value(KeyValue::Int(20)));
    }

    #[test]
    fn discrete_sequence_then_exhaustion() {
        let mut a = Animation::new(
            "ammo",
            vec![key(0.0, 1), key(0.5, 2), key(2.0, 10)],
            false,
            false,
        )
        .unwrap();
        assert_eq!(a.advance(0.0).unwrap(), Frame::Value(KeyValue::Int(1)));
        assert_eq!(a.advance(0.3).unwrap(), Frame::Idle);
        assert_eq!(a.advance(0.3).unwrap(), Frame::Value(KeyValue::Int(2)));
        assert_eq!(a.advance(1.5).unwrap(), Frame::Value(KeyValue::Int(10)));
        assert_eq!(a.advance(0.1).unwrap(), Frame::Finished);
        assert_eq!(a.advance(0.1).unwrap(), Frame::Finished);
    }

    #[test]
    fn looping_resets_without_exhaustion() {
        let mut a = Animation::new("pulse", vec![key(0.0, 0), key(1.0, 1)], false, true).unwrap();
        assert_eq!(a.advance(0.0).unwrap(), Frame::Value(KeyValue::Int(0)));
        assert_eq!(a.advance(1.1).unwrap(), Frame::Value(KeyValue::Int(1)));
        // Next cycle starts over at keyframe 0, no Finished frame.
        assert_eq!(a.advance(0.1).unwrap(), Frame::Value(KeyValue::Int(0)));
    }

    #[test]
    fn interpolated_midpoint_blends_numerics() {
        let mut a = Animation::new(
            "fade",
            vec![
                Keyframe::new(0.0, KeyValue::Float(0.0)),
                Keyframe::new(2.0, KeyValue::Float(10.0)),
            ],
            true,
            false,
        )
        .unwrap();
        match a.advance(1.0).unwrap() {
            Frame::Value(KeyValue::Float(v)) => assert!((v - 5.0).abs() < 1e-5),
            other => panic!("unexpected frame {other:?}"),
        }
        // Past the last keyframe: literal value, then finished.
        assert_eq!(
            a.advance(2.0).unwrap(),
            Frame::Value(KeyValue::Float(10.0))
        );
        assert_eq!(a.advance(0.1).unwrap(), Frame::Finished);
    }

    #[test]
    fn point_keyframes_interpolate_per_component() {
        let mut a = Animation::new(
            "drift",
            vec![
                Keyframe::new(0.0, KeyValue::Point(PointF::new(0.0, 10.0))),
                Keyframe::new(4.0, KeyValue::Point(PointF::new(8.0, 2.0))),
            ],
            true,
            false,
        )
        .unwrap();
        match a.advance(1.0).unwrap() {
            Frame::Value(KeyValue::Point(p)) => {
                assert!((p.x - 2.0).abs() < 1e-5);
                assert!((p.y - 8.0).abs() < 1e-5);
            }
            other => panic!("unexpected frame {other:?}"),
        }
    }

    #[test]
    fn mixed_point_and_numeric_is_a_typed_error() {
        let mut a = Animation::new(
            "bad",
            vec![
                Keyframe::new(0.0, KeyValue::Float(0.0)),
                Keyframe::new(1.0, KeyValue::Point(PointF::new(1.0, 1.0))),
            ],
            true,
            false,
        )
        .unwrap();
        match a.advance(0.5) {
            Err(AnimationError::UnknownTypes(_, _)) => {}
            other => panic!("expected UnknownTypes, got {other:?}"),
        }
    }

    #[test]
    fn manager_swallows_exhaustion() {
        let mut mgr = AnimationManager::new();
        mgr.add(Animation::new("flash", vec![key(0.0, 1)], false, false).unwrap());
        assert_eq!(mgr.current(), Some("flash"));
        assert_eq!(mgr.update(0.1).unwrap(), Some(KeyValue::Int(1)));
        // Exhausted: no value, no error, forever after.
        assert_eq!(mgr.update(0.1).unwrap(), None);
        assert_eq!(mgr.update(0.1).unwrap(), None);
    }

    #[test]
    fn manager_switches_by_name() {
        let mut mgr = AnimationManager::new();
        mgr.add(Animation::new("a", vec![key(0.0, 1)], false, true).unwrap());
        mgr.add(Animation::new("b", vec![key(0.0, 2)], false, true).unwrap());
        assert!(mgr.set_current("b"));
        assert!(!mgr.set_current("missing"));
        assert_eq!(mgr.update(0.1).unwrap(), Some(KeyValue::Int(2)));
    }
}
