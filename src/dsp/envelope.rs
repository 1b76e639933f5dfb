use crate::MIN_TIME;

/*
Breakpoint Envelope (Parameter Automation)
==========================================

Every moving parameter in the soundtrack (gain, oscillator pitch, filter
cutoff, the master fader) is an `Envelope`: a default value plus a list of
timed events on the audio clock. Evaluating the envelope at time `t` walks
the events in order and returns the value the parameter has at `t`.

Vocabulary
----------

  default     The value before the first event takes effect.

  set         Jump to a value at a time. Holds until the next event.

  linear      Ramp in a straight line from the previous event's
              (time, value) to this event's (time, value).

  exponential Ramp geometrically: v0 * (v1 / v0) ^ progress. Sounds even to
              the ear for pitch sweeps and decays. Undefined through zero,
              so a ramp whose ends touch zero or differ in sign holds v0 and
              jumps at the end.

  target      Approach a value asymptotically from the time given:
                v(t) = target + (v_start - target) * e^(-(t - t0) / tau)
              Never arrives, which is the point: used for click-free fades.


The Shape
---------

  kick gain:  set 0.9 @T, exponential 0.001 @T+0.4

    0.9 ┐╲
        │ ╲
        │  ╲_
        │    ╲___
  0.001 └────────╲____→ time
        T          T+0.4

  pad gain:   set 0 @T, linear 0.08 @T+0.5, linear 0 @T+2.5

   0.08 ┐    ╱╲
        │   ╱   ╲__
        │  ╱       ╲___
      0 └─╱────────────╲─→ time
        T   T+0.5      T+2.5


Ordering
--------

Events are kept sorted by time. An event inserted at the same time as an
existing one goes after it, so "set then ramp" at one instant behaves the
way it reads.
*/

#[derive(Debug, Clone, Copy, PartialEq)]
enum Curve {
    Set(f32),
    Linear(f32),
    Exponential(f32),
    Target { value: f32, time_constant: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Breakpoint {
    time: f64,
    curve: Curve,
}

/// Running state while walking the breakpoint list
#[derive(Debug, Clone, Copy)]
struct Anchor {
    time: f64,
    value: f32,
    target: Option<(f32, f64)>,
}

impl Anchor {
    fn value_at(&self, t: f64) -> f32 {
        match self.target {
            Some((target, tau)) => {
                let elapsed = (t - self.time).max(0.0);
                target + (self.value - target) * (-elapsed / tau).exp() as f32
            }
            None => self.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    default: f32,
    events: Vec<Breakpoint>,
}

impl Envelope {
    /// A parameter that holds `value` until automated.
    pub fn constant(value: f32) -> Self {
        Self {
            default: value,
            events: Vec::new(),
        }
    }

    /// Starts at `value` from time `t` (the usual first call).
    pub fn starting_at(value: f32, t: f64) -> Self {
        Self::constant(value).set(value, t)
    }

    pub fn set(mut self, value: f32, t: f64) -> Self {
        self.set_value_at_time(value, t);
        self
    }

    pub fn linear_to(mut self, value: f32, t: f64) -> Self {
        self.linear_ramp_to(value, t);
        self
    }

    pub fn exponential_to(mut self, value: f32, t: f64) -> Self {
        self.exponential_ramp_to(value, t);
        self
    }

    pub fn set_value_at_time(&mut self, value: f32, t: f64) {
        self.insert(t, Curve::Set(value));
    }

    pub fn linear_ramp_to(&mut self, value: f32, t: f64) {
        self.insert(t, Curve::Linear(value));
    }

    pub fn exponential_ramp_to(&mut self, value: f32, t: f64) {
        self.insert(t, Curve::Exponential(value));
    }

    pub fn set_target_at_time(&mut self, value: f32, t: f64, time_constant: f64) {
        let time_constant = time_constant.max(MIN_TIME);
        self.insert(
            t,
            Curve::Target {
                value,
                time_constant,
            },
        );
    }

    /// Drop events that can no longer affect values at or after `t`.
    ///
    /// Keeps the long-lived master fader from growing without bound. Settled
    /// state is folded into the default; a target still in motion keeps its
    /// event, with everything before it folded into one `set`.
    pub fn prune_before(&mut self, t: f64) {
        let passed = self.events.iter().take_while(|e| e.time <= t).count();
        if passed < 2 {
            return;
        }
        let last = passed - 1;
        let anchor = self.anchor_through(last);
        if anchor.target.is_none() {
            self.default = anchor.value;
            self.events.drain(..=last);
            return;
        }
        if passed < 3 {
            return;
        }
        let time = self.events[last].time;
        let value = self.anchor_through(last - 1).value_at(time);
        self.events.drain(..last);
        self.events.insert(
            0,
            Breakpoint {
                time,
                curve: Curve::Set(value),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Time of the last breakpoint, if any.
    pub fn end_time(&self) -> Option<f64> {
        self.events.last().map(|e| e.time)
    }

    /// Value of the parameter at absolute time `t`.
    pub fn value_at(&self, t: f64) -> f32 {
        let mut anchor = Anchor {
            time: f64::NEG_INFINITY,
            value: self.default,
            target: None,
        };

        for event in &self.events {
            if t < event.time {
                return match event.curve {
                    Curve::Linear(end) => {
                        let span = event.time - anchor.time;
                        if !span.is_finite() || span <= 0.0 {
                            return anchor.value;
                        }
                        let progress = ((t - anchor.time) / span) as f32;
                        anchor.value + (end - anchor.value) * progress
                    }
                    Curve::Exponential(end) => {
                        let span = event.time - anchor.time;
                        if !span.is_finite() || span <= 0.0 || anchor.value * end <= 0.0 {
                            return anchor.value;
                        }
                        let progress = ((t - anchor.time) / span) as f32;
                        anchor.value * (end / anchor.value).powf(progress)
                    }
                    Curve::Set(_) | Curve::Target { .. } => anchor.value_at(t),
                };
            }
            anchor = Self::advance(anchor, event);
        }

        anchor.value_at(t)
    }

    fn anchor_through(&self, index: usize) -> Anchor {
        let mut anchor = Anchor {
            time: f64::NEG_INFINITY,
            value: self.default,
            target: None,
        };
        for event in &self.events[..=index] {
            anchor = Self::advance(anchor, event);
        }
        anchor
    }

    fn advance(anchor: Anchor, event: &Breakpoint) -> Anchor {
        match event.curve {
            Curve::Set(value) | Curve::Linear(value) | Curve::Exponential(value) => Anchor {
                time: event.time,
                value,
                target: None,
            },
            Curve::Target {
                value,
                time_constant,
            } => Anchor {
                time: event.time,
                value: anchor.value_at(event.time),
                target: Some((value, time_constant)),
            },
        }
    }

    fn insert(&mut self, time: f64, curve: Curve) {
        let index = self.events.partition_point(|e| e.time <= time);
        self.events.insert(index, Breakpoint { time, curve });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn default_holds_before_first_event() {
        let env = Envelope::constant(6000.0).linear_to(100.0, 1.0).set(3.0, 2.0);
        assert!(close(Envelope::constant(6000.0).value_at(10.0), 6000.0));
        assert!(close(env.value_at(2.5), 3.0));
    }

    #[test]
    fn linear_ramp_interpolates_from_previous_event() {
        let env = Envelope::starting_at(0.0, 1.0)
            .linear_to(0.08, 1.5)
            .linear_to(0.0, 3.5);

        assert!(close(env.value_at(0.5), 0.0));
        assert!(close(env.value_at(1.25), 0.04));
        assert!(close(env.value_at(1.5), 0.08));
        assert!(close(env.value_at(2.5), 0.04));
        assert!(close(env.value_at(4.0), 0.0));
    }

    #[test]
    fn exponential_ramp_is_geometric() {
        let env = Envelope::starting_at(1.0, 0.0).exponential_to(0.01, 1.0);
        assert!(close(env.value_at(0.5), 0.1));
        assert!(close(env.value_at(1.0), 0.01));
    }

    #[test]
    fn exponential_ramp_through_zero_holds_start() {
        let env = Envelope::starting_at(0.0, 0.0).exponential_to(1.0, 1.0);
        assert!(close(env.value_at(0.9), 0.0));
        assert!(close(env.value_at(1.0), 1.0));
    }

    #[test]
    fn target_approaches_asymptotically() {
        let mut env = Envelope::constant(0.6);
        env.set_target_at_time(0.0, 1.0, 0.1);

        assert!(close(env.value_at(1.0), 0.6));
        let one_tau = env.value_at(1.1);
        assert!((one_tau - 0.6 * (-1.0f32).exp()).abs() < 1e-3);
        assert!(env.value_at(2.0) < 0.001);
    }

    #[test]
    fn retargeting_starts_from_current_value() {
        let mut env = Envelope::constant(0.6);
        env.set_target_at_time(0.0, 0.0, 0.1);
        env.set_target_at_time(0.6, 0.05, 0.1);

        let at_switch = env.value_at(0.05);
        let expected = 0.6 * (-0.5f32).exp();
        assert!((at_switch - expected).abs() < 1e-3);
        // no discontinuity either side of the switch
        assert!((env.value_at(0.0499) - at_switch).abs() < 1e-2);
        assert!(env.value_at(1.0) > 0.59);
    }

    #[test]
    fn same_time_events_apply_in_call_order() {
        let env = Envelope::constant(0.0).set(660.0, 0.0).set(880.0, 0.1);
        assert!(close(env.value_at(0.05), 660.0));
        assert!(close(env.value_at(0.1), 880.0));
    }

    #[test]
    fn prune_folds_settled_events_into_default() {
        let mut env = Envelope::starting_at(0.0, 0.0).linear_to(1.0, 1.0).set(0.5, 2.0);
        env.prune_before(3.0);
        assert_eq!(env.len(), 0);
        assert!(close(env.value_at(3.0), 0.5));
    }

    #[test]
    fn prune_keeps_running_targets() {
        let mut env = Envelope::constant(0.6);
        env.set_target_at_time(0.0, 0.0, 0.1);
        env.set_target_at_time(0.6, 1.0, 0.1);
        let before = env.value_at(1.05);
        env.prune_before(2.0);
        assert!(close(env.value_at(1.05), before));
    }

    #[test]
    fn repeated_retargeting_stays_bounded() {
        let mut env = Envelope::constant(0.6);
        for i in 0..100 {
            let target = if i % 2 == 0 { 0.0 } else { 0.6 };
            let t = i as f64 * 0.05;
            env.set_target_at_time(target, t, 0.1);
            let expected = env.value_at(t + 0.01);
            env.prune_before(t + 0.01);
            assert!(close(env.value_at(t + 0.01), expected));
        }
        assert!(env.len() <= 2);
    }
}
