use std::io::{self, Write};

use crate::motion_state::MotionState;

/// Default tabulation step [s].
pub const DEFAULT_STEP: f64 = 0.001;

/// A time-parameterized motion profile with closed-form jerk, acceleration,
/// velocity and position.
///
/// Every evaluator accepts any real `t`; outside the profile's time span the
/// values are held at the boundary (position keeps moving at the boundary
/// velocity).
pub trait Profile {
    /// Jerk at time `t`.
    fn j(&self, t: f64) -> f64;
    /// Acceleration at time `t`.
    fn a(&self, t: f64) -> f64;
    /// Velocity at time `t`.
    fn v(&self, t: f64) -> f64;
    /// Position at time `t`.
    fn x(&self, t: f64) -> f64;

    fn t_start(&self) -> f64;
    fn t_end(&self) -> f64;
    fn v_end(&self) -> f64;
    fn x_end(&self) -> f64;

    /// Samples the whole state at time `t`.
    fn state(&self, t: f64) -> MotionState {
        MotionState::new(t, self.x(t), self.v(t), self.a(t), self.j(t))
    }

    /// Iterates states at a fixed `step` from `t_start()` up to, but not
    /// including, `t_end()`.
    fn samples(&self, step: f64) -> Samples<'_, Self>
    where
        Self: Sized,
    {
        Samples::new(self, self.t_start(), self.t_end(), step)
    }

    /// Writes `t,j,a,v,x` lines at a fixed `step` to `out`.
    fn write_csv<W: Write>(&self, out: &mut W, step: f64) -> io::Result<()>
    where
        Self: Sized,
    {
        write_rows(out, self.samples(step))
    }

    /// Writes `t,j,a,v,x` lines at a fixed `step` to stdout.
    fn print_csv(&self, step: f64) -> io::Result<()>
    where
        Self: Sized,
    {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.write_csv(&mut lock, step)
    }
}

/// Iterator over fixed-step samples of a [`Profile`] in `[begin, end)`.
///
/// Time is computed as `begin + i * step` so long runs do not drift.
pub struct Samples<'a, P: Profile> {
    profile: &'a P,
    begin: f64,
    end: f64,
    step: f64,
    index: u64,
}

impl<'a, P: Profile> Samples<'a, P> {
    pub fn new(profile: &'a P, begin: f64, end: f64, step: f64) -> Self {
        Self {
            profile,
            begin,
            end,
            step,
            index: 0,
        }
    }
}

impl<P: Profile> Iterator for Samples<'_, P> {
    type Item = MotionState;

    fn next(&mut self) -> Option<Self::Item> {
        // a zero or negative step would never reach the end
        if !(self.step.is_finite() && self.step > 0.0) {
            return None;
        }
        let t = self.begin + self.index as f64 * self.step;
        if t.is_nan() || t >= self.end {
            return None;
        }
        self.index += 1;
        Some(self.profile.state(t))
    }
}

/// Writes one `t,j,a,v,x` line per state.
pub fn write_rows<W, I>(out: &mut W, rows: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = MotionState>,
{
    for s in rows {
        writeln!(out, "{},{},{},{},{}", s.time, s.jrk, s.acc, s.vel, s.pos)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Constant velocity from t = 1 to t = 2.
    struct Cruise;

    impl Profile for Cruise {
        fn j(&self, _t: f64) -> f64 {
            0.0
        }
        fn a(&self, _t: f64) -> f64 {
            0.0
        }
        fn v(&self, _t: f64) -> f64 {
            2.0
        }
        fn x(&self, t: f64) -> f64 {
            2.0 * (t - 1.0)
        }
        fn t_start(&self) -> f64 {
            1.0
        }
        fn t_end(&self) -> f64 {
            2.0
        }
        fn v_end(&self) -> f64 {
            2.0
        }
        fn x_end(&self) -> f64 {
            2.0
        }
    }

    #[test]
    fn samples_exclude_end() {
        let samples: Vec<_> = Cruise.samples(0.25).collect();
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0].time, 1.0);
        assert_eq!(samples[3].time, 1.75);
        assert_eq!(samples[3].pos, 1.5);
    }

    #[test]
    fn non_positive_step_yields_nothing() {
        assert_eq!(Cruise.samples(0.0).count(), 0);
        assert_eq!(Cruise.samples(-0.1).count(), 0);
        assert_eq!(Cruise.samples(f64::NAN).count(), 0);
    }

    #[test]
    fn csv_lines() {
        let mut out = Vec::new();
        Cruise.write_csv(&mut out, 0.5).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "1,0,0,2,0\n1.5,0,0,2,1\n");
    }
}
