use std::fmt;

use tracing::error;

use crate::anomaly::Anomaly;
use crate::profile::Profile;

/// Jerk limit used when none is configured [mm/s/s/s].
pub const DEFAULT_J_MAX: f64 = 500_000.0;

/// One monotonic velocity change under bounded jerk and bounded acceleration.
///
/// Jerk is 0th order, acceleration 1st, velocity 2nd and position 3rd order
/// in time, so the transition is smooth. The curve always starts at `t = 0`
/// and `x = 0`; callers offset it in time and space.
///
/// Depending on the velocity difference the curve has either three phases
/// (jerk up, constant acceleration, jerk down) or two (jerk up, jerk down)
/// where the peak acceleration stays below the limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelCurve {
    /// Signed max jerk [mm/s/s/s]
    jm: f64,
    /// Signed max acceleration [mm/s/s]
    am: f64,
    /// Boundary instants [s]
    t0: f64,
    t1: f64,
    t2: f64,
    t3: f64,
    /// Boundary velocities [mm/s]
    v0: f64,
    v1: f64,
    v2: f64,
    v3: f64,
    /// Boundary positions [mm]
    x0: f64,
    x1: f64,
    x2: f64,
    x3: f64,
    /// Time spent at non-zero jerk on each side [s]
    tc: f64,
    /// Time spent at constant acceleration [s], not positive when absent
    tm: f64,
}

impl AccelCurve {
    /// Builds the curve from `v_start` to `v_end`.
    ///
    /// * `j_max`   - jerk limit magnitude [mm/s/s/s]
    /// * `a_max`   - acceleration limit magnitude [mm/s/s]
    /// * `v_start` - start velocity [mm/s]
    /// * `v_end`   - end velocity [mm/s]
    pub fn new(j_max: f64, a_max: f64, v_start: f64, v_end: f64) -> Self {
        let j_max = j_max.abs();
        let a_max = a_max.abs();
        let tc = Self::calc_time_curve(j_max, a_max);
        // signs follow the direction of the velocity change
        let rising = v_end - v_start > 0.0;
        let am = if rising { a_max } else { -a_max };
        let jm = if rising { j_max } else { -j_max };
        let (v0, v3) = (v_start, v_end);
        let (t0, x0) = (0.0, 0.0);
        let tm = (v3 - v0) / am - tc;

        let (t1, t2, t3) = if tm > 0.0 {
            // curve -> straight -> curve
            let t1 = t0 + tc;
            let t2 = t1 + tm;
            (t1, t2, t2 + tc)
        } else {
            // curve -> curve, the peak acceleration follows from the velocity delta
            let t1 = t0 + (tc / am * (v3 - v0)).sqrt();
            (t1, t1, t1 + (t1 - t0))
        };

        let d1 = t1 - t0;
        let v1 = v0 + 0.5 * jm * d1 * d1;
        let x1 = x0 + v0 * d1 + jm / 6.0 * d1 * d1 * d1;
        let d2 = t2 - t1;
        let v2 = v1 + am * d2;
        let x2 = x1 + v1 * d2 + am / 2.0 * d2 * d2;
        // area under the velocity graph
        let x3 = x0 + (v0 + v3) / 2.0 * (t3 - t0);

        Self {
            jm,
            am,
            t0,
            t1,
            t2,
            t3,
            v0,
            v1,
            v2,
            v3,
            x0,
            x1,
            x2,
            x3,
            tc,
            tm,
        }
    }

    /// Jerk at time `t` [mm/s/s/s].
    pub fn j(&self, t: f64) -> f64 {
        if t <= self.t0 {
            0.0
        } else if t <= self.t1 {
            self.jm
        } else if t <= self.t2 {
            0.0
        } else if t <= self.t3 {
            -self.jm
        } else {
            0.0
        }
    }

    /// Acceleration at time `t` [mm/s/s].
    pub fn a(&self, t: f64) -> f64 {
        if t <= self.t0 {
            0.0
        } else if t <= self.t1 {
            self.jm * (t - self.t0)
        } else if t <= self.t2 {
            self.am
        } else if t <= self.t3 {
            -self.jm * (t - self.t3)
        } else {
            0.0
        }
    }

    /// Velocity at time `t` [mm/s].
    pub fn v(&self, t: f64) -> f64 {
        if t <= self.t0 {
            self.v0
        } else if t <= self.t1 {
            self.v0 + 0.5 * self.jm * (t - self.t0) * (t - self.t0)
        } else if t <= self.t2 {
            self.v1 + self.am * (t - self.t1)
        } else if t <= self.t3 {
            self.v3 - 0.5 * self.jm * (t - self.t3) * (t - self.t3)
        } else {
            self.v3
        }
    }

    /// Position at time `t` [mm].
    ///
    /// Outside the curve the position keeps moving at the boundary velocity.
    pub fn x(&self, t: f64) -> f64 {
        if t <= self.t0 {
            self.x0 + self.v0 * (t - self.t0)
        } else if t <= self.t1 {
            let dt = t - self.t0;
            self.x0 + self.v0 * dt + self.jm / 6.0 * dt * dt * dt
        } else if t <= self.t2 {
            let dt = t - self.t1;
            self.x1 + self.v1 * dt + self.am / 2.0 * dt * dt
        } else if t <= self.t3 {
            let dt = t - self.t3;
            self.x3 + self.v3 * dt + self.jm / 6.0 * dt * dt * dt
        } else {
            self.x3 + self.v3 * (t - self.t3)
        }
    }

    pub fn t_end(&self) -> f64 {
        self.t3
    }

    pub fn v_end(&self) -> f64 {
        self.v3
    }

    pub fn x_end(&self) -> f64 {
        self.x3
    }

    pub fn t_0(&self) -> f64 {
        self.t0
    }
    pub fn t_1(&self) -> f64 {
        self.t1
    }
    pub fn t_2(&self) -> f64 {
        self.t2
    }
    pub fn t_3(&self) -> f64 {
        self.t3
    }
    pub fn v_0(&self) -> f64 {
        self.v0
    }
    pub fn v_1(&self) -> f64 {
        self.v1
    }
    pub fn v_2(&self) -> f64 {
        self.v2
    }
    pub fn v_3(&self) -> f64 {
        self.v3
    }
    pub fn x_0(&self) -> f64 {
        self.x0
    }
    pub fn x_1(&self) -> f64 {
        self.x1
    }
    pub fn x_2(&self) -> f64 {
        self.x2
    }
    pub fn x_3(&self) -> f64 {
        self.x3
    }

    /// Duration of each jerk phase [s].
    pub fn time_curve(&self) -> f64 {
        self.tc
    }

    /// Duration of the constant acceleration phase [s]; not positive when
    /// the curve has no such phase.
    pub fn time_plateau(&self) -> f64 {
        self.tm
    }

    /// Time needed to ramp acceleration from zero to `a_max` at `j_max` [s].
    pub fn calc_time_curve(j_max: f64, a_max: f64) -> f64 {
        a_max.abs() / j_max
    }

    /// End velocity reachable from `vs` towards `vt` within distance `d`.
    ///
    /// Only meaningful when `d` is too short to reach `vt`. If the reachable
    /// profile contains a constant acceleration phase the end velocity is
    /// the root of a quadratic, otherwise of a cubic solved with Cardano's
    /// formula.
    pub fn calc_velocity_end(j_max: f64, a_max: f64, vs: f64, vt: f64, d: f64) -> f64 {
        let tc = Self::calc_time_curve(j_max, a_max);
        let am = if vt - vs > 0.0 { a_max.abs() } else { -a_max.abs() };

        if d > (2.0 * vs + am * tc) * tc {
            // curve -> straight -> curve: quadratic formula
            let amtc = am * tc;
            let disc = amtc * amtc - 4.0 * (amtc * vs - vs * vs - 2.0 * am * d);
            return (-amtc + disc.sqrt()) / 2.0;
        }

        // curve -> curve: (vs + ve)^2 (ve - vs) = am d^2 / tc
        let a = vs;
        let b = am * d * d / tc;
        let aaa = a * a * a;
        let c0 = 27.0 * (32.0 * aaa * b + 27.0 * b * b);
        let c1 = 16.0 * aaa + 27.0 * b;
        if c0 >= 0.0 {
            let c0_sqrt = c0.sqrt();
            let u = ((c1 + c0_sqrt) / 2.0).cbrt();
            // u * w == 4 a^2
            let w = if u != 0.0 {
                4.0 * a * a / u
            } else {
                ((c1 - c0_sqrt) / 2.0).cbrt()
            };
            (u + w - a) / 3.0
        } else {
            // the two cube roots are complex conjugates, their sum is twice the real part
            let re = complex_cbrt_re(c1 / 2.0, (-c0).sqrt() / 2.0);
            (2.0 * re - a) / 3.0
        }
    }

    /// Peak velocity for a move from `vs` to `ve` that covers exactly `d`,
    /// assuming both halves reach the acceleration limit.
    ///
    /// Fails with [`Anomaly::InfeasiblePeakVelocity`] when the quadratic has
    /// no real root.
    pub fn solve_velocity_max(
        j_max: f64,
        a_max: f64,
        vs: f64,
        ve: f64,
        d: f64,
    ) -> Result<f64, Anomaly> {
        let tc = Self::calc_time_curve(j_max, a_max);
        let amtc = a_max * tc;
        let disc = amtc * amtc - 2.0 * (vs + ve) * amtc
            + 4.0 * a_max * d
            + 2.0 * (vs * vs + ve * ve);
        if disc < 0.0 {
            return Err(Anomaly::InfeasiblePeakVelocity { discriminant: disc });
        }
        Ok((-amtc + disc.sqrt()) / 2.0)
    }

    /// Best-effort [`AccelCurve::solve_velocity_max`]: logs the anomaly and
    /// falls back to `vs`.
    pub fn calc_velocity_max(j_max: f64, a_max: f64, vs: f64, ve: f64, d: f64) -> f64 {
        Self::solve_velocity_max(j_max, a_max, vs, ve, d).unwrap_or_else(|anomaly| {
            error!(a_max, vs, ve, d, "{anomaly}");
            vs
        })
    }

    /// Minimum distance needed to change velocity from `v_start` to `v_end`.
    pub fn calc_min_distance(j_max: f64, a_max: f64, v_start: f64, v_end: f64) -> f64 {
        Self::new(j_max, a_max, v_start, v_end).x_end()
    }
}

/// Real part of the principal cube root of `re + i im`, in polar form.
fn complex_cbrt_re(re: f64, im: f64) -> f64 {
    let modulus = re.hypot(im);
    let arg = im.atan2(re);
    modulus.cbrt() * (arg / 3.0).cos()
}

impl Profile for AccelCurve {
    fn j(&self, t: f64) -> f64 {
        AccelCurve::j(self, t)
    }
    fn a(&self, t: f64) -> f64 {
        AccelCurve::a(self, t)
    }
    fn v(&self, t: f64) -> f64 {
        AccelCurve::v(self, t)
    }
    fn x(&self, t: f64) -> f64 {
        AccelCurve::x(self, t)
    }
    fn t_start(&self) -> f64 {
        self.t0
    }
    fn t_end(&self) -> f64 {
        self.t3
    }
    fn v_end(&self) -> f64 {
        self.v3
    }
    fn x_end(&self) -> f64 {
        self.x3
    }
}

impl fmt::Display for AccelCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AccelCurve\tv0: {}\tv3: {}\tt1: {}\tt2: {}\tt3: {}\tx3: {}",
            self.v0, self.v3, self.t1, self.t2, self.t3, self.x3
        )
    }
}
