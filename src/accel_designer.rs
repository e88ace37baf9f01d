use std::fmt;
use std::io::{self, Write};

use tracing::{debug, error, warn};

use crate::accel_curve::AccelCurve;
use crate::anomaly::{Anomalies, Anomaly};
use crate::config::MotionLimits;
use crate::profile::{write_rows, Profile};

/// A velocity plan that satisfies a travel distance constraint.
///
/// Stitches an acceleration [`AccelCurve`], an optional constant velocity
/// cruise and a deceleration [`AccelCurve`] together:
///
/// ```text
///  v
///  |       t1______t2
///  |       /        \
///  |______/          \______
///  +----t0-----------t3------> t
/// ```
///
/// Infeasible constraints never abort the design. They are logged, recorded
/// in [`AccelDesigner::anomalies`] and answered with a best-effort profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelDesigner {
    /// Boundary instants [s]
    t0: f64,
    t1: f64,
    t2: f64,
    t3: f64,
    /// Boundary positions [mm]
    x0: f64,
    x3: f64,
    /// Acceleration and deceleration curves
    ac: AccelCurve,
    dc: AccelCurve,
    anomalies: Anomalies,
}

impl AccelDesigner {
    /// Allowed overrun of the distance constraint [mm]
    const DISTANCE_TOLERANCE: f64 = 0.1;
    /// Allowed disorder of the boundary instants [s]
    const TIME_TOLERANCE: f64 = 0.001;

    /// Designs a trajectory starting at position 0 and time 0.
    ///
    /// See [`AccelDesigner::with_start`].
    pub fn new(
        limits: MotionLimits,
        v_start: f64,
        v_sat: f64,
        v_target: f64,
        distance: f64,
    ) -> Self {
        Self::with_start(limits, v_start, v_sat, v_target, distance, 0.0, 0.0)
    }

    /// Designs a trajectory from the given constraints.
    ///
    /// * `limits`   - jerk and acceleration limits, both positive
    /// * `v_start`  - start velocity [mm/s]
    /// * `v_sat`    - saturation velocity [mm/s]
    /// * `v_target` - target end velocity [mm/s]
    /// * `distance` - travel distance [mm], non-negative
    /// * `x_start`  - start position [mm]
    /// * `t_start`  - start time [s]
    ///
    /// The end velocity equals `v_target` unless the distance is too short
    /// to reach it, in which case it is the closest reachable velocity.
    pub fn with_start(
        limits: MotionLimits,
        v_start: f64,
        v_sat: f64,
        v_target: f64,
        distance: f64,
        x_start: f64,
        t_start: f64,
    ) -> Self {
        let MotionLimits { j_max, a_max } = limits;
        let mut anomalies = Anomalies::default();
        let mut distance = distance;

        // tentative peak and end velocity
        let mut v_max = v_start.max(v_sat).max(v_target);
        let mut v_end = v_target;

        if distance < 0.0 {
            let anomaly = Anomaly::NegativeDistance { distance };
            warn!("{anomaly}");
            anomalies.record(anomaly);
        }
        if distance <= 0.0 {
            v_max = v_start;
            v_end = v_start;
            distance = 0.0;
        }

        // target velocity unreachable within the distance
        if distance < AccelCurve::calc_min_distance(j_max, a_max, v_start, v_end) {
            v_end = AccelCurve::calc_velocity_end(j_max, a_max, v_start, v_target, distance);
            v_max = v_start.max(v_end);
        }

        let mut ac = AccelCurve::new(j_max, a_max, v_start, v_max);
        let mut dc = AccelCurve::new(j_max, a_max, v_max, v_end);

        // no room to cruise, lower the peak velocity
        if distance < ac.x_end() + dc.x_end() {
            v_max = match AccelCurve::solve_velocity_max(j_max, a_max, v_start, v_end, distance) {
                Ok(v) => v,
                Err(anomaly) => {
                    error!(a_max, v_start, v_end, distance, "{anomaly}");
                    anomalies.record(anomaly);
                    v_start
                }
            };
            // saturate, then avoid braking below the boundary velocities
            v_max = v_max.min(v_sat);
            v_max = v_max.max(v_start).max(v_end);
            ac = AccelCurve::new(j_max, a_max, v_start, v_max);
            dc = AccelCurve::new(j_max, a_max, v_max, v_end);
        }

        let curve_distance = ac.x_end() + dc.x_end();
        if curve_distance > distance + Self::DISTANCE_TOLERANCE {
            let anomaly = Anomaly::ConstraintViolation {
                distance,
                result: curve_distance,
            };
            error!("{anomaly}");
            anomalies.record(anomaly);
        }

        let x0 = x_start;
        let x3 = x_start + distance;
        let t0 = t_start;
        let t1 = t0 + ac.t_end();
        let remaining = distance - curve_distance;
        let cruise = if remaining == 0.0 { 0.0 } else { remaining / v_max };
        let mut t2 = t1 + cruise;
        let mut t3 = t2 + dc.t_end();

        let e = Self::TIME_TOLERANCE;
        if !(t3.is_finite() && t0 <= t1 + e && t1 <= t2 + e && t2 <= t3 + e) {
            let anomaly = Anomaly::TimeOrderingViolation { t0, t1, t2, t3 };
            error!(
                a_max,
                v_start,
                v_sat,
                v_target,
                distance,
                v_max,
                v_end,
                x0,
                x1 = x0 + ac.x_end(),
                x2 = x0 + (distance - dc.x_end()),
                x3,
                "{anomaly}"
            );
            anomalies.record(anomaly);
        }
        // a cruise that never ends is dropped so the profile stays finite
        if !cruise.is_finite() {
            t2 = t1;
            t3 = t2 + dc.t_end();
        }

        debug!(distance, v_start, v_max, v_end, t0, t1, t2, t3, "designed");

        Self {
            t0,
            t1,
            t2,
            t3,
            x0,
            x3,
            ac,
            dc,
            anomalies,
        }
    }

    /// Jerk at time `t` [mm/s/s/s].
    pub fn j(&self, t: f64) -> f64 {
        if t < self.t2 {
            self.ac.j(t - self.t0)
        } else {
            self.dc.j(t - self.t2)
        }
    }

    /// Acceleration at time `t` [mm/s/s].
    pub fn a(&self, t: f64) -> f64 {
        if t < self.t2 {
            self.ac.a(t - self.t0)
        } else {
            self.dc.a(t - self.t2)
        }
    }

    /// Velocity at time `t` [mm/s].
    pub fn v(&self, t: f64) -> f64 {
        if t < self.t2 {
            self.ac.v(t - self.t0)
        } else {
            self.dc.v(t - self.t2)
        }
    }

    /// Position at time `t` [mm].
    pub fn x(&self, t: f64) -> f64 {
        if t < self.t2 {
            self.x0 + self.ac.x(t - self.t0)
        } else {
            self.x3 - self.dc.x_end() + self.dc.x(t - self.t2)
        }
    }

    pub fn t_end(&self) -> f64 {
        self.t3
    }

    pub fn v_end(&self) -> f64 {
        self.dc.v_end()
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
    pub fn x_0(&self) -> f64 {
        self.x0
    }
    pub fn x_3(&self) -> f64 {
        self.x3
    }

    pub fn v_start(&self) -> f64 {
        self.ac.v_0()
    }

    /// Peak velocity, reached at `t1` and held until `t2`.
    pub fn v_max(&self) -> f64 {
        self.ac.v_end()
    }

    pub fn accel_curve(&self) -> &AccelCurve {
        &self.ac
    }

    pub fn decel_curve(&self) -> &AccelCurve {
        &self.dc
    }

    /// Anomalies raised while designing this trajectory.
    pub fn anomalies(&self) -> &Anomalies {
        &self.anomalies
    }

    /// Writes `t,j,a,v,x` lines split by phase: acceleration `[t0, t1)`,
    /// cruise `[t1, t2)` and deceleration `[t2, t3)`.
    pub fn write_phase_csv<W: Write>(&self, sinks: &mut [W; 3], step: f64) -> io::Result<()> {
        for s in self.samples(step) {
            let phase = if s.time < self.t1 {
                0
            } else if s.time < self.t2 {
                1
            } else {
                2
            };
            write_rows(&mut sinks[phase], std::iter::once(s))?;
        }
        Ok(())
    }
}

impl Profile for AccelDesigner {
    fn j(&self, t: f64) -> f64 {
        AccelDesigner::j(self, t)
    }
    fn a(&self, t: f64) -> f64 {
        AccelDesigner::a(self, t)
    }
    fn v(&self, t: f64) -> f64 {
        AccelDesigner::v(self, t)
    }
    fn x(&self, t: f64) -> f64 {
        AccelDesigner::x(self, t)
    }
    fn t_start(&self) -> f64 {
        self.t0
    }
    fn t_end(&self) -> f64 {
        self.t3
    }
    fn v_end(&self) -> f64 {
        AccelDesigner::v_end(self)
    }
    fn x_end(&self) -> f64 {
        self.x3
    }
}

impl fmt::Display for AccelDesigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AccelDesigner\td: {}\tvs: {}\tvm: {}\tve: {}\tt0: {}\tt1: {}\tt2: {}\tt3: {}",
            self.x3 - self.x0,
            self.v_start(),
            self.v_max(),
            self.v_end(),
            self.t0,
            self.t1,
            self.t2,
            self.t3
        )
    }
}
