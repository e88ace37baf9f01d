use tracing::trace;

use crate::accel_designer::AccelDesigner;
use crate::buffer_fifo::BufferFifo;
use crate::config::SamplingConfig;
use crate::motion_state::MotionState;
use crate::profile::Profile;

/// Plays queued trajectories back at a fixed control period.
///
/// Each trajectory is sampled from its own start instant; when it runs out
/// the next queued one takes over. With nothing queued the last trajectory
/// keeps being sampled past its end, which holds the final velocity.
pub struct TrajectoryExecutor<const N: usize> {
    /// Trajectories waiting to be played
    buffer: BufferFifo<AccelDesigner, N>,

    /// The trajectory being played
    active: Option<AccelDesigner>,

    /// The current instantaneous state
    inst: MotionState,

    /// Control period [s]
    period: f64,

    /// Ticks elapsed since the active trajectory started
    tick: u64,

    /// Time already spent in the active trajectory when it took over [s]
    carry: f64,
}

impl<const N: usize> TrajectoryExecutor<N> {
    /// Creates an executor ticking every `period` seconds.
    pub fn new(period: f64) -> Self {
        Self {
            buffer: BufferFifo::new(),
            active: None,
            inst: MotionState::default(),
            period,
            tick: 0,
            carry: 0.0,
        }
    }

    pub fn from_config(sampling: &SamplingConfig) -> Self {
        Self::new(sampling.period)
    }

    /// Queues a trajectory, handing it back if the queue is full.
    pub fn push(&mut self, designer: AccelDesigner) -> Result<(), AccelDesigner> {
        self.buffer.write(designer)
    }

    fn elapsed(&self) -> f64 {
        self.carry + self.tick as f64 * self.period
    }

    /// Time past the end of the active trajectory, if it ended within the
    /// last period. Older overshoot means the queue ran dry in between.
    fn overshoot(&self) -> f64 {
        match &self.active {
            Some(ad) => {
                let over = self.elapsed() - (ad.t_end() - ad.t_0());
                if over < self.period {
                    over
                } else {
                    0.0
                }
            }
            None => 0.0,
        }
    }

    fn is_active_done(&self) -> bool {
        match &self.active {
            Some(ad) => self.elapsed() >= ad.t_end() - ad.t_0(),
            None => true,
        }
    }

    /// Takes the next trajectory, skipping empty ones unless it is the last.
    fn get_next(&mut self) -> Option<AccelDesigner> {
        let mut next = self.buffer.read()?;
        while next.t_end() <= next.t_0() {
            match self.buffer.read() {
                Some(ad) => next = ad,
                None => break,
            }
        }
        Some(next)
    }

    /// Advances one control period and updates the current state.
    pub fn tick(&mut self) {
        self.tick += 1;
        if self.is_active_done() {
            let carry = self.overshoot();
            if let Some(next) = self.get_next() {
                trace!(t0 = next.t_0(), t3 = next.t_end(), carry, "next trajectory");
                self.active = Some(next);
                self.tick = 0;
                self.carry = carry;
            }
        }
        if let Some(ad) = &self.active {
            self.inst = ad.state(ad.t_0() + self.elapsed());
        }
    }

    /// Sets a new control period [s].
    pub fn set_period(&mut self, period: f64) {
        self.period = period;
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    /// Returns the current state.
    pub fn state(&self) -> MotionState {
        self.inst
    }

    /// Returns the current jerk.
    pub fn get_jrk(&self) -> f64 {
        self.inst.jrk
    }

    /// Returns the current acceleration.
    pub fn get_acc(&self) -> f64 {
        self.inst.acc
    }

    /// Returns the current velocity.
    pub fn get_vel(&self) -> f64 {
        self.inst.vel
    }

    /// Returns the current position.
    pub fn get_pos(&self) -> f64 {
        self.inst.pos
    }

    /// True once the active trajectory is finished and nothing is queued.
    pub fn is_idle(&self) -> bool {
        self.buffer.is_empty() && self.is_active_done()
    }

    /// Checks if the queue is full.
    pub fn is_full(&self) -> bool {
        self.buffer.is_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MotionLimits;

    fn limits() -> MotionLimits {
        MotionLimits::new(240_000.0, 3_600.0)
    }

    #[test]
    fn idle_without_trajectories() {
        let mut exec = TrajectoryExecutor::<4>::new(0.001);
        assert!(exec.is_idle());
        exec.tick();
        assert_eq!(exec.state(), MotionState::default());
    }

    #[test]
    fn plays_chained_trajectories() {
        let first = AccelDesigner::new(limits(), 0.0, 600.0, 300.0, 100.0);
        let second = AccelDesigner::with_start(
            limits(),
            first.v_end(),
            600.0,
            0.0,
            100.0,
            first.x_end(),
            first.t_end(),
        );
        let mut exec = TrajectoryExecutor::<4>::new(0.001);
        exec.push(first).unwrap();
        exec.push(second).unwrap();
        assert!(!exec.is_idle());

        let mut prev = exec.state();
        let mut ticks = 0;
        while !exec.is_idle() {
            exec.tick();
            let now = exec.state();
            // bounded acceleration keeps per-tick velocity steps small
            assert!((now.vel - prev.vel).abs() <= 3_600.0 * 0.001 + 1e-6);
            assert!(now.pos >= prev.pos - 1e-9);
            prev = now;
            ticks += 1;
            assert!(ticks < 100_000);
        }
        assert!((exec.get_pos() - 200.0).abs() < 0.1);
        assert!(exec.get_vel().abs() < 1e-6);
        assert!(exec.get_acc().abs() < 1e-6);
    }

    #[test]
    fn handover_keeps_timeline() {
        let first = AccelDesigner::new(limits(), 0.0, 600.0, 300.0, 100.0);
        let second = AccelDesigner::with_start(
            limits(),
            first.v_end(),
            600.0,
            0.0,
            100.0,
            first.x_end(),
            first.t_end(),
        );
        // a period that does not divide the first duration
        let period = 0.0007;
        let mut exec = TrajectoryExecutor::<4>::new(period);
        exec.push(first).unwrap();
        exec.push(second).unwrap();

        let mut k = 0u64;
        while !exec.is_idle() {
            exec.tick();
            let expected = k as f64 * period;
            assert!((exec.state().time - expected).abs() < 1e-9);
            k += 1;
            assert!(k < 1_000_000);
        }
        assert!(k as f64 * period >= second.t_end());
    }

    #[test]
    fn rejects_when_full() {
        let ad = AccelDesigner::new(limits(), 0.0, 100.0, 0.0, 10.0);
        let mut exec = TrajectoryExecutor::<1>::new(0.001);
        exec.push(ad).unwrap();
        assert!(exec.is_full());
        assert!(exec.push(ad).is_err());
    }

    #[test]
    fn holds_final_state() {
        let ad = AccelDesigner::new(limits(), 0.0, 100.0, 0.0, 10.0);
        let mut exec = TrajectoryExecutor::<2>::from_config(&SamplingConfig::default());
        exec.push(ad).unwrap();
        for _ in 0..2_000 {
            exec.tick();
        }
        assert!(exec.is_idle());
        assert!((exec.get_pos() - 10.0).abs() < 1e-6);
        assert_eq!(exec.get_vel(), 0.0);
        assert_eq!(exec.get_jrk(), 0.0);
    }
}
