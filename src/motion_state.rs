/// Kinematic state of one axis sampled at a single instant.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MotionState {
    pub time: f64,
    pub pos: f64,
    pub vel: f64,
    pub acc: f64,
    pub jrk: f64,
}

impl MotionState {
    /// Creates a new MotionState.
    pub fn new(time: f64, pos: f64, vel: f64, acc: f64, jrk: f64) -> Self {
        Self {
            time,
            pos,
            vel,
            acc,
            jrk,
        }
    }
}
