use thiserror::Error;

/// A non-fatal constraint anomaly detected while designing a trajectory.
///
/// None of these abort the computation: the designer logs the anomaly,
/// applies its fallback and still produces a usable profile.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum Anomaly {
    /// Requested distance was negative; the profile is clamped to zero motion.
    #[error("distance < 0: {distance}")]
    NegativeDistance { distance: f64 },

    /// The peak velocity quadratic has no real root for these inputs;
    /// the start velocity is used instead.
    #[error("peak velocity is infeasible (discriminant: {discriminant})")]
    InfeasiblePeakVelocity { discriminant: f64 },

    /// The replanned profile still travels further than requested.
    #[error("distance constraint: {distance} result: {result}")]
    ConstraintViolation { distance: f64, result: f64 },

    /// The boundary instants are not weakly increasing.
    #[error("time points out of order: t0: {t0} t1: {t1} t2: {t2} t3: {t3}")]
    TimeOrderingViolation { t0: f64, t1: f64, t2: f64, t3: f64 },
}

impl Anomaly {
    const KINDS: usize = 4;

    fn slot(&self) -> usize {
        match self {
            Anomaly::NegativeDistance { .. } => 0,
            Anomaly::InfeasiblePeakVelocity { .. } => 1,
            Anomaly::ConstraintViolation { .. } => 2,
            Anomaly::TimeOrderingViolation { .. } => 3,
        }
    }
}

/// The set of anomalies raised by one trajectory design.
///
/// Holds at most one anomaly of each kind, in a fixed array, so recording
/// never allocates.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Anomalies {
    slots: [Option<Anomaly>; Anomaly::KINDS],
}

impl Anomalies {
    /// Records an anomaly, replacing an earlier one of the same kind.
    pub fn record(&mut self, anomaly: Anomaly) {
        self.slots[anomaly.slot()] = Some(anomaly);
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Iterates the recorded anomalies in taxonomy order.
    pub fn iter(&self) -> impl Iterator<Item = &Anomaly> {
        self.slots.iter().flatten()
    }

    pub fn negative_distance(&self) -> Option<&Anomaly> {
        self.slots[0].as_ref()
    }

    pub fn infeasible_peak_velocity(&self) -> Option<&Anomaly> {
        self.slots[1].as_ref()
    }

    pub fn constraint_violation(&self) -> Option<&Anomaly> {
        self.slots[2].as_ref()
    }

    pub fn time_ordering_violation(&self) -> Option<&Anomaly> {
        self.slots[3].as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let anomalies = Anomalies::default();
        assert!(anomalies.is_empty());
        assert_eq!(anomalies.len(), 0);
        assert!(anomalies.constraint_violation().is_none());
    }

    #[test]
    fn keeps_one_per_kind() {
        let mut anomalies = Anomalies::default();
        anomalies.record(Anomaly::ConstraintViolation {
            distance: 1.0,
            result: 1.5,
        });
        anomalies.record(Anomaly::ConstraintViolation {
            distance: 1.0,
            result: 2.0,
        });
        anomalies.record(Anomaly::NegativeDistance { distance: -3.0 });

        assert_eq!(anomalies.len(), 2);
        assert_eq!(
            anomalies.constraint_violation(),
            Some(&Anomaly::ConstraintViolation {
                distance: 1.0,
                result: 2.0
            })
        );
        // taxonomy order, not insertion order
        let first = anomalies.iter().next();
        assert!(matches!(first, Some(Anomaly::NegativeDistance { .. })));
    }

    #[test]
    fn display_carries_values() {
        let anomaly = Anomaly::ConstraintViolation {
            distance: 90.0,
            result: 90.5,
        };
        assert_eq!(anomaly.to_string(), "distance constraint: 90 result: 90.5");
    }
}
