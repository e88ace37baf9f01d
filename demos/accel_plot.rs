use std::error::Error;

use accel_designer::{AccelDesigner, MotionLimits, Profile};
use gnuplot::*;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    // -----------------------
    // 1. Set up parameters
    // -----------------------
    let j_max = 240_000.0; // Maximum jerk [mm/s/s/s]
    let a_max = 3_600.0; // Maximum acceleration [mm/s/s]
    let v_start = 0.0; // Start velocity [mm/s]
    let v_sat = 1_200.0; // Saturation velocity [mm/s]
    let v_target = 300.0; // Target end velocity [mm/s]
    let distance = 180.0; // Travel distance [mm]

    // -------------------------
    // 2. Design the trajectory
    // -------------------------
    let limits = MotionLimits::new(j_max, a_max);
    let ad = AccelDesigner::new(limits, v_start, v_sat, v_target, distance);
    println!("{ad}");
    for anomaly in ad.anomalies().iter() {
        eprintln!("Warning: {anomaly}");
    }

    // -------------------------
    // 3. Sample at the control period
    // -------------------------
    let period = 0.001;
    let samples: Vec<_> = ad.samples(period).collect();
    if samples.is_empty() {
        return Err("Trajectory has no duration. Check inputs.".into());
    }
    let time_axis: Vec<f64> = samples.iter().map(|s| s.time).collect();
    let positions: Vec<f64> = samples.iter().map(|s| s.pos).collect();
    let velocities: Vec<f64> = samples.iter().map(|s| s.vel).collect();
    let accelerations: Vec<f64> = samples.iter().map(|s| s.acc).collect();
    let jerks: Vec<f64> = samples.iter().map(|s| s.jrk).collect();

    // --------------
    // 4. Plot data
    // --------------
    // One sub-plot per derivative, jerk on top.
    let mut fg = Figure::new();
    let rows = [
        ("jerk [mm/s/s/s]", &jerks, "purple"),
        ("accel. [mm/s/s]", &accelerations, "green"),
        ("velocity [mm/s]", &velocities, "red"),
        ("position [mm]", &positions, "blue"),
    ];
    fg.set_multiplot_layout(rows.len(), 1);
    for (label, values, color) in rows {
        let axes = fg.axes2d();
        axes.set_y_label(label, &[]);
        axes.set_x_label("time [s]", &[]);
        axes.lines(&time_axis, values.iter(), &[Color(color.into())]);
    }

    // Attempt to show in a pop-up window (might require gnuplot installed)
    fg.show().map_err(|e| format!("Failed to display plot: {e}"))?;

    println!("Plot generated. Total motion time: {:.3} seconds.", ad.t_end());
    Ok(())
}
