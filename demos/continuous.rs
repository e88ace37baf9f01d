// Chains several moves end to end and prints the `t,j,a,v,x` table to stdout.

use std::error::Error;
use std::path::PathBuf;

use accel_designer::{AccelDesigner, Config, Profile};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(about = "Print a chained jerk-limited trajectory as CSV")]
struct Args {
    /// TOML file with `[limits]` and `[sampling]` sections
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Moves as `v_sat:v_target:distance`, played back to back
    #[arg(default_values = ["720:720:90", "1200:300:270", "720:0:45"])]
    moves: Vec<String>,
}

fn parse_move(s: &str) -> Result<(f64, f64, f64), Box<dyn Error>> {
    let fields = s
        .split(':')
        .map(str::parse::<f64>)
        .collect::<Result<Vec<_>, _>>()?;
    match fields[..] {
        [v_sat, v_target, distance] => Ok((v_sat, v_target, distance)),
        _ => Err(format!("expected v_sat:v_target:distance, got {s}").into()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let mut v = 0.0;
    let mut x = 0.0;
    let mut t = 0.0;
    for m in &args.moves {
        let (v_sat, v_target, distance) = parse_move(m)?;
        let ad = AccelDesigner::with_start(config.limits, v, v_sat, v_target, distance, x, t);
        eprintln!("{ad}");
        ad.print_csv(config.sampling.period)?;
        v = ad.v_end();
        x = ad.x_end();
        t = ad.t_end();
    }
    Ok(())
}
