use std::path::PathBuf;
use std::thread;

use clap::Parser;
use fieldbot::config::Config;
use fieldbot::imu::FieldOrientation;
use fieldbot::robot::Robot;
use fieldbot::runtime::{self, Runtime};
use fieldbot::scheduler::Ticker;
use fieldbot::sink::{CommandSink, LogSink, SerialSink};

/// Robot base layer: reads FIX/HEADING/WHEEL lines on stdin and drives the
/// wheel controller over serial.
#[derive(Parser, Debug)]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log wheel commands instead of opening the serial port
    #[arg(long)]
    dry_run: bool,

    /// Field heading the robot faces at startup, degrees
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    initial_heading: f64,
}

fn main() -> fieldbot::Result<()> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    config.init_logging();
    if let Some(path) = &args.config {
        log::info!("Using config: {}", path.display());
    }

    let sink: Box<dyn CommandSink + Send> = if args.dry_run {
        Box::new(LogSink)
    } else {
        Box::new(SerialSink::open(&config.serial.port, config.serial.baud_rate)?)
    };
    let robot = Robot::new(
        &config.robot,
        sink,
        Box::new(FieldOrientation::new(args.initial_heading)),
    );

    log::info!(
        "dead reckoning {:.2} ft per {:?} loop",
        robot.dead_reckoning().step_distance(),
        config.robot.loop_interval()
    );
    let (home, away) = (config.field.home(), config.field.away());
    log::info!(
        "playing {:?}: home ({:.6}, {:.6}), away ({:.6}, {:.6})",
        config.field.team,
        home.latitude,
        home.longitude,
        away.latitude,
        away.longitude
    );

    let (tx, rx) = runtime::channel();
    let mut ticker = Ticker::spawn(config.robot.loop_interval(), tx.clone());
    let bridge = thread::spawn(move || {
        let stdin = std::io::stdin();
        fieldbot::bridge::pump(stdin.lock(), &tx)
    });

    let (robot, ()) = Runtime::new(robot, (), rx).run();
    ticker.stop();

    match bridge.join() {
        Ok(result) => result?,
        Err(_) => log::error!("stdin bridge panicked"),
    }

    let state = robot.state();
    log::info!(
        "{} fixes, last guess ({:.1}, {:.1})",
        state.fix_count,
        state.guess.x,
        state.guess.y
    );
    Ok(())
}
