//! Simulated robot for trying the base layer without hardware.
//!
//! The main thread plays the world: it integrates a differential drive from
//! whatever the script last commanded, feeds a yaw sensor that drifts and
//! reports a fix once per second with a bearing taken from the last two
//! positions.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use fieldbot::config::Config;
use fieldbot::drivebase::WheelCommand;
use fieldbot::gps::{Fix, NO_HEADING};
use fieldbot::imu::{wrap_degrees, FieldOrientation};
use fieldbot::robot::Robot;
use fieldbot::runtime::{self, Behavior, Event, Runtime};
use fieldbot::scheduler::Ticker;
use fieldbot::sink::LogSink;
use fieldbot::vec::Vec2;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How long to run, seconds
    #[arg(short, long, default_value_t = 15)]
    seconds: u64,

    /// Sensor drift, degrees per second
    #[arg(long, default_value_t = 2.0, allow_hyphen_values = true)]
    drift: f64,
}

/// Full duty cycle speed of the simulated robot, feet per second
const TOP_SPEED: f64 = 5.6;
/// Spin rate with wheels at full opposite duty, degrees per second
const TOP_TURN_RATE: f64 = 180.0;
const WORLD_STEP: Duration = Duration::from_millis(20);
const FIX_PERIOD: Duration = Duration::from_secs(1);

/// Drive, turn left, drive, stop. Steps are counted in loop ticks.
struct Script {
    loops: u32,
    commanded: Arc<Mutex<WheelCommand>>,
}

impl Script {
    fn step(loops: u32) -> WheelCommand {
        match loops {
            0..=49 => WheelCommand::new(150, 150),
            50..=59 => WheelCommand::new(-120, 120),
            60..=109 => WheelCommand::new(150, 150),
            _ => WheelCommand::new(0, 0),
        }
    }
}

impl Behavior for Script {
    fn on_loop(&mut self, robot: &mut Robot) {
        let command = Self::step(self.loops);
        self.loops += 1;
        if command != robot.state().command {
            robot.send_wheel_speed(command.left, command.right);
            if let Ok(mut commanded) = self.commanded.lock() {
                *commanded = command;
            }
        }
    }

    fn on_fix(&mut self, robot: &mut Robot, fix: &Fix) {
        log::info!(
            "fix ({:6.1}, {:6.1}) bearing {:>6} heading {:6.1}",
            fix.x,
            fix.y,
            fix.heading().map_or("none".to_string(), |h| format!("{h:.1}")),
            robot.state().current_heading
        );
    }
}

struct World {
    position: Vec2,
    heading: f64,
    sensor_yaw: f64,
    last_fix: Vec2,
}

impl World {
    fn advance(&mut self, command: WheelCommand, dt: f64, drift: f64) {
        let left = command.left as f64 / 255.0;
        let right = command.right as f64 / 255.0;
        let turn = (right - left) / 2.0 * TOP_TURN_RATE * dt;
        self.heading = wrap_degrees(self.heading + turn);
        self.sensor_yaw += turn + drift * dt;
        let distance = (left + right) / 2.0 * TOP_SPEED * dt;
        self.position += Vec2::from_heading_degrees(self.heading) * distance;
    }

    fn fix(&mut self) -> Fix {
        let moved = self.position - self.last_fix;
        let bearing = if moved.mag() > 0.5 {
            moved.y.atan2(moved.x).to_degrees()
        } else {
            NO_HEADING
        };
        self.last_fix = self.position;
        Fix::new(self.position.x, self.position.y, bearing)
    }
}

fn main() -> fieldbot::Result<()> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    config.init_logging();

    let robot = Robot::new(
        &config.robot,
        Box::new(LogSink),
        Box::new(FieldOrientation::new(0.0)),
    );
    log::info!(
        "dead reckoning {:.2} ft per {:?} loop",
        robot.dead_reckoning().step_distance(),
        config.robot.loop_interval()
    );
    let commanded = Arc::new(Mutex::new(WheelCommand::default()));
    let script = Script {
        loops: 0,
        commanded: commanded.clone(),
    };

    let (tx, rx) = runtime::channel();
    let runtime = thread::spawn(move || Runtime::new(robot, script, rx).run());
    let mut ticker = Ticker::spawn(config.robot.loop_interval(), tx.clone());

    let mut world = World {
        position: Vec2::ZERO,
        heading: 0.0,
        sensor_yaw: 0.0,
        last_fix: Vec2::ZERO,
    };
    let start = Instant::now();
    let mut last_fix = start;
    while start.elapsed() < Duration::from_secs(args.seconds) {
        let command = match commanded.lock() {
            Ok(command) => *command,
            Err(poisoned) => *poisoned.into_inner(),
        };
        world.advance(command, WORLD_STEP.as_secs_f64(), args.drift);
        let _ = tx.send(Event::Orientation {
            yaw: world.sensor_yaw,
            values: [world.sensor_yaw as f32, 0.0, 0.0],
        });
        if last_fix.elapsed() >= FIX_PERIOD {
            last_fix = Instant::now();
            let _ = tx.send(Event::Fix(world.fix()));
        }
        thread::sleep(WORLD_STEP);
    }

    ticker.stop();
    let _ = tx.send(Event::Shutdown);
    let Ok((robot, _)) = runtime.join() else {
        log::error!("event loop panicked");
        return Ok(());
    };

    let guess = robot.state().guess;
    log::info!(
        "truth ({:.1}, {:.1}) heading {:.1}, guess ({:.1}, {:.1}) heading {:.1}, error {:.2} ft",
        world.position.x,
        world.position.y,
        world.heading,
        guess.x,
        guess.y,
        robot.state().current_heading,
        world.position.distance_to(guess)
    );
    Ok(())
}
