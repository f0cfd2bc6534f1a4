//! Single-consumer event loop that owns the [`Robot`].
//!
//! Ticks, fixes, orientation readings and wheel commands can come from any
//! thread, but they all land on one channel and are handled one at a time,
//! so a handler never sees the motion state change underneath it.

use crossbeam_channel::{Receiver, Sender};

use crate::drivebase::WheelCommand;
use crate::gps::Fix;
use crate::imu::{HeadingListener, SensorVector};
use crate::robot::Robot;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Tick,
    Fix(Fix),
    /// Raw sensor yaw, converted by the robot's heading source
    Orientation { yaw: f64, values: SensorVector },
    /// Field heading that is already corrected
    Heading(f64),
    Wheel(WheelCommand),
    Shutdown,
}

pub fn channel() -> (Sender<Event>, Receiver<Event>) {
    crossbeam_channel::unbounded()
}

/// Whatever runs on top of the robot base, typically a state machine.
/// Hooks run on the event loop right after the robot has handled the event.
pub trait Behavior {
    /// Called once per loop interval, after dead reckoning.
    fn on_loop(&mut self, _robot: &mut Robot) {}
    fn on_fix(&mut self, _robot: &mut Robot, _fix: &Fix) {}
}

impl Behavior for () {}

pub struct Runtime<B: Behavior> {
    robot: Robot,
    behavior: B,
    events: Receiver<Event>,
    ticks: u64,
}

impl<B: Behavior> Runtime<B> {
    pub fn new(robot: Robot, behavior: B, events: Receiver<Event>) -> Self {
        Self {
            robot,
            behavior,
            events,
            ticks: 0,
        }
    }

    pub fn robot(&self) -> &Robot {
        &self.robot
    }

    /// Handle one event. Returns false once the loop should stop.
    pub fn handle(&mut self, event: Event) -> bool {
        match event {
            Event::Tick => {
                self.ticks += 1;
                self.robot.tick();
                self.behavior.on_loop(&mut self.robot);
            }
            Event::Fix(fix) => {
                self.robot.on_fix(&fix);
                self.behavior.on_fix(&mut self.robot, &fix);
            }
            Event::Orientation { yaw, values } => self.robot.on_orientation(yaw, values),
            Event::Heading(heading) => self.robot.on_sensor_changed(heading, [0.0; 3]),
            Event::Wheel(command) => self.robot.send_wheel_speed(command.left, command.right),
            Event::Shutdown => return false,
        }
        true
    }

    /// Run until [`Event::Shutdown`] or every sender is gone, then hand back
    /// the robot and behaviour.
    pub fn run(mut self) -> (Robot, B) {
        log::info!("event loop started");
        while let Ok(event) = self.events.recv() {
            if !self.handle(event) {
                break;
            }
        }
        log::info!("event loop stopped after {} ticks", self.ticks);
        (self.robot, self.behavior)
    }
}
