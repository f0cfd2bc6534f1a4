//! The robot base layer.
//!
//! Copies GPS fixes and sensor headings into [`MotionState`], keeps a dead
//! reckoning guess between fixes and sends every wheel command. It does not
//! implement a state machine; that belongs to whatever [`Behavior`] runs on
//! top of it.
//!
//! [`Behavior`]: crate::runtime::Behavior

use crate::config::RobotConfig;
use crate::drivebase::{Drivebase, WheelCommand};
use crate::gps::{valid_bearing, Fix, GeoLocation, PositionListener};
use crate::imu::{HeadingListener, HeadingSource, SensorVector};
use crate::odometry::DeadReckoning;
use crate::sink::CommandSink;
use crate::vec::Vec2;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct MotionState {
    /// Best guess at the field position, feet
    pub guess: Vec2,
    /// Position of the most recent fix
    pub gps: Vec2,
    pub fix_count: u64,
    /// Last valid fix bearing, `None` when the fix had no bearing
    pub last_fix_heading: Option<f64>,
    /// Latest field heading from the heading source, degrees
    pub current_heading: f64,
    pub moving_forward: bool,
    pub command: WheelCommand,
}

pub struct Robot {
    state: MotionState,
    dead_reckoning: DeadReckoning,
    drivebase: Drivebase,
    heading_source: Box<dyn HeadingSource + Send>,
}

impl Robot {
    pub fn new(
        config: &RobotConfig,
        sink: Box<dyn CommandSink + Send>,
        heading_source: Box<dyn HeadingSource + Send>,
    ) -> Self {
        Self {
            state: MotionState::default(),
            dead_reckoning: DeadReckoning::new(
                config.default_speed_ft_per_sec,
                config.loop_interval(),
            ),
            drivebase: Drivebase::new(sink, config.forward_threshold),
            heading_source,
        }
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    pub fn dead_reckoning(&self) -> &DeadReckoning {
        &self.dead_reckoning
    }

    /// Runs once per loop interval.
    pub fn tick(&mut self) {
        if self.state.moving_forward {
            self.dead_reckoning
                .advance(&mut self.state.guess, self.state.current_heading);
        }
    }

    /// Always send wheel commands through here: it is what decides whether
    /// GPS bearings may be trusted to reset the sensor heading.
    pub fn send_wheel_speed(&mut self, left: i32, right: i32) {
        let command = WheelCommand::new(left, right);
        self.state.command = command;
        self.state.moving_forward = self.drivebase.send_wheel_speed(command);
    }

    pub fn on_fix(&mut self, fix: &Fix) {
        self.on_location_changed(fix.x, fix.y, fix.bearing, fix.location);
    }

    /// Raw yaw from the orientation sensor, converted by the heading source.
    pub fn on_orientation(&mut self, yaw: f64, orientation_values: SensorVector) {
        let field_heading = self.heading_source.field_heading(yaw);
        self.on_sensor_changed(field_heading, orientation_values);
    }
}

impl PositionListener for Robot {
    fn on_location_changed(&mut self, x: f64, y: f64, bearing: f64, _: Option<GeoLocation>) {
        self.state.fix_count += 1;
        self.state.gps = Vec2::new(x, y);
        self.state.guess = self.state.gps;

        self.state.last_fix_heading = valid_bearing(bearing);
        if let Some(heading) = self.state.last_fix_heading {
            // a GPS bearing only means something while driving straight
            if self.state.moving_forward {
                log::debug!(
                    "recalibrating heading {:.1} -> {heading:.1}",
                    self.state.current_heading
                );
                self.heading_source.set_current_field_heading(heading);
            }
        }
        log::trace!(
            "fix #{} at ({x:.1}, {y:.1}) bearing {:?}",
            self.state.fix_count,
            self.state.last_fix_heading
        );
    }
}

impl HeadingListener for Robot {
    fn on_sensor_changed(&mut self, field_heading: f64, _: SensorVector) {
        self.state.current_heading = field_heading;
    }
}
