use std::fmt;

use crate::sink::CommandSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelMode {
    Forward,
    Reverse,
    Brake,
}

impl WheelMode {
    pub fn from_duty_cycle(duty_cycle: i32) -> Self {
        match duty_cycle {
            0 => Self::Brake,
            d if d > 0 => Self::Forward,
            _ => Self::Reverse,
        }
    }
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "FORWARD",
            Self::Reverse => "REVERSE",
            Self::Brake => "BRAKE",
        }
    }
}

/// Signed duty cycles for both wheels, nominally -255..=255.
///
/// Magnitudes outside that range are passed through unclamped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WheelCommand {
    pub left: i32,
    pub right: i32,
}

impl WheelCommand {
    pub fn new(left: i32, right: i32) -> Self {
        Self { left, right }
    }
    /// Both wheels above the threshold. The sign is not checked, so a turn
    /// in place at high power also counts.
    pub fn is_forward(&self, threshold: u32) -> bool {
        self.left.unsigned_abs() > threshold && self.right.unsigned_abs() > threshold
    }
}

impl fmt::Display for WheelCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WHEEL SPEED {} {} {} {}",
            WheelMode::from_duty_cycle(self.left).as_str(),
            self.left.unsigned_abs(),
            WheelMode::from_duty_cycle(self.right).as_str(),
            self.right.unsigned_abs(),
        )
    }
}

/// Sends wheel commands to the microcontroller and remembers the last one.
pub struct Drivebase {
    sink: Box<dyn CommandSink + Send>,
    forward_threshold: u32,
    last: WheelCommand,
}

impl Drivebase {
    pub fn new(sink: Box<dyn CommandSink + Send>, forward_threshold: u32) -> Self {
        Self {
            sink,
            forward_threshold,
            last: WheelCommand::default(),
        }
    }
    /// Fire-and-forget: a failed write is logged and otherwise ignored.
    /// Returns whether the command counts as driving forward.
    pub fn send_wheel_speed(&mut self, command: WheelCommand) -> bool {
        self.last = command;
        let line = command.to_string();
        log::debug!("sending {line}");
        if let Err(e) = self.sink.send_command(&line) {
            log::error!("Failed to send wheel command: {e}");
        }
        command.is_forward(self.forward_threshold)
    }
    pub fn last_command(&self) -> WheelCommand {
        self.last
    }
}
