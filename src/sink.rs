//! Where wheel commands go once they are formatted.

use crate::error::Result;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Accepts one formatted command. No acknowledgement is waited for.
pub trait CommandSink {
    fn send_command(&mut self, command: &str) -> Result<()>;
}

/// Accessory link to the wheel microcontroller over a serial port.
/// Each command is written as one `\n` terminated line.
pub struct SerialSink {
    port: Box<dyn SerialPort>,
}

impl SerialSink {
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        let port = serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_millis(10))
            .open()?;

        log::info!("Opened serial port: {} at {} baud", path, baud_rate);
        Ok(Self { port })
    }
}

impl CommandSink for SerialSink {
    fn send_command(&mut self, command: &str) -> Result<()> {
        self.port.write_all(command.as_bytes())?;
        self.port.write_all(b"\n")?;
        self.port.flush()?;
        Ok(())
    }
}

/// Logs commands instead of sending them, for runs without hardware.
#[derive(Debug, Default)]
pub struct LogSink;

impl CommandSink for LogSink {
    fn send_command(&mut self, command: &str) -> Result<()> {
        log::info!("-> {command}");
        Ok(())
    }
}

/// Keeps every command in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    commands: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    pub fn commands(&self) -> Vec<String> {
        match self.commands.lock() {
            Ok(commands) => commands.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl CommandSink for RecordingSink {
    fn send_command(&mut self, command: &str) -> Result<()> {
        match self.commands.lock() {
            Ok(mut commands) => commands.push(command.to_string()),
            Err(poisoned) => poisoned.into_inner().push(command.to_string()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivebase::{Drivebase, WheelCommand};
    use crate::error::Error;

    struct BrokenLink;

    impl CommandSink for BrokenLink {
        fn send_command(&mut self, _: &str) -> Result<()> {
            Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "unplugged",
            )))
        }
    }

    #[test]
    fn recording_clones_share_buffer() {
        let sink = RecordingSink::default();
        let mut writer = sink.clone();
        writer.send_command("WHEEL SPEED BRAKE 0 BRAKE 0").unwrap();
        assert_eq!(sink.commands(), vec!["WHEEL SPEED BRAKE 0 BRAKE 0"]);
    }

    #[test]
    fn failed_send_does_not_surface() {
        let mut drivebase = Drivebase::new(Box::new(BrokenLink), 30);
        assert!(drivebase.send_wheel_speed(WheelCommand::new(100, 100)));
        assert_eq!(drivebase.last_command(), WheelCommand::new(100, 100));
    }
}
