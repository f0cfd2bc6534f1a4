/// Raw orientation sensor values passed alongside a field heading.
/// Only layers above the robot base look at these.
pub type SensorVector = [f32; 3];

/// Receives heading updates from the heading source.
pub trait HeadingListener {
    fn on_sensor_changed(&mut self, field_heading: f64, orientation_values: SensorVector);
}

/// Turns sensor yaw into field headings and takes drift corrections.
pub trait HeadingSource {
    /// Field heading (degrees) for a raw sensor yaw reading.
    fn field_heading(&mut self, yaw: f64) -> f64;
    /// Correct accumulated drift with a known-good absolute bearing (degrees).
    fn set_current_field_heading(&mut self, bearing: f64);
}

/// Turns a drifting sensor yaw into a field heading by keeping an offset,
/// which is reset whenever a trusted bearing comes in.
#[derive(Debug, Clone, Default)]
pub struct FieldOrientation {
    offset: f64,
    last_yaw: Option<f64>,
}

impl FieldOrientation {
    /// `initial_heading` is the field heading the robot faces when the
    /// first yaw reading arrives.
    pub fn new(initial_heading: f64) -> Self {
        Self {
            offset: initial_heading,
            last_yaw: None,
        }
    }

    /// Feed a raw yaw reading (degrees) and get back the field heading in
    /// [-180, 180).
    pub fn update(&mut self, yaw: f64) -> f64 {
        if self.last_yaw.is_none() {
            // first reading defines the zero of the sensor frame
            self.offset -= yaw;
        }
        self.last_yaw = Some(yaw);
        wrap_degrees(yaw + self.offset)
    }

    #[cfg(test)]
    fn current(&self) -> Option<f64> {
        self.last_yaw.map(|yaw| wrap_degrees(yaw + self.offset))
    }
}

impl HeadingSource for FieldOrientation {
    fn field_heading(&mut self, yaw: f64) -> f64 {
        self.update(yaw)
    }
    fn set_current_field_heading(&mut self, bearing: f64) {
        match self.last_yaw {
            Some(yaw) => self.offset = bearing - yaw,
            None => self.offset = bearing,
        }
        log::debug!("field heading reset to {bearing:.1}");
    }
}

/// Wrap any angle in degrees into [-180, 180).
pub fn wrap_degrees(degrees: f64) -> f64 {
    (degrees + 180.0).rem_euclid(360.0) - 180.0
}
