pub mod bridge;
pub mod config;
pub mod drivebase;
pub mod error;
pub mod gps;
pub mod imu;
pub mod odometry;
pub mod robot;
pub mod runtime;
pub mod scheduler;
pub mod sink;
pub mod vec;

pub use error::{Error, Result};
