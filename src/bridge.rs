//! Text-line bridge from a host process into the event loop.
//!
//! ```text
//! FIX <x> <y> <bearing> [<latitude> <longitude>]
//! HEADING <yaw>
//! WHEEL <left> <right>
//! QUIT
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::io::BufRead;
use std::str::FromStr;

use crossbeam_channel::Sender;

use crate::drivebase::WheelCommand;
use crate::error::{Error, Result};
use crate::gps::{Fix, GeoLocation};
use crate::runtime::Event;

pub fn parse_line(line_no: usize, line: &str) -> Result<Option<Event>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut words = line.split_whitespace();
    let keyword = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();
    let err = |reason: String| Error::Parse {
        line: line_no,
        reason,
    };

    let event = match (keyword, args.as_slice()) {
        ("FIX", [x, y, bearing]) => Event::Fix(Fix::new(
            number(line_no, x)?,
            number(line_no, y)?,
            number(line_no, bearing)?,
        )),
        ("FIX", [x, y, bearing, lat, lon]) => Event::Fix(Fix {
            x: number(line_no, x)?,
            y: number(line_no, y)?,
            bearing: number(line_no, bearing)?,
            location: Some(GeoLocation {
                latitude: number(line_no, lat)?,
                longitude: number(line_no, lon)?,
            }),
        }),
        ("HEADING", [yaw]) => Event::Orientation {
            yaw: number(line_no, yaw)?,
            values: [0.0; 3],
        },
        ("WHEEL", [left, right]) => {
            Event::Wheel(WheelCommand::new(number(line_no, left)?, number(line_no, right)?))
        }
        ("QUIT", []) => Event::Shutdown,
        ("FIX" | "HEADING" | "WHEEL" | "QUIT", _) => {
            return Err(err(format!("wrong number of arguments for {keyword}")))
        }
        _ => return Err(err(format!("unknown command {keyword:?}"))),
    };
    Ok(Some(event))
}

fn number<T: FromStr>(line_no: usize, word: &str) -> Result<T> {
    word.parse().map_err(|_| Error::Parse {
        line: line_no,
        reason: format!("{word:?} is not a number"),
    })
}

/// Forward every line of `reader` to the event loop until QUIT or end of
/// input. Bad lines are logged and skipped. Always ends with a shutdown.
pub fn pump<R: BufRead>(reader: R, events: &Sender<Event>) -> Result<()> {
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_line(idx + 1, &line) {
            Ok(Some(Event::Shutdown)) => break,
            Ok(Some(event)) => {
                if events.send(event).is_err() {
                    log::warn!("event loop closed, dropping input");
                    return Ok(());
                }
            }
            Ok(None) => {}
            Err(e) => log::warn!("{e}"),
        }
    }
    let _ = events.send(Event::Shutdown);
    Ok(())
}
