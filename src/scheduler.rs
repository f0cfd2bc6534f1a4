use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{select, Receiver, Sender};

use crate::runtime::Event;

/// Sends [`Event::Tick`] at a fixed rate until stopped.
///
/// The first tick goes out immediately, the rest follow a
/// `crossbeam_channel::tick` clock, so a late tick does not push back every
/// tick after it.
pub struct Ticker {
    running: Arc<AtomicBool>,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn(interval: Duration, events: Sender<Event>) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(0);
        let flag = running.clone();
        let handle = thread::spawn(move || run(interval, &flag, &stop_rx, &events));
        Self {
            running,
            stop: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// Once this returns no further tick will be sent. Does not wait out the
    /// current interval.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        // disconnecting wakes the select below
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("ticker thread panicked");
            }
        }
    }
}

fn run(interval: Duration, running: &AtomicBool, stop: &Receiver<()>, events: &Sender<Event>) {
    let clock = crossbeam_channel::tick(interval);
    let send_tick = || {
        if !running.load(Ordering::Acquire) {
            return false;
        }
        if events.send(Event::Tick).is_err() {
            log::debug!("event loop gone, ticker exiting");
            return false;
        }
        true
    };

    if !send_tick() {
        return;
    }
    loop {
        select! {
            recv(clock) -> _ => {
                if !send_tick() {
                    break;
                }
            }
            recv(stop) -> _ => break,
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn ticks_until_stopped() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut ticker = Ticker::spawn(Duration::from_millis(5), tx);
        let first = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(matches!(first, Event::Tick));
        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(1)),
            Ok(Event::Tick)
        ));

        ticker.stop();
        // drain whatever was sent before stop returned
        while rx.try_recv().is_ok() {}
        thread::sleep(Duration::from_millis(30));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn stop_does_not_wait_out_a_long_interval() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut ticker = Ticker::spawn(Duration::from_secs(3), tx);
        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(1)),
            Ok(Event::Tick)
        ));

        let start = Instant::now();
        ticker.stop();
        let took = start.elapsed();
        assert!(took < Duration::from_millis(200), "stop took {took:?}");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn drop_stops_promptly() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let ticker = Ticker::spawn(Duration::from_secs(60), tx);
        rx.recv_timeout(Duration::from_secs(1)).unwrap();
        let start = Instant::now();
        drop(ticker);
        assert!(start.elapsed() < Duration::from_millis(200));
    }

    #[test]
    fn exits_when_receiver_dropped() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut ticker = Ticker::spawn(Duration::from_millis(1), tx);
        drop(rx);
        ticker.stop();
    }
}
