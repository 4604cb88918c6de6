// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video playback capability.
//!
//! The editor never touches a video element directly. It reads the playback
//! position through [`PlaybackSource`] and subscribes to time updates.
//! [`ClockPlayback`] is a wall-clock stand-in for the video that loops over a
//! fixed duration, which is all the overlay logic needs.

use std::time::{Duration, Instant};

/// Callback receiving the playback position in seconds.
pub type TimeUpdateCallback = Box<dyn FnMut(f64)>;

/// Something that plays back over time, like a video element.
pub trait PlaybackSource {
    /// Current playback position in seconds.
    fn current_time(&self) -> f64;
    fn play(&mut self);
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
    /// Register a listener for `timeupdate` notifications.
    fn on_time_update(&mut self, callback: TimeUpdateCallback);

    /// Give the source a chance to emit pending notifications.
    ///
    /// Called by the host once per frame.
    fn poll(&mut self) {}

    /// Jump to `seconds`. Sources that cannot seek ignore this.
    fn seek(&mut self, _seconds: f64) {}

    /// Total length in seconds, if known.
    fn duration(&self) -> Option<f64> {
        None
    }
}

/// Wall-clock driven playback that loops over `duration` seconds.
pub struct ClockPlayback {
    duration: f64,
    looping: bool,
    update_interval: Duration,
    /// Position when `anchor` was taken (or the paused position).
    position: f64,
    /// Instant playback last (re)started; `None` while paused.
    anchor: Option<Instant>,
    last_emit: Option<Instant>,
    listeners: Vec<TimeUpdateCallback>,
}

impl ClockPlayback {
    /// Create a paused clock at position zero.
    pub fn new(duration: f64, looping: bool, update_interval: Duration) -> Self {
        Self {
            duration: duration.max(0.0),
            looping,
            update_interval,
            position: 0.0,
            anchor: None,
            last_emit: None,
            listeners: Vec::new(),
        }
    }

    fn time_at(&self, now: Instant) -> f64 {
        let elapsed = self
            .anchor
            .map(|anchor| now.saturating_duration_since(anchor).as_secs_f64())
            .unwrap_or(0.0);
        let t = self.position + elapsed;
        if self.duration <= 0.0 {
            0.0
        } else if self.looping {
            t % self.duration
        } else {
            t.min(self.duration)
        }
    }

    fn emit(&mut self, now: Instant) {
        let t = self.time_at(now);
        self.last_emit = Some(now);
        for listener in self.listeners.iter_mut() {
            listener(t);
        }
    }

    pub fn play_at(&mut self, now: Instant) {
        if self.anchor.is_none() {
            if !self.looping && self.position >= self.duration {
                self.position = 0.0;
            }
            self.anchor = Some(now);
            self.emit(now);
        }
    }

    pub fn pause_at(&mut self, now: Instant) {
        if self.anchor.is_some() {
            self.position = self.time_at(now);
            self.anchor = None;
            self.emit(now);
        }
    }

    pub fn seek_at(&mut self, seconds: f64, now: Instant) {
        self.position = seconds.clamp(0.0, self.duration);
        if self.anchor.is_some() {
            self.anchor = Some(now);
        }
        self.emit(now);
    }

    /// Emit a time update if playing and the update interval has elapsed.
    pub fn poll_at(&mut self, now: Instant) {
        if self.anchor.is_none() {
            return;
        }
        let due = self
            .last_emit
            .map_or(true, |last| now.saturating_duration_since(last) >= self.update_interval);
        if due {
            self.emit(now);
        }
        if !self.looping && self.time_at(now) >= self.duration {
            self.pause_at(now);
        }
    }

    pub fn time_now(&self, now: Instant) -> f64 {
        self.time_at(now)
    }
}

impl PlaybackSource for ClockPlayback {
    fn current_time(&self) -> f64 {
        self.time_at(Instant::now())
    }

    fn play(&mut self) {
        self.play_at(Instant::now());
    }

    fn pause(&mut self) {
        self.pause_at(Instant::now());
    }

    fn is_paused(&self) -> bool {
        self.anchor.is_none()
    }

    fn on_time_update(&mut self, callback: TimeUpdateCallback) {
        self.listeners.push(callback);
    }

    fn poll(&mut self) {
        self.poll_at(Instant::now());
    }

    fn seek(&mut self, seconds: f64) {
        self.seek_at(seconds, Instant::now());
    }

    fn duration(&self) -> Option<f64> {
        Some(self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(clock: &mut ClockPlayback) -> Rc<RefCell<Vec<f64>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        clock.on_time_update(Box::new(move |t| sink.borrow_mut().push(t)));
        seen
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_paused_clock_does_not_advance() {
        let t0 = Instant::now();
        let clock = ClockPlayback::new(60.0, true, ms(100));
        assert!(clock.is_paused());
        assert_eq!(clock.time_now(t0 + ms(5000)), 0.0);
    }

    #[test]
    fn test_play_pause_tracks_position() {
        let t0 = Instant::now();
        let mut clock = ClockPlayback::new(60.0, true, ms(100));
        clock.play_at(t0);
        assert!((clock.time_now(t0 + ms(2500)) - 2.5).abs() < 1e-6);

        clock.pause_at(t0 + ms(3000));
        assert!((clock.time_now(t0 + ms(9000)) - 3.0).abs() < 1e-6);

        clock.play_at(t0 + ms(10_000));
        assert!((clock.time_now(t0 + ms(11_000)) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_looping_wraps() {
        let t0 = Instant::now();
        let mut clock = ClockPlayback::new(10.0, true, ms(100));
        clock.play_at(t0);
        assert!((clock.time_now(t0 + ms(12_000)) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_non_looping_stops_at_end() {
        let t0 = Instant::now();
        let mut clock = ClockPlayback::new(10.0, false, ms(100));
        clock.play_at(t0);
        clock.poll_at(t0 + ms(12_000));
        assert!(clock.is_paused());
        assert_eq!(clock.time_now(t0 + ms(20_000)), 10.0);
    }

    #[test]
    fn test_time_updates_are_rate_limited() {
        let t0 = Instant::now();
        let mut clock = ClockPlayback::new(60.0, true, ms(100));
        let seen = recorder(&mut clock);

        clock.play_at(t0);
        for step in 1..=10 {
            clock.poll_at(t0 + ms(step * 20));
        }
        // play emits once, then one update per 100ms over 200ms of polling
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn test_seek_emits_and_clamps() {
        let t0 = Instant::now();
        let mut clock = ClockPlayback::new(60.0, true, ms(100));
        let seen = recorder(&mut clock);

        clock.seek_at(75.0, t0);
        assert_eq!(seen.borrow().last().copied(), Some(0.0));

        clock.seek_at(12.0, t0);
        assert_eq!(seen.borrow().last().copied(), Some(12.0));
        assert_eq!(clock.time_now(t0 + ms(1000)), 12.0);
    }
}
