//! The I/O the game needs from whatever it runs on: somewhere to paint squares,
//! a queue of key events and a fixed-rate clock.

use std::{thread::sleep, time::{Duration, Instant}};

use crossterm::style::Color;
use log::warn;

use crate::geometry::Position;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Escape,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Quit,
    KeyUp(Key),
}

pub trait Renderer {
    /// Paints an opaque `size x size` square with its top-left corner at `position`.
    fn draw_square(&mut self, position: Position, size: i32, color: Color);

    fn clear(&mut self, color: Color);

    fn present(&mut self) -> crossterm::Result<()>;
}

pub trait InputSource {
    /// Drains every event queued since the last call without blocking.
    fn poll_events(&mut self) -> crossterm::Result<Vec<Event>>;
}

pub trait Clock {
    /// Blocks until the next tick boundary at `target_hz`.
    fn tick(&mut self, target_hz: u32);
}

pub struct FixedRateClock {
    next_tick: Option<Instant>,
}

impl FixedRateClock {
    pub fn new() -> Self {
        FixedRateClock { next_tick: None }
    }
}

impl Clock for FixedRateClock {
    fn tick(&mut self, target_hz: u32) {
        let period = Duration::from_secs(1) / target_hz.max(1);
        let now = Instant::now();

        let deadline = match self.next_tick {
            Some(deadline) => deadline,
            None => {
                // The first tick only starts the schedule
                self.next_tick = Some(now + period);
                return;
            }
        };

        if deadline > now {
            sleep(deadline - now);
            self.next_tick = Some(deadline + period);
        } else if now - deadline > period {
            warn!("Fell {:?} behind schedule, skipping ahead", now - deadline);
            self.next_tick = Some(now + period);
        } else {
            self.next_tick = Some(deadline + period);
        }
    }
}
