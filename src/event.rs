use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, KeyEvent, KeyEventKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Tick,
}

/// Where the game loop gets its next key press or tick.
pub trait EventSource {
    fn next(&mut self) -> io::Result<Event>;
}

/// Polls the terminal on the calling thread, waiting at most until the next
/// tick is due. Ticks keep their fixed cadence while keys are held down.
pub struct TerminalEvents {
    tick: Duration,
    next_tick: Instant,
}

impl TerminalEvents {
    pub fn new(tick: Duration) -> Self {
        Self {
            tick,
            next_tick: Instant::now() + tick,
        }
    }
}

impl EventSource for TerminalEvents {
    fn next(&mut self) -> io::Result<Event> {
        loop {
            let now = Instant::now();
            if now >= self.next_tick {
                self.next_tick += self.tick;
                // Drop missed ticks instead of replaying them in a burst
                if self.next_tick < now {
                    self.next_tick = now + self.tick;
                }
                return Ok(Event::Tick);
            }
            if event::poll(self.next_tick - now)? {
                if let event::Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        return Ok(Event::Key(key));
                    }
                }
            }
        }
    }
}
