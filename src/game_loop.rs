use std::time::Duration;

use log::{debug, info};
use ratatui::backend::Backend;
use ratatui::Terminal;

use crate::app::Launcher;
use crate::error::LoopError;
use crate::event::{Event, EventSource};
use crate::ui;

/// Fixed-timestep driver: draw, wait for the next event, then either forward
/// the key or advance the launcher by exactly one `tick`.
pub struct GameLoop {
    tick: Duration,
}

impl GameLoop {
    pub fn new(tick: Duration) -> Self {
        Self { tick }
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    pub fn run<B: Backend, E: EventSource>(
        &self,
        terminal: &mut Terminal<B>,
        events: &mut E,
        launcher: &mut Launcher,
    ) -> Result<(), LoopError> {
        info!("game loop started, tick {:?}", self.tick);
        let mut ticks: u64 = 0;
        while !launcher.should_quit() {
            terminal
                .draw(|frame| ui::render(frame, launcher))
                .map_err(LoopError::Render)?;

            match events.next().map_err(LoopError::Input)? {
                Event::Tick => {
                    ticks += 1;
                    launcher.update(self.tick);
                }
                Event::Key(key) => launcher.handle_key(key),
            }
        }
        debug!("game loop stopped after {ticks} ticks");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;

    use crate::config::Config;
    use crate::games::{GameId, GameState};
    use crate::scores::Leaderboard;
    use crate::theme::ThemeProvider;

    /// Replays a fixed list of events, then fails.
    struct Script(VecDeque<Event>);

    impl Script {
        fn new(events: impl IntoIterator<Item = Event>) -> Self {
            Self(events.into_iter().collect())
        }
    }

    impl EventSource for Script {
        fn next(&mut self) -> io::Result<Event> {
            self.0
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
        }
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    fn launcher() -> Launcher {
        let config = Config {
            seed: Some(9),
            ..Config::default()
        };
        Launcher::new(config, Leaderboard::in_memory(10), ThemeProvider::builtin())
    }

    #[test]
    fn quits_from_menu() {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let mut l = launcher();
        let mut events = Script::new([Event::Tick, Event::Tick, key('q')]);
        GameLoop::new(Duration::from_millis(16))
            .run(&mut terminal, &mut events, &mut l)
            .unwrap();
        assert!(l.should_quit());
        assert!(events.0.is_empty());
    }

    #[test]
    fn ticks_drive_the_active_game() {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let mut l = launcher();
        let step = Duration::from_millis(Config::default().snake.step_ms);
        // One tick per snake step, then pause, then a tick that must be ignored
        let mut script = vec![key('1'), Event::Tick, Event::Tick, key('p'), Event::Tick];
        script.push(Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        let mut events = Script::new(script);

        GameLoop::new(step).run(&mut terminal, &mut events, &mut l).unwrap();
        assert_eq!(l.state(), GameState::Paused);
        let head = l.phase().game().map(|g| g.entities()[0].pos.x);
        assert_eq!(head, Some(7.0));
        assert_eq!(l.selected(), GameId::Snake);
    }

    #[test]
    fn exhausted_input_is_an_error() {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let mut l = launcher();
        let mut events = Script::new([Event::Tick]);
        let err = GameLoop::new(Duration::from_millis(16))
            .run(&mut terminal, &mut events, &mut l)
            .unwrap_err();
        assert!(matches!(err, LoopError::Input(_)));
    }
}
