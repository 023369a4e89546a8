use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

/// how long a pressed key stays held without an auto-repeat refresh;
/// terminals only report presses, so releases have to be synthesized
const KEY_DECAY: Duration = Duration::from_millis(150);

/// what the harness hears from the host keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// a key transition in host code space (ASCII uppercase)
    Key { code: u8, pressed: bool },
    /// the play/pause control
    Toggle,
    Quit,
}

/// Source of host key events. The frame loop drains this once per frame;
/// events arrive independent of the frame cadence.
pub trait InputSource {
    fn poll_events(&mut self) -> Result<Vec<HostEvent>, io::Error>;
}

/// Reads the terminal keyboard through crossterm. Space toggles the
/// animation, Esc (or ctrl-c) quits, everything else is surfaced as a key
/// transition for the keymap to judge. Held keys decay into releases when
/// auto-repeat stops refreshing them.
pub struct CrosstermInput {
    held: HashMap<u8, Instant>,
}

impl CrosstermInput {
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(CrosstermInput {
            held: HashMap::new(),
        })
    }
}

impl Drop for CrosstermInput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl InputSource for CrosstermInput {
    fn poll_events(&mut self) -> Result<Vec<HostEvent>, io::Error> {
        let mut events = Vec::new();

        while poll(Duration::from_millis(0))? {
            if let Event::Key(evt) = read()? {
                match evt.code {
                    KeyCode::Esc => events.push(HostEvent::Quit),
                    KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                        events.push(HostEvent::Quit)
                    }
                    KeyCode::Char(' ') => events.push(HostEvent::Toggle),
                    KeyCode::Char(ch) if ch.is_ascii() => {
                        let code = ch.to_ascii_uppercase() as u8;
                        // a repeat only refreshes the hold timestamp
                        if self.held.insert(code, Instant::now()).is_none() {
                            events.push(HostEvent::Key {
                                code,
                                pressed: true,
                            });
                        }
                    }
                    _ => {}
                }
            }
        }

        let now = Instant::now();
        let expired: Vec<u8> = self
            .held
            .iter()
            .filter(|(_, seen)| now.duration_since(**seen) > KEY_DECAY)
            .map(|(code, _)| *code)
            .collect();
        for code in expired {
            self.held.remove(&code);
            events.push(HostEvent::Key {
                code,
                pressed: false,
            });
        }

        Ok(events)
    }
}

/// scripted input for testing: hands over its events once, then goes quiet
pub struct DummyInput {
    events: Vec<HostEvent>,
}

impl DummyInput {
    pub fn new(events: &[HostEvent]) -> Self {
        DummyInput {
            events: events.to_vec(),
        }
    }
}

impl InputSource for DummyInput {
    fn poll_events(&mut self) -> Result<Vec<HostEvent>, io::Error> {
        Ok(std::mem::take(&mut self.events))
    }
}
