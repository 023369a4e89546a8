use std::error::Error;
use std::time::{Duration, Instant};

use crate::controller::AnimationController;
use crate::display::{DisplayRenderer, Surface};
use crate::input::{HostEvent, InputSource};
use crate::machine::Machine;

/// per-frame budget, for roughly 60 frames a second
const FRAME_BUDGET: Duration = Duration::from_micros(16_667);

/// Wires the capabilities together and runs the cooperative loop: drain
/// input, run the scheduled frame if one is due, sleep off the rest of
/// the frame budget. Everything happens on this one thread; the machine
/// is only ever advanced inside the controller's frame call.
pub struct Engine<'a> {
    controller: AnimationController<'a>,
    input: &'a mut dyn InputSource,
    epoch: Instant,
}

impl<'a> Engine<'a> {
    pub fn new(
        machine: &'a mut dyn Machine,
        surface: &'a mut dyn Surface,
        input: &'a mut dyn InputSource,
        renderer: DisplayRenderer,
        speed: u32,
    ) -> Self {
        let epoch = Instant::now();
        Engine {
            controller: AnimationController::new(machine, surface, renderer, speed, 0.0),
            input,
            epoch,
        }
    }

    fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    /// run until the user quits; starts playing immediately
    pub fn run(&mut self) -> Result<(), Box<dyn Error>> {
        self.controller.play();

        loop {
            let frame_start = Instant::now();

            for event in self.input.poll_events()? {
                match event {
                    HostEvent::Quit => return Ok(()),
                    HostEvent::Toggle => self.controller.toggle()?,
                    HostEvent::Key {
                        code,
                        pressed: true,
                    } => self.controller.key_down(code),
                    HostEvent::Key {
                        code,
                        pressed: false,
                    } => self.controller.key_up(code),
                }
            }

            if !self.controller.is_paused() {
                if let Err(e) = self.controller.frame(self.now_ms()) {
                    // reported once; the controller is stopped and the
                    // loop stays up so the last frame can be read
                    log::error!("animation stopped: {}", e);
                }
            }

            let elapsed = frame_start.elapsed();
            if elapsed < FRAME_BUDGET {
                spin_sleep::sleep(FRAME_BUDGET - elapsed);
            }
        }
    }
}
