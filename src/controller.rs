use crate::display::{DisplayRenderer, Surface};
use crate::error::ScopeError;
use crate::fps::FrameRateMonitor;
use crate::inspector;
use crate::keymap;
use crate::machine::Machine;
use crate::view::Views;

/// glyphs for the play/pause indicator
const PLAY_GLYPH: &str = "\u{25b6}"; // ▶
const PAUSE_GLYPH: &str = "\u{23f8}"; // ⏸

/// opaque cancellation token for one scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle(u64);

/// Whether a frame callback is scheduled. The absence of a handle is the
/// sole source of truth for "paused".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Stopped,
    Running(FrameHandle),
}

/// Issues frame handles and tracks the single live one. Cancelling a
/// handle that is no longer live is a no-op, so a stale callback can't
/// disturb a newer schedule.
pub struct FrameScheduler {
    next: u64,
    live: Option<FrameHandle>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        FrameScheduler {
            next: 1,
            live: None,
        }
    }

    pub fn schedule(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next);
        self.next += 1;
        self.live = Some(handle);
        handle
    }

    pub fn cancel(&mut self, handle: FrameHandle) {
        if self.live == Some(handle) {
            self.live = None;
        }
    }

    pub fn live(&self) -> Option<FrameHandle> {
        self.live
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        FrameScheduler::new()
    }
}

/// The run/paused state machine that drives everything else. One `frame`
/// call is one scheduled callback: record an FPS sample, render the state
/// the previous frame left behind, then advance the machine and
/// reschedule. Rendering deliberately happens before the ticks, so the
/// screen always shows a frame boundary, never a half-advanced state.
pub struct AnimationController<'a> {
    machine: &'a mut dyn Machine,
    surface: &'a mut dyn Surface,
    renderer: DisplayRenderer,
    fps: FrameRateMonitor,
    scheduler: FrameScheduler,
    state: AnimationState,
    speed: u32,
}

impl<'a> AnimationController<'a> {
    /// `speed` is the fixed tick multiplier applied every frame; `now_ms`
    /// seeds the FPS monitor
    pub fn new(
        machine: &'a mut dyn Machine,
        surface: &'a mut dyn Surface,
        renderer: DisplayRenderer,
        speed: u32,
        now_ms: f64,
    ) -> Self {
        let mut controller = AnimationController {
            machine,
            surface,
            renderer,
            fps: FrameRateMonitor::new(now_ms),
            scheduler: FrameScheduler::new(),
            state: AnimationState::Stopped,
            speed,
        };
        controller.surface.set_indicator(PLAY_GLYPH);
        controller.surface.set_fps("fps: 0 (0)");
        controller
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, AnimationState::Stopped)
    }

    /// schedule the first frame; a no-op unless stopped
    pub fn play(&mut self) {
        if let AnimationState::Stopped = self.state {
            let handle = self.scheduler.schedule();
            self.state = AnimationState::Running(handle);
            self.surface.set_indicator(PAUSE_GLYPH);
        }
    }

    /// cancel the scheduled frame and render once more, so the screen
    /// matches the instant of pausing; a no-op unless running
    pub fn pause(&mut self) -> Result<(), ScopeError> {
        if let AnimationState::Running(handle) = self.state {
            self.scheduler.cancel(handle);
            self.state = AnimationState::Stopped;
            self.surface.set_indicator(PLAY_GLYPH);
            self.render(true)?;
        }
        Ok(())
    }

    pub fn toggle(&mut self) -> Result<(), ScopeError> {
        match self.state {
            AnimationState::Running(_) => self.pause(),
            AnimationState::Stopped => {
                self.play();
                Ok(())
            }
        }
    }

    /// One scheduled frame callback. Returns without effect when stopped
    /// (a cancelled callback firing late). Any error stops the animation:
    /// the handle is cancelled, the indicator reverts, and the caller
    /// reports the error once rather than retrying.
    pub fn frame(&mut self, now_ms: f64) -> Result<(), ScopeError> {
        let handle = match self.state {
            AnimationState::Running(handle) => handle,
            AnimationState::Stopped => return Ok(()),
        };

        let sample = self.fps.record(now_ms);
        self.surface.set_fps(&sample.panel_text());

        if let Err(e) = self.render(false) {
            self.stop(handle);
            return Err(e);
        }

        for _ in 0..self.speed {
            if let Err(fault) = self.machine.tick() {
                self.stop(handle);
                return Err(fault.into());
            }
        }

        self.scheduler.cancel(handle);
        self.state = AnimationState::Running(self.scheduler.schedule());
        Ok(())
    }

    /// forward a host key transition through the keymap
    pub fn key_down(&mut self, host_code: u8) {
        keymap::key_down(&mut *self.machine, host_code);
    }

    pub fn key_up(&mut self, host_code: u8) {
        keymap::key_up(&mut *self.machine, host_code);
    }

    pub fn load_rom(&mut self, rom: &[u8]) {
        // views are re-derived next render, so the reallocation is safe
        self.machine.load_rom(rom);
    }

    fn stop(&mut self, handle: FrameHandle) {
        self.scheduler.cancel(handle);
        self.state = AnimationState::Stopped;
        self.surface.set_indicator(PLAY_GLYPH);
    }

    /// one full render pass from freshly derived views
    fn render(&mut self, paused: bool) -> Result<(), ScopeError> {
        let views = Views::derive(&*self.machine)?;
        self.renderer.draw_pixels(&mut *self.surface, views.display)?;
        inspector::draw_registers(&mut *self.surface, views.registers);
        inspector::draw_memory(&mut *self.surface, &views, paused);
        self.surface.present()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{DummySurface, GridGeometry, Paint};
    use crate::machine::{Chip8, DummyMachine};
    use crate::rom::TEST_ROM;

    fn renderer_for(machine: &dyn Machine) -> DisplayRenderer {
        DisplayRenderer::new(
            GridGeometry::new(machine.display_width(), machine.display_height(), 1),
            false,
        )
    }

    #[test]
    fn test_play_from_stopped_schedules_a_frame() {
        let mut m = DummyMachine::new(2, 2);
        let mut s = DummySurface::new();
        let r = renderer_for(&m);
        {
            let mut c = AnimationController::new(&mut m, &mut s, r, 1, 0.0);
            assert!(c.is_paused());
            c.play();
            assert!(matches!(c.state(), AnimationState::Running(_)));
            assert!(c.scheduler.live().is_some());
        }
        assert_eq!(s.indicator, PAUSE_GLYPH);
    }

    #[test]
    fn test_play_while_running_is_a_no_op() {
        let mut m = DummyMachine::new(2, 2);
        let mut s = DummySurface::new();
        let r = renderer_for(&m);
        let mut c = AnimationController::new(&mut m, &mut s, r, 1, 0.0);
        c.play();
        let before = c.state();
        c.play();
        assert_eq!(c.state(), before);
    }

    #[test]
    fn test_pause_clears_the_handle_and_renders_once() {
        let mut m = DummyMachine::new(2, 2);
        let mut s = DummySurface::new();
        let r = renderer_for(&m);
        {
            let mut c = AnimationController::new(&mut m, &mut s, r, 1, 0.0);
            c.play();
            c.pause().unwrap();
            assert!(c.is_paused());
            assert!(c.scheduler.live().is_none());
        }
        assert_eq!(s.indicator, PLAY_GLYPH);
        assert_eq!(s.presented, 1);
        // the pause render shows the memory dump
        assert!(s.memory.contains("000: "));
    }

    #[test]
    fn test_pause_while_stopped_is_a_no_op() {
        let mut m = DummyMachine::new(2, 2);
        let mut s = DummySurface::new();
        let r = renderer_for(&m);
        {
            let mut c = AnimationController::new(&mut m, &mut s, r, 1, 0.0);
            c.pause().unwrap();
            assert!(c.is_paused());
        }
        assert_eq!(s.presented, 0);
    }

    #[test]
    fn test_toggle_flips_both_ways() {
        let mut m = DummyMachine::new(2, 2);
        let mut s = DummySurface::new();
        let r = renderer_for(&m);
        let mut c = AnimationController::new(&mut m, &mut s, r, 1, 0.0);
        c.toggle().unwrap();
        assert!(!c.is_paused());
        c.toggle().unwrap();
        assert!(c.is_paused());
    }

    #[test]
    fn test_frame_while_stopped_is_a_stale_callback() {
        let mut m = DummyMachine::new(2, 2);
        let mut s = DummySurface::new();
        let r = renderer_for(&m);
        {
            let mut c = AnimationController::new(&mut m, &mut s, r, 1, 0.0);
            c.frame(16.0).unwrap();
        }
        assert_eq!(m.ticks, 0);
        assert_eq!(s.presented, 0);
    }

    #[test]
    fn test_frame_renders_before_ticking() {
        let mut m = DummyMachine::new(2, 2);
        let mut s = DummySurface::new();
        let r = renderer_for(&m);
        {
            let mut c = AnimationController::new(&mut m, &mut s, r, 1, 0.0);
            c.play();
            c.frame(16.0).unwrap();
        }
        // the dummy's tick lights its first display cell, but the render
        // happened first, so the surface still shows it off
        assert_eq!(m.buf[0], 1);
        assert_eq!(s.rects[0].4, Paint::Off);
        assert_eq!(m.ticks, 1);
        assert_eq!(s.presented, 1);
        assert!(s.fps.starts_with("fps: "));
    }

    #[test]
    fn test_frame_applies_the_speed_multiplier() {
        let mut m = DummyMachine::new(2, 2);
        let mut s = DummySurface::new();
        let r = renderer_for(&m);
        {
            let mut c = AnimationController::new(&mut m, &mut s, r, 4, 0.0);
            c.play();
            c.frame(16.0).unwrap();
            c.frame(32.0).unwrap();
        }
        assert_eq!(m.ticks, 8);
    }

    #[test]
    fn test_frame_reschedules_with_a_fresh_handle() {
        let mut m = DummyMachine::new(2, 2);
        let mut s = DummySurface::new();
        let r = renderer_for(&m);
        let mut c = AnimationController::new(&mut m, &mut s, r, 1, 0.0);
        c.play();
        let first = match c.state() {
            AnimationState::Running(h) => h,
            _ => unreachable!(),
        };
        c.frame(16.0).unwrap();
        match c.state() {
            AnimationState::Running(second) => assert_ne!(first, second),
            _ => panic!("frame should stay running"),
        }
    }

    #[test]
    fn test_machine_fault_stops_the_loop() {
        let mut m = DummyMachine::new(2, 2);
        m.fault_after = Some(0);
        let mut s = DummySurface::new();
        let r = renderer_for(&m);
        {
            let mut c = AnimationController::new(&mut m, &mut s, r, 1, 0.0);
            c.play();
            let err = c.frame(16.0).unwrap_err();
            assert!(matches!(err, ScopeError::Machine(_)));
            assert!(c.is_paused());
            assert!(c.scheduler.live().is_none());
        }
        assert_eq!(s.indicator, PLAY_GLYPH);
    }

    #[test]
    fn test_bad_region_aborts_the_render_and_stops() {
        let mut m = DummyMachine::new(2, 2);
        m.memory.len = 10_000;
        let mut s = DummySurface::new();
        let r = renderer_for(&m);
        let mut c = AnimationController::new(&mut m, &mut s, r, 1, 0.0);
        c.play();
        let err = c.frame(16.0).unwrap_err();
        assert!(matches!(err, ScopeError::OutOfBounds { .. }));
        assert!(c.is_paused());
    }

    #[test]
    fn test_stale_cancel_is_harmless() {
        let mut scheduler = FrameScheduler::new();
        let old = scheduler.schedule();
        let fresh = scheduler.schedule();
        scheduler.cancel(old);
        assert_eq!(scheduler.live(), Some(fresh));
    }

    #[test]
    fn test_key_transitions_reach_the_machine() {
        let mut m = DummyMachine::new(2, 2);
        let mut s = DummySurface::new();
        let r = renderer_for(&m);
        {
            let mut c = AnimationController::new(&mut m, &mut s, r, 1, 0.0);
            c.key_down(b'1');
            c.key_up(b'1');
            c.key_down(13); // unmapped
        }
        assert_eq!(m.key_events, vec![(0x1, true), (0x1, false)]);
    }

    #[test]
    fn test_liveness_with_the_builtin_rom() {
        let mut m = Chip8::new();
        m.load_rom(&TEST_ROM);
        let mut s = DummySurface::new();
        let r = renderer_for(&m);
        {
            let mut c = AnimationController::new(&mut m, &mut s, r, 4, 0.0);
            c.play();
            for i in 1..=100 {
                c.frame(i as f64 * 16.0).unwrap();
            }
        }
        let display = m.display_region().slice(m.buffer()).unwrap();
        assert!(display.iter().any(|&px| px != 0));
    }

    #[test]
    fn test_rom_swap_mid_run_survives_a_buffer_growth() {
        let mut m = Chip8::new();
        m.load_rom(&TEST_ROM);
        let mut s = DummySurface::new();
        let r = renderer_for(&m);
        let mut c = AnimationController::new(&mut m, &mut s, r, 1, 0.0);
        c.play();
        c.frame(16.0).unwrap();
        // swapping in a program big enough to grow the buffer must not
        // disturb the next frame, because views are derived fresh
        c.load_rom(&vec![0x77; 6000]);
        c.frame(32.0).unwrap();
        assert!(!c.is_paused());
    }

    #[test]
    fn test_play_then_pause_leaves_a_finite_fps() {
        let mut m = Chip8::new();
        m.load_rom(&TEST_ROM);
        let mut s = DummySurface::new();
        let r = renderer_for(&m);
        {
            let mut c = AnimationController::new(&mut m, &mut s, r, 1, 0.0);
            c.play();
            c.pause().unwrap();
        }
        let body = s.fps.strip_prefix("fps: ").unwrap();
        let (inst, rest) = body.split_once(" (").unwrap();
        let mean = rest.strip_suffix(')').unwrap();
        for value in [inst, mean] {
            let value: f64 = value.parse().unwrap();
            assert!(value.is_finite() && value >= 0.0);
        }
    }
}
