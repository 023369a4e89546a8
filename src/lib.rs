///
/// ## Design
///
/// * mirror a machine's whole memory image into live panels: pixel
///   display, register bank, stack, pc/sp, general memory
/// * the machine is opaque behind a capability trait; the harness only
///   ever reads its one shared byte buffer through re-derived views,
///   because a ROM load can reallocate the buffer out from under a
///   cached slice
/// * one cooperative frame loop; render happens before the frame's
///   ticks, so the screen always shows a frame boundary
/// * pause/resume is a tagged state machine around a single scheduled
///   frame handle; no handle means paused, and nothing else does
/// * surfaces and input sources are injected traits so the whole loop
///   runs against dummies in tests
///
/// Model
///
/// Engine
///  |-- machine, surface, input, renderer, rom store (capabilities)
///  |-- AnimationController
///  |    |-- FrameScheduler (one live handle)
///  |    |-- FrameRateMonitor (rolling 100-sample window)
///  |    `-- per-frame: fps -> views -> display/registers/memory -> ticks
///  `-- main loop
///       |-- drain input; space toggles, esc quits, the rest goes
///       |   through the keymap into the machine
///       |-- frame() while running
///       `-- spin-sleep off the rest of the ~60Hz budget
pub mod controller;
pub mod display;
pub mod engine;
pub mod error;
pub mod fps;
pub mod input;
pub mod inspector;
pub mod keymap;
pub mod machine;
pub mod rom;
pub mod term;
pub mod view;
