//! A small terminal application built on the router
//!
//! Two components (a counter and a color palette) share two picker
//! services. Picker requests are answered from the terminal with
//! `pick <picker> <id> <value>`.

mod app;
mod counter;
mod host;
mod palette;

pub use app::{view, AppMsg, AppState, DemoApp, COLOR_PICKER, NUMBER_PICKER};
pub use counter::{CounterMsg, CounterState};
pub use host::{parse_command, Command, DemoExecutor, HELP};
pub use palette::{PaletteMsg, PaletteState};
