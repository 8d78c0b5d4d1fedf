//! The demo registry: aggregate state, aggregate messages and the match
//! table binding every unit in

use super::counter::{self, CounterMsg, CounterState};
use super::palette::{self, PaletteMsg, PaletteState};
use crate::descriptor::{Descriptor, ServiceDescriptor};
use crate::effect::{EffectTree, ServiceRequest, ServiceTag};
use crate::router::{
    request_service, unknown_service, update_component, update_service, Dispatched, Registry,
};
use crate::service::{self, PendingTable, ServiceMsg};
use std::fmt::Write as _;

pub const NUMBER_PICKER: ServiceTag = ServiceTag("number_picker");
pub const COLOR_PICKER: ServiceTag = ServiceTag("color_picker");

#[derive(Debug, Default)]
pub struct AppState {
    pub counter: CounterState,
    pub palette: PaletteState,
    pub number_picker: PendingTable<AppMsg>,
    pub color_picker: PendingTable<AppMsg>,
}

#[derive(Debug)]
pub enum AppMsg {
    Counter(CounterMsg),
    Palette(PaletteMsg),
    NumberPicker(ServiceMsg),
    ColorPicker(ServiceMsg),
    /// Re-render without changing anything
    Refresh,
}

fn read_counter(s: &AppState) -> &CounterState {
    &s.counter
}

fn write_counter(counter: CounterState, s: AppState) -> AppState {
    AppState { counter, ..s }
}

fn read_palette(s: &AppState) -> &PaletteState {
    &s.palette
}

fn write_palette(palette: PaletteState, s: AppState) -> AppState {
    AppState { palette, ..s }
}

fn read_number_picker(s: &AppState) -> &PendingTable<AppMsg> {
    &s.number_picker
}

fn write_number_picker(number_picker: PendingTable<AppMsg>, s: AppState) -> AppState {
    AppState { number_picker, ..s }
}

fn read_color_picker(s: &AppState) -> &PendingTable<AppMsg> {
    &s.color_picker
}

fn write_color_picker(color_picker: PendingTable<AppMsg>, s: AppState) -> AppState {
    AppState { color_picker, ..s }
}

const COUNTER: Descriptor<AppState, AppMsg, CounterState, CounterMsg> = Descriptor {
    name: "counter",
    lift: AppMsg::Counter,
    read: read_counter,
    write: write_counter,
    update: counter::update,
};

const PALETTE: Descriptor<AppState, AppMsg, PaletteState, PaletteMsg> = Descriptor {
    name: "palette",
    lift: AppMsg::Palette,
    read: read_palette,
    write: write_palette,
    update: palette::update,
};

type PickerDescriptor = ServiceDescriptor<AppState, AppMsg, PendingTable<AppMsg>, ServiceMsg>;

const NUMBERS: PickerDescriptor = ServiceDescriptor {
    tag: NUMBER_PICKER,
    lift: AppMsg::NumberPicker,
    read: read_number_picker,
    write: write_number_picker,
    update: service::update,
    request: service::request,
};

const COLORS: PickerDescriptor = ServiceDescriptor {
    tag: COLOR_PICKER,
    lift: AppMsg::ColorPicker,
    read: read_color_picker,
    write: write_color_picker,
    update: service::update,
    request: service::request,
};

pub struct DemoApp;

impl Registry for DemoApp {
    type State = AppState;
    type Msg = AppMsg;

    fn init() -> (AppState, EffectTree<AppMsg>) {
        (AppState::default(), EffectTree::empty())
    }

    fn route(msg: AppMsg, state: AppState) -> Dispatched<AppState, AppMsg> {
        match msg {
            AppMsg::Counter(m) => update_component::<Self, _, _>(&COUNTER, m, state),
            AppMsg::Palette(m) => update_component::<Self, _, _>(&PALETTE, m, state),
            AppMsg::NumberPicker(m) => update_service::<Self, _, _>(&NUMBERS, m, state),
            AppMsg::ColorPicker(m) => update_service::<Self, _, _>(&COLORS, m, state),
            AppMsg::Refresh => Dispatched::unchanged(state),
        }
    }

    fn route_request(
        service: ServiceTag,
        request: ServiceRequest<AppMsg>,
        state: AppState,
    ) -> Dispatched<AppState, AppMsg> {
        match service {
            NUMBER_PICKER => request_service::<Self, _, _>(&NUMBERS, request, state),
            COLOR_PICKER => request_service::<Self, _, _>(&COLORS, request, state),
            _ => unknown_service::<Self>(service, &request, state),
        }
    }
}

fn view_picker(name: &str, table: &PendingTable<AppMsg>) -> String {
    let mut out = format!("{name}:");
    if table.is_empty() {
        out.push_str(" idle");
    }
    for entry in table.listing() {
        let _ = write!(out, "\n  [{}] {}", entry.id.0, entry.label);
    }
    out
}

/// Render the whole aggregate for the terminal
pub fn view(state: &AppState) -> String {
    [
        counter::view(&state.counter),
        palette::view(&state.palette),
        view_picker("number picker", &state.number_picker),
        view_picker("color picker", &state.color_picker),
    ]
    .join("\n")
}
