//! Counter component: asks the number picker for new values

use super::app::NUMBER_PICKER;
use crate::descriptor::Transition;
use crate::effect::{Continuation, EffectTree, HostEffect, ServiceRequest, Task};
use serde_json::{json, Value};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterState {
    pub value: i64,
    /// How many picker answers have been applied
    pub picks: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterMsg {
    Increment,
    Decrement,
    AskNumber,
    SetTo(i64),
    Save,
}

pub fn update(msg: CounterMsg, state: &CounterState) -> Transition<CounterState, CounterMsg> {
    match msg {
        CounterMsg::Increment => Transition::new(CounterState {
            value: state.value.saturating_add(1),
            ..state.clone()
        }),
        CounterMsg::Decrement => Transition::new(CounterState {
            value: state.value.saturating_sub(1),
            ..state.clone()
        }),
        CounterMsg::AskNumber => Transition::new(state.clone()).with_effect(EffectTree::request(
            NUMBER_PICKER,
            ServiceRequest::new(
                "counter",
                Continuation::new(|v: Value| CounterMsg::SetTo(v.as_i64().unwrap_or_default())),
            ),
        )),
        CounterMsg::SetTo(value) => Transition::new(CounterState {
            value,
            picks: state.picks + 1,
        }),
        CounterMsg::Save => Transition::new(state.clone()).with_effect(EffectTree::external(
            Task::fire_and_forget(HostEffect::new(
                "log",
                json!({ "unit": "counter", "value": state.value }),
            )),
        )),
    }
}

pub fn view(state: &CounterState) -> String {
    format!("counter: {} (picked {} times)", state.value, state.picks)
}
