//! Palette component: picks a color, then a brightness for it

use super::app::{COLOR_PICKER, NUMBER_PICKER};
use crate::descriptor::Transition;
use crate::effect::{Continuation, EffectTree, HostEffect, ServiceRequest, Task};
use serde_json::{json, Value};

const FLASH_MS: u64 = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteState {
    pub color: String,
    pub brightness: i64,
    pub history: Vec<String>,
    pub flashing: bool,
}

impl Default for PaletteState {
    fn default() -> Self {
        Self {
            color: "white".to_string(),
            brightness: 100,
            history: vec![],
            flashing: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteMsg {
    AskColor,
    ColorChosen(String),
    BrightnessChosen(i64),
    Flash,
    FlashDone,
}

pub fn update(msg: PaletteMsg, state: &PaletteState) -> Transition<PaletteState, PaletteMsg> {
    match msg {
        PaletteMsg::AskColor => Transition::new(state.clone()).with_effect(EffectTree::request(
            COLOR_PICKER,
            ServiceRequest::new(
                "palette",
                Continuation::new(|v: Value| {
                    PaletteMsg::ColorChosen(v.as_str().unwrap_or("black").to_string())
                }),
            ),
        )),
        // A new color needs a brightness before it is usable
        PaletteMsg::ColorChosen(color) => {
            let mut history = state.history.clone();
            history.push(state.color.clone());
            Transition::new(PaletteState {
                color: color.clone(),
                history,
                ..state.clone()
            })
            .with_effect(EffectTree::request(
                NUMBER_PICKER,
                ServiceRequest::new(
                    format!("palette brightness ({color})"),
                    Continuation::new(|v: Value| {
                        PaletteMsg::BrightnessChosen(v.as_i64().unwrap_or(100).clamp(0, 100))
                    }),
                ),
            ))
        }
        PaletteMsg::BrightnessChosen(brightness) => Transition::new(PaletteState {
            brightness,
            ..state.clone()
        }),
        PaletteMsg::Flash if state.flashing => Transition::new(state.clone()),
        PaletteMsg::Flash => Transition::new(PaletteState {
            flashing: true,
            ..state.clone()
        })
        .with_effect(EffectTree::external(Task::perform(
            HostEffect::new("sleep", json!({ "ms": FLASH_MS })),
            Continuation::new(|_| PaletteMsg::FlashDone),
        ))),
        PaletteMsg::FlashDone => Transition::new(PaletteState {
            flashing: false,
            ..state.clone()
        }),
    }
}

pub fn view(state: &PaletteState) -> String {
    let flash = if state.flashing { " *flashing*" } else { "" };
    format!(
        "palette: {} at {}% (previous: {}){flash}",
        state.color,
        state.brightness,
        if state.history.is_empty() {
            "none".to_string()
        } else {
            state.history.join(", ")
        }
    )
}
