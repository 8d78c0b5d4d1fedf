//! Host side of the demo: effect execution and terminal commands

use super::app::AppMsg;
use super::counter::CounterMsg;
use super::palette::PaletteMsg;
use crate::error::ExecutorError;
use crate::runtime::EffectExecutor;
use crate::service::{RequestId, ServiceMsg};
use crate::HostEffect;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct SleepPayload {
    ms: u64,
}

/// Runs the demo's `log` and `sleep` effects
pub struct DemoExecutor {
    extra_delay: Duration,
}

impl DemoExecutor {
    pub fn new(extra_delay: Duration) -> Self {
        Self { extra_delay }
    }
}

#[async_trait]
impl EffectExecutor for DemoExecutor {
    async fn execute(&self, effect: &HostEffect) -> Result<Value, ExecutorError> {
        if !self.extra_delay.is_zero() {
            tokio::time::sleep(self.extra_delay).await;
        }
        match effect.kind.as_str() {
            "log" => {
                tracing::info!(payload = %effect.payload, "Unit log");
                Ok(Value::Null)
            }
            "sleep" => {
                let payload: SleepPayload = serde_json::from_value(effect.payload.clone())
                    .map_err(|e| ExecutorError::invalid_payload(e.to_string()))?;
                tokio::time::sleep(Duration::from_millis(payload.ms)).await;
                Ok(effect.payload.clone())
            }
            other => Err(ExecutorError::unsupported(other)),
        }
    }
}

/// What a line of terminal input asks for
#[derive(Debug)]
pub enum Command {
    Send(AppMsg),
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  inc | dec | ask | save       counter
  color | flash                palette
  pick number <id> <value>     answer a number picker request
  pick color <id> <value>      answer a color picker request
  show | help | quit";

/// Parse one input line. Returns `None` for anything unrecognized.
pub fn parse_command(line: &str) -> Option<Command> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let msg = match words.as_slice() {
        ["inc"] => AppMsg::Counter(CounterMsg::Increment),
        ["dec"] => AppMsg::Counter(CounterMsg::Decrement),
        ["ask"] => AppMsg::Counter(CounterMsg::AskNumber),
        ["save"] => AppMsg::Counter(CounterMsg::Save),
        ["color"] => AppMsg::Palette(PaletteMsg::AskColor),
        ["flash"] => AppMsg::Palette(PaletteMsg::Flash),
        ["show"] | [] => AppMsg::Refresh,
        ["pick", picker, id, value @ ..] if !value.is_empty() => {
            let resolve = ServiceMsg::Resolve {
                id: RequestId(id.parse().ok()?),
                value: parse_value(&value.join(" ")),
            };
            match *picker {
                "number" => AppMsg::NumberPicker(resolve),
                "color" => AppMsg::ColorPicker(resolve),
                _ => return None,
            }
        }
        ["help"] => return Some(Command::Help),
        ["quit" | "exit"] => return Some(Command::Quit),
        _ => return None,
    };
    Some(Command::Send(msg))
}

/// JSON if it parses, a plain string otherwise
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
