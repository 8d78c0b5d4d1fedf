//! End-to-end routing scenarios over a small registry
//!
//! The registry has one component (`Caller`) and five services:
//! - `alpha`, `beta`: plain services, answered only by explicit resolves
//! - `relay`: forwards each request to `alpha` and answers when it does
//! - `countdown`: armed with a depth, asks itself once per level before
//!   answering with the number of levels it went through
//! - `burst`: logs, then answers every request twice on the spot

use super::*;
use crate::descriptor::{Descriptor, ServiceDescriptor, ServiceTransition, Transition};
use crate::effect::{Continuation, EffectTree, HostEffect, ServiceRequest, ServiceTag, Task};
use crate::service::{self, PendingTable, RequestId, ServiceMsg};
use serde_json::{json, Value};
use std::collections::VecDeque;

const ALPHA: ServiceTag = ServiceTag("alpha");
const BETA: ServiceTag = ServiceTag("beta");
const RELAY: ServiceTag = ServiceTag("relay");
const COUNTDOWN: ServiceTag = ServiceTag("countdown");
const BURST: ServiceTag = ServiceTag("burst");

// ============================================================================
// Caller component
// ============================================================================

#[derive(Debug, Default)]
struct CallerState {
    received: Vec<(String, i64)>,
    /// Follow-up requests, one issued per received answer
    plan: VecDeque<(ServiceTag, String)>,
}

#[derive(Debug)]
enum CallerMsg {
    Ask(ServiceTag, String),
    Plan(Vec<(ServiceTag, String)>),
    Got(String, i64),
    Fanout,
}

fn ask(service: ServiceTag, label: &str) -> EffectTree<CallerMsg> {
    let owned = label.to_string();
    EffectTree::request(
        service,
        ServiceRequest::new(
            label,
            Continuation::new(move |v: Value| CallerMsg::Got(owned.clone(), v.as_i64().unwrap_or(-1))),
        ),
    )
}

fn log(text: &str) -> EffectTree<CallerMsg> {
    EffectTree::external(Task::fire_and_forget(HostEffect::new("log", json!(text))))
}

fn caller_update(msg: CallerMsg, state: &CallerState) -> Transition<CallerState, CallerMsg> {
    let mut next = CallerState {
        received: state.received.clone(),
        plan: state.plan.clone(),
    };
    match msg {
        CallerMsg::Ask(service, label) => Transition::new(next).with_effect(ask(service, &label)),
        CallerMsg::Plan(steps) => {
            next.plan.extend(steps);
            Transition::new(next)
        }
        CallerMsg::Got(label, value) => {
            next.received.push((label.clone(), value));
            let follow_up = next.plan.pop_front();
            let mut result = Transition::new(next).with_effect(log(&format!("got {label}")));
            if let Some((service, label)) = follow_up {
                result = result.with_effect(ask(service, &label));
            }
            result
        }
        CallerMsg::Fanout => Transition::new(next).with_effect(EffectTree::batch([
            log("before"),
            ask(COUNTDOWN, "count"),
            log("after"),
        ])),
    }
}

// ============================================================================
// Services
// ============================================================================

#[derive(Debug)]
enum RelayMsg {
    Service(ServiceMsg),
    Upstream { id: RequestId, value: Value },
}

fn relay_request(
    request: ServiceRequest<Msg>,
    state: &PendingTable<Msg>,
) -> ServiceTransition<PendingTable<Msg>, RelayMsg, Msg> {
    let (next, id) = state.insert(request);
    ServiceTransition::new(next).with_effect(EffectTree::request(
        ALPHA,
        ServiceRequest::new(
            format!("relay {id}"),
            Continuation::new(move |value| RelayMsg::Upstream { id, value }),
        ),
    ))
}

fn relay_update(
    msg: RelayMsg,
    state: &PendingTable<Msg>,
) -> ServiceTransition<PendingTable<Msg>, RelayMsg, Msg> {
    let inner = match msg {
        RelayMsg::Service(msg) => msg,
        RelayMsg::Upstream { id, value } => ServiceMsg::Resolve { id, value },
    };
    let t = service::update(inner, state);
    ServiceTransition {
        new_state: t.new_state,
        effects: t.effects.map(RelayMsg::Service),
        responses: t.responses,
    }
}

#[derive(Debug, Default)]
struct Countdown {
    pending: PendingTable<Msg>,
    /// Self-requests left before the next request is answered directly
    depth: i64,
}

#[derive(Debug)]
enum CountdownMsg {
    Arm(i64),
    Service(ServiceMsg),
}

fn countdown_request(
    request: ServiceRequest<Msg>,
    state: &Countdown,
) -> ServiceTransition<Countdown, CountdownMsg, Msg> {
    if state.depth <= 0 {
        let response = request.continuation.call(json!(0));
        return ServiceTransition::new(Countdown {
            pending: state.pending.clone(),
            depth: 0,
        })
        .with_response(response);
    }
    let (pending, id) = state.pending.insert(request);
    ServiceTransition::new(Countdown {
        pending,
        depth: state.depth - 1,
    })
    .with_effect(EffectTree::request(
        COUNTDOWN,
        ServiceRequest::new(
            format!("countdown {id}"),
            Continuation::new(move |v: Value| {
                CountdownMsg::Service(ServiceMsg::Resolve {
                    id,
                    value: json!(v.as_i64().unwrap_or(0) + 1),
                })
            }),
        ),
    ))
}

fn countdown_update(
    msg: CountdownMsg,
    state: &Countdown,
) -> ServiceTransition<Countdown, CountdownMsg, Msg> {
    match msg {
        CountdownMsg::Arm(depth) => ServiceTransition::new(Countdown {
            pending: state.pending.clone(),
            depth,
        }),
        CountdownMsg::Service(msg) => {
            let t = service::update(msg, &state.pending);
            ServiceTransition {
                new_state: Countdown {
                    pending: t.new_state,
                    depth: state.depth,
                },
                effects: t.effects.map(CountdownMsg::Service),
                responses: t.responses,
            }
        }
    }
}

/// Counts requests served
fn burst_request(
    request: ServiceRequest<Msg>,
    served: &u32,
) -> ServiceTransition<u32, ServiceMsg, Msg> {
    ServiceTransition::new(served + 1)
        .with_effect(EffectTree::external(Task::fire_and_forget(HostEffect::new(
            "log",
            json!(format!("burst {}", request.label)),
        ))))
        .with_responses([
            request.continuation.call(json!(1)),
            request.continuation.call(json!(2)),
        ])
}

fn burst_update(_msg: ServiceMsg, served: &u32) -> ServiceTransition<u32, ServiceMsg, Msg> {
    Transition::new(*served).into()
}

// ============================================================================
// Registry
// ============================================================================

#[derive(Debug, Default)]
struct World {
    caller: CallerState,
    alpha: PendingTable<Msg>,
    beta: PendingTable<Msg>,
    relay: PendingTable<Msg>,
    countdown: Countdown,
    burst: u32,
}

#[derive(Debug)]
enum Msg {
    Caller(CallerMsg),
    Alpha(ServiceMsg),
    Beta(ServiceMsg),
    Relay(RelayMsg),
    Countdown(CountdownMsg),
    Burst(ServiceMsg),
    Noop,
}

fn read_caller(w: &World) -> &CallerState {
    &w.caller
}
fn write_caller(caller: CallerState, w: World) -> World {
    World { caller, ..w }
}
fn read_alpha(w: &World) -> &PendingTable<Msg> {
    &w.alpha
}
fn write_alpha(alpha: PendingTable<Msg>, w: World) -> World {
    World { alpha, ..w }
}
fn read_beta(w: &World) -> &PendingTable<Msg> {
    &w.beta
}
fn write_beta(beta: PendingTable<Msg>, w: World) -> World {
    World { beta, ..w }
}
fn read_relay(w: &World) -> &PendingTable<Msg> {
    &w.relay
}
fn write_relay(relay: PendingTable<Msg>, w: World) -> World {
    World { relay, ..w }
}
fn read_countdown(w: &World) -> &Countdown {
    &w.countdown
}
fn write_countdown(countdown: Countdown, w: World) -> World {
    World { countdown, ..w }
}
fn read_burst(w: &World) -> &u32 {
    &w.burst
}
fn write_burst(burst: u32, w: World) -> World {
    World { burst, ..w }
}

const CALLER_UNIT: Descriptor<World, Msg, CallerState, CallerMsg> = Descriptor {
    name: "caller",
    lift: Msg::Caller,
    read: read_caller,
    write: write_caller,
    update: caller_update,
};

const ALPHA_UNIT: ServiceDescriptor<World, Msg, PendingTable<Msg>, ServiceMsg> = ServiceDescriptor {
    tag: ALPHA,
    lift: Msg::Alpha,
    read: read_alpha,
    write: write_alpha,
    update: service::update,
    request: service::request,
};

const BETA_UNIT: ServiceDescriptor<World, Msg, PendingTable<Msg>, ServiceMsg> = ServiceDescriptor {
    tag: BETA,
    lift: Msg::Beta,
    read: read_beta,
    write: write_beta,
    update: service::update,
    request: service::request,
};

const RELAY_UNIT: ServiceDescriptor<World, Msg, PendingTable<Msg>, RelayMsg> = ServiceDescriptor {
    tag: RELAY,
    lift: Msg::Relay,
    read: read_relay,
    write: write_relay,
    update: relay_update,
    request: relay_request,
};

const COUNTDOWN_UNIT: ServiceDescriptor<World, Msg, Countdown, CountdownMsg> =
    ServiceDescriptor {
        tag: COUNTDOWN,
        lift: Msg::Countdown,
        read: read_countdown,
        write: write_countdown,
        update: countdown_update,
        request: countdown_request,
    };

const BURST_UNIT: ServiceDescriptor<World, Msg, u32, ServiceMsg> = ServiceDescriptor {
    tag: BURST,
    lift: Msg::Burst,
    read: read_burst,
    write: write_burst,
    update: burst_update,
    request: burst_request,
};

struct TestApp;

impl Registry for TestApp {
    type State = World;
    type Msg = Msg;

    fn init() -> (World, EffectTree<Msg>) {
        let world = World {
            countdown: Countdown {
                depth: 1,
                ..Countdown::default()
            },
            ..World::default()
        };
        (world, ask(COUNTDOWN, "boot").map(Msg::Caller))
    }

    fn route(msg: Msg, state: World) -> Dispatched<World, Msg> {
        match msg {
            Msg::Caller(m) => update_component::<Self, _, _>(&CALLER_UNIT, m, state),
            Msg::Alpha(m) => update_service::<Self, _, _>(&ALPHA_UNIT, m, state),
            Msg::Beta(m) => update_service::<Self, _, _>(&BETA_UNIT, m, state),
            Msg::Relay(m) => update_service::<Self, _, _>(&RELAY_UNIT, m, state),
            Msg::Countdown(m) => update_service::<Self, _, _>(&COUNTDOWN_UNIT, m, state),
            Msg::Burst(m) => update_service::<Self, _, _>(&BURST_UNIT, m, state),
            Msg::Noop => Dispatched::unchanged(state),
        }
    }

    fn route_request(
        service: ServiceTag,
        request: ServiceRequest<Msg>,
        state: World,
    ) -> Dispatched<World, Msg> {
        match service {
            ALPHA => request_service::<Self, _, _>(&ALPHA_UNIT, request, state),
            BETA => request_service::<Self, _, _>(&BETA_UNIT, request, state),
            RELAY => request_service::<Self, _, _>(&RELAY_UNIT, request, state),
            COUNTDOWN => request_service::<Self, _, _>(&COUNTDOWN_UNIT, request, state),
            BURST => request_service::<Self, _, _>(&BURST_UNIT, request, state),
            _ => unknown_service::<Self>(service, &request, state),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn run(msgs: Vec<Msg>) -> (World, Vec<Task<Msg>>) {
    msgs.into_iter()
        .fold((World::default(), vec![]), |(state, mut tasks), msg| {
            let step = dispatch::<TestApp>(msg, state);
            tasks.extend(step.tasks);
            (step.state, tasks)
        })
}

fn arm(depth: i64) -> Msg {
    Msg::Countdown(CountdownMsg::Arm(depth))
}

fn caller(msg: CallerMsg) -> Msg {
    Msg::Caller(msg)
}

fn resolve(id: u64, value: i64) -> ServiceMsg {
    ServiceMsg::Resolve {
        id: RequestId(id),
        value: json!(value),
    }
}

fn listing(table: &PendingTable<Msg>) -> Vec<(u64, String)> {
    table.listing().into_iter().map(|l| (l.id.0, l.label)).collect()
}

fn log_lines(tasks: &[Task<Msg>]) -> Vec<String> {
    tasks
        .iter()
        .map(|t| t.effect.payload.as_str().unwrap_or_default().to_string())
        .collect()
}

fn received(world: &World) -> Vec<(&str, i64)> {
    world
        .caller
        .received
        .iter()
        .map(|(l, v)| (l.as_str(), *v))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_request_then_resolve() {
    let (world, tasks) = run(vec![caller(CallerMsg::Ask(ALPHA, "X".into()))]);
    assert!(tasks.is_empty());
    assert_eq!(listing(&world.alpha), vec![(0, "X".to_string())]);

    let step = dispatch::<TestApp>(Msg::Alpha(resolve(0, 42)), world);
    assert_eq!(received(&step.state), vec![("X", 42)]);
    assert!(listing(&step.state.alpha).is_empty());
    assert_eq!(log_lines(&step.tasks), vec!["got X"]);
}

#[test]
fn test_resolve_out_of_order_keeps_other_pending() {
    let (world, _) = run(vec![
        caller(CallerMsg::Ask(ALPHA, "first".into())),
        caller(CallerMsg::Ask(ALPHA, "second".into())),
        Msg::Alpha(resolve(1, 10)),
    ]);
    assert_eq!(received(&world), vec![("second", 10)]);
    assert_eq!(listing(&world.alpha), vec![(0, "first".to_string())]);

    let step = dispatch::<TestApp>(Msg::Alpha(resolve(0, 20)), world);
    assert_eq!(received(&step.state), vec![("second", 10), ("first", 20)]);
    assert!(step.state.alpha.is_empty());
}

#[test]
fn test_duplicate_resolve_is_ignored() {
    let (world, tasks) = run(vec![
        caller(CallerMsg::Ask(ALPHA, "X".into())),
        Msg::Alpha(resolve(0, 1)),
        Msg::Alpha(resolve(0, 2)),
        Msg::Alpha(resolve(7, 3)),
    ]);
    assert_eq!(received(&world), vec![("X", 1)]);
    assert_eq!(log_lines(&tasks), vec!["got X"]);
    assert_eq!(world.alpha.next_id(), RequestId(1));
}

#[test]
fn test_response_cascade_completes_within_one_dispatch() {
    let (world, _) = run(vec![
        arm(2),
        caller(CallerMsg::Plan(vec![(COUNTDOWN, "count".into())])),
        caller(CallerMsg::Ask(ALPHA, "X".into())),
    ]);

    // alpha's answer makes the caller ask countdown, which asks itself twice
    let step = dispatch::<TestApp>(Msg::Alpha(resolve(0, 5)), world);

    assert_eq!(received(&step.state), vec![("X", 5), ("count", 2)]);
    assert!(step.state.countdown.pending.is_empty());
    assert_eq!(step.state.countdown.pending.next_id(), RequestId(2));
    assert!(step.state.alpha.is_empty());
    assert_eq!(log_lines(&step.tasks), vec!["got X", "got count"]);
}

#[test]
fn test_follow_up_to_plain_service_stays_pending() {
    let (world, _) = run(vec![
        caller(CallerMsg::Plan(vec![(BETA, "next".into())])),
        caller(CallerMsg::Ask(ALPHA, "X".into())),
        Msg::Alpha(resolve(0, 1)),
    ]);
    assert_eq!(listing(&world.beta), vec![(0, "next".to_string())]);

    let step = dispatch::<TestApp>(Msg::Beta(resolve(0, 9)), world);
    assert_eq!(received(&step.state), vec![("X", 1), ("next", 9)]);
}

#[test]
fn test_service_calling_service() {
    let (world, tasks) = run(vec![caller(CallerMsg::Ask(RELAY, "r".into()))]);
    assert!(tasks.is_empty());
    assert_eq!(listing(&world.relay), vec![(0, "r".to_string())]);
    assert_eq!(listing(&world.alpha), vec![(0, "relay #0".to_string())]);

    let step = dispatch::<TestApp>(Msg::Alpha(resolve(0, 9)), world);
    assert_eq!(received(&step.state), vec![("r", 9)]);
    assert!(step.state.relay.is_empty());
    assert!(step.state.alpha.is_empty());
}

#[test]
fn test_self_requests_resolve_immediately() {
    let (world, tasks) = run(vec![arm(3), caller(CallerMsg::Ask(COUNTDOWN, "count".into()))]);
    assert_eq!(received(&world), vec![("count", 3)]);
    assert!(world.countdown.pending.is_empty());
    assert_eq!(world.countdown.depth, 0);
    assert_eq!(log_lines(&tasks), vec!["got count"]);
}

#[test]
fn test_unarmed_countdown_answers_directly() {
    let (world, _) = run(vec![caller(CallerMsg::Ask(COUNTDOWN, "count".into()))]);
    assert_eq!(received(&world), vec![("count", 0)]);
    assert_eq!(world.countdown.pending.next_id(), RequestId(0));
}

#[test]
fn test_responses_run_in_order_after_effects() {
    let (world, _) = run(vec![
        arm(1),
        caller(CallerMsg::Plan(vec![(COUNTDOWN, "count".into())])),
    ]);

    // burst logs, then answers twice; the first answer sends the caller to
    // countdown, which must finish before the second answer is delivered
    let step = dispatch::<TestApp>(caller(CallerMsg::Ask(BURST, "b".into())), world);

    assert_eq!(received(&step.state), vec![("b", 1), ("count", 1), ("b", 2)]);
    assert_eq!(
        log_lines(&step.tasks),
        vec!["burst b", "got b", "got count", "got b"]
    );
    assert_eq!(step.state.burst, 1);
    assert!(step.state.countdown.pending.is_empty());
}

#[test]
fn test_burst_ignores_its_own_messages() {
    let (world, _) = run(vec![caller(CallerMsg::Ask(BURST, "b".into()))]);
    let step = dispatch::<TestApp>(Msg::Burst(resolve(0, 9)), world);
    assert_eq!(step.state.burst, 1);
    assert!(step.tasks.is_empty());
    assert_eq!(received(&step.state), vec![("b", 1), ("b", 2)]);
}

#[test]
fn test_batch_tasks_follow_depth_first_order() {
    let (world, tasks) = run(vec![arm(1), caller(CallerMsg::Fanout)]);
    assert_eq!(received(&world), vec![("count", 1)]);
    assert_eq!(log_lines(&tasks), vec!["before", "got count", "after"]);
}

#[test]
fn test_unknown_service_is_noop() {
    let (world, tasks) = run(vec![caller(CallerMsg::Ask(ServiceTag("missing"), "X".into()))]);
    assert!(tasks.is_empty());
    assert!(world.caller.received.is_empty());
    assert!(world.alpha.is_empty());
}

#[test]
fn test_noop_message() {
    let (world, tasks) = run(vec![Msg::Noop]);
    assert!(tasks.is_empty());
    assert!(world.caller.received.is_empty());
}

#[test]
fn test_engine_resolves_boot_effects() {
    let (mut engine, boot) = Engine::<TestApp>::start();
    assert_eq!(log_lines(&boot), vec!["got boot"]);
    assert_eq!(received(engine.state()), vec![("boot", 1)]);

    let tasks = engine.dispatch(caller(CallerMsg::Ask(ALPHA, "Y".into())));
    assert!(tasks.is_empty());
    let tasks = engine.dispatch(Msg::Alpha(resolve(0, 4)));
    assert_eq!(log_lines(&tasks), vec!["got Y"]);
    assert_eq!(engine.dispatched(), 2);

    let world = engine.into_state();
    assert_eq!(received(&world), vec![("boot", 1), ("Y", 4)]);
}
