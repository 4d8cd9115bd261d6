use serde::Serialize;
use std::{cell::RefCell, collections::BTreeMap};

thread_local! {
    static STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

///
/// EventState
/// Ephemeral, in-memory counters for SQL generation activity.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub classes: BTreeMap<String, ClassCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct EventOps {
    pub select_list_builds: u64,
    pub select_list_cache_hits: u64,
    pub condition_builds: u64,
    pub insert_list_builds: u64,
    pub filter_renders: u64,
}

///
/// ClassCounters
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct ClassCounters {
    pub select_list_builds: u64,
    pub select_list_cache_hits: u64,
    pub condition_builds: u64,
    pub insert_list_builds: u64,
    pub filter_renders: u64,
}

fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    STATE.with(|state| f(&mut state.borrow_mut()))
}

pub(crate) fn record_select_build(class: &str) {
    with_state_mut(|m| {
        m.ops.select_list_builds = m.ops.select_list_builds.saturating_add(1);
        let entry = m.classes.entry(class.to_string()).or_default();
        entry.select_list_builds = entry.select_list_builds.saturating_add(1);
    });
}

pub(crate) fn record_select_cache_hit(class: &str) {
    with_state_mut(|m| {
        m.ops.select_list_cache_hits = m.ops.select_list_cache_hits.saturating_add(1);
        let entry = m.classes.entry(class.to_string()).or_default();
        entry.select_list_cache_hits = entry.select_list_cache_hits.saturating_add(1);
    });
}

pub(crate) fn record_condition_build(class: &str) {
    with_state_mut(|m| {
        m.ops.condition_builds = m.ops.condition_builds.saturating_add(1);
        let entry = m.classes.entry(class.to_string()).or_default();
        entry.condition_builds = entry.condition_builds.saturating_add(1);
    });
}

pub(crate) fn record_insert_build(class: &str) {
    with_state_mut(|m| {
        m.ops.insert_list_builds = m.ops.insert_list_builds.saturating_add(1);
        let entry = m.classes.entry(class.to_string()).or_default();
        entry.insert_list_builds = entry.insert_list_builds.saturating_add(1);
    });
}

pub(crate) fn record_filter_render(class: &str) {
    with_state_mut(|m| {
        m.ops.filter_renders = m.ops.filter_renders.saturating_add(1);
        let entry = m.classes.entry(class.to_string()).or_default();
        entry.filter_renders = entry.filter_renders.saturating_add(1);
    });
}

/// Point-in-time snapshot of the current thread's counters.
#[must_use]
pub fn metrics_report() -> EventState {
    STATE.with(|state| state.borrow().clone())
}

/// Reset the current thread's counters to zero.
pub fn metrics_reset_all() {
    with_state_mut(|m| *m = EventState::default());
}
