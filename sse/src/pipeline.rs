//! Per-session filtering and projection of change events into frames.

use crate::frame::SseFrame;
use domain::{FieldSelector, Thing, ThingEvent, ThingId};
use serde_json::Value;
use std::collections::HashSet;

/// The filter and projection chain applied to every event of one session.
///
/// Stages run in a fixed order and short-circuit at the first one that drops
/// the event: the id allowlist, projection into a thing view (deletions have
/// none), field selection, a relevance check against the selected fields, and
/// finally an emptiness check. What survives is encoded as a data frame.
#[derive(Debug, Clone)]
pub struct EventPipeline {
    id_allowlist: Option<HashSet<ThingId>>,
    field_selector: Option<FieldSelector>,
}

impl EventPipeline {
    pub fn new(
        id_allowlist: Option<HashSet<ThingId>>,
        field_selector: Option<FieldSelector>,
    ) -> Self {
        Self {
            id_allowlist,
            field_selector,
        }
    }

    /// Run one event through the chain. `None` means the event produces no
    /// frame for this session.
    pub fn apply(&self, event: ThingEvent) -> Option<SseFrame> {
        if !self.accepts_id(event.thing_id()) {
            return None;
        }
        let thing = event.into_thing()?;
        let view = self.view_of(&thing);
        if !self.is_relevant(&view) {
            return None;
        }
        if view_is_empty(&view) {
            return None;
        }
        Some(SseFrame::data(view.to_string()))
    }

    fn accepts_id(&self, thing_id: &ThingId) -> bool {
        match &self.id_allowlist {
            Some(allowlist) => allowlist.contains(thing_id),
            None => true,
        }
    }

    fn view_of(&self, thing: &Thing) -> Value {
        let full = thing.to_json();
        match &self.field_selector {
            Some(selector) => selector.project(&full),
            None => full,
        }
    }

    /// With a selector in place, a view that matches none of the selected
    /// fields (the id field aside) tells the client nothing it asked for.
    fn is_relevant(&self, view: &Value) -> bool {
        match &self.field_selector {
            Some(selector) => selector.any_non_id_path_in(view),
            None => true,
        }
    }
}

fn view_is_empty(view: &Value) -> bool {
    match view {
        Value::Object(map) => map.is_empty(),
        Value::Null => true,
        _ => false,
    }
}
