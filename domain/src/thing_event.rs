use crate::thing::{Thing, ThingId};
use serde_json::{Map, Value};

/// Change events emitted by the twin backend for a single thing.
///
/// Every variant names the thing it concerns. Variants carrying state can be
/// turned into the thing's current view with [`ThingEvent::into_thing`];
/// `Deleted` cannot, since nothing renderable remains after a deletion.
#[derive(Debug, Clone, PartialEq)]
pub enum ThingEvent {
    /// A thing came into existence, with its full initial state.
    Created { thing: Thing },
    /// A thing was replaced wholesale, with its full new state.
    Modified { thing: Thing },
    /// Only the attributes section changed.
    AttributesModified {
        thing_id: ThingId,
        attributes: Map<String, Value>,
    },
    /// Only the features section changed.
    FeaturesModified {
        thing_id: ThingId,
        features: Map<String, Value>,
    },
    /// The thing was deleted.
    Deleted { thing_id: ThingId },
}

impl ThingEvent {
    pub fn thing_id(&self) -> &ThingId {
        match self {
            ThingEvent::Created { thing } | ThingEvent::Modified { thing } => thing.thing_id(),
            ThingEvent::AttributesModified { thing_id, .. }
            | ThingEvent::FeaturesModified { thing_id, .. }
            | ThingEvent::Deleted { thing_id } => thing_id,
        }
    }

    /// Derive the thing view carried by this event, when one exists. Partial
    /// modifications yield a partial view holding only the changed section.
    pub fn into_thing(self) -> Option<Thing> {
        match self {
            ThingEvent::Created { thing } | ThingEvent::Modified { thing } => Some(thing),
            ThingEvent::AttributesModified {
                thing_id,
                attributes,
            } => Some(Thing::new(thing_id).with_attributes(attributes)),
            ThingEvent::FeaturesModified { thing_id, features } => {
                Some(Thing::new(thing_id).with_features(features))
            }
            ThingEvent::Deleted { .. } => None,
        }
    }
}
