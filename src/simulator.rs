//! Dev-only producer that emits synthetic change events so streams can be
//! watched without a real twin backend attached. Enabled by setting
//! `SIMULATED_THINGS` to a nonzero count.

use std::time::Duration;

use domain::{Thing, ThingEvent, ThingId};
use events::SubscriptionManager;
use log::*;
use serde_json::{json, Map, Value};

const TICK: Duration = Duration::from_secs(2);

/// Emits one synthetic event per tick, cycling through `thing_count` ids.
/// Every fifth event is a full modification carrying features as well.
pub fn spawn(subscriptions: SubscriptionManager, thing_count: u32) {
    info!("Simulating change events for {thing_count} things");
    tokio::spawn(run(subscriptions, thing_count));
}

async fn run(subscriptions: SubscriptionManager, thing_count: u32) {
    let ring = u64::from(thing_count.max(1));
    let mut ticker = tokio::time::interval(TICK);
    let mut counter: u64 = 0;

    loop {
        ticker.tick().await;
        counter += 1;

        let id = format!("demo:thing-{}", counter % ring);
        let event = if counter % 5 == 0 {
            ThingEvent::Modified {
                thing: Thing::new(id)
                    .with_attributes(attributes(counter))
                    .with_features(features(counter)),
            }
        } else {
            ThingEvent::AttributesModified {
                thing_id: ThingId::from(id),
                attributes: attributes(counter),
            }
        };

        let delivered = subscriptions.publish(event).await;
        debug!("Simulated event {counter} delivered to {delivered} sessions");
    }
}

fn attributes(counter: u64) -> Map<String, Value> {
    section(json!({
        "counter": counter,
        "temperature": 18.0 + (counter % 10) as f64,
    }))
}

fn features(counter: u64) -> Map<String, Value> {
    section(json!({ "lamp": { "on": counter % 2 == 0 } }))
}

fn section(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}
