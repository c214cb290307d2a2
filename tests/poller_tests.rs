//! Background refresh of the roster and the active board.

mod common;

use std::time::Duration;

use axum::http::{Method, StatusCode};
use common::FakeService;
use pingpong_hub::bus::HubEvent;
use pingpong_hub::cache::{Poller, QueryKey};
use pingpong_wire::{Id, Table};
use tokio::sync::broadcast::Receiver;
use tokio::time::timeout;

async fn wait_for(bus: &mut Receiver<HubEvent>, wanted: impl Fn(&HubEvent) -> bool) -> HubEvent {
    timeout(Duration::from_secs(5), async {
        loop {
            match bus.recv().await {
                Ok(event) if wanted(&event) => return event,
                Ok(_) => continue,
                Err(e) => panic!("bus closed: {:?}", e),
            }
        }
    })
    .await
    .expect("timed out waiting for bus event")
}

#[tokio::test]
async fn polled_keys_follow_the_active_event() {
    let service = FakeService::start().await;
    let event = service.add_event("Club Night", 2);
    let state = service.signed_in().await;
    let poller = Poller::new(state.clone());

    assert_eq!(poller.polled_keys().await, vec![QueryKey::Players]);

    state
        .active_event
        .set_active(Some(serde_json::from_value(event).unwrap()))
        .await;
    let event_id = state.active_event.id().await.unwrap();
    assert_eq!(
        poller.polled_keys().await,
        vec![QueryKey::Players, QueryKey::Tables(event_id)]
    );
}

#[tokio::test]
async fn poll_once_refreshes_roster_and_board() {
    let service = FakeService::start().await;
    let event = service.add_event("Club Night", 2);
    service.add_table(&event, 1);
    service.add_player("Ada");
    let state = service.signed_in_with_event(&event).await;
    let event_id: Id = state.active_event.id().await.unwrap();

    let refreshed = Poller::new(state.clone()).poll_once().await;
    assert_eq!(refreshed, 2);

    let board: Vec<Table> = state.cache.peek(&QueryKey::Tables(event_id)).await.unwrap();
    assert_eq!(board.len(), 1);
    assert!(state.cache.peek::<Vec<pingpong_wire::Player>>(&QueryKey::Players).await.is_some());
}

#[tokio::test]
async fn poll_is_skipped_while_signed_out() {
    let service = FakeService::start().await;
    let state = service.state();

    assert_eq!(Poller::new(state).poll_once().await, 0);
    assert!(service.requests().is_empty());
}

#[tokio::test]
async fn failed_poll_is_published() {
    let service = FakeService::start().await;
    let event = service.add_event("Club Night", 2);
    let state = service.signed_in_with_event(&event).await;
    let event_id = state.active_event.id().await.unwrap();
    service.stub(
        Method::GET,
        &format!("/events/{}/tables/board", event_id),
        StatusCode::SERVICE_UNAVAILABLE,
        "maintenance",
    );
    let mut bus = state.bus.subscribe();

    assert_eq!(Poller::new(state.clone()).poll_once().await, 1);

    let failed = wait_for(&mut bus, |e| matches!(e, HubEvent::PollFailed { .. })).await;
    assert_eq!(
        failed,
        HubEvent::PollFailed {
            key: QueryKey::Tables(event_id),
            error: "maintenance".to_string(),
        }
    );
}

#[tokio::test]
async fn invalidation_triggers_immediate_refetch() {
    let service = FakeService::start().await;
    let event = service.add_event("Club Night", 2);
    let state = service.signed_in_with_event(&event).await;
    let event_id = state.active_event.id().await.unwrap();
    let key = QueryKey::Tables(event_id);

    let poller = Poller::new(state.clone());
    let shutdown = poller.shutdown_token();
    let mut bus = state.bus.subscribe();
    let handle = poller.spawn();

    // Initial tick
    wait_for(&mut bus, |e| *e == HubEvent::QueryRefreshed { key: key.clone() }).await;

    service.add_table(&event, 1);
    state.cache.invalidate(&key).await;
    wait_for(&mut bus, |e| *e == HubEvent::QueryRefreshed { key: key.clone() }).await;

    let board: Vec<Table> = state.cache.peek(&key).await.unwrap();
    assert_eq!(board.len(), 1);
    assert!(!state.cache.is_invalidated(&key).await);

    shutdown.cancel();
    timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();
}

#[tokio::test]
async fn shutdown_event_stops_the_poller() {
    let service = FakeService::start().await;
    let state = service.signed_in().await;
    let handle = Poller::new(state.clone()).spawn();

    // Let the task subscribe before announcing shutdown
    tokio::time::sleep(Duration::from_millis(50)).await;
    state.bus.publish(HubEvent::ShuttingDown);
    timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();
}
