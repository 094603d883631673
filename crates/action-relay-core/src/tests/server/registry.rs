use crate::{ClientConnection, ClientId, ConnectionRegistry};

use std::{net::SocketAddr, sync::Arc};

use tokio::sync::mpsc;

fn connection_with_capacity(
    port: u16,
    capacity: usize,
) -> (ClientConnection, mpsc::Receiver<Arc<str>>) {
    let (tx, rx) = mpsc::channel(capacity);
    let addr = SocketAddr::from(([192, 168, 1, 20], port));
    (ClientConnection::new(ClientId::new(), addr, tx), rx)
}

fn connection(port: u16) -> (ClientConnection, mpsc::Receiver<Arc<str>>) {
    connection_with_capacity(port, 8)
}

/// WHAT: Broadcast reaches every client and preserves registration order
/// WHY: Every remote must see the same manifest
#[test]
#[allow(clippy::unwrap_used)]
fn given_two_clients_when_broadcasting_then_both_receive_line() {
    // Given: Two registered clients
    let mut registry = ConnectionRegistry::new();
    let (first, mut first_rx) = connection(5001);
    let (second, mut second_rx) = connection(5002);
    registry.register(first);
    registry.register(second);

    // When: Broadcasting one line
    let line: Arc<str> = Arc::from(r#"{"type":"actions","actions":[]}"#);
    let failed = registry.broadcast(&line);

    // Then: Both queued the same line
    assert!(failed.is_empty());
    assert_eq!(first_rx.try_recv().unwrap(), line);
    assert_eq!(second_rx.try_recv().unwrap(), line);
    assert_eq!(
        registry.addresses(),
        vec![
            SocketAddr::from(([192, 168, 1, 20], 5001)),
            SocketAddr::from(([192, 168, 1, 20], 5002)),
        ]
    );
}

/// WHAT: Deregistering removes exactly that client, once
/// WHY: Disconnect notifications arrive from both socket tasks
#[test]
fn given_registered_client_when_deregistering_twice_then_second_is_none() {
    // Given: Two clients
    let mut registry = ConnectionRegistry::new();
    let (first, _first_rx) = connection(5001);
    let (second, _second_rx) = connection(5002);
    let first_id = first.id();
    let second_id = second.id();
    registry.register(first);
    registry.register(second);

    // When: Removing the first twice
    let removed = registry.deregister(first_id);
    let again = registry.deregister(first_id);

    // Then: Only the second remains
    assert!(removed.is_some_and(|c| c.id() == first_id));
    assert!(again.is_none());
    assert_eq!(registry.len(), 1);
    assert!(registry.get(second_id).is_some());
}

/// WHAT: Targeted sends reach one client and report closed writers
/// WHY: Results go only to the client that pressed
#[test]
#[allow(clippy::unwrap_used)]
fn given_clients_when_sending_to_one_then_only_that_client_receives() {
    // Given: One live client, one whose writer is gone
    let mut registry = ConnectionRegistry::new();
    let (live, mut live_rx) = connection(5001);
    let (closed, closed_rx) = connection(5002);
    let live_id = live.id();
    let closed_id = closed.id();
    registry.register(live);
    registry.register(closed);
    drop(closed_rx);

    // When: Sending to each and to an unknown id
    let line: Arc<str> = Arc::from("{}");
    let to_live = registry.send_to(live_id, &line);
    let to_closed = registry.send_to(closed_id, &line);
    let to_unknown = registry.send_to(ClientId::new(), &line);

    // Then: Only the live client accepted it
    assert!(to_live);
    assert!(!to_closed);
    assert!(!to_unknown);
    assert_eq!(live_rx.try_recv().unwrap(), line);
    assert_eq!(registry.broadcast(&line), vec![closed_id]);
}

/// WHAT: Dropping a connection aborts its socket tasks
/// WHY: Removing a client from the registry must close its socket
#[tokio::test]
async fn given_connection_with_task_when_drained_and_dropped_then_task_cancelled() {
    // Given: A client owning a task that never finishes
    let mut registry = ConnectionRegistry::new();
    let task = tokio::spawn(std::future::pending::<()>());
    let (connection, _rx) = connection(5001);
    registry.register(connection.with_tasks([task.abort_handle()]));

    // When: Draining and dropping
    let drained = registry.drain();
    assert_eq!(drained.len(), 1);
    assert!(registry.is_empty());
    drop(drained);

    // Then: The task was cancelled
    let joined = task.await;
    assert!(joined.is_err_and(|e| e.is_cancelled()));
}

/// WHAT: A client whose queue is full is reported by broadcast
/// WHY: A remote that stops reading must not make the relay buffer forever
#[test]
#[allow(clippy::unwrap_used)]
fn given_full_outbound_queue_when_broadcasting_then_client_reported() {
    // Given: A client that can hold one line and already holds it
    let mut registry = ConnectionRegistry::new();
    let (stalled, mut stalled_rx) = connection_with_capacity(5001, 1);
    let (reading, mut reading_rx) = connection(5002);
    let stalled_id = stalled.id();
    registry.register(stalled);
    registry.register(reading);
    let first: Arc<str> = Arc::from("first");
    assert!(registry.broadcast(&first).is_empty());

    // When: Broadcasting again
    let second: Arc<str> = Arc::from("second");
    let failed = registry.broadcast(&second);

    // Then: Only the stalled client failed, and its queue kept its bound
    assert_eq!(failed, vec![stalled_id]);
    assert!(!registry.send_to(stalled_id, &second));
    assert_eq!(stalled_rx.try_recv().unwrap(), first);
    assert!(stalled_rx.try_recv().is_err());
    assert_eq!(reading_rx.try_recv().unwrap(), first);
    assert_eq!(reading_rx.try_recv().unwrap(), second);
}
