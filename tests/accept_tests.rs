// Accept primitive tests - deadline, abort and connection scenarios

use sockaccept::{accept, AbortFlag, AcceptConfig, AcceptOutcome, AcceptStatus, PeerAddress, Telemetry};
use std::io::{Read, Write};
use std::net::TcpStream;
use std::os::unix::io::AsRawFd;
use std::os::unix::net::{UnixListener, UnixStream};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

mod common;
use common::{bind_local, connect, wait_until};

#[test]
fn test_missing_bounds_fail_without_blocking() {
    let listener = bind_local();
    let abort = AbortFlag::new();
    let config = AcceptConfig::new(&listener, &abort);

    let start = Instant::now();
    assert!(matches!(accept(&config), AcceptOutcome::Error { .. }));
    assert!(start.elapsed() < Duration::from_millis(100));
}

#[test]
fn test_zero_poll_interval_fails_without_blocking() {
    let listener = bind_local();
    let abort = AbortFlag::new();
    let telemetry = Telemetry::new();
    let config = AcceptConfig::new(&listener, &abort)
        .poll_interval(Duration::ZERO)
        .telemetry(&telemetry);

    let start = Instant::now();
    match accept(&config) {
        AcceptOutcome::Error { message } => assert!(message.contains("greater than zero")),
        other => panic!("expected error, got {:?}", other.status()),
    }
    assert!(start.elapsed() < Duration::from_millis(100));
    assert!(telemetry.snapshot().start_time.is_none());
    assert!(telemetry.snapshot().last_result.is_none());
}

#[test]
fn test_deadline_without_connection_times_out() {
    let listener = bind_local();
    let abort = AbortFlag::new();
    let telemetry = Telemetry::new();
    let config = AcceptConfig::new(&listener, &abort)
        .deadline(Duration::from_millis(200))
        .telemetry(&telemetry);

    assert!(matches!(accept(&config), AcceptOutcome::Timeout));

    let record = telemetry.snapshot();
    assert!(record.loop_counter >= 1);
    assert_eq!(record.last_result, Some(AcceptStatus::Timeout));
    assert!(record.timeout_deadline.is_some());
    assert!(record.client_address.is_none());
    // Wall clock and monotonic clock may disagree by a hair
    assert!(record.elapsed().unwrap() >= Duration::from_millis(190));
}

#[test]
fn test_poll_with_deadline_wakes_repeatedly() {
    let listener = bind_local();
    let abort = AbortFlag::new();
    let telemetry = Telemetry::new();
    let config = AcceptConfig::new(&listener, &abort)
        .poll_interval(Duration::from_millis(20))
        .deadline(Duration::from_millis(150))
        .telemetry(&telemetry);

    let start = Instant::now();
    assert!(matches!(accept(&config), AcceptOutcome::Timeout));
    assert!(start.elapsed() >= Duration::from_millis(150));
    assert!(telemetry.loop_counter() >= 3);
}

#[test]
fn test_abort_from_another_thread() {
    let listener = bind_local();
    let abort = AbortFlag::new();
    let telemetry = Telemetry::new();
    let config = AcceptConfig::new(&listener, &abort)
        .poll_interval(Duration::from_millis(50))
        .telemetry(&telemetry);

    let remote = abort.clone();
    let aborter = thread::spawn(move || {
        thread::sleep(Duration::from_millis(120));
        remote.abort();
        Instant::now()
    });

    let outcome = accept(&config);
    let returned_at = Instant::now();
    let aborted_at = aborter.join().unwrap();

    assert!(matches!(outcome, AcceptOutcome::Aborted));
    assert!(returned_at.duration_since(aborted_at) < Duration::from_millis(150));
    assert!(telemetry.loop_counter() >= 2);
    assert_eq!(telemetry.snapshot().last_result, Some(AcceptStatus::Aborted));
}

#[test]
fn test_abort_before_call_leaves_loop_counter_alone() {
    let listener = bind_local();
    let abort = AbortFlag::new();
    let telemetry = Telemetry::new();

    let config = AcceptConfig::new(&listener, &abort)
        .poll_interval(Duration::from_millis(10))
        .deadline(Duration::from_millis(50))
        .telemetry(&telemetry);
    assert!(matches!(accept(&config), AcceptOutcome::Timeout));
    let before = telemetry.snapshot();
    assert!(before.loop_counter >= 1);

    abort.abort();
    let start = Instant::now();
    assert!(matches!(accept(&config), AcceptOutcome::Aborted));
    assert!(start.elapsed() < Duration::from_millis(10));

    let after = telemetry.snapshot();
    assert_eq!(after.loop_counter, before.loop_counter);
    assert_eq!(after.start_time, before.start_time);
    assert_eq!(after.last_result, Some(AcceptStatus::Aborted));
}

#[test]
fn test_immediate_peer_is_accepted() {
    let listener = bind_local();
    let client = connect(&listener);
    let abort = AbortFlag::new();
    let telemetry = Telemetry::new();
    let config = AcceptConfig::new(&listener, &abort)
        .deadline(Duration::from_secs(5))
        .telemetry(&telemetry);

    let conn = match accept(&config) {
        AcceptOutcome::Accepted(conn) => conn,
        other => panic!("expected a connection, got {:?}", other.status()),
    };

    assert_ne!(conn.as_raw_fd(), listener.as_raw_fd());
    assert_eq!(conn.peer(), PeerAddress::Inet(client.local_addr().unwrap()));

    let record = telemetry.snapshot();
    assert_eq!(record.accepted_connections, 1);
    assert_eq!(record.client_address.as_deref(), Some("127.0.0.1"));
    assert_eq!(record.client_port, Some(client.local_addr().unwrap().port()));
    assert_eq!(record.loop_counter, 0);
    assert_eq!(
        record.last_result,
        Some(AcceptStatus::Accepted { peer: conn.peer() })
    );
}

#[test]
fn test_accepted_connection_is_usable() {
    let listener = bind_local();
    let mut client = connect(&listener);
    let abort = AbortFlag::new();
    let config = AcceptConfig::new(&listener, &abort).poll_interval(Duration::from_millis(50));

    let conn = accept(&config).into_connection().expect("connection");
    conn.send_all(b"ping\n").unwrap();
    drop(conn);

    let mut received = String::new();
    client.read_to_string(&mut received).unwrap();
    assert_eq!(received, "ping\n");
}

#[test]
fn test_connection_converts_into_tcp_stream() {
    let listener = bind_local();
    let client = connect(&listener);
    let abort = AbortFlag::new();
    let config = AcceptConfig::new(&listener, &abort).deadline(Duration::from_secs(5));

    let stream = accept(&config).into_connection().unwrap().into_tcp_stream();
    assert_eq!(stream.peer_addr().unwrap(), client.local_addr().unwrap());
}

#[test]
fn test_unix_peer_resolves_to_placeholder() {
    let dir = std::env::temp_dir().join(format!("sockaccept_unix_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("accept.sock");
    let _ = std::fs::remove_file(&path);

    let listener = UnixListener::bind(&path).unwrap();
    let _client = UnixStream::connect(&path).unwrap();
    let abort = AbortFlag::new();
    let telemetry = Telemetry::new();
    let config = AcceptConfig::new(&listener, &abort)
        .deadline(Duration::from_secs(5))
        .telemetry(&telemetry);

    let conn = accept(&config).into_connection().expect("connection");
    assert_eq!(conn.peer(), PeerAddress::Unknown);

    let record = telemetry.snapshot();
    assert_eq!(record.client_address.as_deref(), Some("unknown"));
    assert_eq!(record.client_port, None);
    assert_eq!(record.accepted_connections, 1);

    drop(conn);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_accepted_count_is_cumulative_across_calls() {
    let listener = bind_local();
    let _first = connect(&listener);
    let _second = connect(&listener);
    let abort = AbortFlag::new();
    let telemetry = Telemetry::new();
    let config = AcceptConfig::new(&listener, &abort)
        .deadline(Duration::from_secs(5))
        .telemetry(&telemetry);

    assert!(accept(&config).is_accepted());
    assert!(accept(&config).is_accepted());
    assert_eq!(telemetry.accepted_connections(), 2);
}

#[test]
fn test_telemetry_is_observable_while_waiting() {
    let listener = bind_local();
    let abort = AbortFlag::new();
    let telemetry = Arc::new(Telemetry::new());

    let observer = {
        let abort = abort.clone();
        let telemetry = Arc::clone(&telemetry);
        thread::spawn(move || {
            let alive = wait_until(Duration::from_secs(5), || telemetry.loop_counter() >= 2);
            let finished_early = telemetry.is_finished();
            abort.abort();
            (alive, finished_early)
        })
    };

    let config = AcceptConfig::new(&listener, &abort)
        .poll_interval(Duration::from_millis(20))
        .telemetry(&telemetry);
    let outcome = accept(&config);

    let (alive, finished_early) = observer.join().unwrap();
    assert!(alive);
    assert!(!finished_early);
    assert!(matches!(outcome, AcceptOutcome::Aborted));
    assert!(telemetry.is_finished());
}

#[test]
fn test_listener_is_left_open() {
    let listener = bind_local();
    let abort = AbortFlag::new();
    let config = AcceptConfig::new(&listener, &abort).deadline(Duration::from_millis(20));
    assert!(matches!(accept(&config), AcceptOutcome::Timeout));

    let _client = connect(&listener);
    let (_, peer) = listener.accept().unwrap();
    assert!(peer.ip().is_loopback());
}

#[test]
fn test_ready_socket_that_cannot_accept_is_an_error() {
    // A readable socket that is not listening: poll says ready, accept fails
    let (not_listening, mut peer) = UnixStream::pair().unwrap();
    peer.write_all(b"x").unwrap();
    let abort = AbortFlag::new();
    let telemetry = Telemetry::new();
    let config = AcceptConfig::new(&not_listening, &abort)
        .poll_interval(Duration::from_secs(10))
        .telemetry(&telemetry);

    let start = Instant::now();
    match accept(&config) {
        AcceptOutcome::Error { message } => assert!(!message.is_empty()),
        other => panic!("expected error, got {:?}", other.status()),
    }
    assert!(start.elapsed() < Duration::from_secs(5));

    let record = telemetry.snapshot();
    assert_eq!(record.loop_counter, 0);
    assert_eq!(record.accepted_connections, 0);
    assert!(matches!(record.last_result, Some(AcceptStatus::Error { .. })));
}

#[test]
fn test_abort_wins_over_ready_connection() {
    let listener = bind_local();
    let addr = listener.local_addr().unwrap();
    let abort = AbortFlag::new();
    let config = AcceptConfig::new(&listener, &abort).poll_interval(Duration::from_secs(10));

    let remote = abort.clone();
    let connector = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        remote.abort();
        TcpStream::connect(addr).unwrap()
    });

    let start = Instant::now();
    let outcome = accept(&config);
    let elapsed = start.elapsed();
    let _client = connector.join().unwrap();

    assert!(matches!(outcome, AcceptOutcome::Aborted));
    assert!(elapsed < Duration::from_secs(5));

    // The connection was left in the backlog
    listener.set_nonblocking(true).unwrap();
    assert!(listener.accept().is_ok());
}

#[test]
fn test_abort_on_entry_keeps_previous_call_fields() {
    let listener = bind_local();
    let _client = connect(&listener);
    let abort = AbortFlag::new();
    let telemetry = Telemetry::new();
    let config = AcceptConfig::new(&listener, &abort)
        .deadline(Duration::from_secs(5))
        .telemetry(&telemetry);

    assert!(accept(&config).is_accepted());
    let before = telemetry.snapshot();

    abort.abort();
    assert!(matches!(accept(&config), AcceptOutcome::Aborted));

    let after = telemetry.snapshot();
    assert_eq!(after.start_time, before.start_time);
    assert_eq!(after.client_address, before.client_address);
    assert_eq!(after.client_port, before.client_port);
    assert_eq!(after.last_result, Some(AcceptStatus::Aborted));
    assert!(after.elapsed().unwrap() >= before.elapsed().unwrap());
}
