// Shared helpers for the integration tests

use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

/// Listener on an ephemeral localhost port
pub fn bind_local() -> TcpListener {
    TcpListener::bind("127.0.0.1:0").expect("Failed to bind test listener")
}

/// Connect a client to `listener` and return it
#[allow(dead_code)] // Not every test binary connects clients
pub fn connect(listener: &TcpListener) -> TcpStream {
    TcpStream::connect(listener.local_addr().unwrap()).expect("Failed to connect to listener")
}

/// Poll `condition` until it holds or `timeout` elapses
#[allow(dead_code)]
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}
