//! State-machine and wire behavior of the dynamic `Socket` handle.
//!
//! Network tests bind port 0 on loopback and run the peer on a thread, so
//! nothing here depends on the environment.

use std::io::ErrorKind;
use std::thread;

use sockline::{Kind, Socket, DEFAULT_BACKLOG};

fn assert_unsupported(result: std::io::Result<impl Sized>) {
    let err = result.err().expect("operation should have been rejected");
    assert_eq!(err.kind(), ErrorKind::Unsupported, "got: {err}");
}

/// Binds a listening stream socket on an ephemeral loopback port and
/// returns it with the kernel-assigned port.
fn listening_socket() -> (Socket, u16) {
    let mut server = Socket::new(Kind::Stream);
    server.bind("127.0.0.1", 0).unwrap();
    server.set_reuse_addr().unwrap();
    server.listen(DEFAULT_BACKLOG).unwrap();
    let port = server.local_addr().unwrap().port();
    (server, port)
}

#[test]
fn listen_before_bind_is_unsupported() {
    let mut socket = Socket::new(Kind::Stream);
    assert_unsupported(socket.listen(DEFAULT_BACKLOG));
    assert!(!socket.is_listening());
}

#[test]
fn stream_ops_require_their_state() {
    let socket = Socket::new(Kind::Stream);
    assert_unsupported(socket.accept());
    assert_unsupported(socket.send(b"hi"));
    assert_unsupported(socket.recv(16));
    assert_unsupported(socket.set_reuse_addr());
}

#[test]
fn datagram_rejects_stream_only_ops() {
    let mut socket = Socket::new(Kind::Datagram);
    assert_unsupported(socket.connect("127.0.0.1", 9));
    assert_unsupported(socket.listen(DEFAULT_BACKLOG));
    assert_unsupported(socket.accept());
    assert_unsupported(socket.send(b"hi"));
    assert_unsupported(socket.recv(16));
    assert_unsupported(socket.set_reuse_addr());
}

#[test]
fn datagram_bind_succeeds() {
    let mut socket = Socket::new(Kind::Datagram);
    socket.bind("127.0.0.1", 0).unwrap();
    assert_eq!(socket.kind(), Kind::Datagram);
    assert_ne!(socket.local_addr().unwrap().port(), 0);
    assert_eq!(socket.state_name(), "bound");
}

#[test]
fn bind_rejects_host_names() {
    let mut socket = Socket::new(Kind::Stream);
    let err = socket.bind("localhost", 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn ping_pong_round_trip() {
    let (server, port) = listening_socket();

    let client = thread::spawn(move || {
        let mut client = Socket::new(Kind::Stream);
        client.connect("127.0.0.1", port).unwrap();
        assert!(client.is_connected());
        client.send(b"ping").unwrap();
        let reply = client.recv(1024).unwrap();
        assert_eq!(reply, b"pong");
    });

    let conn = server.accept().unwrap();
    assert_eq!(conn.kind(), Kind::Stream);
    assert!(conn.is_connected());
    assert!(server.is_listening(), "listener must survive accept");

    let request = conn.recv(1024).unwrap();
    assert_eq!(request, b"ping");
    conn.send(b"pong").unwrap();

    client.join().unwrap();
}

#[test]
fn listener_accepts_sequentially() {
    let (server, port) = listening_socket();

    for round in 0u8..2 {
        let client = thread::spawn(move || {
            let mut client = Socket::new(Kind::Stream);
            client.connect("127.0.0.1", port).unwrap();
            client.send(&[round]).unwrap();
        });

        let conn = server.accept().unwrap();
        let got = conn.recv(1024).unwrap();
        assert_eq!(got, [round]);
        client.join().unwrap();
    }
}

#[test]
fn recv_clamps_to_internal_buffer() {
    let (server, port) = listening_socket();
    let payload: Vec<u8> = (0..1500u16).map(|i| (i % 251) as u8).collect();
    let expected = payload.clone();

    let sender = thread::spawn(move || {
        let mut client = Socket::new(Kind::Stream);
        client.connect("127.0.0.1", port).unwrap();
        client.send(&payload).unwrap();
        // Keep the connection open until the receiver is done.
        let _ = client.recv(1);
    });

    let conn = server.accept().unwrap();
    let first = conn.recv(4096).unwrap();
    assert!(!first.is_empty());
    assert!(first.len() <= 1024, "recv returned {} bytes", first.len());

    let mut received = first;
    while received.len() < expected.len() {
        let chunk = conn.recv(4096).unwrap();
        assert!(chunk.len() <= 1024);
        assert!(!chunk.is_empty(), "peer closed before payload completed");
        received.extend_from_slice(&chunk);
    }
    assert_eq!(received, expected);

    conn.send(b"x").unwrap();
    sender.join().unwrap();
}

#[test]
fn recv_returns_empty_when_peer_closes() {
    let (server, port) = listening_socket();

    let client = thread::spawn(move || {
        let mut client = Socket::new(Kind::Stream);
        client.connect("127.0.0.1", port).unwrap();
        client.close();
    });

    let conn = server.accept().unwrap();
    client.join().unwrap();
    let got = conn.recv(1024).unwrap();
    assert!(got.is_empty(), "expected EOF marker, got {} bytes", got.len());
}

#[test]
fn close_is_idempotent() {
    let (mut server, _) = listening_socket();
    server.close();
    assert!(server.is_closed());
    server.close();
    assert!(server.is_closed());

    let mut fresh = Socket::new(Kind::Stream);
    fresh.close();
    fresh.close();
}

#[test]
fn closed_socket_rejects_everything() {
    let (mut server, _) = listening_socket();
    server.close();
    assert_unsupported(server.bind("127.0.0.1", 0));
    assert_unsupported(server.accept());
    assert_unsupported(server.listen(DEFAULT_BACKLOG));
    assert_unsupported(server.local_addr());
    assert_eq!(server.state_name(), "closed");
}

#[test]
fn rebind_replaces_prior_listener() {
    let mut server = Socket::new(Kind::Stream);
    server.bind("127.0.0.1", 0).unwrap();
    let first_port = server.local_addr().unwrap().port();

    server.bind("127.0.0.1", 0).unwrap();
    server.listen(DEFAULT_BACKLOG).unwrap();
    let second_port = server.local_addr().unwrap().port();
    assert_ne!(first_port, 0);
    assert_ne!(second_port, 0);
    assert!(server.is_listening());
}

#[test]
fn connect_refused_reports_os_error() {
    let (mut server, port) = listening_socket();
    // Close the listener so the port is free but nothing is accepting.
    server.close();

    let mut client = Socket::new(Kind::Stream);
    let err = client.connect("127.0.0.1", port).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConnectionRefused);
    assert!(!client.is_connected());
}
