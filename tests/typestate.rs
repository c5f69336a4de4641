//! Direct use of the typestate layer, without the dynamic handle.

use std::thread;

use sockline::{Ipv4, RawSocket, Shutdown, SocketAddrV4, Stream};

#[test]
fn bind_listen_accept_round_trip() {
    let bound = RawSocket::<Ipv4, Stream>::new()
        .unwrap()
        .bind(SocketAddrV4::new([127, 0, 0, 1], 0))
        .unwrap();
    let listener = bound.listen(1).unwrap();
    let port = listener.local_addr().unwrap().port();

    let client = thread::spawn(move || {
        let stream = RawSocket::<Ipv4, Stream>::new()
            .unwrap()
            .connect(SocketAddrV4::new([127, 0, 0, 1], port))
            .unwrap();
        stream.write_all(b"hello").unwrap();
        stream.shutdown(Shutdown::Write).unwrap();
        let mut buf = [0u8; 8];
        let n = stream.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"world");
    });

    let (conn, peer) = listener.accept_with_addr().unwrap();
    assert_eq!(peer.ip(), [127, 0, 0, 1]);

    let mut buf = [0u8; 16];
    let mut got = Vec::new();
    loop {
        let n = conn.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        got.extend_from_slice(&buf[..n]);
    }
    assert_eq!(got, b"hello");

    conn.write_all(b"world").unwrap();
    client.join().unwrap();
}

#[test]
fn connected_stream_reports_both_addresses() {
    let listener = RawSocket::<Ipv4, Stream>::new()
        .unwrap()
        .bind(SocketAddrV4::new([127, 0, 0, 1], 0))
        .unwrap()
        .listen(1)
        .unwrap();
    let port = listener.local_addr().unwrap().port();

    let client = thread::spawn(move || {
        RawSocket::<Ipv4, Stream>::new()
            .unwrap()
            .connect(SocketAddrV4::new([127, 0, 0, 1], port))
            .unwrap()
    });

    let conn = listener.accept().unwrap();
    let stream = client.join().unwrap();

    assert_eq!(stream.peer_addr().unwrap().port(), port);
    assert_eq!(conn.local_addr().unwrap().port(), port);
    assert_eq!(
        stream.local_addr().unwrap().port(),
        conn.peer_addr().unwrap().port()
    );
}

#[test]
fn datagram_bind_reports_local_addr() {
    use sockline::Datagram;

    let socket = RawSocket::<Ipv4, Datagram>::new()
        .unwrap()
        .bind_datagram(SocketAddrV4::new([127, 0, 0, 1], 0))
        .unwrap();
    let addr = socket.local_addr().unwrap();
    assert_eq!(addr.ip(), [127, 0, 0, 1]);
    assert_ne!(addr.port(), 0);
}
