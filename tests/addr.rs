use sockline::{SocketAddrV4, SocketAddrV6};

#[test]
fn parses_ipv4_literal() {
    let addr = SocketAddrV4::parse("127.0.0.1", 8080).unwrap();
    assert_eq!(addr.ip(), [127, 0, 0, 1]);
    assert_eq!(addr.port(), 8080);
}

#[test]
fn rejects_non_ipv4_literals() {
    assert!(SocketAddrV4::parse("999.0.0.1", 80).is_none());
    assert!(SocketAddrV4::parse("localhost", 80).is_none());
    assert!(SocketAddrV4::parse("1.2.3", 80).is_none());
    assert!(SocketAddrV4::parse("", 80).is_none());
}

#[test]
fn formats_ipv4_with_port() {
    let addr = SocketAddrV4::new([10, 0, 0, 7], 443);
    assert_eq!(addr.to_string(), "10.0.0.7:443");
    assert_eq!(addr.ip_string(), "10.0.0.7");
}

#[test]
fn parses_ipv6_loopback() {
    let addr = SocketAddrV6::parse("::1", 8080).unwrap();
    let mut expected = [0u8; 16];
    expected[15] = 1;
    assert_eq!(addr.ip(), expected);
    assert_eq!(addr.port(), 8080);
    assert_eq!(addr.scope_id(), 0);
}

#[test]
fn formats_ipv6_bracketed() {
    let addr = SocketAddrV6::parse("::1", 443).unwrap();
    assert_eq!(addr.to_string(), "[::1]:443");
    assert_eq!(addr.ip_string(), "::1");
}

#[test]
fn ipv6_scope_id_round_trips() {
    let addr = SocketAddrV6::with_scope([0xfe, 0x80, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1], 0, 3);
    assert_eq!(addr.scope_id(), 3);
}

#[test]
fn ipv4_equality_is_structural() {
    let a = SocketAddrV4::new([192, 168, 1, 1], 80);
    let b = SocketAddrV4::parse("192.168.1.1", 80).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, SocketAddrV4::new([192, 168, 1, 1], 81));
}
