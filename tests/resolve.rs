use sockline::{local_host_name, resolve_host, ResolvedAddr};

#[test]
fn local_host_name_is_non_empty() {
    let name = local_host_name().unwrap();
    assert!(!name.is_empty());
    assert!(!name.contains('\0'));
}

#[test]
fn numeric_literal_resolves_to_itself() {
    assert_eq!(resolve_host("127.0.0.1").unwrap(), "127.0.0.1");
}

#[test]
fn loopback_name_resolves_to_a_valid_ip() {
    let ip = resolve_host("localhost").unwrap();
    // Format check only; the resolver decides between 127.0.0.1 and ::1.
    assert!(ip.parse::<std::net::IpAddr>().is_ok(), "not an IP: {ip}");
}

#[test]
fn candidates_carry_the_requested_port() {
    let addrs = sockline::resolve::resolve("localhost", 8080).unwrap();
    assert!(!addrs.is_empty());
    for addr in &addrs {
        assert_eq!(addr.port(), 8080);
        match addr {
            ResolvedAddr::V4(v4) => assert!(v4.ip_string().parse::<std::net::Ipv4Addr>().is_ok()),
            ResolvedAddr::V6(v6) => assert!(v6.ip_string().parse::<std::net::Ipv6Addr>().is_ok()),
        }
    }
}

#[test]
fn socket_handle_exposes_resolution() {
    use sockline::{Kind, Socket};

    let socket = Socket::new(Kind::Stream);
    assert!(!socket.local_host_name().unwrap().is_empty());
    assert_eq!(socket.resolve_host_name("127.0.0.1").unwrap(), "127.0.0.1");
}

#[test]
fn unknown_host_is_an_error() {
    // .invalid is reserved (RFC 2606) and can never resolve.
    let err = resolve_host("no-such-host.invalid").unwrap_err();
    assert!(err.to_string().contains("no-such-host.invalid"));
}
