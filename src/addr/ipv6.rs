use crate::addr::{Domain, ToSockAddr};

/// IPv6 address family marker.
pub struct Ipv6;

impl Domain for Ipv6 {
    type Addr = SocketAddrV6;

    #[inline]
    fn raw() -> libc::c_int {
        libc::AF_INET6
    }
}

/// IPv6 socket address (IP + port + scope).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketAddrV6 {
    ip: [u8; 16],
    port: u16,
    /// Interface scope for link-local addresses; 0 otherwise.
    scope_id: u32,
}

impl SocketAddrV6 {
    /// Creates a new IPv6 address with scope 0.
    pub fn new(ip: [u8; 16], port: u16) -> Self {
        Self { ip, port, scope_id: 0 }
    }

    /// Creates with an explicit scope ID, for link-local (fe80::) addresses.
    pub fn with_scope(ip: [u8; 16], port: u16, scope_id: u32) -> Self {
        Self { ip, port, scope_id }
    }

    /// Parses an IPv6 literal, e.g. `"::1"`.
    pub fn parse(addr: &str, port: u16) -> Option<Self> {
        let ip: std::net::Ipv6Addr = addr.parse().ok()?;
        Some(Self::new(ip.octets(), port))
    }

    /// Returns the IP bytes.
    pub fn ip(&self) -> [u8; 16] {
        self.ip
    }

    /// Returns the port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the scope ID.
    pub fn scope_id(&self) -> u32 {
        self.scope_id
    }

    /// Printable form of the IP without the port (zero-compressed).
    pub fn ip_string(&self) -> String {
        std::net::Ipv6Addr::from(self.ip).to_string()
    }

    pub(crate) fn to_raw(&self) -> libc::sockaddr_in6 {
        libc::sockaddr_in6 {
            sin6_family: libc::AF_INET6 as libc::sa_family_t,
            sin6_port: self.port.to_be(),
            sin6_flowinfo: 0,
            sin6_addr: libc::in6_addr { s6_addr: self.ip },
            sin6_scope_id: self.scope_id,
        }
    }

    pub(crate) fn from_raw(raw: &libc::sockaddr_in6) -> Self {
        Self {
            ip: raw.sin6_addr.s6_addr,
            port: u16::from_be(raw.sin6_port),
            scope_id: raw.sin6_scope_id,
        }
    }
}

impl std::fmt::Display for SocketAddrV6 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]:{}", self.ip_string(), self.port)
    }
}

impl ToSockAddr for SocketAddrV6 {
    fn with_raw<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(*const libc::sockaddr, libc::socklen_t) -> R,
    {
        let raw = self.to_raw();
        let ptr = &raw as *const _ as *const libc::sockaddr;
        let len = std::mem::size_of::<libc::sockaddr_in6>() as libc::socklen_t;
        Some(f(ptr, len))
    }
}
