use crate::addr::{Domain, ToSockAddr};

/// IPv4 address family marker.
pub struct Ipv4;

impl Domain for Ipv4 {
    type Addr = SocketAddrV4;

    #[inline]
    fn raw() -> libc::c_int {
        libc::AF_INET
    }
}

/// IPv4 socket address (IP + port).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketAddrV4 {
    ip: [u8; 4],
    port: u16,
}

impl SocketAddrV4 {
    /// Creates a new IPv4 address from octets and a port.
    pub fn new(ip: [u8; 4], port: u16) -> Self {
        Self { ip, port }
    }

    /// Parses a dotted-decimal literal, e.g. `"127.0.0.1"`.
    ///
    /// Returns `None` on anything that is not a plain IPv4 literal —
    /// host names are the resolver's job, not this type's.
    pub fn parse(addr: &str, port: u16) -> Option<Self> {
        let ip: std::net::Ipv4Addr = addr.parse().ok()?;
        Some(Self::new(ip.octets(), port))
    }

    pub(crate) fn from_raw(raw: &libc::sockaddr_in) -> Self {
        Self {
            ip: raw.sin_addr.s_addr.to_ne_bytes(),
            port: u16::from_be(raw.sin_port),
        }
    }

    /// Returns the IP octets.
    pub fn ip(&self) -> [u8; 4] {
        self.ip
    }

    /// Returns the port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Printable form of the IP without the port.
    pub fn ip_string(&self) -> String {
        let [a, b, c, d] = self.ip;
        format!("{}.{}.{}.{}", a, b, c, d)
    }

    pub(crate) fn to_raw(&self) -> libc::sockaddr_in {
        libc::sockaddr_in {
            sin_family: libc::AF_INET as libc::sa_family_t,
            sin_port: self.port.to_be(),
            sin_addr: libc::in_addr {
                s_addr: u32::from_be_bytes(self.ip).to_be(),
            },
            sin_zero: [0; 8],
        }
    }
}

impl std::fmt::Display for SocketAddrV4 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.ip_string(), self.port)
    }
}

impl ToSockAddr for SocketAddrV4 {
    fn with_raw<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(*const libc::sockaddr, libc::socklen_t) -> R,
    {
        // The sockaddr_in lives on this frame; the closure runs before it drops.
        let raw = self.to_raw();
        let ptr = &raw as *const _ as *const libc::sockaddr;
        let len = std::mem::size_of::<libc::sockaddr_in>() as libc::socklen_t;
        Some(f(ptr, len))
    }
}
