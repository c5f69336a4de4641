//! Minimal blocking socket lifecycle wrapper.
//!
//! Two layers over the OS socket interface:
//!
//! - A zero-cost typestate layer (`RawSocket` → `BoundSocket` →
//!   `Listener` → `ConnectedStream`, plus `BoundDatagram`) where illegal
//!   transitions do not compile.
//! - A dynamic [`Socket`] handle tagged by [`Kind`], for callers who want
//!   one type through the whole lifecycle; operations that do not apply to
//!   the current kind or state fail with
//!   `std::io::ErrorKind::Unsupported`.
//!
//! Everything blocks: bind, connect, accept, send, recv, and the
//! resolution helpers in [`resolve`]. There is no event loop, no timeout,
//! and no internal retry.

mod addr;
mod error;
pub mod resolve;
pub mod socket;

pub use self::addr::{Domain, Ipv4, Ipv6, SocketAddrV4, SocketAddrV6};
pub use self::error::{errno, IoError, SocketError};
pub use self::resolve::{local_host_name, resolve_host, ResolvedAddr};
pub use self::socket::{
    set_reuse_addr, BoundDatagram, BoundSocket, ConnectedStream, Datagram, Kind, Listener,
    RawSocket, Shutdown, SockType, Socket, Stream, DEFAULT_BACKLOG, RECV_BUFFER_LEN,
};
