mod bound;
mod datagram;
mod handle;
mod listener;
mod options;
mod raw;
mod stream;

pub use self::bound::BoundSocket;
pub use self::datagram::BoundDatagram;
pub use self::handle::{Kind, Socket, DEFAULT_BACKLOG, RECV_BUFFER_LEN};
pub use self::listener::Listener;
pub use self::options::set_reuse_addr;
pub use self::raw::RawSocket;
pub use self::stream::{ConnectedStream, Shutdown};

/// Socket type marker trait.
///
/// Each implementor names the type constant passed to the `socket()`
/// syscall:
///
/// - `Stream` — reliable, ordered byte stream (TCP)
/// - `Datagram` — connectionless, best-effort messages (UDP)
pub trait SockType {
    fn raw() -> libc::c_int;
}

/// Stream socket marker (TCP).
pub struct Stream;

/// Datagram socket marker (UDP).
pub struct Datagram;

impl SockType for Stream {
    #[inline]
    fn raw() -> libc::c_int {
        libc::SOCK_STREAM
    }
}

impl SockType for Datagram {
    #[inline]
    fn raw() -> libc::c_int {
        libc::SOCK_DGRAM
    }
}
