//! Address families and socket-address types.
//!
//! Two families are supported, matching what the rest of the crate uses:
//! `Ipv4` and `Ipv6`. Each family marker names its socket-address type via
//! the `Domain::Addr` associated type so that socket operations take the
//! right address kind at compile time.

mod ipv4;
mod ipv6;

pub use self::ipv4::{Ipv4, SocketAddrV4};
pub use self::ipv6::{Ipv6, SocketAddrV6};

/// Address-family marker trait.
///
/// Implementors pick the `socket()` domain constant and the concrete
/// address type used with that family.
pub trait Domain {
    type Addr;
    fn raw() -> libc::c_int;
}

/// Address types that can be handed to syscalls as a raw sockaddr.
///
/// The closure receives a pointer into a stack-allocated sockaddr that is
/// only valid for the duration of the call.
pub trait ToSockAddr {
    fn with_raw<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(*const libc::sockaddr, libc::socklen_t) -> R;
}

/// Address types that can be recovered from raw sockaddr storage.
pub trait FromSockAddr: Sized {
    /// # Safety
    /// `addr` must point to initialized sockaddr storage of at least `len`
    /// bytes, holding an address of this type's family.
    unsafe fn from_sockaddr(addr: *const libc::sockaddr, len: libc::socklen_t) -> Option<Self>;
}

impl FromSockAddr for SocketAddrV4 {
    unsafe fn from_sockaddr(addr: *const libc::sockaddr, len: libc::socklen_t) -> Option<Self> {
        if len < std::mem::size_of::<libc::sockaddr_in>() as libc::socklen_t {
            return None;
        }
        let raw = unsafe { &*(addr as *const libc::sockaddr_in) };
        Some(Self::from_raw(raw))
    }
}

impl FromSockAddr for SocketAddrV6 {
    unsafe fn from_sockaddr(addr: *const libc::sockaddr, len: libc::socklen_t) -> Option<Self> {
        if len < std::mem::size_of::<libc::sockaddr_in6>() as libc::socklen_t {
            return None;
        }
        let raw = unsafe { &*(addr as *const libc::sockaddr_in6) };
        Some(Self::from_raw(raw))
    }
}
