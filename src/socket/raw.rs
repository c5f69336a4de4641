use std::marker::PhantomData;
use std::os::fd::{FromRawFd, OwnedFd};

use super::bound::BoundSocket;
use super::datagram::BoundDatagram;
use super::stream::ConnectedStream;
use super::{Datagram, SockType, Stream};
use crate::addr::{Domain, ToSockAddr};
use crate::error::{errno, SocketError};

/// A freshly created socket, not yet bound or connected.
///
/// The starting point of every lifecycle. Stream sockets move on via
/// `bind()` (server side) or `connect()` (client side); datagram sockets
/// via `bind_datagram()`.
pub struct RawSocket<D: Domain, T: SockType> {
    fd: OwnedFd,
    _marker: PhantomData<(D, T)>,
}

impl<D: Domain, T: SockType> RawSocket<D, T> {
    /// Calls `socket()` with this domain and type. `SOCK_CLOEXEC` is always
    /// set so fds do not leak across exec.
    pub fn new() -> std::io::Result<Self> {
        let fd = unsafe { libc::socket(D::raw(), T::raw() | libc::SOCK_CLOEXEC, 0) };
        if fd == -1 {
            return Err(SocketError::Create { errno: errno() }.into());
        }
        let fd = unsafe { OwnedFd::from_raw_fd(fd) };

        Ok(Self {
            fd,
            _marker: PhantomData,
        })
    }

    #[inline]
    pub fn as_raw_fd(&self) -> libc::c_int {
        use std::os::fd::AsRawFd;
        self.fd.as_raw_fd()
    }

    /// Binds to a local address, consuming self.
    ///
    /// The address type follows the domain: `Ipv4` takes `SocketAddrV4`,
    /// `Ipv6` takes `SocketAddrV6`.
    pub fn bind(self, addr: D::Addr) -> std::io::Result<BoundSocket<D, T>>
    where
        D::Addr: ToSockAddr + std::fmt::Display,
    {
        let result = addr.with_raw(|ptr, len| unsafe { libc::bind(self.as_raw_fd(), ptr, len) });

        match result {
            Some(-1) => Err(SocketError::Bind {
                errno: errno(),
                addr: addr.to_string(),
            }
            .into()),
            Some(_) => Ok(BoundSocket::from_fd(self.into_fd())),
            None => Err(SocketError::InvalidAddress {
                reason: "address too long",
            }
            .into()),
        }
    }

    pub(crate) fn into_fd(self) -> OwnedFd {
        self.fd
    }
}

impl<D: Domain> RawSocket<D, Stream> {
    /// Connects to a remote address, blocking until the handshake completes
    /// or fails. Consumes self; on success the socket is ready for
    /// read/write.
    pub fn connect(self, addr: D::Addr) -> std::io::Result<ConnectedStream<D>>
    where
        D::Addr: ToSockAddr + std::fmt::Display,
    {
        let result = addr.with_raw(|ptr, len| unsafe { libc::connect(self.as_raw_fd(), ptr, len) });

        match result {
            Some(-1) => Err(SocketError::Connect {
                errno: errno(),
                addr: addr.to_string(),
            }
            .into()),
            Some(_) => Ok(ConnectedStream::from_fd(self.into_fd())),
            None => Err(SocketError::InvalidAddress {
                reason: "address too long",
            }
            .into()),
        }
    }
}

impl<D: Domain> RawSocket<D, Datagram> {
    /// Binds a datagram socket, returning it ready for use.
    ///
    /// Datagram sockets skip the bound/listening split — there is nothing
    /// to listen for.
    pub fn bind_datagram(self, addr: D::Addr) -> std::io::Result<BoundDatagram<D>>
    where
        D::Addr: ToSockAddr + std::fmt::Display,
    {
        let result = addr.with_raw(|ptr, len| unsafe { libc::bind(self.as_raw_fd(), ptr, len) });

        match result {
            Some(-1) => Err(SocketError::Bind {
                errno: errno(),
                addr: addr.to_string(),
            }
            .into()),
            Some(_) => Ok(BoundDatagram::from_fd(self.into_fd())),
            None => Err(SocketError::InvalidAddress {
                reason: "address too long",
            }
            .into()),
        }
    }
}

impl<D: Domain, T: SockType> std::os::fd::AsRawFd for RawSocket<D, T> {
    fn as_raw_fd(&self) -> std::os::fd::RawFd {
        self.fd.as_raw_fd()
    }
}

impl<D: Domain, T: SockType> std::os::fd::AsFd for RawSocket<D, T> {
    fn as_fd(&self) -> std::os::fd::BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl<D: Domain, T: SockType> std::os::fd::FromRawFd for RawSocket<D, T> {
    unsafe fn from_raw_fd(fd: std::os::fd::RawFd) -> Self {
        Self {
            fd: unsafe { OwnedFd::from_raw_fd(fd) },
            _marker: PhantomData,
        }
    }
}

impl<D: Domain, T: SockType> std::os::fd::IntoRawFd for RawSocket<D, T> {
    fn into_raw_fd(self) -> std::os::fd::RawFd {
        self.fd.into_raw_fd()
    }
}
