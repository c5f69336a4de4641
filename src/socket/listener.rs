use std::marker::PhantomData;
use std::os::fd::OwnedFd;

use super::bound::BoundSocket;
use super::stream::ConnectedStream;
use super::Stream;
use crate::addr::{Domain, FromSockAddr};
use crate::error::{errno, SocketError};

/// A listening stream socket, ready to accept connections.
///
/// Only stream sockets can reach this state; there is no `listen()` for
/// datagrams, so a `Listener` carries no socket-type parameter.
pub struct Listener<D: Domain> {
    fd: OwnedFd,
    _marker: PhantomData<D>,
}

impl<D: Domain> BoundSocket<D, Stream> {
    /// Starts listening, consuming the bound socket.
    ///
    /// `backlog` is the queue depth for not-yet-accepted connections.
    pub fn listen(self, backlog: i32) -> std::io::Result<Listener<D>> {
        let result = unsafe { libc::listen(self.as_raw_fd(), backlog) };

        if result == -1 {
            return Err(SocketError::Listen {
                errno: errno(),
                backlog,
            }
            .into());
        }

        Ok(Listener::from_fd(self.into_fd()))
    }
}

impl<D: Domain> Listener<D> {
    pub(crate) fn from_fd(fd: OwnedFd) -> Self {
        Self {
            fd,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn as_raw_fd(&self) -> libc::c_int {
        use std::os::fd::AsRawFd;
        self.fd.as_raw_fd()
    }

    /// Blocks until a peer connects, then returns the accepted connection.
    ///
    /// When this returns `Ok`, the handshake has completed and the stream
    /// is ready for read/write. The listener itself is untouched and can
    /// accept again.
    pub fn accept(&self) -> std::io::Result<ConnectedStream<D>> {
        use std::os::fd::FromRawFd;
        let fd = unsafe {
            libc::accept4(
                self.as_raw_fd(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                libc::SOCK_CLOEXEC,
            )
        };

        if fd == -1 {
            return Err(SocketError::Accept { errno: errno() }.into());
        }

        let fd = unsafe { OwnedFd::from_raw_fd(fd) };
        Ok(ConnectedStream::from_fd(fd))
    }

    /// Returns the local address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<D::Addr>
    where
        D::Addr: FromSockAddr,
    {
        let mut storage: libc::sockaddr_storage = unsafe { std::mem::zeroed() };
        let mut len = std::mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t;

        let result = unsafe {
            libc::getsockname(
                self.as_raw_fd(),
                &mut storage as *mut _ as *mut libc::sockaddr,
                &mut len,
            )
        };

        if result == -1 {
            return Err(SocketError::GetOption {
                errno: errno(),
                option: "getsockname",
            }
            .into());
        }

        unsafe {
            D::Addr::from_sockaddr(&storage as *const _ as *const libc::sockaddr, len)
                .ok_or_else(|| SocketError::InvalidAddress { reason: "invalid local address" }.into())
        }
    }
}

impl<D: Domain> Listener<D>
where
    D::Addr: FromSockAddr,
{
    /// Accepts a connection, also returning the peer's address.
    pub fn accept_with_addr(&self) -> std::io::Result<(ConnectedStream<D>, D::Addr)> {
        use std::os::fd::FromRawFd;
        let mut storage: libc::sockaddr_storage = unsafe { std::mem::zeroed() };
        let mut len = std::mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t;

        let fd = unsafe {
            libc::accept4(
                self.as_raw_fd(),
                &mut storage as *mut _ as *mut libc::sockaddr,
                &mut len,
                libc::SOCK_CLOEXEC,
            )
        };

        if fd == -1 {
            return Err(SocketError::Accept { errno: errno() }.into());
        }

        let fd = unsafe { OwnedFd::from_raw_fd(fd) };
        let stream = ConnectedStream::from_fd(fd);

        let addr = unsafe {
            D::Addr::from_sockaddr(&storage as *const _ as *const libc::sockaddr, len).ok_or(
                SocketError::InvalidAddress {
                    reason: "invalid client address",
                },
            )?
        };

        Ok((stream, addr))
    }
}

impl<D: Domain> std::os::fd::AsRawFd for Listener<D> {
    fn as_raw_fd(&self) -> std::os::fd::RawFd {
        self.fd.as_raw_fd()
    }
}

impl<D: Domain> std::os::fd::AsFd for Listener<D> {
    fn as_fd(&self) -> std::os::fd::BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl<D: Domain> std::os::fd::FromRawFd for Listener<D> {
    unsafe fn from_raw_fd(fd: std::os::fd::RawFd) -> Self {
        Self::from_fd(unsafe { OwnedFd::from_raw_fd(fd) })
    }
}

impl<D: Domain> std::os::fd::IntoRawFd for Listener<D> {
    fn into_raw_fd(self) -> std::os::fd::RawFd {
        self.fd.into_raw_fd()
    }
}
