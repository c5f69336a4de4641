use std::marker::PhantomData;
use std::os::fd::OwnedFd;

use super::SockType;
use crate::addr::{Domain, FromSockAddr};
use crate::error::{errno, SocketError};

/// A socket bound to a local address but not yet listening.
///
/// Stream sockets transition on via `listen()` (in `listener.rs`).
/// Datagram sockets never pass through here; `bind_datagram()` goes
/// straight to `BoundDatagram`.
pub struct BoundSocket<D: Domain, T: SockType> {
    fd: OwnedFd,
    _marker: PhantomData<(D, T)>,
}

impl<D: Domain, T: SockType> BoundSocket<D, T> {
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

    pub(crate) fn into_fd(self) -> OwnedFd {
        self.fd
    }

    /// Returns the local address the socket is bound to.
    ///
    /// Useful after binding port 0 to learn the kernel-assigned port.
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

impl<D: Domain, T: SockType> std::os::fd::AsRawFd for BoundSocket<D, T> {
    fn as_raw_fd(&self) -> std::os::fd::RawFd {
        self.fd.as_raw_fd()
    }
}

impl<D: Domain, T: SockType> std::os::fd::AsFd for BoundSocket<D, T> {
    fn as_fd(&self) -> std::os::fd::BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl<D: Domain, T: SockType> std::os::fd::FromRawFd for BoundSocket<D, T> {
    unsafe fn from_raw_fd(fd: std::os::fd::RawFd) -> Self {
        Self::from_fd(unsafe { OwnedFd::from_raw_fd(fd) })
    }
}

impl<D: Domain, T: SockType> std::os::fd::IntoRawFd for BoundSocket<D, T> {
    fn into_raw_fd(self) -> std::os::fd::RawFd {
        self.fd.into_raw_fd()
    }
}
