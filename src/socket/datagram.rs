use std::marker::PhantomData;
use std::os::fd::OwnedFd;

use crate::addr::{Domain, FromSockAddr};
use crate::error::{errno, SocketError};

/// A bound datagram socket.
///
/// This design stops at binding: datagram sockets carry no
/// connect/listen/accept lifecycle, and stream-style send/receive is not
/// defined for them. The fd is released on drop like every other state.
pub struct BoundDatagram<D: Domain> {
    fd: OwnedFd,
    _marker: PhantomData<D>,
}

impl<D: Domain> BoundDatagram<D> {
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

    /// Returns the local address the socket is bound to.
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

impl<D: Domain> std::os::fd::AsRawFd for BoundDatagram<D> {
    fn as_raw_fd(&self) -> std::os::fd::RawFd {
        self.fd.as_raw_fd()
    }
}

impl<D: Domain> std::os::fd::AsFd for BoundDatagram<D> {
    fn as_fd(&self) -> std::os::fd::BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl<D: Domain> std::os::fd::FromRawFd for BoundDatagram<D> {
    unsafe fn from_raw_fd(fd: std::os::fd::RawFd) -> Self {
        Self::from_fd(unsafe { OwnedFd::from_raw_fd(fd) })
    }
}

impl<D: Domain> std::os::fd::IntoRawFd for BoundDatagram<D> {
    fn into_raw_fd(self) -> std::os::fd::RawFd {
        self.fd.into_raw_fd()
    }
}
