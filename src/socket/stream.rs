use std::marker::PhantomData;
use std::os::fd::{FromRawFd, IntoRawFd, OwnedFd, RawFd};

use crate::addr::{Domain, FromSockAddr};
use crate::error::{errno, IoError, SocketError};

/// An established stream connection, ready for read/write.
///
/// Produced by `Listener::accept()` on the server side or
/// `RawSocket::connect()` on the client side.
pub struct ConnectedStream<D: Domain> {
    fd: OwnedFd,
    _marker: PhantomData<D>,
}

/// Which half of the connection to shut down.
pub enum Shutdown {
    Read,
    Write,
    ReadWrite,
}

impl<D: Domain> ConnectedStream<D> {
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

    /// Single blocking read. Returns as soon as at least one byte is
    /// available; `Ok(0)` means the peer closed its sending side.
    pub fn read(&self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = unsafe {
            libc::read(
                self.as_raw_fd(),
                buf.as_mut_ptr() as *mut libc::c_void,
                buf.len(),
            )
        };

        if n == -1 {
            Err(IoError::Read { errno: errno() }.into())
        } else {
            Ok(n as usize)
        }
    }

    /// Single blocking write. May write fewer bytes than given; use
    /// `write_all` for whole-payload delivery.
    pub fn write(&self, buf: &[u8]) -> std::io::Result<usize> {
        let n = unsafe {
            libc::write(
                self.as_raw_fd(),
                buf.as_ptr() as *const libc::c_void,
                buf.len(),
            )
        };

        if n == -1 {
            Err(IoError::Write { errno: errno() }.into())
        } else {
            Ok(n as usize)
        }
    }

    /// Writes the entire payload, blocking until every byte is delivered
    /// to the kernel or an error occurs. A short write is never surfaced.
    pub fn write_all(&self, mut buf: &[u8]) -> std::io::Result<()> {
        while !buf.is_empty() {
            let n = self.write(buf)?;
            if n == 0 {
                return Err(IoError::ConnectionClosed.into());
            }
            buf = &buf[n..];
        }
        Ok(())
    }

    /// Shuts down one or both halves of the connection.
    pub fn shutdown(&self, how: Shutdown) -> std::io::Result<()> {
        let how = match how {
            Shutdown::Read => libc::SHUT_RD,
            Shutdown::Write => libc::SHUT_WR,
            Shutdown::ReadWrite => libc::SHUT_RDWR,
        };

        let result = unsafe { libc::shutdown(self.as_raw_fd(), how) };

        if result == -1 {
            Err(SocketError::SetOption {
                errno: errno(),
                option: "shutdown",
            }
            .into())
        } else {
            Ok(())
        }
    }
}

impl<D: Domain> ConnectedStream<D>
where
    D::Addr: FromSockAddr,
{
    /// Returns the remote address of this connection.
    pub fn peer_addr(&self) -> std::io::Result<D::Addr> {
        let mut storage: libc::sockaddr_storage = unsafe { std::mem::zeroed() };
        let mut len = std::mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t;

        let result = unsafe {
            libc::getpeername(
                self.as_raw_fd(),
                &mut storage as *mut _ as *mut libc::sockaddr,
                &mut len,
            )
        };

        if result == -1 {
            return Err(SocketError::GetOption {
                errno: errno(),
                option: "getpeername",
            }
            .into());
        }

        unsafe {
            D::Addr::from_sockaddr(&storage as *const _ as *const libc::sockaddr, len)
                .ok_or_else(|| SocketError::InvalidAddress { reason: "invalid peer address" }.into())
        }
    }

    /// Returns the local address of this connection.
    pub fn local_addr(&self) -> std::io::Result<D::Addr> {
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

impl<D: Domain> std::io::Read for ConnectedStream<D> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        ConnectedStream::read(self, buf)
    }
}

impl<D: Domain> std::io::Write for ConnectedStream<D> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        ConnectedStream::write(self, buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        // Nothing buffered at this layer.
        Ok(())
    }
}

impl<D: Domain> std::os::fd::AsRawFd for ConnectedStream<D> {
    fn as_raw_fd(&self) -> std::os::fd::RawFd {
        self.fd.as_raw_fd()
    }
}

impl<D: Domain> std::os::fd::AsFd for ConnectedStream<D> {
    fn as_fd(&self) -> std::os::fd::BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl<D: Domain> FromRawFd for ConnectedStream<D> {
    unsafe fn from_raw_fd(fd: RawFd) -> Self {
        Self::from_fd(unsafe { OwnedFd::from_raw_fd(fd) })
    }
}

impl<D: Domain> IntoRawFd for ConnectedStream<D> {
    fn into_raw_fd(self) -> RawFd {
        self.fd.into_raw_fd()
    }
}
