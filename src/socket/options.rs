use std::os::fd::AsRawFd;

use crate::error::{errno, SocketError};

/// Sets `SO_REUSEADDR` on a socket.
///
/// Lets a listener bind an address still in TIME_WAIT from a previous
/// run. The only socket option this design exposes.
pub fn set_reuse_addr<S: AsRawFd>(socket: &S, enable: bool) -> std::io::Result<()> {
    let val: libc::c_int = if enable { 1 } else { 0 };
    let result = unsafe {
        libc::setsockopt(
            socket.as_raw_fd(),
            libc::SOL_SOCKET,
            libc::SO_REUSEADDR,
            &val as *const _ as *const libc::c_void,
            std::mem::size_of::<libc::c_int>() as libc::socklen_t,
        )
    };
    if result == -1 {
        Err(SocketError::SetOption {
            errno: errno(),
            option: "SO_REUSEADDR",
        }
        .into())
    } else {
        Ok(())
    }
}
