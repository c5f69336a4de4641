//! Hostname resolution helpers.
//!
//! Thin front over `gethostname(2)` and `getaddrinfo(3)`. Resolution here
//! is blocking, like everything else in the crate.

use std::ffi::CString;

use crate::addr::{SocketAddrV4, SocketAddrV6};
use crate::error::{errno, SocketError};

/// One address returned by the resolver, either family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedAddr {
    V4(SocketAddrV4),
    V6(SocketAddrV6),
}

impl ResolvedAddr {
    /// Printable form of the address without the port.
    pub fn ip_string(&self) -> String {
        match self {
            ResolvedAddr::V4(addr) => addr.ip_string(),
            ResolvedAddr::V6(addr) => addr.ip_string(),
        }
    }

    /// Returns the port carried by this candidate.
    pub fn port(&self) -> u16 {
        match self {
            ResolvedAddr::V4(addr) => addr.port(),
            ResolvedAddr::V6(addr) => addr.port(),
        }
    }
}

impl std::fmt::Display for ResolvedAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvedAddr::V4(addr) => addr.fmt(f),
            ResolvedAddr::V6(addr) => addr.fmt(f),
        }
    }
}

/// Returns the machine's configured host name.
pub fn local_host_name() -> std::io::Result<String> {
    // HOST_NAME_MAX is 64 on Linux; 256 covers every platform we target.
    let mut buf = [0u8; 256];
    let result = unsafe { libc::gethostname(buf.as_mut_ptr() as *mut libc::c_char, buf.len()) };
    if result == -1 {
        return Err(SocketError::HostName { errno: errno() }.into());
    }
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    Ok(String::from_utf8_lossy(&buf[..end]).into_owned())
}

/// Resolves a host name (or numeric literal) to its candidate addresses.
///
/// The port is stamped onto every candidate so callers can connect
/// directly. Candidates come back in the resolver's preference order.
pub fn resolve(name: &str, port: u16) -> std::io::Result<Vec<ResolvedAddr>> {
    let node = CString::new(name).map_err(|_| SocketError::InvalidAddress {
        reason: "host name contains a NUL byte",
    })?;
    // A decimal port string can never contain a NUL byte.
    let service = CString::new(port.to_string()).map_err(|_| SocketError::InvalidAddress {
        reason: "invalid port string",
    })?;

    let mut hints: libc::addrinfo = unsafe { std::mem::zeroed() };
    hints.ai_socktype = libc::SOCK_STREAM;

    let mut list: *mut libc::addrinfo = std::ptr::null_mut();
    let code = unsafe { libc::getaddrinfo(node.as_ptr(), service.as_ptr(), &hints, &mut list) };
    if code != 0 {
        return Err(SocketError::Resolve {
            code,
            name: name.to_owned(),
        }
        .into());
    }

    let mut addrs = Vec::new();
    let mut cursor = list;
    while !cursor.is_null() {
        let entry = unsafe { &*cursor };
        match entry.ai_family {
            libc::AF_INET => {
                let raw = unsafe { &*(entry.ai_addr as *const libc::sockaddr_in) };
                addrs.push(ResolvedAddr::V4(SocketAddrV4::from_raw(raw)));
            }
            libc::AF_INET6 => {
                let raw = unsafe { &*(entry.ai_addr as *const libc::sockaddr_in6) };
                addrs.push(ResolvedAddr::V6(SocketAddrV6::from_raw(raw)));
            }
            _ => {}
        }
        cursor = entry.ai_next;
    }
    unsafe { libc::freeaddrinfo(list) };

    if addrs.is_empty() {
        return Err(SocketError::Resolve {
            code: libc::EAI_NONAME,
            name: name.to_owned(),
        }
        .into());
    }
    Ok(addrs)
}

/// Resolves a host name to its first address as a printable string.
pub fn resolve_host(name: &str) -> std::io::Result<String> {
    let addrs = resolve(name, 0)?;
    Ok(addrs[0].ip_string())
}
