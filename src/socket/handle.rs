use super::datagram::BoundDatagram;
use super::listener::Listener;
use super::options::set_reuse_addr;
use super::raw::RawSocket;
use super::stream::ConnectedStream;
use super::{Datagram, Stream};
use crate::addr::{Ipv4, SocketAddrV4};
use crate::error::SocketError;
use crate::resolve::{resolve, ResolvedAddr};

/// Default listen backlog when the caller has no opinion.
pub const DEFAULT_BACKLOG: i32 = 5;

/// Ceiling on a single `recv` call, regardless of the requested size.
///
/// Requests larger than this are clamped; remaining bytes come back from
/// subsequent calls.
pub const RECV_BUFFER_LEN: usize = 1024;

/// Socket kind, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Connection-oriented, ordered, reliable byte stream (TCP).
    Stream,
    /// Connectionless, best-effort messages (UDP).
    Datagram,
}

enum State {
    Fresh,
    Bound(super::BoundSocket<Ipv4, Stream>),
    Listening(Listener<Ipv4>),
    Connected(ConnectedStream<Ipv4>),
    DatagramBound(BoundDatagram<Ipv4>),
    Closed,
}

impl State {
    fn name(&self) -> &'static str {
        match self {
            State::Fresh => "fresh",
            State::Bound(_) => "bound",
            State::Listening(_) => "listening",
            State::Connected(_) => "connected",
            State::DatagramBound(_) => "bound",
            State::Closed => "closed",
        }
    }
}

/// A socket handle tagged by kind, moved through its lifecycle at runtime.
///
/// This is the dynamic counterpart of the typestate layer: one type for
/// both kinds and every state, with operations that do not apply to the
/// current kind or state rejected with an unsupported-operation error
/// (`std::io::ErrorKind::Unsupported`). Each handle exclusively owns at
/// most one OS socket; `accept` hands out brand-new handles and never
/// shares fds.
///
/// Stream lifecycle: fresh → `bind` → `listen` → `accept` (server), or
/// fresh → `connect` (client). Datagram lifecycle: fresh → `bind`.
/// `close` is terminal and idempotent.
pub struct Socket {
    kind: Kind,
    state: State,
}

impl Socket {
    /// Creates a fresh handle of the given kind. No fd is allocated until
    /// `bind` or `connect`.
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            state: State::Fresh,
        }
    }

    /// Returns the kind fixed at construction.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn is_listening(&self) -> bool {
        matches!(self.state, State::Listening(_))
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, State::Connected(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed)
    }

    /// Binds to a local IPv4 literal such as `"127.0.0.1"`.
    ///
    /// Stream kind: creates and binds the server-side socket; a repeat
    /// bind replaces any prior bound or listening handle. Datagram kind:
    /// binds the one datagram handle. Host names are rejected here —
    /// binding takes a literal, `connect` is the operation that resolves.
    pub fn bind(&mut self, addr: &str, port: u16) -> std::io::Result<()> {
        if self.is_closed() {
            return Err(unsupported("socket is closed"));
        }
        let local = SocketAddrV4::parse(addr, port).ok_or(SocketError::InvalidAddress {
            reason: "expected an IPv4 literal",
        })?;

        match self.kind {
            Kind::Stream => {
                if self.is_connected() {
                    return Err(unsupported("socket is already connected"));
                }
                let bound = RawSocket::<Ipv4, Stream>::new()?.bind(local)?;
                self.state = State::Bound(bound);
            }
            Kind::Datagram => {
                if matches!(self.state, State::DatagramBound(_)) {
                    return Err(unsupported("datagram socket is already bound"));
                }
                let bound = RawSocket::<Ipv4, Datagram>::new()?.bind_datagram(local)?;
                self.state = State::DatagramBound(bound);
            }
        }
        Ok(())
    }

    /// Resolves `host:port` and connects to the first candidate that
    /// succeeds. Stream kind only, from the fresh state.
    pub fn connect(&mut self, host: &str, port: u16) -> std::io::Result<()> {
        if self.kind == Kind::Datagram {
            return Err(unsupported("connect is not defined for datagram sockets"));
        }
        if !matches!(self.state, State::Fresh) {
            return Err(unsupported("connect requires a fresh stream socket"));
        }

        let candidates = resolve(host, port)?;
        let mut last_err: Option<std::io::Error> = None;
        for candidate in candidates {
            // The facade is IPv4; other families stay available through the
            // typestate layer.
            let ResolvedAddr::V4(addr) = candidate else {
                continue;
            };
            match RawSocket::<Ipv4, Stream>::new()?.connect(addr) {
                Ok(stream) => {
                    self.state = State::Connected(stream);
                    return Ok(());
                }
                Err(err) => last_err = Some(err),
            }
        }

        Err(last_err.unwrap_or_else(|| {
            SocketError::InvalidAddress {
                reason: "no usable IPv4 address for host",
            }
            .into()
        }))
    }

    /// Sets the pending-connection queue depth and starts listening.
    /// Stream kind only, and only after a successful `bind`.
    pub fn listen(&mut self, backlog: i32) -> std::io::Result<()> {
        if self.kind == Kind::Datagram {
            return Err(unsupported("listen is not defined for datagram sockets"));
        }
        match std::mem::replace(&mut self.state, State::Closed) {
            State::Bound(bound) => {
                // On failure the fd is released; the handle stays closed
                // rather than half-listening.
                let listener = bound.listen(backlog)?;
                self.state = State::Listening(listener);
                Ok(())
            }
            other => {
                self.state = other;
                Err(unsupported("listen requires a bound stream socket"))
            }
        }
    }

    /// Blocks until a peer connects, returning a new connected handle.
    ///
    /// The listener keeps its acceptor and may accept again. Stream kind
    /// only, and only while listening.
    pub fn accept(&self) -> std::io::Result<Socket> {
        if self.kind == Kind::Datagram {
            return Err(unsupported("accept is not defined for datagram sockets"));
        }
        match &self.state {
            State::Listening(listener) => {
                let stream = listener.accept()?;
                Ok(Socket {
                    kind: Kind::Stream,
                    state: State::Connected(stream),
                })
            }
            _ => Err(unsupported("accept requires a listening stream socket")),
        }
    }

    /// Blocking full write of the entire payload. Never reports a short
    /// write. Stream kind only, on a connected handle.
    pub fn send(&self, message: &[u8]) -> std::io::Result<()> {
        if self.kind == Kind::Datagram {
            return Err(unsupported("send is not defined for datagram sockets"));
        }
        match &self.state {
            State::Connected(stream) => stream.write_all(message),
            _ => Err(unsupported("send requires a connected stream socket")),
        }
    }

    /// Single blocking read of up to `min(max_len, RECV_BUFFER_LEN)` bytes.
    ///
    /// Returns as soon as at least one byte arrives. An empty result means
    /// the peer closed its side; it is not an error. Stream kind only, on
    /// a connected handle.
    pub fn recv(&self, max_len: usize) -> std::io::Result<Vec<u8>> {
        if self.kind == Kind::Datagram {
            return Err(unsupported("recv is not defined for datagram sockets"));
        }
        match &self.state {
            State::Connected(stream) => {
                let cap = max_len.min(RECV_BUFFER_LEN);
                let mut buf = [0u8; RECV_BUFFER_LEN];
                let n = stream.read(&mut buf[..cap])?;
                Ok(buf[..n].to_vec())
            }
            _ => Err(unsupported("recv requires a connected stream socket")),
        }
    }

    /// Enables `SO_REUSEADDR` on the server-side handle. Only meaningful
    /// once an acceptor exists, so it requires a bound or listening
    /// stream socket.
    pub fn set_reuse_addr(&self) -> std::io::Result<()> {
        if self.kind == Kind::Datagram {
            return Err(unsupported(
                "set_reuse_addr is not defined for datagram sockets",
            ));
        }
        match &self.state {
            State::Bound(bound) => set_reuse_addr(bound, true),
            State::Listening(listener) => set_reuse_addr(listener, true),
            _ => Err(unsupported(
                "set_reuse_addr requires a bound or listening stream socket",
            )),
        }
    }

    /// Returns the local address of whichever handle is live.
    pub fn local_addr(&self) -> std::io::Result<SocketAddrV4> {
        match &self.state {
            State::Bound(bound) => bound.local_addr(),
            State::Listening(listener) => listener.local_addr(),
            State::Connected(stream) => stream.local_addr(),
            State::DatagramBound(datagram) => datagram.local_addr(),
            _ => Err(unsupported("socket has no live handle")),
        }
    }

    /// Releases the live handle, if any. Safe to call repeatedly; a close
    /// with nothing open is a no-op. The handle stays closed afterwards.
    pub fn close(&mut self) {
        // Dropping the previous state closes the fd via OwnedFd.
        self.state = State::Closed;
    }

    /// Name of the current lifecycle state, for diagnostics.
    pub fn state_name(&self) -> &'static str {
        self.state.name()
    }

    /// Returns the machine's configured host name. Independent of this
    /// handle's kind or state; kept as a method to mirror the rest of the
    /// lifecycle API.
    pub fn local_host_name(&self) -> std::io::Result<String> {
        crate::resolve::local_host_name()
    }

    /// Resolves a DNS name to its first address as a printable string.
    pub fn resolve_host_name(&self, name: &str) -> std::io::Result<String> {
        crate::resolve::resolve_host(name)
    }
}

fn unsupported(reason: &'static str) -> std::io::Error {
    SocketError::Unsupported { reason }.into()
}
