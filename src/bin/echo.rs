//! Interactive echo server: accept one connection, print what arrives,
//! reply with a line read from stdin.

use std::io::{BufRead, Write};

use sockline::{Kind, Socket, DEFAULT_BACKLOG};

fn main() -> std::io::Result<()> {
    let mut server = Socket::new(Kind::Stream);
    server.bind("127.0.0.1", 8080)?;
    server.set_reuse_addr()?;
    server.listen(DEFAULT_BACKLOG)?;
    println!("TCP server listening on 127.0.0.1:8080");

    let conn = server.accept()?;
    println!("client connected");

    let stdin = std::io::stdin();
    loop {
        let received = conn.recv(1024)?;
        if received.is_empty() {
            println!("client disconnected");
            break;
        }
        println!("{}", String::from_utf8_lossy(&received));

        print!("Enter message: ");
        std::io::stdout().flush()?;
        let mut reply = String::new();
        stdin.lock().read_line(&mut reply)?;
        conn.send(reply.trim_end().as_bytes())?;
    }

    Ok(())
}
