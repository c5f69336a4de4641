//! Prints the local host name and, given a name on the command line, its
//! first resolved address.

use sockline::{local_host_name, resolve_host};

fn main() -> std::io::Result<()> {
    println!("Hostname: {}", local_host_name()?);

    if let Some(name) = std::env::args().nth(1) {
        println!("{} -> {}", name, resolve_host(&name)?);
    }

    Ok(())
}
