//! Key-value driver: serves the count-prefixed `put`/`get`/`delete`
//! protocol from stdin to stdout. `RUST_LOG=debug` turns on breadcrumbs
//! on stderr without touching protocol output.

use chain_hashmap::{protocol, ProtocolError};
use std::io;

fn main() -> Result<(), ProtocolError> {
    env_logger::init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    protocol::serve(stdin.lock(), stdout.lock())
}
