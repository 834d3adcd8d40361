//! Typed-out answer display.

use std::io::{self, Write};
use std::time::Duration;

/// Write `text` one character at a time, pausing `delay` after each, then a newline.
///
/// A zero delay writes without sleeping.
pub async fn reveal<W: Write>(out: &mut W, text: &str, delay: Duration) -> io::Result<()> {
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        out.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
        out.flush()?;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
    writeln!(out)?;
    out.flush()
}
