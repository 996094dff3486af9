//! JSON output for CLI commands
//!
//! - One JSON object per command, on one line of stdout
//! - Logs never go to stdout

use std::io::{self, Write};

use serde::Serialize;

use super::errors::CliResult;

/// Success envelope
#[derive(Serialize)]
struct Response<'a, T: Serialize> {
    status: &'static str,
    data: &'a T,
}

/// Write a success response to stdout
pub fn write_response<T: Serialize>(data: &T) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_to(&mut out, data)
}

/// Write a success response to any writer
pub fn write_to<W: Write, T: Serialize>(out: &mut W, data: &T) -> CliResult<()> {
    let response = Response { status: "ok", data };
    serde_json::to_writer(&mut *out, &response)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_is_one_line() {
        let mut buf = Vec::new();
        write_to(&mut buf, &serde_json::json!({"rows": 3})).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "{\"status\":\"ok\",\"data\":{\"rows\":3}}\n");
    }
}
