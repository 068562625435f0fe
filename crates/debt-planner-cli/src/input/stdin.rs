use std::io::{self, Read};

use debt_planner_core::{storage, Portfolio};

/// Read a portfolio document from stdin if data is being piped.
/// Returns None if stdin is a TTY (interactive) or empty.
pub fn read_stdin_portfolio() -> Result<Option<Portfolio>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_portfolio(&buffer)
}

fn parse_portfolio(buffer: &str) -> Result<Option<Portfolio>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(storage::from_json(trimmed)?))
}
