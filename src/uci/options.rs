use std::io::{self, Write};

use super::UciError;

/// Engine options settable with `setoption`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UciOptions {
    /// Fixed seed for move selection; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

/// What the session must do after an option changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UciOptionAction {
    Reseed(Option<u64>),
}

impl UciOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Option declarations sent in reply to `uci`. Defaults are fixed, not
    /// the current values.
    pub fn print(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "option name Seed type string default random")
    }

    pub fn apply_setoption(
        &mut self,
        name: &str,
        value: Option<&str>,
    ) -> Result<UciOptionAction, UciError> {
        let normalized = name.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "seed" => {
                let raw = value.map(str::trim).unwrap_or("random");
                let seed = if raw.eq_ignore_ascii_case("random") {
                    None
                } else {
                    Some(raw.parse::<u64>().map_err(|_| UciError::InvalidOptionValue {
                        name: name.trim().to_string(),
                        value: raw.to_string(),
                    })?)
                };
                self.seed = seed;
                Ok(UciOptionAction::Reseed(seed))
            }
            _ => Err(UciError::UnknownOption(name.trim().to_string())),
        }
    }
}

/// Split `setoption name <name...> [value <value...>]` into name and value.
#[must_use]
pub fn parse_setoption(parts: &[&str]) -> Option<(String, Option<String>)> {
    if parts.first() != Some(&"setoption") {
        return None;
    }

    let mut name_parts: Vec<&str> = Vec::new();
    let mut value_parts: Vec<&str> = Vec::new();
    let mut mode = "";

    for part in parts.iter().skip(1) {
        match *part {
            "name" => mode = "name",
            "value" => mode = "value",
            _ => match mode {
                "name" => name_parts.push(part),
                "value" => value_parts.push(part),
                _ => {}
            },
        }
    }

    if name_parts.is_empty() {
        return None;
    }

    let name = name_parts.join(" ");
    let value = if value_parts.is_empty() {
        None
    } else {
        Some(value_parts.join(" "))
    };

    Some((name, value))
}
