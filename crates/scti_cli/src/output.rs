//! Text/JSON rendering for command results.

use anyhow::Result;
use serde::Serialize;
use std::fmt::Display;

/// Writes either the `Display` rendering or JSON to stdout.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    pub fn one<T: Serialize + Display>(&self, value: &T) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{value}");
        }
        Ok(())
    }

    pub fn many<T: Serialize + Display>(&self, values: &[T]) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(values)?);
            return Ok(());
        }
        if values.is_empty() {
            println!("No activities.");
        }
        for (index, value) in values.iter().enumerate() {
            if index > 0 {
                println!();
            }
            println!("{value}");
        }
        Ok(())
    }

    /// Prints a single `key: value` result line.
    pub fn message(&self, key: &str, value: impl Serialize + Display) -> Result<()> {
        if self.json {
            let mut object = serde_json::Map::new();
            object.insert(key.to_string(), serde_json::to_value(&value)?);
            println!("{}", serde_json::Value::Object(object));
        } else {
            println!("{key}: {value}");
        }
        Ok(())
    }
}
