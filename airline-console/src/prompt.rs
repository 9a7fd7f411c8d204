//! Operator prompts that re-ask until the answer is well formed.

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;
use crate::console::Console;

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid pattern"));
static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").expect("valid pattern"));
static DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid pattern"));
static DATE_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}$").expect("valid pattern"));

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Non-negative integer that fits a 4-byte column.
pub async fn number<C: Console + ?Sized>(console: &mut C, prompt: &str) -> Result<i32> {
    loop {
        let line = console.read_line(prompt).await?;
        let line = line.trim();
        if NUMBER.is_match(line) {
            if let Ok(value) = line.parse::<i32>() {
                return Ok(value);
            }
        }
        console.say("Invalid input, please enter a Number");
    }
}

/// Any integer, used for menu selection.
pub async fn choice<C: Console + ?Sized>(console: &mut C, prompt: &str) -> Result<i32> {
    loop {
        let line = console.read_line(prompt).await?;
        match line.trim().parse::<i32>() {
            Ok(value) => return Ok(value),
            Err(_) => console.say("Your input is invalid!"),
        }
    }
}

/// Free text that must not contain digits. May be empty.
pub async fn text_without_digits<C: Console + ?Sized>(console: &mut C, prompt: &str) -> Result<String> {
    loop {
        let line = console.read_line(prompt).await?;
        if !DIGIT.is_match(&line) {
            return Ok(line.trim().to_string());
        }
        console.say("Invalid input, please enter a String without numbers");
    }
}

pub async fn text<C: Console + ?Sized>(console: &mut C, prompt: &str) -> Result<String> {
    Ok(console.read_line(prompt).await?.trim().to_string())
}

pub async fn date<C: Console + ?Sized>(console: &mut C, prompt: &str) -> Result<NaiveDate> {
    loop {
        let line = console.read_line(prompt).await?;
        let line = line.trim();
        if DATE.is_match(line) {
            if let Ok(value) = NaiveDate::parse_from_str(line, DATE_FORMAT) {
                return Ok(value);
            }
        }
        console.say("Not a valid date, please enter a date in the format yyyy-MM-dd");
    }
}

pub async fn date_time<C: Console + ?Sized>(console: &mut C, prompt: &str) -> Result<NaiveDateTime> {
    loop {
        let line = console.read_line(prompt).await?;
        let line = line.trim();
        if DATE_TIME.is_match(line) {
            if let Ok(value) = NaiveDateTime::parse_from_str(line, DATE_TIME_FORMAT) {
                return Ok(value);
            }
        }
        console.say("Not a valid date, please enter a date in the format yyyy-MM-dd HH:mm");
    }
}

pub async fn yes_no<C: Console + ?Sized>(console: &mut C, prompt: &str) -> Result<bool> {
    loop {
        let line = console.read_line(prompt).await?;
        match line.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => console.say("Please answer y or n"),
        }
    }
}
