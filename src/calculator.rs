//! Keystroke-level calculator state.
//!
//! The evaluator only ever sees complete expression strings. This module is
//! the caller side of that contract: it accumulates key presses into a buffer,
//! evaluates the buffer on `=`, and produces the text a display would show.

use crate::ast::Operator;
use crate::error::EvalError;
use crate::evaluate;
use log::debug;

/// Button labels in grid order, four per row.
pub const KEYPAD: [&str; 17] = [
    "7", "8", "9", "/", //
    "4", "5", "6", "*", //
    "1", "2", "3", "-", //
    "0", ".", "=", "+", //
    "C",
];

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Point,
    Operator(Operator),
    LeftParen,
    RightParen,
    Equals,
    Clear,
    Backspace,
}

impl Key {
    /// Maps a button label such as `"7"`, `"+"` or `"C"` to its key.
    pub fn from_label(label: &str) -> Option<Key> {
        let mut chars = label.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => None,
        }
    }

    pub fn from_char(c: char) -> Option<Key> {
        match c {
            '0'..='9' => c.to_digit(10).map(|digit| Key::Digit(digit as u8)),
            '.' => Some(Key::Point),
            '(' => Some(Key::LeftParen),
            ')' => Some(Key::RightParen),
            '=' => Some(Key::Equals),
            'C' | 'c' => Some(Key::Clear),
            '<' => Some(Key::Backspace),
            c => Operator::try_from(c).ok().map(Key::Operator),
        }
    }

    /// The character this key appends to the expression, if any.
    fn text(&self) -> Option<char> {
        match self {
            Key::Digit(digit) => char::from_digit(u32::from(*digit), 10),
            Key::Point => Some('.'),
            Key::Operator(operator) => Some(operator.symbol()),
            Key::LeftParen => Some('('),
            Key::RightParen => Some(')'),
            Key::Equals | Key::Clear | Key::Backspace => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorConfig {
    /// Digits after the decimal point when showing a result.
    pub precision: usize,
    /// Text shown in place of the expression after a failed evaluation.
    pub error_text: String,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            precision: 6,
            error_text: "Error".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Calculator {
    config: CalculatorConfig,
    expression: String,
    last_error: Option<EvalError>,
}

impl Calculator {
    pub fn new(config: CalculatorConfig) -> Self {
        Self {
            config,
            expression: String::new(),
            last_error: None,
        }
    }

    pub fn press(&mut self, key: Key) {
        debug!("Key pressed: {:?}", key);

        match key {
            Key::Equals => self.evaluate(),
            Key::Clear => {
                self.expression.clear();
                self.last_error = None;
            }
            Key::Backspace => {
                if self.last_error.take().is_none() {
                    self.expression.pop();
                }
            }
            key => {
                // a failed evaluation leaves an empty buffer behind
                self.last_error = None;
                if let Some(c) = key.text() {
                    self.expression.push(c);
                }
            }
        }
    }

    /// Presses the key for each character of `keys`, skipping whitespace.
    /// Stops at the first character that is not a key.
    pub fn input(&mut self, keys: &str) -> Result<(), char> {
        for c in keys.chars().filter(|c| !c.is_whitespace()) {
            let key = Key::from_char(c).ok_or(c)?;
            self.press(key);
        }
        Ok(())
    }

    /// What the display shows: the error text, `"0"` for an empty buffer, or
    /// the buffer itself.
    pub fn display(&self) -> &str {
        if self.last_error.is_some() {
            &self.config.error_text
        } else if self.expression.is_empty() {
            "0"
        } else {
            &self.expression
        }
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn last_error(&self) -> Option<&EvalError> {
        self.last_error.as_ref()
    }

    fn evaluate(&mut self) {
        if self.expression.trim().is_empty() {
            return;
        }

        match evaluate(&self.expression) {
            Ok(value) => {
                let value = if value == 0.0 { 0.0 } else { value };
                self.expression = format!("{:.*}", self.config.precision, value);
                debug!("Result: {}", self.expression);
            }
            Err(error) => {
                debug!("Evaluation of {:?} failed: {}", self.expression, error);
                self.expression.clear();
                self.last_error = Some(error);
            }
        }
    }
}
