use crate::ast::Operator;
use crate::error::TokenizeError;
use log::trace;
use std::iter::{Enumerate, FusedIterator, Peekable};
use std::str::Chars;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Operator(Operator),
    LeftParen,
    RightParen,
    End,
}

/// A token together with the character offset it starts at.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PositionedToken {
    pub token: Token,
    pub position: usize,
}

/// Lazily scans an input string into tokens.
///
/// Yields exactly one [`Token::End`] as its last item, or stops after the first
/// error. Once either has been yielded the iterator only returns `None`.
pub struct Tokenizer<'a> {
    chars: Peekable<Enumerate<Chars<'a>>>,
    offset: usize,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().enumerate().peekable(),
            offset: 0,
            finished: false,
        }
    }

    fn bump(&mut self) {
        if self.chars.next().is_some() {
            self.offset += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.chars.peek(), Some((_, c)) if c.is_whitespace()) {
            self.bump();
        }
    }

    /// Digits with at most one decimal point; a lone "." is not a number.
    fn number(&mut self, start: usize) -> Result<Token, TokenizeError> {
        let mut literal = String::new();
        let mut seen_point = false;

        while let Some(&(position, c)) = self.chars.peek() {
            match c {
                '0'..='9' => literal.push(c),
                '.' if !seen_point => {
                    seen_point = true;
                    literal.push(c);
                }
                '.' => return Err(TokenizeError { found: c, position }),
                _ => break,
            }
            self.bump();
        }

        if literal == "." {
            return Err(TokenizeError {
                found: '.',
                position: start,
            });
        }

        literal
            .parse::<f64>()
            .map(Token::Number)
            .map_err(|_| TokenizeError {
                found: literal.chars().next().unwrap_or('.'),
                position: start,
            })
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<PositionedToken, TokenizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        self.skip_whitespace();

        let Some(&(position, c)) = self.chars.peek() else {
            self.finished = true;
            trace!("Token End at {}", self.offset);
            return Some(Ok(PositionedToken {
                token: Token::End,
                position: self.offset,
            }));
        };

        let token = match c {
            '0'..='9' | '.' => self.number(position),
            '(' => {
                self.bump();
                Ok(Token::LeftParen)
            }
            ')' => {
                self.bump();
                Ok(Token::RightParen)
            }
            c => match Operator::try_from(c) {
                Ok(operator) => {
                    self.bump();
                    Ok(Token::Operator(operator))
                }
                Err(found) => Err(TokenizeError { found, position }),
            },
        };

        match token {
            Ok(token) => {
                trace!("Token {:?} at {}", token, position);
                Some(Ok(PositionedToken { token, position }))
            }
            Err(error) => {
                self.finished = true;
                Some(Err(error))
            }
        }
    }
}

impl FusedIterator for Tokenizer<'_> {}

/// Scans the whole input, stopping at the first unexpected character.
pub fn tokenize(input: &str) -> Result<Vec<PositionedToken>, TokenizeError> {
    Tokenizer::new(input).collect()
}
