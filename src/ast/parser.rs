use crate::ast::{tokenize, ASTNode, Operator, PositionedToken, Token};
use crate::error::EvalError;
use log::debug;

/// Deepest combined nesting of parentheses and unary minus the parser accepts.
pub const MAX_DEPTH: usize = 256;

/// Recursive-descent parser over an already tokenized expression.
///
/// ```text
/// expr    := term (('+' | '-') term)*
/// term    := factor (('*' | '/') factor)*
/// factor  := '-' factor | number | '(' expr ')'
/// ```
pub struct Parser {
    tokens: Vec<PositionedToken>,
    end: PositionedToken,
    index: usize,
    depth: usize,
}

impl Parser {
    /// Tokenizes and parses `input` into an AST.
    pub fn parse_expression(input: &str) -> Result<ASTNode, EvalError> {
        debug!("Parsing expression: {}", input);
        let tokens = tokenize(input)?;
        let ast = Parser::new(tokens).parse()?;
        debug!("Parse result: {}", ast);
        Ok(ast)
    }

    /// Builds a parser from a token sequence. A missing trailing [`Token::End`]
    /// is implied just past the last token.
    pub fn new(tokens: Vec<PositionedToken>) -> Self {
        let end = match tokens.last() {
            Some(last @ PositionedToken {
                token: Token::End, ..
            }) => *last,
            Some(last) => PositionedToken {
                token: Token::End,
                position: last.position + 1,
            },
            None => PositionedToken {
                token: Token::End,
                position: 0,
            },
        };

        Self {
            tokens,
            end,
            index: 0,
            depth: 0,
        }
    }

    /// Parses one complete expression; anything left before `End` is an error.
    pub fn parse(mut self) -> Result<ASTNode, EvalError> {
        let ast = self.expr()?;

        let PositionedToken { token, position } = self.peek();
        match token {
            Token::End => match self.tokens.get(self.index + 1) {
                Some(extra) => Err(EvalError::malformed(
                    extra.position,
                    "unexpected token after end of input",
                )),
                None => Ok(ast),
            },
            Token::RightParen => Err(EvalError::malformed(position, "unmatched ')'")),
            _ => Err(EvalError::malformed(
                position,
                "unexpected token after complete expression",
            )),
        }
    }

    fn peek(&self) -> PositionedToken {
        self.tokens.get(self.index).copied().unwrap_or(self.end)
    }

    fn advance(&mut self) {
        if !matches!(self.peek().token, Token::End) {
            self.index += 1;
        }
    }

    fn expr(&mut self) -> Result<ASTNode, EvalError> {
        let mut node = self.term()?;

        while let Token::Operator(operator @ (Operator::Add | Operator::Subtract)) =
            self.peek().token
        {
            self.advance();
            let right = self.term()?;
            node = ASTNode::BinaryOperation {
                left: Box::new(node),
                operator,
                right: Box::new(right),
            };
        }

        Ok(node)
    }

    fn term(&mut self) -> Result<ASTNode, EvalError> {
        let mut node = self.factor()?;

        while let Token::Operator(operator @ (Operator::Multiply | Operator::Divide)) =
            self.peek().token
        {
            self.advance();
            let right = self.factor()?;
            node = ASTNode::BinaryOperation {
                left: Box::new(node),
                operator,
                right: Box::new(right),
            };
        }

        Ok(node)
    }

    fn factor(&mut self) -> Result<ASTNode, EvalError> {
        let PositionedToken { token, position } = self.peek();

        match token {
            Token::Number(value) => {
                self.advance();
                Ok(ASTNode::Literal(value))
            }
            Token::Operator(Operator::Subtract) => {
                self.advance();
                let operand = self.nested(position, Self::factor)?;
                Ok(ASTNode::UnaryNegate(Box::new(operand)))
            }
            Token::LeftParen => {
                self.advance();
                let inner = self.nested(position, Self::expr)?;

                let closing = self.peek();
                if !matches!(closing.token, Token::RightParen) {
                    return Err(EvalError::malformed(
                        closing.position,
                        format!("expected ')' to close '(' at position {}", position),
                    ));
                }
                self.advance();
                Ok(inner)
            }
            Token::RightParen => Err(EvalError::malformed(position, "unexpected ')'")),
            Token::Operator(operator) => Err(EvalError::malformed(
                position,
                format!("expected operand, found '{}'", operator),
            )),
            Token::End => Err(EvalError::malformed(
                position,
                "expected operand, found end of input",
            )),
        }
    }

    fn nested<F>(&mut self, position: usize, parse: F) -> Result<ASTNode, EvalError>
    where
        F: FnOnce(&mut Self) -> Result<ASTNode, EvalError>,
    {
        if self.depth >= MAX_DEPTH {
            return Err(EvalError::malformed(
                position,
                "expression nested too deeply",
            ));
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }
}
