//! Tokenizer for check expressions.

use crate::error::ExprError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Str(String),
    /// `{field.path}` reference.
    Field(String),
    True,
    False,
    Null,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    EqEq,
    NotEq,
    Gt,
    Lt,
    GtEq,
    LtEq,
    And,
    Or,
    Not,
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, ExprError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let ch = bytes[pos] as char;
        match ch {
            c if c.is_ascii_whitespace() => pos += 1,
            '+' => {
                tokens.push(Token::Plus);
                pos += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                pos += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                pos += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                pos += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                pos += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                pos += 1;
            }
            '=' => {
                // Both `==` and the config store's `=` mean equality.
                pos += if bytes.get(pos + 1) == Some(&b'=') { 2 } else { 1 };
                tokens.push(Token::EqEq);
            }
            '!' => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    tokens.push(Token::NotEq);
                    pos += 2;
                } else {
                    tokens.push(Token::Not);
                    pos += 1;
                }
            }
            '>' => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    tokens.push(Token::GtEq);
                    pos += 2;
                } else {
                    tokens.push(Token::Gt);
                    pos += 1;
                }
            }
            '<' => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    tokens.push(Token::LtEq);
                    pos += 2;
                } else {
                    tokens.push(Token::Lt);
                    pos += 1;
                }
            }
            '&' => {
                if bytes.get(pos + 1) == Some(&b'&') {
                    tokens.push(Token::And);
                    pos += 2;
                } else {
                    return Err(err(pos, "expected '&&'"));
                }
            }
            '|' => {
                if bytes.get(pos + 1) == Some(&b'|') {
                    tokens.push(Token::Or);
                    pos += 2;
                } else {
                    return Err(err(pos, "expected '||'"));
                }
            }
            '{' => {
                let end = input[pos + 1..]
                    .find('}')
                    .map(|offset| pos + 1 + offset)
                    .ok_or_else(|| err(pos, "unterminated field reference"))?;
                let path = input[pos + 1..end].trim();
                if path.is_empty() {
                    return Err(err(pos, "empty field reference"));
                }
                tokens.push(Token::Field(path.to_string()));
                pos = end + 1;
            }
            '\'' | '"' => {
                let quote = ch;
                let end = input[pos + 1..]
                    .find(quote)
                    .map(|offset| pos + 1 + offset)
                    .ok_or_else(|| err(pos, "unterminated string literal"))?;
                tokens.push(Token::Str(input[pos + 1..end].to_string()));
                pos = end + 1;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = pos;
                while pos < bytes.len()
                    && ((bytes[pos] as char).is_ascii_digit() || bytes[pos] == b'.')
                {
                    pos += 1;
                }
                let text = &input[start..pos];
                let number = text
                    .parse::<f64>()
                    .map_err(|_| err(start, &format!("invalid number '{text}'")))?;
                tokens.push(Token::Number(number));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = pos;
                while pos < bytes.len()
                    && ((bytes[pos] as char).is_ascii_alphanumeric() || bytes[pos] == b'_')
                {
                    pos += 1;
                }
                let word = &input[start..pos];
                let token = match word.to_ascii_lowercase().as_str() {
                    "true" => Token::True,
                    "false" => Token::False,
                    "null" => Token::Null,
                    "and" => Token::And,
                    "or" => Token::Or,
                    "not" => Token::Not,
                    // Bare identifiers are field references too; configs
                    // written without braces still resolve.
                    _ => Token::Field(word.to_string()),
                };
                tokens.push(token);
            }
            other => return Err(err(pos, &format!("unexpected character '{other}'"))),
        }
    }

    Ok(tokens)
}

fn err(offset: usize, message: &str) -> ExprError {
    ExprError::Lex {
        offset,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_field_refs_and_operators() {
        let tokens =
            tokenize("{total_excl_vat} + {vat_total} >= 100.5 && {currency} == 'AED'").unwrap();
        assert_eq!(tokens[0], Token::Field("total_excl_vat".to_string()));
        assert_eq!(tokens[1], Token::Plus);
        assert_eq!(tokens[3], Token::GtEq);
        assert_eq!(tokens[4], Token::Number(100.5));
        assert_eq!(tokens[5], Token::And);
        assert_eq!(tokens[7], Token::EqEq);
        assert_eq!(tokens[8], Token::Str("AED".to_string()));
    }

    #[test]
    fn single_equals_means_equality() {
        assert_eq!(
            tokenize("1 = 1").unwrap(),
            vec![Token::Number(1.0), Token::EqEq, Token::Number(1.0)]
        );
    }

    #[test]
    fn word_operators() {
        let tokens = tokenize("not {flag} and {other} or true").unwrap();
        assert_eq!(tokens[0], Token::Not);
        assert_eq!(tokens[2], Token::And);
        assert_eq!(tokens[4], Token::Or);
        assert_eq!(tokens[5], Token::True);
    }

    #[test]
    fn rejects_unterminated_tokens() {
        assert!(tokenize("{invoice").is_err());
        assert!(tokenize("'open").is_err());
        assert!(tokenize("a & b").is_err());
    }
}
