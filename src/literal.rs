//! A small reader for bracketed list literals such as `['python', "power bi", 3]`.
//!
//! Skill columns in job exports are usually serialized this way. The reader
//! accepts quoted strings (either quote style, with backslash escapes and
//! implicit concatenation), numbers, `True`/`False`/`None`, and nested lists,
//! tuples, sets and dicts. Anything else fails to parse, as does nesting
//! deeper than [`MAX_DEPTH`].

use std::{fmt::Display, iter::Peekable, str::Chars};

#[derive(Clone, PartialEq, Debug)]
pub enum Literal {
    Str(String),
    /// A number in canonical form: `1_000` reads as `1000`, `1e5` as `100000.0`.
    Number(String),
    Bool(bool),
    None,
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
    Set(Vec<Literal>),
    Dict(Vec<(Literal, Literal)>),
}

/// How deeply containers may nest before the input is rejected.
pub const MAX_DEPTH: usize = 64;

/// Displays the literal the way it would read as plain text: strings bare,
/// containers with their items quoted.
impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Str(s) => write!(f, "{}", s),
            Literal::Number(n) => write!(f, "{}", n),
            Literal::Bool(true) => write!(f, "True"),
            Literal::Bool(false) => write!(f, "False"),
            Literal::None => write!(f, "None"),
            Literal::List(items) => write!(f, "[{}]", join_repr(items)),
            Literal::Tuple(items) if items.len() == 1 => write!(f, "({},)", items[0].repr()),
            Literal::Tuple(items) => write!(f, "({})", join_repr(items)),
            Literal::Set(items) if items.is_empty() => write!(f, "set()"),
            Literal::Set(items) => write!(f, "{{{}}}", join_repr(items)),
            Literal::Dict(entries) => {
                let entries = entries
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key.repr(), value.repr()))
                    .collect::<Vec<_>>();
                write!(f, "{{{}}}", entries.join(", "))
            }
        }
    }
}

impl Literal {
    /// The literal as source text, with strings quoted.
    pub fn repr(&self) -> String {
        match self {
            Literal::Str(s) => quote(s),
            _ => self.to_string(),
        }
    }
}

/// Quotes a string as a list literal item, preferring single quotes.
pub fn quote(s: &str) -> String {
    let delim = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(delim);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delim => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delim);
    out
}

/// Formats a sequence of strings as a list literal: `['a', 'b']`.
pub fn list_repr<S: AsRef<str>>(items: &[S]) -> String {
    let items = items
        .iter()
        .map(|s| quote(s.as_ref()))
        .collect::<Vec<_>>();
    format!("[{}]", items.join(", "))
}

fn join_repr(items: &[Literal]) -> String {
    items.iter().map(Literal::repr).collect::<Vec<_>>().join(", ")
}

/// Parses a whole string as a single literal.
///
/// A bare comma-separated sequence at the top level reads as a tuple.
pub fn parse(s: &str) -> Option<Literal> {
    let mut reader = Reader {
        chars: s.chars().peekable(),
        depth: 0,
    };
    let first = reader.value()?;

    reader.skip_whitespace();
    let literal = if reader.eat(',') {
        let mut items = vec![first];
        items.extend(reader.items(None)?);
        Literal::Tuple(items)
    } else {
        first
    };

    reader.skip_whitespace();
    reader.chars.peek().is_none().then_some(literal)
}

struct Reader<'a> {
    chars: Peekable<Chars<'a>>,
    depth: usize,
}

impl Reader<'_> {
    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
    }

    fn eat(&mut self, expected: char) -> bool {
        self.chars.next_if_eq(&expected).is_some()
    }

    fn value(&mut self) -> Option<Literal> {
        self.skip_whitespace();
        match *self.chars.peek()? {
            '[' => {
                self.chars.next();
                self.nested(|reader| Some(Literal::List(reader.items(Some(']'))?)))
            }
            '(' => {
                self.chars.next();
                self.nested(Self::parenthesized)
            }
            '{' => {
                self.chars.next();
                self.nested(Self::braced)
            }
            '\'' | '"' => self.string(),
            c if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.number(),
            c if c.is_alphabetic() => self.keyword(),
            _ => None,
        }
    }

    /// Reads comma-separated values up to `close`, or to the end of input when
    /// `close` is `None`. A trailing comma is allowed.
    fn items(&mut self, close: Option<char>) -> Option<Vec<Literal>> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match (self.chars.peek().copied(), close) {
                (Some(c), Some(close)) if c == close => {
                    self.chars.next();
                    return Some(items);
                }
                (None, None) => return Some(items),
                (None, Some(_)) => return None,
                _ => {}
            }

            items.push(self.value()?);
            self.skip_whitespace();
            if !self.eat(',') {
                return match close {
                    Some(close) => self.eat(close).then_some(items),
                    None => self.chars.peek().is_none().then_some(items),
                };
            }
        }
    }

    /// Reads the inside of a container, failing once nesting gets too deep.
    fn nested(&mut self, read: impl FnOnce(&mut Self) -> Option<Literal>) -> Option<Literal> {
        if self.depth >= MAX_DEPTH {
            return None;
        }
        self.depth += 1;
        let literal = read(self);
        self.depth -= 1;
        literal
    }

    /// `()` is an empty tuple, `(x)` is just `x`, and `(x,)` is a tuple.
    fn parenthesized(&mut self) -> Option<Literal> {
        self.skip_whitespace();
        if self.eat(')') {
            return Some(Literal::Tuple(Vec::new()));
        }

        let first = self.value()?;
        self.skip_whitespace();
        if self.eat(')') {
            return Some(first);
        }
        if !self.eat(',') {
            return None;
        }
        let mut items = vec![first];
        items.extend(self.items(Some(')'))?);
        Some(Literal::Tuple(items))
    }

    /// `{}` is an empty dict, `{k: v, ..}` a dict and `{x, ..}` a set.
    fn braced(&mut self) -> Option<Literal> {
        self.skip_whitespace();
        if self.eat('}') {
            return Some(Literal::Dict(Vec::new()));
        }

        let first = self.value()?;
        self.skip_whitespace();
        if !self.eat(':') {
            let mut items = vec![first];
            if self.eat(',') {
                items.extend(self.items(Some('}'))?);
            } else if !self.eat('}') {
                return None;
            }
            return Some(Literal::Set(items));
        }

        let mut entries = vec![(first, self.value()?)];
        loop {
            self.skip_whitespace();
            if self.eat('}') {
                return Some(Literal::Dict(entries));
            }
            if !self.eat(',') {
                return None;
            }
            self.skip_whitespace();
            if self.eat('}') {
                return Some(Literal::Dict(entries));
            }
            let key = self.value()?;
            self.skip_whitespace();
            if !self.eat(':') {
                return None;
            }
            entries.push((key, self.value()?));
        }
    }

    fn string(&mut self) -> Option<Literal> {
        let mut out = String::new();
        // Adjacent string literals concatenate.
        while let Some(quote) = self.chars.next_if(|&c| c == '\'' || c == '"') {
            loop {
                match self.chars.next()? {
                    c if c == quote => break,
                    '\\' => match self.chars.next()? {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        c @ ('\\' | '\'' | '"') => out.push(c),
                        c => {
                            out.push('\\');
                            out.push(c);
                        }
                    },
                    c => out.push(c),
                }
            }
            self.skip_whitespace();
        }
        Some(Literal::Str(out))
    }

    fn number(&mut self) -> Option<Literal> {
        let mut text = String::new();
        if let Some(sign) = self.chars.next_if(|&c| c == '-' || c == '+') {
            text.push(sign);
            self.skip_whitespace();
        }
        while let Some(c) = self
            .chars
            .next_if(|&c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
        {
            text.push(c);
        }
        // Exponent signs, as in `1e-5`.
        if text.ends_with(['e', 'E']) {
            if let Some(sign) = self.chars.next_if(|&c| c == '-' || c == '+') {
                text.push(sign);
                while let Some(c) = self.chars.next_if(char::is_ascii_digit) {
                    text.push(c);
                }
            }
        }

        let negative = text.starts_with('-');
        let digits = text.trim_start_matches(['-', '+']).replace('_', "");
        if !digits.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
            return None;
        }

        if digits.bytes().all(|b| b.is_ascii_digit()) {
            let int = digits.trim_start_matches('0');
            // Leading zeros are only allowed on zero itself.
            if int.len() != digits.len() && !int.is_empty() {
                return None;
            }
            let int = if int.is_empty() { "0" } else { int };
            let sign = if negative && int != "0" { "-" } else { "" };
            return Some(Literal::Number(format!("{}{}", sign, int)));
        }

        let value = digits.parse::<f64>().ok()?;
        Some(Literal::Number(format_float(if negative { -value } else { value })))
    }

    fn keyword(&mut self) -> Option<Literal> {
        let mut word = String::new();
        while let Some(c) = self.chars.next_if(|&c| c.is_alphanumeric() || c == '_') {
            word.push(c);
        }
        match word.as_str() {
            "True" => Some(Literal::Bool(true)),
            "False" => Some(Literal::Bool(false)),
            "None" => Some(Literal::None),
            _ => None,
        }
    }
}

/// Formats a float the way it reads back as a literal: `100000.0`, `1e-05`, `1e+16`.
fn format_float(value: f64) -> String {
    let text = format!("{:?}", value);
    let Some((mantissa, exponent)) = text.split_once('e') else {
        return text;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{}e{}{:0>2}", mantissa, sign, digits)
}
