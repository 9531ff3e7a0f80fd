//! Colour expression parsing.
//!
//! Supports:
//! - `#336699` - hex literal (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`)
//! - `$accent` - reference to a variable, palette entry, or colors key
//! - `tomato` - bare word: a variable if one exists, else a CSS colour name
//! - `0.5`, `50%` - numeric arguments
//! - `fade($accent, 0.4)` - function call, arguments may nest

use std::fmt;

use super::functions::ColourFn;
use super::Colour;

/// A parsed colour expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A hex literal, kept as written: `#FF0000`
    Hex(String),
    /// A reference to another name: `$gold`
    Reference(String),
    /// A bare word: `tomato`
    Word(String),
    /// A plain number (used as argument): `0.5`
    Number(f32),
    /// A percentage value (used as argument): `20%`
    Percent(f32),
    /// A function call: `fade($gold, 0.2)`
    Call { func: ColourFn, args: Vec<Expr> },
}

/// Error produced while parsing an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprError {
    pub message: String,
    pub help: Option<String>,
}

impl ExprError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            help: None,
        }
    }

    fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ExprError {}

impl Expr {
    /// Parse a colour expression from a string.
    pub fn parse(input: &str) -> Result<Self, ExprError> {
        let input = input.trim();

        if input.is_empty() {
            return Err(ExprError::new("empty colour expression"));
        }

        if input.starts_with('#') {
            return Colour::from_hex(input)
                .map(|_| Expr::Hex(input.to_string()))
                .map_err(|e| ExprError::new(e.to_string()));
        }

        if let Some(name) = input.strip_prefix('$') {
            if !is_name(name) {
                return Err(ExprError::new(format!("invalid reference: {}", input))
                    .with_help("Names may contain letters, digits, '_', '-' and '.'"));
            }
            return Ok(Expr::Reference(name.to_string()));
        }

        if let Some(num_str) = input.strip_suffix('%') {
            let value: f32 = num_str.trim().parse().map_err(|_| {
                ExprError::new(format!("invalid percentage: {}", input))
                    .with_help("Use format like 20% or 50.5%")
            })?;
            return Ok(Expr::Percent(value));
        }

        if input.starts_with(|c: char| c.is_ascii_digit() || c == '.' || c == '-') {
            return input
                .parse::<f32>()
                .map(Expr::Number)
                .map_err(|_| ExprError::new(format!("invalid number: {}", input)));
        }

        if let Some(paren_pos) = input.find('(') {
            if !input.ends_with(')') {
                return Err(ExprError::new(format!("unclosed function call: {}", input))
                    .with_help("Add closing parenthesis"));
            }

            let name = input[..paren_pos].trim();
            let func: ColourFn = name.parse().map_err(|_| {
                let known: Vec<&str> = ColourFn::ALL.iter().map(|f| f.name()).collect();
                ExprError::new(format!("unknown colour function: {}", name))
                    .with_help(format!("Available functions: {}", known.join(", ")))
            })?;
            let args = parse_args(&input[paren_pos + 1..input.len() - 1])?;

            return Ok(Expr::Call { func, args });
        }

        if input.starts_with(|c: char| c.is_ascii_alphabetic()) && is_name(input) {
            return Ok(Expr::Word(input.to_string()));
        }

        Err(ExprError::new(format!("invalid colour expression: {}", input))
            .with_help("Use a hex colour, a $reference, a colour name, or a function call"))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Hex(hex) => f.write_str(hex),
            Expr::Reference(name) => write!(f, "${}", name),
            Expr::Word(word) => f.write_str(word),
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Percent(p) => write!(f, "{}%", p),
            Expr::Call { func, args } => {
                write!(f, "{}(", func)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Whether `s` is a valid variable/palette/key name.
pub(crate) fn is_name(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Parse comma-separated arguments, handling nested parentheses.
fn parse_args(input: &str) -> Result<Vec<Expr>, ExprError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(vec![]);
    }

    let mut args = Vec::new();
    let mut current = String::new();
    let mut paren_depth = 0usize;

    for c in input.chars() {
        match c {
            '(' => {
                paren_depth += 1;
                current.push(c);
            }
            ')' => {
                paren_depth = paren_depth.checked_sub(1).ok_or_else(|| {
                    ExprError::new(format!("unbalanced parentheses in: {}", input))
                })?;
                current.push(c);
            }
            ',' if paren_depth == 0 => {
                args.push(Expr::parse(&current)?);
                current.clear();
            }
            _ => current.push(c),
        }
    }

    if paren_depth != 0 {
        return Err(ExprError::new(format!("unbalanced parentheses in: {}", input)));
    }

    args.push(Expr::parse(&current)?);
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        let expr = Expr::parse("#FF0000").unwrap();
        assert_eq!(expr, Expr::Hex("#FF0000".to_string()));
    }

    #[test]
    fn test_parse_bad_hex() {
        assert!(Expr::parse("#FF00").is_ok());
        assert!(Expr::parse("#FF000").is_err());
    }

    #[test]
    fn test_parse_reference() {
        let expr = Expr::parse("$editor.background").unwrap();
        assert_eq!(expr, Expr::Reference("editor.background".to_string()));
        assert!(Expr::parse("$").is_err());
    }

    #[test]
    fn test_parse_word() {
        assert_eq!(Expr::parse("tomato").unwrap(), Expr::Word("tomato".to_string()));
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(Expr::parse("0.4").unwrap(), Expr::Number(0.4));
        assert_eq!(Expr::parse("50.5%").unwrap(), Expr::Percent(50.5));
        assert!(Expr::parse("1.2.3").is_err());
    }

    #[test]
    fn test_parse_nested_function() {
        let expr = Expr::parse("fade(named(tomato), 0.4)").unwrap();
        assert_eq!(
            expr,
            Expr::Call {
                func: ColourFn::Fade,
                args: vec![
                    Expr::Call {
                        func: ColourFn::Named,
                        args: vec![Expr::Word("tomato".to_string())],
                    },
                    Expr::Number(0.4),
                ],
            }
        );
    }

    #[test]
    fn test_parse_unknown_function() {
        let err = Expr::parse("tint($a, 20%)").unwrap_err();
        assert!(err.message.contains("tint"));
        assert!(err.help.unwrap().contains("fade"));
    }

    #[test]
    fn test_parse_unclosed() {
        assert!(Expr::parse("fade($a, 0.5").is_err());
        assert!(Expr::parse("fade($a), 0.5)").is_err());
        assert!(Expr::parse("fade($a,)").is_err());
    }

    #[test]
    fn test_display_round_trips() {
        let source = "mix($a, hsl(210, 50%, 40%), 0.25)";
        let expr = Expr::parse(source).unwrap();
        assert_eq!(expr.to_string(), source);
    }
}
