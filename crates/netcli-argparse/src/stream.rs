//! Cursor over raw argument tokens.

/// A forward-only cursor over the tokens being parsed. Commands share one
/// stream with their parent, so a nested parse continues where the parent
/// stopped.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    tokens: Vec<&'a str>,
    index: usize,
}

impl<'a> TokenStream<'a> {
    pub fn new<S: AsRef<str>>(tokens: &'a [S]) -> Self {
        Self {
            tokens: tokens.iter().map(AsRef::as_ref).collect(),
            index: 0,
        }
    }

    /// Return the next token and advance past it.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&'a str> {
        let token = self.peek()?;
        self.index += 1;
        Some(token)
    }

    pub fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.index).copied()
    }

    pub fn has_next(&self) -> bool {
        self.index < self.tokens.len()
    }

    /// Whether the next token can be consumed as an option's argument.
    pub fn has_next_value(&self) -> bool {
        self.peek().is_some_and(is_value_shaped)
    }

    /// Return the next token only if it is value-shaped.
    pub fn next_value(&mut self) -> Option<&'a str> {
        if self.has_next_value() {
            self.next()
        } else {
            None
        }
    }

    /// Number of tokens not yet consumed.
    pub fn remaining(&self) -> usize {
        self.tokens.len() - self.index
    }
}

/// A token is value-shaped unless it starts with `-`, is longer than one
/// character, and its second character is not an ASCII digit. So `-`, `-5`
/// and `-1.5` are values while `-x`, `--x` and `--` are not.
pub fn is_value_shaped(token: &str) -> bool {
    let bytes = token.as_bytes();
    match bytes {
        [b'-', second, ..] => second.is_ascii_digit(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_shape_predicate() {
        for value in ["foo", "-", "-5", "-0.5", "", "5", "a-b"] {
            assert!(is_value_shaped(value), "{value:?} should be a value");
        }
        for flag in ["-x", "--", "--name", "-.5", "-abc"] {
            assert!(!is_value_shaped(flag), "{flag:?} should not be a value");
        }
    }

    #[test]
    fn cursor_advances_and_peeks() {
        let args = ["a", "-b", "c"];
        let mut stream = TokenStream::new(&args);
        assert_eq!(stream.remaining(), 3);
        assert_eq!(stream.peek(), Some("a"));
        assert!(stream.has_next_value());
        assert_eq!(stream.next(), Some("a"));

        assert!(stream.has_next());
        assert!(!stream.has_next_value());
        assert_eq!(stream.next_value(), None);
        assert_eq!(stream.next(), Some("-b"));

        assert_eq!(stream.next_value(), Some("c"));
        assert!(!stream.has_next());
        assert!(!stream.has_next_value());
        assert_eq!(stream.next(), None);
    }

    #[test]
    fn accepts_owned_strings() {
        let args = vec!["x".to_string()];
        let mut stream = TokenStream::new(&args);
        assert_eq!(stream.next(), Some("x"));
    }
}
