use std::collections::HashSet;

use serde::{Serialize, Deserialize};

use crate::{CodecError, Result};

/// Number of symbols in the default alphabet: printable ASCII plus CR and LF.
pub const DEFAULT_ALPHABET_SIZE: usize = 97;

/// The closed set of symbols a table can code.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Default for Alphabet {
    /// Printable ASCII (32 to 126) followed by `'\r'` and `'\n'`.
    fn default() -> Self {
        let mut symbols: Vec<char> = (32u8..=126).map(char::from).collect();
        symbols.push('\r');
        symbols.push('\n');
        Self { symbols }
    }
}

impl Alphabet {
    pub fn new<I: IntoIterator<Item = char>>(symbols: I) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut list = Vec::new();
        for symbol in symbols {
            if !seen.insert(symbol) {
                return Err(CodecError::DuplicateSymbol(symbol));
            }
            list.push(symbol);
        }
        Ok(Self { symbols: list })
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.symbols.contains(&symbol)
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Fails on the first symbol of `text` outside the alphabet.
    pub fn check(&self, text: &str) -> Result<()> {
        match text.chars().find(|&c| !self.contains(c)) {
            Some(c) => Err(CodecError::OutOfAlphabet(c)),
            None => Ok(()),
        }
    }
}
