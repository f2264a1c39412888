// src/encoder.rs - Character to Morse symbol lookup
use std::fmt;

/// One Morse pulse primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Dot,
    Dash,
}

impl Symbol {
    pub fn as_char(self) -> char {
        match self {
            Symbol::Dot => '.',
            Symbol::Dash => '-',
        }
    }
}

/// Ordered dot/dash sequence for a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MorseCode(&'static [Symbol]);

impl MorseCode {
    pub fn symbols(&self) -> &'static [Symbol] {
        self.0
    }
}

impl fmt::Display for MorseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in self.0 {
            write!(f, "{}", symbol.as_char())?;
        }
        Ok(())
    }
}

/// Result of looking a character up in the symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Code(MorseCode),
    WordBoundary,
    Unsupported,
}

/// The only character treated as a word separator.
pub const WORD_SEPARATOR: char = ' ';

use Symbol::{Dash, Dot};

// Indexed by letter offset from 'A'.
const LETTERS: [&[Symbol]; 26] = [
    &[Dot, Dash],             // A
    &[Dash, Dot, Dot, Dot],   // B
    &[Dash, Dot, Dash, Dot],  // C
    &[Dash, Dot, Dot],        // D
    &[Dot],                   // E
    &[Dot, Dot, Dash, Dot],   // F
    &[Dash, Dash, Dot],       // G
    &[Dot, Dot, Dot, Dot],    // H
    &[Dot, Dot],              // I
    &[Dot, Dash, Dash, Dash], // J
    &[Dash, Dot, Dash],       // K
    &[Dot, Dash, Dot, Dot],   // L
    &[Dash, Dash],            // M
    &[Dash, Dot],             // N
    &[Dash, Dash, Dash],      // O
    &[Dot, Dash, Dash, Dot],  // P
    &[Dash, Dash, Dot, Dash], // Q
    &[Dot, Dash, Dot],        // R
    &[Dot, Dot, Dot],         // S
    &[Dash],                  // T
    &[Dot, Dot, Dash],        // U
    &[Dot, Dot, Dot, Dash],   // V
    &[Dot, Dash, Dash],       // W
    &[Dash, Dot, Dot, Dash],  // X
    &[Dash, Dot, Dash, Dash], // Y
    &[Dash, Dash, Dot, Dot],  // Z
];

// Indexed by digit value.
const DIGITS: [&[Symbol]; 10] = [
    &[Dash, Dash, Dash, Dash, Dash],
    &[Dot, Dash, Dash, Dash, Dash],
    &[Dot, Dot, Dash, Dash, Dash],
    &[Dot, Dot, Dot, Dash, Dash],
    &[Dot, Dot, Dot, Dot, Dash],
    &[Dot, Dot, Dot, Dot, Dot],
    &[Dash, Dot, Dot, Dot, Dot],
    &[Dash, Dash, Dot, Dot, Dot],
    &[Dash, Dash, Dash, Dot, Dot],
    &[Dash, Dash, Dash, Dash, Dot],
];

/// Look up a character. Case-insensitive; never fails.
pub fn encode(character: char) -> Encoding {
    let upper = character.to_ascii_uppercase();
    match upper {
        WORD_SEPARATOR => Encoding::WordBoundary,
        'A'..='Z' => Encoding::Code(MorseCode(LETTERS[(upper as u8 - b'A') as usize])),
        '0'..='9' => Encoding::Code(MorseCode(DIGITS[(upper as u8 - b'0') as usize])),
        _ => Encoding::Unsupported,
    }
}

/// Every character with a dot/dash code, in table order.
pub fn supported_characters() -> impl Iterator<Item = char> {
    ('A'..='Z').chain('0'..='9')
}

/// Render a message the way it is printed during transmission: one code per
/// encoded character, each followed by a space.
pub fn transcript(message: &str) -> String {
    let mut out = String::new();
    for c in message.chars() {
        if let Encoding::Code(code) = encode(c) {
            out.push_str(&code.to_string());
            out.push(' ');
        }
    }
    out
}
