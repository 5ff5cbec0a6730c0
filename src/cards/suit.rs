use std::fmt::{Display, Formatter, Result};

/// One of the 4 card suits, indexed 0-3 so `rank*4+suit` gives a 0-51 card index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suit {
    Club = 0,
    Diamond = 1,
    Heart = 2,
    Spade = 3,
}

impl From<u8> for Suit {
    fn from(n: u8) -> Suit {
        match n % 4 {
            0 => Suit::Club,
            1 => Suit::Diamond,
            2 => Suit::Heart,
            3 => Suit::Spade,
            _ => unreachable!(),
        }
    }
}

impl Display for Suit {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let c = match self {
            Suit::Club => "♣",
            Suit::Diamond => "♦",
            Suit::Heart => "♥",
            Suit::Spade => "♠",
        };
        write!(f, "{}", c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_through_u8() {
        for n in 0..4u8 {
            assert_eq!(Suit::from(n) as u8, n);
        }
    }
}
