//! Number baseball: guess three distinct digits, scored in strikes and balls.

use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use tracing::debug;

pub const DIGITS: usize = 3;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BaseballError {
    #[error("enter exactly 3 digits (got {0} characters)")]
    WrongLength(usize),
    #[error("only digits 0-9 are allowed")]
    NotDigits,
    #[error("digits must all be different")]
    RepeatedDigit,
    #[error("this round is already solved")]
    AlreadySolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub strikes: u8,
    pub balls: u8,
}

impl Score {
    pub fn is_solved(self) -> bool {
        self.strikes as usize == DIGITS
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}S {}B", self.strikes, self.balls)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub number: u32,
    pub guess: [u8; DIGITS],
    pub score: Score,
}

impl fmt::Display for Attempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {} -> {}", self.number, digits_to_string(&self.guess), self.score)
    }
}

/// Parse user input into three distinct digits.
pub fn parse_guess(input: &str) -> Result<[u8; DIGITS], BaseballError> {
    let input = input.trim();
    let count = input.chars().count();
    if count != DIGITS {
        return Err(BaseballError::WrongLength(count));
    }
    let mut out = [0u8; DIGITS];
    for (slot, ch) in out.iter_mut().zip(input.chars()) {
        *slot = ch.to_digit(10).ok_or(BaseballError::NotDigits)? as u8;
    }
    if out[0] == out[1] || out[0] == out[2] || out[1] == out[2] {
        return Err(BaseballError::RepeatedDigit);
    }
    Ok(out)
}

/// Strikes are right digit in the right place; balls are right digit elsewhere.
pub fn score(secret: &[u8; DIGITS], guess: &[u8; DIGITS]) -> Score {
    let mut result = Score::default();
    for (i, digit) in guess.iter().enumerate() {
        if secret[i] == *digit {
            result.strikes += 1;
        } else if secret.contains(digit) {
            result.balls += 1;
        }
    }
    result
}

fn digits_to_string(digits: &[u8; DIGITS]) -> String {
    digits.iter().map(|d| char::from(b'0' + d)).collect()
}

#[derive(Debug, Clone)]
pub struct Baseball {
    secret: [u8; DIGITS],
    history: Vec<Attempt>,
    solved: bool,
}

impl Baseball {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut pool: Vec<u8> = (0..10).collect();
        pool.shuffle(rng);
        Baseball { secret: [pool[0], pool[1], pool[2]], history: Vec::new(), solved: false }
    }

    pub fn with_secret(secret: &str) -> Result<Self, BaseballError> {
        Ok(Baseball { secret: parse_guess(secret)?, history: Vec::new(), solved: false })
    }

    /// Score a guess. Invalid input does not count as an attempt.
    pub fn guess(&mut self, input: &str) -> Result<Score, BaseballError> {
        if self.solved {
            return Err(BaseballError::AlreadySolved);
        }
        let guess = parse_guess(input)?;
        let result = score(&self.secret, &guess);
        self.history.push(Attempt { number: self.attempts() + 1, guess, score: result });
        if result.is_solved() {
            self.solved = true;
            debug!(attempts = self.attempts(), "baseball solved");
        }
        Ok(result)
    }

    pub fn attempts(&self) -> u32 {
        self.history.len() as u32
    }

    pub fn history(&self) -> &[Attempt] {
        &self.history
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub fn secret(&self) -> String {
        digits_to_string(&self.secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn validation() {
        assert_eq!(parse_guess("12"), Err(BaseballError::WrongLength(2)));
        assert_eq!(parse_guess("1234"), Err(BaseballError::WrongLength(4)));
        assert_eq!(parse_guess("1a3"), Err(BaseballError::NotDigits));
        assert_eq!(parse_guess("112"), Err(BaseballError::RepeatedDigit));
        assert_eq!(parse_guess(" 012 "), Ok([0, 1, 2]));
    }

    #[test]
    fn strikes_and_balls() {
        let secret = [1, 2, 3];
        assert_eq!(score(&secret, &[1, 2, 3]), Score { strikes: 3, balls: 0 });
        assert_eq!(score(&secret, &[3, 1, 2]), Score { strikes: 0, balls: 3 });
        assert_eq!(score(&secret, &[1, 3, 9]), Score { strikes: 1, balls: 1 });
        assert_eq!(score(&secret, &[4, 5, 6]), Score::default());
        assert_eq!(Score { strikes: 1, balls: 2 }.to_string(), "1S 2B");
    }

    #[test]
    fn round_tracks_attempts() {
        let mut game = Baseball::with_secret("482").unwrap();
        assert_eq!(game.guess("123").unwrap(), Score { strikes: 0, balls: 1 });
        assert!(game.guess("11").is_err());
        assert_eq!(game.attempts(), 1);
        assert!(game.guess("482").unwrap().is_solved());
        assert!(game.is_solved());
        assert_eq!(game.attempts(), 2);
        assert_eq!(game.history()[1].to_string(), "2. 482 -> 3S 0B");
        assert_eq!(game.guess("123"), Err(BaseballError::AlreadySolved));
    }

    #[test]
    fn random_secret_is_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let game = Baseball::new(&mut rng);
            assert!(parse_guess(&game.secret()).is_ok());
        }
    }
}
