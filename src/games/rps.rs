//! Rock-paper-scissors against a random hand.

use rand::Rng;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

pub const HISTORY_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hand {
    Rock,
    Paper,
    Scissors,
}

impl Hand {
    pub const ALL: [Hand; 3] = [Hand::Rock, Hand::Paper, Hand::Scissors];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Hand::ALL[rng.gen_range(0..Hand::ALL.len())]
    }

    pub fn beats(self, other: Hand) -> bool {
        matches!(
            (self, other),
            (Hand::Rock, Hand::Scissors) | (Hand::Paper, Hand::Rock) | (Hand::Scissors, Hand::Paper)
        )
    }

    pub fn against(self, other: Hand) -> Outcome {
        if self == other {
            Outcome::Draw
        } else if self.beats(other) {
            Outcome::Win
        } else {
            Outcome::Lose
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Hand::Rock => "rock",
            Hand::Paper => "paper",
            Hand::Scissors => "scissors",
        })
    }
}

impl FromStr for Hand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "r" | "rock" => Ok(Hand::Rock),
            "p" | "paper" => Ok(Hand::Paper),
            "s" | "scissors" => Ok(Hand::Scissors),
            other => Err(format!("unknown hand '{other}' (expected rock, paper or scissors)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Lose,
    Draw,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Win => "win",
            Outcome::Lose => "lose",
            Outcome::Draw => "draw",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Round {
    pub player: Hand,
    pub computer: Hand,
    pub outcome: Outcome,
}

/// A session: current win streak and the most recent rounds, newest first.
#[derive(Debug, Clone, Default)]
pub struct RpsSession {
    streak: u32,
    history: VecDeque<Round>,
}

impl RpsSession {
    pub fn play<R: Rng + ?Sized>(&mut self, player: Hand, rng: &mut R) -> Round {
        self.record(player, Hand::random(rng))
    }

    /// Draws leave the streak alone; losses reset it.
    pub fn record(&mut self, player: Hand, computer: Hand) -> Round {
        let outcome = player.against(computer);
        match outcome {
            Outcome::Win => self.streak += 1,
            Outcome::Lose => self.streak = 0,
            Outcome::Draw => {}
        }
        let round = Round { player, computer, outcome };
        self.history.push_front(round);
        self.history.truncate(HISTORY_LEN);
        round
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn history(&self) -> impl Iterator<Item = &Round> {
        self.history.iter()
    }
}
