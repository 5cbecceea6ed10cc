//! Speed arithmetic: answer as many problems as possible in thirty seconds.

use rand::Rng;
use std::fmt;
use std::time::{Duration, Instant};

pub const ROUND: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "x",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Problem {
    pub a: u32,
    pub op: Op,
    pub b: u32,
}

impl Problem {
    /// Sums of two-digit numbers, positive differences from 50..=99, or times tables up to 12.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.gen_range(0..3) {
            0 => Problem { a: rng.gen_range(10..=99), op: Op::Add, b: rng.gen_range(10..=99) },
            1 => {
                let a = rng.gen_range(50..=99);
                Problem { a, op: Op::Sub, b: rng.gen_range(10..a) }
            }
            _ => Problem { a: rng.gen_range(2..=12), op: Op::Mul, b: rng.gen_range(2..=12) },
        }
    }

    pub fn answer(&self) -> i64 {
        let (a, b) = (i64::from(self.a), i64::from(self.b));
        match self.op {
            Op::Add => a + b,
            Op::Sub => a - b,
            Op::Mul => a * b,
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} = ?", self.a, self.op, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submit {
    /// Scored; a new problem is up.
    Correct,
    /// Same problem stays up.
    Wrong,
    TimeUp,
}

/// One timed round. Time is passed in so rounds can be driven by any clock.
#[derive(Debug, Clone)]
pub struct SpeedRound {
    deadline: Instant,
    problem: Problem,
    score: u32,
}

impl SpeedRound {
    pub fn start<R: Rng + ?Sized>(now: Instant, rng: &mut R) -> Self {
        SpeedRound { deadline: now + ROUND, problem: Problem::random(rng), score: 0 }
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    pub fn is_over(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    pub fn submit<R: Rng + ?Sized>(&mut self, answer: i64, now: Instant, rng: &mut R) -> Submit {
        if self.is_over(now) {
            return Submit::TimeUp;
        }
        if answer != self.problem.answer() {
            return Submit::Wrong;
        }
        self.score += 1;
        self.problem = Problem::random(rng);
        Submit::Correct
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn problems_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let p = Problem::random(&mut rng);
            match p.op {
                Op::Add => assert!((10..=99).contains(&p.a) && (10..=99).contains(&p.b)),
                Op::Sub => {
                    assert!((50..=99).contains(&p.a));
                    assert!(p.b >= 10 && p.b < p.a);
                    assert!(p.answer() > 0);
                }
                Op::Mul => assert!((2..=12).contains(&p.a) && (2..=12).contains(&p.b)),
            }
        }
    }

    #[test]
    fn display_and_answer() {
        let p = Problem { a: 7, op: Op::Mul, b: 8 };
        assert_eq!(p.to_string(), "7 x 8 = ?");
        assert_eq!(p.answer(), 56);
    }

    #[test]
    fn round_scoring_and_timeout() {
        let mut rng = StdRng::seed_from_u64(1);
        let t0 = Instant::now();
        let mut round = SpeedRound::start(t0, &mut rng);
        let right = round.problem().answer();
        assert_eq!(round.submit(right + 1, t0, &mut rng), Submit::Wrong);
        assert_eq!(round.submit(right, t0 + Duration::from_secs(5), &mut rng), Submit::Correct);
        assert_eq!(round.score(), 1);
        assert_eq!(round.remaining(t0 + Duration::from_secs(10)), Duration::from_secs(20));
        let late = t0 + ROUND;
        assert!(round.is_over(late));
        let answer = round.problem().answer();
        assert_eq!(round.submit(answer, late, &mut rng), Submit::TimeUp);
        assert_eq!(round.score(), 1);
        assert_eq!(round.remaining(late + Duration::from_secs(1)), Duration::ZERO);
    }
}
