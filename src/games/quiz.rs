//! General-knowledge quiz with a fixed ten-question bank.

use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub prompt: &'static str,
    pub options: [&'static str; 4],
    pub correct: usize,
}

impl Question {
    pub fn answer(&self) -> &'static str {
        self.options[self.correct]
    }
}

pub const BANK: [Question; 10] = [
    Question {
        prompt: "How long is mandatory service in the ROK Army?",
        options: ["18 months", "21 months", "24 months", "30 months"],
        correct: 0,
    },
    Question {
        prompt: "What is the 'PX' on a military base?",
        options: ["Mess hall", "Store / shop", "Training ground", "Medical office"],
        correct: 1,
    },
    Question {
        prompt: "What is the capital of South Korea?",
        options: ["Busan", "Seoul", "Daegu", "Incheon"],
        correct: 1,
    },
    Question {
        prompt: "Which is the largest planet in the solar system?",
        options: ["Saturn", "Jupiter", "Neptune", "Uranus"],
        correct: 1,
    },
    Question {
        prompt: "Which is a traditional Korean martial art?",
        options: ["Karate", "Taekwondo", "Judo", "Boxing"],
        correct: 1,
    },
    Question {
        prompt: "When is the evening roll call usually held?",
        options: ["21:00", "22:00", "23:00", "24:00"],
        correct: 1,
    },
    Question {
        prompt: "What does CPU stand for?",
        options: [
            "Central Processing Unit",
            "Computer Program Unit",
            "Central Program Unit",
            "Computer Processing Unit",
        ],
        correct: 0,
    },
    Question {
        prompt: "What is the national flower of South Korea?",
        options: ["Rose", "Rose of Sharon", "Cherry blossom", "Azalea"],
        correct: 1,
    },
    Question {
        prompt: "What is the highest mountain in the world?",
        options: ["K2", "Everest", "Kilimanjaro", "Fuji"],
        correct: 1,
    },
    Question {
        prompt: "What does the company administration office handle?",
        options: ["Guard duty", "Kitchen duty", "Unit administration", "Vehicle maintenance"],
        correct: 2,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Grade {
    KeepStudying,
    Fair,
    Good,
    Excellent,
    Top,
}

impl Grade {
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            90.. => Grade::Top,
            80..=89 => Grade::Excellent,
            70..=79 => Grade::Good,
            60..=69 => Grade::Fair,
            _ => Grade::KeepStudying,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Grade::Top => "🏆 Top marks",
            Grade::Excellent => "🥇 Excellent",
            Grade::Good => "🥈 Good",
            Grade::Fair => "🥉 Fair",
            Grade::KeepStudying => "📚 Keep studying",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answered {
    pub correct: bool,
    pub answer: &'static str,
}

#[derive(Debug, Clone)]
pub struct Quiz {
    questions: Vec<Question>,
    index: usize,
    score: u32,
}

impl Quiz {
    /// The full bank in random order.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut questions = BANK.to_vec();
        questions.shuffle(rng);
        Quiz::from_questions(questions)
    }

    pub fn from_questions(questions: Vec<Question>) -> Self {
        Quiz { questions, index: 0, score: 0 }
    }

    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    /// 1-based position of the current question.
    pub fn position(&self) -> usize {
        self.index + 1
    }

    /// Answer the current question by option index; out-of-range choices are wrong.
    /// Returns `None` once the quiz is finished.
    pub fn answer(&mut self, choice: usize) -> Option<Answered> {
        let question = *self.current()?;
        let correct = choice == question.correct;
        if correct {
            self.score += 1;
        }
        self.index += 1;
        Some(Answered { correct, answer: question.answer() })
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.questions.len()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total(&self) -> u32 {
        self.questions.len() as u32
    }

    pub fn percent(&self) -> u8 {
        if self.questions.is_empty() {
            return 0;
        }
        ((self.score as f64 / self.questions.len() as f64) * 100.0).round() as u8
    }

    pub fn grade(&self) -> Grade {
        Grade::from_percent(self.percent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn grade_thresholds() {
        assert_eq!(Grade::from_percent(100), Grade::Top);
        assert_eq!(Grade::from_percent(90), Grade::Top);
        assert_eq!(Grade::from_percent(89), Grade::Excellent);
        assert_eq!(Grade::from_percent(70), Grade::Good);
        assert_eq!(Grade::from_percent(60), Grade::Fair);
        assert_eq!(Grade::from_percent(59), Grade::KeepStudying);
    }

    #[test]
    fn full_run_scores_and_grades() {
        let mut quiz = Quiz::from_questions(BANK.to_vec());
        for i in 0..BANK.len() {
            let q = *quiz.current().unwrap();
            // Miss the last two.
            let pick = if i < 8 { q.correct } else { (q.correct + 1) % 4 };
            let answered = quiz.answer(pick).unwrap();
            assert_eq!(answered.correct, i < 8);
            assert_eq!(answered.answer, q.answer());
        }
        assert!(quiz.is_finished());
        assert!(quiz.answer(0).is_none());
        assert_eq!((quiz.score(), quiz.total(), quiz.percent()), (8, 10, 80));
        assert_eq!(quiz.grade(), Grade::Excellent);
    }

    #[test]
    fn shuffle_keeps_the_bank() {
        let quiz = Quiz::new(&mut StdRng::seed_from_u64(11));
        let mut prompts: Vec<_> = quiz.questions.iter().map(|q| q.prompt).collect();
        let mut bank: Vec<_> = BANK.iter().map(|q| q.prompt).collect();
        prompts.sort_unstable();
        bank.sort_unstable();
        assert_eq!(prompts, bank);
    }

    #[test]
    fn out_of_range_choice_is_wrong() {
        let mut quiz = Quiz::from_questions(vec![BANK[0]]);
        assert!(!quiz.answer(9).unwrap().correct);
        assert_eq!(quiz.grade(), Grade::KeepStudying);
    }
}
