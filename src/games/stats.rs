//! Persistent per-game counters, the dashboard summary and achievement badges.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use super::rps::Outcome;
use crate::store::{keys, Store, StoreError};

pub const MINUTES_PER_GAME: f64 = 3.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BaseballStats {
    pub played: u32,
    pub won: u32,
    /// Fewest attempts in a won round, 0 when none won yet.
    pub best_score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RpsStats {
    pub played: u32,
    pub won: u32,
    pub streak: u32,
    pub max_streak: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuizStats {
    pub played: u32,
    pub correct: u32,
    pub total_questions: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemoryStats {
    pub played: u32,
    pub won: u32,
    /// Fastest clear in seconds, 0 when none yet.
    pub best_time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArithmeticStats {
    pub played: u32,
    pub best_score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameStats {
    pub baseball: BaseballStats,
    pub rps: RpsStats,
    pub quiz: QuizStats,
    pub memory: MemoryStats,
    #[serde(rename = "calculator")]
    pub arithmetic: ArithmeticStats,
}

/// Keep the smaller non-zero value; 0 means "no record".
fn lower_record(current: u32, candidate: u32) -> u32 {
    if current == 0 || candidate < current {
        candidate
    } else {
        current
    }
}

fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        0
    } else {
        ((part as f64 / whole as f64) * 100.0).round() as u32
    }
}

impl GameStats {
    pub fn load(store: &Store) -> Self {
        store.get_or_default(keys::GAME_STATS)
    }

    pub fn save(&self, store: &mut Store) -> Result<(), StoreError> {
        store.set(keys::GAME_STATS, self)
    }

    pub fn record_baseball(&mut self, won: bool, attempts: u32) {
        self.baseball.played += 1;
        if won {
            self.baseball.won += 1;
            self.baseball.best_score = lower_record(self.baseball.best_score, attempts);
        }
        info!(won, attempts, "baseball recorded");
    }

    pub fn record_rps(&mut self, outcome: Outcome) {
        let rps = &mut self.rps;
        rps.played += 1;
        match outcome {
            Outcome::Win => {
                rps.won += 1;
                rps.streak += 1;
                rps.max_streak = rps.max_streak.max(rps.streak);
            }
            Outcome::Lose => rps.streak = 0,
            Outcome::Draw => {}
        }
    }

    pub fn record_quiz(&mut self, correct: u32, total: u32) {
        self.quiz.played += 1;
        self.quiz.correct += correct;
        self.quiz.total_questions += total;
        info!(correct, total, "quiz recorded");
    }

    pub fn record_memory(&mut self, won: bool, seconds: u32) {
        self.memory.played += 1;
        if won {
            self.memory.won += 1;
            self.memory.best_time = lower_record(self.memory.best_time, seconds);
        }
        info!(won, seconds, "memory recorded");
    }

    pub fn record_arithmetic(&mut self, score: u32) {
        self.arithmetic.played += 1;
        self.arithmetic.best_score = self.arithmetic.best_score.max(score);
        info!(score, "arithmetic recorded");
    }

    pub fn total_games(&self) -> u32 {
        self.baseball.played + self.rps.played + self.quiz.played + self.memory.played + self.arithmetic.played
    }

    pub fn highest_score(&self) -> u32 {
        self.baseball.best_score.max(self.arithmetic.best_score)
    }

    /// Rough play time at three and a half minutes per game.
    pub fn play_minutes(&self) -> u32 {
        (self.total_games() as f64 * MINUTES_PER_GAME).floor() as u32
    }

    pub fn longest_streak(&self) -> u32 {
        self.rps.max_streak
    }

    pub fn baseball_win_rate(&self) -> u32 {
        percent(self.baseball.won, self.baseball.played)
    }

    pub fn rps_win_rate(&self) -> u32 {
        percent(self.rps.won, self.rps.played)
    }

    pub fn quiz_accuracy(&self) -> u32 {
        percent(self.quiz.correct, self.quiz.total_questions)
    }

    pub fn memory_clear_rate(&self) -> u32 {
        percent(self.memory.won, self.memory.played)
    }

    pub fn achievements(&self, games_today: u32) -> Vec<Achievement> {
        let quiz_accuracy = if self.quiz.total_questions == 0 {
            0.0
        } else {
            self.quiz.correct as f64 / self.quiz.total_questions as f64 * 100.0
        };
        let badge = |icon, name, description, unlocked| Achievement { icon, name, description, unlocked };
        vec![
            badge("🎮", "First game", "Play your first game", self.total_games() > 0),
            badge("🏆", "Game master", "Play 100 games in total", self.total_games() >= 100),
            badge("⚾", "Baseball pro", "Win number baseball 10 times", self.baseball.won >= 10),
            badge("✂", "RPS champion", "Win 5 rock-paper-scissors rounds in a row", self.rps.max_streak >= 5),
            badge("🧠", "Quiz genius", "Reach 90% quiz accuracy", quiz_accuracy >= 90.0),
            badge("🃏", "Memory master", "Clear the memory game 20 times", self.memory.won >= 20),
            badge("📅", "Daily player", "Play 10 games in one day", games_today >= 10),
            badge("⚡", "Speed demon", "Score 50 in speed arithmetic", self.arithmetic.best_score >= 50),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub icon: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
}

/// Games finished per calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyGames(BTreeMap<NaiveDate, u32>);

impl DailyGames {
    pub fn load(store: &Store) -> Self {
        store.get_or_default(keys::DAILY_GAMES)
    }

    pub fn save(&self, store: &mut Store) -> Result<(), StoreError> {
        store.set(keys::DAILY_GAMES, self)
    }

    pub fn record(&mut self, day: NaiveDate) -> u32 {
        let count = self.0.entry(day).or_insert(0);
        *count += 1;
        *count
    }

    pub fn on(&self, day: NaiveDate) -> u32 {
        self.0.get(&day).copied().unwrap_or(0)
    }
}

pub fn best_2048(store: &Store) -> u64 {
    store.get_or(keys::BEST_2048, 0)
}

/// Store `score` if it beats the saved best; returns whether it did.
pub fn record_2048(store: &mut Store, score: u64) -> Result<bool, StoreError> {
    if score <= best_2048(store) {
        return Ok(false);
    }
    store.set(keys::BEST_2048, &score)?;
    info!(score, "new 2048 best");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn records_keep_best_values() {
        let mut stats = GameStats::default();
        stats.record_baseball(false, 12);
        stats.record_baseball(true, 7);
        stats.record_baseball(true, 9);
        assert_eq!(stats.baseball, BaseballStats { played: 3, won: 2, best_score: 7 });
        assert_eq!(stats.baseball_win_rate(), 67);

        stats.record_memory(true, 48);
        stats.record_memory(true, 52);
        assert_eq!(stats.memory.best_time, 48);

        stats.record_arithmetic(12);
        stats.record_arithmetic(9);
        assert_eq!(stats.arithmetic, ArithmeticStats { played: 2, best_score: 12 });
    }

    #[test]
    fn rps_streaks() {
        let mut stats = GameStats::default();
        for outcome in [Outcome::Win, Outcome::Win, Outcome::Draw, Outcome::Win, Outcome::Lose, Outcome::Win] {
            stats.record_rps(outcome);
        }
        assert_eq!(stats.rps, RpsStats { played: 6, won: 4, streak: 1, max_streak: 3 });
        assert_eq!(stats.longest_streak(), 3);
    }

    #[test]
    fn summary() {
        let mut stats = GameStats::default();
        assert_eq!((stats.total_games(), stats.highest_score(), stats.play_minutes()), (0, 0, 0));
        stats.record_baseball(true, 6);
        stats.record_quiz(9, 10);
        stats.record_arithmetic(15);
        assert_eq!(stats.total_games(), 3);
        assert_eq!(stats.highest_score(), 15);
        assert_eq!(stats.play_minutes(), 10);
        assert_eq!(stats.quiz_accuracy(), 90);
    }

    #[test]
    fn achievements_unlock() {
        let mut stats = GameStats::default();
        assert!(stats.achievements(0).iter().all(|a| !a.unlocked));
        stats.record_quiz(10, 10);
        let unlocked: Vec<_> = stats.achievements(10).into_iter().filter(|a| a.unlocked).map(|a| a.name).collect();
        assert_eq!(unlocked, vec!["First game", "Quiz genius", "Daily player"]);
    }

    #[test]
    fn reads_legacy_layout() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open_in_dir(dir.path()).unwrap();
        store
            .set(
                keys::GAME_STATS,
                &json!({
                    "baseball": {"played": 2, "won": 1, "bestScore": 5},
                    "wordchain": {"played": 4, "maxWords": 9},
                    "calculator": {"played": 1, "bestScore": 20}
                }),
            )
            .unwrap();
        let stats = GameStats::load(&store);
        assert_eq!(stats.baseball.best_score, 5);
        assert_eq!(stats.arithmetic.best_score, 20);
        assert_eq!(stats.rps, RpsStats::default());
        assert_eq!(stats.total_games(), 3);
    }

    #[test]
    fn best_2048_only_increases() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open_in_dir(dir.path()).unwrap();
        assert_eq!(best_2048(&store), 0);
        assert!(record_2048(&mut store, 1200).unwrap());
        assert!(!record_2048(&mut store, 800).unwrap());
        assert!(!record_2048(&mut store, 1200).unwrap());
        assert_eq!(best_2048(&store), 1200);
    }

    #[test]
    fn daily_counts_persist() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open_in_dir(dir.path()).unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let mut daily = DailyGames::load(&store);
        daily.record(day);
        assert_eq!(daily.record(day), 2);
        daily.save(&mut store).unwrap();
        let reloaded = DailyGames::load(&store);
        assert_eq!(reloaded.on(day), 2);
        assert_eq!(reloaded.on(day.succ_opt().unwrap()), 0);
    }
}
