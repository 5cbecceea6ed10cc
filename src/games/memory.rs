//! Memory match: eight symbol pairs on a 4x4 grid.

use rand::seq::SliceRandom;
use rand::Rng;

pub const SYMBOLS: [&str; 8] = ["🎖", "⚔", "🛡", "🎯", "🚁", "🔫", "💣", "🏃"];
pub const CARDS: usize = SYMBOLS.len() * 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flip {
    /// Out of range, already matched or already face up.
    Ignored,
    /// First card of a pair is now face up.
    Revealed(usize),
    Match(usize, usize),
    /// Both cards go face down again.
    Miss(usize, usize),
}

#[derive(Debug, Clone)]
pub struct MemoryGame {
    cards: Vec<&'static str>,
    matched: Vec<bool>,
    face_up: Option<usize>,
    pairs_tried: u32,
}

impl MemoryGame {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards: Vec<&'static str> = SYMBOLS.iter().chain(SYMBOLS.iter()).copied().collect();
        cards.shuffle(rng);
        MemoryGame::from_cards(cards)
    }

    pub fn from_cards(cards: Vec<&'static str>) -> Self {
        let matched = vec![false; cards.len()];
        MemoryGame { cards, matched, face_up: None, pairs_tried: 0 }
    }

    pub fn flip(&mut self, index: usize) -> Flip {
        if index >= self.cards.len() || self.matched[index] || self.face_up == Some(index) {
            return Flip::Ignored;
        }
        let Some(first) = self.face_up.take() else {
            self.face_up = Some(index);
            return Flip::Revealed(index);
        };
        self.pairs_tried += 1;
        if self.cards[first] == self.cards[index] {
            self.matched[first] = true;
            self.matched[index] = true;
            Flip::Match(first, index)
        } else {
            Flip::Miss(first, index)
        }
    }

    pub fn symbol(&self, index: usize) -> Option<&'static str> {
        self.cards.get(index).copied()
    }

    pub fn is_matched(&self, index: usize) -> bool {
        self.matched.get(index).copied().unwrap_or(false)
    }

    pub fn is_face_up(&self, index: usize) -> bool {
        self.face_up == Some(index) || self.is_matched(index)
    }

    pub fn matched_pairs(&self) -> usize {
        self.matched.iter().filter(|m| **m).count() / 2
    }

    pub fn pairs_tried(&self) -> u32 {
        self.pairs_tried
    }

    pub fn is_complete(&self) -> bool {
        self.matched.iter().all(|m| *m)
    }

    /// Four rows of cards; hidden cards show their 1-based number.
    pub fn render(&self, reveal: &[usize]) -> String {
        let mut out = String::new();
        for (i, card) in self.cards.iter().enumerate() {
            if self.is_face_up(i) || reveal.contains(&i) {
                out.push_str(&format!(" [{card:^3}]"));
            } else {
                out.push_str(&format!(" [{:^3}]", i + 1));
            }
            if i % 4 == 3 {
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixed() -> MemoryGame {
        // Pairs sit side by side: (0,1), (2,3), ...
        MemoryGame::from_cards(SYMBOLS.iter().flat_map(|s| [*s, *s]).collect())
    }

    #[test]
    fn deck_has_each_symbol_twice() {
        let game = MemoryGame::new(&mut StdRng::seed_from_u64(5));
        assert_eq!(game.cards.len(), CARDS);
        for s in SYMBOLS {
            assert_eq!(game.cards.iter().filter(|c| **c == s).count(), 2);
        }
    }

    #[test]
    fn match_and_miss() {
        let mut game = fixed();
        assert_eq!(game.flip(0), Flip::Revealed(0));
        assert_eq!(game.flip(0), Flip::Ignored);
        assert_eq!(game.flip(2), Flip::Miss(0, 2));
        assert!(!game.is_face_up(0));
        assert_eq!(game.flip(0), Flip::Revealed(0));
        assert_eq!(game.flip(1), Flip::Match(0, 1));
        assert_eq!(game.flip(1), Flip::Ignored);
        assert_eq!(game.flip(99), Flip::Ignored);
        assert_eq!((game.matched_pairs(), game.pairs_tried()), (1, 2));
    }

    #[test]
    fn completes_when_all_matched() {
        let mut game = fixed();
        for pair in 0..SYMBOLS.len() {
            game.flip(pair * 2);
            assert!(matches!(game.flip(pair * 2 + 1), Flip::Match(..)));
        }
        assert!(game.is_complete());
        assert!(!game.render(&[]).contains("[ 1 ]"));
    }
}
