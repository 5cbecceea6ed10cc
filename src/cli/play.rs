//! Line-oriented game loops. Typing `q` leaves any game.

use anyhow::Result;
use clap::ValueEnum;
use milbase::engine::{self as GameEngine, Game2048, Move};
use milbase::games::arithmetic::{SpeedRound, Submit};
use milbase::games::baseball::Baseball;
use milbase::games::memory::{Flip, MemoryGame, CARDS};
use milbase::games::quiz::Quiz;
use milbase::games::reaction::{random_delay, ReactionLog};
use milbase::games::rps::{Hand, Outcome, RpsSession};
use milbase::games::stats::{best_2048, record_2048, DailyGames};
use milbase::games::GameStats;
use std::thread;
use std::time::{Duration, Instant};

use super::{ask, is_quit, Ctx};

/// Faster than any human; the line was typed before the signal.
const TOO_FAST: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Game {
    #[value(name = "2048")]
    G2048,
    Baseball,
    Rps,
    Quiz,
    Memory,
    Arithmetic,
    Reaction,
}

pub fn run(ctx: &mut Ctx, game: Game) -> Result<()> {
    let played = match game {
        Game::G2048 => play_2048(ctx)?,
        Game::Baseball => play_baseball(ctx)?,
        Game::Rps => play_rps(ctx)?,
        Game::Quiz => play_quiz(ctx)?,
        Game::Memory => play_memory(ctx)?,
        Game::Arithmetic => play_arithmetic(ctx)?,
        Game::Reaction => play_reaction(ctx)?,
    };
    if played {
        let mut daily = DailyGames::load(&ctx.store);
        daily.record(ctx.today);
        daily.save(&mut ctx.store)?;
    }
    Ok(())
}

fn update_stats(ctx: &mut Ctx, apply: impl FnOnce(&mut GameStats)) -> Result<()> {
    let mut stats = GameStats::load(&ctx.store);
    apply(&mut stats);
    stats.save(&mut ctx.store)?;
    Ok(())
}

fn play_2048(ctx: &mut Ctx) -> Result<bool> {
    GameEngine::new();
    let best = best_2048(&ctx.store);
    let mut game = Game2048::new(&mut ctx.rng);
    loop {
        println!("{}", game.board());
        println!("score {}  best {}  moves {}", game.score(), best.max(game.score()), game.moves());
        if game.is_over() {
            println!("No moves left. Highest tile {}.", game.board().highest_tile());
            break;
        }
        let Some(input) = ask("move (w/a/s/d, q to quit): ")? else { break };
        if is_quit(&input) {
            break;
        }
        let dir: Move = match input.parse() {
            Ok(dir) => dir,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        let outcome = game.play(dir, &mut ctx.rng);
        if !outcome.moved {
            println!("Nothing moves that way.");
        } else if outcome.gained > 0 {
            println!("+{}", outcome.gained);
        }
    }
    if record_2048(&mut ctx.store, game.score())? {
        println!("New best score: {}", game.score());
    }
    Ok(game.moves() > 0)
}

fn play_baseball(ctx: &mut Ctx) -> Result<bool> {
    println!("Guess the three distinct digits. S = right digit, right place; B = right digit, wrong place.");
    let mut game = Baseball::new(&mut ctx.rng);
    while !game.is_solved() {
        let Some(input) = ask(&format!("guess #{}: ", game.attempts() + 1))? else { break };
        if is_quit(&input) {
            break;
        }
        match game.guess(&input) {
            Ok(score) if score.is_solved() => println!("Correct! Solved in {} attempts.", game.attempts()),
            Ok(score) => println!("{score}"),
            Err(e) => println!("{e}"),
        }
    }
    if game.attempts() == 0 {
        return Ok(false);
    }
    if !game.is_solved() {
        println!("The answer was {}.", game.secret());
    }
    let (won, attempts) = (game.is_solved(), game.attempts());
    update_stats(ctx, |s| s.record_baseball(won, attempts))?;
    Ok(true)
}

fn play_rps(ctx: &mut Ctx) -> Result<bool> {
    let mut session = RpsSession::default();
    let mut stats = GameStats::load(&ctx.store);
    let mut rounds = 0;
    loop {
        let Some(input) = ask(&format!("rock/paper/scissors (streak {}): ", session.streak()))? else { break };
        if is_quit(&input) {
            break;
        }
        let hand: Hand = match input.parse() {
            Ok(hand) => hand,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        let round = session.play(hand, &mut ctx.rng);
        stats.record_rps(round.outcome);
        rounds += 1;
        let verdict = match round.outcome {
            Outcome::Win => "You win!",
            Outcome::Lose => "You lose.",
            Outcome::Draw => "Draw.",
        };
        println!("you {} vs computer {}: {verdict}", round.player, round.computer);
    }
    if rounds == 0 {
        return Ok(false);
    }
    stats.save(&mut ctx.store)?;
    println!("Recent:");
    for r in session.history() {
        println!("  {} vs {} -> {}", r.player, r.computer, r.outcome);
    }
    Ok(true)
}

fn play_quiz(ctx: &mut Ctx) -> Result<bool> {
    let mut quiz = Quiz::new(&mut ctx.rng);
    while let Some(question) = quiz.current().copied() {
        println!();
        println!("Q{}. {}", quiz.position(), question.prompt);
        for (i, option) in question.options.iter().enumerate() {
            println!("  {}) {option}", i + 1);
        }
        let choice = loop {
            let Some(input) = ask("answer (1-4): ")? else { return Ok(false) };
            if is_quit(&input) {
                return Ok(false);
            }
            match input.trim().parse::<usize>() {
                Ok(n @ 1..=4) => break n - 1,
                _ => println!("Enter a number from 1 to 4."),
            }
        };
        if let Some(answered) = quiz.answer(choice) {
            if answered.correct {
                println!("Correct!");
            } else {
                println!("Wrong. The answer is \"{}\".", answered.answer);
            }
        }
    }
    println!();
    println!("{} / {} ({}%)  {}", quiz.score(), quiz.total(), quiz.percent(), quiz.grade());
    let (correct, total) = (quiz.score(), quiz.total());
    update_stats(ctx, |s| s.record_quiz(correct, total))?;
    Ok(true)
}

fn play_memory(ctx: &mut Ctx) -> Result<bool> {
    let mut game = MemoryGame::new(&mut ctx.rng);
    let started = Instant::now();
    while !game.is_complete() {
        print!("{}", game.render(&[]));
        let Some(input) = ask(&format!("flip a card (1-{CARDS}), {}/8 pairs: ", game.matched_pairs()))? else { break };
        if is_quit(&input) {
            break;
        }
        let Ok(n) = input.trim().parse::<usize>() else {
            println!("Enter a card number.");
            continue;
        };
        match game.flip(n.wrapping_sub(1)) {
            Flip::Ignored => println!("Pick a hidden card."),
            Flip::Revealed(i) => println!("Card {} is {}", i + 1, game.symbol(i).unwrap_or("?")),
            Flip::Match(..) => println!("Match!"),
            Flip::Miss(a, b) => {
                print!("{}", game.render(&[a, b]));
                println!("No match.");
            }
        }
    }
    let seconds = started.elapsed().as_secs() as u32;
    let won = game.is_complete();
    if won {
        println!("Cleared in {seconds}s with {} tries.", game.pairs_tried());
    } else if game.pairs_tried() == 0 {
        return Ok(false);
    }
    update_stats(ctx, |s| s.record_memory(won, seconds))?;
    Ok(true)
}

fn play_arithmetic(ctx: &mut Ctx) -> Result<bool> {
    println!("Solve as many as you can in 30 seconds.");
    if ask("press Enter to start ")?.is_none() {
        return Ok(false);
    }
    let mut round = SpeedRound::start(Instant::now(), &mut ctx.rng);
    loop {
        let left = round.remaining(Instant::now()).as_secs();
        let Some(input) = ask(&format!("[{left:>2}s] {}  ", round.problem()))? else { break };
        if is_quit(&input) {
            break;
        }
        let Ok(answer) = input.trim().parse::<i64>() else {
            println!("Numbers only.");
            continue;
        };
        match round.submit(answer, Instant::now(), &mut ctx.rng) {
            Submit::Correct => {}
            Submit::Wrong => println!("Try again."),
            Submit::TimeUp => break,
        }
    }
    let score = round.score();
    println!("Time! Score: {score}");
    update_stats(ctx, |s| s.record_arithmetic(score))?;
    Ok(true)
}

fn play_reaction(ctx: &mut Ctx) -> Result<bool> {
    let mut log = ReactionLog::default();
    loop {
        let Some(input) = ask("press Enter when ready (q to quit): ")? else { break };
        if is_quit(&input) {
            break;
        }
        println!("wait for it...");
        thread::sleep(random_delay(&mut ctx.rng));
        println!(">>> GO! <<<");
        let shown = Instant::now();
        if ask("")?.is_none() {
            break;
        }
        let elapsed = shown.elapsed();
        if elapsed < TOO_FAST {
            println!("Too early!");
            continue;
        }
        let best = log.record(elapsed);
        println!("{} ms{}", elapsed.as_millis(), if best { "  new best!" } else { "" });
    }
    let Some(best) = log.best_ms() else { return Ok(false) };
    let recent: Vec<String> = log.recent().map(|ms| ms.to_string()).collect();
    println!("best {best} ms, average {} ms", log.average_ms().unwrap_or(best));
    println!("recent: {}", recent.join(", "));
    Ok(true)
}
