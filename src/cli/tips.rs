use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use milbase::tips::{Tip, TipBook, TipCategory};

use super::Ctx;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Ranking {
    Popular,
    Recent,
    Recommended,
}

#[derive(Debug, Subcommand)]
pub enum TipsCmd {
    /// List tips, most viewed first
    List {
        #[arg(long)]
        category: Option<TipCategory>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Print one tip
    Show { id: u32 },
    /// Like a tip (+0.1 rating)
    Like { id: u32 },
    /// Top tips by a ranking
    Top {
        #[arg(value_enum, default_value = "popular")]
        by: Ranking,
        #[arg(long, default_value_t = 3)]
        limit: usize,
    },
}

fn print_row(tip: &Tip) {
    println!(
        "{:>2}. {} {:<40} [{}] ★{:.1}  {} views",
        tip.id, tip.icon, tip.title, tip.category, tip.rating, tip.views
    );
}

pub fn run(ctx: &mut Ctx, cmd: TipsCmd) -> Result<()> {
    let mut book = TipBook::load(&ctx.store);
    match cmd {
        TipsCmd::List { category, search } => {
            let tips = book.filtered(category, search.as_deref());
            if tips.is_empty() {
                println!("No tips match.");
            }
            for tip in tips {
                print_row(tip);
            }
        }
        TipsCmd::Show { id } => {
            let tip = book.view(id)?.clone();
            book.save(&mut ctx.store)?;
            println!("{} {}", tip.icon, tip.title);
            println!("[{}] ★{:.1}  {} views  #{}", tip.category, tip.rating, tip.views, tip.tags.join(" #"));
            println!();
            println!("{}", tip.content);
        }
        TipsCmd::Like { id } => {
            let rating = book.like(id)?;
            book.save(&mut ctx.store)?;
            println!("Liked tip {id}; rating is now {rating:.1}");
        }
        TipsCmd::Top { by, limit } => {
            let tips = match by {
                Ranking::Popular => book.popular(limit),
                Ranking::Recent => book.recent(limit),
                Ranking::Recommended => book.recommended(limit),
            };
            for tip in tips {
                print_row(tip);
            }
        }
    }
    Ok(())
}
