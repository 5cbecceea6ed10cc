use anyhow::{Context, Result};
use chrono::Utc;
use clap::Subcommand;
use milbase::memo::{preview, time_ago, Memo, MemoBook, MemoDraft, MemoError, MemoQuery, MemoSort, Priority, PREVIEW_LEN};
use std::path::PathBuf;

use super::Ctx;

#[derive(Debug, Subcommand)]
pub enum MemoCmd {
    /// Create a memo
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long, default_value = "normal")]
        priority: Priority,
        /// Comma separated
        #[arg(long, default_value = "")]
        tags: String,
    },
    /// List memos
    List {
        /// Match title, content or tags
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        /// date, title or priority
        #[arg(long, default_value = "date")]
        sort: MemoSort,
    },
    /// Print one memo in full
    Show { id: String },
    /// Replace fields of a memo; omitted fields keep their value
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        tags: Option<String>,
    },
    /// Delete a memo
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Write all memos to a JSON file
    Export { path: PathBuf },
    /// Add memos from a JSON file in front of the existing ones
    Import { path: PathBuf },
}

fn print_row(memo: &Memo) {
    let now = Utc::now();
    let tags = if memo.tags.is_empty() { String::new() } else { format!(" #{}", memo.tags.join(" #")) };
    println!("{}  [{}] {} ({}){tags}", memo.id, memo.priority, memo.title, time_ago(memo.updated_at, now));
    println!("    {}", preview(&memo.content, PREVIEW_LEN).replace('\n', " "));
}

pub fn run(ctx: &mut Ctx, cmd: MemoCmd) -> Result<()> {
    let mut book = MemoBook::load(&ctx.store);
    match cmd {
        MemoCmd::Add { title, content, priority, tags } => {
            let draft = MemoDraft { title, content, priority, tags };
            let id = book.create(&draft, Utc::now(), &mut ctx.rng)?.id.clone();
            book.save(&mut ctx.store)?;
            println!("Saved memo {id}");
        }
        MemoCmd::List { search, priority, sort } => {
            let memos = book.query(&MemoQuery { search, priority, sort });
            if memos.is_empty() {
                println!("No memos.");
            }
            for memo in memos {
                print_row(memo);
            }
        }
        MemoCmd::Show { id } => {
            let memo = book.get(&id).ok_or_else(|| MemoError::NotFound(id.clone()))?;
            println!("{}", memo.title);
            println!("priority: {}  tags: {}", memo.priority, memo.tags.join(", "));
            println!("created: {}  updated: {}", memo.created_at.format("%Y-%m-%d %H:%M"), memo.updated_at.format("%Y-%m-%d %H:%M"));
            println!();
            println!("{}", memo.content);
        }
        MemoCmd::Edit { id, title, content, priority, tags } => {
            let current = book.get(&id).ok_or_else(|| MemoError::NotFound(id.clone()))?;
            let draft = MemoDraft {
                title: title.unwrap_or_else(|| current.title.clone()),
                content: content.unwrap_or_else(|| current.content.clone()),
                priority: priority.unwrap_or(current.priority),
                tags: tags.unwrap_or_else(|| current.tags.join(",")),
            };
            book.update(&id, &draft, Utc::now())?;
            book.save(&mut ctx.store)?;
            println!("Updated memo {id}");
        }
        MemoCmd::Delete { id, yes } => {
            if !yes && !super::confirm(&format!("Delete memo {id}?"))? {
                println!("Cancelled.");
                return Ok(());
            }
            let removed = book.delete(&id)?;
            book.save(&mut ctx.store)?;
            println!("Deleted '{}'", removed.title);
        }
        MemoCmd::Export { path } => {
            book.export_to(&path).with_context(|| format!("exporting memos to {}", path.display()))?;
            println!("Exported {} memo(s) to {}", book.len(), path.display());
        }
        MemoCmd::Import { path } => {
            let added = book
                .import_from(&path, Utc::now(), &mut ctx.rng)
                .with_context(|| format!("importing memos from {}", path.display()))?;
            book.save(&mut ctx.store)?;
            println!("Imported {added} memo(s)");
        }
    }
    Ok(())
}
