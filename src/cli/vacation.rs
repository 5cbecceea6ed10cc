use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use clap::Subcommand;
use milbase::vacation::{format_krw, Checklists, Section, TravelDraft, TravelPlans, VacationLedger};

use super::Ctx;

#[derive(Debug, Subcommand)]
pub enum VacationCmd {
    /// Leave balance and the next booked day
    Status,
    /// Book or unbook a single day
    Toggle { date: NaiveDate },
    /// Book every day in a range
    Book { start: NaiveDate, end: NaiveDate },
    /// Month view; defaults to the current month
    Calendar {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
    /// Pre-vacation, packing and return checklists
    Checklist {
        #[command(subcommand)]
        cmd: Option<ChecklistCmd>,
    },
    /// Travel plans
    Plan {
        #[command(subcommand)]
        cmd: Option<PlanCmd>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ChecklistCmd {
    Show,
    Toggle { section: Section, id: u32 },
    Add { section: Section, text: String },
    /// Restore the default items
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum PlanCmd {
    List,
    Add {
        title: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        /// Won
        #[arg(long, default_value_t = 0)]
        budget: u64,
        #[arg(long, default_value_t = 1)]
        people: u32,
    },
    /// Mark a trip as done with a 1-5 rating
    Complete { id: u32, satisfaction: u8 },
    Remove { id: u32 },
}

pub fn run(ctx: &mut Ctx, cmd: VacationCmd) -> Result<()> {
    match cmd {
        VacationCmd::Status => status(ctx),
        VacationCmd::Toggle { date } => {
            let mut ledger = VacationLedger::load(&ctx.store);
            let booked = ledger.toggle_day(date);
            ledger.save(&mut ctx.store)?;
            println!("{date}: {}", if booked { "booked" } else { "removed" });
            println!("{} days left of {}", ledger.remaining_days(), ledger.total_days);
            Ok(())
        }
        VacationCmd::Book { start, end } => {
            let mut ledger = VacationLedger::load(&ctx.store);
            let added = ledger.book_range(start, end)?;
            ledger.save(&mut ctx.store)?;
            println!("Booked {added} new day(s); {} left of {}", ledger.remaining_days(), ledger.total_days);
            Ok(())
        }
        VacationCmd::Calendar { year, month } => {
            calendar(ctx, year.unwrap_or(ctx.today.year()), month.unwrap_or(ctx.today.month()))
        }
        VacationCmd::Checklist { cmd } => checklist(ctx, cmd.unwrap_or(ChecklistCmd::Show)),
        VacationCmd::Plan { cmd } => plan(ctx, cmd.unwrap_or(PlanCmd::List)),
    }
}

fn status(ctx: &Ctx) -> Result<()> {
    let ledger = VacationLedger::load(&ctx.store);
    println!("Total {}  used {}  remaining {}", ledger.total_days, ledger.used_days, ledger.remaining_days());
    for (name, bucket) in [
        ("Annual", ledger.annual_leave),
        ("Compensatory", ledger.compensatory_leave),
        ("Comfort", ledger.comfort_leave),
    ] {
        println!("  {name:<13} {}/{} used, {} left", bucket.used, bucket.total, bucket.remaining());
    }
    match ledger.next_vacation(ctx.today) {
        Some((date, dday)) => println!("Next vacation: {date} ({dday})"),
        None => println!("Next vacation: -"),
    }
    Ok(())
}

fn calendar(ctx: &Ctx, year: i32, month: u32) -> Result<()> {
    let ledger = VacationLedger::load(&ctx.store);
    let days = ledger.month_calendar(year, month, ctx.today)?;
    println!("{year}-{month:02}");
    println!("  Su  Mo  Tu  We  Th  Fr  Sa");
    for week in days.chunks(7) {
        let line: String = week
            .iter()
            .map(|d| {
                let (open, close) = match (d.is_today, d.is_vacation) {
                    (_, true) => ('*', ' '),
                    (true, false) => ('[', ']'),
                    _ => (' ', ' '),
                };
                if d.in_month {
                    format!("{open}{:>2}{close}", d.date.day())
                } else {
                    "  . ".to_string()
                }
            })
            .collect();
        println!("{line}");
    }
    println!("* vacation  [ ] today");
    Ok(())
}

fn checklist(ctx: &mut Ctx, cmd: ChecklistCmd) -> Result<()> {
    let mut lists = Checklists::load(&ctx.store);
    match cmd {
        ChecklistCmd::Show => {}
        ChecklistCmd::Toggle { section, id } => {
            lists.toggle(section, id)?;
            lists.save(&mut ctx.store)?;
        }
        ChecklistCmd::Add { section, text } => {
            lists.add(section, &text)?;
            lists.save(&mut ctx.store)?;
        }
        ChecklistCmd::Reset => {
            if !super::confirm("Reset all checklists to the defaults?")? {
                println!("Cancelled.");
                return Ok(());
            }
            lists.reset();
            lists.save(&mut ctx.store)?;
        }
    }
    for section in Section::ALL {
        let (done, total) = lists.progress(section);
        println!("{} ({section}) {done}/{total}", section.title());
        for item in lists.section(section) {
            println!("  [{}] {:>2} {}", if item.completed { "x" } else { " " }, item.id, item.text);
        }
    }
    Ok(())
}

fn plan(ctx: &mut Ctx, cmd: PlanCmd) -> Result<()> {
    let mut plans = TravelPlans::load(&ctx.store);
    match cmd {
        PlanCmd::List => {}
        PlanCmd::Add { title, start, end, budget, people } => {
            let id = plans.add(TravelDraft { title, start, end, budget, people })?.id;
            plans.save(&mut ctx.store)?;
            println!("Added plan {id}");
        }
        PlanCmd::Complete { id, satisfaction } => {
            plans.complete(id, satisfaction)?;
            plans.save(&mut ctx.store)?;
        }
        PlanCmd::Remove { id } => {
            let removed = plans.remove(id)?;
            plans.save(&mut ctx.store)?;
            println!("Removed '{}'", removed.title);
        }
    }
    if plans.all().is_empty() {
        println!("No travel plans.");
        return Ok(());
    }
    for p in plans.all() {
        let rating = p.satisfaction.map(|s| "★".repeat(s as usize)).unwrap_or_default();
        println!(
            "{:>2}. {} [{}] {} ~ {} ({} days) {} x{} {rating}",
            p.id,
            p.title,
            p.status,
            p.start_date,
            p.end_date,
            p.duration_days(),
            format_krw(p.budget),
            p.people
        );
    }
    println!("Planned budget: {}", format_krw(plans.planned_budget()));
    Ok(())
}
