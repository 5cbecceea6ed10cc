use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use milbase::discharge::{DischargeProgress, ServiceType};
use milbase::games::stats::{best_2048, DailyGames};
use milbase::games::GameStats;
use milbase::memo::MemoBook;
use milbase::profile::{AppData, Language, ProfileEdit, Theme};
use milbase::store::keys;
use milbase::vacation::VacationLedger;
use std::path::Path;
use tracing::info;

use super::Ctx;

const BAR_WIDTH: usize = 30;

#[derive(Debug, Subcommand)]
pub enum ProfileCmd {
    /// Print the profile (default)
    Show,
    /// Change name, rank or unit; blank name or rank restores the default
    Set {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        rank: Option<String>,
        #[arg(long)]
        unit: Option<String>,
    },
    /// Set enlistment date and service type
    Enlist {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long, default_value = "army")]
        service: ServiceType,
    },
}

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[arg(long)]
    theme: Option<Theme>,
    #[arg(long)]
    language: Option<Language>,
    #[arg(long)]
    notifications: Option<bool>,
}

fn print_progress(p: &DischargeProgress, today: NaiveDate, language: Language) {
    let unit = language.days_unit();
    println!("Service      : {} ({} months)", p.service_type.label(), p.service_type.months());
    println!("Enlisted     : {}", p.enlistment_date);
    println!("Discharge    : {} ({})", p.discharge_date, p.d_day(today));
    println!("Served       : {}{unit} of {}{unit}", p.service_days, p.total_service_days);
    println!("Remaining    : {}{unit}", p.remaining_days);
    println!("Progress     : {} {}%", p.bar(BAR_WIDTH), p.progress_percent);
    if p.is_discharged() {
        println!("Discharged. Congratulations!");
    }
}

pub fn status(ctx: &Ctx) -> Result<()> {
    let data = AppData::load(&ctx.store);
    println!("{}", data.welcome());
    if !data.user.unit.is_empty() {
        println!("{} {}, {}", data.user.rank, data.user.name, data.user.unit);
    }
    println!();
    match data.discharge(ctx.today) {
        Some(progress) => print_progress(&progress?, ctx.today, data.settings.language),
        None => println!("No enlistment date yet. Run `milbase profile enlist --date YYYY-MM-DD`."),
    }
    println!();

    let ledger = VacationLedger::load(&ctx.store);
    match ledger.next_vacation(ctx.today) {
        Some((date, dday)) => println!("Next vacation: {date} ({dday})"),
        None => println!("Next vacation: -"),
    }
    println!("Vacation days: {} left of {}", ledger.remaining_days(), ledger.total_days);
    println!("Memos        : {}", MemoBook::load(&ctx.store).len());
    println!("Games played : {}", GameStats::load(&ctx.store).total_games());
    Ok(())
}

pub fn discharge(ctx: &mut Ctx, date: Option<NaiveDate>, service: Option<ServiceType>, save: bool) -> Result<()> {
    let mut data = AppData::load(&ctx.store);
    let Some(enlisted) = date.or(data.user.enlistment_date) else {
        bail!("no enlistment date given and none saved in the profile (use --date YYYY-MM-DD)");
    };
    let service = service.unwrap_or(data.user.service_type);
    let progress = DischargeProgress::compute(enlisted, service, ctx.today)?;
    print_progress(&progress, ctx.today, data.settings.language);

    if date.is_some() {
        ctx.store.set(keys::LAST_CALCULATION, &progress)?;
    }
    if save {
        data.set_enlistment(enlisted, service);
        data.save(&mut ctx.store)?;
        info!(%enlisted, %service, "enlistment saved to profile");
        println!("Saved to profile.");
    }
    Ok(())
}

pub fn profile(ctx: &mut Ctx, cmd: Option<ProfileCmd>) -> Result<()> {
    let mut data = AppData::load(&ctx.store);
    match cmd.unwrap_or(ProfileCmd::Show) {
        ProfileCmd::Show => {}
        ProfileCmd::Set { name, rank, unit } => {
            data.edit_profile(ProfileEdit { name, rank, unit });
            data.save(&mut ctx.store)?;
        }
        ProfileCmd::Enlist { date, service } => {
            data.set_enlistment(date, service);
            data.save(&mut ctx.store)?;
        }
    }
    let user = &data.user;
    println!("Name      : {}", user.name);
    println!("Rank      : {}", user.rank);
    println!("Unit      : {}", if user.unit.is_empty() { "-" } else { user.unit.as_str() });
    match user.enlistment_date {
        Some(date) => println!("Enlisted  : {date}"),
        None => println!("Enlisted  : -"),
    }
    println!("Service   : {} ({})", user.service_type.label(), user.service_type);
    Ok(())
}

pub fn settings(ctx: &mut Ctx, args: SettingsArgs) -> Result<()> {
    let mut data = AppData::load(&ctx.store);
    let changed = args.theme.is_some() || args.language.is_some() || args.notifications.is_some();
    if let Some(theme) = args.theme {
        data.settings.theme = theme;
    }
    if let Some(language) = args.language {
        data.settings.language = language;
    }
    if let Some(on) = args.notifications {
        data.settings.notifications = on;
    }
    if changed {
        data.save(&mut ctx.store)?;
    }
    println!("theme         = {}", data.settings.theme);
    println!("language      = {}", data.settings.language);
    println!("notifications = {}", data.settings.notifications);
    Ok(())
}

pub fn stats(ctx: &Ctx) -> Result<()> {
    let stats = GameStats::load(&ctx.store);
    let today_count = DailyGames::load(&ctx.store).on(ctx.today);
    println!("Total games   : {}", stats.total_games());
    println!("Play time     : ~{} min", stats.play_minutes());
    println!("Highest score : {}", stats.highest_score());
    println!("Longest streak: {}", stats.longest_streak());
    println!("2048 best     : {}", best_2048(&ctx.store));
    println!();

    let b = &stats.baseball;
    let best = if b.best_score > 0 { b.best_score.to_string() } else { "-".to_string() };
    println!("Baseball   played {:>3}  win {:>3}%  best {best} tries", b.played, stats.baseball_win_rate());
    println!(
        "RPS        played {:>3}  win {:>3}%  max streak {}",
        stats.rps.played,
        stats.rps_win_rate(),
        stats.rps.max_streak
    );
    println!(
        "Quiz       played {:>3}  accuracy {:>3}%  correct {}",
        stats.quiz.played,
        stats.quiz_accuracy(),
        stats.quiz.correct
    );
    println!(
        "Memory     played {:>3}  clear {:>3}%  best {}s",
        stats.memory.played,
        stats.memory_clear_rate(),
        stats.memory.best_time
    );
    println!("Arithmetic played {:>3}  best {}", stats.arithmetic.played, stats.arithmetic.best_score);
    println!();

    println!("Achievements:");
    for a in stats.achievements(today_count) {
        let mark = if a.unlocked { "x" } else { " " };
        println!("  [{mark}] {} {:<14} {}", a.icon, a.name, a.description);
    }
    Ok(())
}

pub fn export(ctx: &Ctx, path: &Path) -> Result<()> {
    AppData::export_to(&ctx.store, path).with_context(|| format!("exporting to {}", path.display()))?;
    println!("Exported profile to {}", path.display());
    Ok(())
}

pub fn import(ctx: &mut Ctx, path: &Path) -> Result<()> {
    let data = AppData::import_from(&mut ctx.store, path).with_context(|| format!("importing {}", path.display()))?;
    println!("Imported {}. {}", path.display(), data.welcome());
    Ok(())
}
