use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use clap::{ArgGroup, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use og_tracker::db::{self, SqliteStore};
use og_tracker::student::{
    change_level, create_student, log_lesson, rename, set_current_book, set_tutoring_days,
};
use og_tracker::{progress, report, settings};
use og_tracker::{Day, Snapshot, Tracker, CATALOG};

#[derive(Parser)]
#[command(name = "og-tracker")]
#[command(about = "Reading and spelling progress tracker for one-to-one tutoring", long_about = None)]
struct Cli {
    /// SQLite database holding the tracker records
    #[arg(long, global = true, env = "DATABASE_URL", default_value = "sqlite://og-tracker.db")]
    database: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load a small demo roster
    Seed,
    /// Import students from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Add a student starting at a level
    AddStudent {
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 1)]
        level: u8,
        /// Tutoring days, e.g. --day Monday --day Thu
        #[arg(long = "day", value_delimiter = ',')]
        days: Vec<Day>,
    },
    /// Rename a student
    Rename {
        #[arg(long)]
        student: String,
        #[arg(long)]
        name: String,
    },
    /// Permanently delete a student
    Remove {
        #[arg(long)]
        student: String,
    },
    /// Move a student to another level; progress on every level is kept
    Level {
        #[arg(long)]
        student: String,
        #[arg(long)]
        level: u8,
    },
    /// Replace a student's tutoring days
    Days {
        #[arg(long)]
        student: String,
        #[arg(long = "day", value_delimiter = ',')]
        days: Vec<Day>,
    },
    /// Set or clear the book a student is reading
    Book {
        #[arg(long)]
        student: String,
        #[arg(long)]
        title: Option<String>,
    },
    /// Mark a skill as mastered
    Master {
        #[command(flatten)]
        skill: SkillArgs,
    },
    /// Mark a skill as not mastered; its repeat count restarts at zero
    Unmaster {
        #[command(flatten)]
        skill: SkillArgs,
    },
    /// Add or remove repeats on an unmastered skill
    Repeat {
        #[command(flatten)]
        skill: SkillArgs,
        #[arg(long, allow_negative_numbers = true, default_value_t = 1)]
        delta: i64,
    },
    /// Attach a note to a skill (empty clears it)
    SkillNote {
        #[command(flatten)]
        skill: SkillArgs,
        #[arg(long)]
        note: String,
    },
    /// Log a lesson
    Log {
        #[arg(long)]
        student: String,
        /// Lesson date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        notes: String,
    },
    /// Update the quick note and lesson focus fields
    Snapshot {
        #[arg(long)]
        student: String,
        #[arg(long)]
        quick_note: Option<String>,
        #[arg(long)]
        last_focus: Option<String>,
        #[arg(long)]
        next_focus: Option<String>,
    },
    /// Set today's or tomorrow's plan
    #[command(group(
        ArgGroup::new("plan")
            .args(["today", "tomorrow"])
            .required(true)
            .multiple(true)
    ))]
    Plan {
        #[arg(long)]
        today: Option<String>,
        #[arg(long)]
        tomorrow: Option<String>,
    },
    /// Add a quick link
    LinkAdd {
        #[arg(long)]
        title: String,
        #[arg(long)]
        url: String,
    },
    /// Remove a quick link by id
    LinkRemove {
        #[arg(long)]
        id: String,
    },
    /// List students with progress on their current level
    List,
    /// Show one student's skills on a level
    Show {
        #[arg(long)]
        student: String,
        /// Defaults to the student's current level
        #[arg(long)]
        level: Option<u8>,
    },
    /// Generate a markdown report
    Report {
        /// Report date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[derive(clap::Args)]
struct SkillArgs {
    #[arg(long)]
    student: String,
    #[arg(long)]
    skill: String,
    /// Defaults to the student's current level
    #[arg(long)]
    level: Option<u8>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("og_tracker=info")),
        )
        .init();

    let cli = Cli::parse();

    let store = SqliteStore::connect(&cli.database)
        .await
        .with_context(|| format!("failed to open database {}", cli.database))?;
    db::init_db(store.pool())
        .await
        .context("failed to prepare database schema")?;
    let mut tracker = Tracker::open(store).await.context("failed to load tracker records")?;

    match cli.command {
        Commands::InitDb => {
            println!("Schema ready.");
        }
        Commands::Seed => {
            let inserted = db::seed(&mut tracker).await?;
            println!("Seeded {inserted} students.");
        }
        Commands::Import { csv } => {
            let inserted = db::import_csv(&mut tracker, &csv).await?;
            println!("Imported {inserted} students from {}.", csv.display());
        }
        Commands::AddStudent { name, level, days } => {
            let new_student = create_student(&CATALOG, &name, level, days.into_iter().collect())?;
            let id = new_student.id.clone();
            tracker.add_student(new_student).await?;
            println!("Added {} ({id}).", name.trim());
        }
        Commands::Rename { student, name } => {
            let id = resolve(&tracker, &student)?;
            tracker
                .try_update_student(&id, |s| rename(s, &name))
                .await?;
            println!("Renamed to {}.", name.trim());
        }
        Commands::Remove { student } => {
            let id = resolve(&tracker, &student)?;
            tracker.delete_student(&id).await?;
            println!("Removed {student}.");
        }
        Commands::Level { student, level } => {
            let id = resolve(&tracker, &student)?;
            tracker
                .try_update_student(&id, |s| change_level(&CATALOG, s, level))
                .await?;
            println!("{student} is now on level {level}.");
        }
        Commands::Days { student, days } => {
            let id = resolve(&tracker, &student)?;
            tracker
                .update_student(&id, |s| set_tutoring_days(s, days.into_iter().collect()))
                .await?;
            println!("Tutoring days updated.");
        }
        Commands::Book { student, title } => {
            let id = resolve(&tracker, &student)?;
            tracker
                .update_student(&id, |s| set_current_book(s, title.as_deref()))
                .await?;
            println!("Current book updated.");
        }
        Commands::Master { skill } => {
            let (id, level) = resolve_skill(&tracker, &skill)?;
            tracker
                .update_student(&id, |s| progress::mark_mastered(s, level, &skill.skill))
                .await?;
            println!("Mastered {} on level {level}.", skill.skill);
        }
        Commands::Unmaster { skill } => {
            let (id, level) = resolve_skill(&tracker, &skill)?;
            tracker
                .update_student(&id, |s| progress::unmark_mastered(s, level, &skill.skill))
                .await?;
            println!("{} on level {level} is no longer mastered.", skill.skill);
        }
        Commands::Repeat { skill, delta } => {
            let (id, level) = resolve_skill(&tracker, &skill)?;
            if let Some(found) = tracker.student(&id) {
                if found
                    .skills(level)
                    .iter()
                    .any(|status| status.skill == skill.skill && status.is_mastered)
                {
                    bail!("{} is mastered; unmaster it before adding repeats", skill.skill);
                }
            }
            tracker
                .update_student(&id, |s| progress::adjust_repeat_count(s, level, &skill.skill, delta))
                .await?;
            println!("Repeats updated for {}.", skill.skill);
        }
        Commands::SkillNote { skill, note } => {
            let (id, level) = resolve_skill(&tracker, &skill)?;
            tracker
                .update_student(&id, |s| progress::update_skill_info(s, level, &skill.skill, &note))
                .await?;
            println!("Note saved for {}.", skill.skill);
        }
        Commands::Log {
            student,
            date,
            title,
            notes,
        } => {
            let id = resolve(&tracker, &student)?;
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            tracker
                .try_update_student(&id, |s| {
                    log_lesson(s, Some(date), title.as_deref(), &notes)
                })
                .await?;
            println!("Lesson logged for {date}.");
        }
        Commands::Snapshot {
            student,
            quick_note,
            last_focus,
            next_focus,
        } => {
            let id = resolve(&tracker, &student)?;
            let current = tracker
                .student(&id)
                .map(|s| s.snapshot())
                .unwrap_or_default();
            let snapshot = Snapshot {
                quick_note: quick_note.or(current.quick_note),
                last_lesson_focus: last_focus.or(current.last_lesson_focus),
                next_lesson_focus: next_focus.or(current.next_lesson_focus),
            };
            tracker.commit_snapshot(&id, snapshot).await?;
            println!("Snapshot saved.");
        }
        Commands::Plan { today, tomorrow } => {
            tracker
                .update_settings(|current| {
                    let mut updated = current.clone();
                    if let Some(text) = &today {
                        updated = settings::update_today_plan(&updated, text);
                    }
                    if let Some(text) = &tomorrow {
                        updated = settings::update_tomorrow_plan(&updated, text);
                    }
                    updated
                })
                .await?;
            println!("Plan updated.");
        }
        Commands::LinkAdd { title, url } => {
            tracker
                .try_update_settings(|current| settings::add_quick_link(current, &title, &url))
                .await?;
            if let Some(link) = tracker.settings().quick_links.last() {
                println!("Added link {} -> {} ({}).", link.title, link.url, link.id);
            }
        }
        Commands::LinkRemove { id } => {
            tracker
                .update_settings(|current| settings::remove_quick_link(current, &id))
                .await?;
            println!("Link removed.");
        }
        Commands::List => {
            let summaries = report::summarize_students(tracker.students());
            if summaries.is_empty() {
                println!("No students yet.");
                return Ok(());
            }

            println!("Students:");
            for summary in summaries.iter() {
                println!(
                    "- {} ({}) level {}, {}% mastered ({}/{}), next up: {}",
                    summary.student.name,
                    summary.student.id,
                    summary.student.current_level,
                    summary.percent,
                    summary.mastered,
                    summary.total,
                    summary.focus.unwrap_or("level complete")
                );
            }
        }
        Commands::Show { student, level } => {
            let id = resolve(&tracker, &student)?;
            let Some(found) = tracker.student(&id) else {
                bail!("no student matches `{student}`");
            };
            let level = level.unwrap_or(found.current_level);
            let focus = progress::first_unmastered_skill(found, level).map(|s| s.skill.clone());

            println!(
                "{}: level {} ({}% mastered), days: {}",
                found.name,
                level,
                progress::level_progress_percent(found, level),
                found
                    .tutoring_days
                    .iter()
                    .map(|day| day.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            for status in found.skills(level) {
                let marker = if status.is_mastered {
                    "[x]"
                } else if Some(&status.skill) == focus.as_ref() {
                    "[>]"
                } else {
                    "[ ]"
                };
                print!("{marker} {}", status.skill);
                if status.repeat_count > 0 {
                    print!(" x{}", status.repeat_count);
                }
                if let Some(info) = status
                    .info
                    .as_deref()
                    .or_else(|| CATALOG.skill_info(level, &status.skill))
                {
                    print!(" - {info}");
                }
                println!();
            }
        }
        Commands::Report { date, out } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let report = report::build_report(date, tracker.students(), tracker.settings());
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

fn resolve(tracker: &Tracker<SqliteStore>, selector: &str) -> anyhow::Result<String> {
    tracker
        .find(selector)
        .map(|found| found.id.clone())
        .with_context(|| format!("no student matches `{selector}`"))
}

fn resolve_skill(tracker: &Tracker<SqliteStore>, args: &SkillArgs) -> anyhow::Result<(String, u8)> {
    let Some(found) = tracker.find(&args.student) else {
        bail!("no student matches `{}`", args.student);
    };
    let level = args.level.unwrap_or(found.current_level);
    if !found.skills(level).iter().any(|status| status.skill == args.skill) {
        bail!("level {level} has no skill named `{}`", args.skill);
    }
    Ok((found.id.clone(), level))
}
