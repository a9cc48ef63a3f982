//! Command-line front end over `questlog_core`.
//!
//! # Responsibility
//! - Map subcommands onto core services for one explicit user.
//! - Keep output plain text so it stays scriptable.

use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use questlog_core::db::open_db;
use questlog_core::{
    init_logging, Avatar, AvatarPart, CompletionOutcome, CompletionService, Difficulty,
    LeaderboardService, LeaderboardWindow, NewTaskRequest, ProfileService, RejectReason,
    SqliteCompletionRepository, SqliteProfileRepository, SqliteTaskRepository, Task,
    TaskCategory, TaskId, TaskService, TodayItem, UserId,
};
use rusqlite::Connection;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "questlog")]
#[command(about = "Gamified habit and task tracker", long_about = None)]
#[command(version)]
struct Cli {
    /// SQLite database file.
    #[arg(long, env = "QUESTLOG_DB", default_value = "questlog.sqlite3", global = true)]
    db: PathBuf,

    /// Acting user id.
    #[arg(long, env = "QUESTLOG_USER", global = true)]
    user: Option<UserId>,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, env = "QUESTLOG_LOG_DIR", global = true)]
    log_dir: Option<String>,

    #[arg(long, env = "QUESTLOG_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check core linkage
    Ping,
    /// Create the profile for --user if missing
    Init {
        #[arg(long)]
        email: Option<String>,
    },
    /// Add a task
    AddTask {
        title: String,
        #[arg(long, value_enum, default_value_t = CategoryArg::Daily)]
        category: CategoryArg,
        #[arg(long, value_enum, default_value_t = DifficultyArg::Easy)]
        difficulty: DifficultyArg,
    },
    /// List all tasks grouped by category
    Tasks,
    /// Show tasks offered today
    Today,
    /// Complete a task
    Complete { task_id: TaskId },
    /// Archive a task
    Archive { task_id: TaskId },
    /// Restore an archived task
    Unarchive { task_id: TaskId },
    /// Delete a task (earned XP is kept)
    Delete { task_id: TaskId },
    /// Show level and experience
    Status,
    /// Show or edit the profile
    Profile {
        #[arg(long)]
        name: Option<String>,
        /// Avatar part assignment, e.g. `tunic=blue_1`
        #[arg(long = "set", value_name = "PART=VALUE")]
        parts: Vec<String>,
    },
    /// Show the leaderboard
    Leaderboard {
        /// Score only this week's experience
        #[arg(long)]
        weekly: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CategoryArg {
    Daily,
    Todo,
    Habit,
}

impl From<CategoryArg> for TaskCategory {
    fn from(value: CategoryArg) -> Self {
        match value {
            CategoryArg::Daily => TaskCategory::Daily,
            CategoryArg::Todo => TaskCategory::Todo,
            CategoryArg::Habit => TaskCategory::Habit,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli
            .log_level
            .as_deref()
            .unwrap_or_else(|| questlog_core::default_log_level());
        init_logging(level, log_dir).map_err(|err| anyhow!(err))?;
    }

    if let Commands::Ping = cli.command {
        println!("questlog_core ping={}", questlog_core::ping());
        println!("questlog_core version={}", questlog_core::core_version());
        return Ok(());
    }

    let user = cli
        .user
        .ok_or_else(|| anyhow!("--user (or QUESTLOG_USER) is required"))?;
    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let now = Local::now();

    match cli.command {
        // Answered before the database is opened.
        Commands::Ping => {}
        Commands::Init { email } => {
            let profile = profile_service(&conn).ensure_profile(
                user,
                email.as_deref(),
                now.timestamp_millis(),
            )?;
            println!("profile ready: {}", profile.display_name);
        }
        Commands::AddTask {
            title,
            category,
            difficulty,
        } => {
            let request = NewTaskRequest {
                title,
                category: category.into(),
                difficulty: difficulty.into(),
            };
            let task = task_service(&conn).create_task(user, &request, now.timestamp_millis())?;
            println!("added {}", task.id);
        }
        Commands::Tasks => {
            let board = task_service(&conn).task_board(user)?;
            print_task_section("Dailies", &board.daily);
            print_task_section("To-dos", &board.todo);
            print_task_section("Habits", &board.habit);
        }
        Commands::Today => {
            let view = completion_service(&conn).today_view(user, &now)?;
            print_today_section("Dailies", &view.dailies);
            print_today_section("To-dos", &view.todos);
            print_today_section("Habits", &view.habits);
        }
        Commands::Complete { task_id } => {
            match completion_service(&conn).complete_task(user, task_id, &now)? {
                CompletionOutcome::Completed {
                    xp_awarded,
                    archived,
                    level,
                    ..
                } => {
                    println!("+{xp_awarded} XP");
                    if archived {
                        println!("to-do archived");
                    }
                    println!("Level {} ({} / {} XP)", level.level, level.progress, level.next);
                }
                CompletionOutcome::Rejected(RejectReason::AlreadyCompletedToday) => {
                    println!("already completed today");
                }
                CompletionOutcome::TaskInactive => println!("task is archived"),
            }
        }
        Commands::Archive { task_id } => {
            task_service(&conn).set_active(user, task_id, false)?;
            println!("archived {task_id}");
        }
        Commands::Unarchive { task_id } => {
            task_service(&conn).set_active(user, task_id, true)?;
            println!("unarchived {task_id}");
        }
        Commands::Delete { task_id } => {
            task_service(&conn).delete_task(user, task_id)?;
            println!("deleted {task_id}");
        }
        Commands::Status => {
            let summary = profile_service(&conn).home_summary(user)?;
            println!("{}", summary.display_name);
            println!(
                "Level {} [{}%] {} / {} XP to next level (total {})",
                summary.level.level,
                summary.level.progress_percent(),
                summary.level.progress,
                summary.level.next,
                summary.total_xp
            );
        }
        Commands::Profile { name, parts } => {
            let service = profile_service(&conn);
            let current = service
                .get_profile(user)?
                .ok_or_else(|| anyhow!("no profile yet; run `questlog init` first"))?;

            if name.is_some() || !parts.is_empty() {
                let mut avatar = current.avatar.clone();
                for assignment in &parts {
                    apply_part(&mut avatar, assignment)?;
                }
                let display_name = name.as_deref().unwrap_or(current.display_name.as_str());
                let updated = service.update_profile(user, display_name, &avatar)?;
                print_profile(&updated.display_name, &updated.avatar);
            } else {
                print_profile(&current.display_name, &current.avatar);
            }
        }
        Commands::Leaderboard { weekly } => {
            let window = if weekly {
                LeaderboardWindow::Weekly
            } else {
                LeaderboardWindow::AllTime
            };
            let rows = leaderboard_service(&conn).leaderboard(window, &now)?;
            if rows.is_empty() {
                println!("No players yet.");
            }
            for row in rows {
                match row.level {
                    Some(level) => println!(
                        "{:>3}. {} - {} Total XP - Lv {}",
                        row.rank, row.display_name, row.score, level
                    ),
                    None => println!(
                        "{:>3}. {} - {} XP this week",
                        row.rank, row.display_name, row.score
                    ),
                }
            }
        }
    }

    Ok(())
}

fn task_service(conn: &Connection) -> TaskService<SqliteTaskRepository<'_>> {
    TaskService::new(SqliteTaskRepository::new(conn))
}

fn completion_service(
    conn: &Connection,
) -> CompletionService<SqliteTaskRepository<'_>, SqliteCompletionRepository<'_>> {
    CompletionService::new(
        SqliteTaskRepository::new(conn),
        SqliteCompletionRepository::new(conn),
    )
}

fn profile_service(
    conn: &Connection,
) -> ProfileService<SqliteProfileRepository<'_>, SqliteCompletionRepository<'_>> {
    ProfileService::new(
        SqliteProfileRepository::new(conn),
        SqliteCompletionRepository::new(conn),
    )
}

fn leaderboard_service(
    conn: &Connection,
) -> LeaderboardService<SqliteProfileRepository<'_>, SqliteCompletionRepository<'_>> {
    LeaderboardService::new(
        SqliteProfileRepository::new(conn),
        SqliteCompletionRepository::new(conn),
    )
}

fn apply_part(avatar: &mut Avatar, assignment: &str) -> Result<()> {
    let Some((part, value)) = assignment.split_once('=') else {
        bail!("expected PART=VALUE, got `{assignment}`");
    };
    let part: AvatarPart = part.parse()?;
    avatar.set(part, value)?;
    Ok(())
}

fn print_task_section(label: &str, tasks: &[Task]) {
    println!("{label}");
    if tasks.is_empty() {
        println!("  No tasks yet.");
    }
    for task in tasks {
        let state = if task.active { "" } else { " (archived)" };
        println!(
            "  {} {} [{}]{}",
            task.id,
            task.title,
            task.difficulty.as_str().to_uppercase(),
            state
        );
    }
}

fn print_today_section(label: &str, items: &[TodayItem]) {
    println!("{label}");
    if items.is_empty() {
        println!("  Nothing here. Add some with `questlog add-task`.");
    }
    for item in items {
        let mark = if item.done { "x" } else { " " };
        println!(
            "  [{mark}] {} {} +{} XP",
            item.task.id, item.task.title, item.xp
        );
    }
}

fn print_profile(display_name: &str, avatar: &Avatar) {
    println!("{display_name}");
    for part in AvatarPart::ALL {
        println!("  {:<10} {}", part.label(), avatar.get(part).unwrap_or("-"));
    }
}
