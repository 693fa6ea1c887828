use std::fmt;

use chrono::{DateTime, Duration, Utc};
use storage::repository::{IdentityRepository, RecordKind, RecordRepository};
use storage::sqlite::SqliteRepository;
use tutor_core::model::{CourseId, ProgressMap, QuizScoreRecord, QuizScores, UserId};

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    user: UserId,
    courses: Vec<CourseId>,
    lessons: u32,
    scores: u32,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidUser { raw: String },
    InvalidLessons { raw: String },
    InvalidScores { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidUser { raw } => write!(f, "invalid --user value: {raw}"),
            ArgsError::InvalidLessons { raw } => write!(f, "invalid --lessons value: {raw}"),
            ArgsError::InvalidScores { raw } => write!(f, "invalid --scores value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("TUTOR_DB_URL").unwrap_or_else(|_| "sqlite:dev.sqlite3".into());
        let mut user = std::env::var("TUTOR_USER_ID")
            .ok()
            .map_or_else(|| UserId::new("user_seed0demo"), UserId::new);
        let mut courses: Vec<CourseId> = std::env::var("TUTOR_COURSES")
            .ok()
            .map(parse_courses)
            .unwrap_or_else(|| vec![CourseId::new("html"), CourseId::new("css")]);
        let mut lessons = std::env::var("TUTOR_LESSONS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(3);
        let mut scores = std::env::var("TUTOR_SCORES")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(2);
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--user" => {
                    let value = require_value(&mut args, "--user")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidUser { raw: value });
                    }
                    user = UserId::new(value);
                }
                "--courses" => {
                    let value = require_value(&mut args, "--courses")?;
                    courses = parse_courses(value);
                }
                "--lessons" => {
                    let value = require_value(&mut args, "--lessons")?;
                    lessons = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidLessons { raw: value.clone() })?;
                }
                "--scores" => {
                    let value = require_value(&mut args, "--scores")?;
                    scores = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidScores { raw: value.clone() })?;
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            user,
            courses,
            lessons,
            scores,
            now,
        })
    }
}

fn parse_courses(raw: String) -> Vec<CourseId> {
    raw.split(',')
        .map(str::trim)
        .filter(|slug| !slug.is_empty())
        .map(CourseId::new)
        .collect()
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:dev.sqlite3)");
    eprintln!("  --user <id>               User id to seed (default: user_seed0demo)");
    eprintln!("  --courses <a,b,c>         Comma-separated course slugs (default: html,css)");
    eprintln!("  --lessons <n>             Lessons completed per course (default: 3)");
    eprintln!("  --scores <n>              Quiz score records to append (default: 2)");
    eprintln!("  --now <rfc3339>           Fixed current time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  TUTOR_DB_URL, TUTOR_USER_ID, TUTOR_COURSES, TUTOR_LESSONS, TUTOR_SCORES");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let repo = SqliteRepository::connect(&args.db_url).await?;
    repo.migrate().await?;

    let now = args.now.unwrap_or_else(Utc::now);

    repo.store_user_id(&args.user).await?;

    let mut progress = ProgressMap::default();
    for course in &args.courses {
        for lesson in 0..args.lessons {
            progress.mark(course, lesson);
        }
    }
    repo.write_record(
        &args.user,
        RecordKind::Progress,
        &serde_json::to_string(&progress)?,
    )
    .await?;

    let mut scores = QuizScores::default();
    let scored_course = args
        .courses
        .first()
        .cloned()
        .unwrap_or_else(|| CourseId::new("html"));
    for i in 0..args.scores {
        let taken_at = now - Duration::days(i64::from(i));
        let record = QuizScoreRecord::new(scored_course.clone(), 7 + i % 3, 10, taken_at);
        let _ = scores.append(record);
    }
    repo.write_record(
        &args.user,
        RecordKind::QuizScores,
        &serde_json::to_string(&scores)?,
    )
    .await?;

    println!(
        "Seeded {} with {} courses, {} lessons each, and {} quiz scores into {}",
        args.user.as_str(),
        args.courses.len(),
        args.lessons,
        args.scores,
        args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
