use services::{AppServices, Clock};
use spelling_core::model::{GameMode, Grade};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod args;

use args::{Args, Command, print_usage};

fn init_tracing() {
    let filter = std::env::var("SPELLING_LOG")
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

async fn print_stats(services: &AppServices) {
    let progress = services.progress();
    let doc = progress.get_all().await;

    if doc.is_empty() {
        println!("No progress recorded yet.");
    }
    for (grade, grade_progress) in doc.iter() {
        for mode in GameMode::ALL {
            let record = grade_progress.mode(mode);
            println!(
                "grade {grade} {mode:<8} {correct:>4}/{total:<4} {accuracy:>5.1}%",
                correct = record.correct_attempts(),
                total = record.total_attempts(),
                accuracy = record.accuracy(),
            );
        }
    }
    println!(
        "total words learned: {}",
        progress.get_total_words_learned().await
    );
    if let Some(grade) = progress.current_grade().await {
        println!("current grade: {grade}");
    }
}

async fn print_words(
    services: &AppServices,
    grade: Grade,
    refresh: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let supplier = services.words();
    let words = if refresh {
        supplier.refresh_words_for_grade(grade).await?
    } else {
        supplier.get_words_for_grade(grade).await?
    };
    for word in &words {
        println!(
            "{:<16} [{}] {}",
            word.word(),
            word.difficulty(),
            word.definition()
        );
    }
    Ok(())
}

async fn run_quiz(services: &AppServices, grade: Grade) -> Result<(), Box<dyn std::error::Error>> {
    let spelling = services.spelling();
    let mut quiz = spelling.start_quiz(grade).await?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Grade {grade} quiz: {} words. Type the spelling and press enter.", quiz.len());
    while let Some(word) = quiz.current_word().cloned() {
        println!();
        println!("Word {} of {}", quiz.position() + 1, quiz.len());
        println!("  meaning:  {}", word.definition());
        println!("  sentence: {}", word.masked_sentence("_____"));

        let Some(line) = lines.next_line().await? else {
            println!("Quiz ended early.");
            break;
        };
        let result = spelling.answer_quiz(&mut quiz, &line).await?;
        let score = result.answer.score;
        if result.answer.correct {
            println!("Correct! streak {}", score.streak);
        } else {
            println!("Not quite, it is spelled \"{}\".", word.word());
        }
        quiz.advance()?;
    }

    let score = quiz.score();
    println!();
    println!("Score: {}/{}", score.current, score.total);
    println!(
        "Quiz accuracy for grade {grade}: {:.1}%",
        services.progress().get_accuracy(grade, GameMode::Quiz).await
    );
    Ok(())
}

async fn reset(services: &AppServices, grade: Option<Grade>) -> Result<(), Box<dyn std::error::Error>> {
    let progress = services.progress();
    let ok = match grade {
        Some(grade) => progress.reset_grade_progress(grade).await,
        None => {
            services.words().clear_cache();
            progress.reset_all().await
        }
    };
    if !ok {
        return Err("reset failed, see log for details".into());
    }
    match grade {
        Some(grade) => println!("Progress for grade {grade} reset."),
        None => println!("All progress reset."),
    }
    Ok(())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| args::ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(args::ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Args::parse(std::env::args().skip(1), std::env::var("SPELLING_DB_URL").ok())
        .inspect_err(|e| {
            eprintln!("{e}");
            print_usage();
        })?;

    if parsed.command == Command::Help {
        print_usage();
        return Ok(());
    }

    tracing::debug!(db = %parsed.db_url, command = ?parsed.command, "starting");
    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(&parsed.db_url, Clock::system()).await?;

    match parsed.command {
        Command::Stats => print_stats(&services).await,
        Command::Words { grade, refresh } => print_words(&services, grade, refresh).await?,
        Command::Quiz { grade } => run_quiz(&services, grade).await?,
        Command::Reset { grade } => reset(&services, grade).await?,
        Command::Help => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
