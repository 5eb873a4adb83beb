use std::error::Error;
use std::io::{self, BufRead, Write};

use rusqlite::Connection;
use tracing_subscriber::EnvFilter;
use vocab_review::database::db::{
    add_term, init_database, load_records_for_user, save_record, set_suspended,
};
use vocab_review::export::json::{RecordExport, export_json_to_path, import_json};
use vocab_review::models::{
    Grade, LearningSession, RandomShuffler, SessionConfig, SystemClock, preview_intervals,
    select_session,
};
use vocab_review::ReviewError;

const DEFAULT_DB_PATH: &str = "db.sqlite3";
const USAGE: &str = "usage: vocab-review [user] [study | suspend <term> | resume <term> | export <path> | import <path>]";

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let db_path = std::env::var("VOCAB_DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
    let conn = init_database(&db_path)?;

    let mut args = std::env::args().skip(1);
    let user = args.next().unwrap_or_else(|| "default".to_string());
    let command = args.next().unwrap_or_else(|| "study".to_string());
    let argument = args.next();

    match (command.as_str(), argument) {
        ("study", _) => study(&user, &conn)?,
        ("suspend", Some(term)) => set_suspended(&user, &term, true, &conn)?,
        ("resume", Some(term)) => set_suspended(&user, &term, false, &conn)?,
        ("export", Some(path)) => {
            let records = load_records_for_user(&user, &conn)?;
            export_json_to_path(&RecordExport { user_id: user, records }, &path)?;
        }
        ("import", Some(path)) => {
            let export = import_json(&path)?;
            for record in &export.records {
                save_record(&user, record, &conn)?;
            }
            println!("Imported {} records into '{}'", export.records.len(), user);
        }
        _ => eprintln!("{USAGE}"),
    }
    Ok(())
}

fn seed_sample_vocabulary(user: &str, conn: &Connection) -> Result<(), Box<dyn Error>> {
    for (term, definition) in [("cześć", "hello"), ("dziękuję", "thank you"), ("proszę", "please")] {
        add_term(user, term, definition, &SystemClock, conn)?;
    }
    println!("Sample data created!");
    Ok(())
}

fn study(user: &str, conn: &Connection) -> Result<(), Box<dyn Error>> {
    if load_records_for_user(user, conn)?.is_empty() {
        seed_sample_vocabulary(user, conn)?;
    }
    let pool = load_records_for_user(user, conn)?;

    let cards = match select_session(
        &pool,
        &SessionConfig::default(),
        &SystemClock,
        &mut RandomShuffler::new(),
    ) {
        Ok(cards) => cards,
        Err(ReviewError::NoCardsAvailable) => {
            println!("Nothing to study now.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let mut session = LearningSession::new(cards);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !session.is_completed() {
        let Some(card) = session.current_card().cloned() else {
            break;
        };
        println!("\n{}", session.phase_message());
        print!("{}  (press Enter to reveal) ", card.term);
        io::stdout().flush()?;
        if lines.next().transpose()?.is_none() {
            return Ok(());
        }

        session.toggle_definition();
        println!("{}", card.definition);
        for (grade, description) in preview_intervals(&card, &SystemClock) {
            print!("[{grade}: {description}] ");
        }
        println!();

        let grade = loop {
            print!("grade (again/hard/good/easy or 1-4): ");
            io::stdout().flush()?;
            let Some(line) = lines.next().transpose()? else {
                return Ok(());
            };
            match line.parse::<Grade>() {
                Ok(grade) => break grade,
                Err(err) => println!("{err}"),
            }
        };

        if session.grade_current_card(grade, &SystemClock).is_some() {
            if let Some(updated) = session.current_card() {
                save_record(user, updated, conn)?;
            }
        }
        session.next_card();
    }

    println!("\nSession complete.");
    Ok(())
}
