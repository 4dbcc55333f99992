use std::{
    io::{self, BufRead, Write},
    sync::Arc,
};

use chrono::Local;
use clap::Parser;
use dictionary::Dictionary;
use tracing_subscriber::EnvFilter;
use wordbook::{
    config::Config,
    scheduler::DailyScheduler,
    utilities::{input, split_options, str_to_bool},
    word::normalize,
    Difficulty, JobOutcome, Notification, Notifier, SearchFilter, SearchSession, Storage,
    WordOfTheDayJob, WordRecord, WordService,
};

const TOP_WORDS: u32 = 10;

struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &Notification) -> anyhow::Result<()> {
        println!();
        println!("*** {} ***", notification.title);
        println!("{}", notification.summary);
        println!("(type `define {}` for details)", notification.deep_link);
        Ok(())
    }
}

struct App {
    service: Arc<WordService>,
    session: SearchSession<Dictionary>,
    job: Arc<WordOfTheDayJob<Dictionary>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let storage = Storage::initialize(&config.database_url).await?;
    let dict = Dictionary::with_base_url(&config.api_url)?;
    let service = Arc::new(WordService::new(storage, dict));
    let job = Arc::new(WordOfTheDayJob::new(
        service.clone(),
        Arc::new(ConsoleNotifier),
    ));
    if !config.no_schedule {
        DailyScheduler::new(job.clone(), config.notify_hour).spawn();
    }
    let app = App {
        session: SearchSession::new(service.clone()),
        service,
        job,
    };

    repl(&app, &mut io::stdin().lock(), &mut io::stdout()).await;
    Ok(())
}

enum Flow {
    Continue,
    Quit,
}

/// Reads commands until `quit` or the end of input. A failing command reports its error and
/// the prompt comes back.
async fn repl(app: &App, lines: &mut impl BufRead, out: &mut impl Write) {
    loop {
        let line = match input(">> ", lines, out) {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(error) => {
                tracing::warn!(%error, "failed to read a command");
                break;
            }
        };
        match run_command(app, line.trim(), lines, out).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(error) => println!("Error: {error}"),
        }
    }
}

async fn run_command(
    app: &App,
    line: &str,
    lines: &mut impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<Flow> {
    let mut command_parts = line.split_ascii_whitespace();
    let Some(command) = command_parts.next() else {
        return Ok(Flow::Continue);
    };
    let rest = command_parts.collect::<Vec<&str>>();
    match command {
        "exit" | "leave" | "quit" | "e" | "q" | "l" => {
            return Ok(Flow::Quit);
        }
        "define" | "find" => {
            define_word(app, &rest.join(" ")).await?;
        }
        "fav" | "favorite" => {
            let word = rest.join(" ");
            if app.session.toggle_favorite(&word).await {
                println!("Added '{word}' to your favorites.");
            } else {
                println!("'{word}' is not a favorite.");
            }
        }
        "category" => {
            set_category(app, &rest).await?;
        }
        "categories" => {
            for category in app.service.storage().categories().await? {
                println!("  {category}");
            }
        }
        "favorites" => {
            print_list(&app.service.storage().favorite_words().await?);
        }
        "list" => {
            print_list(&app.service.storage().all_words().await?);
        }
        "filter" => {
            filter_words(app, &rest).await?;
        }
        "top" => {
            let limit = rest.first().and_then(|n| n.parse().ok()).unwrap_or(TOP_WORDS);
            for record in app.service.most_searched(limit).await? {
                println!("  {:<20} {} searches", record.word, record.search_count);
            }
        }
        "analytics" => {
            show_analytics(app).await;
        }
        "wotd" => {
            word_of_the_day(app, rest.first() == Some(&"run")).await?;
        }
        "export" => {
            export_favorites(app, rest.first().copied()).await?;
        }
        "remove" => {
            remove_word(app, &rest.join(" "), lines, out).await?;
        }
        _ => {
            println!("Unknown command {command}.");
        }
    }
    Ok(Flow::Continue)
}

async fn define_word(app: &App, word: &str) -> anyhow::Result<()> {
    app.session.search(word).await;
    let state = app.session.current();
    if let Some(error) = state.error {
        println!("{error}");
        let suggestions = app.service.suggest(word, 3).await?;
        if !suggestions.is_empty() {
            println!("Did you mean: {}?", suggestions.join(", "));
        }
        app.session.clear_error();
    } else if let Some(record) = state.result {
        print_definition(&record);
    }
    Ok(())
}

async fn set_category(app: &App, parts: &[&str]) -> sqlx::Result<()> {
    let Some((word, category)) = parts.split_first() else {
        println!("Usage: category <word> [category]");
        return Ok(());
    };
    let category = category.join(" ");
    if app.service.set_category(word, Some(&category)).await? {
        println!("Updated the category of '{word}'.");
    } else {
        println!("This word is not saved.");
    }
    Ok(())
}

async fn filter_words(app: &App, parts: &[&str]) -> anyhow::Result<()> {
    let (words, options) = split_options(parts.iter().copied());
    let mut filter = SearchFilter::default();
    for (key, value) in options {
        match key {
            "pos" | "part_of_speech" => filter.part_of_speech = Some(value.to_lowercase()),
            "difficulty" => match value.parse::<Difficulty>() {
                Ok(difficulty) => filter.difficulty = Some(difficulty),
                Err(error) => {
                    println!("{error}");
                    return Ok(());
                }
            },
            "category" => filter.category = Some(value.to_string()),
            other => {
                println!("Unknown filter {other}.");
                return Ok(());
            }
        }
    }
    let results = app.service.search_filtered(&words.join(" "), &filter).await?;
    if results.is_empty() {
        println!("No saved words match.");
    }
    print_list(&results);
    Ok(())
}

async fn show_analytics(app: &App) {
    let analytics = match app.service.recent_analytics().await {
        Ok(analytics) => analytics,
        Err(error) => {
            println!("Failed to load analytics: {error}");
            return;
        }
    };
    println!("Total Words: {}", analytics.total_words);
    println!("Favorite Words: {}", analytics.favorite_count);
    println!("Avg. Searches: {:.1}", analytics.average_searches);
    println!(
        "Learning Streak: {} days",
        analytics.learning_streak(Local::now().date_naive())
    );
    if !analytics.category_breakdown.is_empty() {
        println!("Categories:");
        for (category, count) in &analytics.category_breakdown {
            println!("  - {category}: {count}");
        }
    }
}

async fn word_of_the_day(app: &App, run_now: bool) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    if run_now {
        match app.job.run_once_per_day(today).await {
            Ok(JobOutcome::Notified(_)) => {}
            Ok(JobOutcome::AlreadyRan) => println!("Today's word was already sent."),
            Ok(JobOutcome::Busy) => println!("The word of the day is being picked right now."),
            Err(error) => println!("{error}"),
        }
        return Ok(());
    }
    match app.service.word_of_the_day(today).await? {
        Some(record) => print_definition(&record),
        None => println!("No word of the day yet, try `wotd run`."),
    }
    Ok(())
}

async fn export_favorites(app: &App, path: Option<&str>) -> anyhow::Result<()> {
    let markdown = app.service.export_favorites().await?;
    match path {
        Some(path) => {
            tokio::fs::write(path, markdown).await?;
            println!("Exported favorites to {path}.");
        }
        None => println!("{markdown}"),
    }
    Ok(())
}

async fn remove_word(
    app: &App,
    word: &str,
    lines: &mut impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let Some(key) = normalize(word) else {
        println!("Usage: remove <word>");
        return Ok(());
    };
    let prompt = format!("Remove '{key}' and its history? (y/N): ");
    let answer = input(&prompt, lines, out)?.unwrap_or_default();
    if !str_to_bool(answer).unwrap_or(false) {
        return Ok(());
    }
    if app.service.storage().remove_word(&key).await? {
        println!("Deleted the word successfully.");
    } else {
        println!("This word is not saved.");
    }
    Ok(())
}

fn print_list(records: &[WordRecord]) {
    for record in records {
        let favorite = if record.is_favorite { "*" } else { " " };
        let difficulty = record
            .difficulty
            .map(|difficulty| difficulty.to_string())
            .unwrap_or_default();
        println!("{favorite} {:<20} {:<7} {}", record.word, difficulty, record.definition);
    }
}

fn print_definition(record: &WordRecord) {
    println!("Showing definition for '{}':", record.word);
    if let Some(pronunciation) = &record.pronunciation {
        println!("    {pronunciation}");
    }
    if let Some(part_of_speech) = &record.part_of_speech {
        println!("    {part_of_speech}:");
    }
    println!("        {}", record.definition);
    if let Some(example) = &record.example {
        println!("          example: {example}");
    }
    if let Some(synonyms) = &record.synonyms {
        println!("          synonyms: {synonyms}");
    }
    if let Some(etymology) = &record.etymology {
        println!("      origin: {etymology}");
    }
    let mut tags = Vec::new();
    if let Some(difficulty) = record.difficulty {
        tags.push(difficulty.to_string());
    }
    if let Some(category) = &record.category {
        tags.push(category.clone());
    }
    if record.is_favorite {
        tags.push("favorite".to_string());
    }
    if !tags.is_empty() {
        println!("      [{}]", tags.join(", "));
    }
}
