use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "wordbook", about = "Look up words, keep the ones you like, get a word every day")]
pub struct Config {
    /// SQLite database holding saved words
    #[arg(long, default_value = "sqlite://wordbook.db")]
    pub database_url: String,
    /// Dictionary endpoint, the word is appended as the last path segment
    #[arg(long, default_value = dictionary::DICTIONARY_API_URL)]
    pub api_url: String,
    /// Local hour at which the word of the day is sent
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u32).range(0..24))]
    pub notify_hour: u32,
    /// Do not schedule the daily word of the day
    #[arg(long)]
    pub no_schedule: bool,
    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
