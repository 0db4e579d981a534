use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use dotenv::dotenv;
use log::{info, warn};

use pixel_quiz::data::{BadgeStore, DEFAULT_BADGES_PATH};
use pixel_quiz::providers::{OpenRouterClient, DEFAULT_MODEL};
use pixel_quiz::{runtime, App, Catalog, EmojiTable, GameConfig, JsonBadgeStore, ModeKind, PixelQuizError, ProviderError};

const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Classic,
    Emoji,
    RapidFire,
}

impl From<Mode> for ModeKind {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Classic => ModeKind::Classic,
            Mode::Emoji => ModeKind::Emoji,
            Mode::RapidFire => ModeKind::RapidFire,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Mode selected on the home screen
    #[arg(short, long, value_enum, default_value_t = Mode::Classic)]
    mode: Mode,

    /// JSON file with timing and scoring overrides
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON file with emoji genre and keyword tables
    #[arg(long)]
    emoji_table: Option<PathBuf>,

    /// Where saved badges are kept
    #[arg(short, long, default_value = DEFAULT_BADGES_PATH)]
    badges: PathBuf,

    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true)]
    tmdb_key: Option<String>,

    #[arg(long, env = "RAWG_API_KEY", hide_env_values = true)]
    rawg_key: Option<String>,

    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    openrouter_key: Option<String>,

    #[arg(long, env = "OPENROUTER_MODEL", default_value = DEFAULT_MODEL)]
    openrouter_model: String,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    pretty_env_logger::init();

    let args = Args::parse();
    if let Err(e) = play(args) {
        eprintln!("Error running pixel quiz: {}", e);
        std::process::exit(1);
    }
}

fn play(args: Args) -> Result<(), PixelQuizError> {
    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let emoji_table = match &args.emoji_table {
        Some(path) => EmojiTable::load(path)?,
        None => EmojiTable::default(),
    };

    let http = reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(ProviderError::from)?;
    let catalog = Catalog::from_keys(http.clone(), args.tmdb_key, args.rawg_key);

    let generator = match args.openrouter_key.filter(|key| !key.trim().is_empty()) {
        Some(key) => Some(OpenRouterClient::new(http, key, args.openrouter_model)),
        None => {
            warn!("OPENROUTER_API_KEY not set, questions will use fallback trivia");
            None
        }
    };

    let store = JsonBadgeStore::new(&args.badges);
    let badges = store.load();
    info!("loaded {} saved badges from {}", badges.len(), store.path().display());

    let mut app = App::new(config, emoji_table, badges);
    app.set_mode(args.mode.into());
    runtime::run(&mut app, catalog, generator, store)
}
