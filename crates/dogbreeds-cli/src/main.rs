//! dogbreeds CLI: browse dog breeds and manage favorite images

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand};
use crossbeam_channel::{unbounded, Receiver};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use dogbreeds::app::{AppCommand, AppController, AppEvent, AppSnapshot, ViewState};
use dogbreeds::config::gateway::DOG_CEO_DEFAULT_SERVER;
use dogbreeds::data::{BreedImage, FavoritesStore, FileStore};
use dogbreeds::gateway::{BreedGateway, DogCeoGateway};
use dogbreeds::sync::reconcile;

/// Maximum rows printed for one list
const MAX_ROWS: usize = 25;

#[derive(Parser)]
#[command(name = "dogbreeds", about = "Browse dog breeds and favorite images", version)]
struct Cli {
    /// API root of the breed service
    #[arg(long, global = true, default_value = DOG_CEO_DEFAULT_SERVER)]
    server: String,

    /// Directory for stored favorites (defaults to the user config dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all breeds
    Breeds {
        /// Only show breeds containing this text
        #[arg(short, long)]
        query: Option<String>,
    },
    /// List images of a breed, marking favorites
    Images {
        breed: String,
        /// Only show images whose breed contains this text
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Manage favorite images
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Interactive session
    Shell,
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorite images
    List,
    /// Add or remove one image
    Toggle { breed: String, url: String },
    /// Breeds that have favorites
    Breeds,
    /// Remove all favorites
    Clear,
}

/// Log level used when `RUST_LOG` is not set
fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn open_favorites(data_dir: Option<PathBuf>) -> Result<FavoritesStore, Box<dyn Error>> {
    let store = match data_dir {
        Some(dir) => FileStore::at(dir),
        None => FileStore::new()?,
    };
    debug!(dir = ?store.dir(), "favorites location");
    Ok(FavoritesStore::new(Arc::new(store)))
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let favorites = open_favorites(cli.data_dir)?;

    match cli.command {
        Command::Breeds { query } => {
            let gateway = DogCeoGateway::with_base_url(&cli.server)?;
            let breeds = reconcile::project_breeds(gateway.list_breeds()?);
            let breeds = reconcile::filter(&breeds, query.as_deref().unwrap_or_default());
            for breed in &breeds {
                if breed.subtypes.is_empty() {
                    println!("{}", breed.name);
                } else {
                    println!("{} ({})", breed.name, breed.subtypes.join(", "));
                }
            }
        }
        Command::Images { breed, query } => {
            let gateway = DogCeoGateway::with_base_url(&cli.server)?;
            let urls = gateway.list_images(&breed)?;
            let images = reconcile::project_images(urls, &breed, &favorites.snapshot());
            let images = reconcile::filter(&images, query.as_deref().unwrap_or_default());
            if images.is_empty() {
                eprintln!("No images for {breed}");
            }
            print_images(&images, usize::MAX);
        }
        Command::Favorites { action } => match action {
            FavoritesAction::List => print_images(&favorites.favorite_breeds(), usize::MAX),
            FavoritesAction::Toggle { breed, url } => {
                let now_favorite = favorites.toggle(&BreedImage::new(breed, url))?;
                println!("{}", if now_favorite { "added" } else { "removed" });
            }
            FavoritesAction::Breeds => {
                for name in reconcile::unique_breed_names(&favorites.favorite_breeds()) {
                    println!("{}", name.display_name());
                }
            }
            FavoritesAction::Clear => favorites.clear()?,
        },
        Command::Shell => {
            let gateway = DogCeoGateway::with_base_url(&cli.server)?;
            run_shell(Arc::new(gateway), favorites)?;
        }
    }

    Ok(())
}

fn print_images(images: &[BreedImage], limit: usize) {
    for (i, image) in images.iter().take(limit).enumerate() {
        let mark = if image.selected { '*' } else { ' ' };
        println!("{:>3} [{mark}] {} {}", i + 1, image.breed, image.url);
    }
    if images.len() > limit {
        println!("    ... {} more", images.len() - limit);
    }
}

// =============================================================================
// Interactive shell
// =============================================================================

const SHELL_HELP: &str = "\
commands:
  breeds             reload the breed list
  open <breed>       show images of a breed
  favorites          show favorite images
  search [text]      filter the current list
  like <n>           toggle favorite of row n
  filter [n|clear]   list breed filters, pick one, or clear it
  retry              re-run the oldest failed request
  back               return to the breed list
  quit";

fn run_shell(
    gateway: Arc<dyn BreedGateway>,
    favorites: FavoritesStore,
) -> Result<(), Box<dyn Error>> {
    let (cmd_tx, cmd_rx) = unbounded();
    let (event_tx, event_rx) = unbounded();
    let shared_state = Arc::new(Mutex::new(AppSnapshot::default()));

    let ctrl_state = Arc::clone(&shared_state);
    let ctrl_tx = cmd_tx.clone();
    let controller = std::thread::Builder::new()
        .name("controller".into())
        .spawn(move || {
            let mut ctrl =
                AppController::new(cmd_rx, ctrl_tx, event_tx, ctrl_state, gateway, favorites);
            ctrl.run();
        })?;

    let render_state = Arc::clone(&shared_state);
    std::thread::Builder::new()
        .name("render".into())
        .spawn(move || render_events(event_rx, render_state))?;

    println!("{SHELL_HELP}");
    cmd_tx.send(AppCommand::LoadBreeds)?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let mut words = line.split_whitespace();
        let Some(word) = words.next() else { continue };
        let rest = words.collect::<Vec<_>>().join(" ");

        let cmd = match (word, rest.as_str()) {
            ("quit" | "exit", _) => break,
            ("breeds", _) => AppCommand::LoadBreeds,
            ("open", "") => {
                println!("usage: open <breed>");
                continue;
            }
            ("open", breed) => AppCommand::OpenBreed(breed.to_lowercase()),
            ("favorites", _) => AppCommand::OpenFavorites,
            ("search", query) => AppCommand::Search(query.to_string()),
            ("like", n) => match parse_row(n) {
                Some(index) => AppCommand::ToggleFavorite(index),
                None => {
                    println!("usage: like <row>");
                    continue;
                }
            },
            ("filter", "") => AppCommand::ShowBreedFilter,
            ("filter", "clear") => AppCommand::ClearBreedFilter,
            ("filter", n) => match parse_row(n) {
                Some(index) => AppCommand::SelectBreedFilter(index),
                None => {
                    println!("usage: filter [row|clear]");
                    continue;
                }
            },
            ("retry", _) => AppCommand::Retry,
            ("back", _) => AppCommand::Dismiss,
            _ => {
                println!("{SHELL_HELP}");
                continue;
            }
        };
        cmd_tx.send(cmd)?;
    }

    cmd_tx.send(AppCommand::Shutdown)?;
    let _ = controller.join();
    Ok(())
}

/// Parse a 1-based row number into an index
fn parse_row(text: &str) -> Option<usize> {
    text.parse::<usize>().ok()?.checked_sub(1)
}

fn render_events(events: Receiver<AppEvent>, state: Arc<Mutex<AppSnapshot>>) {
    let mut last_rendered: Option<String> = None;
    for event in events {
        match event {
            AppEvent::ViewUpdated => {
                let snapshot = state.lock().unwrap_or_else(|e| e.into_inner()).clone();
                let frame = render(&snapshot);
                // Skip frames identical to the last one
                if last_rendered.as_deref() != Some(frame.as_str()) {
                    print!("{frame}");
                    let _ = io::stdout().flush();
                    last_rendered = Some(frame);
                }
            }
            AppEvent::TitleChanged(title) => println!("== {title} =="),
            AppEvent::ShowError(message) => println!("error: {message} (type 'retry')"),
            AppEvent::Dismissed { selected } => {
                if !selected.is_empty() {
                    println!("{} liked image(s) on that screen", selected.len());
                }
            }
        }
    }
}

fn render(snapshot: &AppSnapshot) -> String {
    let mut out = String::new();
    if !snapshot.query.is_empty() {
        out.push_str(&format!("(search: {})\n", snapshot.query));
    }
    match &snapshot.view {
        ViewState::Loading => out.push_str("loading...\n"),
        ViewState::Error(message) => out.push_str(&format!("unavailable: {message}\n")),
        ViewState::Breeds(breeds) => {
            for breed in breeds.iter().take(MAX_ROWS) {
                out.push_str(&format!("  {}\n", breed.name));
            }
            if breeds.len() > MAX_ROWS {
                out.push_str(&format!("  ... {} more (use search)\n", breeds.len() - MAX_ROWS));
            }
        }
        ViewState::Images(images) => {
            for (i, image) in images.iter().take(MAX_ROWS).enumerate() {
                let mark = if image.selected { '*' } else { ' ' };
                out.push_str(&format!("{:>3} [{mark}] {}\n", i + 1, image.url));
            }
            if images.len() > MAX_ROWS {
                out.push_str(&format!("    ... {} more\n", images.len() - MAX_ROWS));
            }
        }
    }
    if !snapshot.breed_filter.is_empty() {
        let names: Vec<String> = snapshot
            .breed_filter
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let mark = if n.selected { "*" } else { "" };
                format!("{}:{}{mark}", i + 1, n.display_name())
            })
            .collect();
        out.push_str(&format!("filters: {}\n", names.join("  ")));
    }
    if snapshot.can_retry() {
        out.push_str(&format!("{} request(s) waiting for retry\n", snapshot.pending_retries.len()));
    }
    out
}
