use clap::{Parser, Subcommand};
use dialoguer::{Input, Select};
use podcast_directory::{
    Browser, BrowserAction, Config, ConfigLayer, GENRES, LoadEvent, SortKey, open_directory,
    render_controls, render_detail, render_header, render_page, validate_genre_filter,
};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a JSON config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Root URL of the podcast API
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Number of shows per page
    #[arg(long, global = true)]
    page_size: Option<usize>,

    /// HTTP request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Enable diagnostic logging on stderr (honours RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Browse the catalog interactively (default)
    Browse,

    /// Print one page of shows
    List {
        /// Only shows whose title contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Only shows with this genre id (see `genres`)
        #[arg(short, long)]
        genre: Option<u32>,

        /// Sort by 'title' or 'date'
        #[arg(long, default_value = "title")]
        sort: SortKey,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Page to print
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Print the details of a single show
    Show {
        /// Show id
        id: String,
    },

    /// Print the genre table
    Genres,
}

impl Cli {
    fn overrides(&self) -> ConfigLayer {
        ConfigLayer {
            api_base_url: self.api_url.clone(),
            page_size: self.page_size,
            request_timeout_secs: self.timeout,
            verbose: self.verbose.then_some(true),
        }
    }
}

/// Installs the stderr log subscriber when logging is enabled
fn init_logging(verbose: bool) {
    if !verbose {
        return;
    }
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("podcast_directory=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Handles load progress events and prints them to stderr
fn handle_load_event(event: LoadEvent) {
    match event {
        LoadEvent::FetchingShows => {
            eprintln!("Fetching podcast catalog...");
        }
        LoadEvent::ShowsFetched { count } => {
            eprintln!("Found {} show(s)", count);
        }
        LoadEvent::FetchingSeasons { count } => {
            eprintln!("Resolving seasons for {} show(s)...", count);
        }
        LoadEvent::SeasonsResolved { .. } => {}
        LoadEvent::Complete {
            show_count,
            summary,
        } => {
            if summary.defaulted > 0 {
                eprintln!(
                    "Catalog ready: {} show(s), {} without season data\n",
                    show_count, summary.defaulted
                );
            } else {
                eprintln!("Catalog ready: {} show(s)\n", show_count);
            }
        }
    }
}

fn print_current_page(browser: &Browser) {
    println!("{}", render_controls(browser.query(), browser.page(), GENRES));
    println!();
    println!("{}", render_page(browser.page(), GENRES));
    println!();
}

/// Entries of the interactive main menu
enum MenuEntry {
    Open(usize),
    Search,
    Genre,
    Sort,
    ToggleDirection,
    NextPage,
    PreviousPage,
    Quit,
}

fn main_menu(browser: &Browser) -> Vec<(MenuEntry, String)> {
    let page = browser.page();
    let mut entries: Vec<(MenuEntry, String)> = page
        .shows
        .iter()
        .enumerate()
        .map(|(index, show)| (MenuEntry::Open(index), format!("Open: {}", show.title)))
        .collect();

    entries.push((MenuEntry::Search, "Search...".to_string()));
    entries.push((MenuEntry::Genre, "Filter by genre...".to_string()));
    entries.push((MenuEntry::Sort, "Sort by...".to_string()));
    entries.push((
        MenuEntry::ToggleDirection,
        format!(
            "Toggle direction (currently {})",
            browser.query().sort_direction()
        ),
    ));
    if page.page < page.total_pages {
        entries.push((MenuEntry::NextPage, "Next page".to_string()));
    }
    if page.page > 1 {
        entries.push((MenuEntry::PreviousPage, "Previous page".to_string()));
    }
    entries.push((MenuEntry::Quit, "Quit".to_string()));
    entries
}

/// Runs the interactive browsing loop until the user quits
fn run_interactive(mut browser: Browser) -> Result<(), dialoguer::Error> {
    println!("{}\n", render_header());

    loop {
        print_current_page(&browser);

        let entries = main_menu(&browser);
        let labels: Vec<&String> = entries.iter().map(|(_, label)| label).collect();
        let Some(choice) = Select::new()
            .with_prompt("What next?")
            .items(&labels)
            .default(0)
            .interact_opt()?
        else {
            return Ok(());
        };

        let Some((entry, _)) = entries.into_iter().nth(choice) else {
            continue;
        };

        match entry {
            MenuEntry::Open(index) => {
                browser.apply(BrowserAction::Open(index));
                if let Some(show) = browser.selected() {
                    println!("\n{}\n", render_detail(show, GENRES));
                    Select::new()
                        .with_prompt("Detail view")
                        .items(&["Back to list"])
                        .default(0)
                        .interact_opt()?;
                }
                browser.apply(BrowserAction::CloseDetail);
            }
            MenuEntry::Search => {
                let text: String = Input::new()
                    .with_prompt("Search titles (empty for all)")
                    .with_initial_text(browser.query().search_text())
                    .allow_empty(true)
                    .interact_text()?;
                browser.apply(BrowserAction::Search(text));
            }
            MenuEntry::Genre => {
                let mut labels = vec!["All Genres".to_string()];
                labels.extend(GENRES.iter().map(|genre| genre.title.to_string()));
                let current = browser
                    .query()
                    .genre()
                    .and_then(|id| GENRES.iter().position(|genre| genre.id == id))
                    .map_or(0, |position| position + 1);

                if let Some(choice) = Select::new()
                    .with_prompt("Genre")
                    .items(&labels)
                    .default(current)
                    .interact_opt()?
                {
                    let genre = choice
                        .checked_sub(1)
                        .and_then(|position| GENRES.get(position))
                        .map(|genre| genre.id);
                    browser.apply(BrowserAction::FilterGenre(genre));
                }
            }
            MenuEntry::Sort => {
                let keys = [SortKey::Title, SortKey::Date];
                let labels: Vec<String> = keys.iter().map(|key| key.to_string()).collect();
                let current = keys
                    .iter()
                    .position(|key| *key == browser.query().sort_key())
                    .unwrap_or(0);

                let choice = Select::new()
                    .with_prompt("Sort by")
                    .items(&labels)
                    .default(current)
                    .interact_opt()?;
                if let Some(key) = choice.and_then(|choice| keys.get(choice)) {
                    browser.apply(BrowserAction::SortBy(*key));
                }
            }
            MenuEntry::ToggleDirection => browser.apply(BrowserAction::ToggleDirection),
            MenuEntry::NextPage => browser.apply(BrowserAction::NextPage),
            MenuEntry::PreviousPage => browser.apply(BrowserAction::PreviousPage),
            MenuEntry::Quit => return Ok(()),
        }
    }
}

fn print_genres() {
    println!("=== Genres ===");
    for genre in GENRES {
        println!("{:>3}  {}", genre.id, genre.title);
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref(), &cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    init_logging(config.verbose);

    let command = cli.command.unwrap_or(Command::Browse);
    if let Command::Genres = command {
        print_genres();
        return;
    }
    if let Command::List { genre, .. } = &command {
        if let Err(e) = validate_genre_filter(*genre, GENRES) {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }

    let mut browser = match open_directory(&config, handle_load_event).await {
        Ok(browser) => browser,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match command {
        Command::Browse | Command::Genres => {
            if let Err(e) = run_interactive(browser) {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        Command::List {
            search,
            genre,
            sort,
            desc,
            page,
        } => {
            if let Some(text) = search {
                browser.apply(BrowserAction::Search(text));
            }
            browser.apply(BrowserAction::FilterGenre(genre));
            browser.apply(BrowserAction::SortBy(sort));
            if desc {
                browser.apply(BrowserAction::ToggleDirection);
            }
            browser.apply(BrowserAction::GoToPage(page));

            print_current_page(&browser);
        }
        Command::Show { id } => {
            if !browser.open_by_id(&id) {
                eprintln!("Error: No show with id '{}' in the catalog", id);
                process::exit(1);
            }
            if let Some(show) = browser.selected() {
                println!("{}", render_detail(show, GENRES));
            }
        }
    }
}
