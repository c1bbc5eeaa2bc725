mod config;

use anyhow::{Context, Result, anyhow};
use catalog::{CatalogIndex, CatalogStore, CuratedMovie};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use config::AppConfig;
use curation::sweep::candidate_from_credits;
use curation::{CatalogFilter, CatalogSweep, InMemoryCurationCache, MovieCurator, PoolSource};
use game::{GameError, GameService, GuessOutcome, JsonFileRoundStore, RoundStatus, SessionId};
use provider::{MetadataProvider, StaticProvider, TmdbClient};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

/// Marquee - guess an actor's highest-grossing movies
#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Box-office trivia: name an actor's top-grossing movies before three strikes", long_about = None)]
struct Cli {
    /// Config file (defaults to ./marquee.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Catalog directory, overrides the config file
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Round state directory, overrides the config file
    #[arg(long)]
    sessions_dir: Option<PathBuf>,

    /// Debug logging for the marquee crates
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceArg {
    Popular,
    Trending,
}

impl From<SourceArg> for PoolSource {
    fn from(source: SourceArg) -> Self {
        match source {
            SourceArg::Popular => PoolSource::Popular,
            SourceArg::Trending => PoolSource::Trending,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Play a round in the terminal
    Play {
        /// Actor to play (random catalog actor if omitted)
        #[arg(long)]
        actor: Option<String>,

        /// Resume or name a session
        #[arg(long)]
        session: Option<String>,
    },

    /// Show the curated answer set for an actor
    Curate {
        actor: String,
    },

    /// Check whether an actor passes the English-language eligibility rule
    Eligible {
        actor: String,
    },

    /// Add popular actors to the catalog
    Sweep {
        #[arg(long, value_enum)]
        source: Option<SourceArg>,

        /// Popular-list pages to read
        #[arg(long)]
        pages: Option<u32>,

        #[arg(long)]
        pool_size: Option<usize>,
    },

    /// Remove actors that were not refreshed recently
    Prune {
        #[arg(long)]
        max_age_days: Option<i64>,
    },

    /// Print catalog statistics
    Stats,

    /// Search for movies by title
    Search {
        /// Case-insensitive substring of the title
        query: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "info,catalog=debug,provider=debug,curation=debug,game=debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.catalog.data_dir = data_dir;
    }
    if let Some(sessions_dir) = cli.sessions_dir {
        config.sessions.dir = sessions_dir;
    }

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Play { actor, session } => handle_play(&config, actor, session).await?,
        Commands::Curate { actor } => handle_curate(&config, &actor).await?,
        Commands::Eligible { actor } => handle_eligible(&config, &actor).await?,
        Commands::Sweep {
            source,
            pages,
            pool_size,
        } => {
            if let Some(source) = source {
                config.sweep.source = source.into();
            }
            if let Some(pages) = pages {
                config.sweep.pages = pages;
            }
            if let Some(pool_size) = pool_size {
                config.sweep.pool_size = pool_size;
            }
            handle_sweep(&config).await?
        }
        Commands::Prune { max_age_days } => {
            if let Some(days) = max_age_days {
                config.sweep.max_age_days = days;
            }
            handle_prune(&config)?
        }
        Commands::Stats => handle_stats(&config)?,
        Commands::Search { query } => handle_search(&config, &query).await?,
    }

    Ok(())
}

fn load_catalog(config: &AppConfig) -> Result<CatalogIndex> {
    let start = Instant::now();
    let catalog = CatalogIndex::load_or_empty(&config.catalog.data_dir).with_context(|| {
        format!("Failed to load catalog from {}", config.catalog.data_dir.display())
    })?;
    let (actors, movies, _) = catalog.counts();
    println!(
        "{} Loaded {} actors and {} movies in {:?}",
        "✓".green(),
        actors,
        movies,
        start.elapsed()
    );
    Ok(catalog)
}

/// TMDB client; fails when no access token is configured
fn tmdb_provider(config: &AppConfig) -> Result<Arc<dyn MetadataProvider>> {
    let client = TmdbClient::new(&config.tmdb).context("Cannot reach TMDB")?;
    Ok(Arc::new(client))
}

/// TMDB client, or an empty offline provider when no token is configured
fn provider_or_offline(config: &AppConfig) -> Arc<dyn MetadataProvider> {
    match TmdbClient::new(&config.tmdb) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            warn!("{}; running on the local catalog only", e);
            Arc::new(StaticProvider::new())
        }
    }
}

fn curator_for(config: &AppConfig, provider: Arc<dyn MetadataProvider>) -> MovieCurator {
    MovieCurator::new(provider).with_policy(config.curation.clone())
}

/// Handle the 'play' command
async fn handle_play(config: &AppConfig, actor: Option<String>, session: Option<String>) -> Result<()> {
    let catalog = Arc::new(load_catalog(config)?);
    let provider = provider_or_offline(config);
    let curator = Arc::new(
        curator_for(config, provider.clone()).with_cache(Arc::new(InMemoryCurationCache::default())),
    );
    let service = GameService::new(
        catalog,
        provider,
        Arc::new(JsonFileRoundStore::new(&config.sessions.dir)),
    )
    .with_curator(curator)
    .with_filter(Arc::new(CatalogFilter::from_policy(&config.eligibility)));

    let session = session.map(SessionId::new).unwrap_or_else(SessionId::generate);

    // resume an unfinished round unless a specific actor was asked for
    let resumable = match (&actor, service.progress(&session).await) {
        (None, Ok(progress)) if !progress.terminal => Some(progress),
        _ => None,
    };
    let (actor_name, answers_total) = match resumable {
        Some(progress) => {
            println!("Resuming session {}", session.as_str().cyan());
            for movie in &progress.guessed {
                println!("  {} {}", "✓".green(), format_movie(movie));
            }
            (progress.actor_name, progress.answers_total)
        }
        None => {
            let start = service.start_round(&session, actor.as_deref()).await?;
            println!("Session {}", session.as_str().cyan());
            (start.actor_name, start.answers_total)
        }
    };

    println!(
        "{}",
        format!("Name {}'s {} highest-grossing movies!", actor_name, answers_total)
            .bold()
            .blue()
    );
    println!("Type a movie id to guess, anything else to search, 'quit' to stop.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.eq_ignore_ascii_case("quit") {
            println!("Round saved. Resume with --session {}", session);
            return Ok(());
        }
        if input.is_empty() {
            continue;
        }

        if input.parse::<u32>().is_err() {
            let hits = service.search_movies(input).await?;
            if hits.is_empty() {
                println!("No movies match '{}'", input);
            }
            for hit in hits {
                println!("  {:>8}  {} ({})", hit.id.to_string().yellow(), hit.title, hit.year);
            }
            continue;
        }

        match service.submit_guess(&session, input).await {
            Ok(outcome) => {
                print_outcome(&outcome);
                if outcome.terminal {
                    return Ok(());
                }
            }
            Err(GameError::InvalidGuess(reason)) => println!("{} {}", "!".yellow(), reason),
            Err(e) => println!("{} {}", "✗".red(), e),
        }
    }
    Ok(())
}

fn format_movie(movie: &CuratedMovie) -> String {
    format!("{} ({}) - ${}", movie.title, movie.year_label(), movie.revenue)
}

fn print_outcome(outcome: &GuessOutcome) {
    if outcome.correct {
        println!("{} {}", "✓ Correct!".green().bold(), format_movie(&outcome.movie));
    } else {
        println!(
            "{} {} is not one of them ({}/{} strikes)",
            "✗".red().bold(),
            outcome.movie.title,
            outcome.strikes,
            game::MAX_STRIKES
        );
    }

    match outcome.status {
        RoundStatus::Won => {
            println!("{}", "You found them all!".green().bold());
            println!("Top box office: ${}", outcome.max_revenue);
        }
        RoundStatus::Lost => {
            println!("{}", "Three strikes, round over. The answers were:".red().bold());
            for (rank, movie) in outcome.revealed_answers.iter().flatten().enumerate() {
                println!("{}. {}", (rank + 1).to_string().green(), format_movie(movie));
            }
        }
        RoundStatus::Active => {}
    }
}

/// Handle the 'curate' command
async fn handle_curate(config: &AppConfig, actor: &str) -> Result<()> {
    let curator = curator_for(config, tmdb_provider(config)?);
    let answers = curator.curate(actor).await?;

    println!("{}", format!("Top movies for {}:", answers.actor_name()).bold().blue());
    if answers.is_empty() {
        println!("No qualifying movies");
    }
    for (rank, movie) in answers.movies().iter().enumerate() {
        println!(
            "{}. [{}] {}",
            (rank + 1).to_string().green(),
            movie.id,
            format_movie(movie)
        );
    }
    Ok(())
}

/// Handle the 'eligible' command
async fn handle_eligible(config: &AppConfig, actor: &str) -> Result<()> {
    let provider = tmdb_provider(config)?;
    let person = provider
        .find_person(actor)
        .await
        .with_context(|| format!("Failed to look up {}", actor))?;
    let credits = provider.movie_credits(person.id).await?;

    let candidate = candidate_from_credits(&person, &credits, config.eligibility.recent_sample_size);
    let filter = CatalogFilter::from_policy(&config.eligibility);
    let english_recent = candidate
        .recent_credit_languages
        .iter()
        .filter(|lang| lang.is_english())
        .count();

    println!("{}", person.name.bold().blue());
    println!("{}Movie credits: {}", "• ".cyan(), candidate.total_movie_credits);
    println!(
        "{}English among recent credits: {}/{}",
        "• ".cyan(),
        english_recent,
        candidate.recent_credit_languages.len()
    );
    if filter.is_candidate_eligible(&candidate) {
        println!("{} eligible", "✓".green());
    } else {
        println!("{} not eligible", "✗".red());
    }
    Ok(())
}

/// Handle the 'sweep' command
async fn handle_sweep(config: &AppConfig) -> Result<()> {
    let mut catalog = load_catalog(config)?;
    let provider = tmdb_provider(config)?;
    let sweep = CatalogSweep::new(
        provider.clone(),
        CatalogFilter::from_policy(&config.eligibility),
        curator_for(config, provider),
        config.sweep.clone(),
    );

    let start = Instant::now();
    let report = sweep.run(&mut catalog).await;
    catalog
        .write_to_dir(&config.catalog.data_dir)
        .context("Failed to save catalog")?;

    println!("{}", format!("Sweep finished in {:?}", start.elapsed()).bold().blue());
    println!("{}Considered: {}", "• ".cyan(), report.considered);
    println!("{}Admitted: {}", "• ".green(), report.admitted.len());
    println!("{}Not eligible: {}", "• ".yellow(), report.ineligible.len());
    println!("{}New movies: {}", "• ".cyan(), report.movies_added);
    println!("{}Pruned as outdated: {}", "• ".yellow(), report.pruned.len());
    for (name, error) in &report.failed {
        println!("{}{}: {}", "• ".red(), name, error);
    }
    Ok(())
}

/// Handle the 'prune' command
fn handle_prune(config: &AppConfig) -> Result<()> {
    let mut catalog = load_catalog(config)?;
    let removed = catalog.prune_older_than_days(config.sweep.max_age_days);
    catalog
        .write_to_dir(&config.catalog.data_dir)
        .context("Failed to save catalog")?;

    println!(
        "Removed {} actors not refreshed in {} days",
        removed.len(),
        config.sweep.max_age_days
    );
    for actor in removed {
        println!("  - {}", actor.name);
    }
    Ok(())
}

/// Handle the 'stats' command
fn handle_stats(config: &AppConfig) -> Result<()> {
    let catalog = load_catalog(config)?;
    let stats = catalog.stats();

    println!("{}", "Catalog".bold().blue());
    println!("{}Actors: {}", "• ".green(), stats.actors);
    println!("{}Movies: {}", "• ".green(), stats.movies);
    println!("{}Actors with movies: {}", "• ".green(), stats.actors_with_movies);
    println!("{}Appearances: {}", "• ".green(), stats.appearances);
    Ok(())
}

/// Handle the 'search' command
async fn handle_search(config: &AppConfig, query: &str) -> Result<()> {
    let catalog: Arc<dyn CatalogStore> = Arc::new(load_catalog(config)?);
    let resolver = game::MovieResolver::new(catalog, provider_or_offline(config));

    let hits = resolver.search(query).await?;
    if hits.is_empty() {
        return Err(anyhow!("No movies match '{}'", query));
    }

    println!("{}", format!("Search results for '{}':", query).bold().blue());
    for hit in hits {
        println!("{}: {} ({})", hit.id, hit.title, hit.year);
    }
    Ok(())
}
