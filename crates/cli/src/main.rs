use crate::{
    env::EnvManager,
    error::CliError,
    output::PageView,
    shutdown::ShutdownCoordinator,
};
use clap::Parser;
use commands::Commands;
use engine_config::settings::Settings;
use engine_core::state::{KvStore, sled_store::SledKvStore};
use engine_runtime::{
    catalogue::Catalogue, error::CatalogueError, form::FilterForm, refresh::spawn_refresh,
};
use model::query::predicate::Predicate;
use std::{path::PathBuf, process::ExitCode, sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod env;
mod error;
mod output;
mod shutdown;

#[derive(Parser)]
#[command(name = "breedscope", version, about = "Browse, filter and sort cat breeds")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "Print results as JSON")]
    json: bool,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[arg(long, global = true, help = "Load variables from this .env file")]
    env_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Directory of the breed cache")]
    state_dir: Option<PathBuf>,

    #[arg(long, global = true, help = "Base URL of TheCatAPI")]
    api_url: Option<String>,

    #[arg(
        long,
        global = true,
        help = "Read breeds from a local JSON file instead of the API"
    )]
    fixture: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = if cli.verbose {
        EnvFilter::new(default_level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    let as_json = cli.json;
    // The field catalog is static; every other command needs the cache.
    let open = || -> Result<(Catalogue, Settings), CliError> {
        let settings = load_settings(cli)?;
        Ok((open_catalogue(&settings)?, settings))
    };

    match &cli.command {
        Commands::Fields => output::print_fields(as_json)?,
        Commands::Breeds => {
            let (mut catalogue, _) = open()?;
            catalogue.load().await?;
            output::print_breeds(&catalogue.breeds()?, as_json)?;
        }
        Commands::Show { id } => {
            let (catalogue, _) = open()?;
            let card = catalogue.show_breed(id).await?;
            output::print_card(&card, as_json)?;
        }
        Commands::List { page, all } => {
            let (mut catalogue, _) = open()?;
            catalogue.load().await?;
            catalogue.select_all()?;
            if *all {
                print_all_pages(&mut catalogue, as_json)?;
            } else {
                let view = page_view(&mut catalogue, *page)?;
                output::print_page(&view, &[], as_json)?;
            }
        }
        Commands::Filter {
            predicates,
            sort,
            page,
        } => {
            let (mut catalogue, _) = open()?;
            catalogue.load().await?;

            let mut form = FilterForm::new();
            for predicate in predicates {
                form.push(predicate)?;
            }

            match catalogue.apply_filters(&form.predicates()?) {
                Ok(_) => {}
                Err(CatalogueError::EmptyResult) => {
                    info!("No breeds match {}", describe(predicates));
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            }

            let mut columns = form.used_fields();
            if let Some(spec) = *sort {
                catalogue.apply_sort(spec)?;
                if !columns.contains(&spec.field) {
                    columns.push(spec.field);
                }
            }

            let view = page_view(&mut catalogue, *page)?;
            output::print_page(&view, &columns, as_json)?;
        }
        Commands::Sort { spec, page } => {
            let (mut catalogue, _) = open()?;
            catalogue.load().await?;
            catalogue.apply_sort(*spec)?;

            let view = page_view(&mut catalogue, *page)?;
            output::print_page(&view, &[spec.field], as_json)?;
        }
        Commands::Options { field } => {
            let (mut catalogue, _) = open()?;
            catalogue.load().await?;
            output::print_options(&catalogue.filter_options(*field)?, as_json)?;
        }
        Commands::Refresh => {
            let (mut catalogue, _) = open()?;
            let meta = catalogue.refresh().await?;
            output::print_refresh(&meta, as_json)?;
        }
        Commands::Watch { every } => {
            let (catalogue, settings) = open()?;
            let period = (*every)
                .map(Duration::from_secs)
                .unwrap_or(settings.refresh_period);
            watch(catalogue, period).await?;
        }
    }

    Ok(())
}

fn load_settings(cli: &Cli) -> Result<Settings, CliError> {
    let mut env = EnvManager::new();
    if let Some(path) = &cli.env_file {
        env.load_from_file(path)?;
    }

    let mut settings = Settings::from_env(&env.into_context())?;
    if let Some(dir) = &cli.state_dir {
        settings.state_dir = dir.clone();
    }
    if let Some(url) = &cli.api_url {
        settings.api_base_url = url.clone();
    }
    if let Some(path) = &cli.fixture {
        settings.fixture = Some(path.clone());
    }
    Ok(settings)
}

fn open_catalogue(settings: &Settings) -> Result<Catalogue, CliError> {
    debug!("Opening breed cache at {}", settings.state_dir.display());
    let store: Arc<dyn KvStore> = Arc::new(SledKvStore::open(&settings.state_dir)?);
    let source = settings.breed_source()?;
    Ok(Catalogue::new(store, source, settings.refresh_period))
}

/// Walks the active set from its first page to `page`.
fn page_view(catalogue: &mut Catalogue, page: usize) -> Result<PageView, CliError> {
    let mut records = catalogue.current_page()?;
    while catalogue.session().cursor() < page {
        match catalogue.next_page()? {
            Some(next) => records = next,
            None => {
                return Err(CliError::PageOutOfRange {
                    page,
                    total_pages: catalogue.active_meta()?.total_pages,
                });
            }
        }
    }

    let meta = catalogue.active_meta()?;
    Ok(PageView {
        set: catalogue.session().active_key().to_string(),
        page,
        total_pages: meta.total_pages,
        total_records: meta.total_records,
        has_next: catalogue.has_next_page()?,
        records,
    })
}

fn print_all_pages(catalogue: &mut Catalogue, as_json: bool) -> Result<(), CliError> {
    let mut page = 0;
    loop {
        let view = page_view(catalogue, page)?;
        let has_next = view.has_next;
        output::print_page(&view, &[], as_json)?;
        if !has_next {
            return Ok(());
        }
        page += 1;
    }
}

async fn watch(mut catalogue: Catalogue, period: Duration) -> Result<(), CliError> {
    catalogue.load().await?;

    let shutdown = ShutdownCoordinator::new(CancellationToken::new());
    shutdown.register_handlers();

    info!("Refreshing breeds every {}s; press Ctrl+C to stop", period.as_secs());
    let catalogue = Arc::new(Mutex::new(catalogue));
    let handle = spawn_refresh(catalogue, period, shutdown.cancel_token());
    handle.await?;

    if shutdown.is_shutdown_requested() {
        info!("Stopped watching");
    }
    Ok(())
}

fn describe(predicates: &[Predicate]) -> String {
    predicates
        .iter()
        .map(Predicate::to_string)
        .collect::<Vec<_>>()
        .join(" AND ")
}
