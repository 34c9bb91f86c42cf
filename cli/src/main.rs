mod collect;
mod filter;
mod lookup;

use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use job_collector::{
    spawn_worker, Collector, CollectorConfig, MessageHandler, Session, Settings,
};
use persistence::{FileSettingsStore, MongoSettingsStore};
use std::path::PathBuf;
use std::sync::Arc;

const DEFAULT_SETTINGS_PATH: &str = "job-collector-settings.json";

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Where filter config, last results and stats are kept
    #[arg(long, value_enum, default_value_t = Store::File)]
    store: Store,

    /// Settings file for `--store file`, falls back to JOB_COLLECTOR_SETTINGS_PATH
    #[arg(long)]
    settings_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Store {
    File,
    Mongo,
    Memory,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch jobs once with the stored filter and print them
    Collect {},
    /// Fetch jobs periodically until interrupted
    Watch {
        #[arg(long, default_value_t = 60)]
        minutes: u64,
    },
    /// Show or edit the stored filter
    #[command(subcommand)]
    Config(filter::ConfigCommand),
    /// Print the selectable filter codes
    Options {},
    /// Print the city list
    Cities {},
    /// Print the job taxonomy of a city
    Positions {
        #[arg(long)]
        city: Option<String>,
    },
    /// Extract job entries from a saved listing page
    PageData { file: PathBuf },
}

async fn open_settings(store: Store, settings_path: Option<PathBuf>) -> Settings {
    match store {
        Store::File => {
            let path = settings_path
                .or_else(|| std::env::var("JOB_COLLECTOR_SETTINGS_PATH").ok().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));
            log::info!("Using settings file {}", path.display());
            Settings::new(Arc::new(FileSettingsStore::new(path)))
        }
        Store::Mongo => {
            let mongodb_connection_url =
                std::env::var("MONGODB_CONNECTION_URL").expect("MONGODB_CONNECTION_URL not set");
            let database_name = std::env::var("DATABASE").expect("DATABASE not set");
            let store = MongoSettingsStore::connect(&mongodb_connection_url, &database_name)
                .await
                .expect("Failed to connect to MongoDB");
            Settings::new(Arc::new(store))
        }
        Store::Memory => Settings::in_memory(),
    }
}

fn collector() -> Collector {
    Collector::new(CollectorConfig::from_env()).expect("Failed to build HTTP client")
}

async fn open_session(store: Store, settings_path: Option<PathBuf>) -> Session {
    let settings = open_settings(store, settings_path).await;
    let worker = spawn_worker(MessageHandler::new(collector(), settings.clone()));
    Session::open(settings, worker)
        .await
        .expect("Failed to load stored settings")
}

async fn positions(store: Store, settings_path: Option<PathBuf>, city: Option<String>) -> Result<()> {
    let city = match city {
        Some(city) => city,
        None => lookup::stored_city(&open_settings(store, settings_path).await).await?,
    };
    lookup::positions(&collector(), &city).await;
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    let Cli {
        store,
        settings_path,
        command,
    } = Cli::parse();
    let result = match command {
        Commands::Collect {} => collect::collect(open_session(store, settings_path).await).await,
        Commands::Watch { minutes } => {
            collect::watch(open_session(store, settings_path).await, minutes).await
        }
        Commands::Config(command) => {
            filter::run(open_session(store, settings_path).await, command).await
        }
        Commands::Options {} => {
            lookup::options();
            Ok(())
        }
        Commands::Cities {} => {
            lookup::cities(&collector()).await;
            Ok(())
        }
        Commands::Positions { city } => positions(store, settings_path, city).await,
        Commands::PageData { file } => lookup::page_data(&file).await,
    };
    if let Err(e) = result {
        log::error!("{}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
