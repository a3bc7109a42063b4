use std::path::PathBuf;

use clap::{Parser, Subcommand};

use typed_kv::config::Config;
use typed_kv::{FlushPolicy, KvError, KvStore, Result, subscriber};

#[derive(Parser)]
#[command(name = "typed-kv")]
#[command(about = "Store and fetch JSON values in an embedded typed key-value store")]
struct Cli {
    /// Configuration file (defaults to ./typed-kv.toml when present)
    #[arg(long, env = "TYPED_KV_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Store path, overriding the configuration file
    #[arg(long, env = "TYPED_KV_PATH", global = true)]
    path: Option<PathBuf>,

    /// Flush policy, overriding the configuration file
    #[arg(long, value_enum, global = true)]
    flush_policy: Option<FlushPolicy>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a JSON value under a key
    Put {
        key: String,

        /// JSON-encoded value (`null` is rejected)
        value: String,
    },

    /// Print the JSON value stored under a key
    Get { key: String },

    /// Delete a key
    Delete { key: String },

    /// Print whether a key exists
    Exists { key: String },

    /// List keys, optionally only those with a prefix
    Keys {
        #[arg(long)]
        prefix: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = cli.path {
        config.store.path = path;
    }
    if let Some(policy) = cli.flush_policy {
        config.store.flush_policy = policy;
    }

    subscriber::init(&config.logging)?;
    tracing::debug!(path = %config.store.path.display(), "starting");

    let store = KvStore::open_with(&config.store.path, &config.store.options())?;

    match cli.command {
        Commands::Put { key, value } => {
            let value: serde_json::Value = serde_json::from_str(&value)?;
            store.put(&key, &value)?;
        }
        Commands::Get { key } => {
            let value: serde_json::Value = store.get(&key)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Commands::Delete { key } => {
            store.delete(&key)?;
        }
        Commands::Exists { key } => {
            println!("{}", store.contains_key(&key)?);
        }
        Commands::Keys { prefix } => {
            store.scan(prefix.unwrap_or_default(), |key| {
                println!("{}", String::from_utf8_lossy(key));
                Ok::<_, KvError>(())
            })?;
        }
    }

    store.close()?;
    Ok(())
}
