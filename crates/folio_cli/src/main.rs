use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use folio_core::{ArticleId, RecordStore, Result, DEFAULT_BASE_URL};
use folio_query::{queries, QueryCache, QueryConfig};
use folio_storage::{create_store, MemoryStore, StoreConfig, StoreKind};
use folio_views::{App, CreationForm, DetailView, Field, ListView, Painter, ViewConfig};
use std::io::IsTerminal;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod browse;
mod logging;

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse and write articles on a blog record store", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    client: ClientArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug)]
struct ClientArgs {
    /// Base URL of the record store
    #[arg(long, global = true, env = "FOLIO_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Request timeout in seconds
    #[arg(long, global = true, env = "FOLIO_TIMEOUT_SECS", default_value_t = 10)]
    timeout: u64,
    /// Disable colors (also honours NO_COLOR)
    #[arg(long, global = true)]
    no_color: bool,
    /// Header title
    #[arg(long, global = true, env = "FOLIO_BRAND", default_value = "Folio")]
    brand: String,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Show the article list
    List,
    /// Read one article
    Show {
        id: ArticleId,
    },
    /// Publish a new article
    Create {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Comma separated, e.g. "Technology, Design"
        #[arg(long, default_value = "")]
        categories: String,
        #[arg(long, default_value = "")]
        content: String,
        #[arg(long, default_value = "")]
        cover_image: String,
    },
    /// Interactive session: list, read and write articles
    Browse,
    /// Run a development record store
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,
        #[arg(long, default_value_t = 3001)]
        port: u16,
        /// json-server style seed file: {"blogs": [...]}
        #[arg(long)]
        seed: Option<PathBuf>,
    },
}

/// Store, cache and rendering settings shared by the client commands.
struct Client {
    store: Arc<dyn RecordStore>,
    cache: Arc<QueryCache>,
    view_config: ViewConfig,
    painter: Painter,
}

impl ClientArgs {
    fn color(&self) -> bool {
        !self.no_color && std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
    }

    fn store_config(&self) -> Result<StoreConfig> {
        Ok(StoreConfig::new(&self.base_url)?.with_timeout(Duration::from_secs(self.timeout)))
    }

    fn view_config(&self, store: &StoreConfig) -> ViewConfig {
        ViewConfig {
            color: self.color(),
            brand: self.brand.clone(),
            store_hint: store.authority(),
        }
    }

    fn connect(&self) -> Result<Client> {
        let store_config = self.store_config()?;
        let view_config = self.view_config(&store_config);
        Ok(Client {
            store: create_store(StoreKind::Http, store_config)?,
            cache: Arc::new(QueryCache::new(QueryConfig::default())),
            painter: Painter::new(view_config.color),
            view_config,
        })
    }
}

async fn serve(host: IpAddr, port: u16, seed: Option<PathBuf>) -> Result<()> {
    let store = match seed {
        Some(path) => {
            let json = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read seed file {}", path.display()))?;
            let store = MemoryStore::from_json(&json)?;
            info!("🌱 Seeded {} articles from {}", store.len().await, path.display());
            store
        }
        None => MemoryStore::new(),
    };
    let state = folio_web::AppState::new(Arc::new(store));
    folio_web::serve(SocketAddr::new(host, port), state).await
}

async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Serve { host, port, seed } => serve(host, port, seed).await?,
        Commands::List => {
            let client = cli.client.connect()?;
            let view = ListView::new(client.view_config.store_hint.clone());
            let state = queries::blogs(&client.cache, client.store.as_ref()).await;
            println!("{}", view.render(&view.content(&state, None), &client.painter));
        }
        Commands::Show { id } => {
            let client = cli.client.connect()?;
            let content = DetailView::load(&client.cache, client.store.as_ref(), Some(id)).await;
            println!("{}", DetailView::render(&content, &client.painter));
        }
        Commands::Create {
            title,
            description,
            categories,
            content,
            cover_image,
        } => {
            let client = cli.client.connect()?;
            let mut form = CreationForm::new();
            form.open();
            form.set(Field::Title, title);
            form.set(Field::Description, description);
            form.set(Field::Categories, categories);
            form.set(Field::Content, content);
            form.set(Field::CoverImage, cover_image);

            let (notification, created) = form
                .submit(client.store.as_ref(), &client.cache, Utc::now())
                .await;
            eprintln!("{}", notification.render(&client.painter));
            match created {
                Some(article) => println!("{}", article.id),
                None => return Ok(ExitCode::FAILURE),
            }
        }
        Commands::Browse => {
            let client = cli.client.connect()?;
            let app = App::new(client.store, client.cache, client.view_config);
            browse::run(app).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let default_level = match cli.command {
        Commands::Serve { .. } => "info",
        _ => "warn",
    };
    logging::init_logging(default_level);
    run(cli).await
}
