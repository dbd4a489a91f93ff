use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tagsync::cli::{
    CommonArgs, open_bootstrapped, run_check, run_info, run_lookup, run_suggest, run_update,
};
use tagsync::server::create_router;

#[derive(Parser)]
#[command(name = "tagsync")]
#[command(about = "Keeps a local tag-translation database in sync", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load tag data and serve the control API
    Serve {
        #[command(flatten)]
        common: CommonArgs,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long, short)]
        port: Option<u16>,

        /// Download the latest database right after startup
        #[arg(long)]
        update_on_start: bool,
    },

    /// Download and apply the latest tag database
    Update {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Compare the stored version with the latest release
    Check {
        #[command(flatten)]
        common: CommonArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the translated name of a tag (`namespace:key`, or a bare misc key)
    Lookup {
        #[command(flatten)]
        common: CommonArgs,

        tag: String,
    },

    /// Search the tag list
    Suggest {
        #[command(flatten)]
        common: CommonArgs,

        query: String,

        /// Maximum number of results
        #[arg(long, short, default_value = "5")]
        limit: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show stored database metadata
    Info {
        #[command(flatten)]
        common: CommonArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("tagsync=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            common,
            host,
            port,
            update_on_start,
        } => {
            let mut config = common.load_config()?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            let addr = config.socket_addr()?;

            let ctx = open_bootstrapped(config).await?;
            if update_on_start {
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    let _ = ctx.update_database().await;
                });
            }

            let app = create_router(ctx);

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
        Commands::Update { common } => run_update(common.load_config()?).await?,
        Commands::Check { common, json } => run_check(common.load_config()?, json).await?,
        Commands::Lookup { common, tag } => run_lookup(common.load_config()?, tag).await?,
        Commands::Suggest {
            common,
            query,
            limit,
            json,
        } => run_suggest(common.load_config()?, query, limit, json).await?,
        Commands::Info { common, json } => run_info(common.load_config()?, json).await?,
    }

    Ok(())
}
