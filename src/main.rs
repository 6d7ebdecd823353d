use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use snippub::Config;

/// snippub — self-hosted snippet publishing server.
#[derive(Parser, Debug)]
#[command(name = "snippub")]
#[command(about = "Publish short markdown/HTML entries under random slugs", long_about = None)]
struct Args {
    /// Path to .env file (optional).
    #[arg(long, env = "DOTENV_PATH", default_value = ".env")]
    dotenv: String,

    /// Override the bind address, e.g. 127.0.0.1:9090.
    #[arg(long)]
    bind: Option<String>,

    /// Override the content directory path.
    #[arg(long)]
    content_dir: Option<PathBuf>,

    /// Override the admin password (for development only).
    #[arg(long)]
    admin_password: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if std::path::Path::new(&args.dotenv).exists() {
        dotenvy::from_path(&args.dotenv)?;
    }

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Environment first, flags win.
    let mut config = Config::from_env();
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(dir) = args.content_dir {
        config.content_dir = dir;
    }
    if let Some(password) = args.admin_password {
        config.admin_password = password;
    }
    config.validate()?;

    snippub::serve(config).await
}
