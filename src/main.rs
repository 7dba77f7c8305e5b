use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use short_architect::server::start_server;
use short_architect::ui::{self, Outcome, ScriptClient};
use short_architect::{Config, GeminiClient, Overrides};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "short-architect")]
#[command(about = "Generate faceless YouTube Short scripts with Gemini", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the script API (/api/short, /api/debug)
    Serve {
        #[command(flatten)]
        upstream: UpstreamArgs,

        /// Address to listen on
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Generate a single script through a running server
    Generate {
        /// Topic of the short
        #[arg(short, long)]
        topic: String,

        /// Base URL of the script server
        #[arg(short, long, default_value = "http://127.0.0.1:3000")]
        server: String,
    },

    /// Type topics one per line and see each script as it arrives
    Interactive {
        /// Base URL of the script server
        #[arg(short, long, default_value = "http://127.0.0.1:3000")]
        server: String,
    },

    /// Print the raw model listing from Gemini
    Models {
        #[command(flatten)]
        upstream: UpstreamArgs,
    },
}

#[derive(Args, Debug)]
struct UpstreamArgs {
    /// Gemini API key
    #[arg(long)]
    api_key: Option<String>,

    /// Gemini API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Model used for script generation
    #[arg(short, long)]
    model: Option<String>,

    /// Time limit for one generation call, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl UpstreamArgs {
    fn into_overrides(self, bind: Option<String>) -> Overrides {
        Overrides {
            api_key: self.api_key,
            base_url: self.base_url,
            model: self.model,
            timeout_secs: self.timeout_secs,
            bind,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载环境变量（RUST_LOG 也可以写在 .env 里）
    dotenvy::dotenv().ok();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .init();

    // 解析命令行参数
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { upstream, bind } => {
            let config = Config::resolve(upstream.into_overrides(bind))
                .context("Failed to load configuration")?;
            info!(
                "Using model {} with a {}s generation timeout",
                config.model,
                config.timeout.as_secs()
            );
            let client = GeminiClient::new(&config).context("Failed to create Gemini client")?;
            start_server(config.bind, client)
                .await
                .context("Server failed")?;
        }
        Commands::Generate { topic, server } => {
            let client = ScriptClient::new(server);
            let state = ui::run_once(&client, &topic).await?;
            if let Some(Outcome::Error(message)) = state.result() {
                error!("Script generation failed: {}", message);
                std::process::exit(1);
            }
        }
        Commands::Interactive { server } => {
            ui::run_interactive(ScriptClient::new(server)).await?;
        }
        Commands::Models { upstream } => {
            let config = Config::resolve(upstream.into_overrides(None))
                .context("Failed to load configuration")?;
            let client = GeminiClient::new(&config).context("Failed to create Gemini client")?;
            let listing = client
                .list_models()
                .await
                .context("Failed to list models")?;
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
    }

    Ok(())
}
