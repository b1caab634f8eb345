use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use aid_core_sdk::{
    config::ProviderConfig,
    scorer::{self, Platform},
    server, telemetry,
    tools::{
        self,
        chat::{Chat, ChatMode, ChatRequest},
        ToolContext,
    },
};

/**
 * \brief CLI entry point for the AI.D core service.
 */
#[derive(Parser, Debug)]
#[command(name = "aid", version, about = "AI.D Core API: marketing tools on top of an LLM")]
struct Cli {
    /** \brief Emit logs as JSON lines. */
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /**
     * \brief Start the HTTP service.
     */
    Serve {
        #[arg(long, default_value = "0.0.0.0:8000")]
        addr: String,
    },

    /**
     * \brief Score a hook with the stop-scroll heuristic (no model call).
     */
    Score {
        #[arg(long)]
        text: String,
        #[arg(long, default_value = "instagram")]
        platform: Platform,
    },

    /**
     * \brief Send one message through the `/chat` pipeline and print the reply.
     */
    Chat {
        #[arg(long)]
        message: String,
        #[arg(long, value_enum, default_value_t = ModeArg::Adai)]
        mode: ModeArg,
        #[arg(long)]
        language: Option<String>,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Adai,
    External,
}

impl From<ModeArg> for ChatMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Adai => ChatMode::Adai,
            ModeArg::External => ChatMode::External,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.json_logs);

    match cli.command {
        Commands::Serve { addr } => {
            let ctx = build_context()?;
            if let Err(err) = server::run(&addr, ctx).await {
                telemetry::log_error("server", &format!("{:#}", err));
                return Err(err);
            }
        }
        Commands::Score { text, platform } => {
            let result = scorer::score_hook(&text, platform);
            println!(
                "{}",
                serde_json::to_string_pretty(&result).context("encode score failed")?
            );
        }
        Commands::Chat {
            message,
            mode,
            language,
        } => {
            let ctx = build_context()?;
            if !ctx.config.is_configured() {
                tracing::warn!("no model backend configured, answering in basic mode");
            }
            let req = ChatRequest {
                message,
                mode: mode.into(),
                language,
            };
            let resp = tools::run::<Chat>(&ctx, &req).await;
            println!("{}", resp.reply);
        }
    }

    Ok(())
}

fn build_context() -> Result<ToolContext> {
    let config = ProviderConfig::from_env().context("load provider config failed")?;
    ToolContext::from_config(config).context("build http client failed")
}
