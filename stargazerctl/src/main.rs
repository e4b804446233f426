use std::{process::ExitCode, time::Duration};

use clap::Parser;
use stargazer_core::{
    DEFAULT_GITHUB_API_URL, DEFAULT_WORKERS, GithubCredential, GithubSettings,
};
use stargazerctl::{
    ClientError, DirectOptions, StarsClient, USAGE, render_table,
    resolve_direct, validate_repos, validate_server_url,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "stargazerctl", version)]
#[command(about = "Look up GitHub star counts for one or more repositories")]
struct Cli {
    /// Stargazer server base URL
    #[arg(long, env = "STARGAZER_SERVER")]
    server: Option<String>,

    /// Resolve against GitHub directly instead of calling a server
    #[arg(long)]
    direct: bool,

    /// GitHub API base URL used by --direct
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_GITHUB_API_URL)]
    github_api_url: String,

    /// GitHub token used by --direct
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// Concurrent lookups used by --direct
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// Deadline for the server call, or for each lookup with --direct
    /// (e.g. 10s, 1m)
    #[arg(long, default_value = "10s", value_parser = humantime::parse_duration)]
    timeout: Duration,

    /// Repositories as <namespace>/<name>
    repos: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err @ ClientError::InvalidRepos(_)) => {
            println!("{err}");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("Error: {:#}", anyhow::Error::from(err));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String, ClientError> {
    if cli.repos.is_empty() {
        return Ok(USAGE.to_string());
    }

    validate_repos(&cli.repos)?;

    let response = if cli.direct {
        let options = DirectOptions {
            github: GithubSettings {
                api_url: cli.github_api_url,
                credential: cli
                    .github_token
                    .filter(|token| !token.trim().is_empty())
                    .map(GithubCredential::new),
                call_timeout: Some(cli.timeout),
            },
            workers: cli.workers.max(1),
            call_timeout: cli.timeout,
        };
        resolve_direct(&cli.repos, options).await?
    } else {
        let server = validate_server_url(cli.server.as_deref())?;
        StarsClient::new(server, cli.timeout)?
            .fetch(&cli.repos)
            .await?
    };

    Ok(render_table(&response))
}
