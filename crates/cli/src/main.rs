//! Densify API CLI
//!
//! A command-line tool for resolving accounts and clusters to analyses,
//! pulling rightsizing recommendations, and rendering them as Terraform
//! variable blocks.

mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use densify_client::{ApiQuery, Client};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// CLI for the Densify optimization API
#[derive(Parser)]
#[command(name = "densify")]
#[command(author, version, about = "CLI for the Densify optimization API", long_about = None)]
pub struct Cli {
    /// Densify instance URL (can also be set via DENSIFY_URL env var)
    #[arg(long, env = "DENSIFY_URL")]
    pub url: Option<String>,

    /// API username
    #[arg(long, env = "DENSIFY_USERNAME")]
    pub username: Option<String>,

    /// API password
    #[arg(long, env = "DENSIFY_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Request timeout in seconds (0 uses the 60s default)
    #[arg(long, default_value_t = 0)]
    pub timeout: u64,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve and list the analyses matching an account or cluster
    Analyses {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Pull every recommendation for the resolved account or cluster
    Recommendations {
        #[command(flatten)]
        query: QueryArgs,

        /// Variable name for terraform output
        #[arg(long, default_value = "densify_recommendations")]
        var_name: String,
    },

    /// Pull the one recommendation matching the query
    Recommendation {
        #[command(flatten)]
        query: QueryArgs,

        #[command(flatten)]
        fallback: FallbackArgs,

        /// Return a fallback result instead of failing when nothing matches
        #[arg(long)]
        skip_errors: bool,

        /// Also load instance-governance guardrails with this spend tolerance
        #[arg(long)]
        spend_tolerance: Option<f64>,

        /// Variable name for terraform output
        #[arg(long, default_value = "densify_recommendations")]
        var_name: String,
    },

    /// Show the state of the current auth token
    Token,
}

/// Selector flags shared by every query-driven command.
#[derive(Args)]
pub struct QueryArgs {
    /// Analysis technology: aws, azure, gcp, k8s or kubernetes
    #[arg(long, short = 't')]
    pub tech: String,

    /// Cloud account name
    #[arg(long)]
    pub account_name: Option<String>,

    /// Cloud account number
    #[arg(long)]
    pub account_number: Option<String>,

    /// Cloud system name
    #[arg(long)]
    pub system: Option<String>,

    /// Kubernetes cluster name
    #[arg(long)]
    pub cluster: Option<String>,

    /// Kubernetes namespace
    #[arg(long, short)]
    pub namespace: Option<String>,

    /// Kubernetes controller type (pod, deployment, replicaset, daemonset,
    /// statefulset, cronjob, job)
    #[arg(long)]
    pub controller: Option<String>,

    /// Kubernetes pod name
    #[arg(long)]
    pub pod: Option<String>,

    /// Kubernetes container name (optional; omit to merge the whole pod)
    #[arg(long)]
    pub container: Option<String>,
}

/// Fallback values used when no live recommendation exists.
#[derive(Args)]
pub struct FallbackArgs {
    /// Fallback instance type
    #[arg(long)]
    pub fallback_instance: Option<String>,

    /// Fallback CPU request, e.g. 123m
    #[arg(long)]
    pub fallback_cpu_request: Option<String>,

    /// Fallback CPU limit
    #[arg(long)]
    pub fallback_cpu_limit: Option<String>,

    /// Fallback memory request, e.g. 234Mi
    #[arg(long)]
    pub fallback_mem_request: Option<String>,

    /// Fallback memory limit
    #[arg(long)]
    pub fallback_mem_limit: Option<String>,
}

impl QueryArgs {
    fn into_query(self) -> ApiQuery {
        ApiQuery {
            technology: self.tech,
            account_name: self.account_name.unwrap_or_default(),
            account_number: self.account_number.unwrap_or_default(),
            system_name: self.system.unwrap_or_default(),
            k8s_cluster: self.cluster.unwrap_or_default(),
            k8s_namespace: self.namespace.unwrap_or_default(),
            k8s_controller_type: self.controller.unwrap_or_default(),
            k8s_pod_name: self.pod.unwrap_or_default(),
            k8s_container_name: self.container.unwrap_or_default(),
            ..Default::default()
        }
    }
}

impl FallbackArgs {
    fn apply(self, query: &mut ApiQuery) {
        query.fallback_instance = self.fallback_instance.unwrap_or_default();
        query.fallback_cpu_request = self.fallback_cpu_request.unwrap_or_default();
        query.fallback_cpu_limit = self.fallback_cpu_limit.unwrap_or_default();
        query.fallback_mem_request = self.fallback_mem_request.unwrap_or_default();
        query.fallback_mem_limit = self.fallback_mem_limit.unwrap_or_default();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let file_config = config::Config::load().unwrap_or_default();
    let url = cli
        .url
        .or(file_config.url)
        .context("no instance URL provided (use --url, DENSIFY_URL, or the config file)")?;
    let username = cli
        .username
        .or(file_config.username)
        .context("no username provided (use --username, DENSIFY_USERNAME, or the config file)")?;
    let password = cli
        .password
        .context("no password provided (use --password or DENSIFY_PASSWORD)")?;

    let mut client = Client::connect(&url, &username, &password, cli.timeout)
        .await
        .context("failed to connect to the Densify instance")?;

    match cli.command {
        Commands::Analyses { query } => {
            commands::analyses::list_analyses(&mut client, query.into_query(), cli.format).await?;
        }
        Commands::Recommendations { query, var_name } => {
            commands::recommendation::list_recommendations(
                &mut client,
                query.into_query(),
                cli.format,
                &var_name,
            )
            .await?;
        }
        Commands::Recommendation {
            query,
            fallback,
            skip_errors,
            spend_tolerance,
            var_name,
        } => {
            let mut api_query = query.into_query();
            api_query.skip_errors = skip_errors;
            fallback.apply(&mut api_query);
            commands::recommendation::get_recommendation(
                &mut client,
                api_query,
                spend_tolerance,
                cli.format,
                &var_name,
            )
            .await?;
        }
        Commands::Token => {
            commands::token::show_token(&client, cli.format)?;
        }
    }

    Ok(())
}
