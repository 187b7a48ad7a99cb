//! commitsmith - CLI entry point.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dialoguer::Select;
use tracing_subscriber::EnvFilter;

use commitsmith::git::GitCli;
use commitsmith::llm::{ChatModel, OllamaClient, TargetLanguage};
use commitsmith::{CommitSuggester, Settings, SuggestionRequest, SuggestionResponse};

/// Suggest conventional commit messages for pending git changes.
#[derive(Parser, Debug)]
#[command(name = "commitsmith")]
#[command(about = "Suggest conventional commit messages for pending git changes")]
#[command(version)]
struct Cli {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    model: ModelArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ModelArgs {
    /// Model to use (overrides COMMITSMITH_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Language of the generated descriptions: ko or en
    #[arg(long, global = true)]
    language: Option<TargetLanguage>,

    /// Skip the model and use heuristic messages only
    #[arg(long, global = true)]
    offline: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate commit message candidates for the pending diff
    Suggest {
        /// Number of candidates to request
        #[arg(short = 'n', long = "max", default_value_t = 9)]
        max_suggestions: u32,

        /// Prefer the working tree diff over staged changes
        #[arg(long)]
        unstaged_first: bool,

        /// Print the response as JSON
        #[arg(long, conflicts_with = "commit")]
        json: bool,

        /// Pick one of the candidates and commit with it
        #[arg(long)]
        commit: bool,
    },

    /// Check that the configured model answers
    Status,

    /// Commit the staged changes with the given message
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,
    },
}

impl Command {
    /// `status` only talks to the model.
    fn needs_git(&self) -> bool {
        !matches!(self, Command::Status)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut settings = Settings::load().context("Failed to load settings")?;
    apply_overrides(&mut settings, &cli.model);

    if cli.command.needs_git() {
        GitCli::check_installed().context("git is required")?;
    }
    let git = Arc::new(GitCli::new(&settings.work_dir));

    let model = match &settings.model {
        Some(name) => {
            let client = OllamaClient::new(
                &settings.base_url,
                name,
                settings.connect_timeout,
                settings.read_timeout,
            )
            .context("Failed to create model client")?;
            Some(Arc::new(client) as Arc<dyn ChatModel>)
        }
        None => None,
    };

    let suggester = CommitSuggester::new(git, model, &settings);

    match cli.command {
        Command::Suggest {
            max_suggestions,
            unstaged_first,
            json,
            commit,
        } => {
            let request = SuggestionRequest::new(max_suggestions, !unstaged_first);
            let response = suggester.generate(&request).await;

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&response).context("Failed to serialize response")?
                );
            } else {
                print_response(&response);
            }

            if commit && !response.suggestions.is_empty() {
                return pick_and_commit(&suggester, &response.suggestions).await;
            }

            Ok(if response.suggestions.is_empty() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Command::Status => {
            let status = suggester.check_connection().await;
            println!("{}", status.message);
            Ok(if status.connected {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Commit { message } => {
            suggester
                .commit(&message)
                .await
                .context("Commit failed")?;
            println!("Commit created.");
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// `--verbose` forces `debug`; otherwise `RUST_LOG`, defaulting to `warn`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn apply_overrides(settings: &mut Settings, args: &ModelArgs) {
    if let Some(model) = &args.model {
        settings.model = Some(model.clone()).filter(|m| !m.trim().is_empty());
    }
    if let Some(language) = args.language {
        settings.language = language;
    }
    if args.offline {
        settings.model = None;
    }
}

fn print_response(response: &SuggestionResponse) {
    println!("{}", response.message);
    if response.suggestions.is_empty() {
        return;
    }
    println!();
    for (i, suggestion) in response.suggestions.iter().enumerate() {
        println!("{}. {}", i + 1, suggestion);
    }
}

async fn pick_and_commit(suggester: &CommitSuggester, suggestions: &[String]) -> Result<ExitCode> {
    println!();
    let choice = Select::new()
        .with_prompt("Commit with which message?")
        .items(suggestions)
        .default(0)
        .interact_opt()
        .context("Failed to read selection")?;

    let Some(index) = choice else {
        println!("Cancelled. Nothing committed.");
        return Ok(ExitCode::SUCCESS);
    };

    suggester
        .commit(&suggestions[index])
        .await
        .context("Commit failed")?;
    println!("Committed: {}", suggestions[index]);
    Ok(ExitCode::SUCCESS)
}
