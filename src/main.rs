use anyhow::{Context, Result};
use indicatif::ProgressBar;
use release_gate::cli::commands::{CheckCommand, RunCommand, ValidateCommand};
use release_gate::cli::output::*;
use release_gate::cli::{Cli, Command};
use release_gate::core::{Credentials, GateDecision, ReleaseConfig, ReleaseEvent};
use release_gate::execution::{
    CommandExecutor, DryRunExecutor, ReleaseRunner, RunEvent, SubprocessExecutor,
};
use release_gate::notify::{DryRunNotifier, GitHubNotifier, Notifier};
use std::sync::Mutex;
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Exit code for configuration and event loading errors
const USAGE_ERROR: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging; RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    // Execute command
    let result = match &cli.command {
        Command::Run(cmd) => run_release(cmd, &cli).await,
        Command::Check(cmd) => check_gate(cmd, &cli),
        Command::Validate(cmd) => validate_config(cmd, &cli),
    };

    match result {
        Ok(0) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {}", CROSS, style(format!("{:#}", e)).red());
            std::process::exit(USAGE_ERROR);
        }
    }
}

fn load_config(cli: &Cli) -> Result<ReleaseConfig> {
    ReleaseConfig::load(cli.config.as_deref()).context("Failed to load release config")
}

async fn run_release(cmd: &RunCommand, cli: &Cli) -> Result<i32> {
    let config = load_config(cli)?;
    let event = ReleaseEvent::from_file(&cmd.event).context("Failed to load release event")?;

    // Secrets are read once, here, and handed to the step that needs them
    let credentials = Credentials::from_env(&config.registry.token_env, &config.notify.token_env);

    if cmd.dry_run {
        println!("{} Dry run: no commands or comments will be executed", INFO);
        execute(config, event, DryRunExecutor, DryRunNotifier, credentials, true).await
    } else {
        let notifier = GitHubNotifier::new(&config.notify, credentials.comment.clone())
            .context("Failed to create GitHub client")?;
        execute(config, event, SubprocessExecutor::new(), notifier, credentials, false).await
    }
}

async fn execute<E, N>(
    config: ReleaseConfig,
    event: ReleaseEvent,
    executor: E,
    notifier: N,
    credentials: Credentials,
    dry_run: bool,
) -> Result<i32>
where
    E: CommandExecutor,
    N: Notifier,
{
    let name = config.name.clone();
    let mut runner = ReleaseRunner::new(config, executor, notifier)
        .with_registry_credential(credentials.registry)
        .allow_missing_credential(dry_run);

    // Set up event handler for console output, with a spinner per step
    let spinner: Mutex<Option<ProgressBar>> = Mutex::new(None);
    runner.add_event_handler(move |event| {
        let Ok(mut current) = spinner.lock() else {
            return;
        };
        if let Some(bar) = current.take() {
            bar.finish_and_clear();
        }
        let line = format_run_event(event);
        println!("{}", line);
        // spinners are hidden when stderr is not a terminal, so the line above stays
        if let RunEvent::StepStarted { step, .. } = event {
            if wants_spinner(*step, dry_run) {
                *current = Some(create_spinner(format!("running {}", step)));
            }
        }
    });

    let report = runner.run(&event).await;

    println!("\n{}", format_outcome(&name, &report.outcome));
    if let release_gate::core::RunOutcome::Failed { error, .. } = &report.outcome {
        error!("{}", error);
    }

    Ok(report.outcome.exit_code())
}

fn check_gate(cmd: &CheckCommand, cli: &Cli) -> Result<i32> {
    let config = load_config(cli)?;
    let event = ReleaseEvent::from_file(&cmd.event).context("Failed to load release event")?;
    let decision = config.trigger_condition().evaluate(&event);

    if cmd.json {
        let data = serde_json::json!({
            "event": event,
            "proceed": decision.proceeds(),
            "decision": decision,
        });
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        let icon = match decision {
            GateDecision::Proceed => CHECK,
            GateDecision::Reject(_) => WARN,
        };
        println!(
            "{} {}: {}",
            icon,
            style(event.label()).bold(),
            format_decision(&decision)
        );
    }

    Ok(0)
}

fn validate_config(cmd: &ValidateCommand, cli: &Cli) -> Result<i32> {
    println!("{} Validating release config...", INFO);

    let config = match load_config(cli) {
        Ok(config) => config,
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(format!("{:#}", e)).red());
            return Ok(USAGE_ERROR);
        }
    };

    println!("{} Release config is valid!", CHECK);
    println!("  Name: {}", style(&config.name).bold());
    println!("  Trigger suffix: {}", style(&config.trigger.title_suffix).cyan());
    for step in release_gate::core::ReleaseStep::ALL {
        if let Some(invocation) = config.invocation(step) {
            println!("  {}: {}", step, style(invocation).dim());
        }
    }
    println!("  Registry link: {}", style(config.versions_url()).cyan());

    if cmd.json {
        let json = serde_json::to_string_pretty(&config)?;
        println!("\n{}", json);
    }

    Ok(0)
}
