#[cfg(target_env = "musl")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::Parser;
use collabgate_core::config::parse_repository;
use collabgate_core::event::{load_event, ParsedEvent};
use collabgate_core::http::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use collabgate_core::output::gha::{error_annotation, warning_annotation};
use collabgate_core::output::{write_outputs, RunSummary};
use collabgate_core::resolver::precheck;
use collabgate_core::{
    extract_mention, AccessConfig, AccessPipeline, Credentials, ExecutionPolicy,
    GitHubApiClient, Permission, RunOutcome, TriggerEvent,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "collabgate",
    version,
    about = "Grant repository access from issue requests"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Handle one access-request issue event
    Run(RunArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// Path to the event payload JSON
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: Option<PathBuf>,

    /// Issue title (overrides the event payload)
    #[arg(long, requires = "issue_number")]
    title: Option<String>,

    /// Issue number (overrides the event payload)
    #[arg(long, requires = "title")]
    issue_number: Option<u64>,

    /// YAML configuration file
    #[arg(long, env = "COLLABGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Target repository as owner/name
    #[arg(long, env = "COLLABGATE_REPOSITORY")]
    repository: Option<String>,

    /// Permission granted to new collaborators (read, triage, write, maintain, admin)
    #[arg(long, env = "COLLABGATE_PERMISSION")]
    permission: Option<String>,

    /// Label applied after granting access
    #[arg(long, env = "COLLABGATE_GRANTED_LABEL")]
    granted_label: Option<String>,

    /// Label applied to duplicate requests
    #[arg(long, env = "COLLABGATE_DUPLICATE_LABEL")]
    duplicate_label: Option<String>,

    /// Skip comment, label and close when the grant call fails
    #[arg(long, env = "COLLABGATE_HALT_ON_GRANT_FAILURE")]
    halt_on_grant_failure: bool,

    /// Resolve the plan but make no mutating calls; prints the plan as JSON
    #[arg(long, env = "COLLABGATE_DRY_RUN")]
    dry_run: bool,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "COLLABGATE_TIMEOUT_SECONDS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_seconds: u64,

    /// GitHub token, used when no app credentials are set
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Run(args) => run(args),
    };
    std::process::exit(code);
}

/// Filter empty string from Option (env vars may produce "" for empty values)
fn clean_opt(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Report a decision-phase failure and return the failing exit code
fn fail(message: &str) -> i32 {
    tracing::error!("{message}");
    println!("{}", error_annotation(message));
    1
}

fn build_config(args: &RunArgs) -> collabgate_core::Result<AccessConfig> {
    let mut config = match args.config.as_deref() {
        Some(path) => AccessConfig::load(path)?,
        None => AccessConfig::default(),
    };

    if let Some(repo) = clean_opt(&args.repository) {
        config.repository = parse_repository(repo)?;
    }
    if let Some(permission) = clean_opt(&args.permission) {
        config.permission = Permission::parse(permission).ok_or_else(|| {
            collabgate_core::Error::Config(format!("unknown permission level: {permission}"))
        })?;
    }
    if let Some(label) = clean_opt(&args.granted_label) {
        config.granted_label = label.to_string();
    }
    if let Some(label) = clean_opt(&args.duplicate_label) {
        config.duplicate_label = label.to_string();
    }
    if args.halt_on_grant_failure {
        config.policy = ExecutionPolicy::HaltOnGrantFailure;
    }

    config.validate()?;
    Ok(config)
}

fn read_event(args: &RunArgs) -> collabgate_core::Result<ParsedEvent> {
    if let (Some(title), Some(issue_number)) = (args.title.as_ref(), args.issue_number) {
        return Ok(ParsedEvent {
            trigger: TriggerEvent::new(title.clone(), issue_number),
            action: None,
            author: None,
        });
    }
    let path = args.event_path.as_deref().ok_or_else(|| {
        collabgate_core::Error::Config(
            "no event: set GITHUB_EVENT_PATH or pass --title and --issue-number".to_string(),
        )
    })?;
    load_event(path)
}

/// Summary for an owner self-request, settled without contacting GitHub
fn self_request_summary(
    config: &AccessConfig,
    username: &str,
    issue_number: u64,
    dry_run: bool,
) -> Option<RunSummary> {
    let plan = precheck(username, &config.repository.owner)?;
    Some(if dry_run {
        RunSummary::dry_run(&plan, Some(username), issue_number)
    } else {
        RunSummary::from_outcome(&RunOutcome::SelfRequestAborted, Some(username), issue_number)
    })
}

fn run(args: RunArgs) -> i32 {
    let config = match build_config(&args) {
        Ok(c) => c,
        Err(e) => return fail(&e.to_string()),
    };

    let event = match read_event(&args) {
        Ok(e) => e,
        Err(e) => return fail(&e.to_string()),
    };
    if let Some(action) = event.action.as_deref() {
        tracing::info!(action, author = ?event.author, "received issue event");
    }

    // Malformed titles fail before any network call, token exchange included
    let trigger = &event.trigger;
    let username = match extract_mention(&trigger.title) {
        Ok(u) => u.to_owned(),
        Err(e) => return fail(&e.to_string()),
    };

    // Self-requests need no credentials and make no calls
    if let Some(summary) =
        self_request_summary(&config, &username, trigger.issue_number, args.dry_run)
    {
        tracing::info!("mentioned user is the repository owner; nothing to do");
        emit(&summary, args.json || args.dry_run);
        return 0;
    }

    let credentials = match Credentials::from_env(clean_opt(&args.token).map(str::to_owned)) {
        Ok(c) => c,
        Err(e) => return fail(&e.to_string()),
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build();
    let rt = match rt {
        Ok(rt) => rt,
        Err(e) => return fail(&format!("failed to create runtime: {e}")),
    };

    let result = rt.block_on(async {
        let token = credentials.access_token(&args.api_url).await?;
        let client = GitHubApiClient::with_timeout(
            &args.api_url,
            token,
            Duration::from_secs(args.timeout_seconds.max(1)),
        )?;
        let pipeline = AccessPipeline::new(&client, &config);

        if args.dry_run {
            let plan = pipeline.plan(trigger).await?;
            return Ok(RunSummary::dry_run(
                &plan,
                Some(username.as_str()),
                trigger.issue_number,
            ));
        }

        let outcome = pipeline.run(trigger).await?;
        Ok::<_, collabgate_core::Error>(RunSummary::from_outcome(
            &outcome,
            Some(username.as_str()),
            trigger.issue_number,
        ))
    });

    let summary = match result {
        Ok(s) => s,
        Err(e) => return fail(&e.to_string()),
    };

    // Dry runs always print the resolved plan as JSON
    emit(&summary, args.json || args.dry_run);

    // Probe failures end the run as failed; step failures do not
    match summary.reason.as_deref() {
        Some(reason) => fail(&format!("could not determine collaborator status: {reason}")),
        None => 0,
    }
}

/// Write `$GITHUB_OUTPUT` (when set) and the stdout summary
fn emit(summary: &RunSummary, json: bool) {
    if let Ok(output_file) = std::env::var("GITHUB_OUTPUT") {
        if let Err(e) = write_outputs(Path::new(&output_file), summary) {
            tracing::warn!("cannot write GITHUB_OUTPUT ({output_file}): {e}");
        }
    }

    let stdout = std::io::stdout();
    let mut w = stdout.lock();

    if json {
        match summary.to_json() {
            Ok(line) => {
                let _ = writeln!(w, "{line}");
            }
            Err(e) => tracing::warn!("cannot serialize summary: {e}"),
        }
        return;
    }

    let _ = writeln!(w, "Collabgate Results");
    let _ = writeln!(w, "==================");
    let _ = writeln!(w, "Issue: #{}", summary.issue_number);
    if let Some(username) = summary.username.as_deref() {
        let _ = writeln!(w, "User: @{username}");
    }
    let _ = writeln!(
        w,
        "Plan: {}{}",
        summary.plan,
        if summary.dry_run { " (dry run)" } else { "" }
    );
    for step in &summary.steps {
        match step.error.as_deref() {
            Some(error) => {
                let _ = writeln!(w, "  [{}] {}: {}", step.status, step.step, error);
            }
            None => {
                let _ = writeln!(w, "  [{}] {}", step.status, step.step);
            }
        }
    }
    if summary.failed_steps > 0 {
        let _ = writeln!(
            w,
            "{}",
            warning_annotation(&format!(
                "{} step(s) failed; see the log for causes",
                summary.failed_steps
            ))
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(argv: &[&str]) -> RunArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Run(args) => args,
        }
    }

    #[test]
    fn test_owner_self_request_exits_zero_without_credentials() {
        // Unroutable API and blank token: any network or credential step would fail
        let args = run_args(&[
            "collabgate",
            "run",
            "--title",
            "@community wants access",
            "--issue-number",
            "3",
            "--repository",
            "community/maintainers",
            "--api-url",
            "http://127.0.0.1:9",
            "--token",
            "",
        ]);
        assert_eq!(run(args), 0);
    }

    #[test]
    fn test_self_request_summary() {
        let config = AccessConfig::default();
        let summary = self_request_summary(&config, "community", 3, false).unwrap();
        assert_eq!(summary.plan, "self-request");
        assert_eq!(summary.username.as_deref(), Some("community"));
        assert!(summary.steps.is_empty());
        assert!(summary.reason.is_none());

        let dry = self_request_summary(&config, "community", 3, true).unwrap();
        assert!(dry.dry_run);
        assert_eq!(dry.plan, "self-request");
    }

    #[test]
    fn test_other_users_need_the_api() {
        let config = AccessConfig::default();
        assert!(self_request_summary(&config, "alice-dev", 3, false).is_none());
        assert!(self_request_summary(&config, "Community", 3, false).is_none());
    }

    #[test]
    fn test_build_config_overrides() {
        let args = run_args(&[
            "collabgate",
            "run",
            "--title",
            "@x",
            "--issue-number",
            "1",
            "--repository",
            "acme/docs",
            "--permission",
            "write",
            "--halt-on-grant-failure",
        ]);
        let config = build_config(&args).unwrap();
        assert_eq!(config.repository.owner, "acme");
        assert_eq!(config.permission, Permission::Push);
        assert_eq!(config.policy, ExecutionPolicy::HaltOnGrantFailure);
    }

    #[test]
    fn test_unknown_permission_rejected() {
        let args = run_args(&[
            "collabgate",
            "run",
            "--title",
            "@x",
            "--issue-number",
            "1",
            "--permission",
            "owner",
        ]);
        assert!(build_config(&args).is_err());
    }
}
