// # txtctl - ACME DNS-01 TXT Record Hook
//
// This binary is a THIN integration layer. It is invoked once per challenge
// by an ACME client and is responsible for:
// 1. Parsing the verb and its arguments
// 2. Reading configuration from environment variables
// 3. Wiring the credential store and the panel provider into the engine
// 4. Mapping the result to an exit code
//
// All panel logic lives in txtctl-provider-html; all orchestration lives in
// txtctl-core.
//
// ## Usage
//
// ```bash
// txtctl create <identifier> <record_name> <token> [DeclineTerms]
// txtctl delete <identifier> <record_name> <token> [DeclineTerms]
// txtctl setcred [--username <name>]
// txtctl clearcred
// ```
//
// Any other verb (or none) prints a diagnostic and exits 0, so the hook can
// be called for challenge types it does not handle.
//
// ## Configuration
//
// - `TXTCTL_PANEL_URL`: Admin panel endpoint (required for create/delete)
// - `TXTCTL_CREDENTIALS_PATH`: Credential file (default: <config dir>/txtctl/credentials.json)
// - `TXTCTL_TIMEOUT_SECS`: HTTP timeout in seconds (default: none)
// - `TXTCTL_USER_AGENT`: User-Agent header (default: txtctl/<version>)
// - `TXTCTL_MODE`: `live` or `dry-run` (default: live)
// - `TXTCTL_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export TXTCTL_PANEL_URL=https://panel.example.net/admin/
// txtctl setcred --username alice
// txtctl create www.example.com _acme-challenge.www "$TOKEN"
// ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use txtctl_core::traits::{Credentials, TxtChallenge, TxtOutcome};
use txtctl_core::{
    ChallengeEngine, CredentialStore, CredentialStoreConfig, PanelConfig, TxtctlConfig,
};
use txtctl_provider_html::PanelProvider;

/// Exit codes reported to the ACME client
///
/// - 0: Success, or a verb this hook does not handle
/// - 1: Usage or configuration error
/// - 2: The record operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxtctlExitCode {
    /// Operation completed (or nothing to do)
    Success = 0,
    /// Usage or configuration error
    ConfigError = 1,
    /// Operation failed (login, zone, record or transport)
    OperationFailed = 2,
}

impl From<TxtctlExitCode> for ExitCode {
    fn from(code: TxtctlExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "txtctl",
    version,
    about = "Manage ACME DNS-01 TXT records through an HTML admin panel"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Publish the challenge TXT record
    Create(ChallengeArgs),

    /// Remove the challenge TXT record
    Delete(ChallengeArgs),

    /// Store the panel login (read from stdin; typed input is echoed)
    Setcred {
        /// Username (prompted for when omitted)
        #[arg(long)]
        username: Option<String>,
    },

    /// Remove the stored panel login
    Clearcred,

    #[command(external_subcommand)]
    External(Vec<String>),
}

#[derive(Debug, clap::Args)]
struct ChallengeArgs {
    /// Name being validated (e.g. www.example.com)
    identifier: String,

    /// Record name relative to the zone (e.g. _acme-challenge.www)
    record_name: String,

    /// TXT record value
    token: String,

    /// Whether pending terms of service may be approved
    #[arg(value_enum)]
    terms: Option<TermsChoice>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TermsChoice {
    /// Approve pending terms of service on login (default)
    #[value(name = "AcceptTerms", alias = "accept-terms")]
    AcceptTerms,

    /// Fail instead of approving pending terms of service
    #[value(name = "DeclineTerms", alias = "decline-terms")]
    DeclineTerms,
}

impl ChallengeArgs {
    fn to_challenge(&self) -> TxtChallenge {
        TxtChallenge::new(&self.identifier, &self.record_name, &self.token)
            .with_accept_terms(self.terms != Some(TermsChoice::DeclineTerms))
    }
}

/// Application configuration
#[derive(Debug)]
struct Config {
    panel_url: Option<String>,
    credentials_path: Option<String>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
    mode: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout_secs = match non_empty("TXTCTL_TIMEOUT_SECS") {
            Some(raw) => Some(raw.trim().parse().with_context(|| {
                format!("TXTCTL_TIMEOUT_SECS must be a number of seconds. Got: {}", raw)
            })?),
            None => None,
        };

        Ok(Self {
            panel_url: non_empty("TXTCTL_PANEL_URL"),
            credentials_path: non_empty("TXTCTL_CREDENTIALS_PATH"),
            timeout_secs,
            user_agent: non_empty("TXTCTL_USER_AGENT"),
            mode: non_empty("TXTCTL_MODE").unwrap_or_else(|| "live".to_string()),
            log_level: non_empty("TXTCTL_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate settings that apply to every verb
    fn validate(&self) -> Result<()> {
        match self.mode.to_lowercase().as_str() {
            "live" | "dry-run" => {}
            _ => anyhow::bail!(
                "TXTCTL_MODE '{}' is not valid. Valid modes: live, dry-run",
                self.mode
            ),
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "TXTCTL_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    fn is_dry_run(&self) -> bool {
        self.mode.eq_ignore_ascii_case("dry-run")
    }

    fn log_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    /// Panel settings for create/delete
    fn panel_config(&self) -> Result<PanelConfig> {
        let Some(ref url) = self.panel_url else {
            anyhow::bail!(
                "TXTCTL_PANEL_URL is required. \
                Set it via: export TXTCTL_PANEL_URL=https://panel.example.net/admin/"
            );
        };

        let mut panel = PanelConfig::new(url.as_str()).with_dry_run(self.is_dry_run());
        if let Some(secs) = self.timeout_secs {
            panel = panel.with_timeout_secs(secs);
        }
        if let Some(ref agent) = self.user_agent {
            panel = panel.with_user_agent(agent.as_str());
        }

        panel.validate()?;
        Ok(panel)
    }

    /// Credential store location
    fn credential_store_config(&self) -> Result<CredentialStoreConfig> {
        let path = match self.credentials_path {
            Some(ref path) => PathBuf::from(path),
            None => dirs::config_dir()
                .context(
                    "cannot determine the user configuration directory. \
                    Set TXTCTL_CREDENTIALS_PATH explicitly",
                )?
                .join("txtctl")
                .join("credentials.json"),
        };

        Ok(CredentialStoreConfig::File {
            path: path.to_string_lossy().into_owned(),
        })
    }
}

/// Validate that a string is a valid domain name
///
/// Labels may contain alphanumerics, hyphens and underscores (service labels
/// such as `_acme-challenge`). A single trailing dot is accepted.
fn validate_domain_name(domain: &str) -> Result<()> {
    let domain = domain.strip_suffix('.').unwrap_or(domain);

    if domain.is_empty() {
        anyhow::bail!("Domain name cannot be empty");
    }

    if domain.len() > 253 {
        anyhow::bail!(
            "Domain name too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        );
    }

    for label in domain.split('.') {
        if label.is_empty() {
            anyhow::bail!("Domain name has empty label: '{}'", domain);
        }

        if label.len() > 63 {
            anyhow::bail!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            );
        }

        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            anyhow::bail!(
                "Domain label contains invalid characters. Label: '{}'. \
                Valid: alphanumeric, hyphen and underscore only.",
                label
            );
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                TxtctlExitCode::ConfigError.into()
            } else {
                TxtctlExitCode::Success.into()
            };
        }
    };

    let command = match cli.command {
        Some(Command::External(args)) => {
            eprintln!(
                "txtctl: unrecognized verb '{}', nothing to do",
                args.first().map(String::as_str).unwrap_or_default()
            );
            return TxtctlExitCode::Success.into();
        }
        Some(command) => command,
        None => {
            eprintln!("txtctl: no verb given, nothing to do (see --help)");
            return TxtctlExitCode::Success.into();
        }
    };

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return TxtctlExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return TxtctlExitCode::ConfigError.into();
    }

    // Logs go to stderr; stdout is left to the calling ACME client
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level())
        .with_writer(io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return TxtctlExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return TxtctlExitCode::OperationFailed.into();
        }
    };

    rt.block_on(run(command, config)).into()
}

/// Dispatch a recognized verb
async fn run(command: Command, config: Config) -> TxtctlExitCode {
    match command {
        Command::Create(args) => run_challenge(&config, &args, true).await,
        Command::Delete(args) => run_challenge(&config, &args, false).await,
        Command::Setcred { username } => match set_credentials(&config, username).await {
            Ok(()) => TxtctlExitCode::Success,
            Err(e) => {
                error!("Failed to store credentials: {:#}", e);
                TxtctlExitCode::OperationFailed
            }
        },
        Command::Clearcred => match clear_credentials(&config).await {
            Ok(()) => TxtctlExitCode::Success,
            Err(e) => {
                error!("Failed to clear credentials: {:#}", e);
                TxtctlExitCode::OperationFailed
            }
        },
        Command::External(_) => TxtctlExitCode::Success,
    }
}

/// Create or delete one challenge record
async fn run_challenge(config: &Config, args: &ChallengeArgs, create: bool) -> TxtctlExitCode {
    if let Err(e) = validate_domain_name(&args.identifier) {
        error!("Invalid identifier: {:#}", e);
        return TxtctlExitCode::ConfigError;
    }

    let engine = match build_engine(config) {
        Ok(engine) => engine,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return TxtctlExitCode::ConfigError;
        }
    };

    let challenge = args.to_challenge();
    if !challenge.accept_terms {
        info!("Pending terms of service will not be approved");
    }

    let result = if create {
        engine.present(&challenge).await
    } else {
        engine.cleanup(&challenge).await
    };

    match result {
        Ok(TxtOutcome::WouldCreate { zone } | TxtOutcome::WouldDelete { zone, .. }) => {
            warn!("Dry-run complete for zone {}; no record was changed", zone);
            TxtctlExitCode::Success
        }
        Ok(_) => TxtctlExitCode::Success,
        // Already logged by the engine
        Err(_) => TxtctlExitCode::OperationFailed,
    }
}

fn build_engine(config: &Config) -> Result<ChallengeEngine> {
    let settings = TxtctlConfig {
        panel: config.panel_config()?,
        credential_store: config.credential_store_config()?,
    };
    settings.validate()?;

    let store = txtctl_core::store::open(&settings.credential_store)?;
    let provider = PanelProvider::new(&settings.panel)?;

    info!(
        "Using panel {} [mode: {}, credentials: {}]",
        settings.panel.base_url,
        if settings.panel.dry_run { "DRY-RUN" } else { "LIVE" },
        settings.credential_store.type_name()
    );

    Ok(ChallengeEngine::new(store, Box::new(provider)))
}

fn open_store(config: &Config) -> Result<Box<dyn CredentialStore>> {
    let store_config = config.credential_store_config()?;
    Ok(txtctl_core::store::open(&store_config)?)
}

async fn set_credentials(config: &Config, username: Option<String>) -> Result<()> {
    let store = open_store(config)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let username = match username {
        Some(name) => name,
        None => prompt_line(&mut input, "Panel username: ")?,
    };
    let password = prompt_line(&mut input, "Panel password: ")?;

    store.save(&Credentials::new(username, password)).await?;
    info!("Credentials saved to {} store", store.store_name());
    Ok(())
}

async fn clear_credentials(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    store.clear().await?;
    info!("Credentials cleared from {} store", store.store_name());
    Ok(())
}

/// Prompt on stderr and read one line, without its line terminator
fn prompt_line(input: &mut impl BufRead, prompt: &str) -> Result<String> {
    eprint!("{}", prompt);
    io::stderr().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        anyhow::bail!("unexpected end of input while reading '{}'", prompt.trim());
    }

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_validate_domain_name() {
        assert!(validate_domain_name("www.example.com").is_ok());
        assert!(validate_domain_name("www.example.com.").is_ok());
        assert!(validate_domain_name("_acme-challenge.example.com").is_ok());
        assert!(validate_domain_name("xn--bcher-kva.example").is_ok());

        assert!(validate_domain_name("").is_err());
        assert!(validate_domain_name(".").is_err());
        assert!(validate_domain_name("www..example.com").is_err());
        assert!(validate_domain_name("www.exa mple.com").is_err());
        assert!(validate_domain_name("www.example.com/path").is_err());
    }

    #[test]
    fn test_validate_domain_name_lengths() {
        let label = "a".repeat(63);
        assert!(validate_domain_name(&format!("{}.com", label)).is_ok());

        let label = "a".repeat(64);
        assert!(validate_domain_name(&format!("{}.com", label)).is_err());

        let long = vec!["abcdefghi"; 26].join(".");
        assert!(long.len() > 253);
        assert!(validate_domain_name(&long).is_err());
    }

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from([
            "txtctl",
            "create",
            "www.example.com",
            "_acme-challenge.www",
            "tok",
        ])
        .unwrap();

        let Some(Command::Create(args)) = cli.command else {
            panic!("expected create");
        };
        let challenge = args.to_challenge();
        assert_eq!(challenge.identifier, "www.example.com");
        assert_eq!(challenge.record_name, "_acme-challenge.www");
        assert_eq!(challenge.value, "tok");
        assert!(challenge.accept_terms);
    }

    #[test]
    fn test_parse_decline_terms() {
        for flag in ["DeclineTerms", "decline-terms"] {
            let cli = Cli::try_parse_from([
                "txtctl",
                "delete",
                "www.example.com",
                "_acme-challenge.www",
                "tok",
                flag,
            ])
            .unwrap();

            let Some(Command::Delete(args)) = cli.command else {
                panic!("expected delete");
            };
            assert!(!args.to_challenge().accept_terms);
        }
    }

    #[test]
    fn test_parse_rejects_unknown_terms_word() {
        let result = Cli::try_parse_from([
            "txtctl",
            "create",
            "www.example.com",
            "_acme-challenge.www",
            "tok",
            "Maybe",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_unknown_verb() {
        let cli = Cli::try_parse_from(["txtctl", "deploy_cert", "example.com"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::External(ref args)) if args[0] == "deploy_cert"
        ));

        let cli = Cli::try_parse_from(["txtctl"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_setcred() {
        let cli = Cli::try_parse_from(["txtctl", "setcred", "--username", "alice"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Setcred { username: Some(ref name) }) if name == "alice"
        ));

        let cli = Cli::try_parse_from(["txtctl", "clearcred"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Clearcred)));
    }

    #[test]
    fn test_setcred_help_mentions_echo() {
        let command = Cli::command();
        let setcred = command.find_subcommand("setcred").unwrap();
        let about = setcred.get_about().map(|a| a.to_string()).unwrap_or_default();
        assert!(about.contains("echoed"), "help text: {}", about);
    }

    #[test]
    fn test_config_defaults() {
        let config = config_from(&[]).unwrap();
        assert!(config.validate().is_ok());
        assert!(!config.is_dry_run());
        assert_eq!(config.log_level(), Level::INFO);
        assert!(config.panel_config().is_err());
    }

    #[test]
    fn test_config_panel() {
        let config = config_from(&[
            ("TXTCTL_PANEL_URL", "https://panel.example.net/admin/"),
            ("TXTCTL_TIMEOUT_SECS", "30"),
            ("TXTCTL_MODE", "dry-run"),
        ])
        .unwrap();

        let panel = config.panel_config().unwrap();
        assert_eq!(panel.base_url, "https://panel.example.net/admin/");
        assert_eq!(panel.timeout_secs, Some(30));
        assert!(panel.dry_run);
    }

    #[test]
    fn test_config_rejects_bad_values() {
        assert!(config_from(&[("TXTCTL_TIMEOUT_SECS", "soon")]).is_err());

        let config = config_from(&[("TXTCTL_MODE", "maybe")]).unwrap();
        assert!(config.validate().is_err());

        let config = config_from(&[("TXTCTL_LOG_LEVEL", "loud")]).unwrap();
        assert!(config.validate().is_err());

        let config = config_from(&[("TXTCTL_PANEL_URL", "ftp://panel.example.net")]).unwrap();
        assert!(config.panel_config().is_err());
    }

    #[test]
    fn test_credentials_path_override() {
        let config = config_from(&[("TXTCTL_CREDENTIALS_PATH", "/tmp/txtctl/creds.json")]).unwrap();
        match config.credential_store_config().unwrap() {
            CredentialStoreConfig::File { path } => assert_eq!(path, "/tmp/txtctl/creds.json"),
            other => panic!("unexpected store config: {:?}", other),
        }
    }

    #[test]
    fn test_prompt_line_strips_terminator() {
        let mut input = io::Cursor::new("alice\r\ns3cret\n");
        assert_eq!(prompt_line(&mut input, "user: ").unwrap(), "alice");
        assert_eq!(prompt_line(&mut input, "pass: ").unwrap(), "s3cret");
        assert!(prompt_line(&mut input, "more: ").is_err());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(TxtctlExitCode::Success as u8, 0);
        assert_eq!(TxtctlExitCode::ConfigError as u8, 1);
        assert_eq!(TxtctlExitCode::OperationFailed as u8, 2);
    }
}
