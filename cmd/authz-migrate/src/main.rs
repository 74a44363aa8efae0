use anyhow::Context;
use clap::{Parser, Subcommand};
use pkg_client::http::HttpClient;
use pkg_constants::network::{DEFAULT_API_ADDR, DEFAULT_REQUEST_TIMEOUT_SECS};
use pkg_constants::paths::DEFAULT_MIGRATE_CONFIG;
use pkg_migrate::parity::ParityChecker;
use pkg_migrate::visitor::{KeyFilter, ResourceVisitor, always_requires_migration};
use pkg_rbacconv::normalize::normalize_for_create;
use pkg_rbacconv::scheme::{Object, convert, decode_documents, encode};
use pkg_types::config::{MigrateConfigFile, load_config_file};
use pkg_types::object::ObjectKind;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "authz-migrate",
    about = "Check and convert legacy authorization objects against RBAC"
)]
struct Cli {
    /// Path to YAML config file
    #[arg(long, short, default_value = DEFAULT_MIGRATE_CONFIG)]
    config: String,

    /// Server API endpoint
    #[arg(long)]
    server: Option<String>,

    /// Bearer token for the API server
    #[arg(long)]
    token: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Accept any server certificate
    #[arg(long)]
    insecure_skip_tls_verify: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify every legacy object has an identical RBAC mirror
    Check {
        /// Kinds to check (kind or resource name), default all
        #[arg(long, value_delimiter = ',')]
        include: Vec<ObjectKind>,

        /// Only check this namespace; cluster-scoped objects are skipped
        #[arg(long, short)]
        namespace: Option<String>,

        /// Only check objects whose key is >= this value
        #[arg(long)]
        from_key: Option<String>,

        /// Only check objects whose key is < this value
        #[arg(long)]
        to_key: Option<String>,

        /// Also report unchanged and ignored objects
        #[arg(long, short)]
        verbose: bool,
    },
    /// Convert objects from a file into the other model and print them as YAML
    Convert {
        /// YAML or JSON file, multiple documents allowed
        #[arg(long, short)]
        file: String,

        /// Normalize converted RBAC objects for creation
        #[arg(long)]
        normalize: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            include,
            namespace,
            from_key,
            to_key,
            verbose,
        } => {
            let file_cfg: MigrateConfigFile = load_config_file(&cli.config)?;
            info!("Config file: {}", cli.config);

            // Merge: CLI args > config file > defaults
            let server = cli
                .server
                .or(file_cfg.server)
                .unwrap_or_else(|| DEFAULT_API_ADDR.to_string());
            let token = cli.token.or(file_cfg.token);
            let timeout = cli
                .timeout_secs
                .or(file_cfg.timeout_secs)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
            let namespace = namespace.or(file_cfg.namespace);
            let insecure = cli.insecure_skip_tls_verify
                || file_cfg.insecure_skip_tls_verify.unwrap_or(false);

            info!("Checking RBAC parity against {}", server);
            if let Some(ns) = &namespace {
                info!("  Namespace: {}", ns);
            }

            if insecure {
                warn!("TLS certificate verification is disabled");
            }

            let client =
                HttpClient::new(&server, token, Duration::from_secs(timeout), insecure)?;
            let checker = ParityChecker::new(client.clone());
            let visitor = ResourceVisitor {
                kinds: if include.is_empty() {
                    ObjectKind::ALL.to_vec()
                } else {
                    include
                },
                namespace: namespace.clone(),
                filter: KeyFilter {
                    from_key,
                    to_key,
                    namespace,
                },
                verbose,
            };

            let mut stdout = std::io::stdout();
            if let Err(e) = visitor
                .visit(&client, always_requires_migration, &checker, &mut stdout)
                .await
            {
                error!("Check failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Commands::Convert { file, normalize } => {
            let text = std::fs::read_to_string(&file).with_context(|| format!("reading {}", file))?;
            print!("{}", convert_documents(&text, normalize)?);
        }
    }

    Ok(())
}

/// Convert every document in `text` and render the results as a YAML stream.
fn convert_documents(text: &str, normalize: bool) -> anyhow::Result<String> {
    let mut rendered = Vec::new();
    for obj in decode_documents(text)? {
        let mut converted = convert(&obj)?;
        if normalize {
            if let Object::Rbac(rbac) = &mut converted {
                normalize_for_create(rbac);
            }
        }
        rendered.push(serde_yaml::to_string(&encode(&converted)?)?);
    }
    Ok(rendered.join("---\n"))
}
