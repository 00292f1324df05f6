use anyhow::Context;
use clap::Parser;
use encsecret::cli::{effective_format, Cli, Commands, ConfigAction};
use encsecret::config::{read_document_file, validate_config_object, write_document, Config};
use encsecret::logging;
use encsecret::secrets::{audit, decode, SecretCache};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(cli.log_json);

    match cli.command {
        Commands::Decrypt(opts) => {
            let config = Config::load(opts.config.as_deref())?;
            validate_config_object(&config)?;

            let format = effective_format(opts.format, &opts.input);
            let raw = read_document_file(&opts.input, config.max_document_bytes)?;
            let resolver = config.resolver(SecretCache::new(), format);

            let (resolved, report) = resolver
                .resolve_with_report(&raw)
                .await
                .with_context(|| format!("Failed to decrypt '{}'", opts.input.display()))?;

            write_document(opts.output.as_deref(), &resolved)?;

            if report.is_complete() {
                info!(
                    "Decrypted '{}': {} placeholder(s) replaced",
                    opts.input.display(),
                    report.cache_hits + report.resolved
                );
            } else {
                warn!(
                    "Decrypted '{}' with {} unresolved handle(s): {}",
                    opts.input.display(),
                    report.unresolved.len(),
                    report.unresolved.join(", ")
                );
            }
        }
        Commands::Scan(opts) => {
            let config = Config::load(opts.config.as_deref())?;
            let format = effective_format(opts.format, &opts.input);
            let raw = read_document_file(&opts.input, config.max_document_bytes)?;
            let doc = decode(&raw, format)?;

            let refs = audit(&doc, config.max_depth)?;
            for r in &refs {
                println!("{}\t{}", r.path, r.handle);
            }
            info!("Found {} placeholder(s)", refs.len());
        }
        Commands::Config(opts) => {
            let config = Config::load(opts.config.as_deref())?;
            match opts.action {
                ConfigAction::Show => {
                    print!("{}", serde_yaml::to_string(&config)?);
                }
                ConfigAction::Validate => {
                    validate_config_object(&config)?;
                    info!("Configuration is valid");
                }
            }
        }
        Commands::Version => {
            println!("encsecret {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
