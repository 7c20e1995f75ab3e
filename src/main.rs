use clap::{Parser, Subcommand};
use ursa::commands::{ask, import_records, init_config, run_ingest, run_server, show_config, show_status};
use ursa::Result;

#[derive(Parser)]
#[command(name = "ursa")]
#[command(about = "Retrieval-augmented assistant for a portfolio website")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or inspect the configuration file
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// Import portfolio records from a JSON snapshot
    Import {
        /// Path to the JSON file
        file: String,
    },
    /// Rebuild the knowledge base from the stored records
    Ingest,
    /// Ask a single question from the command line
    Ask {
        /// The question to answer
        question: String,
    },
    /// Start the chat API server
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Show connectivity and knowledge base status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { show } => {
            if show {
                show_config()?;
            } else {
                init_config()?;
            }
        }
        Commands::Import { file } => {
            import_records(&file).await?;
        }
        Commands::Ingest => {
            run_ingest().await?;
        }
        Commands::Ask { question } => {
            ask(&question).await?;
        }
        Commands::Serve { port } => {
            run_server(port).await?;
        }
        Commands::Status => {
            show_status().await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn cli_parsing() {
        let cli = Cli::try_parse_from(["ursa", "status"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            assert!(matches!(parsed.command, Commands::Status));
        }
    }

    #[test]
    fn cli_ask_requires_a_question() {
        let cli = Cli::try_parse_from(["ursa", "ask"]);
        assert!(cli.is_err());
        if let Err(e) = cli {
            assert_eq!(e.kind(), ErrorKind::MissingRequiredArgument);
        }
    }

    #[test]
    fn cli_serve_accepts_port_override() {
        let cli = Cli::try_parse_from(["ursa", "serve", "--port", "9000"]);
        match cli {
            Ok(parsed) => match parsed.command {
                Commands::Serve { port } => assert_eq!(port, Some(9000)),
                _ => panic!("Expected serve command"),
            },
            Err(e) => panic!("Parse failed: {e}"),
        }
    }

    #[test]
    fn cli_rejects_unknown_command() {
        let cli = Cli::try_parse_from(["ursa", "frobnicate"]);
        assert!(cli.is_err());
    }
}
