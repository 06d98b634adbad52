//! Entry point: argument parsing and logging, then the interactive loop.
//!
//! Both the api key and the endpoint can come from the environment (or
//! a `.env` file), so the key never has to appear in shell history:
//!
//! ```bash
//! HOSTSHELL_APIKEY=... hostshell
//! hostshell --endpoint https://rpc.example.net/xmlrpc/ --apikey ...
//! ```

use clap::Parser;

use hostshell::api::transport::XmlRpcApi;
use hostshell::config::{Settings, DEFAULT_ENDPOINT};
use hostshell::output;
use hostshell::registry::Registry;
use hostshell::shell::Shell;

#[derive(Parser)]
#[command(name = "hostshell")]
#[command(version)]
#[command(about = "Interactive shell for a hosting account")]
struct Cli {
    /// XML-RPC endpoint to talk to
    #[arg(long, env = "HOSTSHELL_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Api key identifying the account
    #[arg(long, env = "HOSTSHELL_APIKEY", hide_env_values = true)]
    apikey: String,

    /// More diagnostics on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present, before clap reads the environment.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    // Diagnostics go to stderr; stdout belongs to the line editor.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
    output::init(!cli.no_color);

    let settings = Settings {
        endpoint: cli.endpoint,
        apikey: cli.apikey,
    };
    let api = XmlRpcApi::new(&settings);
    let mut shell = Shell::new(&api, Registry::standard())?;
    shell.run()
}
