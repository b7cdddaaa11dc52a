use std::time::Duration;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotoken::{cli, config, error, spotify::auth::AuthOptions, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify and print access and refresh token
    Auth(AuthArgs),

    /// Print the authorization URL only
    Url(UrlArgs),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AuthArgs {
    /// Capture the redirect with a local listener on the redirect URI
    #[clap(long)]
    pub listen: bool,

    /// Print the authorization URL instead of opening a browser
    #[clap(long)]
    pub no_browser: bool,

    /// Force Spotify to show the consent dialog again
    #[clap(long)]
    pub show_dialog: bool,

    /// Seconds to wait for the callback in --listen mode
    #[clap(long, requires = "listen")]
    pub timeout: Option<u64>,
}

#[derive(Parser, Debug, Clone)]
pub struct UrlArgs {
    /// Force Spotify to show the consent dialog again
    #[clap(long)]
    pub show_dialog: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        warning!(
            "Cannot load {}. Err: {}",
            config::env_path().display(),
            e
        );
    }

    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => error!(
            "Invalid configuration: {}\nSet it in the environment or in {}.",
            e,
            config::env_path().display()
        ),
    };

    match cli.command {
        Command::Auth(args) => {
            let options = AuthOptions {
                listen: args.listen,
                no_browser: args.no_browser,
                show_dialog: args.show_dialog,
                callback_timeout: args.timeout.map(Duration::from_secs),
            };
            cli::auth(config, options).await;
        }
        Command::Url(args) => cli::url(&config, args.show_dialog),
        Command::Completions(_) => {}
    }
}
