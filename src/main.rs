use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use tvshows::{cli, config, types::Order, utils, warning};

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
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List your shows
    List(ListOptions),

    /// Show a single show by id
    Show(ShowOptions),

    /// Add a show
    Insert(InsertOptions),

    /// Sign in with identifier and secret
    Signin(CredentialsOptions),

    /// Create an account
    Signup(CredentialsOptions),

    /// Sign out and forget cached tokens
    Signout,

    /// Sign in through the OAuth identity provider
    Auth,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ListOptions {
    /// Sort field: date (newest first), name or rate
    #[clap(long, default_value = "date", value_parser = utils::parse_order)]
    pub order: Order,
}

#[derive(Parser, Debug, Clone)]
pub struct ShowOptions {
    /// Id of the show
    pub id: i64,
}

#[derive(Parser, Debug, Clone)]
pub struct InsertOptions {
    /// Title of the show
    #[clap(long)]
    pub name: String,

    /// Your rating
    #[clap(long)]
    pub rate: i64,
}

#[derive(Parser, Debug, Clone)]
pub struct CredentialsOptions {
    /// Account identifier, usually an email address
    pub identifier: String,

    /// Secret; prompted for when omitted
    #[clap(long)]
    pub secret: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::List(opt) => cli::list(opt.order).await,
        Command::Show(opt) => cli::show(opt.id).await,
        Command::Insert(opt) => cli::insert(opt.name, opt.rate).await,
        Command::Signin(opt) => cli::signin(opt.identifier, opt.secret).await,
        Command::Signup(opt) => cli::signup(opt.identifier, opt.secret).await,
        Command::Signout => cli::signout().await,
        Command::Auth => cli::auth().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
