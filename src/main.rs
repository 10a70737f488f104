// todolink command-line entry point.
// Thin view layer over the library: each subcommand is one user action.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use todolink::app::App;
use todolink::config::Settings;
use todolink::state::{Navigation, Route};
use todolink::{Item, Result};

#[derive(Parser, Debug)]
#[command(name = "todolink", version, about = "Manage your todo list from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and remember the token
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Forget the stored token
    Logout,
    /// Show whether a token is stored
    Status,
    /// Ask the server who it thinks you are
    Hello,
    /// Open a route such as / or /items
    Open { path: String },
    /// List items
    List,
    /// Add an item
    Add { text: String },
    /// Change an item's text
    Update { id: i64, text: String },
    /// Delete an item
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_transport() => {
            eprintln!("Could not reach the server: {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<()> {
    let settings = Settings::load()?;
    let mut app = App::from_settings(&settings)?;

    match command {
        Command::Login { username, password } => {
            app.login(&username, &password).await?;
            println!("Logged in as {}", username);
        }
        Command::Logout => {
            app.logout()?;
            println!("Logged out");
        }
        Command::Status => {
            if app.is_authenticated()? {
                println!("Logged in");
            } else {
                println!("Not logged in");
            }
        }
        Command::Hello => println!("{}", app.client.hello().await?),
        Command::Open { path } => {
            let navigation = app.open(&path)?;
            report(&navigation);
            if navigation.resolved == Route::Items {
                print_items(&app.client.list_items().await?);
            }
        }
        Command::List => {
            if enter_items(&mut app)? {
                print_items(&app.client.list_items().await?);
            }
        }
        Command::Add { text } => {
            if enter_items(&mut app)? {
                let item = app.client.create_item(&text).await?;
                println!("Added #{}: {}", item.id, item.text);
            }
        }
        Command::Update { id, text } => {
            if enter_items(&mut app)? {
                let item = app.client.update_item(id, &text).await?;
                println!("Updated #{}: {}", item.id, item.text);
            }
        }
        Command::Delete { id } => {
            if enter_items(&mut app)? && app.client.delete_item(id).await? {
                println!("Deleted #{}", id);
            }
        }
    }

    Ok(())
}

/// Enter the item list. False when the guard sent us to the login view.
fn enter_items(app: &mut App) -> Result<bool> {
    let navigation = app.navigator.navigate(Route::Items)?;
    if navigation.redirected() {
        report(&navigation);
        return Ok(false);
    }
    Ok(true)
}

fn report(navigation: &Navigation) {
    if navigation.resolved == Route::Login && navigation.redirected() {
        println!(
            "{} requires login, run `todolink login -u <name> -p <password>`",
            navigation.requested
        );
    } else {
        println!("At {}", navigation.resolved);
    }
}

fn print_items(items: &[Item]) {
    if items.is_empty() {
        println!("No items");
        return;
    }
    for item in items {
        println!("{:>4}  {}", item.id, item.text);
    }
}
