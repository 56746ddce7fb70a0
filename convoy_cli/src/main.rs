use clap::{Parser, Subcommand};

use crate::resolve::{LocateArgs, RouteArgs};

mod output;
mod parsers;
mod resolve;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an HGV route between two coordinates
    #[command(visible_alias = "r")]
    Route {
        #[command(flatten)]
        args: RouteArgs,
    },

    /// Resolve an HGV route between two locations known to the coordinate lookup
    #[command(visible_alias = "l")]
    Locate {
        #[command(flatten)]
        args: LocateArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Some(Commands::Route { args }) => resolve::run_route(args).await?,
        Some(Commands::Locate { args }) => resolve::run_locate(args).await?,
        None => {}
    }

    Ok(())
}
