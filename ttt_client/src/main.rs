//! A terminal client for the tic-tac-toe session server.
//!
//! The client connects over TCP, joins the next open session and plays
//! with commands typed on stdin.

use anyhow::Result;
use pico_args::Arguments;
use tictactoe::DisplayName;
use ttt_client::connection::SessionClient;

const HELP: &str = "\
Play tic-tac-toe against another player over the network

USAGE:
  ttt_client [OPTIONS]

OPTIONS:
  --server ADDR         Server socket address  [default: 127.0.0.1:6969]
  --name NAME           Display name  [default: $USER]

FLAGS:
  -h, --help            Print help information
";

struct Args {
    server: String,
    name: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        server: pargs
            .value_from_str("--server")
            .unwrap_or_else(|_| "127.0.0.1:6969".to_string()),
        name: pargs
            .value_from_str("--name")
            .unwrap_or_else(|_| whoami::username()),
    };

    SessionClient::new(args.server, DisplayName::new(&args.name))
        .connect_and_play()
        .await?;

    println!("\nLeft the session.");
    Ok(())
}
