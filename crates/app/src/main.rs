mod args;
mod client;
mod logging;
mod op;
mod ops;
mod render;
mod state;

use args::Args;
use clap::{Parser, Subcommand};
use op::Op;
use ops::{Feed, Init, Mint, Post, Shell, Verify, Version, Whoami};

command_enum! {
    (Feed, Feed),
    (Init, Init),
    (Mint, Mint),
    (Post, Post),
    (Shell, Shell),
    (Verify, Verify),
    (Version, Version),
    (Whoami, Whoami),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    let guard = logging::init_logging(args.log_level);

    let ctx = match op::resolve_remote(args.remote, args.config_path.clone())
        .and_then(|remote| op::OpContext::new(remote, args.config_path))
    {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: Failed to create API client: {}", e);
            std::process::exit(1);
        }
    };

    let code = match args.command.execute(&ctx).await {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    // Flush buffered log lines before exiting
    drop(guard);
    std::process::exit(code);
}
