mod args;
mod console;

use anyhow::{
    Context,
    Result,
};
use args::Args;
use clap::Parser;
use console::{
    ConsoleRoom,
    Directory,
};
use scrobble_status_services::{
    service::ListenBrainzService,
    CommandTable,
    Invocation,
    StatusCommands,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;


fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // Parsed before the runtime starts, the local offset can't be read once other threads exist
    let args = Args::parse_from(wild::args_os());

    #[cfg(debug_assertions)]
    dbg!(&args);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?
        .block_on(run(args))
}

async fn run(args: Args) -> Result<()> {
    let directory = Directory::load(&args.preferences)?;

    let content = args.content();
    let command = CommandTable::new()
        .parse(&content)
        .with_context(|| format!("Unknown command `{content}`"))?;

    let room = ConsoleRoom::new(args.context(), args.user_id, directory.clone());
    let invocation = Invocation {
        room_id: args.room_id,
        channel_id: args.channel_id,
        invoker_id: args.user_id,
        content,
    };

    let outcome = StatusCommands::new(ListenBrainzService::new(args.url.clone()), directory)
        .with_promotion(args.promotion())
        .run(&room, &invocation, &command)
        .await;
    debug!(?outcome, "Done");

    anyhow::Ok(())
}
