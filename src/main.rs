use clap::Parser;
use dpcc::cli::{
    handle_add, handle_delete, handle_deliver, handle_get, handle_init, handle_list,
    handle_note_add, handle_note_list, handle_reopen, handle_stats, handle_touch, handle_update,
    Cli, Commands, NoteAction,
};
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_logging() {
    let filter = EnvFilter::try_from_env("DPCC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => handle_init(),
        Commands::Add(args) => handle_add(args),
        Commands::List(args) => handle_list(args),
        Commands::Get { id, json } => handle_get(id, json),
        Commands::Update(args) => handle_update(args),
        Commands::Touch { id } => handle_touch(id),
        Commands::Deliver { id, json } => handle_deliver(id, json),
        Commands::Reopen { id, json } => handle_reopen(id, json),
        Commands::Delete { id, force } => handle_delete(id, force),
        Commands::Note(note_cmd) => match note_cmd.action {
            NoteAction::Add {
                id,
                content,
                tags,
                json,
            } => handle_note_add(id, content, tags, json),
            NoteAction::List { id, json } => handle_note_list(id, json),
        },
        Commands::Stats(args) => handle_stats(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
