mod commands;
mod handlers;

pub use commands::{
    AddArgs, Cli, Commands, ListArgs, NoteAction, NoteCommand, PeriodArgs, UpdateArgs,
};
pub use handlers::{
    handle_add, handle_delete, handle_deliver, handle_get, handle_init, handle_list,
    handle_note_add, handle_note_list, handle_reopen, handle_stats, handle_touch, handle_update,
};
