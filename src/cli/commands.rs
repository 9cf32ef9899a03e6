use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "dpcc")]
#[command(version, about = "Track client projects from kickoff to delivery")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new dpcc project in the current directory
    Init,

    /// Add a new project
    Add(AddArgs),

    /// List projects for a dashboard tab
    List(ListArgs),

    /// Show a single project
    Get {
        /// Project ID (UUID or unique prefix)
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update fields of a project
    Update(UpdateArgs),

    /// Record that work happened on a project
    Touch {
        /// Project ID (UUID or unique prefix)
        id: String,
    },

    /// Mark a project delivered (status and stage)
    Deliver {
        /// Project ID (UUID or unique prefix)
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send a delivered project back for revision
    Reopen {
        /// Project ID (UUID or unique prefix)
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a project
    Delete {
        /// Project ID (UUID or unique prefix)
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Manage project notes
    Note(NoteCommand),

    /// Show tab counters and the value total
    Stats(PeriodArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Project title
    pub title: String,

    /// Client name
    #[arg(long, short = 'c')]
    pub client: String,

    /// Deadline (YYYY-MM-DD)
    #[arg(long)]
    pub end: String,

    /// Start date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub start: Option<String>,

    /// Price; anything that is not a number counts as 0
    #[arg(long, default_value = "0")]
    pub price: String,

    /// Priority (high, medium, low)
    #[arg(long, default_value = "medium")]
    pub priority: String,

    /// Stage (first, middle, final, delivered)
    #[arg(long, default_value = "first")]
    pub stage: String,

    /// Status (active, revision, delivered)
    #[arg(long, default_value = "active")]
    pub status: String,

    /// Description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Website link
    #[arg(long)]
    pub website: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Project ID (UUID or unique prefix)
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long, short = 'c')]
    pub client: Option<String>,

    /// Description (empty string clears it)
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    #[arg(long)]
    pub price: Option<String>,

    #[arg(long)]
    pub priority: Option<String>,

    #[arg(long)]
    pub start: Option<String>,

    #[arg(long)]
    pub end: Option<String>,

    #[arg(long)]
    pub stage: Option<String>,

    #[arg(long)]
    pub status: Option<String>,

    /// Website link (empty string clears it)
    #[arg(long)]
    pub website: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Delivery period for the delivered tab.
#[derive(Args, Debug)]
pub struct PeriodArgs {
    /// Tab (running, delivered, revision)
    #[arg(long, short = 't')]
    pub tab: Option<String>,

    /// Delivery month: all, 0-11, or a month name. Defaults to this month.
    #[arg(long)]
    pub month: Option<String>,

    /// Delivery year. Defaults to this year.
    #[arg(long)]
    pub year: Option<i32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub period: PeriodArgs,

    /// Stage filter (all, first, middle, final, delivered)
    #[arg(long, default_value = "all")]
    pub stage: String,

    /// Priority filter (all, high, medium, low)
    #[arg(long, default_value = "all")]
    pub priority: String,

    /// Sort order (deadline, priority, updated)
    #[arg(long)]
    pub sort: Option<String>,

    /// Only show overdue projects
    #[arg(long)]
    pub overdue: bool,
}

#[derive(Args, Debug)]
pub struct NoteCommand {
    #[command(subcommand)]
    pub action: NoteAction,
}

#[derive(Subcommand, Debug)]
pub enum NoteAction {
    /// Add a note to a project
    Add {
        /// Project ID (UUID or unique prefix)
        id: String,

        /// Note text
        content: String,

        /// Tags (can be specified multiple times), defaults to clarification
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List a project's notes grouped by tag
    List {
        /// Project ID (UUID or unique prefix)
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
