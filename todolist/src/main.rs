//! Command-line front end for the todo list manager.
//!
//! Every invocation opens the list from `TODOLIST_DATA_DIR`, hydrates it if
//! empty, runs one command and waits briefly for background remote calls
//! before exiting.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::time::Duration;
use todolist::{TodoDraft, TodoId, TodoItem, TodoManager, TodoUpdate};
use todolist_runtime::ManagerConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser)]
#[command(name = "todolist")]
#[command(about = "Manage a todo list with a trash, search and pagination", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one page of active todos
    List {
        /// Only show todos whose title or description contains this
        #[arg(short, long)]
        search: Option<String>,

        /// Page to show
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Add a todo
    Add {
        /// Title of the todo
        #[arg(value_name = "TITLE")]
        title: String,

        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Flip a todo between done and not done
    Toggle {
        /// Todo id
        id: TodoId,
    },

    /// Change fields of a todo
    Update {
        /// Todo id
        id: TodoId,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New completion flag
        #[arg(long)]
        completed: Option<bool>,
    },

    /// Move a todo to the trash
    Delete {
        /// Todo id
        id: TodoId,
    },

    /// Bring a todo back from the trash
    Restore {
        /// Todo id
        id: TodoId,
    },

    /// Remove a todo from the trash for good
    Purge {
        /// Todo id
        id: TodoId,
    },

    /// Show the trash
    Trash,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ManagerConfig::from_env().context("invalid configuration")?;
    let manager = TodoManager::from_config(&config).context("failed to open todo list")?;

    manager.load().await?;
    if let Some(error) = manager.error().await {
        eprintln!("warning: could not fetch initial todos: {error}");
    }

    run(&manager, cli.command).await?;

    if let Err(error) = manager.shutdown(SHUTDOWN_TIMEOUT).await {
        tracing::warn!(error = %error, "Remote calls still pending at exit");
    }

    Ok(())
}

async fn run(manager: &TodoManager, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::List { search, page } => {
            if let Some(term) = search {
                manager.set_search_term(term).await?;
            }
            manager.set_page(page).await?;
            print_page(manager).await;
        },
        Commands::Add { title, description } => {
            let draft = TodoDraft {
                title,
                description,
            };
            let todo = manager.add_todo(draft).await?;
            println!("Added {}", todo.id);
            print_todo(&todo);
        },
        Commands::Toggle { id } => {
            manager.toggle_todo(id).await?;
            report(manager.find(id).await, id);
        },
        Commands::Update {
            id,
            title,
            description,
            completed,
        } => {
            let update = TodoUpdate {
                title,
                description,
                completed,
            };
            manager.update_todo(id, update).await?;
            report(manager.find(id).await, id);
        },
        Commands::Delete { id } => {
            let found = manager.find(id).await.is_some();
            manager.delete_todo(id).await?;
            if found {
                println!("Moved {id} to the trash");
            } else {
                println!("No active todo {id}");
            }
        },
        Commands::Restore { id } => {
            manager.restore_todo(id).await?;
            report(manager.find(id).await, id);
        },
        Commands::Purge { id } => {
            let before = manager.trashed_todos().await.len();
            manager.permanently_delete_todo(id).await?;
            if manager.trashed_todos().await.len() < before {
                println!("Deleted {id} permanently");
            } else {
                println!("No trashed todo {id}");
            }
        },
        Commands::Trash => {
            let trashed = manager.trashed_todos().await;
            if trashed.is_empty() {
                println!("Trash is empty");
            }
            for deleted in &trashed {
                print_todo(&deleted.item);
                println!("      deleted {}", deleted.deleted_at.to_rfc3339());
            }
        },
    }

    Ok(())
}

async fn print_page(manager: &TodoManager) {
    let page = manager.paginated_todos().await;
    if page.is_empty() {
        println!("No todos");
        return;
    }
    for todo in &page {
        print_todo(todo);
    }
    println!(
        "Page {} of {} ({} matching)",
        manager.current_page().await,
        manager.total_pages().await,
        manager.filtered_todos().await.len()
    );
}

fn print_todo(todo: &TodoItem) {
    let mark = if todo.completed { "x" } else { " " };
    println!("[{mark}] {:>13}  {}", todo.id.get(), todo.title);
    println!("      {}", todo.description);
}

fn report(todo: Option<TodoItem>, id: TodoId) {
    match todo {
        Some(todo) => print_todo(&todo),
        None => println!("No todo {id}"),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "todolist=warn,todolist_runtime=warn",
        1 => "todolist=info,todolist_runtime=info",
        _ => "todolist=debug,todolist_runtime=debug",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
