//! Scripted CLI demo for the to-do list.
//!
//! Opens the list from a data directory (see `TodoConfig::from_env`), runs a
//! few operations and prints the list after each step. Run it twice to see
//! the list restored from disk.

use std::sync::Arc;
use todo_list::{FileStorage, TodoConfig, TodoItem, TodoList};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_list(heading: &str, items: &[TodoItem]) {
    println!("\n{heading}:");
    if items.is_empty() {
        println!("  (empty)");
    }
    for todo in items {
        let status = if todo.done { "✓" } else { " " };
        if todo.description.is_empty() {
            println!("  [{status}] #{} {}", todo.id, todo.title);
        } else {
            println!("  [{status}] #{} {} ({})", todo.id, todo.title, todo.description);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_list=info,todo_runtime=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    println!("=== Todo List ===");

    let config = TodoConfig::from_env();
    info!(
        data_dir = %config.data_dir.display(),
        key = %config.storage_key,
        startup = %config.startup,
        "Configuration loaded"
    );

    let storage = Arc::new(FileStorage::open(&config.data_dir)?);
    let list = TodoList::open(&config, storage);
    print_list("Loaded", &list.snapshot().await);

    // Type into the input fields, then submit
    list.edit_title("Buy milk").await?;
    list.edit_description("2 liters, semi-skimmed").await?;
    let milk = list.submit().await?;
    print_list("After adding 'Buy milk'", &list.snapshot().await);

    // Blank titles are ignored
    let blank = list.create("   ", "nothing to see").await?;
    println!("\nBlank title created an item: {}", blank.is_some());

    if let Some(milk) = milk {
        list.toggle(milk.id).await?;
        print_list("After completing 'Buy milk'", &list.snapshot().await);
    }

    let docs = list.create("Write documentation", "").await?;
    print_list("After adding 'Write documentation'", &list.snapshot().await);

    if let Some(docs) = docs {
        list.delete(docs.id).await?;
        print_list("After deleting 'Write documentation'", &list.snapshot().await);
    }

    let state = list.state().await;
    println!("\nDone: {}/{}", state.done_count(), state.count());
    if let Some(error) = &state.last_error {
        println!("Last save failed: {error}");
    }

    list.shutdown();
    println!("\n=== Saved to {} ===", config.data_dir.display());
    Ok(())
}
