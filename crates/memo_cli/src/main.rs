//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `memo_core` linkage without the mobile runtime.
//! - Print a summary of the persisted todo list.

use memo_core::db::open_db;
use memo_core::{GroupOrder, RegisterTodoRepository, SqliteRegister, StorageConfig, TodoStore};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("memo_core ping={}", memo_core::ping());
    println!("memo_core version={}", memo_core::core_version());

    let config = StorageConfig::from_env();
    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open {}: {err}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };
    let register = match SqliteRegister::try_new(&conn) {
        Ok(register) => register,
        Err(err) => {
            eprintln!("failed to open register: {err}");
            return ExitCode::FAILURE;
        }
    };

    let store = TodoStore::open(RegisterTodoRepository::with_key(register, config.key.as_str()));
    let done = store.list().iter().filter(|item| item.is_completed).count();
    println!("todos total={} done={}", store.len(), done);
    for group in store.groups_by_category(GroupOrder::Lexicographic) {
        println!(
            "category={} count={}",
            group.category.unwrap_or("-"),
            group.items.len()
        );
    }
    ExitCode::SUCCESS
}
