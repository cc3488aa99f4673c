use crate::cli::{DataArgs, DataCommands};
use crate::data::DataManager;
use crate::error::Result;
use std::path::PathBuf;
use tracing::info;

pub fn run(args: DataArgs) -> Result<()> {
    match args.command {
        DataCommands::Path => handle_path(),
        DataCommands::SetPath { path } => handle_set_path(path),
        DataCommands::ResetPath => handle_reset_path(),
    }
}

fn handle_path() -> Result<()> {
    let manager = DataManager::new()?;
    let path = manager.get_data_path();
    println!("{}", path.display());
    if !manager.prototype_dir().is_dir() {
        println!("(prototype_db/ is not present in this directory)");
    }
    if !manager.function_table_path().is_file() {
        println!("(function/fix_function.txt is not present in this directory)");
    }
    Ok(())
}

fn handle_set_path(path: PathBuf) -> Result<()> {
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()?.join(path)
    };
    info!("Persisting custom data path: {:?}", &absolute);
    DataManager::set_custom_path(&absolute)?;
    println!("✓ Data path set to: {}", absolute.display());
    Ok(())
}

fn handle_reset_path() -> Result<()> {
    DataManager::reset_path()?;
    let manager = DataManager::new()?;
    println!(
        "✓ Data path reset to default: {}",
        manager.get_data_path().display()
    );
    Ok(())
}
