//! `clientbook` - CLI for managing fitness client records
//!
//! This binary is a thin presentation layer: it parses a command, drives the
//! view controller against the repository, and prints the rendered view.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use clientbook::cli::{
    client_id, AddCommand, Cli, Command, ConfigCommand, DeleteCommand, EditCommand, ListCommand,
    ShowCommand,
};
use clientbook::render::{render_detail, render_form_error, render_list};
use clientbook::suggestions::{ExerciseCatalog, HttpExerciseCatalog};
use clientbook::{init_logging, ClientRepository, Config, SqliteStore, ViewController};

type Repository = ClientRepository<SqliteStore>;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    // Config subcommands load the file themselves.
    let load_config = || Config::load_from(cli.config.clone());

    match cli.command {
        Command::List(cmd) => handle_list(&open_repository(&load_config()?)?, cmd),
        Command::Add(cmd) => handle_add(&mut open_repository(&load_config()?)?, cmd),
        Command::Edit(cmd) => handle_edit(&mut open_repository(&load_config()?)?, cmd),
        Command::Delete(cmd) => handle_delete(&mut open_repository(&load_config()?)?, &cmd),
        Command::Show(cmd) => {
            let config = load_config()?;
            handle_show(&config, &open_repository(&config)?, cmd).await
        }
        Command::Status(cmd) => {
            let config = load_config()?;
            handle_status(&config, &open_repository(&config)?, cmd.json)
        }
        Command::Config(cmd) => handle_config(cli.config.clone(), cmd),
    }
}

fn open_repository(config: &Config) -> anyhow::Result<Repository> {
    let path = config.database_path();
    let store = SqliteStore::open(&path)
        .with_context(|| format!("cannot open client store at {}", path.display()))?;
    let repo = ClientRepository::open(store, config.storage.key.as_str())?;
    debug!(clients = repo.snapshot().len(), "Repository ready");
    Ok(repo)
}

fn handle_list(repo: &Repository, cmd: ListCommand) -> anyhow::Result<ExitCode> {
    let mut controller = ViewController::default();
    controller.show_list(cmd.query.unwrap_or_default());
    let snapshot = repo.snapshot();
    let visible = controller.visible_clients(&snapshot);
    println!("{}", render_list(&visible, cmd.format)?);
    Ok(ExitCode::SUCCESS)
}

fn handle_add(repo: &mut Repository, cmd: AddCommand) -> anyhow::Result<ExitCode> {
    let mut controller = ViewController::default();
    controller.open_create_form();
    submit(repo, &mut controller, cmd.fields.into_draft(), "Added")
}

fn handle_edit(repo: &mut Repository, cmd: EditCommand) -> anyhow::Result<ExitCode> {
    let mut controller = ViewController::default();
    let id = client_id(&cmd.id);
    let mut draft = controller.open_edit_form(&repo.snapshot(), &id)?;
    cmd.apply_to(&mut draft);
    submit(repo, &mut controller, draft, "Updated")
}

fn submit(
    repo: &mut Repository,
    controller: &mut ViewController,
    draft: clientbook::ClientDraft,
    verb: &str,
) -> anyhow::Result<ExitCode> {
    match controller.submit_form(repo, draft) {
        Ok(client) => {
            println!("{verb} client {} ({})", client.full_name, client.id());
            Ok(ExitCode::SUCCESS)
        }
        Err(err) if err.is_validation() => {
            if let Some(issue) = controller.form_error() {
                eprintln!("{}", render_form_error(issue));
            }
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err.into()),
    }
}

fn handle_delete(repo: &mut Repository, cmd: &DeleteCommand) -> anyhow::Result<ExitCode> {
    let mut controller = ViewController::default();
    let id = client_id(&cmd.id);
    if controller.delete(repo, &id)? {
        println!("Deleted client {id}");
    } else if let Some(notice) = controller.notice() {
        println!("{notice}");
    }
    Ok(ExitCode::SUCCESS)
}

async fn handle_show(
    config: &Config,
    repo: &Repository,
    cmd: ShowCommand,
) -> anyhow::Result<ExitCode> {
    let id = client_id(&cmd.id);
    let snapshot = repo.snapshot();
    let mut controller = ViewController::new(config.suggestions.enabled && !cmd.no_suggestions);

    if let Some(ticket) = controller.open_detail(&snapshot, &id)? {
        let outcome = match HttpExerciseCatalog::new(&config.suggestions) {
            Ok(catalog) => catalog.fetch_suggestions(config.suggestions.limit).await,
            Err(err) => Err(err),
        };
        controller.complete_fetch(ticket, outcome);
    }

    let client = snapshot
        .find(&id)
        .ok_or_else(|| clientbook::Error::not_found(&id))?;
    println!(
        "{}",
        render_detail(client, controller.suggestions(), cmd.format)?
    );
    Ok(ExitCode::SUCCESS)
}

fn handle_status(config: &Config, repo: &Repository, json: bool) -> anyhow::Result<ExitCode> {
    let stats = repo.store().stats(repo.key())?;
    let clients = repo.snapshot().len();

    if json {
        let status = serde_json::json!({
            "clients": clients,
            "database_path": config.database_path(),
            "storage_key": repo.key(),
            "db_size_bytes": stats.db_size_bytes,
            "last_saved": stats.last_saved.map(|t| t.to_rfc3339()),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("clientbook status");
        println!("-----------------");
        println!("Clients:       {clients}");
        println!("Database:      {}", config.database_path().display());
        println!("Storage key:   {}", repo.key());
        println!("Size:          {} bytes", stats.db_size_bytes);
        match stats.last_saved {
            Some(at) => println!("Last saved:    {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
            None => println!("Last saved:    never"),
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<ExitCode> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = &Config::load_from(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                let suggestions = &config.suggestions;
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Storage key:        {}", config.storage.key);
                println!();
                println!("[Suggestions]");
                println!("  Enabled:            {}", suggestions.enabled);
                println!("  Endpoint:           {}", suggestions.endpoint);
                println!("  Language:           {}", suggestions.language);
                println!("  Limit:              {}", suggestions.limit);
                println!("  Preview chars:      {}", suggestions.preview_chars);
                println!("  Timeout (secs):     {}", suggestions.timeout_secs);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::resolve_path(config_path).display());
        }
        ConfigCommand::Validate { file } => {
            let path = Config::resolve_path(file.or(config_path));
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => {
                    println!("Configuration error: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "clientbook_main_{name}_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_config_path_with_broken_config() {
        let broken = temp_config("broken_path", "[suggestions]\nlimit = 0\n");

        assert!(handle_config(Some(broken.clone()), ConfigCommand::Path).is_ok());

        let _ = std::fs::remove_file(&broken);
    }

    #[test]
    fn test_config_validate_other_file_with_broken_config() {
        let broken = temp_config("broken_validate", "[suggestions]\nlimit = 0\n");
        let good = temp_config("good_validate", "[suggestions]\nlimit = 3\n");

        let result = handle_config(
            Some(broken.clone()),
            ConfigCommand::Validate {
                file: Some(good.clone()),
            },
        );
        assert!(result.is_ok());

        // The broken file itself is reported, not propagated as an error.
        assert!(handle_config(Some(broken.clone()), ConfigCommand::Validate { file: None }).is_ok());

        let _ = std::fs::remove_file(&broken);
        let _ = std::fs::remove_file(&good);
    }

    #[test]
    fn test_config_show_reports_broken_config() {
        let broken = temp_config("broken_show", "[suggestions]\nlimit = 0\n");

        assert!(handle_config(Some(broken.clone()), ConfigCommand::Show { json: true }).is_err());

        let _ = std::fs::remove_file(&broken);
    }
}
