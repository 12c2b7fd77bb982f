use crate::config::{DimensionName, Mapping, MappingTarget};
use crate::overlay::dimension_overlay;
use crate::session::{
    confirm_transition, ConfirmAction, DeleteOutcome, MappingEditController, SaveOutcome,
    SessionError,
};
use crate::shared::field_key::FieldKey;
use crate::shared::ids::ScopeId;
use crate::store::{ConfigStore, FileStore};
use crate::tui::run_dimensions_tui;
use std::path::PathBuf;

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Usage: dimcfg <command> [args]".to_string(),
        "  list <scope>                       list dimension mappings".to_string(),
        "  set <scope> <name> <type> [--rename-from <old>]".to_string(),
        "                                     add or update a mapping (type: TAG|REPORT_FIELD)"
            .to_string(),
        "  rm <scope> <name> --yes            remove a mapping (requires --yes)".to_string(),
        "  clear-error <scope> <name>         dismiss a stored sync error".to_string(),
        "  edit <scope>                       open the interactive dimension screens".to_string(),
        "State root: ./dimcfg-state, override with DIMCFG_STATE_ROOT.".to_string(),
    ]
}

fn state_root() -> PathBuf {
    match std::env::var("DIMCFG_STATE_ROOT") {
        Ok(value) if !value.trim().is_empty() => PathBuf::from(value),
        _ => PathBuf::from("./dimcfg-state"),
    }
}

fn parse_scope(raw: &str) -> Result<ScopeId, String> {
    ScopeId::parse(raw)
}

pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    let mut store = FileStore::new(state_root());
    run_cli_with_store(&mut store, args)
}

/// Verb dispatch shared by the binary and tests; the store is injected so
/// tests can run against a scratch directory or an in-memory store.
pub fn run_cli_with_store<S: ConfigStore>(
    store: &mut S,
    args: Vec<String>,
) -> Result<String, String> {
    let Some(verb) = args.first() else {
        return Ok(cli_help_lines().join("\n"));
    };
    let rest = &args[1..];
    match verb.as_str() {
        "help" | "--help" | "-h" => Ok(cli_help_lines().join("\n")),
        "list" => cmd_list(store, rest),
        "set" => cmd_set(store, rest),
        "rm" => cmd_rm(store, rest),
        "clear-error" => cmd_clear_error(store, rest),
        "edit" => cmd_edit(store, rest),
        other => Err(format!(
            "unknown command `{other}`; run `dimcfg help` for usage"
        )),
    }
}

fn cmd_list<S: ConfigStore>(store: &S, args: &[String]) -> Result<String, String> {
    let [scope] = args else {
        return Err("usage: dimcfg list <scope>".to_string());
    };
    let scope = parse_scope(scope)?;
    let snapshot = store
        .read_configuration(&scope)
        .map_err(|e| e.to_string())?;
    if snapshot.dimensions.is_empty() {
        return Ok(format!("no dimensions configured in `{scope}`"));
    }
    let mut lines = Vec::with_capacity(snapshot.dimensions.len());
    for mapping in snapshot.dimensions.iter() {
        let overlay = dimension_overlay(&snapshot, &mapping.name);
        let mut line = format!("{} -> {}", mapping.name.as_str(), mapping.target.as_str());
        if let Some(action) = overlay.pending_action {
            line.push_str(&format!(" [pending: {action}]"));
        }
        if let Some(error) = &overlay.error {
            line.push_str(&format!(" [error: {error}]"));
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

fn cmd_set<S: ConfigStore>(store: &mut S, args: &[String]) -> Result<String, String> {
    let (positional, rename_from) = split_rename_flag(args)?;
    let [scope, name, target] = positional.as_slice() else {
        return Err(
            "usage: dimcfg set <scope> <name> <type> [--rename-from <old>]".to_string(),
        );
    };
    let scope = parse_scope(scope)?;
    let name = DimensionName::parse(name)?;
    let target = MappingTarget::parse(target)?;
    let original = match rename_from {
        Some(old) => DimensionName::parse(&old)?,
        None => name.clone(),
    };

    // Rename goes through the edit controller so collision checks apply; a
    // plain set upserts directly like the screens' add path.
    if original.as_str() != name.as_str() {
        let mut controller = MappingEditController::new(store, scope.clone());
        let mut session = controller
            .load_for_edit(&original)
            .map_err(|e| match e {
                SessionError::NotFound { .. } => {
                    format!("dimension `{original}` not found in `{scope}`")
                }
                other => other.to_string(),
            })?;
        session.draft.name = name.as_str().to_string();
        session.draft.target = Some(target);
        match controller.save(&session).map_err(|e| e.to_string())? {
            SaveOutcome::Rejected(errors) => {
                Err(crate::tui::flows::format_field_errors(&errors))
            }
            SaveOutcome::Dispatched { .. } => Ok(format!(
                "dimension `{original}` renamed to `{name}` ({target}) in `{scope}`"
            )),
        }
    } else {
        store
            .mutate_mapping(
                &scope,
                &name,
                Mapping {
                    name: name.clone(),
                    target,
                },
            )
            .map_err(|e| e.to_string())?;
        Ok(format!("dimension `{name}` set to {target} in `{scope}`"))
    }
}

fn cmd_rm<S: ConfigStore>(store: &mut S, args: &[String]) -> Result<String, String> {
    let confirmed = args.iter().any(|arg| arg == "--yes");
    let positional: Vec<&String> = args.iter().filter(|arg| *arg != "--yes").collect();
    let [scope, name] = positional.as_slice() else {
        return Err("usage: dimcfg rm <scope> <name> --yes".to_string());
    };
    let scope = parse_scope(scope)?;
    let name = DimensionName::parse(name)?;
    if !confirmed {
        return Err(format!(
            "refusing to remove `{name}` without --yes; removal cannot be undone locally"
        ));
    }

    let mut controller = MappingEditController::new(store, scope.clone());
    let mut session = controller.load_for_edit(&name).map_err(|e| match e {
        SessionError::NotFound { .. } => format!("dimension `{name}` not found in `{scope}`"),
        other => other.to_string(),
    })?;
    confirm_transition(&mut session.confirm, ConfirmAction::Request)
        .map_err(|e| e.to_string())?;
    match controller.delete(&mut session).map_err(|e| e.to_string())? {
        DeleteOutcome::Dispatched { .. } => Ok(format!("dimension `{name}` removed from `{scope}`")),
        DeleteOutcome::NotConfirmed => Err("removal was not confirmed".to_string()),
    }
}

fn cmd_clear_error<S: ConfigStore>(store: &mut S, args: &[String]) -> Result<String, String> {
    let [scope, name] = args else {
        return Err("usage: dimcfg clear-error <scope> <name>".to_string());
    };
    let scope = parse_scope(scope)?;
    let name = DimensionName::parse(name)?;
    let key = FieldKey::dimension(&name);
    MappingEditController::new(store, scope.clone())
        .clear_field_error(&key)
        .map_err(|e| e.to_string())?;
    Ok(format!("cleared stored error for `{name}` in `{scope}`"))
}

fn cmd_edit<S: ConfigStore>(store: &mut S, args: &[String]) -> Result<String, String> {
    let [scope] = args else {
        return Err("usage: dimcfg edit <scope>".to_string());
    };
    let scope = parse_scope(scope)?;
    run_dimensions_tui(store, &scope)
}

fn split_rename_flag(args: &[String]) -> Result<(Vec<String>, Option<String>), String> {
    let mut positional = Vec::new();
    let mut rename_from = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--rename-from" {
            let value = iter
                .next()
                .ok_or_else(|| "--rename-from requires a value".to_string())?;
            rename_from = Some(value.clone());
        } else {
            positional.push(arg.clone());
        }
    }
    Ok((positional, rename_from))
}
