use crate::config::{DimensionName, Mapping, MappingTarget, ALL_MAPPING_TARGETS};
use crate::overlay::dimension_overlay;
use crate::session::{
    confirm_transition, ConfirmAction, ConfirmEffect, DeleteOutcome, MappingEditController,
    SaveOutcome, SessionError,
};
use crate::shared::ids::ScopeId;
use crate::store::ConfigStore;
use crate::tui::keys::{
    edit_action_from_key, list_action_from_key, parse_scripted_keys, EditAction, ListAction,
};
use crate::tui::screens::{
    draw_confirm_modal, draw_field_screen, draw_list_screen, field_row, tail_for_display,
    centered_rect,
};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Padding, Paragraph};
use ratatui::Terminal;
use std::io;
use std::time::Duration;

const LIST_STATUS_TEXT: &str = "Enter opens a dimension. a add, d remove. Esc quits.";
const LIST_HINT_TEXT: &str = "Up/Down move | Enter open | a add | d remove | Esc quit";
const EDIT_STATUS_TEXT: &str = "Enter edits the selected field. s save, d remove, x dismiss error.";
const EDIT_HINT_TEXT: &str = "Up/Down move | Enter edit | s save | d remove | x dismiss | Esc back";

/// Runs the dimension screens for one scope. With `DIMCFG_SCRIPT_KEYS` set,
/// drives the list loop from the scripted key sequence instead of a terminal.
pub fn run_dimensions_tui<S: ConfigStore>(
    store: &mut S,
    scope: &ScopeId,
) -> Result<String, String> {
    if let Ok(raw) = std::env::var("DIMCFG_SCRIPT_KEYS") {
        let keys = parse_scripted_keys(&raw)?;
        return run_dimensions_scripted(store, scope, keys);
    }

    let mut stdout = io::stdout();
    enable_raw_mode().map_err(|e| format!("failed to enable raw mode: {e}"))?;
    execute!(stdout, EnterAlternateScreen, Hide)
        .map_err(|e| format!("failed to enter dimension screen: {e}"))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|e| format!("failed to create terminal: {e}"))?;
    let result = run_list_loop(&mut terminal, store, scope);
    disable_raw_mode().map_err(|e| format!("failed to disable raw mode: {e}"))?;
    execute!(terminal.backend_mut(), Show, LeaveAlternateScreen)
        .map_err(|e| format!("failed to leave dimension screen: {e}"))?;
    result
}

pub(crate) fn format_field_errors(
    errors: &crate::config::FieldErrors,
) -> String {
    let parts: Vec<String> = errors
        .iter()
        .flat_map(|(field, field_errors)| {
            field_errors
                .iter()
                .map(move |error| format!("{}: {error}", field.as_str()))
        })
        .collect();
    parts.join("; ")
}

fn dimension_rows<S: ConfigStore>(
    store: &S,
    scope: &ScopeId,
) -> Result<Vec<(DimensionName, String)>, String> {
    let snapshot = store
        .read_configuration(scope)
        .map_err(|e| e.to_string())?;
    let rows = snapshot
        .dimensions
        .iter()
        .map(|mapping| {
            let overlay = dimension_overlay(&snapshot, &mapping.name);
            let mut label = format!("{} [{}]", mapping.name.as_str(), mapping.target.as_str());
            if overlay.is_pending() {
                label.push_str(" ~syncing");
            }
            if overlay.has_error() {
                label.push_str(" !error");
            }
            (mapping.name.clone(), label)
        })
        .collect();
    Ok(rows)
}

fn run_list_loop<S: ConfigStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    store: &mut S,
    scope: &ScopeId,
) -> Result<String, String> {
    let mut selected = 0usize;
    let mut status = LIST_STATUS_TEXT.to_string();
    loop {
        let rows = dimension_rows(store, scope)?;
        selected = selected.min(rows.len().saturating_sub(1));
        let items: Vec<String> = if rows.is_empty() {
            vec!["<no dimensions configured>".to_string()]
        } else {
            rows.iter().map(|(_, label)| label.clone()).collect()
        };
        draw_list_screen(
            terminal,
            &format!("Dimensions > {scope}"),
            None,
            &items,
            selected,
            &status,
            LIST_HINT_TEXT,
        )?;

        if !event::poll(Duration::from_millis(250))
            .map_err(|e| format!("failed to poll dimension list input: {e}"))?
        {
            continue;
        }
        let ev = event::read().map_err(|e| format!("failed to read dimension list input: {e}"))?;
        let Event::Key(key) = ev else {
            continue;
        };
        let Some(action) = list_action_from_key(key) else {
            continue;
        };
        match action {
            ListAction::MovePrev => selected = selected.saturating_sub(1),
            ListAction::MoveNext => {
                selected = std::cmp::min(selected + 1, rows.len().saturating_sub(1))
            }
            ListAction::Open => {
                let Some((name, _)) = rows.get(selected) else {
                    status = "no dimensions configured".to_string();
                    continue;
                };
                match run_edit_loop(terminal, store, scope, name.clone())? {
                    Some(message) => status = message,
                    None => status = LIST_STATUS_TEXT.to_string(),
                }
            }
            ListAction::Add => {
                if let Some(raw) =
                    prompt_line_tui(terminal, "Add Dimension", "New dimension name:", "")?
                {
                    match add_dimension(store, scope, raw.trim()) {
                        Ok(message) => status = message,
                        Err(message) => status = message,
                    }
                }
            }
            ListAction::Delete => {
                let Some((name, _)) = rows.get(selected) else {
                    status = "no dimensions to remove".to_string();
                    continue;
                };
                match run_remove_flow(terminal, store, scope, name)? {
                    Some(message) => status = message,
                    None => status = "removal canceled".to_string(),
                }
            }
            ListAction::Quit => return Ok("closed dimension screens".to_string()),
        }
    }
}

fn add_dimension<S: ConfigStore>(
    store: &mut S,
    scope: &ScopeId,
    raw: &str,
) -> Result<String, String> {
    let name = DimensionName::parse(raw)?;
    let snapshot = store
        .read_configuration(scope)
        .map_err(|e| e.to_string())?;
    if snapshot.dimensions.contains(name.as_str()) {
        return Err(format!("dimension `{}` already exists", name.as_str()));
    }
    store
        .mutate_mapping(
            scope,
            &name,
            Mapping {
                name: name.clone(),
                target: MappingTarget::Tag,
            },
        )
        .map_err(|e| e.to_string())?;
    Ok(format!("dimension `{}` added", name.as_str()))
}

fn run_edit_loop<S: ConfigStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    store: &mut S,
    scope: &ScopeId,
    name: DimensionName,
) -> Result<Option<String>, String> {
    let mut session = match MappingEditController::new(store, scope.clone()).load_for_edit(&name) {
        Ok(session) => session,
        Err(SessionError::NotFound { .. }) => {
            return Ok(Some(format!(
                "nothing to edit: dimension `{}` no longer exists",
                name.as_str()
            )));
        }
        Err(err) => return Err(err.to_string()),
    };
    let mut selected = 0usize;
    let mut status = EDIT_STATUS_TEXT.to_string();
    loop {
        let snapshot = store
            .read_configuration(scope)
            .map_err(|e| e.to_string())?;
        let overlay = dimension_overlay(&snapshot, &session.original_name);
        let banner = overlay
            .error
            .as_ref()
            .map(|message| format!("sync error: {message} (x dismisses)"))
            .or_else(|| {
                overlay
                    .pending_action
                    .map(|_| "syncing: change not yet confirmed".to_string())
            });
        let rows = vec![
            field_row("Name", Some(session.draft.name.clone())),
            field_row(
                "Type",
                Some(
                    session
                        .draft
                        .target
                        .map(|target| target.as_str().to_string())
                        .unwrap_or_else(|| "<unset>".to_string()),
                ),
            ),
            field_row("Remove", None),
        ];
        draw_field_screen(
            terminal,
            &format!("Dimensions > {scope} > {}", session.original_name),
            banner.as_deref(),
            &rows,
            selected,
            &status,
            EDIT_HINT_TEXT,
        )?;

        let ev = event::read().map_err(|e| format!("failed to read dimension edit input: {e}"))?;
        let Event::Key(key) = ev else {
            continue;
        };
        let Some(action) = edit_action_from_key(key) else {
            continue;
        };
        match action {
            EditAction::MovePrev => selected = selected.saturating_sub(1),
            EditAction::MoveNext => selected = std::cmp::min(selected + 1, rows.len() - 1),
            EditAction::Select => match selected {
                0 => {
                    if let Some(value) = prompt_line_tui(
                        terminal,
                        "Dimension Name",
                        "Set dimension name:",
                        &session.draft.name,
                    )? {
                        session.draft.name = value;
                        status = revalidate_status(store, scope, &session)?;
                    }
                }
                1 => {
                    session.draft.target = Some(next_target(session.draft.target));
                    status = revalidate_status(store, scope, &session)?;
                }
                _ => {
                    if let Some(message) = run_confirm_modal(terminal, store, scope, &mut session)? {
                        return Ok(Some(message));
                    }
                    status = "removal canceled".to_string();
                }
            },
            EditAction::Save => {
                let outcome = MappingEditController::new(store, scope.clone())
                    .save(&session)
                    .map_err(|e| e.to_string())?;
                match outcome {
                    SaveOutcome::Rejected(errors) => status = format_field_errors(&errors),
                    SaveOutcome::Dispatched { .. } => {
                        return Ok(Some(format!(
                            "dimension `{}` saved",
                            session.draft.name
                        )));
                    }
                }
            }
            EditAction::Remove => {
                if let Some(message) = run_confirm_modal(terminal, store, scope, &mut session)? {
                    return Ok(Some(message));
                }
                status = "removal canceled".to_string();
            }
            EditAction::DismissError => {
                let key = session.field_key();
                MappingEditController::new(store, scope.clone())
                    .clear_field_error(&key)
                    .map_err(|e| e.to_string())?;
                status = "error dismissed".to_string();
            }
            EditAction::Back => return Ok(None),
        }
    }
}

fn revalidate_status<S: ConfigStore>(
    store: &S,
    scope: &ScopeId,
    session: &crate::session::EditSession,
) -> Result<String, String> {
    let snapshot = store
        .read_configuration(scope)
        .map_err(|e| e.to_string())?;
    let errors = crate::config::validate_dimension_draft(
        &session.draft,
        &snapshot.dimensions,
        &session.original_name,
    );
    if errors.is_empty() {
        Ok(EDIT_STATUS_TEXT.to_string())
    } else {
        Ok(format_field_errors(&errors))
    }
}

fn next_target(current: Option<MappingTarget>) -> MappingTarget {
    let Some(current) = current else {
        return ALL_MAPPING_TARGETS[0];
    };
    let idx = ALL_MAPPING_TARGETS
        .iter()
        .position(|target| *target == current)
        .unwrap_or(0);
    ALL_MAPPING_TARGETS[(idx + 1) % ALL_MAPPING_TARGETS.len()]
}

fn run_remove_flow<S: ConfigStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    store: &mut S,
    scope: &ScopeId,
    name: &DimensionName,
) -> Result<Option<String>, String> {
    let mut session = match MappingEditController::new(store, scope.clone()).load_for_edit(name) {
        Ok(session) => session,
        Err(SessionError::NotFound { .. }) => {
            return Ok(Some(format!(
                "dimension `{}` no longer exists",
                name.as_str()
            )));
        }
        Err(err) => return Err(err.to_string()),
    };
    run_confirm_modal(terminal, store, scope, &mut session)
}

/// Drives the confirmation state machine against the modal; `Some(message)`
/// means the removal was dispatched and the caller should navigate back.
fn run_confirm_modal<S: ConfigStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    store: &mut S,
    scope: &ScopeId,
    session: &mut crate::session::EditSession,
) -> Result<Option<String>, String> {
    confirm_transition(&mut session.confirm, ConfirmAction::Request)
        .map_err(|e| e.to_string())?;
    loop {
        draw_confirm_modal(
            terminal,
            "Remove Dimension",
            &format!(
                "Remove dimension `{}`? This cannot be undone locally.",
                session.original_name.as_str()
            ),
        )?;
        let ev = event::read().map_err(|e| format!("failed to read confirm input: {e}"))?;
        let Event::Key(key) = ev else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }
        let action = match key.code {
            KeyCode::Enter | KeyCode::Char('\n') | KeyCode::Char('\r') | KeyCode::Char('y') => {
                ConfirmAction::Confirm
            }
            KeyCode::Esc | KeyCode::Char('n') => ConfirmAction::Cancel,
            _ => continue,
        };
        let effect = confirm_transition(&mut session.confirm, action).map_err(|e| e.to_string())?;
        match effect {
            ConfirmEffect::ProceedDelete => {
                let outcome = MappingEditController::new(store, scope.clone())
                    .delete(session)
                    .map_err(|e| e.to_string())?;
                return match outcome {
                    DeleteOutcome::Dispatched { .. } => Ok(Some(format!(
                        "dimension `{}` removed",
                        session.original_name.as_str()
                    ))),
                    DeleteOutcome::NotConfirmed => Ok(None),
                };
            }
            ConfirmEffect::DismissPrompt => return Ok(None),
            ConfirmEffect::ShowPrompt => {}
        }
    }
}

fn run_dimensions_scripted<S: ConfigStore>(
    store: &mut S,
    scope: &ScopeId,
    keys: Vec<crossterm::event::KeyEvent>,
) -> Result<String, String> {
    let mut selected = 0usize;
    for key in keys {
        let rows = dimension_rows(store, scope)?;
        selected = selected.min(rows.len().saturating_sub(1));
        let Some(action) = list_action_from_key(key) else {
            continue;
        };
        match action {
            ListAction::MovePrev => selected = selected.saturating_sub(1),
            ListAction::MoveNext => {
                selected = std::cmp::min(selected + 1, rows.len().saturating_sub(1))
            }
            ListAction::Quit => {
                return Ok(format!(
                    "closed dimension screens ({} dimensions in {scope})",
                    rows.len()
                ));
            }
            ListAction::Open | ListAction::Add | ListAction::Delete => {
                return Err("scripted mode does not support prompt or modal actions".to_string());
            }
        }
    }
    Err("scripted run did not terminate; include a quit key".to_string())
}

fn prompt_line_tui(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    title: &str,
    prompt: &str,
    initial: &str,
) -> Result<Option<String>, String> {
    let mut value = initial.to_string();
    loop {
        terminal
            .draw(|frame| {
                let area = centered_rect(70, 30, frame.area());
                let block = Block::default()
                    .borders(Borders::ALL)
                    .padding(Padding::new(2, 2, 1, 1));
                frame.render_widget(block.clone(), area);
                let inner = block.inner(area);
                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(1),
                        Constraint::Length(1),
                        Constraint::Length(1),
                        Constraint::Length(1),
                        Constraint::Length(1),
                        Constraint::Min(1),
                    ])
                    .split(inner);
                let max_input_width = rows[3].width.saturating_sub(2) as usize;
                let display_value = tail_for_display(&value, max_input_width);

                frame.render_widget(
                    Paragraph::new(Line::from(Span::styled(
                        title,
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ))),
                    rows[0],
                );
                frame.render_widget(Paragraph::new(prompt), rows[2]);
                frame.render_widget(
                    Paragraph::new(Line::from(format!("> {display_value}"))),
                    rows[3],
                );
                frame.render_widget(Paragraph::new("Enter apply, Esc cancel"), rows[4]);
                frame.set_cursor_position((
                    rows[3].x + 2 + display_value.chars().count() as u16,
                    rows[3].y,
                ));
            })
            .map_err(|e| format!("failed to render prompt: {e}"))?;
        let ev = event::read().map_err(|e| format!("failed to read prompt input: {e}"))?;
        let Event::Key(key) = ev else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }
        match key.code {
            KeyCode::Esc => return Ok(None),
            KeyCode::Enter | KeyCode::Char('\n') | KeyCode::Char('\r') => return Ok(Some(value)),
            KeyCode::Backspace => {
                value.pop();
            }
            KeyCode::Char(ch) => value.push(ch),
            _ => {}
        }
    }
}
