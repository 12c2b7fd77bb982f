use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    MovePrev,
    MoveNext,
    Open,
    Add,
    Delete,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    MovePrev,
    MoveNext,
    Select,
    Save,
    Remove,
    DismissError,
    Back,
}

pub fn list_action_from_key(key: KeyEvent) -> Option<ListAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(ListAction::Quit);
    }
    match key.code {
        KeyCode::Up => Some(ListAction::MovePrev),
        KeyCode::Down => Some(ListAction::MoveNext),
        KeyCode::Enter | KeyCode::Char('\n') | KeyCode::Char('\r') | KeyCode::Char('e') => {
            Some(ListAction::Open)
        }
        KeyCode::Char('a') => Some(ListAction::Add),
        KeyCode::Char('d') => Some(ListAction::Delete),
        KeyCode::Esc | KeyCode::Char('q') => Some(ListAction::Quit),
        _ => None,
    }
}

pub fn edit_action_from_key(key: KeyEvent) -> Option<EditAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(EditAction::Back);
    }
    match key.code {
        KeyCode::Up => Some(EditAction::MovePrev),
        KeyCode::Down => Some(EditAction::MoveNext),
        KeyCode::Enter | KeyCode::Char('\n') | KeyCode::Char('\r') => Some(EditAction::Select),
        KeyCode::Char('s') => Some(EditAction::Save),
        KeyCode::Char('d') => Some(EditAction::Remove),
        KeyCode::Char('x') => Some(EditAction::DismissError),
        KeyCode::Esc => Some(EditAction::Back),
        _ => None,
    }
}

pub fn parse_scripted_keys(raw: &str) -> Result<Vec<KeyEvent>, String> {
    let mut keys = Vec::new();
    for token in raw.split(',') {
        let normalized = token.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            continue;
        }
        let key = match normalized.as_str() {
            "up" => KeyEvent::new(KeyCode::Up, KeyModifiers::NONE),
            "down" => KeyEvent::new(KeyCode::Down, KeyModifiers::NONE),
            "enter" => KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE),
            "esc" => KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
            "ctrl-c" => KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            "a" => KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE),
            "d" => KeyEvent::new(KeyCode::Char('d'), KeyModifiers::NONE),
            "e" => KeyEvent::new(KeyCode::Char('e'), KeyModifiers::NONE),
            "s" => KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE),
            "x" => KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE),
            "q" => KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE),
            other => {
                return Err(format!(
                    "invalid DIMCFG_SCRIPT_KEYS token `{other}`; valid tokens: up,down,enter,esc,ctrl-c,a,d,e,s,x,q"
                ));
            }
        };
        keys.push(key);
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn list_keys_map_to_actions() {
        assert_eq!(list_action_from_key(key(KeyCode::Up)), Some(ListAction::MovePrev));
        assert_eq!(
            list_action_from_key(key(KeyCode::Char('e'))),
            Some(ListAction::Open)
        );
        assert_eq!(
            list_action_from_key(key(KeyCode::Char('q'))),
            Some(ListAction::Quit)
        );
        assert_eq!(list_action_from_key(key(KeyCode::Char('z'))), None);
    }

    #[test]
    fn edit_keys_map_dismiss_and_save() {
        assert_eq!(
            edit_action_from_key(key(KeyCode::Char('x'))),
            Some(EditAction::DismissError)
        );
        assert_eq!(
            edit_action_from_key(key(KeyCode::Char('s'))),
            Some(EditAction::Save)
        );
        assert_eq!(edit_action_from_key(key(KeyCode::Esc)), Some(EditAction::Back));
    }

    #[test]
    fn scripted_keys_parse_and_reject_unknown_tokens() {
        let keys = parse_scripted_keys("down, enter ,q").expect("parse");
        assert_eq!(keys.len(), 3);
        assert!(parse_scripted_keys("down,warp").is_err());
    }
}
