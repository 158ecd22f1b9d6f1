/// Keys the exercise cares about, decoupled from the terminal backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Backspace,
    Enter,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditAction {
    Append(char),
    DeleteLast,
    Submit,
}

/// Map one key press to an edit of the answer buffer.
///
/// Every key is dropped while the current question is locked. Only ASCII
/// letters are typed; Enter submits only a non-empty buffer.
pub fn reduce(key: KeyInput, locked: bool, buffer_empty: bool) -> Option<EditAction> {
    if locked {
        return None;
    }
    match key {
        KeyInput::Char(ch) if ch.is_ascii_alphabetic() => Some(EditAction::Append(ch)),
        KeyInput::Backspace => Some(EditAction::DeleteLast),
        KeyInput::Enter if !buffer_empty => Some(EditAction::Submit),
        _ => None,
    }
}
