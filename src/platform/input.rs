//! Keyboard mapping
//!
//! Turns `KeyboardEvent.code` strings into game commands. Anything unmapped
//! is ignored by the caller.

use crate::sim::Direction;

/// A command produced by one key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Move(Direction),
    /// Escape: pause or resume while a run is active
    TogglePause,
    /// Enter/Space: start from the menu, or restart after game over
    Confirm,
}

/// Map a `KeyboardEvent.code` to an action
pub fn map_key(code: &str) -> Option<KeyAction> {
    let action = match code {
        "ArrowUp" | "KeyW" => KeyAction::Move(Direction::North),
        "ArrowDown" | "KeyS" => KeyAction::Move(Direction::South),
        "ArrowRight" | "KeyD" => KeyAction::Move(Direction::East),
        "ArrowLeft" | "KeyA" => KeyAction::Move(Direction::West),
        "Escape" => KeyAction::TogglePause,
        "Enter" | "Space" => KeyAction::Confirm,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrows_and_wasd() {
        assert_eq!(map_key("ArrowUp"), Some(KeyAction::Move(Direction::North)));
        assert_eq!(map_key("KeyS"), Some(KeyAction::Move(Direction::South)));
        assert_eq!(map_key("KeyD"), Some(KeyAction::Move(Direction::East)));
        assert_eq!(map_key("ArrowLeft"), Some(KeyAction::Move(Direction::West)));
    }

    #[test]
    fn test_unmapped_ignored() {
        assert_eq!(map_key("KeyQ"), None);
        assert_eq!(map_key(""), None);
        assert_eq!(map_key("Escape"), Some(KeyAction::TogglePause));
    }
}
