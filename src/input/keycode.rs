//! Key names as written in config files.

use winit::keyboard::KeyCode;

/// Parses a winit `KeyCode` name such as `"KeyD"` or `"Semicolon"`.
pub fn parse_keycode(s: &str) -> Option<KeyCode> {
    let code = match s {
        "KeyA" => KeyCode::KeyA, "KeyB" => KeyCode::KeyB, "KeyC" => KeyCode::KeyC,
        "KeyD" => KeyCode::KeyD, "KeyE" => KeyCode::KeyE, "KeyF" => KeyCode::KeyF,
        "KeyG" => KeyCode::KeyG, "KeyH" => KeyCode::KeyH, "KeyI" => KeyCode::KeyI,
        "KeyJ" => KeyCode::KeyJ, "KeyK" => KeyCode::KeyK, "KeyL" => KeyCode::KeyL,
        "KeyM" => KeyCode::KeyM, "KeyN" => KeyCode::KeyN, "KeyO" => KeyCode::KeyO,
        "KeyP" => KeyCode::KeyP, "KeyQ" => KeyCode::KeyQ, "KeyR" => KeyCode::KeyR,
        "KeyS" => KeyCode::KeyS, "KeyT" => KeyCode::KeyT, "KeyU" => KeyCode::KeyU,
        "KeyV" => KeyCode::KeyV, "KeyW" => KeyCode::KeyW, "KeyX" => KeyCode::KeyX,
        "KeyY" => KeyCode::KeyY, "KeyZ" => KeyCode::KeyZ,
        "Digit0" => KeyCode::Digit0, "Digit1" => KeyCode::Digit1, "Digit2" => KeyCode::Digit2,
        "Digit3" => KeyCode::Digit3, "Digit4" => KeyCode::Digit4, "Digit5" => KeyCode::Digit5,
        "Digit6" => KeyCode::Digit6, "Digit7" => KeyCode::Digit7, "Digit8" => KeyCode::Digit8,
        "Digit9" => KeyCode::Digit9,
        "Numpad0" => KeyCode::Numpad0, "Numpad1" => KeyCode::Numpad1, "Numpad2" => KeyCode::Numpad2,
        "Numpad3" => KeyCode::Numpad3, "Numpad4" => KeyCode::Numpad4, "Numpad5" => KeyCode::Numpad5,
        "Numpad6" => KeyCode::Numpad6, "Numpad7" => KeyCode::Numpad7, "Numpad8" => KeyCode::Numpad8,
        "Numpad9" => KeyCode::Numpad9,
        "Space" => KeyCode::Space, "Enter" => KeyCode::Enter, "Tab" => KeyCode::Tab,
        "ShiftLeft" => KeyCode::ShiftLeft, "ShiftRight" => KeyCode::ShiftRight,
        "ControlLeft" => KeyCode::ControlLeft, "ControlRight" => KeyCode::ControlRight,
        "AltLeft" => KeyCode::AltLeft, "AltRight" => KeyCode::AltRight,
        "Semicolon" => KeyCode::Semicolon, "Quote" => KeyCode::Quote,
        "Comma" => KeyCode::Comma, "Period" => KeyCode::Period, "Slash" => KeyCode::Slash,
        "Backslash" => KeyCode::Backslash,
        "BracketLeft" => KeyCode::BracketLeft, "BracketRight" => KeyCode::BracketRight,
        "Minus" => KeyCode::Minus, "Equal" => KeyCode::Equal,
        "ArrowUp" => KeyCode::ArrowUp, "ArrowDown" => KeyCode::ArrowDown,
        "ArrowLeft" => KeyCode::ArrowLeft, "ArrowRight" => KeyCode::ArrowRight,
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names() {
        assert_eq!(parse_keycode("KeyD"), Some(KeyCode::KeyD));
        assert_eq!(parse_keycode("Semicolon"), Some(KeyCode::Semicolon));
        assert_eq!(parse_keycode("Numpad5"), Some(KeyCode::Numpad5));
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(parse_keycode("keyd"), None);
        assert_eq!(parse_keycode("Hyper"), None);
    }
}
