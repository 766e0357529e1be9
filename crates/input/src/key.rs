use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors from decoding raw input values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("unknown key code: {0}")]
    UnknownKeyCode(i32),
    #[error("unknown key name: {0:?}")]
    UnknownKey(String),
    #[error("unknown key action: {0}")]
    UnknownAction(i32),
}

/// The set of keys the camera tracks.
///
/// Raw codes follow the GLFW key numbering so scripted input recorded against
/// the classic callback API decodes unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    W,
    A,
    S,
    D,
    Space,
    Escape,
    Right,
    Left,
    Down,
    Up,
}

/// Direction a held key displaces the camera in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movement {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
}

impl Movement {
    pub const ALL: [Movement; 4] = [
        Movement::Forward,
        Movement::Backward,
        Movement::StrafeLeft,
        Movement::StrafeRight,
    ];
}

impl Key {
    pub const ALL: [Key; 10] = [
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::Space,
        Key::Escape,
        Key::Right,
        Key::Left,
        Key::Down,
        Key::Up,
    ];

    /// GLFW-compatible raw code.
    pub fn code(self) -> i32 {
        match self {
            Key::Space => 32,
            Key::A => 65,
            Key::D => 68,
            Key::S => 83,
            Key::W => 87,
            Key::Escape => 256,
            Key::Right => 262,
            Key::Left => 263,
            Key::Down => 264,
            Key::Up => 265,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Key::W => "w",
            Key::A => "a",
            Key::S => "s",
            Key::D => "d",
            Key::Space => "space",
            Key::Escape => "escape",
            Key::Right => "right",
            Key::Left => "left",
            Key::Down => "down",
            Key::Up => "up",
        }
    }

    /// Movement bound to this key, if any. Arrow keys mirror WASD; a
    /// direction held on both counts once.
    pub fn movement(self) -> Option<Movement> {
        match self {
            Key::W | Key::Up => Some(Movement::Forward),
            Key::S | Key::Down => Some(Movement::Backward),
            Key::A | Key::Left => Some(Movement::StrafeLeft),
            Key::D | Key::Right => Some(Movement::StrafeRight),
            Key::Space | Key::Escape => None,
        }
    }
}

impl TryFrom<i32> for Key {
    type Error = InputError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Key::ALL
            .into_iter()
            .find(|k| k.code() == code)
            .ok_or(InputError::UnknownKeyCode(code))
    }
}

impl FromStr for Key {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let alias = match lower.as_str() {
            "esc" => "escape",
            "arrowup" => "up",
            "arrowdown" => "down",
            "arrowleft" => "left",
            "arrowright" => "right",
            other => other,
        };
        Key::ALL
            .into_iter()
            .find(|k| k.name() == alias)
            .ok_or_else(|| InputError::UnknownKey(s.to_string()))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Key transition delivered by the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyAction {
    Released,
    Pressed,
    /// Auto-repeat while held. Leaves the key map untouched.
    Repeat,
}

impl TryFrom<i32> for KeyAction {
    type Error = InputError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(KeyAction::Released),
            1 => Ok(KeyAction::Pressed),
            2 => Ok(KeyAction::Repeat),
            other => Err(InputError::UnknownAction(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_codes_round_trip() {
        for key in Key::ALL {
            assert_eq!(Key::try_from(key.code()), Ok(key));
        }
    }

    #[test]
    fn out_of_range_codes_are_rejected() {
        assert_eq!(Key::try_from(-1), Err(InputError::UnknownKeyCode(-1)));
        assert_eq!(Key::try_from(1024), Err(InputError::UnknownKeyCode(1024)));
        assert_eq!(Key::try_from(66), Err(InputError::UnknownKeyCode(66)));
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!("W".parse::<Key>(), Ok(Key::W));
        assert_eq!(" up ".parse::<Key>(), Ok(Key::Up));
        assert_eq!("Esc".parse::<Key>(), Ok(Key::Escape));
        assert_eq!("ArrowLeft".parse::<Key>(), Ok(Key::Left));
        assert!(matches!(
            "q".parse::<Key>(),
            Err(InputError::UnknownKey(name)) if name == "q"
        ));
    }

    #[test]
    fn movement_bindings() {
        assert_eq!(Key::W.movement(), Some(Movement::Forward));
        assert_eq!(Key::Up.movement(), Some(Movement::Forward));
        assert_eq!(Key::S.movement(), Some(Movement::Backward));
        assert_eq!(Key::A.movement(), Some(Movement::StrafeLeft));
        assert_eq!(Key::Right.movement(), Some(Movement::StrafeRight));
        assert_eq!(Key::Escape.movement(), None);
        assert_eq!(Key::Space.movement(), None);
    }

    #[test]
    fn key_actions_decode() {
        assert_eq!(KeyAction::try_from(0), Ok(KeyAction::Released));
        assert_eq!(KeyAction::try_from(1), Ok(KeyAction::Pressed));
        assert_eq!(KeyAction::try_from(2), Ok(KeyAction::Repeat));
        assert_eq!(KeyAction::try_from(3), Err(InputError::UnknownAction(3)));
    }
}
