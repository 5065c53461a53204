//! Operator commands decoded from the coordinator's mailbox.
//!
//! The coordinator stores one free-text command; every tick the device
//! polls it and decodes the text into [`Command`].  Anything not
//! recognised becomes [`Command::Unknown`] and changes nothing.

use core::fmt;

/// Commands the coordinator can hand to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    MoveMotor,
    StopMotor,
    PlaySound,
    StopSound,
    StartWater,
    StopWater,
    /// Unrecognised, missing or malformed command text.
    Unknown,
}

impl Command {
    /// Every command with a wire text, in mailbox order.
    pub const RECOGNISED: [Command; 6] = [
        Command::MoveMotor,
        Command::StopMotor,
        Command::PlaySound,
        Command::StopSound,
        Command::StartWater,
        Command::StopWater,
    ];

    /// Decode mailbox text.  Matching is case-insensitive.
    pub fn parse(text: &str) -> Self {
        match text.to_lowercase().as_str() {
            "move motor" => Self::MoveMotor,
            "stop motor" => Self::StopMotor,
            "play sound" => Self::PlaySound,
            "stop sound" => Self::StopSound,
            "start water" => Self::StartWater,
            "stop water" => Self::StopWater,
            _ => Self::Unknown,
        }
    }

    /// Canonical wire text, `None` for [`Command::Unknown`].
    pub fn as_text(self) -> Option<&'static str> {
        match self {
            Self::MoveMotor => Some("move motor"),
            Self::StopMotor => Some("stop motor"),
            Self::PlaySound => Some("play sound"),
            Self::StopSound => Some("stop sound"),
            Self::StartWater => Some("start water"),
            Self::StopWater => Some("stop water"),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text().unwrap_or("unknown"))
    }
}
