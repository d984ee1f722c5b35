//! Screensaver invocation modes from the command line.
//!
//! Windows launches screensavers with `/s` to run, `/c` or `/c:<hwnd>` to
//! configure and `/p <hwnd>` to preview. Switches are case-insensitive and
//! may use `/` or `-`.

use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Full-screen animation. Debug runs windowed and only exits on Escape.
    Show { debug: bool },
    /// Options dialog.
    Configure,
    /// Preview inside the host's window handle.
    Preview { handle: u64 },
    /// Make this executable the active screensaver.
    Register,
    Unregister,
}

impl Mode {
    pub fn is_debug(&self) -> bool {
        matches!(self, Mode::Show { debug: true })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModeError {
    #[error("preview mode requires a window handle")]
    MissingPreviewHandle,
    #[error("invalid window handle: {0}")]
    InvalidHandle(String),
    #[error("unknown argument: {0}")]
    Unknown(String),
}

pub fn parse<I>(args: I) -> Result<Mode, ModeError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut debug = false;
    let mut configure = false;
    let mut preview = None;
    let mut registration = None;

    while let Some(arg) = args.next() {
        let Some(switch) = arg
            .strip_prefix("--")
            .or_else(|| arg.strip_prefix('/'))
            .or_else(|| arg.strip_prefix('-'))
        else {
            return Err(ModeError::Unknown(arg));
        };
        let (name, inline_value) = match switch.split_once(':') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (switch, None),
        };

        match name.to_ascii_lowercase().as_str() {
            "s" => {}
            "d" => debug = true,
            // The parent handle for the dialog is not used.
            "c" => configure = true,
            "p" => {
                let value = inline_value
                    .or_else(|| args.next())
                    .ok_or(ModeError::MissingPreviewHandle)?;
                preview = Some(parse_handle(&value)?);
            }
            "register" => registration = Some(Mode::Register),
            "unregister" => registration = Some(Mode::Unregister),
            _ => return Err(ModeError::Unknown(arg)),
        }
    }

    Ok(if let Some(mode) = registration {
        mode
    } else if configure {
        Mode::Configure
    } else if let Some(handle) = preview {
        Mode::Preview { handle }
    } else {
        Mode::Show { debug }
    })
}

fn parse_handle(value: &str) -> Result<u64, ModeError> {
    let trimmed = value.trim();
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse(),
    };
    match parsed {
        Ok(handle) if handle != 0 => Ok(handle),
        _ => Err(ModeError::InvalidHandle(value.to_string())),
    }
}
