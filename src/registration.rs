//! Active screensaver registration via HKCU\\Control Panel\\Desktop.

use anyhow::Result;

#[cfg(windows)]
mod imp {
    use std::io;
    use std::path::Path;

    use anyhow::{Context, Result, anyhow};
    use tracing::info;
    use windows::Win32::UI::WindowsAndMessaging::{
        SPI_SETSCREENSAVEACTIVE, SPIF_SENDCHANGE, SPIF_UPDATEINIFILE, SystemParametersInfoW,
    };
    use winreg::RegKey;
    use winreg::enums::{HKEY_CURRENT_USER, KEY_QUERY_VALUE, KEY_SET_VALUE};

    /// Per-user desktop settings key.
    const DESKTOP_KEY: &str = "Control Panel\\Desktop";
    /// Path of the active screensaver executable.
    const SCREENSAVER_VALUE: &str = "SCRNSAVE.EXE";

    pub fn is_registered() -> Result<bool> {
        let key = open_desktop_key(KEY_QUERY_VALUE)?;
        let exe = current_exe()?;
        match key.get_value::<String, _>(SCREENSAVER_VALUE) {
            Ok(value) => Ok(same_path(&value, &exe)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err).context("failed to read screensaver registry value"),
        }
    }

    pub fn register() -> Result<()> {
        let key = open_desktop_key(KEY_SET_VALUE)?;
        let exe = current_exe()?;
        key.set_value(SCREENSAVER_VALUE, &exe)
            .context("failed to set screensaver registry value")?;
        set_screensaver_active(true)?;
        info!(path = %exe, "registered as active screensaver");
        Ok(())
    }

    /// Clear the value only when it still points at this executable.
    pub fn unregister() -> Result<()> {
        if !is_registered()? {
            return Ok(());
        }
        let key = open_desktop_key(KEY_SET_VALUE)?;
        match key.delete_value(SCREENSAVER_VALUE) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err).context("failed to remove screensaver registry value"),
        }
        set_screensaver_active(false)?;
        info!("unregistered as active screensaver");
        Ok(())
    }

    fn set_screensaver_active(active: bool) -> Result<()> {
        unsafe {
            SystemParametersInfoW(
                SPI_SETSCREENSAVEACTIVE,
                u32::from(active),
                None,
                SPIF_UPDATEINIFILE | SPIF_SENDCHANGE,
            )
        }
        .map_err(|err| anyhow!("SystemParametersInfoW failed: {err}"))
    }

    fn current_exe() -> Result<String> {
        let exe = std::env::current_exe().context("failed to resolve current executable")?;
        Ok(exe.display().to_string())
    }

    fn same_path(registered: &str, exe: &str) -> bool {
        Path::new(registered.trim_matches('"')) == Path::new(exe)
            || registered.trim_matches('"').eq_ignore_ascii_case(exe)
    }

    fn open_desktop_key(flags: u32) -> Result<RegKey> {
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        hkcu.open_subkey_with_flags(DESKTOP_KEY, flags)
            .context("failed to open desktop registry key")
    }
}

#[cfg(not(windows))]
mod imp {
    use anyhow::{Result, bail};

    pub fn is_registered() -> Result<bool> {
        Ok(false)
    }

    pub fn register() -> Result<()> {
        bail!("screensaver registration is only available on Windows")
    }

    pub fn unregister() -> Result<()> {
        bail!("screensaver registration is only available on Windows")
    }
}

/// True when this executable is the active screensaver.
pub fn is_registered() -> Result<bool> {
    imp::is_registered()
}

/// Make this executable the active screensaver for the current user.
pub fn register() -> Result<()> {
    imp::register()
}

pub fn unregister() -> Result<()> {
    imp::unregister()
}
