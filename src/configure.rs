// Configure command: persist flag overrides into the user config.

use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{resolve, ConfigFlags, Defaults, EffectiveConfig, UserConfig};
use crate::error::CliError;
use crate::ui::Output;

/// `exercism configure [--show]`
#[derive(Debug, Clone, Default)]
pub struct ConfigureCommand {
    /// Print the effective configuration without writing anything.
    pub show: bool,
}

impl ConfigureCommand {
    /// Overlay `flags` onto the stored user config in `config_dir` and
    /// write it back. Fields without a flag keep their stored value.
    pub fn run<O: Write, E: Write>(
        &self,
        flags: &ConfigFlags,
        config_dir: &Path,
        output: &mut Output<O, E>,
    ) -> Result<EffectiveConfig, CliError> {
        let mut user = UserConfig::load(config_dir)?;

        let cfg = if self.show {
            resolve(flags, &user, &Defaults::default())
        } else {
            let flags = absolute_workspace(flags)?;
            user.apply_flags(&flags);
            user.write(config_dir)?;
            info!(dir = %config_dir.display(), "user config written");
            resolve(&ConfigFlags::default(), &user, &Defaults::default())
        };

        output
            .configured(config_dir, &cfg, !self.show)
            .map_err(CliError::Output)?;
        Ok(cfg)
    }
}

fn absolute_workspace(flags: &ConfigFlags) -> Result<ConfigFlags, CliError> {
    let mut flags = flags.clone();
    if let Some(ws) = flags.workspace.as_deref().filter(|ws| !ws.is_empty()) {
        let path = PathBuf::from(ws);
        if path.is_relative() {
            let cwd = std::env::current_dir().map_err(|source| CliError::Io {
                path: path.clone(),
                source,
            })?;
            flags.workspace = Some(cwd.join(path).to_string_lossy().into_owned());
        }
    }
    Ok(flags)
}
