use screen_rec_core::{CommandOriginProbe, NoOriginProbe, Origin, OriginProbe};

use tracing::info;

/// Origin probe chosen from configuration.
#[derive(Debug, Clone)]
pub enum HostOriginProbe {
    /// Run the configured command.
    Command(CommandOriginProbe),
    /// No command configured; the calibration override is used.
    Disabled(NoOriginProbe),
}

impl HostOriginProbe {
    /// Probe for `command` (program followed by its arguments).
    pub fn from_command(command: &[String]) -> Self {
        match command.split_first() {
            Some((program, args)) => {
                info!(%program, ?args, "Origin query enabled");
                Self::Command(CommandOriginProbe::new(program, args.to_vec()))
            }
            None => {
                info!("Origin query disabled, using calibration override");
                Self::Disabled(NoOriginProbe)
            }
        }
    }
}

impl OriginProbe for HostOriginProbe {
    async fn query(&self) -> Option<Origin> {
        match self {
            Self::Command(probe) => probe.query().await,
            Self::Disabled(probe) => probe.query().await,
        }
    }
}
