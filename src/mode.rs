//! The persisted ad-handling mode.
//!
//! Chosen once on the entry screen and applied to every subsequent playback
//! session: snooze (push the ad's deadline back) or ad debt (owe the ad and
//! pay it off later).

use crate::store::{persist_or_warn, StoreHandle};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const STORE_KEY: &str = "ad-mode-storage";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AdMode {
    #[default]
    #[serde(rename = "snooze")]
    Snooze,
    #[serde(rename = "ad debt")]
    Debt,
}

impl fmt::Display for AdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdMode::Snooze => write!(f, "snooze"),
            AdMode::Debt => write!(f, "ad debt"),
        }
    }
}

impl FromStr for AdMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "snooze" => Ok(AdMode::Snooze),
            "debt" | "ad-debt" | "ad debt" => Ok(AdMode::Debt),
            other => Err(format!("unknown mode '{}' (snooze | debt)", other)),
        }
    }
}

/// The persisted mode value: read once at init, written on every change.
pub struct ModeStore {
    mode: AdMode,
    store: StoreHandle,
}

impl ModeStore {
    /// Restore the mode from storage; defaults to snooze when nothing
    /// usable is persisted (first run).
    pub fn load(store: StoreHandle) -> Self {
        let mode = match store.get(STORE_KEY) {
            Ok(Some(data)) => match serde_json::from_str::<AdMode>(&data) {
                Ok(mode) => mode,
                Err(e) => {
                    warn!("corrupt mode state, defaulting to snooze: {}", e);
                    AdMode::default()
                }
            },
            Ok(None) => AdMode::default(),
            Err(e) => {
                warn!("could not read mode state, defaulting to snooze: {}", e);
                AdMode::default()
            }
        };
        ModeStore { mode, store }
    }

    pub fn mode(&self) -> AdMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: AdMode) {
        self.mode = mode;
        match serde_json::to_string(&mode) {
            Ok(json) => persist_or_warn(self.store.as_ref(), STORE_KEY, &json),
            Err(e) => warn!("could not serialize mode: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStorage;
    use std::rc::Rc;

    #[test]
    fn defaults_to_snooze_on_first_run() {
        let store = ModeStore::load(Rc::new(MemoryStorage::new()));
        assert_eq!(store.mode(), AdMode::Snooze);
    }

    #[test]
    fn set_mode_persists_across_reload() {
        let backing: StoreHandle = Rc::new(MemoryStorage::new());
        {
            let mut store = ModeStore::load(Rc::clone(&backing));
            store.set_mode(AdMode::Debt);
        }
        let reloaded = ModeStore::load(backing);
        assert_eq!(reloaded.mode(), AdMode::Debt);
    }

    #[test]
    fn wire_format_uses_display_strings() {
        assert_eq!(serde_json::to_string(&AdMode::Snooze).unwrap(), "\"snooze\"");
        assert_eq!(serde_json::to_string(&AdMode::Debt).unwrap(), "\"ad debt\"");
        assert_eq!(
            serde_json::from_str::<AdMode>("\"ad debt\"").unwrap(),
            AdMode::Debt
        );
    }

    #[test]
    fn corrupt_mode_state_defaults_to_snooze() {
        let backing: StoreHandle = Rc::new(MemoryStorage::new());
        backing.set("ad-mode-storage", "\"popcorn\"").unwrap();
        let store = ModeStore::load(backing);
        assert_eq!(store.mode(), AdMode::Snooze);
    }

    #[test]
    fn parses_cli_spellings() {
        assert_eq!("snooze".parse::<AdMode>().unwrap(), AdMode::Snooze);
        assert_eq!("debt".parse::<AdMode>().unwrap(), AdMode::Debt);
        assert_eq!("ad-debt".parse::<AdMode>().unwrap(), AdMode::Debt);
        assert!("loud".parse::<AdMode>().is_err());
    }
}
