use std::str::FromStr;

use crate::i18n::{InterpretationMode, Language};
use crate::persistence::{KeyValueStore, StoreError, WriteOp, encode_json, read_json};

const LANGUAGE_KEY: &str = "legalbot_language";
const MODE_KEY: &str = "legalbot_interpretation_mode";

/// User preferences stored next to the chat state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    pub language: Language,
    pub mode: InterpretationMode,
}

impl Settings {
    /// Unknown or missing values fall back to the defaults.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        let mut settings = Settings::default();

        if let Some(code) = read_json::<_, String>(store, LANGUAGE_KEY)? {
            match Language::from_str(&code) {
                Ok(language) => settings.language = language,
                Err(err) => tracing::warn!("Ignoring stored language: {}", err),
            }
        }

        if let Some(mode) = read_json::<_, String>(store, MODE_KEY)? {
            match InterpretationMode::from_str(&mode) {
                Ok(mode) => settings.mode = mode,
                Err(err) => tracing::warn!("Ignoring stored interpretation mode: {}", err),
            }
        }

        Ok(settings)
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        let ops: Vec<WriteOp> = vec![
            encode_json(LANGUAGE_KEY, self.language.code())?,
            encode_json(MODE_KEY, self.mode.to_str())?,
        ];
        store.write_batch(&ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn load_uses_defaults_on_first_run() {
        let store = MemoryStore::new();
        assert_eq!(Settings::load(&store).unwrap(), Settings::default());
    }

    #[test]
    fn save_then_load_keeps_choices() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            language: Language::English,
            mode: InterpretationMode::Easy,
        };

        settings.save(&mut store).unwrap();

        assert_eq!(Settings::load(&store).unwrap(), settings);
    }

    #[test]
    fn load_ignores_unknown_values() {
        let mut store = MemoryStore::new();
        store.set(LANGUAGE_KEY, "\"klingon\"").unwrap();
        store.set(MODE_KEY, "\"easy\"").unwrap();

        let settings = Settings::load(&store).unwrap();
        assert_eq!(settings.language, Language::Korean);
        assert_eq!(settings.mode, InterpretationMode::Easy);
    }
}
