//! Display strings for the record pipeline. Keys are dotted paths; a key
//! without a translation renders as itself.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub trait Localize: Send + Sync {
    fn t(&self, key: &str) -> String;

    /// `Some(text)` only when a real translation exists.
    fn lookup(&self, key: &str) -> Option<String> {
        let text = self.t(key);
        if text == key || text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Pt,
}

impl Locale {
    /// Pick the first supported language from an `Accept-Language` value.
    pub fn from_accept_language(header: &str) -> Option<Locale> {
        header
            .split(',')
            .filter_map(|part| part.split(';').next())
            .map(|tag| tag.trim().to_ascii_lowercase())
            .find_map(|tag| {
                let primary = tag.split('-').next().unwrap_or("");
                primary.parse().ok()
            })
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Locale::En),
            "pt" => Ok(Locale::Pt),
            other => Err(format!("Unsupported locale '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog {
    locale: Locale,
}

impl Catalog {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }
}

impl Localize for Catalog {
    fn t(&self, key: &str) -> String {
        let text = match self.locale {
            Locale::En => english(key),
            Locale::Pt => portuguese(key).or_else(|| english(key)),
        };
        text.map(str::to_string).unwrap_or_else(|| key.to_string())
    }
}

/// Returns every key unchanged. Handy where assertions should not depend
/// on wording.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyEcho;

impl Localize for KeyEcho {
    fn t(&self, key: &str) -> String {
        key.to_string()
    }
}

fn english(key: &str) -> Option<&'static str> {
    Some(match key {
        "recordTypes.workout" => "Workout",
        "recordTypes.meal" => "Meal",
        "recordTypes.symptom" => "Symptom",
        "recordTypes.sleep" => "Sleep Log",
        "recordTypes.mood" => "Mood Log",
        "addRecordModal.title" => "Add Record",
        "addRecordModal.selectTitle" => "Add a Health Record",
        "addRecordModal.selectDescription" => "Choose the kind of record you want to log.",
        "addRecordModal.selectPlaceholder" => "Select a record type",
        "common.back" => "Back",
        "common.continue" => "Continue",
        "success.recordAdded" => "Record added",
        "errors.unauthenticated" => "Not signed in",
        "errors.signInRequired" => "Please sign in to add records.",
        "errors.genericError" => "Something went wrong",
        "forms.workout.successMessage" => "Your workout has been saved.",
        "forms.meal.successMessage" => "Your meal has been saved.",
        "forms.symptom.successMessage" => "Your symptom has been saved.",
        "forms.sleep.successMessage" => "Your sleep log has been saved.",
        "forms.mood.successMessage" => "Your mood log has been saved.",
        _ => return None,
    })
}

fn portuguese(key: &str) -> Option<&'static str> {
    Some(match key {
        "recordTypes.workout" => "Treino",
        "recordTypes.meal" => "Refeição",
        "recordTypes.symptom" => "Sintoma",
        "recordTypes.sleep" => "Registro de Sono",
        "recordTypes.mood" => "Registro de Humor",
        "addRecordModal.title" => "Adicionar Registro",
        "addRecordModal.selectTitle" => "Adicionar um Registro de Saúde",
        "addRecordModal.selectDescription" => "Escolha o tipo de registro que deseja adicionar.",
        "addRecordModal.selectPlaceholder" => "Selecione um tipo de registro",
        "common.back" => "Voltar",
        "common.continue" => "Continuar",
        "success.recordAdded" => "Registro adicionado",
        "errors.unauthenticated" => "Não autenticado",
        "errors.signInRequired" => "Entre para adicionar registros.",
        "errors.genericError" => "Algo deu errado",
        "forms.workout.successMessage" => "Seu treino foi salvo.",
        "forms.meal.successMessage" => "Sua refeição foi salva.",
        "forms.symptom.successMessage" => "Seu sintoma foi salvo.",
        "forms.sleep.successMessage" => "Seu registro de sono foi salvo.",
        "forms.mood.successMessage" => "Seu registro de humor foi salvo.",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_lookup() {
        let catalog = Catalog::new(Locale::En);
        assert_eq!(catalog.t("common.continue"), "Continue");
    }

    #[test]
    fn test_missing_key_renders_as_key() {
        let catalog = Catalog::new(Locale::En);
        assert_eq!(catalog.t("forms.unknown.label"), "forms.unknown.label");
        assert_eq!(catalog.lookup("forms.unknown.label"), None);
    }

    #[test]
    fn test_portuguese_lookup() {
        let catalog = Catalog::new(Locale::Pt);
        assert_eq!(catalog.t("common.back"), "Voltar");
    }

    #[test]
    fn test_accept_language_picks_first_supported() {
        assert_eq!(Locale::from_accept_language("pt-BR,pt;q=0.9,en;q=0.8"), Some(Locale::Pt));
        assert_eq!(Locale::from_accept_language("de-DE, en;q=0.5"), Some(Locale::En));
        assert_eq!(Locale::from_accept_language("fr"), None);
    }

    #[test]
    fn test_key_echo_has_no_translations() {
        assert_eq!(KeyEcho.t("success.recordAdded"), "success.recordAdded");
        assert_eq!(KeyEcho.lookup("recordTypes.workout"), None);
    }
}
