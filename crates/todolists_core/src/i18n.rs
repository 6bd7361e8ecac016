//! Localized notification messages.
//!
//! # Responsibility
//! - Turn `(kind, title)` into the display text of a removal notification.
//! - Ship the built-in `en`/`es` message catalog.
//!
//! # Invariants
//! - Unknown locales resolve to `en`.
//! - Unknown `{placeholder}` tokens are left verbatim.

use crate::model::notification::NotificationKind;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("valid placeholder regex"));

/// Key of the removal message template.
pub const NOTIFICATION_MESSAGE_KEY: &str = "layout.notificationMessage";

/// Supported UI locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    /// Parses a locale tag such as `es` or `ES-mx`; anything else is `en`.
    pub fn parse(value: &str) -> Self {
        let normalized = value.trim().to_ascii_lowercase();
        let language = normalized.split(['-', '_']).next().unwrap_or_default();
        match language {
            "es" => Self::Es,
            _ => Self::En,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }
}

impl From<String> for Locale {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

/// Renders removal messages; implemented by the host's localization layer.
pub trait MessageFormatter {
    fn removal_message(&self, kind: NotificationKind, title: &str) -> String;
}

/// Built-in catalog for the bundled locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageCatalog {
    locale: Locale,
}

impl MessageCatalog {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Looks up a template by key.
    pub fn template(&self, key: &str) -> Option<&'static str> {
        match (key, self.locale) {
            (NOTIFICATION_MESSAGE_KEY, Locale::En) => Some("{itemType} \"{itemTitle}\" was deleted."),
            (NOTIFICATION_MESSAGE_KEY, Locale::Es) => Some("Se eliminó {itemType} \"{itemTitle}\"."),
            _ => None,
        }
    }

    /// Title-cased, localized name of an item kind.
    pub fn item_type(&self, kind: NotificationKind) -> &'static str {
        match (self.locale, kind) {
            (Locale::En, NotificationKind::List) => "List",
            (Locale::En, NotificationKind::Task) => "Task",
            (Locale::Es, NotificationKind::List) => "Lista",
            (Locale::Es, NotificationKind::Task) => "Tarea",
        }
    }
}

impl MessageFormatter for MessageCatalog {
    fn removal_message(&self, kind: NotificationKind, title: &str) -> String {
        let template = self
            .template(NOTIFICATION_MESSAGE_KEY)
            .unwrap_or("{itemType} \"{itemTitle}\"");
        interpolate(
            template,
            &[("itemType", self.item_type(kind)), ("itemTitle", title)],
        )
    }
}

/// Replaces `{name}` tokens with matching `params` values.
pub fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| {
            let name = &caps[1];
            params
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
