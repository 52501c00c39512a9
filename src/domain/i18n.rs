// Display labels in the supported UI languages, backed by Fluent resources
use fluent_bundle::FluentResource;
use fluent_bundle::concurrent::FluentBundle;
use serde::Deserialize;
use std::sync::LazyLock;
use unic_langid::LanguageIdentifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    De,
    En,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    StorageDischarge,
    GridBuy,
    Standby,
    StateOfCharge,
    ChargePower,
    DischargePower,
    On,
    Off,
}

impl Label {
    pub const ALL: [Label; 8] = [
        Label::StorageDischarge,
        Label::GridBuy,
        Label::Standby,
        Label::StateOfCharge,
        Label::ChargePower,
        Label::DischargePower,
        Label::On,
        Label::Off,
    ];

    /// Fluent message id
    pub fn key(self) -> &'static str {
        match self {
            Self::StorageDischarge => "storage-discharge",
            Self::GridBuy => "grid-buy",
            Self::Standby => "standby",
            Self::StateOfCharge => "state-of-charge",
            Self::ChargePower => "charge-power",
            Self::DischargePower => "discharge-power",
            Self::On => "mode-on",
            Self::Off => "mode-off",
        }
    }
}

struct Catalog {
    bundle: FluentBundle<FluentResource>,
}

impl Catalog {
    fn load(language: Language) -> Self {
        let source = match language {
            Language::De => include_str!("../../locales/de/dashboard.ftl"),
            Language::En => include_str!("../../locales/en/dashboard.ftl"),
        };
        let resource = FluentResource::try_new(source.to_string()).unwrap_or_else(|(partial, errors)| {
            tracing::error!("Failed to parse {} translations: {:?}", language.code(), errors);
            partial
        });

        let lang_id: LanguageIdentifier = language.code().parse().unwrap_or_default();
        let mut bundle = FluentBundle::new_concurrent(vec![lang_id]);
        bundle.set_use_isolating(false);
        if let Err(errors) = bundle.add_resource(resource) {
            tracing::error!("Failed to add {} translations: {:?}", language.code(), errors);
        }

        Self { bundle }
    }

    fn get(&self, key: &str) -> Option<String> {
        let pattern = self.bundle.get_message(key)?.value()?;
        let mut errors = vec![];
        let value = self.bundle.format_pattern(pattern, None, &mut errors);
        if !errors.is_empty() {
            tracing::warn!("Formatting errors for {}: {:?}", key, errors);
        }
        Some(value.into_owned())
    }
}

static GERMAN: LazyLock<Catalog> = LazyLock::new(|| Catalog::load(Language::De));
static ENGLISH: LazyLock<Catalog> = LazyLock::new(|| Catalog::load(Language::En));

impl Language {
    /// Language identifier, also used as the chart locale
    pub fn code(self) -> &'static str {
        match self {
            Self::De => "de",
            Self::En => "en",
        }
    }

    fn catalog(self) -> &'static Catalog {
        match self {
            Self::De => &GERMAN,
            Self::En => &ENGLISH,
        }
    }

    /// Translated label text; falls back to the message id when missing.
    pub fn translate(self, label: Label) -> String {
        self.catalog().get(label.key()).unwrap_or_else(|| {
            tracing::warn!("Missing {} translation for {}", self.code(), label.key());
            label.key().to_string()
        })
    }

    pub fn decimal_separator(self) -> char {
        match self {
            Self::De => ',',
            Self::En => '.',
        }
    }

    pub fn group_separator(self) -> char {
        match self {
            Self::De => '.',
            Self::En => ',',
        }
    }
}
