//! Language configuration
//!
//! Maps a user-facing language code to the catalog search-language token and
//! the currency symbol used for display.

/// Resolved language configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LangConfig {
    /// Search-language token passed to the rate catalog.
    pub search_lang: &'static str,
    /// Currency symbol for rendered money values.
    pub sym: &'static str,
}

/// Pure lookup; unknown codes fall back to English / `$`.
pub fn get_lang_config(language: &str) -> LangConfig {
    match language.trim().to_ascii_uppercase().as_str() {
        "RU" => LangConfig {
            search_lang: "ru",
            sym: "₽",
        },
        "UK" => LangConfig {
            search_lang: "uk",
            sym: "₴",
        },
        "DE" => LangConfig {
            search_lang: "de",
            sym: "€",
        },
        "FR" => LangConfig {
            search_lang: "fr",
            sym: "€",
        },
        "ES" => LangConfig {
            search_lang: "es",
            sym: "€",
        },
        "PL" => LangConfig {
            search_lang: "pl",
            sym: "zł",
        },
        _ => LangConfig {
            search_lang: "en",
            sym: "$",
        },
    }
}
