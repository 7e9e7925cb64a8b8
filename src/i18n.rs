// Display text lookup for the dashboard views

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Tr,
    En,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Tr => f.write_str("tr"),
            Locale::En => f.write_str("en"),
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tr" => Ok(Locale::Tr),
            "en" => Ok(Locale::En),
            other => Err(format!("unsupported locale '{}'", other)),
        }
    }
}

// (key, tr, en)
const MESSAGES: &[(&str, &str, &str)] = &[
    ("overview.bridge", "Köprü", "Bridge"),
    ("overview.uptime", "Çalışma süresi", "Uptime"),
    ("overview.connected", "Bağlı", "Connected"),
    ("overview.disconnected", "Bağlantı yok", "Disconnected"),
    ("overview.mode", "Mod", "Mode"),
    ("overview.guard", "Koruma", "Guard"),
    ("controls.pause", "Duraklat", "Pause"),
    ("controls.resume", "Devam", "Resume"),
    ("controls.hedgeAll", "Tümünü hedgele", "Hedge all"),
    ("controls.closeAll", "Tümünü kapat", "Close all"),
    ("controls.freeze", "Dondur", "Freeze"),
    ("account.title", "Hesap", "Account"),
    ("account.balance", "Bakiye", "Balance"),
    ("account.equity", "Varlık", "Equity"),
    ("account.margin", "Teminat", "Margin"),
    ("account.drawdown", "Düşüş", "Drawdown"),
    ("account.none", "Hesap verisi yok", "No account data"),
    ("metrics.title", "Metrikler", "Metrics"),
    ("metrics.ticks", "Tick", "Ticks"),
    ("metrics.positions", "Pozisyon", "Positions"),
    ("metrics.commands", "Komut", "Commands"),
    ("metrics.signals", "Sinyal", "Signals"),
    ("positions.title", "Pozisyonlar", "Positions"),
    ("positions.empty", "Açık pozisyon yok", "No open positions"),
    ("symbols.title", "Semboller", "Symbols"),
    ("symbols.empty", "Canlı fiyat yok", "No live prices"),
    ("grids.title", "Gridler", "Grids"),
    ("grids.empty", "Aktif grid yok", "No grids"),
];

/// Look up display text; unknown keys come back unchanged.
pub fn translate(locale: Locale, key: &str) -> String {
    MESSAGES
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, tr, en)| match locale {
            Locale::Tr => *tr,
            Locale::En => *en,
        })
        .unwrap_or(key)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_known_key() {
        assert_eq!(translate(Locale::En, "controls.hedgeAll"), "Hedge all");
        assert_eq!(translate(Locale::Tr, "controls.pause"), "Duraklat");
    }

    #[test]
    fn test_unknown_key_falls_back_to_key() {
        assert_eq!(translate(Locale::En, "nope.missing"), "nope.missing");
    }

    #[test]
    fn test_locale_parsing() {
        assert_eq!("EN".parse::<Locale>(), Ok(Locale::En));
        assert!("de".parse::<Locale>().is_err());
        assert_eq!(Locale::default(), Locale::Tr);
    }
}
