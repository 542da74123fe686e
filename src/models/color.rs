// ============================================================================
// Enum : WalletColor
// ============================================================================
// Palette fixe d'étiquettes décoratives pour les portefeuilles
// Aucune sémantique : sert uniquement à distinguer visuellement les cartes
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

/// Étiquette de couleur d'un portefeuille
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletColor {
    #[default]
    Primary,
    Secondary,
    Danger,
    Info,
    Warning,
    Success,
    Purple,
    Pink,
    Orange,
    Yellow,
    Lime,
    Cyan,
    Teal,
    Fuchsia,
    Rose,
    Sky,
    Black,
    Gray,
    Brown,
}

impl WalletColor {
    /// Toute la palette, dans l'ordre d'affichage du sélecteur
    pub const ALL: [WalletColor; 19] = [
        WalletColor::Primary,
        WalletColor::Secondary,
        WalletColor::Danger,
        WalletColor::Info,
        WalletColor::Warning,
        WalletColor::Success,
        WalletColor::Purple,
        WalletColor::Pink,
        WalletColor::Orange,
        WalletColor::Yellow,
        WalletColor::Lime,
        WalletColor::Cyan,
        WalletColor::Teal,
        WalletColor::Fuchsia,
        WalletColor::Rose,
        WalletColor::Sky,
        WalletColor::Black,
        WalletColor::Gray,
        WalletColor::Brown,
    ];

    /// Identifiant persisté (ex: "primary")
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletColor::Primary => "primary",
            WalletColor::Secondary => "secondary",
            WalletColor::Danger => "danger",
            WalletColor::Info => "info",
            WalletColor::Warning => "warning",
            WalletColor::Success => "success",
            WalletColor::Purple => "purple",
            WalletColor::Pink => "pink",
            WalletColor::Orange => "orange",
            WalletColor::Yellow => "yellow",
            WalletColor::Lime => "lime",
            WalletColor::Cyan => "cyan",
            WalletColor::Teal => "teal",
            WalletColor::Fuchsia => "fuchsia",
            WalletColor::Rose => "rose",
            WalletColor::Sky => "sky",
            WalletColor::Black => "black",
            WalletColor::Gray => "gray",
            WalletColor::Brown => "brown",
        }
    }

    fn index(&self) -> usize {
        WalletColor::ALL
            .iter()
            .position(|c| c == self)
            .unwrap_or_default()
    }

    /// Couleur suivante (cyclique)
    pub fn next(&self) -> Self {
        WalletColor::ALL[(self.index() + 1) % WalletColor::ALL.len()]
    }

    /// Couleur précédente (cyclique)
    pub fn previous(&self) -> Self {
        let len = WalletColor::ALL.len();
        WalletColor::ALL[(self.index() + len - 1) % len]
    }
}

impl fmt::Display for WalletColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&WalletColor::Fuchsia).unwrap();
        assert_eq!(json, "\"fuchsia\"");

        let parsed: WalletColor = serde_json::from_str("\"cyan\"").unwrap();
        assert_eq!(parsed, WalletColor::Cyan);

        // Une couleur hors palette est refusée à la frontière
        assert!(serde_json::from_str::<WalletColor>("\"magenta\"").is_err());
    }

    #[test]
    fn test_cycle_wraps_around() {
        assert_eq!(WalletColor::Brown.next(), WalletColor::Primary);
        assert_eq!(WalletColor::Primary.previous(), WalletColor::Brown);
        assert_eq!(WalletColor::default(), WalletColor::Primary);
    }
}
