// ============================================================================
// Structure : WalletForm
// ============================================================================
// Formulaire d'ajout / édition d'un portefeuille
//
// CONCEPT : Saisie brute puis validation
// - Le formulaire garde le texte tel que tapé (nom, montant)
// - validate() produit un WalletDraft ou une ValidationError
// - En cas d'erreur, le formulaire reste ouvert
// ============================================================================

use crate::error::ValidationError;
use crate::models::{Currency, Wallet, WalletColor, WalletDraft, WalletId};

/// Champ actif du formulaire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Amount,
    Currency,
    Color,
}

impl FormField {
    const ORDER: [FormField; 4] = [
        FormField::Name,
        FormField::Amount,
        FormField::Currency,
        FormField::Color,
    ];

    fn index(&self) -> usize {
        FormField::ORDER
            .iter()
            .position(|f| f == self)
            .unwrap_or_default()
    }

    pub fn next(&self) -> Self {
        FormField::ORDER[(self.index() + 1) % FormField::ORDER.len()]
    }

    pub fn previous(&self) -> Self {
        let len = FormField::ORDER.len();
        FormField::ORDER[(self.index() + len - 1) % len]
    }

    /// Libellé affiché devant le champ
    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Amount => "Amount",
            FormField::Currency => "Currency",
            FormField::Color => "Color",
        }
    }
}

/// État du formulaire en cours
#[derive(Debug, Clone, PartialEq)]
pub struct WalletForm {
    /// Some(id) en édition, None en création
    pub editing: Option<WalletId>,
    pub name: String,
    pub amount: String,
    pub currency: Currency,
    pub color: WalletColor,
    pub focus: FormField,
}

impl WalletForm {
    /// Formulaire vierge : RUB, couleur primaire
    pub fn for_create() -> Self {
        Self {
            editing: None,
            name: String::new(),
            amount: String::new(),
            currency: Currency::PRIMARY,
            color: WalletColor::default(),
            focus: FormField::Name,
        }
    }

    /// Formulaire pré-rempli depuis un portefeuille existant
    pub fn for_edit(wallet: &Wallet) -> Self {
        Self {
            editing: Some(wallet.id),
            name: wallet.name.clone(),
            amount: wallet.amount.to_string(),
            currency: wallet.currency,
            color: wallet.color,
            focus: FormField::Name,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn title(&self) -> &'static str {
        if self.is_editing() {
            " Edit wallet "
        } else {
            " Add wallet "
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Ajoute un caractère au champ texte actif
    pub fn input_char(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        match self.focus {
            FormField::Name => self.name.push(c),
            FormField::Amount => self.amount.push(c),
            FormField::Currency | FormField::Color => {}
        }
    }

    /// Supprime le dernier caractère du champ texte actif
    pub fn backspace(&mut self) {
        match self.focus {
            FormField::Name => {
                self.name.pop();
            }
            FormField::Amount => {
                self.amount.pop();
            }
            FormField::Currency | FormField::Color => {}
        }
    }

    /// Valeur suivante pour les champs à choix (devise, couleur)
    pub fn cycle_next(&mut self) {
        match self.focus {
            FormField::Currency => self.currency = self.currency.next(),
            FormField::Color => self.color = self.color.next(),
            FormField::Name | FormField::Amount => {}
        }
    }

    /// Valeur précédente pour les champs à choix
    pub fn cycle_previous(&mut self) {
        match self.focus {
            FormField::Currency => self.currency = self.currency.previous(),
            FormField::Color => self.color = self.color.previous(),
            FormField::Name | FormField::Amount => {}
        }
    }

    pub fn validate(&self) -> Result<WalletDraft, ValidationError> {
        WalletDraft::parse(&self.name, &self.amount, self.currency, self.color)
    }
}
