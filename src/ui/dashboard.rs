// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine l'interface TUI en utilisant les widgets de ratatui
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Layout : découpage de l'espace en zones
// 3. Widgets : Block, Paragraph, List, Clear (pour les popups)
// 4. ListState : garde la ligne sélectionnée visible (scroll automatique)
//
// Le rendu ne modifie jamais App : il lit uniquement les vues dérivées
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, NoticeKind, PendingConfirmation, Screen};
use crate::form::{FormField, WalletForm};
use crate::ledger::{total_for, SortKey};
use crate::models::{format_amount, WalletColor};

/// Dessine l'interface complète
///
/// CONCEPT RUST : Routing avec match sur enum
/// - Le dashboard reste toujours en arrière-plan
/// - Le formulaire et le sélecteur s'affichent en popup par-dessus
pub fn render(frame: &mut Frame, app: &App) {
    render_dashboard(frame, app);

    match app.current_screen {
        Screen::Dashboard => {}
        Screen::WalletForm => {
            if let Some(form) = app.form.as_ref() {
                render_form(frame, form);
            }
        }
        Screen::CurrencyPicker => render_currency_picker(frame, app),
    }
}

fn render_dashboard(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, chunks[0]);
    render_balance(frame, app, chunks[1]);
    render_wallet_list(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);
}

/// Crée le layout principal (header, solde, liste, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(4), // Solde total + dérive
            Constraint::Min(0),    // Liste des portefeuilles
            Constraint::Length(3), // Footer
        ])
        .split(area)
        .to_vec()
}

fn bold(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Couleur terminal d'une étiquette de portefeuille
fn wallet_color(color: WalletColor) -> Color {
    match color {
        WalletColor::Primary => Color::Rgb(13, 110, 253),
        WalletColor::Secondary => Color::Rgb(108, 117, 125),
        WalletColor::Danger => Color::Rgb(220, 53, 69),
        WalletColor::Info => Color::Rgb(13, 202, 240),
        WalletColor::Warning => Color::Rgb(255, 193, 7),
        WalletColor::Success => Color::Rgb(25, 135, 84),
        WalletColor::Purple => Color::Rgb(111, 66, 193),
        WalletColor::Pink => Color::Rgb(214, 51, 132),
        WalletColor::Orange => Color::Rgb(253, 126, 20),
        WalletColor::Yellow => Color::Rgb(255, 230, 0),
        WalletColor::Lime => Color::Rgb(132, 204, 22),
        WalletColor::Cyan => Color::Rgb(6, 182, 212),
        WalletColor::Teal => Color::Rgb(32, 201, 151),
        WalletColor::Fuchsia => Color::Rgb(217, 70, 239),
        WalletColor::Rose => Color::Rgb(244, 63, 94),
        WalletColor::Sky => Color::Rgb(14, 165, 233),
        WalletColor::Black => Color::DarkGray,
        WalletColor::Gray => Color::Gray,
        WalletColor::Brown => Color::Rgb(146, 64, 14),
    }
}

// ============================================================================
// Header et solde
// ============================================================================

fn render_header(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" MoneyMuffin ")
        .title_alignment(Alignment::Center);

    let paragraph = Paragraph::new(Line::from(Span::styled(
        "Personal wallets, one balance",
        bold(Color::Green),
    )))
    .block(block)
    .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Solde total dans la devise affichée et dérive depuis la baseline
fn render_balance(frame: &mut Frame, app: &App, area: Rect) {
    let currency = app.display_currency;
    let title = if app.can_pick_currency() {
        format!(" Total balance ({})  [$] change ", currency.code())
    } else {
        format!(" Total balance ({}) ", currency.code())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);

    let total = app.total_for_display();
    let total_line = Line::from(Span::styled(
        format!("{} {}", format_amount(total), currency.symbol()),
        bold(if total < 0.0 { Color::Red } else { Color::White }),
    ));

    // CONCEPT : Signe et couleur de la dérive
    // - hausse : vert avec "+", baisse : rouge, aucune variation : gris
    let difference = app.balance_difference();
    let (prefix, color) = if difference > 0.0 {
        ("+", Color::Green)
    } else if difference < 0.0 {
        ("", Color::Red)
    } else {
        ("", Color::Gray)
    };
    let drift_line = Line::from(vec![
        Span::raw("Since last reset: "),
        Span::styled(
            format!("{}{} {}", prefix, format_amount(difference), currency.symbol()),
            bold(color),
        ),
        Span::styled("   [r] reset", Style::default().fg(Color::DarkGray)),
    ]);

    let paragraph = Paragraph::new(vec![total_line, drift_line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Liste des portefeuilles
// ============================================================================

/// Titre de la liste avec indicateurs de tri (▲ / ▼)
fn list_title(app: &App) -> String {
    format!(
        " Wallets   [n] Name {}  [s] Amount {} ",
        app.sort.indicator(SortKey::Name),
        app.sort.indicator(SortKey::Amount),
    )
}

/// Dessine les portefeuilles, regroupés par devise
///
/// CONCEPT RATATUI : ListState
/// - Les en-têtes de groupe ajoutent des lignes non sélectionnables
/// - On traduit selected_index (index de portefeuille) en index de ligne
fn render_wallet_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(list_title(app));

    if app.wallets().is_empty() {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled("No wallets yet", Style::default().fg(Color::Gray))),
            Line::from(Span::styled("Press [a] to add one", Style::default().fg(Color::DarkGray))),
        ];
        let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let mut items: Vec<ListItem> = Vec::new();
    let mut selected_row = None;
    let mut wallet_index = 0;

    for group in app.grouped_wallets() {
        let group_total = total_for(group.currency, app.wallets());
        items.push(ListItem::new(Line::from(vec![
            Span::styled(
                format!(" {} · {} ", group.currency.code(), group.currency.name()),
                bold(Color::Cyan),
            ),
            Span::styled(
                format!("{} {}", format_amount(group_total), group.currency.symbol()),
                Style::default().fg(Color::DarkGray),
            ),
        ])));

        for wallet in group.wallets {
            if wallet_index == app.selected_index {
                selected_row = Some(items.len());
            }
            wallet_index += 1;

            let lock = if wallet.is_locked { "🔒" } else { "  " };
            let amount_style = if wallet.amount < 0.0 {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::White)
            };

            items.push(ListItem::new(Line::from(vec![
                Span::styled("  ▌", Style::default().fg(wallet_color(wallet.color))),
                Span::raw(format!("{} ", lock)),
                Span::raw(format!("{:<24}", wallet.name)),
                Span::styled(format!("{:>20}", wallet.display_amount()), amount_style),
                Span::styled(
                    format!("  {}", wallet.display_date()),
                    Style::default().fg(Color::DarkGray),
                ),
            ])));
        }
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));

    let mut state = ListState::default().with_selected(selected_row);
    frame.render_stateful_widget(list, area, &mut state);
}

// ============================================================================
// Footer : raccourcis, confirmations, messages
// ============================================================================

fn confirmation_line(message: String, key: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled("⚠  ", bold(Color::Yellow)),
        Span::styled(message, bold(Color::Yellow)),
        Span::styled(
            format!(" [{}]", key),
            bold(Color::Red).add_modifier(Modifier::SLOW_BLINK),
        ),
        Span::styled(" to confirm, any other key to cancel ⚠", bold(Color::Yellow)),
    ])
}

fn shortcut(key: &'static str, label: &'static str, color: Color) -> [Span<'static>; 2] {
    [Span::styled(key, bold(color)), Span::raw(label)]
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let line = if let Some(pending) = app.pending {
        match pending {
            PendingConfirmation::DeleteWallet(id) => {
                let name = app
                    .wallets()
                    .iter()
                    .find(|w| w.id == id)
                    .map(|w| w.name.clone())
                    .unwrap_or_else(|| "?".to_string());
                confirmation_line(format!("Delete wallet \"{}\"? Press", name), "y")
            }
            PendingConfirmation::ClearAll => confirmation_line(
                "Delete ALL wallets and balance history? Press".to_string(),
                "y",
            ),
            PendingConfirmation::Quit => confirmation_line("Quit? Press".to_string(), "q"),
        }
    } else if let Some(notice) = app.notice.as_ref() {
        let color = match notice.kind {
            NoticeKind::Info => Color::Green,
            NoticeKind::Warning => Color::Yellow,
        };
        Line::from(vec![
            Span::styled(notice.message.clone(), bold(color)),
            Span::styled("  (any key)", Style::default().fg(Color::DarkGray)),
        ])
    } else {
        let mut spans = Vec::new();
        spans.extend(shortcut("[q]", " Quit  ", Color::Yellow));
        spans.extend(shortcut("[↑↓/jk]", " Nav  ", Color::Yellow));
        spans.extend(shortcut("[a]", " Add  ", Color::Green));
        spans.extend(shortcut("[e]", " Edit  ", Color::Green));
        spans.extend(shortcut("[c]", " Copy  ", Color::Green));
        spans.extend(shortcut("[l]", " Lock  ", Color::Cyan));
        spans.extend(shortcut("[d]", " Delete", Color::Red));
        // Tout effacer n'a de sens que s'il y a quelque chose à effacer
        if !app.wallets().is_empty() {
            spans.extend(shortcut("  [X]", " Clear all", Color::Red));
        }
        Line::from(spans)
    };

    let paragraph = Paragraph::new(vec![line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Popups
// ============================================================================

/// Zone centrée de taille fixe (bornée par la zone disponible)
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Formulaire d'ajout / édition
fn render_form(frame: &mut Frame, form: &WalletForm) {
    let area = centered_rect(56, 11, frame.size());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(form.title());

    let field_line = |field: FormField, value: Span<'static>| {
        let focused = form.focus == field;
        let marker = if focused { "▶ " } else { "  " };
        let label_style = if focused { bold(Color::Cyan) } else { Style::default().fg(Color::Gray) };
        Line::from(vec![
            Span::styled(format!("{}{:<10}", marker, field.label()), label_style),
            value,
        ])
    };

    let cursor = |field: FormField| if form.focus == field { "█" } else { "" };

    let lines = vec![
        Line::from(""),
        field_line(
            FormField::Name,
            Span::raw(format!("{}{}", form.name, cursor(FormField::Name))),
        ),
        field_line(
            FormField::Amount,
            Span::raw(format!("{}{}", form.amount, cursor(FormField::Amount))),
        ),
        field_line(
            FormField::Currency,
            Span::raw(format!(
                "◀ {} {} ({}) ▶",
                form.currency.code(),
                form.currency.symbol(),
                form.currency.name()
            )),
        ),
        field_line(
            FormField::Color,
            Span::styled(
                format!("◀ ● {} ▶", form.color.as_str()),
                Style::default().fg(wallet_color(form.color)),
            ),
        ),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Tab]", bold(Color::Yellow)),
            Span::raw(" Field  "),
            Span::styled("[←→]", bold(Color::Yellow)),
            Span::raw(" Choose  "),
            Span::styled("[Enter]", bold(Color::Green)),
            Span::raw(" Save  "),
            Span::styled("[Esc]", bold(Color::Red)),
            Span::raw(" Cancel"),
        ]),
    ];

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Sélecteur de la devise affichée (devises utilisées uniquement)
fn render_currency_picker(frame: &mut Frame, app: &App) {
    let currencies = app.available_currencies();
    let area = centered_rect(36, currencies.len() as u16 + 2, frame.size());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" Display currency ");

    let items: Vec<ListItem> = currencies
        .iter()
        .map(|currency| {
            let current = if *currency == app.display_currency { " ✓" } else { "" };
            ListItem::new(format!(
                " {} {}  {}{}",
                currency.code(),
                currency.symbol(),
                currency.name(),
                current
            ))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));
    let mut state = ListState::default().with_selected(Some(app.picker_index));

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::storage::{MemoryStore, Snapshot};
    use chrono::NaiveDate;
    use ratatui::{backend::TestBackend, Terminal};

    fn app() -> App {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap(), 1);
        App::new(Snapshot::defaults(), Box::new(MemoryStore::new()), Box::new(clock))
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_dashboard_shows_wallets_and_shortcuts() {
        let screen = draw(&app());
        assert!(screen.contains("MoneyMuffin"));
        assert!(screen.contains("Total balance (RUB)"));
        assert!(screen.contains("Clear all"));
    }

    #[test]
    fn test_empty_dashboard_hides_clear_all() {
        let mut app = app();
        app.clear_all();
        let screen = draw(&app);
        assert!(screen.contains("No wallets yet"));
        assert!(!screen.contains("Clear all"));
    }

    #[test]
    fn test_pending_delete_prompt() {
        let mut app = app();
        let id = app.selected_id().unwrap();
        app.request_delete(id).unwrap();
        assert!(draw(&app).contains("to confirm"));
    }

    #[test]
    fn test_form_popup() {
        let mut app = app();
        app.open_create_form();
        let screen = draw(&app);
        assert!(screen.contains("Add wallet"));
        assert!(screen.contains("Amount"));
    }

    #[test]
    fn test_centered_rect_is_bounded() {
        let area = Rect::new(0, 0, 20, 5);
        let popup = centered_rect(56, 11, area);
        assert_eq!(popup, area);
    }
}
