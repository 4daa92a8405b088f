// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine la page courante à partir de l'état de App :
//   header (titre + cotation) / barre latérale optionnelle / portefeuille
//   (adresse + tableau des transactions) / footer (raccourcis)
//
// CONCEPTS RATATUI :
// 1. Layout : découpage de l'espace en zones
// 2. Widgets : Block, Paragraph, List, Table
// 3. Style : couleurs et attributs de texte
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::models::Symbol;
use crate::state::{PriceStatus, SortKey, TablePage, WalletStatus};

/// Dessine l'interface complète
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header : titre + cotation
            Constraint::Min(0),    // Contenu
            Constraint::Length(4), // Footer : raccourcis ou saisie
        ])
        .split(frame.size());

    render_header(frame, app, chunks[0]);

    // Barre latérale : prend 22 colonnes à gauche quand elle est ouverte
    let content = if app.is_sidebar_open() {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(22), Constraint::Min(0)])
            .split(chunks[1]);
        render_sidebar(frame, app, columns[0]);
        columns[1]
    } else {
        chunks[1]
    };

    if app.has_wallet_panel() {
        render_wallet(frame, app, content);
    } else {
        render_price_only(frame, app, content);
    }

    if app.is_in_input_mode() {
        render_input_footer(frame, app, chunks[2]);
    } else {
        render_footer(frame, app, chunks[2]);
    }
}

// ============================================================================
// Header : nom de la page + cotation
// ============================================================================

fn price_style(status: &PriceStatus) -> Style {
    match status {
        PriceStatus::Loading => Style::default().fg(Color::Gray),
        PriceStatus::Ready(_) => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        PriceStatus::Error(_) => Style::default().fg(Color::Red),
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let feed = app.price_feed();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" RBravo ")
        .title_alignment(Alignment::Center);

    let mut spans = vec![
        Span::styled(
            format!("{}  ", app.page().name()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw("Cotação: "),
        Span::styled(feed.display(), price_style(feed.status())),
    ];
    if feed.is_revalidating() {
        spans.push(Span::styled("  ⟳", Style::default().fg(Color::DarkGray)));
    }
    if let Some(detail) = feed.error_detail() {
        spans.push(Span::styled(format!("  ({})", detail), Style::default().fg(Color::DarkGray)));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Sidebar : navigation entre les pages
// ============================================================================

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = Symbol::ALL
        .iter()
        .enumerate()
        .map(|(i, symbol)| {
            let line = format!(" [{}] {}", i + 1, symbol.name());
            let style = if *symbol == app.page() {
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(Color::Gray)
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Menu "),
    );
    frame.render_widget(list, area);
}

// ============================================================================
// Contenu : page sans portefeuille (Litecoin)
// ============================================================================

fn render_price_only(frame: &mut Frame, app: &App, area: Rect) {
    let feed = app.price_feed();
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(feed.display(), price_style(feed.status()))),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(format!(" {} / USD ", app.page().ticker())),
        )
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Contenu : portefeuille (Bitcoin)
// ============================================================================

fn render_wallet(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let address = match app.wallet().address() {
        Some(address) => Span::styled(address.to_string(), Style::default().fg(Color::White)),
        None => Span::styled(
            "[a] para informar um endereço",
            Style::default().fg(Color::DarkGray),
        ),
    };
    let address_block = Paragraph::new(Line::from(vec![Span::raw("Endereço: "), address])).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Carteira "),
    );
    frame.render_widget(address_block, chunks[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Histórico de Transações ");

    // Idle / Loading / NotFound / Error / Found vide : un message à la place du tableau
    if let Some(message) = app.wallet().status_message() {
        let style = match app.wallet().status() {
            WalletStatus::Error { .. } | WalletStatus::NotFound { .. } => {
                Style::default().fg(Color::Red)
            }
            _ => Style::default().fg(Color::Gray),
        };
        let paragraph = Paragraph::new(vec![Line::from(""), Line::from(Span::styled(message, style))])
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, chunks[1]);
        return;
    }

    match app.wallet_page() {
        Some(page) => render_transactions_table(frame, app, page, chunks[1]),
        None => frame.render_widget(block, chunks[1]),
    }
}

/// Titre de colonne avec flèche si c'est la colonne de tri
fn column_title(app: &App, key: SortKey) -> String {
    match app.table().sort() {
        Some((sorted, order)) if sorted == key => format!("{} {}", key.label(), order.arrow()),
        _ => key.label().to_string(),
    }
}

fn render_transactions_table(
    frame: &mut Frame,
    app: &App,
    page: TablePage<'_>,
    area: Rect,
) {
    let header = Row::new(vec![
        "Txid".to_string(),
        column_title(app, SortKey::Value),
        column_title(app, SortKey::Confirmations),
        column_title(app, SortKey::Time),
    ])
    .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = page
        .rows
        .iter()
        .map(|tx| {
            Row::new(vec![
                tx.short_txid(),
                tx.value.clone(),
                tx.confirmations.to_string(),
                tx.formatted_time(),
            ])
        })
        .collect();

    let title = format!(
        " Histórico de Transações ({}) - página {}/{} ",
        page.total,
        page.page + 1,
        page.page_count
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(20),
            Constraint::Length(16),
            Constraint::Length(16),
            Constraint::Min(20),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title),
    );

    frame.render_widget(table, area);
}

// ============================================================================
// Footer : raccourcis
// ============================================================================

fn shortcut(key: &str, label: &str, color: Color) -> Vec<Span<'static>> {
    vec![
        Span::styled(
            key.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {}  ", label)),
    ]
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let lines = if app.is_awaiting_quit_confirmation() {
        vec![Line::from(vec![
            Span::styled(
                "⚠  Pressione ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " novamente para sair, ou outra tecla para cancelar ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])]
    } else {
        let mut navigation = Vec::new();
        navigation.extend(shortcut("[q]", "Sair", Color::Yellow));
        navigation.extend(shortcut("[1/2/Tab]", "Página", Color::Yellow));
        navigation.extend(shortcut("[m]", "Menu", Color::Yellow));
        navigation.extend(shortcut("[r]", "Atualizar", Color::Green));

        let mut wallet = Vec::new();
        if app.has_wallet_panel() {
            wallet.extend(shortcut("[a]", "Endereço", Color::Green));
            wallet.extend(shortcut("[s]", "Ordenar", Color::Yellow));
            wallet.extend(shortcut("[o]", "Ordem", Color::Yellow));
            wallet.extend(shortcut("[←→]", "Páginas", Color::Yellow));
        }
        vec![Line::from(navigation), Line::from(wallet)]
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Footer en mode saisie : prompt + buffer + curseur
fn render_input_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let input_line = Line::from(vec![
        Span::styled(
            app.input_prompt.as_str(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(app.input_buffer.as_str(), Style::default().fg(Color::White)),
        Span::styled(
            "█",
            Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
        ),
    ]);

    let mut help = shortcut("[Enter]", "Ver Transações", Color::Green);
    help.extend(shortcut("[ESC]", "Cancelar", Color::Red));

    let paragraph = Paragraph::new(vec![input_line, Line::from(help)])
        .block(block)
        .alignment(Alignment::Left);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests
// ============================================================================
