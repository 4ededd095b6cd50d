// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine les deux onglets (Quote et Watchlist) avec les widgets ratatui
//
// Aucun calcul métier ici : les couleurs viennent des Trend calculés
// par le worker, les valeurs des lignes reçues du DisplaySink.
//
// CONCEPTS RATATUI :
// 1. Layout : découpage en header / saisie / contenu / footer
// 2. Tabs, Paragraph, Table : widgets de base
// 3. Style : couleurs et attributs de texte
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs},
    Frame,
};

use crate::app::{App, Tab};
use crate::models::Trend;
use crate::quote_display::QuoteView;

/// Dessine l'interface complète
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, app, chunks[0]);
    render_input(frame, app, chunks[1]);

    match app.current_tab {
        Tab::Quote => render_quote(frame, app, chunks[2]),
        Tab::Watchlist => render_watchlist(frame, app, chunks[2]),
    }

    render_footer(frame, app, chunks[3]);
}

/// Header (onglets), saisie, contenu, footer
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Onglets
            Constraint::Length(3), // Ligne de saisie
            Constraint::Min(0),    // Contenu
            Constraint::Length(3), // Footer
        ])
        .split(area)
        .to_vec()
}

/// Couleur d'un signal de tendance
pub fn trend_color(trend: Trend) -> Color {
    match trend {
        Trend::Up => Color::Green,
        Trend::Down => Color::Red,
        Trend::Neutral => Color::White,
    }
}

// ============================================================================
// Header : onglets
// ============================================================================

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let titles = [Tab::Quote, Tab::Watchlist]
        .iter()
        .map(|tab| Line::from(format!(" {} ", tab.title())))
        .collect::<Vec<_>>();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" quoteterm "),
        )
        .select(app.current_tab.index())
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

// ============================================================================
// Saisie : une ligne par onglet
// ============================================================================

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let placeholder = match app.current_tab {
        Tab::Quote => "Entrez un symbole (ex: AAPL)",
        Tab::Watchlist => "Symbole à ajouter à la watchlist",
    };

    // Vert pour indiquer le mode input
    let border_color = if app.is_in_input_mode() {
        Color::Green
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let line = if app.input().is_empty() && !app.is_in_input_mode() {
        Line::from(Span::styled(placeholder, Style::default().fg(Color::DarkGray)))
    } else {
        let mut spans = vec![Span::styled(
            app.input().to_string(),
            Style::default().fg(Color::White),
        )];
        if app.is_in_input_mode() {
            spans.push(Span::styled(
                "█", // Curseur
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::SLOW_BLINK),
            ));
        }
        Line::from(spans)
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

// ============================================================================
// Onglet Quote
// ============================================================================

/// Lignes du panneau Quote pour une vue donnée
pub fn quote_lines(view: Option<&QuoteView>) -> Vec<Line<'static>> {
    let Some(view) = view else {
        return vec![Line::from(Span::styled(
            "Entrez un symbole pour commencer",
            Style::default().fg(Color::Gray),
        ))];
    };

    match view {
        QuoteView::Quote {
            ticker,
            price,
            change,
            change_pct,
            previous_close,
            movement,
            change_trend,
        } => {
            let price_color = trend_color(*movement);
            let change_color = trend_color(*change_trend);

            vec![
                Line::from(Span::styled(
                    ticker.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(vec![
                    Span::raw("Price: "),
                    Span::styled(
                        format!("${:.2}", price),
                        Style::default()
                            .fg(price_color)
                            .add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(vec![
                    Span::raw("Change: "),
                    Span::styled(
                        format!("{:+.2} ({:+.2}%)", change, change_pct),
                        Style::default().fg(change_color),
                    ),
                ]),
                Line::from(format!("Previous Close: ${:.2}", previous_close)),
            ]
        }
        QuoteView::Unavailable { ticker } => vec![Line::from(Span::styled(
            format!("Impossible de récupérer les données pour {}", ticker),
            Style::default().fg(Color::Yellow),
        ))],
        QuoteView::Error { message, .. } => vec![Line::from(Span::styled(
            format!("Erreur : {}", message),
            Style::default().fg(Color::Red),
        ))],
    }
}

fn render_quote(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" Quote ");

    let paragraph = Paragraph::new(quote_lines(app.quote.as_ref())).block(block);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Onglet Watchlist
// ============================================================================

fn render_watchlist(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Watchlist ");

    if app.rows.is_empty() {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled("Watchlist vide", Style::default().fg(Color::Gray))),
        ];
        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec!["Ticker", "Price", "Change", "Change %"]).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows = app.rows.iter().enumerate().map(|(index, row)| {
        let change_style = Style::default().fg(if row.is_positive() {
            Color::Green
        } else {
            Color::Red
        });

        // Zebra stripes
        let mut style = if index % 2 == 1 {
            Style::default().bg(Color::Rgb(30, 34, 42))
        } else {
            Style::default()
        };
        if index == app.selected_index {
            style = style.add_modifier(Modifier::REVERSED);
        }

        Row::new(vec![
            Cell::from(row.ticker.to_string()).style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from(row.price_label()),
            Cell::from(row.change_label()).style(change_style),
            Cell::from(row.change_pct_label()).style(change_style),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(10),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

// ============================================================================
// Footer : raccourcis et heure du dernier rafraîchissement
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let key = |label: &'static str, color: Color| {
        Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };

    let mut spans = if app.is_in_input_mode() {
        vec![
            key("[Enter]", Color::Green),
            Span::raw(" Confirm  "),
            key("[ESC]", Color::Red),
            Span::raw(" Cancel"),
        ]
    } else {
        vec![
            key("[q]", Color::Yellow),
            Span::raw(" Quit  "),
            key("[r]", Color::Yellow),
            Span::raw(" Refresh  "),
            key("[Tab]", Color::Yellow),
            Span::raw(" Switch  "),
            key("[i]", Color::Green),
            Span::raw(" Input"),
        ]
    };

    if let Some(at) = app.last_refresh {
        spans.push(Span::styled(
            format!("   Mis à jour {}", at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests
// ============================================================================
