use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use bilete_core::{Ticket, ViewSnapshot};

use crate::app::{App, Mode};

pub fn draw(frame: &mut Frame<'_>, app: &App) {
    let size = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(size);

    let snapshot = app.view.snapshot();
    render_header(frame, chunks[0], app);
    render_list(frame, chunks[1], app, &snapshot);
    render_footer(frame, chunks[2], app, &snapshot);

    if app.show_help {
        render_help(frame, size);
    }
}

fn render_header(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let summary = app.summary();
    let filter_display = match app.mode {
        Mode::FilterEditing => format!("{}_", app.filter_input),
        Mode::List if app.view.criteria().is_empty() => "(none)".to_string(),
        Mode::List => app.view.criteria().to_query(),
    };
    let mut spans = vec![
        Span::raw(format!(
            "tickets: {}  total: {} RON  filter: ",
            summary.count, summary.total_cost
        )),
        Span::styled(
            filter_display,
            if app.mode == Mode::FilterEditing {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            },
        ),
    ];
    if let Some(err) = &app.filter_error {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(err.clone(), Style::default().fg(Color::Red)));
    }

    let block = Block::default().borders(Borders::ALL).title("bilete");
    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_list(frame: &mut Frame<'_>, area: Rect, app: &App, snapshot: &ViewSnapshot<'_>) {
    let title = format!("Tickets ({} shown)", snapshot.total_filtered);
    if snapshot.items.is_empty() {
        let paragraph = Paragraph::new(app.empty_hint())
            .block(Block::default().borders(Borders::ALL).title(title))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = snapshot
        .items
        .iter()
        .enumerate()
        .map(|(offset, ticket)| ticket_row(snapshot.first_index + offset + 1, ticket))
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.selected));

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("➤ ");

    frame.render_stateful_widget(list, area, &mut state);
}

fn ticket_row(position: usize, ticket: &Ticket) -> ListItem<'static> {
    let (status, status_style) = if ticket.flagged {
        (
            format!("flagged x{}", ticket.verification_count),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else if ticket.verified {
        ("verified".to_string(), Style::default().fg(Color::Green))
    } else {
        ("pending".to_string(), Style::default().fg(Color::Yellow))
    };
    let (sent, sent_style) = if ticket.sent {
        ("sent", Style::default().fg(Color::Cyan))
    } else {
        ("not sent", Style::default().fg(Color::DarkGray))
    };

    let spans = vec![
        Span::styled(
            format!("{position:>4} "),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{:<28}", ticket.nume),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("{:<14}", ticket.telefon)),
        Span::raw(format!("{:<18}", format!("[{}]", ticket.tip_bilet))),
        Span::styled(format!("{status:<12}"), status_style),
        Span::styled(sent, sent_style),
    ];
    ListItem::new(Line::from(spans))
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, app: &App, snapshot: &ViewSnapshot<'_>) {
    let mut pages = vec![Span::raw("pages: ")];
    for page in snapshot.page_window() {
        if page == snapshot.current_page {
            pages.push(Span::styled(
                format!("[{page}]"),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        } else {
            pages.push(Span::raw(page.to_string()));
        }
        pages.push(Span::raw(" "));
    }
    pages.push(Span::raw(format!("of {}", snapshot.total_pages)));
    if let Some((first, last)) = snapshot.shown_range() {
        pages.push(Span::styled(
            format!("  showing {first}-{last} of {}", snapshot.total_filtered),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let hint = match app.mode {
        Mode::List => "j/k move  n/p page  / filter  c clear  s sent  v verify  r reload  ? help  q quit",
        Mode::FilterEditing => "enter apply  esc cancel  ctrl+u clear  ctrl+w delete word",
    };
    let second = if let Some(err) = &app.error {
        Span::styled(err.clone(), Style::default().fg(Color::Red))
    } else if let Some(status) = &app.status {
        Span::styled(status.clone(), Style::default().fg(Color::Green))
    } else {
        Span::styled(hint, Style::default().fg(Color::DarkGray))
    };

    let paragraph = Paragraph::new(vec![Line::from(pages), Line::from(second)])
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame<'_>, area: Rect) {
    let modal = centered_rect(70, 60, area);
    frame.render_widget(Clear, modal);

    let text = vec![
        Line::from("Global: q quit, Ctrl+C quit, ? help"),
        Line::from("List: j/k move, g/G first/last, n/p next/previous page, r reload"),
        Line::from("Tickets: s toggle sent, v verify selected"),
        Line::from("Filter: / edit, enter apply, esc cancel, c clear"),
        Line::from(""),
        Line::from("Filter syntax: text matches name/phone, status:verified|pending|all, sent:sent|not-sent|all, type:\"BAL + AFTER\""),
    ];

    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, modal);
}

fn centered_rect(percent_x: u16, percent_y: u16, rect: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(rect);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::draw;
    use crate::app::App;
    use bilete_core::{PriceTable, Ticket, TicketId, TicketType};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn renders_page_window_and_range() {
        let mut app = App::new(2, PriceTable::default()).unwrap();
        let tickets = (1..=7)
            .map(|idx| {
                Ticket::new(
                    TicketId::new(&format!("t{idx}")).unwrap(),
                    &format!("Invitat {idx}"),
                    "+40722123456",
                    TicketType::BalAfter,
                )
            })
            .collect();
        app.view.replace_tickets(tickets);
        app.view.go_to_page(2);

        let mut terminal = Terminal::new(TestBackend::new(120, 16)).unwrap();
        terminal.draw(|frame| draw(frame, &app)).unwrap();
        let buffer = terminal.backend().buffer();
        let rendered: String = buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();

        assert!(rendered.contains("total: 1120 RON"));
        assert!(rendered.contains("[2]"));
        assert!(rendered.contains("showing 3-4 of 7"));
        assert!(rendered.contains("Invitat 3"));
    }
}
