use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;

use crate::explorer::Explorer;
use crate::format::{format_date, format_salary, format_window, indented};
use crate::models::{ContractType, FilterCriteria, Job, RemoteMode};
use crate::tags::group_tags;

const SALARY_STEP: u32 = 5;
const SALARY_FLOOR: u32 = 45;
const SALARY_CEILING: u32 = 120;

enum Mode {
    Browse,
    /// Editing the query; holds the query to restore on Esc.
    Query { previous: String },
}

struct AppState {
    explorer: Explorer,
    initial: FilterCriteria,
    /// Available tags in display-group order.
    tag_order: Vec<String>,
    tag_cursor: usize,
    selected: usize,
    scroll_offset: u16,
    mode: Mode,
}

impl AppState {
    fn new(explorer: Explorer) -> Self {
        let tag_order = group_tags(&explorer.options().tags)
            .into_iter()
            .flat_map(|(_, tags)| tags)
            .collect();
        Self {
            initial: explorer.criteria().clone(),
            explorer,
            tag_order,
            tag_cursor: 0,
            selected: 0,
            scroll_offset: 0,
            mode: Mode::Browse,
        }
    }

    fn current_job(&self) -> Option<&Job> {
        self.explorer.filtered().get(self.selected).copied()
    }

    fn result_count(&self) -> usize {
        self.explorer.results().map_or(0, |r| r.len())
    }

    fn apply(&mut self, next: impl FnOnce(&FilterCriteria) -> FilterCriteria) {
        self.explorer.update(next);
        let count = self.result_count();
        if self.selected >= count {
            self.selected = count.saturating_sub(1);
        }
        self.scroll_offset = 0;
    }

    fn next(&mut self) {
        let count = self.result_count();
        if count > 0 && self.selected < count - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }

    fn next_tag(&mut self) {
        if !self.tag_order.is_empty() {
            self.tag_cursor = (self.tag_cursor + 1) % self.tag_order.len();
        }
    }

    fn prev_tag(&mut self) {
        if !self.tag_order.is_empty() {
            self.tag_cursor = (self.tag_cursor + self.tag_order.len() - 1) % self.tag_order.len();
        }
    }

    fn toggle_cursor_tag(&mut self) {
        if let Some(tag) = self.tag_order.get(self.tag_cursor).cloned() {
            self.apply(|c| c.toggle_tag(&tag));
        }
    }

    fn cycle_location(&mut self) {
        let locations = self.explorer.options().locations.clone();
        self.apply(|c| c.with_location(c.location.cycle(&locations)));
    }

    fn handle_browse_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.prev(),
            KeyCode::Char('J') | KeyCode::PageDown => self.scroll_down(),
            KeyCode::Char('K') | KeyCode::PageUp => self.scroll_up(),
            KeyCode::Char('/') => {
                self.mode = Mode::Query {
                    previous: self.explorer.criteria().query.clone(),
                };
            }
            KeyCode::Char('l') => self.cycle_location(),
            KeyCode::Char('c') => {
                self.apply(|c| c.with_contract_type(c.contract_type.cycle(&ContractType::ALL)))
            }
            KeyCode::Char('w') => self.apply(|c| c.with_remote(c.remote.cycle(&RemoteMode::ALL))),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.apply(|c| c.with_min_salary(raise_salary(c.min_salary)))
            }
            KeyCode::Char('-') => self.apply(|c| c.with_min_salary(lower_salary(c.min_salary))),
            KeyCode::Char(']') => self.next_tag(),
            KeyCode::Char('[') => self.prev_tag(),
            KeyCode::Char(' ') => self.toggle_cursor_tag(),
            KeyCode::Char('r') => {
                let initial = self.initial.clone();
                self.apply(|_| initial);
            }
            KeyCode::Char('x') => self.apply(|_| FilterCriteria::unconstrained()),
            _ => {}
        }
        true
    }

    fn handle_query_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => self.mode = Mode::Browse,
            KeyCode::Esc => {
                if let Mode::Query { previous } = std::mem::replace(&mut self.mode, Mode::Browse) {
                    self.apply(|c| c.with_query(previous));
                }
            }
            KeyCode::Backspace => self.apply(|c| {
                let mut query = c.query.clone();
                query.pop();
                c.with_query(query)
            }),
            KeyCode::Char(ch) => self.apply(|c| c.with_query(format!("{}{}", c.query, ch))),
            _ => {}
        }
    }
}

/// Next slider position: jumps to the floor from "no minimum", then steps up.
fn raise_salary(current: u32) -> u32 {
    if current < SALARY_FLOOR {
        SALARY_FLOOR
    } else {
        (current + SALARY_STEP).min(SALARY_CEILING)
    }
}

/// Previous slider position; stepping below the floor removes the minimum.
fn lower_salary(current: u32) -> u32 {
    if current <= SALARY_FLOOR {
        0
    } else {
        current - SALARY_STEP
    }
}

pub fn run_browse(explorer: Explorer) -> Result<()> {
    let mut state = AppState::new(explorer);

    // Log output on stderr would tear the alternate screen.
    let log_level = log::max_level();
    log::set_max_level(log::LevelFilter::Off);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    log::set_max_level(log_level);

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
) -> Result<()> {
    let mut list_state = ListState::default();

    loop {
        let empty = state.explorer.results().is_none_or(|r| r.is_empty());
        list_state.select(if empty { None } else { Some(state.selected) });
        terminal.draw(|frame| draw(frame, state, &mut list_state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match state.mode {
                Mode::Browse => {
                    if !state.handle_browse_key(key.code) {
                        break;
                    }
                }
                Mode::Query { .. } => state.handle_query_key(key.code),
            }
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, state: &AppState, list_state: &mut ListState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(build_header(state), rows[0]);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[1]);

    // Left panel: matching jobs
    let filtered = state.explorer.filtered();
    let list_block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Offres ({}) ", filtered.len()));

    if filtered.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(Span::styled(
                "Aucun résultat pour ces filtres",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Ajustez le salaire ou élargissez vos tags.",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(list_block)
        .wrap(Wrap { trim: true });
        frame.render_widget(empty, chunks[0]);
    } else {
        let items: Vec<ListItem> = filtered
            .iter()
            .map(|job| {
                let title = if job.title.chars().count() > 32 {
                    format!("{}...", job.title.chars().take(29).collect::<String>())
                } else {
                    job.title.clone()
                };
                ListItem::new(format!("{} | {}", title, job.company))
            })
            .collect();

        let list = List::new(items)
            .block(list_block)
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, chunks[0], list_state);
    }

    // Right panel: job detail
    let detail_width = chunks[1].width.saturating_sub(2) as usize;
    let detail = Paragraph::new(build_detail(state, detail_width))
        .block(Block::default().borders(Borders::ALL).title(" Détail "))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset, 0));
    frame.render_widget(detail, chunks[1]);

    let help_text = match state.mode {
        Mode::Browse => {
            " j/k:naviguer  J/K:défiler  /:recherche  l:lieu c:contrat w:mode  +/-:salaire  [/]:tag espace:choisir  r:initial x:tout  q:quitter"
        }
        Mode::Query { .. } => " Entrée:valider  Échap:annuler",
    };
    let help = Paragraph::new(help_text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, rows[2]);
}

fn build_header(state: &AppState) -> Paragraph<'_> {
    let criteria = state.explorer.criteria();
    let mut lines = Vec::new();

    if let Some(results) = state.explorer.results() {
        let summary = &results.summary;
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} offres", summary.count),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  •  "),
            Span::raw(format_window(&summary.window)),
            Span::raw("  •  "),
            Span::styled(summary.seniority_line(), Style::default().fg(Color::Green)),
        ]));
    }

    let salary = if criteria.min_salary == 0 {
        "—".to_string()
    } else {
        format!("{} k€ et plus", criteria.min_salary)
    };
    lines.push(Line::from(format!(
        "Lieu: {}  Contrat: {}  Mode: {}  Salaire: {}",
        criteria.location, criteria.contract_type, criteria.remote, salary
    )));

    let query_style = match state.mode {
        Mode::Query { .. } => Style::default().fg(Color::Yellow),
        Mode::Browse => Style::default(),
    };
    let cursor = if matches!(state.mode, Mode::Query { .. }) {
        "_"
    } else {
        ""
    };
    lines.push(Line::from(Span::styled(
        format!("Mots-clés: {}{}", criteria.query, cursor),
        query_style,
    )));

    let selected_tags = if criteria.tags.is_empty() {
        "aucun".to_string()
    } else {
        criteria.tags.join(", ")
    };
    let cursor_tag = state
        .tag_order
        .get(state.tag_cursor)
        .map(|tag| {
            let mark = if criteria.tags.contains(tag) { "x" } else { " " };
            format!("[{}] {}", mark, tag)
        })
        .unwrap_or_default();
    lines.push(Line::from(vec![
        Span::raw(format!("Tags: {}  ", selected_tags)),
        Span::styled(cursor_tag, Style::default().fg(Color::Cyan)),
    ]));

    Paragraph::new(lines).block(Block::default().borders(Borders::BOTTOM))
}

fn build_detail(state: &AppState, width: usize) -> Text<'static> {
    let Some(job) = state.current_job() else {
        return Text::raw("Aucune offre sélectionnée");
    };

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(job.title.clone(), bold)));
    lines.push(Line::from(Span::styled(
        job.company.clone(),
        Style::default().fg(Color::Green),
    )));
    lines.push(Line::from(format!(
        "{} • {} • {} • {}",
        job.location, job.contract_type, job.remote, job.experience
    )));
    lines.push(Line::from(format!("Publié le {}", format_date(&job.publish_date))));
    lines.push(Line::from(format!(
        "Rémunération : {}",
        format_salary(&job.salary_range)
    )));
    lines.push(Line::from(""));

    for line in indented(&job.description, width, "") {
        lines.push(Line::from(line));
    }
    lines.push(Line::from(""));

    if !job.tags.is_empty() {
        lines.push(Line::from(Span::styled(
            job.tags.join(" · "),
            Style::default().fg(Color::Cyan),
        )));
        lines.push(Line::from(""));
    }

    let sections = [
        ("Missions clés", &job.missions),
        ("Compétences recherchées", &job.competences),
        ("Outils", &job.tools),
    ];
    for (label, items) in sections {
        if items.is_empty() {
            continue;
        }
        lines.push(Line::from(Span::styled(label, bold)));
        for item in items.iter() {
            for line in indented(&format!("• {}", item), width, "  ") {
                lines.push(Line::from(line));
            }
        }
        lines.push(Line::from(""));
    }

    let highlights = &job.analytics_highlights;
    lines.push(Line::from(Span::styled("Pilotage", bold)));
    lines.push(Line::from(format!(
        "  Budget : {}",
        highlights.budget_responsibility
    )));
    lines.push(Line::from(format!("  Équipe : {}", highlights.team_size)));
    lines.push(Line::from(format!("  Rattachement : {}", highlights.reporting_to)));
    lines.push(Line::from(""));

    let extras = [
        ("Langues", &job.extras.languages),
        ("Avantages", &job.extras.perks),
        ("Protection", &job.extras.benefits),
    ];
    for (label, items) in extras {
        if !items.is_empty() {
            lines.push(Line::from(vec![
                Span::styled(format!("{} : ", label), Style::default().fg(Color::DarkGray)),
                Span::raw(items.join(", ")),
            ]));
        }
    }

    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::tests::job;

    fn state() -> AppState {
        let jobs = vec![
            Job {
                tags: vec!["IFRS".into(), "Budget".into()],
                ..job("a")
            },
            Job {
                location: "Lyon".into(),
                tags: vec!["IFRS".into()],
                ..job("b")
            },
        ];
        AppState::new(Explorer::new(jobs, FilterCriteria::unconstrained()))
    }

    #[test]
    fn test_salary_slider_steps() {
        assert_eq!(raise_salary(0), 45);
        assert_eq!(raise_salary(60), 65);
        assert_eq!(raise_salary(120), 120);
        assert_eq!(lower_salary(65), 60);
        assert_eq!(lower_salary(45), 0);
        assert_eq!(lower_salary(0), 0);
    }

    #[test]
    fn test_query_mode_updates_live_and_escape_restores() {
        let mut state = state();
        state.handle_browse_key(KeyCode::Char('/'));
        state.handle_query_key(KeyCode::Char('l'));
        state.handle_query_key(KeyCode::Char('y'));
        assert_eq!(state.explorer.criteria().query, "ly");
        assert_eq!(state.result_count(), 1);

        state.handle_query_key(KeyCode::Esc);
        assert_eq!(state.explorer.criteria().query, "");
        assert_eq!(state.result_count(), 2);
    }

    #[test]
    fn test_tag_toggle_and_selection_clamp() {
        let mut state = state();
        state.next();
        assert_eq!(state.selected, 1);

        // Cursor starts on "IFRS"; move to "Budget" and select it.
        state.handle_browse_key(KeyCode::Char(']'));
        state.handle_browse_key(KeyCode::Char(' '));
        assert_eq!(state.explorer.criteria().tags, vec!["Budget"]);
        assert_eq!(state.result_count(), 1);
        assert_eq!(state.selected, 0);
        assert_eq!(state.current_job().map(|j| j.id.as_str()), Some("a"));
    }

    #[test]
    fn test_cycle_location_and_reset() {
        let mut state = state();
        state.handle_browse_key(KeyCode::Char('l'));
        state.handle_browse_key(KeyCode::Char('l'));
        assert_eq!(state.current_job().map(|j| j.id.as_str()), Some("b"));

        state.handle_browse_key(KeyCode::Char('r'));
        assert_eq!(state.explorer.criteria(), &FilterCriteria::unconstrained());
    }

    #[test]
    fn test_quit_keys() {
        let mut state = state();
        assert!(!state.handle_browse_key(KeyCode::Char('q')));
        assert!(state.handle_browse_key(KeyCode::Char('j')));
    }
}
