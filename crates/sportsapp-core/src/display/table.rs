use crate::core::failure::UiMessage;
use crate::core::models::Team;
use crate::core::paging::Page;
use crate::core::services::config_service::ConfigEntry;
use crate::utils::text::{or_dash, summary_line, truncate_text};
use comfy_table::{Attribute, Cell, Color, Table, presets};
use crossterm::terminal;
use std::collections::BTreeSet;

struct ColumnWidths {
    name: usize,
    league: usize,
    stadium: usize,
}

pub struct TableDisplay {
    max_width: Option<usize>,
    use_colors: bool,
}

impl TableDisplay {
    pub fn new() -> Self {
        Self {
            max_width: Self::detect_terminal_width(),
            use_colors: true,
        }
    }

    fn detect_terminal_width() -> Option<usize> {
        match terminal::size() {
            Ok((cols, _)) => {
                let width = cols as usize;
                Some(width.clamp(40, 200))
            }
            Err(_) => Some(80),
        }
    }

    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn bold_header(&self, text: &str, color: Color) -> Cell {
        if self.use_colors {
            Cell::new(text).add_attribute(Attribute::Bold).fg(color)
        } else {
            Cell::new(text).add_attribute(Attribute::Bold)
        }
    }

    fn colored_cell(&self, text: &str, color: Color) -> Cell {
        if self.use_colors {
            Cell::new(text).fg(color)
        } else {
            Cell::new(text)
        }
    }

    fn set_colored_headers(&self, table: &mut Table, headers: &[&str], color: Color) {
        let cells: Vec<Cell> = headers.iter().map(|h| self.bold_header(h, color)).collect();
        table.set_header(cells);
    }

    fn new_table(&self, headers: &[&str]) -> Table {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
        self.configure_table_width(&mut table);
        self.set_colored_headers(&mut table, headers, Color::Cyan);
        table
    }

    /// Teams with a ★ marking followed ones
    pub fn render_team_list(&self, teams: &[Team], followed: &BTreeSet<String>) -> String {
        let mut table = self.new_table(&["", "ID", "Name", "League", "Country", "Stadium"]);
        let widths = self.get_responsive_column_widths();

        for team in teams {
            let star = if followed.contains(&team.id) { "★" } else { "" };
            table.add_row(vec![
                self.colored_cell(star, Color::Yellow),
                self.colored_cell(&team.id, Color::Cyan),
                Cell::new(truncate_text(&team.name, widths.name)),
                Cell::new(truncate_text(&or_dash(team.league.as_deref()), widths.league)),
                Cell::new(or_dash(team.country.as_deref())),
                Cell::new(truncate_text(&or_dash(team.stadium.as_deref()), widths.stadium)),
            ]);
        }

        table.to_string()
    }

    /// The shown prefix of a page plus a footer about the rest
    pub fn render_team_page(&self, page: &Page<Team>, followed: &BTreeSet<String>) -> String {
        let mut output = self.render_team_list(&page.shown, followed);
        output.push_str(&format!(
            "\nShowing {} of {} teams",
            page.shown_len(),
            page.total_len()
        ));
        if page.has_more {
            output.push_str(" (use --more to reveal more)");
        }
        output
    }

    pub fn render_league_list(&self, sport: &str, leagues: &[String]) -> String {
        let mut table = self.new_table(&["#", &format!("{} leagues", sport)]);
        for (i, league) in leagues.iter().enumerate() {
            table.add_row(vec![
                self.colored_cell(&(i + 1).to_string(), Color::DarkGrey),
                Cell::new(league),
            ]);
        }
        table.to_string()
    }

    /// Key/value card for a single team
    pub fn render_team_detail(&self, team: &Team, followed: bool) -> String {
        let mut table = self.new_table(&["Field", "Value"]);
        let width = self.max_width.unwrap_or(80).saturating_sub(24).max(20);

        let follow = if followed { "★ Following" } else { "Not followed" };
        let rows: Vec<(&str, String)> = vec![
            ("Name", team.name.clone()),
            ("ID", team.id.clone()),
            ("Short name", or_dash(team.short_name.as_deref())),
            ("Sport", or_dash(team.sport.as_deref())),
            ("League", or_dash(team.league.as_deref())),
            ("Country", or_dash(team.country.as_deref())),
            ("Founded", or_dash(team.formed_year.as_deref())),
            ("Stadium", or_dash(team.stadium.as_deref())),
            ("Location", or_dash(team.stadium_location.as_deref())),
            ("Capacity", or_dash(team.stadium_capacity.as_deref())),
            ("Website", or_dash(team.website.as_deref())),
            ("Badge", or_dash(team.badge_url.as_deref())),
            (
                "About",
                team.description
                    .as_deref()
                    .map(|d| summary_line(d, width))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            ("Status", follow.to_string()),
        ];

        for (field, value) in rows {
            table.add_row(vec![
                self.colored_cell(field, Color::Green),
                Cell::new(value),
            ]);
        }

        table.to_string()
    }

    pub fn render_config(&self, entries: &[ConfigEntry]) -> String {
        let mut table = self.new_table(&["Setting", "Value", "Source"]);
        for entry in entries {
            table.add_row(vec![
                self.colored_cell(entry.key, Color::Cyan),
                Cell::new(&entry.value),
                self.colored_cell(entry.source.label(), Color::DarkGrey),
            ]);
        }
        table.to_string()
    }

    /// Title, message and action hint for empty and error states
    pub fn render_message(&self, ui: &UiMessage, is_error: bool) -> String {
        let icon = if is_error { "❌" } else { "ℹ️" };
        let mut output = format!("{} {}\n", icon, ui.title);
        for line in ui.message.lines() {
            output.push_str(&format!("   {}\n", line));
        }
        if let Some(action) = ui.action {
            output.push_str(&format!("   💡 {}\n", action));
        }
        output
    }

    fn configure_table_width(&self, table: &mut Table) {
        let width = self
            .max_width
            .map(|w| if w > 20 { w - 6 } else { w.max(40) })
            .unwrap_or(80);
        table.set_width(width as u16);
    }

    fn get_responsive_column_widths(&self) -> ColumnWidths {
        match self.max_width.unwrap_or(80) {
            0..=59 => ColumnWidths {
                name: 12,
                league: 8,
                stadium: 8,
            },
            60..=79 => ColumnWidths {
                name: 18,
                league: 12,
                stadium: 12,
            },
            80..=119 => ColumnWidths {
                name: 25,
                league: 22,
                stadium: 20,
            },
            _ => ColumnWidths {
                name: 40,
                league: 30,
                stadium: 30,
            },
        }
    }

    /// Render a simple table with custom headers and rows
    pub fn render_simple_table(&self, headers: &[&str], rows: &[Vec<String>]) -> String {
        let mut table = self.new_table(headers);
        for row in rows {
            let cells: Vec<Cell> = row.iter().map(Cell::new).collect();
            table.add_row(cells);
        }
        table.to_string()
    }
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}
