use std::io::{self, IsTerminal, Write};

use chrono::Datelike;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::board::{BoardCell, MonthBoard};
use crate::config::PlannerConfig;
use crate::day_view::DayDetail;
use crate::locale::DateFormatter;
use crate::subject::SubjectBook;

const CELL_WIDTH: usize = 14;
const ROW_WIDTH: usize = CELL_WIDTH * 7 + 6;

pub const EMPTY_DAY: &str = "No tasks for this day";

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    preview_limit: usize,
}

impl Renderer {
    pub fn new(color: bool, preview_limit: usize) -> Self {
        Self { color, preview_limit }
    }

    /// Colour needs the config, no `--no-color`, and a terminal on stdout.
    pub fn from_config(cfg: &PlannerConfig, no_color: bool) -> Self {
        let color = cfg.policies.color && !no_color && io::stdout().is_terminal();
        Self::new(color, cfg.policies.preview_limit)
    }

    #[tracing::instrument(skip_all, fields(month = %board.month()))]
    pub fn write_month<W: Write>(
        &self,
        out: &mut W,
        board: &MonthBoard<'_, '_>,
        subjects: &SubjectBook,
        formatter: &dyn DateFormatter,
    ) -> anyhow::Result<()> {
        let title = formatter.month_title(board.month());
        writeln!(out, "{}", self.paint(&center(&title, ROW_WIDTH), "1"))?;

        let header = formatter
            .weekday_labels(board.week_start())
            .iter()
            .map(|label| pad(&fit(label, CELL_WIDTH), CELL_WIDTH))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{header}")?;

        for week in board.weeks() {
            writeln!(out, "{}", "-".repeat(ROW_WIDTH))?;

            let columns: Vec<Vec<String>> =
                week.iter().map(|entry| self.cell_lines(entry, subjects)).collect();
            let height = columns.iter().map(Vec::len).max().unwrap_or(0);

            for line in 0..height {
                let row = columns
                    .iter()
                    .map(|lines| lines.get(line).cloned().unwrap_or_else(|| " ".repeat(CELL_WIDTH)))
                    .collect::<Vec<_>>()
                    .join(" ");
                writeln!(out, "{row}")?;
            }
        }
        writeln!(out, "{}", "-".repeat(ROW_WIDTH))?;

        let stats = board.stats();
        writeln!(
            out,
            "{} tasks this month: {} completed, {} pending",
            stats.total, stats.completed, stats.pending
        )?;
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(date = %detail.date()))]
    pub fn write_day<W: Write>(&self, out: &mut W, detail: &DayDetail<'_>) -> anyhow::Result<()> {
        writeln!(out, "{}", self.paint(detail.heading(), "1"))?;

        if detail.is_empty() {
            writeln!(out, "  {EMPTY_DAY}")?;
            return Ok(());
        }

        for entry in detail.entries() {
            let check = if entry.task.completed() { "[x]" } else { "[ ]" };
            let mut line = format!("  {check} {}", entry.task.title());
            if let Some(subject) = entry.subject {
                let tag = format!("({})", subject.name());
                line.push_str("  ");
                line.push_str(&self.paint(&tag, subject.color().ansi_code()));
            }
            writeln!(out, "{line}")?;

            if let Some(description) = entry.task.description() {
                writeln!(out, "      {description}")?;
            }
        }
        Ok(())
    }

    // Every returned line is exactly CELL_WIDTH columns wide before painting.
    fn cell_lines(&self, entry: &BoardCell<'_, '_>, subjects: &SubjectBook) -> Vec<String> {
        let cell = entry.cell();
        let day = cell.date().day();
        let label = if cell.is_today() { format!("[{day}]") } else { day.to_string() };
        let label = pad(&label, CELL_WIDTH);
        let label = if cell.is_today() {
            self.paint(&label, "1;33")
        } else if !cell.in_current_month() {
            self.paint(&label, "90")
        } else {
            label
        };

        let mut lines = vec![label];
        let preview = entry.preview(self.preview_limit);
        for task in preview.shown() {
            let marker = if task.completed() { "x" } else { "-" };
            let text = pad(&fit(&format!("{marker} {}", task.title()), CELL_WIDTH), CELL_WIDTH);
            let code = subjects
                .resolve_subject(task.subject_id())
                .map(|subject| subject.color().ansi_code())
                .unwrap_or("39");
            lines.push(self.paint(&text, code));
        }
        if let Some(hidden) = preview.overflow() {
            let more = pad(&fit(&format!("+{hidden} more"), CELL_WIDTH), CELL_WIDTH);
            lines.push(self.paint(&more, "2"));
        }
        lines
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

/// Cuts `text` to `width` columns, marking the cut with an ellipsis.
fn fit(text: &str, width: usize) -> String {
    if UnicodeWidthStr::width(text) <= width {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + ch_width + 1 > width {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out.push('…');
    out
}

fn pad(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(UnicodeWidthStr::width(text));
    format!("{text}{}", " ".repeat(padding))
}

fn center(text: &str, width: usize) -> String {
    let left = width.saturating_sub(UnicodeWidthStr::width(text)) / 2;
    format!("{}{text}", " ".repeat(left))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::grid::build_month_grid;
    use crate::index::TaskIndex;
    use crate::locale::LocaleFormatter;
    use crate::month::WeekStart;
    use crate::subject::{Subject, SubjectId, Swatch};
    use crate::task::Task;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn render_month(tasks: &[Task]) -> String {
        let index = TaskIndex::build(tasks);
        let grid = build_month_grid(date(2024, 2, 1), date(2024, 2, 14), WeekStart::SUNDAY).expect("grid");
        let board = MonthBoard::new(&grid, &index);
        let formatter = LocaleFormatter::default();

        let mut out = Vec::new();
        Renderer::new(false, 3)
            .write_month(&mut out, &board, &SubjectBook::default(), &formatter)
            .expect("render");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn month_grid_is_aligned_and_truncated() {
        let mut tasks: Vec<Task> = (0..5)
            .map(|n| Task::new(format!("t{n}"), format!("Task {n}"), "2024-02-10").expect("task"))
            .collect();
        tasks.push(Task::new("long", "Very long task title", "2024-02-12").expect("task"));

        let text = render_month(&tasks);

        assert!(text.contains("February 2024"));
        assert!(text.lines().nth(1).is_some_and(|header| header.starts_with("Su ")));
        assert!(text.contains("[14]"));
        assert!(text.contains("+2 more"));
        assert!(text.contains("- Very long t…"));
        assert!(!text.contains("Task 3"));
        assert!(text.contains("6 tasks this month: 0 completed, 6 pending"));
        assert!(!text.contains('\x1b'));

        let lines: Vec<&str> = text.lines().collect();
        for line in &lines[1..lines.len() - 1] {
            assert_eq!(UnicodeWidthStr::width(*line), ROW_WIDTH, "{line:?}");
        }
    }

    #[test]
    fn empty_day_message() {
        let tasks: Vec<Task> = Vec::new();
        let index = TaskIndex::build(&tasks);
        let book = SubjectBook::default();
        let formatter = LocaleFormatter::default();
        let detail = DayDetail::new(&index, &book, date(2024, 2, 12), &formatter);

        let mut out = Vec::new();
        Renderer::new(false, 3).write_day(&mut out, &detail).expect("render");
        let text = String::from_utf8(out).expect("utf8");

        assert!(text.starts_with("Monday, 12 February 2024"));
        assert!(text.contains(EMPTY_DAY));
    }

    #[test]
    fn day_lists_subjects_and_descriptions() {
        let math = SubjectId::new("math").expect("id");
        let book = SubjectBook::new(vec![Subject::new(math.clone(), "Math", Swatch::Blue).expect("subject")]);
        let tasks = vec![
            Task::new("a", "Worksheet", "2024-02-10")
                .expect("task")
                .with_subject(Some(math))
                .with_description("pages 4-6"),
            Task::new("b", "Done already", "2024-02-10").expect("task").with_completed(true),
        ];
        let index = TaskIndex::build(&tasks);
        let formatter = LocaleFormatter::default();
        let detail = DayDetail::new(&index, &book, date(2024, 2, 10), &formatter);

        let mut out = Vec::new();
        Renderer::new(true, 3).write_day(&mut out, &detail).expect("render");
        let text = String::from_utf8(out).expect("utf8");

        assert!(text.contains("[ ] Worksheet"));
        assert!(text.contains("\x1b[34m(Math)\x1b[0m"));
        assert!(text.contains("      pages 4-6"));
        assert!(text.contains("[x] Done already"));
    }

    #[test]
    fn fit_respects_wide_characters() {
        assert_eq!(fit("short", 10), "short");
        let cut = fit("日本語のタスク", 7);
        assert!(UnicodeWidthStr::width(cut.as_str()) <= 7);
        assert!(cut.ends_with('…'));
    }
}
