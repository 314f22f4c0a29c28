//! Draws a [`GaugeFrame`] on a truecolor terminal.
//!
//! Layout, top to bottom: value caption over the indicator, the segmented
//! bar with the indicator line, scale marker labels, and a status panel.
//! Successive frames redraw in place.

use std::io::{self, Write};

use brixbar_gauge::{Color, GaugeFrame};
use crossterm::style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, ClearType};
use crossterm::{cursor, queue};

/// Columns left free at the right edge.
const RIGHT_MARGIN: u16 = 2;
const MIN_WIDTH: u16 = 20;
const MAX_WIDTH: u16 = 100;
/// Pixels of configured bar height per terminal row.
const PIXELS_PER_ROW: f64 = 16.0;
const MAX_BAR_ROWS: u16 = 3;

pub struct TerminalGauge {
    width: u16,
    lines_drawn: u16,
}

impl TerminalGauge {
    pub fn new(width: u16) -> Self {
        Self {
            width: width.clamp(MIN_WIDTH, MAX_WIDTH),
            lines_drawn: 0,
        }
    }

    /// Sizes the bar to the current terminal, or 80 columns when unknown.
    pub fn fit_terminal() -> Self {
        let cols = terminal::size().map(|(c, _)| c).unwrap_or(80);
        Self::new(cols.saturating_sub(RIGHT_MARGIN))
    }

    pub fn draw(&mut self, out: &mut impl Write, frame: &GaugeFrame) -> io::Result<()> {
        if self.lines_drawn > 0 {
            queue!(out, cursor::MoveUp(self.lines_drawn), cursor::MoveToColumn(0))?;
        }

        let indicator = column_for(frame.position_percent, self.width);
        let indicator_color = to_term(frame.indicator_color);
        let rows = bar_rows(frame.bar_height);

        queue!(
            out,
            terminal::Clear(ClearType::CurrentLine),
            Print(value_line(frame, self.width)),
            Print("\n")
        )?;

        for _ in 0..rows {
            queue!(out, terminal::Clear(ClearType::CurrentLine))?;
            for col in 0..self.width {
                let bg = to_term(bar_color_at(frame, column_center_percent(col, self.width)));
                if col == indicator {
                    queue!(
                        out,
                        SetBackgroundColor(bg),
                        SetForegroundColor(indicator_color),
                        Print('┃')
                    )?;
                } else {
                    queue!(out, SetBackgroundColor(bg), Print(' '))?;
                }
            }
            queue!(out, ResetColor, Print("\n"))?;
        }

        queue!(
            out,
            terminal::Clear(ClearType::CurrentLine),
            Print(marker_line(frame, self.width)),
            Print("\n"),
            terminal::Clear(ClearType::CurrentLine),
            Print(format!("{}  {}  ", frame.label, frame.headline_text())),
            SetForegroundColor(to_term(frame.status_color)),
            Print(frame.status.text()),
            ResetColor,
            Print(format!("  {}\n", frame.target_text())),
        )?;

        out.flush()?;
        self.lines_drawn = rows + 3;
        Ok(())
    }
}

fn to_term(c: Color) -> style::Color {
    style::Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// Terminal rows used for the bar.
fn bar_rows(bar_height: f64) -> u16 {
    ((bar_height / PIXELS_PER_ROW).ceil() as u16).clamp(1, MAX_BAR_ROWS)
}

/// Column whose cell represents `percent` of the bar.
fn column_for(percent: f64, width: u16) -> u16 {
    let last = width.saturating_sub(1);
    ((percent.clamp(0.0, 100.0) / 100.0) * f64::from(last)).round() as u16
}

fn column_center_percent(col: u16, width: u16) -> f64 {
    (f64::from(col) + 0.5) / f64::from(width) * 100.0
}

/// Background color at `percent`. Past the last segment (odd maximum,
/// rounding) the last segment's color continues.
fn bar_color_at(frame: &GaugeFrame, percent: f64) -> Color {
    frame
        .segments
        .iter()
        .find(|s| percent >= s.start_percent && percent < s.start_percent + s.width_percent)
        .or(frame.segments.last())
        .map_or(brixbar_gauge::colors::EXTREMELY_POOR, |s| s.color)
}

/// Start column for `len` characters centered on `center`, kept inside the bar.
fn centered_start(center: u16, len: usize, width: u16) -> usize {
    let max_start = usize::from(width).saturating_sub(len);
    usize::from(center).saturating_sub(len / 2).min(max_start)
}

/// Value caption placed over the indicator.
fn value_line(frame: &GaugeFrame, width: u16) -> String {
    let text = frame.value_text();
    let start = centered_start(column_for(frame.position_percent, width), text.len(), width);
    format!("{}{}", " ".repeat(start), text)
}

/// Marker labels under their positions. A label that would touch the
/// previous one is skipped, except the maximum, which replaces its neighbour.
fn marker_line(frame: &GaugeFrame, width: u16) -> String {
    let mut line = vec![' '; usize::from(width)];
    let mut placed: Vec<(usize, usize)> = Vec::new();

    let count = frame.markers.len();
    for (i, marker) in frame.markers.iter().enumerate() {
        let len = marker.label.chars().count();
        if len > usize::from(width) {
            continue;
        }
        let start = centered_start(column_for(marker.position_percent, width), len, width);
        let is_last = i + 1 == count;

        while let Some(&(prev_start, prev_len)) = placed.last() {
            if start > prev_start + prev_len {
                break;
            }
            if !is_last {
                break;
            }
            line[prev_start..prev_start + prev_len].fill(' ');
            placed.pop();
        }
        if placed
            .last()
            .is_some_and(|&(prev_start, prev_len)| start <= prev_start + prev_len)
        {
            continue;
        }

        for (cell, ch) in line.iter_mut().skip(start).zip(marker.label.chars()) {
            *cell = ch;
        }
        placed.push((start, len));
    }

    line.into_iter().collect::<String>().trim_end().to_owned()
}
