use std::io;

use crossterm::terminal;
use tui::backend::CrosstermBackend;
use tui::layout::{Constraint, Direction, Layout};
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Line, Points};
use tui::widgets::{Block, Borders, Paragraph};
use tui::Terminal;

use crate::display::{GridGeometry, Paint, Surface};
use crate::error::ScopeError;

// lit cells in white on a black canvas, with a dim grid
const ON_COLOR: Color = Color::White;
const OFF_COLOR: Color = Color::Black;
const GRID_COLOR: Color = Color::DarkGray;

/// columns reserved for the fps/state/register column
const SIDE_PANEL_COLS: u16 = 20;
/// rows reserved for the memory panel under the canvas
const MEMORY_MIN_ROWS: u16 = 5;
/// the smallest terminal the panels can be squeezed into
const MIN_COLS: u16 = 64;
const MIN_ROWS: u16 = 24;

fn color_for(paint: Paint) -> Color {
    match paint {
        Paint::On => ON_COLOR,
        Paint::Off => OFF_COLOR,
        Paint::Grid => GRID_COLOR,
    }
}

/// Terminal rendition of the drawing surface: the cell canvas on the
/// left, fps / play-pause / registers stacked beside it, memory across
/// the bottom. Draw calls buffer here and flush in `present` through one
/// terminal draw, so partial frames never show.
pub struct TermSurface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    geometry: GridGeometry,
    rects: Vec<(f64, f64, f64, f64, Paint)>,
    strokes: Vec<(f64, f64, f64, f64, Paint)>,
    registers: String,
    memory: String,
    fps: String,
    indicator: String,
}

impl TermSurface {
    /// fails fast when the terminal can't host the panels, before any
    /// frame is scheduled
    pub fn new(geometry: GridGeometry) -> Result<Self, ScopeError> {
        let (cols, rows) = terminal::size()
            .map_err(|e| ScopeError::MissingSurface(format!("no terminal: {}", e)))?;
        if cols < MIN_COLS || rows < MIN_ROWS {
            return Err(ScopeError::MissingSurface(format!(
                "terminal {}x{} is smaller than the required {}x{}",
                cols, rows, MIN_COLS, MIN_ROWS
            )));
        }

        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)
            .map_err(|e| ScopeError::MissingSurface(format!("terminal init: {}", e)))?;
        terminal
            .clear()
            .map_err(|e| ScopeError::MissingSurface(format!("terminal clear: {}", e)))?;

        Ok(TermSurface {
            terminal,
            geometry,
            rects: Vec::new(),
            strokes: Vec::new(),
            registers: String::new(),
            memory: String::new(),
            fps: String::new(),
            indicator: String::new(),
        })
    }
}

impl Surface for TermSurface {
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: Paint) {
        self.rects.push((x, y, w, h, paint));
    }

    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, paint: Paint) {
        self.strokes.push((x1, y1, x2, y2, paint));
    }

    fn set_registers(&mut self, text: &str) {
        self.registers = text.to_string();
    }

    fn set_memory(&mut self, text: &str) {
        self.memory = text.to_string();
    }

    fn set_fps(&mut self, text: &str) {
        self.fps = text.to_string();
    }

    fn set_indicator(&mut self, glyph: &str) {
        self.indicator = glyph.to_string();
    }

    fn present(&mut self) -> Result<(), ScopeError> {
        let Self {
            terminal,
            geometry,
            rects,
            strokes,
            registers,
            memory,
            fps,
            indicator,
        } = self;

        // expand buffered rectangles into point batches per paint, with
        // the canvas y axis pointing up
        let mut on: Vec<(f64, f64)> = Vec::new();
        let mut off: Vec<(f64, f64)> = Vec::new();
        for &(x, y, w, h, paint) in rects.iter() {
            for dy in 0..h as usize {
                for dx in 0..w as usize {
                    let point = (x + dx as f64, -(y + dy as f64));
                    match paint {
                        Paint::On => on.push(point),
                        _ => off.push(point),
                    }
                }
            }
        }
        let grid: Vec<Line> = strokes
            .iter()
            .map(|&(x1, y1, x2, y2, paint)| Line {
                x1,
                y1: -y1,
                x2,
                y2: -y2,
                color: color_for(paint),
            })
            .collect();

        let (surf_w, surf_h) = geometry.surface_size();

        terminal
            .draw(|f| {
                let size = f.size();
                // terminal cells are tall, so the canvas maps two virtual
                // rows per character row
                let canvas_rows = (surf_h as u16 / 2 + 2)
                    .min(size.height.saturating_sub(MEMORY_MIN_ROWS));
                let canvas_cols =
                    (surf_w as u16 + 2).min(size.width.saturating_sub(SIDE_PANEL_COLS));

                let vertical = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(canvas_rows), Constraint::Min(3)].as_ref())
                    .split(size);
                let top = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Length(canvas_cols), Constraint::Min(10)].as_ref())
                    .split(vertical[0]);
                let side = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints(
                        [
                            Constraint::Length(3),
                            Constraint::Length(3),
                            Constraint::Min(4),
                        ]
                        .as_ref(),
                    )
                    .split(top[1]);

                let canvas = Canvas::default()
                    .block(
                        Block::default()
                            .title("display")
                            .borders(Borders::ALL)
                            .style(Style::default().bg(OFF_COLOR)),
                    )
                    .x_bounds([0.0, surf_w as f64])
                    .y_bounds([-(surf_h as f64), 0.0])
                    .marker(Marker::Block)
                    .paint(|ctx| {
                        for line in &grid {
                            ctx.draw(line);
                        }
                        ctx.draw(&Points {
                            coords: &off,
                            color: OFF_COLOR,
                        });
                        ctx.draw(&Points {
                            coords: &on,
                            color: ON_COLOR,
                        });
                    });
                f.render_widget(canvas, top[0]);

                f.render_widget(
                    Paragraph::new(fps.as_str())
                        .block(Block::default().title("fps").borders(Borders::ALL)),
                    side[0],
                );
                f.render_widget(
                    Paragraph::new(indicator.as_str())
                        .block(Block::default().title("state").borders(Borders::ALL)),
                    side[1],
                );
                f.render_widget(
                    Paragraph::new(registers.as_str())
                        .block(Block::default().title("registers").borders(Borders::ALL)),
                    side[2],
                );
                f.render_widget(
                    Paragraph::new(memory.as_str())
                        .block(Block::default().title("memory").borders(Borders::ALL)),
                    vertical[1],
                );
            })
            .map_err(|e| ScopeError::MissingSurface(format!("terminal draw: {}", e)))?;

        rects.clear();
        strokes.clear();
        Ok(())
    }
}
