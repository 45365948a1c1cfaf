//! Price-level bar chart
//!
//! Draws one bar per price level with its mean printed on the bar. Bar heights
//! are scaled means, since the chart widget only takes integer values.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use crate::data::{Provider, SearchTerm};
use crate::stats::{AggregateStat, Metric};

/// Multiplier applied to means before they become integer bar heights
const VALUE_SCALE: f64 = 100.0;

/// Narrowest and widest a bar may be drawn
const MIN_BAR_WIDTH: u16 = 5;
const MAX_BAR_WIDTH: u16 = 12;

/// Gap between bars
const BAR_GAP: u16 = 2;

/// Everything needed to draw a chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// Chart title, shown on the border
    pub title: String,
    /// Caption under the bars
    pub x_label: String,
    /// Caption above the bars
    pub y_label: String,
    /// Bar labels and values, left to right
    pub bars: Vec<(String, f64)>,
}

impl ChartSpec {
    /// Builds the chart for one provider's statistics of a search
    pub fn from_stats(
        provider: Provider,
        metric: Metric,
        search: &SearchTerm,
        stats: &[AggregateStat],
    ) -> Self {
        Self {
            title: format!(
                "{}: {} by Price Level ({})",
                provider,
                metric.label(),
                search
            ),
            x_label: "Price Level".to_string(),
            y_label: metric.label().to_string(),
            bars: stats
                .iter()
                .map(|stat| (stat.bucket.clone(), stat.mean))
                .collect(),
        }
    }
}

/// Renders the chart filling the whole frame
pub fn render(frame: &mut Frame, spec: &ChartSpec) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let y_label = Paragraph::new(spec.y_label.as_str())
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(y_label, chunks[0]);

    let chart_area = chunks[1];
    let bars: Vec<Bar> = spec
        .bars
        .iter()
        .map(|(label, value)| {
            Bar::default()
                .value(scaled_value(*value))
                .label(Line::from(label.clone()))
                .text_value(format!("{:.2}", value))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(spec.title.as_str())
                .borders(Borders::ALL),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width(chart_area, spec.bars.len()))
        .bar_gap(BAR_GAP)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(chart, chart_area);

    let x_label = Paragraph::new(spec.x_label.as_str()).alignment(Alignment::Center);
    frame.render_widget(x_label, chunks[2]);

    let footer = Paragraph::new("Press any key to return")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[3]);
}

/// Converts a mean to a bar height
fn scaled_value(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        (value * VALUE_SCALE).round() as u64
    } else {
        0
    }
}

/// Picks a bar width so `count` bars fit inside the bordered area
fn bar_width(area: Rect, count: usize) -> u16 {
    if count == 0 {
        return MIN_BAR_WIDTH;
    }
    let count = count as u16;
    let inner = area.width.saturating_sub(2);
    let gaps = BAR_GAP * count.saturating_sub(1);
    (inner.saturating_sub(gaps) / count).clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH)
}
