//! Static probability chart for the CLI demo.
//!
//! Renders a horizontal bar per market (green for YES >= 50c, red below)
//! into a self-contained SVG file in the working directory. The chart is
//! presentation glue over plain [`Market`] records; swapping in another
//! renderer only requires consuming the same data.

use std::io::Write;
use std::path::Path;

use crate::client::Market;

/// Default chart file name, written to the working directory.
pub const CHART_FILE: &str = "market_probabilities.svg";

/// Maximum characters of a market title shown on the chart axis.
const TITLE_CHARS: usize = 40;

const BAR_HEIGHT: u32 = 22;
const BAR_GAP: u32 = 10;
const LABEL_WIDTH: u32 = 340;
/// Pixels per cent of probability.
const SCALE: u32 = 4;
const MARGIN: u32 = 20;

/// Truncate a title for axis display, appending an ellipsis when cut.
pub fn truncate_title(title: &str, max_chars: usize) -> String {
    if title.chars().count() <= max_chars {
        title.to_string()
    } else {
        let cut: String = title.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Render a horizontal probability bar chart for the given markets.
pub fn probability_chart(markets: &[Market]) -> String {
    let rows = markets.len() as u32;
    let width = MARGIN * 2 + LABEL_WIDTH + 100 * SCALE + 60;
    let height = MARGIN * 2 + 30 + rows * (BAR_HEIGHT + BAR_GAP);

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
         font-family=\"sans-serif\" font-size=\"12\">\n"
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" font-size=\"16\" font-weight=\"bold\">\
         Kalshi Market Probabilities</text>\n",
        MARGIN,
        MARGIN + 4
    ));

    for (i, market) in markets.iter().enumerate() {
        let prob = market.yes_price.min(100);
        let y = MARGIN + 30 + i as u32 * (BAR_HEIGHT + BAR_GAP);
        let bar_x = MARGIN + LABEL_WIDTH;
        let bar_w = prob * SCALE;
        let color = if prob >= 50 { "#2e9e4f" } else { "#cc3a3a" };
        let title = escape_xml(&truncate_title(&market.title, TITLE_CHARS));

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" text-anchor=\"end\">{}</text>\n",
            bar_x - 8,
            y + BAR_HEIGHT / 2 + 4,
            title
        ));
        svg.push_str(&format!(
            "  <rect x=\"{bar_x}\" y=\"{y}\" width=\"{bar_w}\" height=\"{BAR_HEIGHT}\" \
             fill=\"{color}\"/>\n"
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\">{prob}%</text>\n",
            bar_x + bar_w + 6,
            y + BAR_HEIGHT / 2 + 4
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Render and write the chart to `path`.
pub fn write_probability_chart(markets: &[Market], path: &Path) -> crate::error::Result<()> {
    let svg = probability_chart(markets);
    let mut file = std::fs::File::create(path)?;
    file.write_all(svg.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MarketStatus;

    fn market(title: &str, yes_price: u32) -> Market {
        Market {
            ticker: "T".to_string(),
            title: title.to_string(),
            yes_price,
            no_price: 100 - yes_price,
            volume: 0,
            status: MarketStatus::Open,
        }
    }

    #[test]
    fn one_bar_per_market() {
        let markets = vec![market("A", 10), market("B", 60), market("C", 90)];
        let svg = probability_chart(&markets);
        assert_eq!(svg.matches("<rect").count(), 3);
    }

    #[test]
    fn bars_are_colored_by_probability() {
        let svg = probability_chart(&[market("low", 30), market("high", 70)]);
        assert!(svg.contains("#cc3a3a"));
        assert!(svg.contains("#2e9e4f"));
    }

    #[test]
    fn long_titles_are_truncated() {
        let long = "x".repeat(60);
        let svg = probability_chart(&[market(&long, 50)]);
        assert!(svg.contains(&format!("{}...", "x".repeat(40))));
        assert!(!svg.contains(&long));
    }

    #[test]
    fn titles_are_xml_escaped() {
        let svg = probability_chart(&[market("Will A < B & C?", 50)]);
        assert!(svg.contains("Will A &lt; B &amp; C?"));
    }

    #[test]
    fn truncate_keeps_short_titles_intact() {
        assert_eq!(truncate_title("short", 40), "short");
    }

    #[test]
    fn chart_file_round_trips_to_disk() {
        let dir = std::env::temp_dir().join("kalshi-chart-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CHART_FILE);

        write_probability_chart(&[market("A", 63)], &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("<svg"));
        assert!(contents.contains("63%"));

        std::fs::remove_file(&path).ok();
    }
}
