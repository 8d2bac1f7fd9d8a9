//! Standalone HTML report
//!
//! Bundles the scenario inputs, the point rates and the three sweep charts
//! into a single self-contained document.

use crate::output::{format_percent, render_svg, ChartSpec};
use crate::rates::{Market, MarketPair};
use crate::scenario::ScenarioReport;

const STYLE: &str = "body { font-family: sans-serif; margin: 2em auto; max-width: 1240px; color: #222; }
table { border-collapse: collapse; margin: 1em 0; }
th, td { border: 1px solid #ccc; padding: 4px 12px; text-align: right; }
th:first-child, td:first-child { text-align: left; }
section { margin-top: 2em; }";

/// Non-finite values are shown as "n/a"
fn cell(rate: f64) -> String {
    if rate.is_finite() {
        format_percent(rate, 2)
    } else {
        "n/a".to_string()
    }
}

fn rates_table(html: &mut String, caption: &str, pair: &MarketPair) {
    html.push_str(&format!("<h3>{}</h3>\n<table>\n", caption));
    html.push_str("<tr><th>Market</th><th>Lent APR</th><th>Unlent APR</th><th>Total supply APR</th><th>Borrow APR</th></tr>\n");
    for market in Market::ALL {
        let rates = pair.get(market);
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            market,
            cell(rates.lent_apr),
            cell(rates.unlent_apr),
            cell(rates.total_supply_apr()),
            cell(rates.borrow_apr)
        ));
    }
    html.push_str("</table>\n");
}

/// Render the full report as an HTML document
pub fn render_html(report: &ScenarioReport) -> String {
    let c = &report.config;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Fraxlend Market Analysis</title>\n");
    html.push_str(&format!("<style>\n{}\n</style>\n</head>\n<body>\n", STYLE));

    html.push_str("<h1>Fraxlend Market Analysis</h1>\n");
    html.push_str("<p>Lending and borrowing APRs for the frxUSD and sfrxUSD markets. \
        Idle sfrxUSD capital earns the sfrxUSD interest rate; idle frxUSD earns nothing.</p>\n");

    html.push_str("<h2>Scenario</h2>\n<table>\n");
    for (name, value) in [
        ("Utilization rate", format_percent(c.utilization_rate, 2)),
        ("Borrow rate", format_percent(c.borrow_rate, 2)),
        ("sfrxUSD interest rate", format_percent(c.wrapper_yield, 2)),
        ("Max borrow rate", format_percent(c.max_borrow_rate, 0)),
        ("Max lend rate", format_percent(c.max_lend_rate, 0)),
        ("Utilization samples", c.utilization_steps.to_string()),
    ] {
        html.push_str(&format!("<tr><td>{}</td><td>{}</td></tr>\n", name, value));
    }
    html.push_str("</table>\n");

    rates_table(&mut html, "Rates at the configured borrow rate", &report.forward);
    rates_table(
        &mut html,
        &format!(
            "Borrow rates required for a {} lend rate",
            cell(report.forward.base.lent_apr)
        ),
        &report.inverse,
    );

    for table in report.tables() {
        let spec = ChartSpec::for_axis(table.axis, c);
        html.push_str(&format!(
            "<section>\n<h2>APR by {}</h2>\n",
            table.axis.title()
        ));
        html.push_str(&render_svg(table, &spec));
        html.push_str("</section>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}
