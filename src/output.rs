use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, CellAlignment, ContentArrangement, Table};
use serde::Serialize;

use llmcost::cost::COST_DECIMALS;
use llmcost::{Comparison, Quote};

use crate::cli::OutputFormat;

pub fn format_cost(cost: f64) -> String {
    format!("${:.*}", COST_DECIMALS, cost)
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn quote_summary(q: &Quote) -> String {
    format!(
        "The total cost for 1 query with {} tokens when using {} in {} is {}",
        q.total_tokens(),
        q.model,
        q.provider,
        format_cost(q.total_cost)
    )
}

pub fn cheapest_summary(cmp: &Comparison) -> String {
    let best = cmp.cheapest();
    format!(
        "From your selection, the most cost-effective model is {} in {} with cost for 1 query: {}",
        best.model,
        best.provider,
        format_cost(best.total_cost)
    )
}

fn quote_details(q: &Quote) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Item", "Value"]);
    table.add_row(vec![
        Cell::new("Input rate / 1K tokens"),
        Cell::new(format_cost(q.rate.input_per_thousand())).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Output rate / 1K tokens"),
        Cell::new(format_cost(q.rate.output_per_thousand())).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new(format!("Input cost ({} tokens)", q.input_tokens)),
        Cell::new(format_cost(q.input_cost)).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new(format!("Output cost ({} tokens)", q.output_tokens)),
        Cell::new(format_cost(q.output_cost)).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Total cost"),
        Cell::new(format_cost(q.total_cost)).set_alignment(CellAlignment::Right),
    ]);
    table
}

const COMPARISON_HEADER: &[&str] = &[
    "",
    "Provider",
    "Model",
    "Input Tokens",
    "Output Tokens",
    "Input Rate /1K",
    "Output Rate /1K",
    "Input Cost",
    "Output Cost",
    "Total Cost",
];

fn comparison_details(cmp: &Comparison) -> Table {
    let mut table = new_table();
    table.set_header(COMPARISON_HEADER.iter().map(|h| Cell::new(*h)));

    for (i, q) in cmp.quotes().iter().enumerate() {
        let marker = if i == cmp.cheapest_index() { "*" } else { "" };
        table.add_row(vec![
            Cell::new(marker),
            Cell::new(&q.provider),
            Cell::new(&q.model),
            Cell::new(q.input_tokens),
            Cell::new(q.output_tokens),
            Cell::new(format_cost(q.rate.input_per_thousand())),
            Cell::new(format_cost(q.rate.output_per_thousand())),
            Cell::new(format_cost(q.input_cost)),
            Cell::new(format_cost(q.output_cost)),
            Cell::new(format_cost(q.total_cost)),
        ]);
    }
    table
}

pub fn render_quote(q: &Quote, details: bool, format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return to_json(q);
    }
    let mut out = quote_summary(q);
    if details {
        out.push('\n');
        out.push_str(&quote_details(q).to_string());
    }
    Ok(out)
}

pub fn render_comparison(
    cmp: &Comparison,
    details: bool,
    format: OutputFormat,
) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return to_json(cmp);
    }
    if cmp.quotes().len() == 1 {
        return render_quote(cmp.cheapest(), details, format);
    }
    let mut out = cheapest_summary(cmp);
    if details {
        out.push('\n');
        out.push_str(&comparison_details(cmp).to_string());
    }
    Ok(out)
}

pub fn render_list(title: &str, items: &[&str], format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return to_json(&items);
    }
    let mut table = new_table();
    table.set_header(vec![title]);
    for item in items {
        table.add_row(vec![*item]);
    }
    Ok(table.to_string())
}
