use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable value. Tables show `columns` in that order when
/// given, every field sorted by name otherwise.
pub fn render<T: Serialize>(
    value: &T,
    format: OutputFormat,
    columns: Option<&[&str]>,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
        OutputFormat::Table => render_table(&serde_json::to_value(value)?, columns),
    }
}

/// Print a single value.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render(value, format, None)?);
    Ok(())
}

/// Print a list with chosen table columns.
pub fn output_list<T: Serialize>(
    items: &[T],
    columns: &[&str],
    format: OutputFormat,
) -> anyhow::Result<()> {
    println!("{}", render(&items, format, Some(columns))?);
    Ok(())
}

fn options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table(value: &Value, columns: Option<&[&str]>) -> anyhow::Result<String> {
    match value {
        Value::Array(items) => Ok(render_array(items, columns)),
        Value::Object(map) => {
            let rows = map
                .iter()
                .map(|(key, value)| vec![key.clone(), cell(value)])
                .collect::<Vec<_>>();
            Ok(table::render_rows(&["key", "value"], &rows, options()))
        }
        scalar => Ok(cell(scalar)),
    }
}

fn render_array(items: &[Value], columns: Option<&[&str]>) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }
    if !items.iter().all(Value::is_object) {
        let rows = items.iter().map(|item| vec![cell(item)]).collect::<Vec<_>>();
        return table::render_rows(&["value"], &rows, options());
    }

    let headers: Vec<String> = match columns {
        Some(columns) => columns.iter().map(|c| (*c).to_string()).collect(),
        None => {
            let mut keys: Vec<String> = items
                .iter()
                .filter_map(Value::as_object)
                .flat_map(|map| map.keys().cloned())
                .collect();
            keys.sort();
            keys.dedup();
            keys
        }
    };
    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|h| map.get(h).map_or_else(|| String::from("-"), cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    table::render_rows(&header_refs, &rows, options())
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        Value::Array(items) => items.iter().map(cell).collect::<Vec<_>>().join(", "),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}
