use std::path::Path;

use serde::Serialize;
use strum::IntoEnumIterator;
use winmdscope::{events::EventListener, metadata::tables::TableId};

use crate::{
    app::GlobalOptions,
    commands::common::{invalid_argument, load_store},
    output::{print_output, Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct TableEntry {
    id: String,
    table: String,
    rows: u32,
    sorted: bool,
}

#[derive(Debug, Serialize)]
struct TablesOutput {
    version: String,
    streams: Vec<String>,
    tables: Vec<TableEntry>,
}

pub fn run(
    path: &Path,
    table: Option<&str>,
    opts: &GlobalOptions,
    listener: &dyn EventListener,
) -> anyhow::Result<()> {
    let filter = match table {
        Some(name) => Some(
            TableId::iter()
                .find(|id| id.to_string().eq_ignore_ascii_case(name))
                .ok_or_else(|| invalid_argument(listener, "--table", name, "unknown table"))?,
        ),
        None => None,
    };

    let store = load_store(path)?;
    let view = store.view();

    let tables = view
        .tables()
        .summaries()
        .filter(|(id, _)| filter.map_or(true, |wanted| wanted == *id))
        .map(|(id, rows)| TableEntry {
            id: format!("{:#04x}", id as u8),
            table: id.to_string(),
            rows,
            sorted: view.tables().is_sorted(id),
        })
        .collect();

    let output = TablesOutput {
        version: view.root().version.clone(),
        streams: view
            .root()
            .stream_headers
            .iter()
            .map(|stream| stream.name.clone())
            .collect(),
        tables,
    };

    print_output(&output, opts, listener, |out| {
        let mut text = format!(
            "Metadata version {} with streams {}\n\n",
            out.version,
            out.streams.join(", ")
        );

        let mut tw = TabWriter::new(&[
            ("Id", Align::Left),
            ("Table", Align::Left),
            ("Rows", Align::Right),
            ("Sorted", Align::Left),
        ]);
        for entry in &out.tables {
            tw.row(vec![
                entry.id.clone(),
                entry.table.clone(),
                entry.rows.to_string(),
                if entry.sorted { "yes" } else { "" }.to_string(),
            ]);
        }
        text.push_str(&tw.render());
        text
    })
}
