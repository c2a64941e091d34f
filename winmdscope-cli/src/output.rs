use std::path::Path;

use anyhow::Context;
use comfy_table::{presets, CellAlignment, ContentArrangement, Table};
use serde::Serialize;
use winmdscope::events::{Event, EventListener};

use crate::app::GlobalOptions;

/// Render `data` as JSON (if `--json`) or with `render`, then print it or write it to
/// `--output`.
pub fn print_output<T: Serialize>(
    data: &T,
    opts: &GlobalOptions,
    listener: &dyn EventListener,
    render: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    let text = if opts.json {
        serde_json::to_string_pretty(data)? + "\n"
    } else {
        render(data)
    };

    match &opts.output {
        Some(path) => write_file(path, &text, listener),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

/// Write `text` to `path`, creating the parent directories first.
fn write_file(path: &Path, text: &str, listener: &dyn EventListener) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        if !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
            listener.on_event(&Event::DirectoryCreated {
                path: parent.to_path_buf(),
            });
        }
    }

    std::fs::write(path, text)
        .with_context(|| format!("failed to write output: {}", path.display()))?;
    listener.on_event(&Event::SourceFileGenerated {
        path: path.to_path_buf(),
    });
    Ok(())
}

/// Column alignment for tabular output.
#[derive(Clone, Copy)]
pub enum Align {
    Left,
    Right,
}

/// Whitespace-aligned columns backed by `comfy-table`.
pub struct TabWriter {
    table: Table,
}

impl TabWriter {
    /// Create a writer with `(header, alignment)` columns.
    pub fn new(columns: &[(&str, Align)]) -> Self {
        let mut table = Table::new();
        table
            .load_preset(presets::NOTHING)
            .set_content_arrangement(ContentArrangement::Disabled)
            .set_header(columns.iter().map(|(name, _)| *name));

        let last = columns.len().saturating_sub(1);
        for (index, (_, align)) in columns.iter().enumerate() {
            if let Some(column) = table.column_mut(index) {
                column.set_cell_alignment(match align {
                    Align::Left => CellAlignment::Left,
                    Align::Right => CellAlignment::Right,
                });
                column.set_padding((u16::from(index != 0), u16::from(index != last)));
            }
        }

        Self { table }
    }

    /// Add a row, values in column order.
    pub fn row(&mut self, values: Vec<String>) {
        self.table.add_row(values);
    }

    /// The table with trailing whitespace removed from every line.
    pub fn render(&self) -> String {
        let mut text = String::new();
        for line in self.table.to_string().lines() {
            text.push_str(line.trim_end());
            text.push('\n');
        }
        text
    }
}
