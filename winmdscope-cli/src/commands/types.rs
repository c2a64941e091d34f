use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use winmdscope::{
    events::EventListener,
    metadata::{customattributes::CustomAttributeDecoder, tables::TableId},
};

use crate::{
    app::GlobalOptions,
    commands::common::{format_architecture, format_string, invalid_argument, load_store},
    output::{print_output, Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct TypeEntry {
    row: u32,
    name: String,
    architecture: String,
    guid: Option<String>,
    flags: bool,
    typedef: bool,
    struct_size_field: Option<String>,
    documentation: Option<String>,
}

#[derive(Debug, Serialize)]
struct TypesOutput {
    types: Vec<TypeEntry>,
    count: usize,
}

pub fn run(
    path: &Path,
    namespace: Option<&str>,
    opts: &GlobalOptions,
    listener: &dyn EventListener,
) -> anyhow::Result<()> {
    let store = load_store(path)?;
    let view = store.view();
    let decoder = CustomAttributeDecoder::new(view)?;

    let mut entries = Vec::new();
    for row in 0..view.row_count(TableId::TypeDef) {
        let name = view.type_def_name(row)?;
        if namespace.is_some_and(|wanted| name.namespace != wanted) {
            continue;
        }

        let record = decoder
            .type_def_attributes(row)
            .with_context(|| format!("failed to decode attributes of {name}"))?;

        entries.push(TypeEntry {
            row,
            name: name.to_string(),
            architecture: format_architecture(record.supported_architecture),
            guid: record.guid.map(|guid| guid.to_string()),
            flags: record.is_enum_flags,
            typedef: record.is_typedef,
            struct_size_field: record.struct_size_field.map(str::to_string),
            documentation: format_string(record.documentation_url),
        });
    }

    if let (Some(wanted), true) = (namespace, entries.is_empty()) {
        return Err(invalid_argument(
            listener,
            "--namespace",
            wanted,
            "no types in this namespace",
        ));
    }

    let count = entries.len();
    let output = TypesOutput {
        types: entries,
        count,
    };

    print_output(&output, opts, listener, |out| {
        let mut tw = TabWriter::new(&[
            ("Row", Align::Right),
            ("Name", Align::Left),
            ("Arch", Align::Left),
            ("Traits", Align::Left),
            ("Guid", Align::Left),
        ]);
        for entry in &out.types {
            let mut traits = Vec::new();
            if entry.flags {
                traits.push("flags".to_string());
            }
            if entry.typedef {
                traits.push("typedef".to_string());
            }
            if let Some(field) = &entry.struct_size_field {
                traits.push(format!("size={field}"));
            }

            tw.row(vec![
                entry.row.to_string(),
                entry.name.clone(),
                entry.architecture.clone(),
                traits.join(","),
                entry.guid.clone().unwrap_or_default(),
            ]);
        }
        format!("{}\n{} type(s) listed.\n", tw.render(), out.count)
    })
}
