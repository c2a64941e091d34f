use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use winmdscope::{
    events::EventListener,
    metadata::{customattributes::CustomAttributeDecoder, typesystem::QualifiedName},
};

use crate::{
    app::GlobalOptions,
    commands::common::{format_architecture, format_string, invalid_argument, load_store},
    output::print_output,
};

#[derive(Debug, Serialize)]
struct FieldEntry {
    name: String,
    constant: Option<String>,
    guid: Option<String>,
    ansi: bool,
    flexible_array: bool,
    documentation: Option<String>,
}

#[derive(Debug, Serialize)]
struct ParamEntry {
    sequence: u16,
    name: String,
    associated_enum: Option<String>,
}

#[derive(Debug, Serialize)]
struct MethodEntry {
    name: String,
    architecture: String,
    constant: Option<String>,
    documentation: Option<String>,
    params: Vec<ParamEntry>,
}

#[derive(Debug, Serialize)]
struct MembersOutput {
    name: String,
    fields: Vec<FieldEntry>,
    methods: Vec<MethodEntry>,
}

pub fn run(
    path: &Path,
    type_name: &str,
    opts: &GlobalOptions,
    listener: &dyn EventListener,
) -> anyhow::Result<()> {
    let Some((namespace, name)) = type_name.rsplit_once('.') else {
        return Err(invalid_argument(
            listener,
            "--type",
            type_name,
            "expected Namespace.Name",
        ));
    };

    let store = load_store(path)?;
    let view = store.view();
    let decoder = CustomAttributeDecoder::new(view)?;

    let row = decoder
        .resolver()
        .find_type_def(&QualifiedName::new(namespace, name))
        .ok_or_else(|| invalid_argument(listener, "--type", type_name, "type not found"))?;

    let mut fields = Vec::new();
    for index in view.type_def_fields(row)? {
        let field = view.field(index)?;
        let name = view.get_string(field.name)?;
        let record = decoder
            .field_attributes(index)
            .with_context(|| format!("failed to decode attributes of field {name}"))?;

        fields.push(FieldEntry {
            name: name.to_string(),
            constant: record.constant.map(|constant| constant.to_string()),
            guid: record.guid.map(|guid| guid.to_string()),
            ansi: record.is_ansi_encoding,
            flexible_array: record.is_flexible_array,
            documentation: format_string(record.documentation_url),
        });
    }

    let mut methods = Vec::new();
    for index in view.type_def_methods(row)? {
        let method = view.method_def(index)?;
        let name = view.get_string(method.name)?;
        let record = decoder
            .method_def_attributes(index)
            .with_context(|| format!("failed to decode attributes of method {name}"))?;

        let mut params = Vec::new();
        for param_index in view.method_def_params(index)? {
            let param = view.param(param_index)?;
            let param_record = decoder
                .param_attributes(param_index)
                .with_context(|| format!("failed to decode attributes of a parameter of {name}"))?;

            params.push(ParamEntry {
                sequence: param.sequence,
                name: view.get_string(param.name)?.to_string(),
                associated_enum: param_record.associated_enum.map(str::to_string),
            });
        }

        methods.push(MethodEntry {
            name: name.to_string(),
            architecture: format_architecture(record.supported_architecture),
            constant: record.constant.map(|constant| constant.to_string()),
            documentation: format_string(record.documentation_url),
            params,
        });
    }

    let output = MembersOutput {
        name: type_name.to_string(),
        fields,
        methods,
    };

    print_output(&output, opts, listener, |out| {
        let mut text = format!("{}\n", out.name);

        if !out.fields.is_empty() {
            text.push_str("\nFields:\n");
        }
        for field in &out.fields {
            text.push_str(&format!("  {}", field.name));
            if let Some(constant) = &field.constant {
                text.push_str(&format!(" = {constant}"));
            }
            if let Some(guid) = &field.guid {
                text.push_str(&format!(" {{{guid}}}"));
            }
            if field.ansi {
                text.push_str(" [ansi]");
            }
            if field.flexible_array {
                text.push_str(" [flexible]");
            }
            text.push('\n');
        }

        if !out.methods.is_empty() {
            text.push_str("\nMethods:\n");
        }
        for method in &out.methods {
            let params = method
                .params
                .iter()
                .map(|param| match &param.associated_enum {
                    Some(associated) => format!("{}: {associated}", param.name),
                    None => param.name.clone(),
                })
                .collect::<Vec<_>>()
                .join(", ");
            text.push_str(&format!("  {}({params}) [{}]", method.name, method.architecture));
            if let Some(constant) = &method.constant {
                text.push_str(&format!(" = {constant}"));
            }
            text.push('\n');
        }
        text
    })
}
