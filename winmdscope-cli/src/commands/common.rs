use std::path::Path;

use anyhow::Context;
use winmdscope::{
    events::{Event, EventListener},
    metadata::customattributes::{Architecture, LazyString},
    MetadataStore,
};

/// Load a metadata file, either a PE image or a bare metadata blob.
pub fn load_store(path: &Path) -> anyhow::Result<MetadataStore> {
    MetadataStore::from_file(path)
        .with_context(|| format!("failed to load metadata: {}", path.display()))
}

/// Report a rejected argument to `listener` and return the matching error.
pub fn invalid_argument(
    listener: &dyn EventListener,
    name: &str,
    value: &str,
    reason: &str,
) -> anyhow::Error {
    listener.on_event(&Event::InvalidArgument {
        name: name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    });
    anyhow::anyhow!("invalid value '{value}' for {name}: {reason}")
}

/// `X86|X64|ARM64` style rendering, `all` for the default set.
pub fn format_architecture(architecture: Architecture) -> String {
    if architecture == Architecture::all() {
        return "all".to_string();
    }
    if architecture.is_empty() {
        return "none".to_string();
    }
    let mut names: Vec<String> = architecture
        .iter_names()
        .map(|(name, _)| name.to_string())
        .collect();
    let unknown = architecture.bits() & !Architecture::all().bits();
    if unknown != 0 {
        names.push(format!("{unknown:#x}"));
    }
    names.join("|")
}

pub fn format_string(value: Option<LazyString<'_>>) -> Option<String> {
    value.map(|value| value.to_string())
}
