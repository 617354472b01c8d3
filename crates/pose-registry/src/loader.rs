use crate::PoseSource;
use pose_core::{convert, PoseDefinition, Result};

/// Fetch and parse one pose document. The definition is returned, not saved.
pub async fn load_from_source(source: &dyn PoseSource, locator: &str) -> Result<PoseDefinition> {
    let text = source.fetch_text(locator).await?;
    let doc = convert::parse_document(&text)?;
    let name = doc
        .name
        .unwrap_or_else(|| display_name_from_locator(locator));
    let description = doc.description.unwrap_or_else(|| format!("{name} pose"));
    tracing::info!(locator = %locator, name = %name, joints = doc.pose.len(), "loaded pose");
    Ok(PoseDefinition {
        name,
        description,
        pose: doc.pose,
    })
}

/// Load every `.json` entry listed by the manifest at `locator`, handing each
/// definition to `sink` as soon as it parses. Fails fast on the first error.
pub async fn load_many_from_source<F>(
    source: &dyn PoseSource,
    locator: &str,
    mut sink: F,
) -> Result<usize>
where
    F: FnMut(PoseDefinition),
{
    let entries = source.fetch_manifest(locator).await?;
    let mut loaded = 0;
    for entry in entries.iter().filter(|e| e.ends_with(".json")) {
        let def = load_from_source(source, &source.entry_locator(locator, entry)).await?;
        sink(def);
        loaded += 1;
    }
    tracing::info!(locator = %locator, loaded, listed = entries.len(), "loaded pose manifest");
    Ok(loaded)
}

/// Display name for a file: base name without `.json`, camelCase split into
/// words, first letter capitalized (`doublePiece.json` -> `Double Piece`).
pub fn display_name_from_locator(locator: &str) -> String {
    let path = locator.split(['?', '#']).next().unwrap_or(locator);
    let base = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let stem = base.strip_suffix(".json").unwrap_or(base);

    let mut spaced = String::with_capacity(stem.len() + 4);
    for c in stem.chars() {
        if c.is_ascii_uppercase() {
            spaced.push(' ');
        }
        spaced.push(c);
    }
    let mut chars = spaced.trim().chars();
    let name: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    if name.is_empty() {
        "unknown".to_string()
    } else {
        name
    }
}
