use std::path::Path;

use crate::engineer::FeatureVector;
use crate::error::FeatureError;

pub const FEATURE_LIST_FILE: &str = "feature_list.txt";

/// Write feature names one per line, newline terminated.
pub fn write_feature_list(path: &Path, names: &[String]) -> Result<(), FeatureError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut contents = names.join("\n");
    contents.push('\n');
    std::fs::write(path, contents)?;
    tracing::info!(path = %path.display(), features = names.len(), "feature list written");
    Ok(())
}

/// Read a feature list, ignoring blank lines and surrounding whitespace.
pub fn read_feature_list(path: &Path) -> Result<Vec<String>, FeatureError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Reorder `features` to `feature_list`, filling absent names with the
/// missing sentinel. Names not in the list are dropped.
pub fn align_features(feature_list: &[String], features: &FeatureVector) -> FeatureVector {
    feature_list
        .iter()
        .map(|name| (name.clone(), features.get(name)))
        .collect()
}
