use mangoscan_types::{DiagnosisError, DiagnosisResult};
use std::path::Path;

/// One label per line; surrounding whitespace and blank lines are dropped.
pub fn parse_class_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn read_class_list(path: &Path) -> DiagnosisResult<Vec<String>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        DiagnosisError::model_unavailable(format!(
            "could not read class list {}: {}",
            path.display(),
            e
        ))
    })?;

    let classes = parse_class_list(&contents);
    if classes.is_empty() {
        return Err(DiagnosisError::model_unavailable(format!(
            "class list {} is empty",
            path.display()
        )));
    }
    Ok(classes)
}
