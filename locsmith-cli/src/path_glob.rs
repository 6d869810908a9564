use std::collections::HashSet;

fn has_glob_meta(s: &str) -> bool {
    s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
}

/// Expand possible glob patterns in a list of input strings into concrete file paths.
///
/// Plain paths are kept as given so that missing files surface as errors later.
/// Matches are returned in pattern order, sorted within each pattern, without
/// duplicates.
pub fn expand_input_globs(inputs: &[String]) -> Result<Vec<String>, String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut results = Vec::new();

    for input in inputs {
        if !has_glob_meta(input) {
            if seen.insert(input.clone()) {
                results.push(input.clone());
            }
            continue;
        }

        let paths = glob::glob(input).map_err(|e| format!("Invalid glob pattern '{}': {}", input, e))?;
        let mut matched: Vec<String> = paths
            .filter_map(Result::ok)
            .filter(|p| p.is_file())
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        if matched.is_empty() {
            return Err(format!("No files match pattern: {}", input));
        }
        matched.sort();
        for path in matched {
            if seen.insert(path.clone()) {
                results.push(path);
            }
        }
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_paths_pass_through() {
        let inputs = vec!["a.xml".to_string(), "b.xml".to_string(), "a.xml".to_string()];
        assert_eq!(expand_input_globs(&inputs).unwrap(), vec!["a.xml", "b.xml"]);
    }

    #[test]
    fn test_glob_expansion() {
        let dir = tempfile::TempDir::new().unwrap();
        for locale in ["values-fr", "values-br", "values"] {
            let path = dir.path().join(locale);
            std::fs::create_dir_all(&path).unwrap();
            std::fs::write(path.join("strings.xml"), "<resources/>").unwrap();
        }
        let pattern = format!("{}/values-*/strings.xml", dir.path().display());
        let expanded = expand_input_globs(&[pattern]).unwrap();
        assert_eq!(expanded.len(), 2);
        assert!(expanded[0].contains("values-br"));
        assert!(expanded[1].contains("values-fr"));
    }

    #[test]
    fn test_pattern_without_matches_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let pattern = format!("{}/*.xml", dir.path().display());
        assert!(expand_input_globs(&[pattern]).is_err());
    }
}
