//! Spec identifier uniqueness across files

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::schema::{Issue, IssueCode, SpecFile};

/// Where an identifier was declared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecLocation {
    pub file: String,
    pub line: usize,
    pub title: String,
}

impl std::fmt::Display for SpecLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// An identifier declared more than once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateSpecId {
    pub spec_id: String,
    /// At least two entries, in file then line order
    pub locations: Vec<SpecLocation>,
}

/// Every identifier mapped to all of its declarations
pub fn index_spec_ids(files: &[SpecFile]) -> BTreeMap<String, Vec<SpecLocation>> {
    files
        .iter()
        .flat_map(|file| {
            file.declarations.iter().filter_map(move |decl| {
                let id = decl.spec_id.clone()?;
                Some((
                    id,
                    SpecLocation {
                        file: file.path.clone(),
                        line: decl.line_number,
                        title: decl.raw_title.clone(),
                    },
                ))
            })
        })
        .fold(BTreeMap::new(), |mut index, (id, location)| {
            index.entry(id).or_insert_with(Vec::new).push(location);
            index
        })
}

/// Identifiers with two or more declarations, sorted by identifier
pub fn find_duplicates(files: &[SpecFile]) -> Vec<DuplicateSpecId> {
    index_spec_ids(files)
        .into_iter()
        .filter(|(_, locations)| locations.len() > 1)
        .map(|(spec_id, mut locations)| {
            locations.sort_by(|a, b| a.file.cmp(&b.file).then(a.line.cmp(&b.line)));
            DuplicateSpecId { spec_id, locations }
        })
        .collect()
}

/// Add a `DUPLICATE_SPEC_ID` issue at every location of every duplicate
pub fn attach_duplicate_issues(files: &mut [SpecFile], duplicates: &[DuplicateSpecId]) {
    let by_path: HashMap<String, usize> = files
        .iter()
        .enumerate()
        .map(|(idx, file)| (file.path.clone(), idx))
        .collect();

    for dup in duplicates {
        for (pos, location) in dup.locations.iter().enumerate() {
            let Some(&idx) = by_path.get(&location.file) else {
                continue;
            };
            let others: Vec<String> = dup
                .locations
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != pos)
                .map(|(_, loc)| loc.to_string())
                .collect();
            files[idx].issues.push(
                Issue::new(
                    IssueCode::DuplicateSpecId,
                    format!(
                        "Spec ID {} is also declared at {}",
                        dup.spec_id,
                        others.join(", ")
                    ),
                )
                .at_line(location.line),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::FileAggregator;

    fn file(path: &str, source: &str) -> SpecFile {
        FileAggregator::default().analyze_source(path, source)
    }

    #[test]
    fn test_same_id_in_two_files_is_one_group() {
        let mut files = vec![
            file("a.spec.ts", "test('API-X-001: creates a record', { tag: '@spec' }, () => {})"),
            file(
                "b.spec.ts",
                "\n\ntest('API-X-001: deletes a record', { tag: '@spec' }, () => {})",
            ),
        ];
        let dups = find_duplicates(&files);
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].spec_id, "API-X-001");
        let where_: Vec<String> = dups[0].locations.iter().map(|l| l.to_string()).collect();
        assert_eq!(where_, vec!["a.spec.ts:1", "b.spec.ts:3"]);

        attach_duplicate_issues(&mut files, &dups);
        for f in &files {
            let dup_issues: Vec<_> = f
                .issues
                .iter()
                .filter(|i| i.code == IssueCode::DuplicateSpecId)
                .collect();
            assert_eq!(dup_issues.len(), 1);
        }
        assert!(files[0].issues.iter().any(|i| i.message.contains("b.spec.ts:3")));
        assert!(files[1].issues.iter().any(|i| i.message.contains("a.spec.ts:1")));
    }

    #[test]
    fn test_unique_ids_produce_nothing() {
        let files = vec![
            file("a.spec.ts", "test('API-X-001: one', () => {})"),
            file("b.spec.ts", "test('API-X-002: two', () => {})"),
        ];
        assert!(find_duplicates(&files).is_empty());
        assert_eq!(index_spec_ids(&files).len(), 2);
    }

    #[test]
    fn test_duplicate_within_one_file() {
        let files = vec![file(
            "a.spec.ts",
            "test('API-X-001: one', () => {})\ntest('API-X-001: again', () => {})",
        )];
        let dups = find_duplicates(&files);
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].locations.len(), 2);
    }

    #[test]
    fn test_detection_is_order_independent() {
        let a = file("a.spec.ts", "test('API-X-001: one', () => {})");
        let b = file("b.spec.ts", "test('API-X-001: two', () => {})");
        let forward = find_duplicates(&[a.clone(), b.clone()]);
        let backward = find_duplicates(&[b, a]);
        assert_eq!(forward, backward);
    }
}
