use serde::Deserialize;

use spicecrab::{ErrorKind, Spices};

// ---------------------------------------------------------------------------
// 1. Validation verdicts
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ValidationEntry {
    spices: String,
    error: Option<String>,
    pos: Option<usize>,
}

#[test]
fn approval_validation() {
    let data: Vec<ValidationEntry> =
        serde_json::from_str(include_str!("approval_data/validation.json")).unwrap();

    let mut failures = Vec::new();
    for entry in &data {
        let s = Spices::parse(&entry.spices);
        let expected = entry
            .error
            .as_deref()
            .map(|key| {
                ErrorKind::from_message_key(key).unwrap_or_else(|| panic!("unknown key {key}"))
            });
        let actual = s.error().map(|e| e.kind);
        if actual != expected {
            failures.push(format!(
                "[validation] {}: expected {:?}, got {:?}",
                entry.spices, expected, actual
            ));
            continue;
        }
        if let (Some(pos), Some(err)) = (entry.pos, s.error()) {
            if err.pos != pos {
                failures.push(format!(
                    "[position] {}: expected {pos}, got {}",
                    entry.spices, err.pos
                ));
            }
        }
    }

    assert!(failures.is_empty(), "{}", failures.join("\n"));
}

// ---------------------------------------------------------------------------
// 2. Graph counts
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct CountEntry {
    spices: String,
    parts: usize,
    particles: usize,
    bonds: usize,
    distinct: usize,
    max_degree: usize,
}

#[test]
fn approval_counts() {
    let data: Vec<CountEntry> =
        serde_json::from_str(include_str!("approval_data/counts.json")).unwrap();

    let mut failures = Vec::new();
    for entry in &data {
        let s = Spices::parse(&entry.spices);
        if let Some(err) = s.error() {
            failures.push(format!("[parse] {}: {err}", entry.spices));
            continue;
        }

        let bonds: usize = s.graphs().iter().map(|g| g.bond_count()).sum();
        let actual = (
            s.part_count(),
            s.total_particles(),
            bonds,
            s.distinct_particles(),
            s.max_degree(),
        );
        let expected = (
            entry.parts,
            entry.particles,
            entry.bonds,
            entry.distinct,
            entry.max_degree,
        );
        if actual != expected {
            failures.push(format!(
                "[counts] {}: expected {expected:?}, got {actual:?}",
                entry.spices
            ));
        }
    }

    assert!(failures.is_empty(), "{}", failures.join("\n"));
}
