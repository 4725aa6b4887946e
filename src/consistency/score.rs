//! Weighted quality score

use crate::schema::{SpecFile, TestDeclaration};

const ID_POINTS: u64 = 20;
const TAG_POINTS: u64 = 10;
const MARKER_POINTS: u64 = 20;
const ACTIVE_POINTS: u64 = 10;

/// Best possible points for one declaration
pub const MAX_POINTS: u64 = ID_POINTS + TAG_POINTS + 3 * MARKER_POINTS + ACTIVE_POINTS;

/// Points earned by one declaration, out of [`MAX_POINTS`]
pub fn declaration_points(decl: &TestDeclaration) -> u64 {
    let earned = [
        (decl.spec_id.is_some(), ID_POINTS),
        (decl.tag.is_some(), TAG_POINTS),
        (decl.has_given, MARKER_POINTS),
        (decl.has_when, MARKER_POINTS),
        (decl.has_then, MARKER_POINTS),
        (!decl.is_pending, ACTIVE_POINTS),
    ];
    earned
        .iter()
        .filter(|(ok, _)| *ok)
        .map(|(_, points)| points)
        .sum()
}

/// Percentage of available points earned across all declarations, rounded
/// half-up. A tree with no declarations scores 100.
pub fn quality_score(files: &[SpecFile]) -> u8 {
    let (earned, count) = files
        .iter()
        .flat_map(|f| f.declarations.iter())
        .fold((0u64, 0u64), |(earned, count), decl| {
            (earned + declaration_points(decl), count + 1)
        });

    if count == 0 {
        return 100;
    }

    let available = MAX_POINTS * count;
    let percent = (earned * 100 + available / 2) / available;
    percent.min(100) as u8
}
