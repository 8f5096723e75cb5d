//! Subject rotation order.
//!
//! The canonical sequence alternates cognitive load so that one pick after a
//! heavy subject lands on a different subject. Subjects outside the
//! canonical set are appended once each, in first-seen order.

/// Two heavy subjects, two language subjects, one medium subject.
pub const CANONICAL_ROTATION: [&str; 5] = ["Math", "Physics", "English", "Chinese", "Chemistry"];

/// Builds the rotation for one run from subjects in first-seen input order.
///
/// Canonical entries are always present, even when the input has no items
/// for them. Duplicates in `subjects` are ignored.
pub fn build_rotation<'a>(subjects: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut rotation = CANONICAL_ROTATION
        .iter()
        .map(|subject| subject.to_string())
        .collect::<Vec<_>>();
    for subject in subjects {
        if !rotation.iter().any(|known| known == subject) {
            rotation.push(subject.to_string());
        }
    }
    rotation
}

#[cfg(test)]
mod tests {
    use super::{build_rotation, CANONICAL_ROTATION};

    #[test]
    fn canonical_entries_come_first_even_when_absent() {
        let rotation = build_rotation(std::iter::empty());
        assert_eq!(rotation, CANONICAL_ROTATION);
    }

    #[test]
    fn unknown_subjects_append_once_in_first_seen_order() {
        let rotation = build_rotation(["History", "Math", "Biology", "History"]);
        assert_eq!(rotation.len(), CANONICAL_ROTATION.len() + 2);
        assert_eq!(&rotation[..5], CANONICAL_ROTATION);
        assert_eq!(&rotation[5..], ["History", "Biology"]);
    }
}
