//! Field-level validation rules for video records.
//!
//! These run before any artifact work begins; a record that fails here
//! never reaches the generation pipeline.

use crate::error::CoreError;
use crate::identity;
use crate::infohash;

/// Display name length bounds.
pub const NAME_MIN: usize = 3;
pub const NAME_MAX: usize = 120;

/// Description length bounds (description itself is optional).
pub const DESCRIPTION_MIN: usize = 3;
pub const DESCRIPTION_MAX: usize = 250;

/// Duration bounds in seconds (two hours max).
pub const DURATION_MIN: i64 = 1;
pub const DURATION_MAX: i64 = 7200;

/// Tag count and length bounds.
pub const TAGS_MAX: usize = 3;
pub const TAG_MIN: usize = 2;
pub const TAG_MAX: usize = 10;

pub fn validate_name(name: &str) -> Result<(), CoreError> {
    let len = name.chars().count();
    if (NAME_MIN..=NAME_MAX).contains(&len) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Video name must be {NAME_MIN}-{NAME_MAX} characters, got {len}"
        )))
    }
}

pub fn validate_description(description: Option<&str>) -> Result<(), CoreError> {
    match description {
        None => Ok(()),
        Some(d) => {
            let len = d.chars().count();
            if (DESCRIPTION_MIN..=DESCRIPTION_MAX).contains(&len) {
                Ok(())
            } else {
                Err(CoreError::Validation(format!(
                    "Video description must be {DESCRIPTION_MIN}-{DESCRIPTION_MAX} characters, got {len}"
                )))
            }
        }
    }
}

pub fn validate_duration(duration: i64) -> Result<(), CoreError> {
    if (DURATION_MIN..=DURATION_MAX).contains(&duration) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Video duration must be {DURATION_MIN}-{DURATION_MAX} seconds, got {duration}"
        )))
    }
}

pub fn validate_tags(tags: &[String]) -> Result<(), CoreError> {
    if tags.len() > TAGS_MAX {
        return Err(CoreError::Validation(format!(
            "At most {TAGS_MAX} tags allowed, got {}",
            tags.len()
        )));
    }
    for tag in tags {
        let len = tag.chars().count();
        if !(TAG_MIN..=TAG_MAX).contains(&len) {
            return Err(CoreError::Validation(format!(
                "Tag '{tag}' must be {TAG_MIN}-{TAG_MAX} characters"
            )));
        }
    }
    Ok(())
}

/// Validate the whole record in one pass. The info-hash check accepts
/// the placeholder (well-formed by construction); the pipeline swaps it
/// for the real hash before the record becomes externally visible.
pub fn validate_record(
    name: &str,
    description: Option<&str>,
    extname: &str,
    info_hash: &str,
    duration: i64,
    tags: &[String],
) -> Result<(), CoreError> {
    validate_name(name)?;
    validate_description(description)?;
    identity::validate_extname(extname)?;
    infohash::validate(info_hash)?;
    validate_duration(duration)?;
    validate_tags(tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infohash::INFO_HASH_PLACEHOLDER;

    #[test]
    fn name_bounds() {
        assert!(validate_name("ab").is_err());
        assert!(validate_name("abc").is_ok());
        assert!(validate_name(&"x".repeat(120)).is_ok());
        assert!(validate_name(&"x".repeat(121)).is_err());
    }

    #[test]
    fn description_is_optional() {
        assert!(validate_description(None).is_ok());
        assert!(validate_description(Some("ok desc")).is_ok());
        assert!(validate_description(Some("ab")).is_err());
        assert!(validate_description(Some(&"x".repeat(251))).is_err());
    }

    #[test]
    fn duration_bounds() {
        assert!(validate_duration(0).is_err());
        assert!(validate_duration(1).is_ok());
        assert!(validate_duration(7200).is_ok());
        assert!(validate_duration(7201).is_err());
    }

    #[test]
    fn tag_bounds() {
        assert!(validate_tags(&[]).is_ok());
        assert!(validate_tags(&["rock".into(), "live".into()]).is_ok());
        assert!(validate_tags(&["a".into()]).is_err());
        assert!(validate_tags(&["waytoolongtag".into()]).is_err());
        let too_many: Vec<String> = (0..4).map(|i| format!("tag{i}")).collect();
        assert!(validate_tags(&too_many).is_err());
    }

    #[test]
    fn full_record_with_placeholder_hash_passes() {
        assert!(validate_record(
            "Demo",
            None,
            ".mp4",
            INFO_HASH_PLACEHOLDER,
            120,
            &["demo".into()],
        )
        .is_ok());
    }

    #[test]
    fn full_record_rejects_bad_extname() {
        assert!(validate_record("Demo", None, ".avi", INFO_HASH_PLACEHOLDER, 120, &[]).is_err());
    }
}
