use aide_core::assets::UploadedAsset;
use aide_core::error::ValidationError;
use aide_core::validate::{
    validate_asset, validate_text, IMAGE_TYPES, MAX_IMAGE_BYTES, VIDEO_TYPES,
};

fn asset(mime_type: &str, size_bytes: u64) -> UploadedAsset {
    UploadedAsset {
        mime_type: mime_type.to_string(),
        size_bytes,
        bytes: Vec::new(),
        file_name: Some("upload".to_string()),
    }
}

#[test]
fn test_whitespace_only_text_is_empty() {
    assert_eq!(validate_text("   ", 1000), Err(ValidationError::EmptyInput));
    assert_eq!(validate_text("", 1000), Err(ValidationError::EmptyInput));
    assert_eq!(validate_text("\n\t ", 1000), Err(ValidationError::EmptyInput));
}

#[test]
fn test_text_over_the_limit_is_rejected() {
    let input = "a".repeat(1001);
    assert_eq!(
        validate_text(&input, 1000),
        Err(ValidationError::TooLong {
            length: 1001,
            max: 1000
        })
    );
}

#[test]
fn test_text_is_trimmed_on_success() {
    assert_eq!(validate_text("  hi  ", 1000), Ok("hi".to_string()));
}

#[test]
fn test_text_exactly_at_the_limit_passes() {
    let input = "b".repeat(1000);
    assert_eq!(validate_text(&input, 1000), Ok(input));
}

#[test]
fn test_trimming_happens_before_the_length_check() {
    // 1000 meaningful characters padded by whitespace still pass.
    let input = format!("   {}   ", "c".repeat(1000));
    assert_eq!(validate_text(&input, 1000), Ok("c".repeat(1000)));
}

#[test]
fn test_oversized_asset_is_rejected_regardless_of_type() {
    let over = asset("image/jpeg", 11_000_000);
    assert_eq!(
        validate_asset(&over, 10_000_000, IMAGE_TYPES),
        Err(ValidationError::TooLarge {
            size: 11_000_000,
            max: 10_000_000
        })
    );

    let wrong_type_and_oversized = asset("application/pdf", 11_000_000);
    assert_eq!(
        validate_asset(&wrong_type_and_oversized, 10_000_000, IMAGE_TYPES),
        Err(ValidationError::TooLarge {
            size: 11_000_000,
            max: 10_000_000
        })
    );
}

#[test]
fn test_unsupported_type_is_rejected() {
    let gif = asset("image/gif", 1024);
    assert_eq!(
        validate_asset(&gif, MAX_IMAGE_BYTES, IMAGE_TYPES),
        Err(ValidationError::UnsupportedType {
            mime_type: "image/gif".to_string()
        })
    );
}

#[test]
fn test_valid_asset_passes_through_unchanged() {
    let jpeg = asset("image/jpeg", MAX_IMAGE_BYTES);
    let validated = validate_asset(&jpeg, MAX_IMAGE_BYTES, IMAGE_TYPES).unwrap();
    assert_eq!(validated.mime_type, "image/jpeg");
    assert_eq!(validated.size_bytes, MAX_IMAGE_BYTES);

    let mp4 = asset("video/mp4", 50 * 1024 * 1024);
    assert!(validate_asset(&mp4, 200 * 1024 * 1024, VIDEO_TYPES).is_ok());
}
