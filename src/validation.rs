use crate::error::ApiError;

const MAX_USER_ID_LEN: usize = 128;

pub fn validate_user_filter(value: &str) -> Result<&str, ApiError> {
    if value.chars().count() > MAX_USER_ID_LEN {
        return Err(ApiError::BadRequest(format!(
            "user_id must be at most {MAX_USER_ID_LEN} characters"
        )));
    }
    if value.chars().any(char::is_control) {
        return Err(ApiError::BadRequest(
            "user_id must not contain control characters".into(),
        ));
    }
    Ok(value)
}
