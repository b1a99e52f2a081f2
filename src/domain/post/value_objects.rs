use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

lazy_static! {
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[A-Za-z0-9_]{3,30}$").unwrap();
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PostContent {
    #[validate(length(min = 1, max = 280))]
    pub value: String,
}

impl PostContent {
    pub fn new(value: String) -> Result<Self, validator::ValidationErrors> {
        let content = Self {
            value: value.trim().to_string(),
        };
        content.validate()?;
        Ok(content)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReportReason {
    #[validate(length(min = 1, max = 500))]
    pub value: String,
}

impl ReportReason {
    pub fn new(value: String) -> Result<Self, validator::ValidationErrors> {
        let reason = Self {
            value: value.trim().to_string(),
        };
        reason.validate()?;
        Ok(reason)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Username {
    #[validate(regex(path = *USERNAME_REGEX))]
    pub value: String,
}

impl Username {
    pub fn new(value: String) -> Result<Self, validator::ValidationErrors> {
        let username = Self {
            value: value.trim().to_string(),
        };
        username.validate()?;
        Ok(username)
    }
}
