use serde::Deserialize;
use ts_rs::TS;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, TS)]
#[ts(export)]
pub struct PublishPostRequest {
    #[validate(length(min = 1, max = 280))]
    pub content: String,
}
