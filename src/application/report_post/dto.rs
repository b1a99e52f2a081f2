use serde::Deserialize;
use ts_rs::TS;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, TS)]
#[ts(export)]
pub struct ReportPostRequest {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,

    /// Whether the reporter flags the post as racist; feeds the score blend.
    #[serde(default)]
    pub is_racism_report: bool,
}
