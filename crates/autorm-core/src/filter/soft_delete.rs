use super::{Filter, FilterContext, FilterParameter};
use crate::mapping::ColumnType;
use crate::Result;

/// Hides rows whose active flag is cleared.
///
/// Rows with a null flag predate the flag and stay visible.
#[derive(Debug, Default, Clone, Copy)]
pub struct SoftDeleteFilter;

impl SoftDeleteFilter {
    pub const NAME: &'static str = "soft_delete";

    /// Member of the tracked template holding the active flag
    pub const MEMBER: &'static str = "IsActive";

    pub const PARAMETER: &'static str = "is_active";
}

impl Filter for SoftDeleteFilter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn condition(&self, cx: &FilterContext<'_>) -> Result<String> {
        let column = cx.tracked_column(Self::MEMBER);
        Ok(format!(
            "({column} IS NULL OR {column} = :{})",
            Self::PARAMETER
        ))
    }

    fn parameters(&self) -> Vec<FilterParameter> {
        vec![FilterParameter::new(Self::PARAMETER, ColumnType::Boolean)]
    }
}
