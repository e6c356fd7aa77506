/// Sequence code used to allocate subscription reference codes
pub const SUBSCRIPTION_SEQUENCE_CODE: &str = "basic.subscription";

/// Placeholder name and code for records that have not been numbered yet
pub const DEFAULT_SUBSCRIPTION_NAME: &str = "New";

/// Default ordering value for new stages
pub const DEFAULT_STAGE_SEQUENCE: i32 = 1;

/// Days counted in one month when normalizing daily and weekly recurrences
pub const DAYS_PER_MONTH: i64 = 30;

/// Days in one week
pub const DAYS_PER_WEEK: i64 = 7;

/// Months in one year
pub const MONTHS_PER_YEAR: i64 = 12;

/// Percent base used by discount math
pub const PERCENT_BASE: i64 = 100;
