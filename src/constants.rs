//! Constants for sheet dimensions and layout thresholds

/// Field names that are never packed into the grid; the identifier and name
/// go into the page header, the completion fields are dropped
pub const EXCLUDED_FIELDS: [&str; 4] = ["identifier", "name", "completed_by", "completed_at"];

/// Values longer than this many characters get the long value format
pub const LONG_VALUE_THRESHOLD: usize = 100;

/// Placeholder written for empty values
pub const EMPTY_VALUE_PLACEHOLDER: &str = "-";

/// Column width of every column on the paginated sheet
pub const PAGINATED_COLUMN_WIDTH: f64 = 16.0;

/// Most horizontal page breaks an Excel worksheet can hold
pub const MAX_PAGE_BREAKS: usize = 1023;

/// Lines assumed for a grid row holding more than one field
pub const MULTI_FIELD_ROW_LINES: usize = 2;

/// Width of the first column on the actions sheet
pub const ACTIONS_FIRST_COLUMN_WIDTH: f64 = 5.0;

/// Width of the middle columns on the actions sheet
pub const ACTIONS_COLUMN_WIDTH: f64 = 50.0;

/// Width of the last column on the actions sheet
pub const ACTIONS_LAST_COLUMN_WIDTH: f64 = 30.0;

/// Height of the actions sheet header row
pub const ACTIONS_HEADER_ROW_HEIGHT: f64 = 20.0;

/// Height of actions sheet data rows
pub const ACTIONS_ROW_HEIGHT: f64 = 50.0;

/// Height of the three title rows on the lead sheet
pub const LEAD_TITLE_ROW_HEIGHT: f64 = 30.0;

/// Width of the value column on the lead sheet
pub const LEAD_VALUE_COLUMN_WIDTH: f64 = 40.0;

/// Number of columns the lead sheet rows are padded to
pub const LEAD_SHEET_WIDTH: u16 = 3;

/// Standard A4 page width in points
pub const A4_WIDTH: f32 = 595.0;

/// Standard A4 page height in points
pub const A4_HEIGHT: f32 = 842.0;

/// Default page margin in points
pub const DEFAULT_MARGIN: f32 = 40.0;

/// Default character width ratio for text estimation
/// (average character width as a fraction of font size)
pub const DEFAULT_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Default line height multiplier
pub const DEFAULT_LINE_HEIGHT_MULTIPLIER: f32 = 1.2;

/// Default padding value in points
pub const DEFAULT_PADDING: f32 = 4.0;
