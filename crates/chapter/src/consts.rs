/// Full line that opens the title section.
pub const TITLE_MARKER_LINE: &str = "#标题";
/// Full line that opens the body section.
pub const BODY_MARKER_LINE: &str = "##正文";
