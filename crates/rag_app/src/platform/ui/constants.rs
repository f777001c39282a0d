pub const CMD_SOURCE: &str = "source";
pub const CMD_TEXT: &str = "text";
pub const CMD_FILE: &str = "file";
pub const CMD_QUERY: &str = "query";
pub const CMD_SAVE_TEXT: &str = "save-text";
pub const CMD_SAVE_FILE: &str = "save-file";
pub const CMD_SEARCH: &str = "search";
pub const CMD_SHOW: &str = "show";
pub const CMD_HELP: &str = "help";
pub const CMD_QUIT: &str = "quit";
pub const CMD_EXIT: &str = "exit";

/// Ends a multi-line text draft.
pub const MULTILINE_TERMINATOR: &str = ".";

/// Characters of the draft text shown by `show`.
pub const TEXT_PREVIEW_CHARS: usize = 60;
