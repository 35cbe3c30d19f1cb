//! Cross-platform utilities: file operations and platform helpers.

pub mod fs;
pub mod platform;

pub use fs::{
    atomic_write, calculate_checksum, copy_dir_all, ensure_dir, read_json_file, read_text_file,
    safe_write, write_json_file,
};
pub use platform::{find_claude_cli, get_git_command, get_home_dir, is_windows, open_in_file_manager, resolve_path};
