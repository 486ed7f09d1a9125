//! Cross-platform shell command utilities

/// Returns the shell program and the flag that makes it interpret the next
/// argument as a command line.
///
/// Returns (shell_program, shell_arg) where:
/// - Windows: ("cmd", "/C")
/// - Unix-like: ("sh", "-c")
///
/// Commands are always handed to the POSIX `sh` rather than the user's login
/// shell so that a line behaves the same no matter who started the server.
pub fn get_shell_command() -> (String, &'static str) {
    if cfg!(windows) {
        ("cmd".into(), "/C")
    } else {
        ("sh".into(), "-c")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_command_for_platform() {
        let (program, arg) = get_shell_command();
        if cfg!(windows) {
            assert_eq!(program, "cmd");
            assert_eq!(arg, "/C");
        } else {
            assert_eq!(program, "sh");
            assert_eq!(arg, "-c");
        }
    }
}
