use argh::FromArgs;

/// Prompt printed before each line is read.
pub const DEFAULT_PROMPT: &str = "myshell> ";

#[derive(FromArgs, Debug, Clone, PartialEq, Eq)]
/// A small interactive shell: runs one command per line, with `<`, `>` and `>>` redirection.
pub struct ShellConfig {
    #[argh(option, default = "DEFAULT_PROMPT.to_string()")]
    /// text printed before each line is read.
    pub prompt: String,

    #[argh(switch, short = 'n')]
    /// print a newline when end-of-input is reached, so the terminal prompt ends cleanly.
    pub eof_newline: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            eof_newline: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ShellConfig::from_args(&["myshell"], &[]).unwrap();
        assert_eq!(config, ShellConfig::default());
        assert_eq!(config.prompt, "myshell> ");
        assert!(!config.eof_newline);
    }

    #[test]
    fn test_prompt_and_eof_newline() {
        let config = ShellConfig::from_args(&["myshell"], &["--prompt", "$ ", "-n"]).unwrap();
        assert_eq!(config.prompt, "$ ");
        assert!(config.eof_newline);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(ShellConfig::from_args(&["myshell"], &["--pipes"]).is_err());
    }
}
