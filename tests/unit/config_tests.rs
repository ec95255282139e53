use std::io::Write;
use termlog_rs::config::{ColorMode, SinkKind, load_config};
use termlog_rs::{ConfigError, TerminalConfig};

#[cfg(test)]
mod tests {
    use super::*;

    // --- file loading ---

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.sequencer, TerminalConfig::default().sequencer);
        assert_eq!(config.output.sink, SinkKind::Stdout);
    }

    #[test]
    fn test_file_values_are_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[sequencer]
channel_capacity = 128

[sequencer.flush]
max_pending = 32

[output]
sink = "tracing"
color = "always"
"#
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.sequencer.channel_capacity, 128);
        assert_eq!(config.sequencer.flush.max_pending, Some(32));
        assert_eq!(config.output.sink, SinkKind::Tracing);
        assert_eq!(config.output.color, ColorMode::Always);
    }

    // --- malformed input ---

    #[test]
    fn test_invalid_toml_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sequencer\nchannel_capacity = ").unwrap();

        let result = load_config(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_wrong_type_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sequencer]\nchannel_capacity = \"big\"").unwrap();

        let result = load_config(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
