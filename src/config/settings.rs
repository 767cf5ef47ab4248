use std::path::PathBuf;

/// Editor settings that can be customized via Rhai config
#[derive(Debug, Clone)]
pub struct Settings {
    // Display
    pub theme: String,
    pub show_line_numbers: bool,
    pub relative_line_numbers: bool,
    pub tab_width: usize,

    // Editing
    pub auto_indent: bool,
    pub auto_close: bool,

    // Execution handoff
    pub bridge_file: String,
    pub runtime_command: Vec<String>,
    pub runtime_dir: Option<PathBuf>,

    // Remote fetches
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "redsync".to_string(),
            show_line_numbers: true,
            relative_line_numbers: false,
            tab_width: 4,

            auto_indent: true,
            auto_close: true,

            bridge_file: "web_bridge.tmp".to_string(),
            runtime_command: vec!["RedCore".to_string()],
            runtime_dir: None,

            fetch_timeout_secs: 7,
            user_agent: "RedSync-IDE/3.6".to_string(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory the runtime is launched from and the bridge file is written to.
    ///
    /// Falls back to the directory holding the editor executable, then to the
    /// current directory.
    pub fn runtime_dir(&self) -> PathBuf {
        if let Some(dir) = &self.runtime_dir {
            return dir.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn bridge_path(&self) -> PathBuf {
        self.runtime_dir().join(&self.bridge_file)
    }
}
