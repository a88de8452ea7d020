use std::path::PathBuf;
use std::sync::OnceLock;

static EXE_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Returns the directory containing the executable.
pub fn get_exe_dir() -> &'static PathBuf {
    EXE_DIR.get_or_init(|| {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

/// Returns the logs directory: `<exe_dir>/logs/`
pub fn get_logs_dir() -> PathBuf {
    get_exe_dir().join("logs")
}

/// Returns the parent of the per-run scratch directories: `<exe_dir>/data/runs/`
pub fn get_runs_dir() -> PathBuf {
    get_exe_dir().join("data").join("runs")
}

/// Default location of the concatenated, validated log: `<exe_dir>/data/game_log.txt`
pub fn default_concatenated_log_path() -> PathBuf {
    get_exe_dir().join("data").join("game_log.txt")
}

/// Default localisation file of the hoi3_stats mod.
pub fn default_province_names_path() -> PathBuf {
    PathBuf::from(
        r"C:\Program Files (x86)\Steam\SteamApps\common\Hearts of Iron 3\tfh\mod\hoi3_stats\localisation\province_names.csv",
    )
}

/// Ensures all output directories exist. Call at startup.
pub fn ensure_directories() -> std::io::Result<()> {
    std::fs::create_dir_all(get_logs_dir())?;
    std::fs::create_dir_all(get_runs_dir())?;
    Ok(())
}
