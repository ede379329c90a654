use std::path::Path;
use std::process::Command;

use crate::config::{Config, config_file_path, ensure_config_file};
use crate::error::AppError;
use crate::path::absolute;
use crate::utils::display_path;

pub struct ConfigOptions {
    pub show_path: bool,
    pub edit: bool,
    pub add_directory: Option<String>,
    pub add_exclude: Option<String>,
}

pub fn execute_config(options: ConfigOptions) -> Result<(), AppError> {
    if options.show_path {
        let path = config_file_path()?;
        println!("Configuration file: {}", display_path(&path));
    }

    if let Some(ref directory) = options.add_directory {
        let directory = if directory.starts_with('~') {
            directory.clone()
        } else {
            absolute(Path::new(directory))?.display().to_string()
        };
        let mut config = Config::load()?;
        config.append_directory(directory.clone());
        config.save()?;
        println!("Added search directory '{}'.", directory);
    }

    if let Some(ref pattern) = options.add_exclude {
        let mut config = Config::load()?;
        config.append_exclude(pattern.clone());
        config.compile_excludes()?;
        config.save()?;
        println!("Added exclude pattern '{}'.", pattern);
    }

    if options.edit {
        let path = ensure_config_file()?;
        open_editor(&path)?;
    }

    if !options.show_path
        && options.add_directory.is_none()
        && options.add_exclude.is_none()
        && !options.edit
    {
        let path = config_file_path()?;
        println!("Configuration file: {}", display_path(&path));
    }

    Ok(())
}

/// Opens the config in `$EDITOR` (or `$VISUAL`). Values such as `code --wait`
/// are split into the program and its leading arguments.
fn open_editor(path: &Path) -> Result<(), AppError> {
    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| "nano".to_string());
    let (program, args) = editor_command(&editor)
        .ok_or_else(|| AppError::Editor("EDITOR is set but empty".to_string()))?;

    let status = Command::new(program)
        .args(args)
        .arg(path)
        .status()
        .map_err(|err| AppError::Editor(format!("{program}: {err}")))?;

    if status.success() {
        Ok(())
    } else {
        Err(AppError::Editor(format!("{program} exited with {status}")))
    }
}

fn editor_command(editor: &str) -> Option<(&str, Vec<&str>)> {
    let mut parts = editor.split_whitespace();
    let program = parts.next()?;
    Some((program, parts.collect()))
}
