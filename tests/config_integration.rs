use std::fs;

use cookie::app::{Message, Model, update};
use cookie::config::{
    CONFIG_FILE, Config, ConfigOverrides, SYNTAX_FILE, default_syntaxes, load_settings,
};
use cookie::highlight::Highlight;

#[test]
fn test_first_run_writes_editable_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nested").join("cookie");

    let settings = load_settings(&root, &ConfigOverrides::default()).unwrap();
    assert_eq!(settings.config, Config::default());

    let written = fs::read_to_string(root.join(CONFIG_FILE)).unwrap();
    assert!(written.contains("\"tab_stop\": 8"));
    assert!(written.contains("\"empty_line_char\": \"~\""));
    assert!(written.contains("\"match\""));

    // Loading again reads back what was written
    let again = load_settings(&root, &ConfigOverrides::default()).unwrap();
    assert_eq!(again, settings);
}

#[test]
fn test_cli_overrides_apply_after_file_values() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(CONFIG_FILE),
        r#"{"tab_stop": 2, "quit_times": 7}"#,
    )
    .unwrap();

    let overrides = ConfigOverrides {
        tab_stop: Some(4),
        quit_times: None,
    };
    let settings = load_settings(dir.path(), &overrides).unwrap();
    assert_eq!(settings.config.tab_stop, 4);
    assert_eq!(settings.config.quit_times, 7);
}

#[test]
fn test_malformed_syntax_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(SYNTAX_FILE), "[{").unwrap();

    let err = load_settings(dir.path(), &ConfigOverrides::default()).unwrap_err();
    assert!(format!("{err:#}").contains(SYNTAX_FILE));
}

#[test]
fn test_user_syntax_drives_highlighting() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(SYNTAX_FILE),
        r#"[{
            "filetype": "notes",
            "filematch": [".note"],
            "keywords": ["todo", "done|"],
            "scs": "--",
            "flags": {"highlight_numbers": true}
        }]"#,
    )
    .unwrap();
    let settings = load_settings(dir.path(), &ConfigOverrides::default()).unwrap();

    let mut model = Model::new((80, 24), settings);
    model.open_file(&dir.path().join("week.note")).unwrap();
    assert_eq!(model.filetype(), Some("notes"));

    let model = "todo 3 -- done"
        .chars()
        .fold(model, |model, c| update(model, Message::InsertChar(c)));
    let tags = model.buffer.rows()[0].highlights();
    assert_eq!(&tags[0..4], &[Highlight::Keyword1; 4]);
    assert_eq!(tags[5], Highlight::Number);
    assert!(tags[7..].iter().all(|&h| h == Highlight::Comment));
}

#[test]
fn test_reloaded_settings_replace_filetypes() {
    let dir = tempfile::tempdir().unwrap();
    let settings = load_settings(dir.path(), &ConfigOverrides::default()).unwrap();
    let mut model = Model::new((80, 24), settings);
    model.open_file(&dir.path().join("lib.rs")).unwrap();
    assert_eq!(model.filetype(), Some("rust"));

    fs::write(dir.path().join(SYNTAX_FILE), "[]").unwrap();
    model.apply_settings(load_settings(dir.path(), &ConfigOverrides::default()).unwrap());
    assert_eq!(model.filetype(), None);

    model.apply_settings(cookie::config::Settings {
        config: Config::default(),
        syntaxes: default_syntaxes(),
    });
    assert_eq!(model.filetype(), Some("rust"));
}
