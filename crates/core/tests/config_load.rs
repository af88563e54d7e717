use pawscout_core::config::{load, AppConfig};
use pawscout_core::shell::{Shell, View};
use providers::noop::NoopApi;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn partial_file_keeps_defaults_for_the_rest() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("pawscout.toml");
    fs::write(
        &path,
        r#"
[api]
base_url = "https://pets.example.org"

[gallery]
debounce_ms = 250

[upload]
exclude = ["**/.thumbnails"]
"#,
    )
    .unwrap();

    let cfg = load(Some(path.to_str().unwrap())).unwrap();
    assert_eq!(cfg.api.base_url, "https://pets.example.org");
    assert_eq!(cfg.api.provider, "http");
    assert_eq!(cfg.gallery.debounce(), Duration::from_millis(250));
    assert_eq!(cfg.gallery.limit, 100);
    assert_eq!(cfg.upload.exclude, vec!["**/.thumbnails"]);
    assert_eq!(cfg.upload.match_settle(), Duration::from_secs(2));
    assert_eq!(cfg.review.error_dismiss(), Duration::from_secs(5));
    assert_eq!(cfg.review.fetch_limit, 50);
    assert!(cfg.session.path.is_none());
}

#[test]
fn shell_starts_on_home_and_keeps_sessions_across_views() {
    let mut shell = Shell::new(Arc::new(NoopApi), &AppConfig::default());
    assert_eq!(shell.current(), View::Dashboard);
    assert!(shell.navigate(View::Gallery));
    shell.gallery.set_search("beagle");
    assert!(!shell.navigate(View::Gallery));
    assert!(shell.navigate(View::Map));
    assert!(shell.navigate("gallery".parse().unwrap()));
    assert_eq!(shell.gallery.filter().search, "beagle");
    assert_eq!("swipe".parse::<View>().unwrap(), View::Matches);
    assert!("settings".parse::<View>().is_err());
}
