use super::load::{default_config_path, default_log_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_jukebox_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("JUKEBOX_CONFIG_PATH", "/tmp/jukebox-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/jukebox-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("jukebox")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("jukebox")
            .join("config.toml")
    );
}

#[test]
fn default_log_path_uses_xdg_state_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_STATE_HOME", "/tmp/xdg-state-home");

    let p = default_log_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-state-home")
            .join("jukebox")
            .join("jukebox.log")
    );
}

#[test]
fn defaults_are_sane_and_validate() {
    let s = Settings::default();
    assert_eq!(s.playback.seek_seconds, 10);
    assert_eq!(s.playback.poll_interval_ms, 100);
    assert_eq!(s.search.max_results, 5);
    assert_eq!(s.download.codec, "mp3");
    assert_eq!(s.download.quality, "192K");
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_out_of_range_volume() {
    let mut s = Settings::default();
    s.playback.volume = 1.5;
    assert!(s.validate().is_err());
}

#[test]
fn validate_rejects_zero_max_results() {
    let mut s = Settings::default();
    s.search.max_results = 0;
    assert!(s.validate().is_err());
}

#[test]
fn validate_rejects_too_small_poll_interval() {
    let mut s = Settings::default();
    s.playback.poll_interval_ms = 1;
    assert!(s.validate().is_err());
}

#[test]
fn settings_deserialize_from_toml_fragment() {
    let s: Settings = toml::from_str(
        r#"
        [playback]
        volume = 0.8
        seek_seconds = 5

        [download]
        dir = "/tmp/dl"
        "#,
    )
    .unwrap();
    assert_eq!(s.playback.volume, 0.8);
    assert_eq!(s.playback.seek_seconds, 5);
    assert_eq!(s.download.dir, std::path::PathBuf::from("/tmp/dl"));
    // Untouched sections keep their defaults.
    assert_eq!(s.search.max_results, 5);
}
