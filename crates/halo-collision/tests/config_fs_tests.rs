// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use halo_collision::{
    CheckerConfig, ConfigError, ConfigService, ConfigStore, DirConfigStore, CHECKER_CONFIG_KEY,
};

#[test]
fn checker_config_round_trips_through_a_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = DirConfigStore::at(dir.path().join("nested")).expect("store");
    let service = ConfigService::new(store);

    assert_eq!(
        service.checker_config().expect("load"),
        CheckerConfig::default()
    );

    let cfg = CheckerConfig {
        width: 32,
        height: 24,
        cell_size: 20.0,
        wrap: true,
    };
    service.save(CHECKER_CONFIG_KEY, &cfg).expect("save");
    assert!(dir.path().join("nested/collision.json").is_file());
    assert_eq!(service.checker_config().expect("load"), cfg);
}

#[test]
fn missing_key_is_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = DirConfigStore::at(dir.path()).expect("store");
    assert!(matches!(store.load_raw("absent"), Err(ConfigError::NotFound)));
    assert_eq!(store.base(), dir.path());
}
