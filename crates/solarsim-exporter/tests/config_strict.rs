#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use solarsim_core::SolarSimError;
use solarsim_exporter::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
farms:
  - id: "provence"
    name: "Marseille"
    panels: 5000
    peak_power_kw: 0.4
    latitude: 43.29
    longitude: 5.37 # not a known field
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.kind(), "BAD_CONFIG");
}

#[test]
fn ok_minimal_config_uses_builtin_fleet() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.server.listen, "0.0.0.0:3000");
    assert_eq!(cfg.simulation.tick_interval_ms, 2000);
    assert_eq!(cfg.simulation.anomaly_probability, 0.10);
    assert_eq!(cfg.simulation.seed, None);

    let ids: Vec<&str> = cfg.farms.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, ["provence", "occitanie", "aquitaine"]);
    assert_eq!(cfg.farms[1].panels, 3500);
}

#[test]
fn ok_full_config() {
    let ok = r#"
version: 1
server:
  listen: "127.0.0.1:9100"
simulation:
  tick_interval_ms: 500
  anomaly_probability: 0.25
  seed: 42
farms:
  - { id: "dune-1", name: "Dune", panels: 10, peak_power_kw: 0.5, latitude: -33.9 }
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.server.listen_addr().unwrap().port(), 9100);
    assert_eq!(cfg.simulation.tick_interval().as_millis(), 500);
    assert_eq!(cfg.simulation.seed, Some(42));
    assert_eq!(cfg.farms.len(), 1);
    assert_eq!(cfg.farms[0].peak_power_watts(), 500.0);
}

#[test]
fn rejects_unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert!(matches!(err, SolarSimError::UnsupportedVersion));
}

#[test]
fn rejects_invalid_values() {
    let cases = [
        "version: 1\nfarms: []\n",
        "version: 1\nserver: { listen: \"not-an-addr\" }\n",
        "version: 1\nsimulation: { tick_interval_ms: 10 }\n",
        "version: 1\nsimulation: { anomaly_probability: 1.5 }\n",
        "version: 1\nfarms:\n  - { id: \"a b\", name: A, panels: 1, peak_power_kw: 0.4, latitude: 0 }\n",
        "version: 1\nfarms:\n  - { id: a, name: A, panels: 0, peak_power_kw: 0.4, latitude: 0 }\n",
        "version: 1\nfarms:\n  - { id: a, name: A, panels: 1, peak_power_kw: -1, latitude: 0 }\n",
        "version: 1\nfarms:\n  - { id: a, name: A, panels: 1, peak_power_kw: 0.4, latitude: 91 }\n",
        "version: 1\nfarms:\n  - { id: a, name: A, panels: 1, peak_power_kw: 0.4, latitude: 0 }\n  - { id: a, name: B, panels: 2, peak_power_kw: 0.4, latitude: 0 }\n",
    ];
    for case in cases {
        let err = config::load_from_str(case).expect_err(case);
        assert_eq!(err.kind(), "BAD_CONFIG", "{case}");
    }
}

#[test]
fn missing_explicit_file_is_io_error() {
    let err = config::load_from_file("/nonexistent/solarsim.yaml").expect_err("must fail");
    assert_eq!(err.kind(), "IO");
}
