use std::fs;
use std::path::Path;

use approx::assert_relative_eq;
use assert_cmd::Command;
use irtrack::{RawDetection, Sensor, SensorRig, SensorSample, TrackerConfig};
use nalgebra::Point3;
use predicates::prelude::*;
use tempfile::tempdir;

fn write_recording(path: &Path, samples: &[SensorSample]) {
    let lines: Vec<String> = samples
        .iter()
        .map(|s| serde_json::to_string(s).unwrap())
        .collect();
    fs::write(path, lines.join("\n")).unwrap();
}

fn reference_recording() -> Vec<SensorSample> {
    let d = |x, y| RawDetection::new(x, y, 2.0);
    vec![
        SensorSample::from_slots(Sensor::Left, [d(400.0, 390.0), d(150.0, 500.0)]),
        SensorSample::from_slots(Sensor::Right, [d(600.0, 390.0), d(850.0, 460.0)]),
    ]
}

fn irtrack() -> Command {
    Command::cargo_bin("irtrack").unwrap()
}

#[test]
fn config_template_loads_back_as_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tracker.json");

    irtrack()
        .args(["config-template", "--out"])
        .arg(&path)
        .assert()
        .success();

    let config = TrackerConfig::load_json(&path).unwrap();
    let defaults = TrackerConfig::default();
    assert_relative_eq!(
        config.rig.mounting_angle,
        defaults.rig.mounting_angle,
        epsilon = 1e-12
    );
    assert_eq!(config.rig.baseline, defaults.rig.baseline);
    assert_eq!(config.rig.optics, defaults.rig.optics);
    assert_eq!(config.resolver, defaults.resolver);
    assert_eq!(config.gestures, defaults.gestures);
    assert_eq!(config.volume, defaults.volume);
    assert!(config.gestures_enabled);
}

#[test]
fn replay_prints_json_frames() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scene.jsonl");
    write_recording(&path, &reference_recording());

    let output = irtrack()
        .args(["replay", "--json", "--normalize"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let frames: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(frames.len(), 2);

    let last = &frames[1];
    assert_eq!(last["sample"], 1);
    assert_eq!(last["sensor"], "right");
    assert_eq!(last["frame"]["missing_detections"], 0);
    assert!(last["frame"]["left"].is_object());
    assert!(last["frame"]["right"].is_object());
    assert!(last["normalized"][0].is_array());
}

#[test]
fn replay_reports_a_pinch_in_text_mode() {
    let rig = SensorRig::default();
    let near = [
        Point3::new(280.0, -25.0, 900.0),
        Point3::new(300.0, 20.0, 920.0),
    ];
    let view = |sensor: Sensor, count: usize| {
        let mut slots = [RawDetection::missing(); 2];
        for (slot, p) in slots.iter_mut().zip(&near[..count]) {
            *slot = rig.project(sensor, p).unwrap();
        }
        SensorSample::from_slots(sensor, slots)
    };
    let mut samples = Vec::new();
    for _ in 0..2 {
        samples.push(view(Sensor::Left, 2));
        samples.push(view(Sensor::Right, 2));
    }
    samples.push(view(Sensor::Left, 1));
    samples.push(view(Sensor::Right, 1));

    let dir = tempdir().unwrap();
    let path = dir.path().join("pinch.jsonl");
    write_recording(&path, &samples);

    irtrack()
        .arg("replay")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("gesture: pinch at"))
        .stdout(predicate::str::contains("#5 Right"));
}

#[test]
fn replay_rejects_three_detections() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.jsonl");
    fs::write(
        &path,
        "{\"sensor\": \"left\", \"detections\": [[1,1,1],[2,2,2],[3,3,3]]}\n",
    )
    .unwrap();

    irtrack()
        .arg("replay")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("recording line 1"));
}

#[test]
fn replay_rejects_an_invalid_config() {
    let dir = tempdir().unwrap();
    let recording = dir.path().join("scene.jsonl");
    write_recording(&recording, &reference_recording());
    let config = dir.path().join("bad.json");
    fs::write(&config, r#"{"rig": {"baseline": -1.0}}"#).unwrap();

    irtrack()
        .arg("replay")
        .arg(&recording)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("baseline"));
}
