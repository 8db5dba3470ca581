//! End-to-end test: a recorded sensor trace replayed through the classifiers
//! and the dashboard, with habit state persisted to a real preference file.

use chrono::{DateTime, Duration, Utc};
use habitus::dashboard::{Dashboard, DashboardTuning};
use habitus::events::create_shared_log;
use habitus::location::{FixedLocation, GeoPoint};
use habitus::sensors::{
    AccelSample, ExerciseClassifier, GyroClassifier, GyroSample, LightClassifier, LightSample,
    ReplaySource, SensorReading, StepClassifier,
};
use habitus::store::{HabitKind, HabitStore};
use tempfile::tempdir;

fn accel(base: DateTime<Utc>, offset_ms: i64, x: f64, y: f64, z: f64) -> SensorReading {
    SensorReading::Accel(AccelSample {
        timestamp: base + Duration::milliseconds(offset_ms),
        x,
        y,
        z,
    })
}

fn gyro(base: DateTime<Utc>, offset_ms: i64, x: f64, y: f64, z: f64) -> SensorReading {
    SensorReading::Gyro(GyroSample {
        timestamp: base + Duration::milliseconds(offset_ms),
        x,
        y,
        z,
    })
}

fn light(base: DateTime<Utc>, offset_ms: i64, lux: f64) -> SensorReading {
    SensorReading::Light(LightSample {
        timestamp: base + Duration::milliseconds(offset_ms),
        lux,
    })
}

/// A morning's worth of sensor activity: a brisk walk, a short workout, a
/// wrist flick into focus mode and the lights going out.
fn morning_trace(base: DateTime<Utc>) -> Vec<SensorReading> {
    let mut trace = Vec::new();

    // Two spaced accelerometer samples with a large summed delta: a step.
    trace.push(accel(base, 0, 0.0, 0.0, 9.8));
    trace.push(accel(base, 600, 25.0, 25.0, 25.0));

    // Sustained hard movement from 1s to 4.2s: exercise after 3s of it.
    for i in 0..6 {
        trace.push(accel(base, 1000 + i * 640, 0.0, 0.0, 22.5));
    }

    // A sharp rotation: focus mode on.
    trace.push(gyro(base, 5000, 3.0, 2.5, 1.0));

    // Ambient light drops well past the startup grace.
    trace.push(light(base, 9000, 2.0));

    trace
}

#[test]
fn test_morning_trace_completes_habits_and_persists() {
    let dir = tempdir().unwrap();
    let base = Utc::now();

    let events = create_shared_log();
    let mut dashboard = Dashboard::new(
        HabitStore::open_in(dir.path()),
        events.clone(),
        Box::new(FixedLocation(GeoPoint::new(40.4168, -3.7038))),
        DashboardTuning::default(),
        base,
    );

    let mut light_classifier = LightClassifier::default();
    let mut step_classifier = StepClassifier::default();
    let mut exercise_classifier = ExerciseClassifier::default();
    let mut gyro_classifier = GyroClassifier::default();

    let mut source = ReplaySource::from_readings(morning_trace(base));
    let receiver = source.receiver().clone();
    let handle = source.start().unwrap();

    loop {
        let reading = match receiver.recv_timeout(std::time::Duration::from_millis(200)) {
            Ok(reading) => reading,
            Err(_) => {
                if !handle.is_running() && receiver.is_empty() {
                    break;
                }
                continue;
            }
        };

        let at = reading.timestamp();
        let signal = match reading {
            SensorReading::Light(sample) => light_classifier.process(&sample),
            SensorReading::Accel(sample) => {
                if let Some(signal) = exercise_classifier.process(&sample) {
                    dashboard.apply_signal(signal, at).unwrap();
                }
                step_classifier.process(&sample)
            }
            SensorReading::Gyro(sample) => gyro_classifier.process(&sample),
        };
        if let Some(signal) = signal {
            dashboard.apply_signal(signal, at).unwrap();
        }
        if let Some(signal) = gyro_classifier.tick(at) {
            dashboard.apply_signal(signal, at).unwrap();
        }
    }

    // Walk and exercise habits completed by their classifiers
    let walk = dashboard
        .habits()
        .iter()
        .find(|h| h.kind == HabitKind::Walk)
        .unwrap();
    let exercise = dashboard
        .habits()
        .iter()
        .find(|h| h.kind == HabitKind::Exercise)
        .unwrap();
    assert!(walk.completed, "walk should complete from the step trace");
    assert!(exercise.completed, "exercise should complete after 3s of movement");

    // The light drop at 9s is past grace and flips night mode; the gyro
    // trigger at 5s turned focus on, and the theme change turned it back off.
    assert!(dashboard.night_mode());
    assert!(!dashboard.focus_mode());

    // Events carry the fixed location
    let logged = events.all();
    assert!(logged.iter().any(|e| e.kind == HabitKind::Walk));
    assert!(logged.iter().any(|e| e.kind == HabitKind::Exercise));
    assert!(logged.iter().any(|e| e.kind == HabitKind::Focus));
    assert!(logged.iter().all(|e| (e.latitude - 40.4168).abs() < 1e-9));

    // State survives a restart through the preference file
    let reopened = HabitStore::open_in(dir.path());
    let persisted = reopened.load();
    assert!(persisted.iter().any(|h| h.kind == HabitKind::Walk && h.completed));
    assert!(persisted.iter().any(|h| h.kind == HabitKind::Exercise && h.completed));
    assert!(reopened.night_mode());
    assert!(!reopened.focus_mode());
}

#[test]
fn test_trace_roundtrips_through_jsonl() {
    let dir = tempdir().unwrap();
    let base = Utc::now();
    let trace = morning_trace(base);

    let path = dir.path().join("trace.jsonl");
    let lines: Vec<String> = trace
        .iter()
        .map(|r| serde_json::to_string(r).unwrap())
        .collect();
    std::fs::write(&path, lines.join("\n")).unwrap();

    let source = ReplaySource::from_path(&path).unwrap();
    assert_eq!(source.len(), trace.len());
    assert_eq!(source.first_timestamp(), Some(trace[0].timestamp()));
}
