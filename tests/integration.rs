use std::process::Command;

#[test]
fn test_help_flag() {
    let output = Command::new("cargo")
        .args(["run", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("geofile-import"));
    assert!(stdout.contains("--output-dir"));
    assert!(stdout.contains("--max-size-mib"));
}

#[test]
fn test_missing_inputs() {
    let output = Command::new("cargo")
        .args(["run", "--"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("required"));
}

#[test]
fn test_quiet_and_verbose_conflict() {
    let output = Command::new("cargo")
        .args(["run", "--", "a.kml", "--quiet", "--verbose"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("mutually exclusive"));
}

#[test]
fn test_file_not_found() {
    let output = Command::new("cargo")
        .args(["run", "--", "nonexistent.kml"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_unsupported_extension() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("track.gpx");
    std::fs::write(&input, "<gpx/>").unwrap();

    let output = Command::new("cargo")
        .args(["run", "--", input.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unsupported format"));
}

#[test]
fn test_kml_written_as_geojson() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("site.kml");
    std::fs::write(
        &input,
        "<kml><Placemark><Point><coordinates>2.35,48.85</coordinates></Point></Placemark></kml>",
    )
    .unwrap();
    let out_dir = dir.path().join("out");

    let output = Command::new("cargo")
        .args([
            "run",
            "--",
            input.to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
            "--quiet",
        ])
        .output()
        .expect("Failed to execute command");

    if !output.status.success() {
        eprintln!("stderr: {}", String::from_utf8_lossy(&output.stderr));
    }
    assert!(output.status.success());

    let written = out_dir.join("site.geojson");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("site.geojson"));
    let json = std::fs::read_to_string(&written).unwrap();
    assert!(json.contains("FeatureCollection"));
    assert!(json.contains("2.35"));
}

#[test]
fn test_partial_failure_exits_with_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let good = dir.path().join("good.geojson");
    std::fs::write(&good, r#"{"type":"Point","coordinates":[1,2]}"#).unwrap();
    let bad = dir.path().join("bad.geojson");
    std::fs::write(&bad, r#"{"type":"FeatureCollection","features":[]}"#).unwrap();

    let output = Command::new("cargo")
        .args(["run", "--", good.to_str().unwrap(), bad.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("(1 Point)"));
    assert!(stderr.contains("No valid geometry found"));
}
