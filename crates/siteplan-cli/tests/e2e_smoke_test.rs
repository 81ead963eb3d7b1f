use std::{fs, io::Write as _, path::PathBuf};

use tempfile::tempdir;

use siteplan_cli::{Args, run};

/// Collects all .site files from a directory
fn collect_site_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("site")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn args_for(input: &str, output: &str) -> Args {
    Args {
        input: input.to_string(),
        output: output.to_string(),
        config: None,
        theme: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    // Create a temporary directory for test outputs
    let temp_dir = tempdir().expect("Failed to create temp directory");

    // Demos are at workspace root, relative to workspace not the crate
    let demos_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos");
    let valid_demos = collect_site_files(demos_path);

    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    for demo_path in &valid_demos {
        let output_filename =
            format!("{}.svg", demo_path.file_stem().unwrap().to_string_lossy());
        let output_path = temp_dir.path().join(output_filename);

        let args = args_for(
            &demo_path.to_string_lossy(),
            &output_path.to_string_lossy(),
        );
        let result = run(&args);
        assert!(
            result.is_ok(),
            "Failed to process {}: {:?}",
            demo_path.display(),
            result.err()
        );

        let svg = fs::read_to_string(&output_path).expect("Output file should exist");
        assert!(svg.contains("<svg"), "Output should be an SVG document");
        assert!(svg.contains("</svg>"), "Output should be complete");
    }
}

#[test]
fn e2e_theme_flag_overrides_default() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input_path = temp_dir.path().join("tiny.site");
    let output_path = temp_dir.path().join("tiny.svg");
    fs::write(&input_path, "site Tiny\n  home /\n").expect("Failed to write input");

    let mut args = args_for(
        &input_path.to_string_lossy(),
        &output_path.to_string_lossy(),
    );
    args.theme = Some("dark".to_string());
    run(&args).expect("Failed to process input");

    let svg = fs::read_to_string(&output_path).expect("Output file should exist");
    assert!(svg.contains("#1e1e2e"), "Dark theme colors should be used");
}

#[test]
fn e2e_config_file_is_honored() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input_path = temp_dir.path().join("tiny.site");
    let output_path = temp_dir.path().join("tiny.svg");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&input_path, "site Tiny\n  home /\n    --> ghost\n")
        .expect("Failed to write input");

    let mut config_file = fs::File::create(&config_path).expect("Failed to create config");
    writeln!(config_file, "[layout]\nvalidate_links = false\n").expect("Failed to write config");

    let mut args = args_for(
        &input_path.to_string_lossy(),
        &output_path.to_string_lossy(),
    );

    // Without the config the dangling link fails validation
    assert!(run(&args).is_err());

    args.config = Some(config_path.to_string_lossy().to_string());
    run(&args).expect("Validation disabled via config, run should succeed");
    assert!(output_path.exists());
}

#[test]
fn e2e_invalid_input_fails_without_output() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input_path = temp_dir.path().join("broken.site");
    let output_path = temp_dir.path().join("broken.svg");
    fs::write(&input_path, "not valid dsl\n").expect("Failed to write input");

    let args = args_for(
        &input_path.to_string_lossy(),
        &output_path.to_string_lossy(),
    );
    assert!(run(&args).is_err());
    assert!(!output_path.exists(), "No output on failure");
}

#[test]
fn e2e_missing_input_is_an_io_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let args = args_for(
        &temp_dir.path().join("absent.site").to_string_lossy(),
        &temp_dir.path().join("absent.svg").to_string_lossy(),
    );
    assert!(matches!(run(&args), Err(siteplan::SiteplanError::Io(_))));
}
