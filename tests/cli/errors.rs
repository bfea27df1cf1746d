use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, SIMULATION_OUTPUT, SIMULATION_TOML, stderr};

#[test]
fn test_missing_arguments_is_usage_error() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.run(&["out/{size}.toml"])?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Usage:"));

    Ok(())
}

#[test]
fn test_malformed_render_key_is_usage_error() -> Result<()> {
    let test = CliTest::with_file("config.toml", SIMULATION_TOML)?;

    let output = test.run(&["-r", "output..dir", SIMULATION_OUTPUT, "config.toml"])?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("malformed key"));
    assert!(!test.root().join("out").exists());

    Ok(())
}

#[test]
fn test_duplicate_binding() -> Result<()> {
    let test = CliTest::with_file("config.toml", SIMULATION_TOML)?;

    let output = test.run(&[
        "-b",
        "width,height",
        "-b",
        "size,width",
        SIMULATION_OUTPUT,
        "config.toml",
    ])?;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stderr(&output),
        "Error: Invalid --bind arguments: variable width is already bound\n"
    );

    Ok(())
}

#[test]
fn test_length_mismatch_writes_nothing() -> Result<()> {
    let config = SIMULATION_TOML.replace("height = [480, 600]", "height = [480, 600, 720]");
    let test = CliTest::with_file("config.toml", &config)?;

    let output = test.run(&["-b", "width,height", SIMULATION_OUTPUT, "config.toml"])?;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stderr(&output),
        "Error: Failed to expand config.toml: array length mismatch: width has 2 values but height has 3\n"
    );
    assert!(!test.root().join("out").exists());

    Ok(())
}

#[test]
fn test_scalar_in_output_path() -> Result<()> {
    let test = CliTest::with_file("config.toml", SIMULATION_TOML)?;

    let output = test.run(&["{id}.toml", "config.toml"])?;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stderr(&output),
        "Error: Failed to expand config.toml: expected array at key id\n"
    );

    Ok(())
}

#[test]
fn test_invalid_render_template_fails_before_writing() -> Result<()> {
    let config = SIMULATION_TOML.replace("_{simulation.mode}{id}.dat", "_{simulation.mode");
    let test = CliTest::with_file("config.toml", &config)?;

    let output = test.run(&[
        "-b",
        "width,height",
        "-r",
        "output.dir",
        SIMULATION_OUTPUT,
        "config.toml",
    ])?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("Error: Invalid --render value: template syntax error"));
    assert!(!test.root().join("out").exists());

    Ok(())
}

#[test]
fn test_unsupported_output_format_leaves_no_file() -> Result<()> {
    let test = CliTest::with_file("config.toml", SIMULATION_TOML)?;

    let output = test.run(&["out/{size}.yaml", "config.toml"])?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains(r#"unsupported file format ".yaml""#));
    assert!(!test.root().join("out").exists());

    Ok(())
}

#[test]
fn test_missing_input_file() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.run(&["out/{size}.toml", "missing.toml"])?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("Error: IO error when accessing `missing.toml`"));

    Ok(())
}

#[test]
fn test_files_written_before_error_remain() -> Result<()> {
    let test = CliTest::with_file("config.toml", "size = [5, \"large\", 7]\n")?;

    let output = test.run(&["out/{size|%03d}.toml", "config.toml"])?;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stderr(&output),
        "Error: Failed to expand config.toml: cannot format size with \"%03d\": verb '%d' cannot format string\n"
    );
    assert_eq!(test.list_files("out")?, ["out/005.toml"]);

    Ok(())
}
