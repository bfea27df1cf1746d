use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::{CliTest, SIMULATION_OUTPUT, SIMULATION_TOML, stdout};

const BIND_AND_RENDER: [&str; 4] = ["-b", "width,height", "-r", "output.dir"];

fn simulation_args<'a>(extra: &[&'a str]) -> Vec<&'a str> {
    let mut args: Vec<&'a str> = BIND_AND_RENDER.to_vec();
    args.extend_from_slice(extra);
    args.extend([SIMULATION_OUTPUT, "config.toml"]);
    args
}

#[test]
fn test_worked_example() -> Result<()> {
    let test = CliTest::with_file("config.toml", SIMULATION_TOML)?;

    let output = test.run(&simulation_args(&[]))?;
    assert!(output.status.success());
    assert_eq!(stdout(&output), "\u{2713} Generated 12 files\n");

    let mut expected = Vec::new();
    for mode in ["crazy", "normal"] {
        for pair in ["640x480", "800x600"] {
            for size in ["005", "010", "200"] {
                expected.push(format!("out/{mode}/{pair}_{size}.toml"));
            }
        }
    }
    assert_eq!(test.list_files("out")?, expected);

    let written: Value = toml::from_str(&test.read_file("out/crazy/640x480_010.toml")?)?;
    assert_eq!(
        written,
        json!({
            "id": 42,
            "size": 10,
            "width": 640,
            "height": 480,
            "simulation": {"mode": "crazy"},
            "output": {"dir": "data/640x480_010_crazy42.dat"},
        })
    );

    // the input file is left untouched
    assert_eq!(test.read_file("config.toml")?, SIMULATION_TOML);

    Ok(())
}

#[test]
fn test_without_render_keeps_template_value() -> Result<()> {
    let test = CliTest::with_file("config.toml", SIMULATION_TOML)?;

    let output = test.run(&["-b", "width,height", SIMULATION_OUTPUT, "config.toml"])?;
    assert!(output.status.success());

    let written: Value = toml::from_str(&test.read_file("out/normal/800x600_200.toml")?)?;
    assert_eq!(
        written["output"]["dir"],
        json!("data/{width}x{height}_{size|%03d}_{simulation.mode}{id}.dat")
    );

    Ok(())
}

#[test]
fn test_unbound_arrays_form_a_product() -> Result<()> {
    let test = CliTest::with_file("config.toml", SIMULATION_TOML)?;

    let output = test.run(&["{width}x{height}.toml", "config.toml"])?;
    assert!(output.status.success());
    assert_eq!(
        test.list_files(".")?,
        [
            "640x480.toml",
            "640x600.toml",
            "800x480.toml",
            "800x600.toml",
            "config.toml",
        ]
    );

    Ok(())
}

#[test]
fn test_verbose_lists_paths_in_generation_order() -> Result<()> {
    let test = CliTest::with_file("config.toml", SIMULATION_TOML)?;

    let output = test.run(&simulation_args(&["--verbose"]))?;
    assert!(output.status.success());

    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 13);
    assert_eq!(
        lines[..4],
        [
            "out/normal/640x480_005.toml",
            "out/normal/640x480_010.toml",
            "out/normal/640x480_200.toml",
            "out/normal/800x600_005.toml",
        ]
    );
    assert_eq!(lines[11], "out/crazy/800x600_200.toml");
    assert_eq!(lines[12], "\u{2713} Generated 12 files");

    Ok(())
}

#[test]
fn test_dry_run_writes_nothing() -> Result<()> {
    let test = CliTest::with_file("config.toml", SIMULATION_TOML)?;

    let output = test.run(&simulation_args(&["-n"]))?;
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.starts_with("out/normal/640x480_005.toml\n"));
    assert!(out.ends_with("\u{2713} Would generate 12 files\n"));
    assert!(!test.root().join("out").exists());

    Ok(())
}

#[test]
fn test_json_input_to_toml_output() -> Result<()> {
    let test = CliTest::with_file(
        "config.json",
        r#"{"name": "run", "seed": [1, 2], "params": {"rate": 0.5}}"#,
    )?;

    let output = test.run(&["seed-{seed}.toml", "config.json"])?;
    assert!(output.status.success());
    assert_eq!(stdout(&output), "\u{2713} Generated 2 files\n");

    let written: Value = toml::from_str(&test.read_file("seed-2.toml")?)?;
    assert_eq!(
        written,
        json!({"name": "run", "seed": 2, "params": {"rate": 0.5}})
    );

    Ok(())
}

#[test]
fn test_toml_input_to_json_output() -> Result<()> {
    let test = CliTest::with_file("config.toml", "mode = [\"a\", \"b\"]\nlevel = 3\n")?;

    let output = test.run(&["{mode}.json", "config.toml"])?;
    assert!(output.status.success());
    assert_eq!(
        test.read_file("b.json")?,
        "{\n  \"mode\": \"b\",\n  \"level\": 3\n}\n"
    );

    Ok(())
}

#[test]
fn test_quoted_key_with_format() -> Result<()> {
    let test = CliTest::with_file(
        "config.toml",
        "[\"sim params\"]\nrate = [0.5, 0.25]\n",
    )?;

    let output = test.run(&[r#"r_{"sim params".rate|%.2f}.json"#, "config.toml"])?;
    assert!(output.status.success());
    assert_eq!(test.list_files(".")?, ["config.toml", "r_0.25.json", "r_0.50.json"]);

    Ok(())
}

#[test]
fn test_no_placeholders_generates_one_file() -> Result<()> {
    let test = CliTest::with_file("config.toml", SIMULATION_TOML)?;

    let output = test.run(&["copy.toml", "config.toml"])?;
    assert!(output.status.success());
    assert_eq!(stdout(&output), "\u{2713} Generated 1 file\n");

    let copy: Value = toml::from_str(&test.read_file("copy.toml")?)?;
    let original: Value = toml::from_str(SIMULATION_TOML)?;
    assert_eq!(copy, original);

    Ok(())
}

#[test]
fn test_toml_datetimes_survive_expansion() -> Result<()> {
    let test = CliTest::with_file(
        "config.toml",
        "started = 1979-05-27T07:32:00Z\nseed = [1, 2]\nlabel = \"run {started}\"\n",
    )?;

    let output = test.run(&["-r", "label", "seed-{seed}.toml", "config.toml"])?;
    assert!(output.status.success());

    let written = test.read_file("seed-1.toml")?;
    assert!(written.contains("started = 1979-05-27T07:32:00Z\n"), "{written}");
    assert!(written.contains("label = \"run 1979-05-27T07:32:00Z\"\n"), "{written}");

    Ok(())
}
