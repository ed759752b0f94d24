use anyhow::{Context, Result};
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// Copy of the fixture project in a temporary directory.
struct PhyloTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl PhyloTestEnv {
    fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let project_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .context("Workspace root not found")?
            .join("fixtures/view_bovine");

        let dest = tmp.path().join("view_bovine");
        Self::copy_dir(&project_root, &dest)?;

        Ok(Self {
            _tmp: tmp,
            root: dest,
        })
    }

    fn copy_dir(src: &PathBuf, dst: &PathBuf) -> std::io::Result<()> {
        let mut options = fs_extra::dir::CopyOptions::new();
        options.skip_exist = true;
        options.content_only = true;

        std::fs::create_dir_all(dst)?;
        fs_extra::dir::copy(src, dst, &options)
            .map(|_| ())
            .map_err(|e| std::io::Error::other(e.to_string()))
    }

    fn btbphylo(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("btbphylo"));
        cmd.current_dir(&self.root);
        cmd.env("RUST_LOG", "off")
            .env_remove("RUST_BACKTRACE")
            .env_remove("RUST_LIB_BACKTRACE");
        cmd
    }

    fn read(&self, relative: &str) -> Result<String> {
        let path = self.root.join(relative);
        fs::read_to_string(&path).with_context(|| format!("missing output {}", path.display()))
    }

    fn first_column(&self, relative: &str) -> Result<Vec<String>> {
        Ok(self
            .read(relative)?
            .lines()
            .skip(1)
            .map(|line| line.split(',').next().unwrap_or_default().to_string())
            .collect())
    }
}

#[test]
fn test_view_bovine_writes_every_output() -> Result<()> {
    let env = PhyloTestEnv::new()?;

    env.btbphylo()
        .arg("view-bovine")
        .assert()
        .success()
        .stdout(predicate::str::contains("SUCCESS"))
        .stdout(predicate::str::contains("number_of_excluded_samples"));

    assert_eq!(env.first_column("results/deduped_wgs.csv")?.len(), 8);
    assert_eq!(
        env.first_column("results/passed_samples.csv")?,
        vec![
            "AF-12-00004-20",
            "AF-12-00005-20",
            "AF-61-04543-18",
            "AF-12-00001-20"
        ]
    );
    assert_eq!(
        env.first_column("results/consistified_wgs.csv")?,
        vec!["AF-12-00004-20", "AF-12-00005-20", "AF-61-04543-18"]
    );
    assert_eq!(
        env.read("results/consistified_cattle.csv")?,
        "CVLRef,clade,Eartag\n\
         AF-12-00004-20,B1-11,UK100004\n\
         AF-12-00005-20,B1-11,UK100005\n\
         AF-61-04543-18,B6-11,UK104543\n"
    );
    assert_eq!(
        env.first_column("results/consistified_movement.csv")?,
        vec!["AF-12-00004-20", "AF-12-00005-20", "AF-61-04543-18"]
    );
    assert_eq!(
        env.read("results/missing/missing_wgs.csv")?,
        "Submission\nAF-12-00002-20\nAF-99-99999-99\n"
    );
    assert_eq!(env.read("results/missing/missing_cattle.csv")?, "Submission\n");
    assert_eq!(
        env.read("results/missing/missing_movement.csv")?,
        "Submission\nAF-12-00001-20\nAF-12-00002-20\n"
    );

    insta::assert_snapshot!(env.read("results/report.csv")?.trim_end(), @r"
    Submission,Outcome,flag,pcMapped,Ncount,wgs_data,cattle_data,movement_data,eartag
    AF-12-00001-20,Pass,BritishbTB,Pass,Pass,True,True,False,UK100001
    AF-12-00002-20,Pass,BritishbTB,Pass,Fail,True,True,False,UK100002
    AF-12-00003-20,Pass,BritishbTB,Fail,Pass,True,True,True,
    AF-12-00006-20,LowCoverage,BritishbTB,Pass,Pass,True,True,True,
    AF-12-00007-20,Pass,BritishbTB,Pass,Pass,True,True,True,
    AF-12-00002-20,,,,,False,True,False,UK100002
    AF-99-99999-99,,,,,False,True,True,UK199999
    ");

    let metadata: serde_json::Value = serde_json::from_str(&env.read("results/metadata/metadata.json")?)?;
    assert_eq!(metadata["total_number_of_wgs_samples"], 9);
    assert_eq!(metadata["number_of_deduplicated_samples"], 8);
    assert_eq!(metadata["number_of_passed_samples"], 4);
    assert_eq!(metadata["wgs_records_after"], 3);
    assert_eq!(metadata["movement_records_after"], 3);
    assert_eq!(metadata["number_of_excluded_samples"], 7);
    assert_eq!(metadata["skipped_clades"], serde_json::json!(["B3-11"]));
    assert!(metadata["generated_at"].is_string());
    Ok(())
}

#[test]
fn test_filter_rejects_inline_and_file_criteria() -> Result<()> {
    let env = PhyloTestEnv::new()?;
    fs::write(env.root.join("filters.json"), r#"{"pcMapped": [95, 100]}"#)?;

    let output = env
        .btbphylo()
        .args(["filter", "-c", "B6-11", "--pcmapped", "90", "100"])
        .args(["--config", "filters.json"])
        .output()?;

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr)?;
    insta::assert_snapshot!(
        stderr.trim_end(),
        @"Error: Conflicting arguments: group, pcMapped cannot be combined with a filter config file"
    );
    assert!(!env.root.join("results/passed_samples.csv").exists());
    Ok(())
}

#[test]
fn test_filter_with_config_file() -> Result<()> {
    let env = PhyloTestEnv::new()?;
    fs::write(
        env.root.join("filters.yaml"),
        "group: [B1-11]\nNcount: [0, 5]\n",
    )?;

    env.btbphylo()
        .args(["filter", "--config", "filters.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 samples passed"));

    // The file replaces the project filter, so pcMapped is not checked.
    assert_eq!(
        env.first_column("results/passed_samples.csv")?,
        vec!["AF-12-00003-20", "AF-12-00004-20"]
    );
    Ok(())
}

#[test]
fn test_absent_filter_value_is_logged_once() -> Result<()> {
    let env = PhyloTestEnv::new()?;

    let output = env
        .btbphylo()
        .env("RUST_LOG", "warn")
        .args(["filter", "--flag", "BritishbTB", "nonbTB"])
        .output()?;

    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr)?;
    let warnings: Vec<&str> = stderr
        .lines()
        .filter(|line| line.contains("not present in column"))
        .collect();
    assert_eq!(warnings.len(), 1, "{stderr}");
    assert!(warnings[0].contains("nonbTB"));
    Ok(())
}

#[test]
fn test_filter_wipe_out_needs_flag() -> Result<()> {
    let env = PhyloTestEnv::new()?;

    env.btbphylo()
        .args(["filter", "-c", "B3-11"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Insufficient samples"));

    env.btbphylo()
        .args(["filter", "-c", "B3-11", "--allow-wipe-out"])
        .assert()
        .success();
    assert_eq!(
        env.first_column("results/passed_samples.csv")?,
        vec!["AF-12-00007-20"]
    );
    Ok(())
}

#[test]
fn test_stage_by_stage_matches_pipeline_steps() -> Result<()> {
    let env = PhyloTestEnv::new()?;

    env.btbphylo()
        .arg("de-duplicate")
        .assert()
        .success()
        .stdout(predicate::str::contains("8 unique samples"));

    env.btbphylo()
        .args(["filter", "--input", "results/deduped_wgs.csv"])
        .assert()
        .success();
    // Project filter only: pcMapped in [90, 100], flag BritishbTB, Outcome Pass.
    assert_eq!(env.first_column("results/passed_samples.csv")?.len(), 6);

    env.btbphylo().arg("consistify").assert().success();
    assert_eq!(
        env.first_column("results/consistified_wgs.csv")?,
        vec!["AF-61-04543-18", "AF-12-00004-20", "AF-12-00005-20"]
    );

    env.btbphylo()
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("excluded samples listed"));
    assert_eq!(
        env.first_column("results/report.csv")?,
        vec![
            "AF-12-00001-20",
            "AF-12-00002-20",
            "AF-12-00003-20",
            "AF-12-00006-20",
            "AF-12-00007-20",
            "AF-99-99999-99"
        ]
    );
    Ok(())
}

#[test]
fn test_thresholds_from_summary() -> Result<()> {
    let env = PhyloTestEnv::new()?;

    env.btbphylo()
        .arg("thresholds")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 clade thresholds"));

    assert_eq!(
        env.read("results/CladeInfo.csv")?,
        "clade,maxN\nB1-11,6\nB3-11,3\nB6-11,216\n"
    );
    Ok(())
}

#[test]
fn test_update_samples_appends_new_batches_once() -> Result<()> {
    let env = PhyloTestEnv::new()?;
    let batch_dir = env.root.join("batches/run_42");
    fs::create_dir_all(&batch_dir)?;
    fs::write(
        batch_dir.join("run_42_FinalOut_01.csv"),
        "Sample,pcMapped,Outcome,flag,group,Ncount\n\
         20-01234-21_S7,99.4,Pass,BritishbTB,B6-11,12\n",
    )?;

    for _ in 0..2 {
        env.btbphylo()
            .args(["update-samples", "--batches", "batches"])
            .assert()
            .success();
    }

    let summary = env.read("all_wgs_samples.csv")?;
    assert_eq!(summary.lines().count(), 11);
    assert!(summary.contains("AF-20-01234-21"));
    Ok(())
}

#[test]
fn test_update_samples_keeps_extra_summary_columns() -> Result<()> {
    let env = PhyloTestEnv::new()?;
    let annotated: String = env
        .read("all_wgs_samples.csv")?
        .lines()
        .enumerate()
        .map(|(i, line)| {
            let note = if i == 0 { "Notes" } else { "keep-me" };
            format!("{line},{note}\n")
        })
        .collect();
    fs::write(env.root.join("all_wgs_samples.csv"), annotated)?;

    let batch_dir = env.root.join("batches/run_43");
    fs::create_dir_all(&batch_dir)?;
    fs::write(
        batch_dir.join("run_43_FinalOut.csv"),
        "Sample,pcMapped,Outcome,flag,group,Ncount\n\
         20-05678-21_S2,98.0,Pass,BritishbTB,B1-11,3\n",
    )?;

    env.btbphylo()
        .args(["update-samples", "--batches", "batches"])
        .assert()
        .success();

    let summary = env.read("all_wgs_samples.csv")?;
    let mut lines = summary.lines();
    assert!(lines.next().is_some_and(|h| h.ends_with(",Submission,Notes")));
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 10);
    assert!(rows[..9].iter().all(|row| row.ends_with(",keep-me")));
    assert!(rows[9].ends_with(",AF-20-05678-21,"));
    Ok(())
}

#[test]
fn test_missing_project_config_fails() -> Result<()> {
    let env = PhyloTestEnv::new()?;
    fs::remove_file(env.root.join("btbphylo.yaml"))?;

    env.btbphylo()
        .arg("view-bovine")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No configuration file found"));
    Ok(())
}
