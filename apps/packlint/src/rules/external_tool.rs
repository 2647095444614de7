//! Bridge to the optional Minecraft Creator Tools validator.
//!
//! The tool runs as a child process under a timeout. Absence, timeout,
//! launch failure and non-zero exit each become a single warning; nothing
//! here fails the run.
//! Results are read from the output directory (structured `.json` or
//! line-oriented `.txt`), falling back to the tool's stdout.

use super::{Rule, RuleContext};
use crate::config::CreatorToolsCfg;
use crate::error::RuleError;
use crate::files;
use crate::models::{Finding, Report, Severity};
use serde_json::Value as Json;
use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL: Duration = Duration::from_millis(100);

pub struct ExternalToolRule;

enum Outcome {
    Finished {
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },
    NotFound,
    TimedOut,
}

impl Rule for ExternalToolRule {
    fn id(&self) -> &'static str {
        "external-tool"
    }

    fn name(&self) -> &'static str {
        "External Validator"
    }

    fn description(&self) -> &'static str {
        "Runs Minecraft Creator Tools validation when enabled"
    }

    fn validate(&self, ctx: &RuleContext<'_>) -> Result<Report, RuleError> {
        let mut report = Report::new();
        let cfg = &ctx.settings.minecraft_creator_tools;
        if !cfg.enabled {
            tracing::debug!("external validator disabled");
            return Ok(report);
        }
        let started = tempfile::tempdir()
            .and_then(|dir| run_tool(cfg, &ctx.packs.root, dir.path()).map(|o| (dir, o)));
        let (out_dir, outcome) = match started {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!(error = %e, command = %cfg.command, "external validator failed to run");
                report.add(
                    Finding::warning(format!("Minecraft Creator Tools integration error: {}", e))
                        .context("command", cfg.command.as_str()),
                );
                return Ok(report);
            }
        };
        match outcome {
            Outcome::NotFound => {
                tracing::warn!(command = %cfg.command, "external validator not found");
                report.add(Finding::warning(format!(
                    "Minecraft Creator Tools not available ('{}' not found)",
                    cfg.command
                )));
            }
            Outcome::TimedOut => {
                report.add(
                    Finding::warning(format!(
                        "Minecraft Creator Tools validation timed out after {}s",
                        cfg.timeout_seconds
                    ))
                    .context("timeout_seconds", cfg.timeout_seconds),
                );
            }
            Outcome::Finished {
                status,
                stdout,
                stderr,
            } => {
                if !status.success() {
                    report.add(
                        Finding::warning("Minecraft Creator Tools validation failed")
                            .context("exit_code", status.code().unwrap_or(-1))
                            .context("stderr", stderr.trim()),
                    );
                }
                let parsed = parse_output_dir(out_dir.path());
                if parsed.findings().is_empty() {
                    report.merge(parse_text_output(&stdout, None));
                } else {
                    report.merge(parsed);
                }
            }
        }
        Ok(report)
    }
}

fn run_tool(cfg: &CreatorToolsCfg, root: &Path, out_dir: &Path) -> io::Result<Outcome> {
    let mut cmd = Command::new(&cfg.command);
    cmd.args(&cfg.args)
        .arg("validate")
        .arg(&cfg.validation_suite)
        .arg("-i")
        .arg(root)
        .arg("-o")
        .arg(out_dir);
    if cfg.log_verbose {
        cmd.arg("--log-verbose");
    }
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    tracing::debug!(command = ?cmd, "running external validator");
    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Outcome::NotFound),
        Err(e) => return Err(e),
    };
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());
    let deadline = Instant::now() + Duration::from_secs(cfg.timeout_seconds);
    let status = match wait_until(&mut child, deadline)? {
        Some(s) => s,
        None => {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(Outcome::TimedOut);
        }
    };
    Ok(Outcome::Finished {
        status,
        stdout: stdout.join().unwrap_or_default(),
        stderr: stderr.join().unwrap_or_default(),
    })
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut p) = pipe {
            let _ = p.read_to_string(&mut buf);
        }
        buf
    })
}

fn wait_until(child: &mut Child, deadline: Instant) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL);
    }
}

fn parse_output_dir(dir: &Path) -> Report {
    let mut report = Report::new();
    for file in files::files_with_ext(dir, &["json", "txt"]) {
        if files::has_ext(&file, &["json"]) {
            if let Some(json) = files::json_or_skip(&file) {
                report.merge(parse_json_output(&json, &file));
            }
        } else if let Some(text) = files::text_or_skip(&file) {
            report.merge(parse_text_output(&text, Some(&file)));
        }
    }
    report
}

/// Structured output: `errors` and `warnings` lists plus a `validation`
/// map whose keys mentioning "error" are errors.
pub fn parse_json_output(json: &Json, source: &Path) -> Report {
    let mut report = Report::new();
    let sections = [("errors", Severity::Error), ("warnings", Severity::Warning)];
    for (key, severity) in sections {
        for item in json.get(key).and_then(|v| v.as_array()).into_iter().flatten() {
            report.add(tool_finding(severity, key, item, source));
        }
    }
    if let Some(validation) = json.get("validation").and_then(|v| v.as_object()) {
        for (key, value) in validation {
            let severity = if key.to_lowercase().contains("error") {
                Severity::Error
            } else {
                Severity::Warning
            };
            for item in value.as_array().into_iter().flatten() {
                report.add(tool_finding(severity, key, item, source));
            }
        }
    }
    report
}

fn tool_finding(severity: Severity, section: &str, item: &Json, source: &Path) -> Finding {
    let message = item
        .get("message")
        .and_then(|m| m.as_str())
        .map(|s| s.to_string())
        .or_else(|| item.as_str().map(|s| s.to_string()))
        .unwrap_or_else(|| item.to_string());
    let mut f = Finding::new(severity, format!("MCT {}: {}", section, message))
        .context("mct_result", item.clone());
    match item.get("file").and_then(|v| v.as_str()) {
        Some(file) => f.file_path = Some(file.to_string()),
        None => f = f.at(source),
    }
    if let Some(line) = item.get("line").and_then(|v| v.as_u64()) {
        f = f.line(line as usize);
    }
    f
}

/// Line-oriented output: lines carrying `ERROR:`, `WARNING:` or `FAILED:`.
pub fn parse_text_output(text: &str, source: Option<&Path>) -> Report {
    let mut report = Report::new();
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let upper = line.to_uppercase();
        let severity = if upper.contains("ERROR:") || upper.contains("FAILED:") {
            Severity::Error
        } else if upper.contains("WARNING:") {
            Severity::Warning
        } else {
            continue;
        };
        let mut f = Finding::new(severity, format!("MCT: {}", line)).context("mct_line", line);
        if let Some(src) = source {
            f = f.at(src);
        }
        report.add(f);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::models::NamespaceInfo;
    use crate::packs::PackPaths;
    use serde_json::json;

    fn run(cfg: CreatorToolsCfg) -> Report {
        let tmp = tempfile::tempdir().unwrap();
        let settings = Settings {
            minecraft_creator_tools: cfg,
            ..Settings::default()
        };
        let packs = PackPaths::resolve(tmp.path());
        let ns = NamespaceInfo::default();
        ExternalToolRule
            .validate(&RuleContext {
                settings: &settings,
                packs: &packs,
                namespace: &ns,
            })
            .unwrap()
    }

    #[test]
    fn test_disabled_yields_nothing() {
        assert!(run(CreatorToolsCfg::default()).findings().is_empty());
    }

    #[test]
    fn test_missing_tool_is_single_warning() {
        let r = run(CreatorToolsCfg {
            enabled: true,
            command: "packlint-no-such-validator".into(),
            args: vec![],
            ..CreatorToolsCfg::default()
        });
        assert_eq!(r.findings().len(), 1);
        assert_eq!(r.count(Severity::Warning), 1);
        assert!(r.is_valid());
    }

    #[cfg(unix)]
    #[test]
    fn test_unlaunchable_tool_is_single_warning() {
        let tmp = tempfile::tempdir().unwrap();
        let script = tmp.path().join("mct");
        std::fs::write(&script, "#!/bin/sh\nexit 0\n").unwrap();
        let r = run(CreatorToolsCfg {
            enabled: true,
            command: script.to_string_lossy().to_string(),
            args: vec![],
            ..CreatorToolsCfg::default()
        });
        assert_eq!(r.findings().len(), 1);
        assert_eq!(r.count(Severity::Warning), 1);
        assert!(r.findings()[0].message.contains("integration error"));
        assert!(r.is_valid());
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_is_single_warning() {
        let started = Instant::now();
        let r = run(CreatorToolsCfg {
            enabled: true,
            command: "sh".into(),
            args: vec!["-c".into(), "sleep 5".into()],
            timeout_seconds: 1,
            ..CreatorToolsCfg::default()
        });
        assert!(started.elapsed() < Duration::from_secs(3));
        assert_eq!(r.findings().len(), 1);
        assert!(r.findings()[0].message.contains("timed out after 1s"));
        assert!(r.is_valid());
    }

    #[test]
    fn test_parse_json_sections() {
        let out = json!({
            "errors": [{"message": "Bad uuid", "file": "BP/manifest.json", "line": 3}],
            "warnings": ["Large texture"],
            "validation": {
                "texture_errors": [{"message": "Missing texture"}],
                "hints": [{"message": "Unused file"}]
            }
        });
        let r = parse_json_output(&out, Path::new("report.json"));
        assert_eq!(r.count(Severity::Error), 2);
        assert_eq!(r.count(Severity::Warning), 2);
        let first = &r.findings()[0];
        assert_eq!(first.message, "MCT errors: Bad uuid");
        assert_eq!(first.file_path.as_deref(), Some("BP/manifest.json"));
        assert_eq!(first.line_number, Some(3));
        assert_eq!(r.findings()[1].message, "MCT warnings: Large texture");
    }

    #[test]
    fn test_parse_text_lines() {
        let text = "Validating...\nERROR: missing icon\n  warning: large file\nFAILED: suite addon\n";
        let r = parse_text_output(text, None);
        assert_eq!(r.count(Severity::Error), 2);
        assert_eq!(r.count(Severity::Warning), 1);
        assert_eq!(r.findings()[1].message, "MCT: warning: large file");
    }
}
