use clap::Args;
use routebind_core::config::CONFIG_FILE;
use routebind_core::emitter::GENERATED_HEADER;
use routebind_core::{GeneratedModule, GeneratorConfig, Target, generate};
use similar::{ChangeTag, TextDiff};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::cli::run_cli;

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(
        long = "config",
        value_name = "PATH",
        help = "Configuration file. Defaults to ./routebind.toml when present"
    )]
    pub config: Option<PathBuf>,

    #[arg(long = "input", value_name = "PATH", help = "Route descriptor document (JSON)")]
    pub input: Option<PathBuf>,

    #[arg(
        long = "out-dir",
        value_name = "PATH",
        help = "Output directory, one sub-directory per target"
    )]
    pub out_dir: Option<PathBuf>,

    #[arg(
        long = "target",
        value_name = "NAME",
        help = "Target to generate (repeatable). Overrides the configured targets"
    )]
    pub targets: Vec<Target>,

    #[arg(
        long = "check",
        help = "Write nothing; fail when generated files are missing or out of date"
    )]
    pub check: bool,
}

pub fn run(args: GenerateArgs) -> i32 {
    run_cli(|| run_inner(args))
}

/// A generated module compared against what is on disk.
#[derive(Debug)]
struct FileChange {
    /// Path relative to the output directory
    rel_path: String,
    /// Freshly generated content; `None` for an orphaned module
    new_content: Option<String>,
    /// Existing content (None if file doesn't exist)
    existing_content: Option<String>,
}

impl FileChange {
    fn is_new(&self) -> bool {
        self.existing_content.is_none()
    }

    fn is_modified(&self) -> bool {
        match (&self.existing_content, &self.new_content) {
            (Some(existing), Some(new)) => existing != new,
            _ => false,
        }
    }

    fn is_orphaned(&self) -> bool {
        self.new_content.is_none()
    }

    fn is_unchanged(&self) -> bool {
        !self.is_new() && !self.is_modified() && !self.is_orphaned()
    }

    /// Unified diff between the file on disk and the fresh output.
    fn generate_diff(&self) -> Option<String> {
        let existing = self.existing_content.as_deref()?;
        let new = self.new_content.as_deref().unwrap_or_default();
        if existing == new {
            return None;
        }

        let diff = TextDiff::from_lines(existing, new);
        let mut output = String::new();

        output.push_str(&format!("\x1b[1m--- {} (current)\x1b[0m\n", self.rel_path));
        output.push_str(&format!("\x1b[1m+++ {} (generated)\x1b[0m\n", self.rel_path));

        for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
            if idx > 0 {
                output.push_str("...\n");
            }
            for op in group {
                for change in diff.iter_changes(op) {
                    let (sign, color) = match change.tag() {
                        ChangeTag::Delete => ("-", "\x1b[31m"),
                        ChangeTag::Insert => ("+", "\x1b[32m"),
                        ChangeTag::Equal => (" ", ""),
                    };
                    output.push_str(color);
                    output.push_str(sign);
                    output.push_str(change.value());
                    if change.missing_newline() {
                        output.push('\n');
                    }
                    if !color.is_empty() {
                        output.push_str("\x1b[0m");
                    }
                }
            }
        }

        Some(output)
    }
}

fn run_inner(args: GenerateArgs) -> Result<(), String> {
    let config = load_config(args.config.as_deref())?;

    let input = args
        .input
        .or_else(|| config.input.clone())
        .ok_or_else(|| format!("No input document. Pass --input or set `input` in {CONFIG_FILE}"))?;
    let out_dir = args
        .out_dir
        .or_else(|| config.out_dir.clone())
        .ok_or_else(|| {
            format!("No output directory. Pass --out-dir or set `out_dir` in {CONFIG_FILE}")
        })?;
    let targets = unique_targets(if args.targets.is_empty() {
        config.targets()
    } else {
        args.targets
    });
    let options = config.emit_options().map_err(|err| err.to_string())?;

    let json = fs::read_to_string(&input)
        .map_err(|err| format!("Failed to read {}: {err}", input.display()))?;
    let emission = generate(&json, &targets, &options).map_err(|err| err.to_string())?;

    let changes = collect_file_changes(&out_dir, &targets, &emission.modules)?;
    debug!(
        out_dir = %out_dir.display(),
        files = changes.len(),
        "Compared generated modules with disk."
    );

    if args.check {
        check(&changes)
    } else {
        apply(&out_dir, &changes)
    }
}

/// Drop repeated targets, keeping first-seen order.
fn unique_targets(mut targets: Vec<Target>) -> Vec<Target> {
    let mut seen = HashSet::new();
    targets.retain(|target| seen.insert(*target));
    targets
}

fn load_config(path: Option<&Path>) -> Result<GeneratorConfig, String> {
    match path {
        Some(path) => GeneratorConfig::load(path).map_err(|err| err.to_string()),
        None => {
            let default = Path::new(CONFIG_FILE);
            if default.exists() {
                GeneratorConfig::load(default).map_err(|err| err.to_string())
            } else {
                Ok(GeneratorConfig::default())
            }
        }
    }
}

/// Pair every generated module with the file on disk, and pick up previously
/// generated modules of the same targets that are no longer produced.
fn collect_file_changes(
    out_dir: &Path,
    targets: &[Target],
    modules: &[GeneratedModule],
) -> Result<Vec<FileChange>, String> {
    let mut changes = Vec::with_capacity(modules.len());
    for module in modules {
        changes.push(FileChange {
            rel_path: module.path.clone(),
            new_content: Some(module.contents.clone()),
            existing_content: read_existing(&out_dir.join(&module.path))?,
        });
    }

    let generated: BTreeSet<&str> = modules.iter().map(|m| m.path.as_str()).collect();
    for target in targets {
        let dir = out_dir.join(target.name());
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        let mut orphans = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| format!("Failed to list {}: {err}", dir.display()))?;
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "ts") {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let rel_path = format!("{}/{file_name}", target.name());
            if generated.contains(rel_path.as_str()) {
                continue;
            }
            // Hand-written files next to generated ones are left alone.
            if let Some(existing) = read_existing(&path)?
                && is_generated(&existing)
            {
                orphans.push(FileChange {
                    rel_path,
                    new_content: None,
                    existing_content: Some(existing),
                });
            }
        }
        orphans.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
        changes.extend(orphans);
    }

    Ok(changes)
}

fn read_existing(path: &Path) -> Result<Option<String>, String> {
    if !path.exists() {
        return Ok(None);
    }
    fs::read_to_string(path)
        .map(Some)
        .map_err(|err| format!("Failed to read {}: {err}", path.display()))
}

fn is_generated(contents: &str) -> bool {
    contents
        .lines()
        .next()
        .is_some_and(|line| line.trim_start_matches("//").trim() == GENERATED_HEADER)
}

fn check(changes: &[FileChange]) -> Result<(), String> {
    let mut stale = 0;
    for change in changes {
        if change.is_new() {
            println!("\x1b[32m+\x1b[0m {} (missing)", change.rel_path);
            stale += 1;
        } else if change.is_orphaned() {
            println!("\x1b[31m-\x1b[0m {} (no longer generated)", change.rel_path);
            stale += 1;
        } else if let Some(diff) = change.generate_diff() {
            println!("{diff}");
            stale += 1;
        }
    }

    if stale == 0 {
        println!("All {} generated file(s) are up to date.", changes.len());
        Ok(())
    } else {
        Err(format!(
            "{stale} generated file(s) are out of date. Run `routebind generate` to update them."
        ))
    }
}

fn apply(out_dir: &Path, changes: &[FileChange]) -> Result<(), String> {
    let mut created = 0;
    let mut modified = 0;
    let mut removed = 0;

    for change in changes {
        let target_path = out_dir.join(&change.rel_path);
        match &change.new_content {
            Some(content) if change.is_new() || change.is_modified() => {
                if let Some(parent) = target_path.parent() {
                    fs::create_dir_all(parent)
                        .map_err(|err| format!("Failed to create directory: {err}"))?;
                }
                fs::write(&target_path, content)
                    .map_err(|err| format!("Failed to write {}: {err}", change.rel_path))?;

                if change.is_new() {
                    created += 1;
                } else {
                    modified += 1;
                }
            }
            Some(_) => {}
            None => {
                fs::remove_file(&target_path)
                    .map_err(|err| format!("Failed to remove {}: {err}", change.rel_path))?;
                removed += 1;
            }
        }
    }

    let unchanged = changes.iter().filter(|c| c.is_unchanged()).count();
    info!(created, modified, removed, unchanged, "Generation finished.");
    println!(
        "\x1b[32m✓\x1b[0m Generated into {}: {created} created, {modified} modified, \
         {removed} removed, {unchanged} unchanged",
        out_dir.display()
    );

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn module(path: &str, contents: &str) -> GeneratedModule {
        GeneratedModule {
            target: "swr",
            path: path.into(),
            contents: contents.into(),
        }
    }

    #[test]
    fn test_repeated_targets_are_kept_once() {
        assert_eq!(
            unique_targets(vec![Target::Swr, Target::VueQuery, Target::Swr]),
            [Target::Swr, Target::VueQuery]
        );
    }

    #[test]
    fn test_header_detection() {
        assert!(is_generated("// Code generated by routebind. DO NOT EDIT.\n\nexport {};\n"));
        assert!(!is_generated("// hand written\n"));
        assert!(!is_generated(""));
    }

    #[test]
    fn test_diff_marks_changed_lines() {
        let change = FileChange {
            rel_path: "swr/gateway.ts".into(),
            new_content: Some("a\nB\nc\n".into()),
            existing_content: Some("a\nb\nc\n".into()),
        };
        assert!(change.is_modified());
        let diff = change.generate_diff().unwrap();
        assert!(diff.contains("--- swr/gateway.ts (current)"));
        assert!(diff.contains("\x1b[31m-b\n"));
        assert!(diff.contains("\x1b[32m+B\n"));
    }

    #[test]
    fn test_collect_finds_new_unchanged_and_orphaned() {
        let dir = tempfile::tempdir().unwrap();
        let swr = dir.path().join("swr");
        fs::create_dir_all(&swr).unwrap();
        fs::write(swr.join("index.ts"), "same").unwrap();
        fs::write(
            swr.join("legacy.ts"),
            format!("// {GENERATED_HEADER}\nexport {{}};\n"),
        )
        .unwrap();
        fs::write(swr.join("custom.ts"), "export const x = 1;\n").unwrap();

        let modules = [module("swr/gateway.ts", "new"), module("swr/index.ts", "same")];
        let changes = collect_file_changes(dir.path(), &[Target::Swr], &modules).unwrap();

        let summary: Vec<_> = changes
            .iter()
            .map(|c| (c.rel_path.as_str(), c.is_new(), c.is_unchanged(), c.is_orphaned()))
            .collect();
        assert_eq!(
            summary,
            [
                ("swr/gateway.ts", true, false, false),
                ("swr/index.ts", false, true, false),
                ("swr/legacy.ts", false, false, true),
            ]
        );
    }

    #[test]
    fn test_apply_writes_only_changes() {
        let dir = tempfile::tempdir().unwrap();
        let modules = [module("swr/gateway.ts", "one")];
        let changes = collect_file_changes(dir.path(), &[Target::Swr], &modules).unwrap();
        apply(dir.path(), &changes).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("swr/gateway.ts")).unwrap(), "one");

        let changes = collect_file_changes(dir.path(), &[Target::Swr], &modules).unwrap();
        assert!(changes.iter().all(FileChange::is_unchanged));
        assert!(check(&changes).is_ok());
    }
}
