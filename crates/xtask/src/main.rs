use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use regex_lite::Regex;
use serde::Deserialize;

/// Dependencies each inner crate may declare. Anything else is a layering violation.
const ALLOWED_DEPENDENCIES: &[(&str, &[&str])] = &[
    (
        "charsheet-domain",
        &["chrono", "proptest", "serde", "serde_json", "thiserror", "uuid"],
    ),
    ("charsheet-shared", &["serde", "serde_json", "uuid"]),
];

/// Crates whose paths must never appear in domain sources.
const FORBIDDEN_IN_DOMAIN: &str =
    r"\b(sqlx|tokio|async_trait|tracing|charsheet_engine|charsheet_shared)::";

#[derive(Debug, Deserialize)]
struct Metadata {
    packages: Vec<Package>,
}

#[derive(Debug, Deserialize)]
struct Package {
    name: String,
    manifest_path: PathBuf,
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Deserialize)]
struct Dependency {
    name: String,
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;

    if !output.status.success() {
        anyhow::bail!("cargo metadata failed")
    }

    let metadata: Metadata =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata")?;
    let packages: BTreeMap<&str, &Package> = metadata
        .packages
        .iter()
        .map(|p| (p.name.as_str(), p))
        .collect();

    let mut violations = Vec::new();
    for (crate_name, allowed) in ALLOWED_DEPENDENCIES {
        let package = packages
            .get(crate_name)
            .with_context(|| format!("package {crate_name} missing from workspace"))?;
        violations.extend(dependency_violations(package, allowed));
    }

    let domain = packages
        .get("charsheet-domain")
        .context("package charsheet-domain missing from workspace")?;
    let src = domain
        .manifest_path
        .parent()
        .context("domain manifest has no parent directory")?
        .join("src");
    violations.extend(source_violations(&src)?);

    if !violations.is_empty() {
        for violation in &violations {
            eprintln!("  {violation}");
        }
        anyhow::bail!("arch-check failed with {} violation(s)", violations.len())
    }

    println!("arch-check passed");
    Ok(())
}

fn dependency_violations(package: &Package, allowed: &[&str]) -> Vec<String> {
    package
        .dependencies
        .iter()
        .filter(|dep| !allowed.contains(&dep.name.as_str()))
        .map(|dep| format!("{} depends on {}", package.name, dep.name))
        .collect()
}

fn source_violations(dir: &Path) -> anyhow::Result<Vec<String>> {
    let forbidden = Regex::new(FORBIDDEN_IN_DOMAIN).context("compiling forbidden pattern")?;
    let mut violations = Vec::new();
    for path in rust_files(dir)? {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        violations.extend(scan_source(&path, &text, &forbidden));
    }
    Ok(violations)
}

fn scan_source(path: &Path, text: &str, forbidden: &Regex) -> Vec<String> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim_start().starts_with("//"))
        .filter_map(|(i, line)| {
            forbidden
                .find(line)
                .map(|m| format!("{}:{} uses {}", path.display(), i + 1, m.as_str()))
        })
        .collect()
}

fn rust_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir).with_context(|| format!("listing {}", dir.display()))? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_disallowed_dependencies() {
        let package = Package {
            name: "charsheet-domain".into(),
            manifest_path: PathBuf::from("crates/domain/Cargo.toml"),
            dependencies: vec![
                Dependency { name: "serde".into() },
                Dependency { name: "sqlx".into() },
            ],
        };
        let violations = dependency_violations(&package, &["serde"]);
        assert_eq!(violations, ["charsheet-domain depends on sqlx"]);
    }

    #[test]
    fn flags_infrastructure_paths_but_not_comments() {
        let forbidden = Regex::new(FORBIDDEN_IN_DOMAIN).unwrap();
        let text = "use serde::Serialize;\n// sqlx::query is not used here\nuse tokio::fs;\n";
        let violations = scan_source(Path::new("lib.rs"), text, &forbidden);
        assert_eq!(violations, ["lib.rs:3 uses tokio::"]);
    }

    #[test]
    fn allows_domain_paths() {
        let forbidden = Regex::new(FORBIDDEN_IN_DOMAIN).unwrap();
        let text = "use charsheet_domain::AbilityId;\nuse chrono::TimeDelta;\n";
        assert!(scan_source(Path::new("lib.rs"), text, &forbidden).is_empty());
    }
}
