//! Plan files for `aptsync exec`
//!
//! A plan is either a list of explicit levels:
//!
//! ```toml
//! [[levels]]
//! [[levels.commands]]
//! argv = ["aptly", "mirror", "update", "debian"]
//! requires = { kind = "mirror", name = "debian" }
//! ```
//!
//! or a flat `[[commands]]` list whose `requires`/`provides` are layered
//! against the live aptly state. `requires` and `provides` take one table
//! or a list of tables. An argv starting with `aptly` runs through the
//! configured aptly binary and config file.

use anyhow::{Context, Result};
use aptlykit::{AptlyBackend, OneOrMany, value_or_list};
use levelexec::{Command, Level};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanFile {
    #[serde(default)]
    levels: Vec<LevelEntry>,
    #[serde(default)]
    commands: Vec<CommandEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LevelEntry {
    #[serde(default)]
    commands: Vec<CommandEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CommandEntry {
    argv: Vec<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    requires: OneOrMany<DependencyEntry>,
    #[serde(default)]
    provides: OneOrMany<DependencyEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DependencyEntry {
    kind: String,
    name: String,
}

/// Commands ready to hand to the scheduler
pub enum Plan {
    /// Levels given explicitly by the file
    Leveled(Vec<Level>),
    /// Commands still to be layered by their dependencies
    Flat(Vec<Command>),
}

impl PlanFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse plan file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid plan format")
    }

    /// Build commands, validating every dependency kind.
    pub fn into_plan(self, backend: &AptlyBackend) -> Result<Plan> {
        match (self.levels.is_empty(), self.commands.is_empty()) {
            (false, false) => anyhow::bail!("A plan has either [[levels]] or [[commands]], not both"),
            (true, _) => Ok(Plan::Flat(
                self.commands
                    .into_iter()
                    .map(|entry| entry.into_command(backend))
                    .collect::<Result<_>>()?,
            )),
            (false, true) => Ok(Plan::Leveled(
                self.levels
                    .into_iter()
                    .map(|level| {
                        level
                            .commands
                            .into_iter()
                            .map(|entry| entry.into_command(backend))
                            .collect::<Result<Level>>()
                    })
                    .collect::<Result<_>>()?,
            )),
        }
    }
}

impl CommandEntry {
    fn into_command(self, backend: &AptlyBackend) -> Result<Command> {
        let argv = match self.argv.split_first() {
            None => anyhow::bail!("Command has an empty argv"),
            Some((program, rest)) if program == "aptly" => {
                let rest: Vec<&str> = rest.iter().map(String::as_str).collect();
                backend.argv(&rest)
            }
            Some(_) => self.argv,
        };

        let mut command = Command::new(argv);
        if let Some(label) = self.label {
            command = command.with_label(label);
        }

        let label = command.label();
        for dep in value_or_list(self.requires) {
            command
                .require(&dep.kind, dep.name)
                .with_context(|| format!("Invalid requirement of `{label}`"))?;
        }
        for dep in value_or_list(self.provides) {
            command
                .provide(&dep.kind, dep.name)
                .with_context(|| format!("Invalid provided artifact of `{label}`"))?;
        }

        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use levelexec::{Action, Dependency};

    fn backend() -> AptlyBackend {
        AptlyBackend::new("/opt/aptly/bin/aptly").with_config("/srv/aptly.conf")
    }

    #[test]
    fn test_leveled_plan() {
        let plan = PlanFile::parse(
            r#"
[[levels]]
[[levels.commands]]
argv = ["aptly", "mirror", "update", "debian"]
requires = { kind = "mirror", name = "debian" }

[[levels.commands]]
argv = ["aptly", "mirror", "update", "ubuntu"]
requires = [{ kind = "mirror", name = "ubuntu" }]

[[levels]]
[[levels.commands]]
argv = ["touch", "/tmp/done"]
label = "mark done"
"#,
        )
        .unwrap();

        let Plan::Leveled(levels) = plan.into_plan(&backend()).unwrap() else {
            panic!("expected leveled plan");
        };
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].len(), 2);
        assert!(levels[0][0].required().contains(&Dependency::mirror("debian")));
        assert!(levels[0][1].required().contains(&Dependency::mirror("ubuntu")));
        assert_eq!(levels[1][0].label(), "mark done");
    }

    #[test]
    fn test_aptly_argv_uses_configured_binary() {
        let plan = PlanFile::parse(
            r#"
[[commands]]
argv = ["aptly", "snapshot", "create", "s1", "from", "mirror", "debian"]
requires = { kind = "mirror", name = "debian" }
provides = { kind = "snapshot", name = "s1" }
"#,
        )
        .unwrap();

        let Plan::Flat(commands) = plan.into_plan(&backend()).unwrap() else {
            panic!("expected flat plan");
        };
        match commands[0].action() {
            Action::Invoke(argv) => {
                assert_eq!(argv[0], "/opt/aptly/bin/aptly");
                assert_eq!(argv[1], "-config=/srv/aptly.conf");
                assert_eq!(argv[2], "snapshot");
            }
            Action::Function(_) => panic!("expected invocation"),
        }
        assert!(commands[0].provided().contains(&Dependency::snapshot("s1")));
    }

    #[test]
    fn test_unknown_kind_is_rejected_at_load() {
        let plan = PlanFile::parse(
            r#"
[[commands]]
argv = ["ls"]
requires = { kind = "turbo", name = "banana" }
"#,
        )
        .unwrap();

        let err = plan.into_plan(&backend()).err().unwrap();
        assert!(format!("{err:#}").contains("unknown dependency kind: turbo"));
    }

    #[test]
    fn test_empty_argv_is_rejected() {
        let plan = PlanFile::parse("[[commands]]\nargv = []\n").unwrap();
        assert!(plan.into_plan(&backend()).is_err());
    }

    #[test]
    fn test_levels_and_commands_are_exclusive() {
        let plan = PlanFile::parse(
            r#"
[[commands]]
argv = ["true"]

[[levels]]
[[levels.commands]]
argv = ["true"]
"#,
        )
        .unwrap();
        assert!(plan.into_plan(&backend()).is_err());
    }

    #[test]
    fn test_empty_plan_is_flat_and_empty() {
        let Plan::Flat(commands) = PlanFile::parse("").unwrap().into_plan(&backend()).unwrap() else {
            panic!("expected flat plan");
        };
        assert!(commands.is_empty());
    }
}
