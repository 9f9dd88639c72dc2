//! The built-in tool catalog.
//!
//! Pure data: every supported tool as a [`ToolSpec`], grouped roughly by
//! the kind of file it handles. The scheduler walks this list in order, so
//! catalog order is also reporting order.
//!
//! Matcher strings are shared through constants because several tools claim
//! the same family of files (e.g. everything that looks like YAML).

use once_cell::sync::Lazy;

use crate::resolver::ConfigQuery;
use crate::tool::{
    CommandSpec, CustomRoutine, Invocation, PreAllHook, PreFileHook, SuccessRule, ToolSpec,
    Workdir,
};

const JSON: &str = "*.{json,json5,jsonl,geojson,babelrc,ecrc,eslintrc,htmlhintrc,htmllintrc,jscsrc,jshintrc,jslintrc,prettierrc,remarkrc}";
const YAML: &str = "*.{yml,yaml}";
const ENV: &str = "{*.env,env.*,env}";
const DOCKERFILE: &str = "{Dockerfile,*.Dockerfile,Dockerfile.*}";
const MARKDOWN: &str = "*.{md,mdown,markdown}";
const MAKEFILE: &str = "{Makefile,*.make}";
const GNUMAKEFILE: &str = "{GNU,G,}{Makefile,*.make}";
const BSDMAKEFILE: &str = "{BSD,B,}{Makefile,*.make}";
const HTML: &str = "*.{html,htm,html5,xhtml}";
const SHELL: &str = "*.{sh,bash,ksh,ksh93,mksh,loksh,ash,dash,zsh,yash}";
const PYTHON: &str = "*.{py,py3,python,python3}";

pub static CATALOG: Lazy<Vec<ToolSpec>> = Lazy::new(build);

fn cmd(spec: CommandSpec) -> Invocation {
    Invocation::Command(spec)
}

fn build() -> Vec<ToolSpec> {
    vec![
        // Generic checks over every file.
        ToolSpec::new(
            "git-check-ignore",
            "GITIGNORE",
            &["*"],
            cmd(
                // Exit code 1 means "not ignored", which is the clean case
                // here: a tracked file matching .gitignore is the problem.
                CommandSpec::new(["git", "check-ignore", "--no-index", "#file#"])
                    .with_success(SuccessRule::Code(1)),
            ),
        )
        .with_pre_all(PreAllHook::RequireGitRepo)
        .with_fmt(Invocation::Custom(CustomRoutine::GitUntrackIgnored)),
        ToolSpec::new(
            "editorconfig-checker",
            "EDITORCONFIG_CHECKER",
            &["*"],
            cmd(CommandSpec::new(["ec", "#file#"])),
        ),
        ToolSpec::new(
            "eclint",
            "ECLINT",
            &["*"],
            cmd(CommandSpec::new(["eclint", "#file#"])),
        ),
        // HTML, JSON, SVG, TOML, XML, YAML.
        ToolSpec::new(
            "prettier",
            "PRETTIER",
            &[JSON, YAML, "*.{json,yml,yaml,html,vue,css,scss,sass,less}"],
            cmd(
                CommandSpec::new(["prettier", "#config#", "--list-different", "#file#"])
                    .with_config(prettier_config()),
            ),
        )
        .with_fmt(cmd(
            CommandSpec::new(["prettier", "#config#", "--write", "#file#"])
                .with_config(prettier_config()),
        )),
        ToolSpec::new(
            "jsonlint",
            "JSONLINT",
            &[JSON],
            cmd(
                CommandSpec::new([
                    "jsonlint",
                    "#config#",
                    "--quiet",
                    "--comments",
                    "--no-duplicate-keys",
                    "#file#",
                ])
                .with_config(ConfigQuery::new(
                    "JSONLINT",
                    "--config",
                    &[
                        "jsonlintrc",
                        ".jsonlintrc",
                        "jsonlintrc.json",
                        ".jsonlintrc.json",
                        "jsonlintrc.yml",
                        ".jsonlintrc.yml",
                        "jsonlintrc.yaml",
                        ".jsonlintrc.yaml",
                        "jsonlintrc.js",
                        ".jsonlintrc.js",
                        "jsonlintrc.mjs",
                        ".jsonlintrc.mjs",
                        "jsonlintrc.cjs",
                        ".jsonlintrc.cjs",
                    ],
                )),
            ),
        ),
        ToolSpec::new(
            "yamllint",
            "YAMLLINT",
            &[YAML],
            cmd(
                CommandSpec::new(["yamllint", "--strict", "#config#", "#file#"]).with_config(
                    ConfigQuery::new(
                        "YAMLLINT",
                        "--config-file",
                        &["yamllint.yml", ".yamllint.yml", "yamllint.yaml", ".yamllint.yaml"],
                    ),
                ),
            ),
        ),
        ToolSpec::new(
            "tomljson",
            "TOMLJSON",
            &["*.toml"],
            cmd(CommandSpec::new(["tomljson", "#file#"])),
        ),
        ToolSpec::new(
            "stoml",
            "STOML",
            &["*.{toml,cfg,ini}"],
            cmd(CommandSpec::new(["stoml", "#file#", "."])),
        ),
        ToolSpec::new(
            "xmllint",
            "XMLLINT",
            &["*.xml"],
            cmd(CommandSpec::new(["xmllint", "--noout", "#file#"])),
        )
        .with_fmt(cmd(CommandSpec::new([
            "xmllint", "--format", "--output", "#file#", "#file#",
        ]))),
        ToolSpec::new(
            "htmllint",
            "HTMLLINT",
            &[HTML],
            cmd(
                CommandSpec::new(["htmllint", "#config#", "#file#"])
                    .with_config(ConfigQuery::new("HTMLLINT", "--rc", &[".htmllintrc"])),
            ),
        ),
        ToolSpec::new(
            "htmlhint",
            "HTMLHINT",
            &[HTML],
            cmd(
                CommandSpec::new(["htmlhint", "#config#", "#file#"])
                    .with_config(ConfigQuery::new("HTMLHINT", "--config", &[".htmlhintrc"])),
            ),
        ),
        ToolSpec::new(
            "svglint",
            "SVGLINT",
            &["*.svg"],
            cmd(
                CommandSpec::new(["svglint", "--ci", "#config#", "#file#"]).with_config(
                    ConfigQuery::new("SVGLINT", "--config", &[".svglintrc.js", "svglintrc.js"]),
                ),
            ),
        ),
        ToolSpec::new(
            "dotenv-linter",
            "DOTENV",
            &[ENV],
            cmd(CommandSpec::new(["dotenv-linter", "--quiet", "#file#"])),
        ),
        // Markdown and prose.
        ToolSpec::new(
            "markdown-table-formatter",
            "MARKDOWN_TABLE_FORMATTER",
            &[MARKDOWN],
            cmd(CommandSpec::new([
                "markdown-table-formatter",
                "--check",
                "#file#",
            ])),
        )
        .with_fmt(cmd(CommandSpec::new(["markdown-table-formatter", "#file#"]))),
        ToolSpec::new(
            "markdownlint",
            "MARKDOWNLINT",
            &[MARKDOWN],
            cmd(
                CommandSpec::new(["markdownlint", "#config#", "#file#"])
                    .with_config(markdownlint_config()),
            ),
        )
        .with_fmt(cmd(
            CommandSpec::new(["markdownlint", "#config#", "--fix", "#file#"])
                .with_config(markdownlint_config()),
        )),
        ToolSpec::new(
            "mdl",
            "MDL",
            &[MARKDOWN],
            cmd(
                CommandSpec::new(["bundle", "exec", "mdl", "#config#", "#file#"])
                    .with_config(ConfigQuery::new("MDL", "--config", &[".mdlrc"])),
            ),
        ),
        ToolSpec::new(
            "markdown-link-check",
            "MARKDOWN_LINK_CHECK",
            &[MARKDOWN],
            cmd(
                CommandSpec::new([
                    "markdown-link-check",
                    "--quiet",
                    "#config#",
                    "--retry",
                    "--verbose",
                    "#file#",
                ])
                .with_config(ConfigQuery::new(
                    "MARKDOWN_LINK_CHECK",
                    "--config",
                    &["markdown-link-check.json", ".markdown-link-check.json"],
                )),
            ),
        ),
        ToolSpec::new(
            "proselint",
            "PROSELINT",
            &[MARKDOWN, "*.txt"],
            cmd(
                CommandSpec::new(["proselint", "#config#", "#file#"]).with_config(
                    ConfigQuery::new("PROSELINT", "--config", &["proselintrc", ".proselintrc"]),
                ),
            ),
        ),
        // Shell.
        ToolSpec::new(
            "shfmt",
            "SHFMT",
            &[SHELL],
            cmd(CommandSpec::new(["shfmt", "-l", "-d", "#file#"])),
        )
        .with_fmt(cmd(CommandSpec::new(["shfmt", "-w", "#file#"]))),
        ToolSpec::new(
            "shellharden",
            "SHELLHARDEN",
            &[SHELL],
            cmd(CommandSpec::new([
                "shellharden",
                "--check",
                "--suggest",
                "--",
                "#file#",
            ])),
        )
        .with_fmt(cmd(CommandSpec::new([
            "shellharden",
            "--replace",
            "--",
            "#file#",
        ]))),
        ToolSpec::new(
            "bashate",
            "BASHATE",
            &[SHELL],
            cmd(CommandSpec::new([
                "bashate",
                "--ignore",
                "E001,E002,E003,E004,E005,E006",
                "#file#",
            ])),
        ),
        ToolSpec::new(
            "shellcheck",
            "SHELLCHECK",
            &[SHELL, "*.bats"],
            cmd(CommandSpec::new([
                "shellcheck",
                "--external-sources",
                "#file#",
            ])),
        ),
        ToolSpec::new(
            "bats",
            "BATS",
            &["*.bats"],
            cmd(CommandSpec::new(["bats", "--count", "#file#"])),
        ),
        // Python.
        ToolSpec::new(
            "autopep8",
            "AUTOPEP8",
            &[PYTHON],
            cmd(CommandSpec::new(["autopep8", "--diff", "#file#"])),
        ),
        ToolSpec::new(
            "isort",
            "ISORT",
            &[PYTHON],
            cmd(
                CommandSpec::new([
                    "isort",
                    "#config#",
                    "--honor-noqa",
                    "--check-only",
                    "--diff",
                    "#file#",
                ])
                .with_config(isort_config()),
            ),
        )
        .with_fmt(cmd(
            CommandSpec::new(["isort", "#config#", "--honor-noqa", "#file#"])
                .with_config(isort_config()),
        )),
        ToolSpec::new(
            "black",
            "BLACK",
            &[PYTHON],
            cmd(
                CommandSpec::new(["black", "#config#", "--check", "--diff", "--quiet", "#file#"])
                    .with_config(black_config()),
            ),
        )
        .with_fmt(cmd(
            CommandSpec::new(["black", "#config#", "--quiet", "#file#"])
                .with_config(black_config()),
        )),
        ToolSpec::new(
            "pycodestyle",
            "PYCODESTYLE",
            &[PYTHON],
            cmd(
                CommandSpec::new(["pycodestyle", "#config#", "#file#"]).with_config(
                    ConfigQuery::new("PYCODESTYLE", "--config", &["pycodestyle", ".pycodestyle"])
                        .with_shared("pycodestyle", &["setup.cfg", "tox.ini"]),
                ),
            ),
        ),
        ToolSpec::new(
            "flake8",
            "FLAKE8",
            &[PYTHON],
            cmd(
                CommandSpec::new(["flake8", "#config#", "#file#"]).with_config(
                    ConfigQuery::new("FLAKE8", "--config", &["flake8", ".flake8"])
                        .with_shared("flake8", &["setup.cfg", "tox.ini"]),
                ),
            ),
        ),
        ToolSpec::new(
            "pylint",
            "PYLINT",
            &[PYTHON],
            cmd(
                CommandSpec::new(["pylint", "#config#", "#file#"]).with_config(
                    ConfigQuery::new("PYLINT", "--rcfile", &["pylintrc", ".pylintrc"])
                        .with_shared("pylint", &["pyproject.toml", "setup.cfg", "tox.ini"]),
                ),
            ),
        ),
        ToolSpec::new(
            "mypy",
            "MYPY",
            &[PYTHON],
            cmd(CommandSpec::new([
                "mypy",
                "--follow-imports",
                "skip",
                "#file#",
            ])),
        ),
        // Package manager manifests.
        ToolSpec::new(
            "package-json-validator",
            "PACKAGE_JSON",
            &["package.json"],
            cmd(CommandSpec::new([
                "pjv",
                "--warnings",
                "--recommendations",
                "--filename",
                "#file#",
            ])),
        )
        .with_pre_file(PreFileHook::SkipPrivatePackageJson),
        ToolSpec::new(
            "composer-validate",
            "COMPOSER_VALIDATE",
            &["composer.json"],
            cmd(CommandSpec::new([
                "composer",
                "validate",
                "--no-interaction",
                "--no-cache",
                "--ansi",
                "--no-check-all",
                "--no-check-publish",
                "#file#",
            ])),
        ),
        ToolSpec::new(
            "composer-normalize",
            "COMPOSER_NORMALIZE",
            &["composer.json"],
            // Normalize insists on a writable cwd for its own cache even in
            // dry-run mode, so it runs from scratch and addresses the
            // manifest absolutely.
            cmd(
                CommandSpec::new([
                    "composer",
                    "normalize",
                    "--no-interaction",
                    "--no-cache",
                    "--ansi",
                    "--dry-run",
                    "--diff",
                    "#file[abs]#",
                ])
                .with_workdir(Workdir::Scratch),
            ),
        )
        .with_fmt(cmd(
            CommandSpec::new([
                "composer",
                "normalize",
                "--no-interaction",
                "--no-cache",
                "--ansi",
                "#file[abs]#",
            ])
            .with_workdir(Workdir::Scratch),
        )),
        ToolSpec::new(
            "composer-install",
            "COMPOSER_INSTALL",
            &["composer.json"],
            // Dry-run installs still write lock and cache files next to the
            // manifest, so they get a scratch copy to chew on.
            cmd(
                CommandSpec::new(["composer", "install", "--dry-run", "--no-interaction"])
                    .with_workdir(Workdir::ScratchCopy),
            ),
        ),
        ToolSpec::new(
            "pip-install",
            "PIP_INSTALL",
            &[
                "requirements.txt",
                "requirements-*.txt",
                "requirements_*.txt",
                "*-requirements.txt",
                "*_requirements.txt",
            ],
            cmd(
                CommandSpec::new([
                    "python3",
                    "-m",
                    "pip",
                    "install",
                    "--dry-run",
                    "--ignore-installed",
                    "--break-system-packages",
                    "--requirement",
                    "#file#",
                ])
                .with_workdir(Workdir::ScratchCopy),
            ),
        ),
        // Dockerfiles.
        ToolSpec::new(
            "dockerfilelint",
            "DOCKERFILELINT",
            &[DOCKERFILE],
            cmd(
                CommandSpec::new(["dockerfilelint", "#config#", "#file#"]).with_config(
                    ConfigQuery::new("DOCKERFILELINT", "--config", &[".dockerfilelintrc"])
                        .directory(),
                ),
            ),
        ),
        ToolSpec::new(
            "hadolint",
            "HADOLINT",
            &[DOCKERFILE],
            cmd(
                CommandSpec::new(["hadolint", "#config#", "#file#"]).with_config(
                    ConfigQuery::new(
                        "HADOLINT",
                        "--config",
                        &["hadolint.yml", "hadolint.yaml", ".hadolint.yml", ".hadolint.yaml"],
                    ),
                ),
            ),
        ),
        // Makefiles.
        ToolSpec::new(
            "checkmake",
            "CHECKMAKE",
            &[MAKEFILE, GNUMAKEFILE, BSDMAKEFILE],
            cmd(
                CommandSpec::new(["checkmake", "#config#", "#file#"]).with_config(
                    ConfigQuery::new("CHECKMAKE", "--config", &["checkmake.ini", ".checkmake.ini"]),
                ),
            ),
        ),
        ToolSpec::new(
            "gmake",
            "GMAKE",
            &[MAKEFILE, GNUMAKEFILE],
            cmd(CommandSpec::new(["gmake", "--dry-run", "-f", "#file#"])),
        ),
        ToolSpec::new(
            "bmake",
            "BMAKE",
            &[BSDMAKEFILE],
            cmd(CommandSpec::new(["bmake", "-n", "-f", "#file#"])),
        ),
        ToolSpec::new(
            "bsdmake",
            "BSDMAKE",
            &[BSDMAKEFILE],
            cmd(CommandSpec::new(["bsdmake", "-n", "-f", "#file#"])),
        ),
        // CI/CD service configs.
        ToolSpec::new(
            "circleci-validate",
            "CIRCLECI_VALIDATE",
            &[".circleci/config.yml"],
            // The CLI locates .circleci/config.yml itself relative to the
            // cwd, which must be the directory above .circleci.
            cmd(
                CommandSpec::new(["circleci", "--skip-update-check", "config", "validate"])
                    .with_workdir(Workdir::FileParentDir),
            ),
        ),
        ToolSpec::new(
            "gitlab-ci-lint",
            "GITLABCI_LINT",
            &[".gitlab-ci.yml"],
            cmd(CommandSpec::new(["gitlab-ci-lint", "#file#"])),
        ),
        ToolSpec::new(
            "gitlab-ci-validate",
            "GITLABCI_VALIDATE",
            &[".gitlab-ci.yml"],
            cmd(CommandSpec::new(["gitlab-ci-validate", "validate", "#file#"])),
        ),
        ToolSpec::new(
            "travis-lint",
            "TRAVIS_LINT",
            &[".travis.yml"],
            cmd(
                CommandSpec::new([
                    "travis",
                    "lint",
                    "--no-interactive",
                    "--skip-version-check",
                    "--skip-completion-check",
                    "--exit-code",
                    "--quiet",
                ])
                .with_workdir(Workdir::FileDir),
            ),
        ),
        // Duplicate detection over everything.
        ToolSpec::new(
            "jscpd",
            "JSCPD",
            &["*"],
            // Duplicate reports are advisory only, so any exit code passes;
            // the report itself goes to a throwaway output dir.
            cmd(
                CommandSpec::new(["jscpd", "#config#", "--output", "#scratch#", "#file#"])
                    .with_config(ConfigQuery::new("JSCPD", "--config", &["jscpd.json", ".jscpd.json"]))
                    .with_success(SuccessRule::Predicate(|_| true)),
            ),
        ),
    ]
}

fn prettier_config() -> ConfigQuery {
    ConfigQuery::new(
        "PRETTIER",
        "--config",
        &[
            "prettierrc",
            "prettierrc.yml",
            "prettierrc.yaml",
            "prettierrc.json",
            "prettierrc.js",
            ".prettierrc",
            ".prettierrc.yml",
            ".prettierrc.yaml",
            ".prettierrc.json",
            ".prettierrc.js",
        ],
    )
}

fn markdownlint_config() -> ConfigQuery {
    ConfigQuery::new(
        "MARKDOWNLINT",
        "--config",
        &["markdownlint.json", ".markdownlint.json"],
    )
}

fn isort_config() -> ConfigQuery {
    ConfigQuery::new("ISORT", "--settings-file", &["isort.cfg", ".isort.cfg"])
        .with_shared("isort", &["pyproject.toml", "setup.cfg", "tox.ini"])
}

fn black_config() -> ConfigQuery {
    ConfigQuery::new("BLACK", "--config", &["black", ".black"])
        .with_shared("black", &["pyproject.toml"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::pattern::Pattern;

    #[test]
    fn names_and_env_names_are_unique() {
        let mut names = HashSet::new();
        let mut env_names = HashSet::new();
        for tool in CATALOG.iter() {
            assert!(names.insert(tool.name.clone()), "duplicate name {}", tool.name);
            assert!(
                env_names.insert(tool.env_name.clone()),
                "duplicate env name {}",
                tool.env_name
            );
        }
    }

    #[test]
    fn all_patterns_compile() {
        for tool in CATALOG.iter() {
            for pattern in &tool.file_match {
                let _ = Pattern::compile(pattern);
            }
        }
    }

    #[test]
    fn argv_templates_are_not_empty() {
        for tool in CATALOG.iter() {
            let specs = [Some(&tool.lint), tool.fmt.as_ref()];
            for invocation in specs.into_iter().flatten() {
                if let Invocation::Command(spec) = invocation {
                    assert!(!spec.argv.is_empty(), "{} has an empty argv", tool.name);
                }
            }
        }
    }

    #[test]
    fn makefile_matchers_route_expected_names() {
        let checkmake = CATALOG
            .iter()
            .find(|t| t.name == "checkmake")
            .map(|t| {
                t.file_match
                    .iter()
                    .map(|p| Pattern::compile(p))
                    .collect::<Vec<_>>()
            })
            .unwrap();
        for name in ["Makefile", "GNUMakefile", "BSDMakefile", "build/lib.make"] {
            assert!(checkmake.iter().any(|p| p.is_match(name)), "{name}");
        }
        assert!(!checkmake.iter().any(|p| p.is_match("Makefile.am")));
    }
}
