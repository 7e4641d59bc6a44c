// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! `go.mod` parsing and replace-directive resolution

use crate::error::ManifestError;
use crate::types::Library;

/// A `require` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Require {
    /// Module path
    pub path: String,
    /// Declared version
    pub version: String,
    /// Marked `// indirect`
    pub indirect: bool,
}

/// A `replace` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replace {
    /// Path being replaced
    pub old_path: String,
    /// Only this version is replaced; `None` replaces every version
    pub old_version: Option<String>,
    /// Replacement path (module path or local directory)
    pub new_path: String,
    /// Replacement version; `None` for local directory replacements
    pub new_version: Option<String>,
}

/// Parsed manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    /// `module` directive
    pub module: Option<String>,
    /// `go` directive
    pub go_version: Option<String>,
    /// `require` entries in file order
    pub requires: Vec<Require>,
    /// `replace` entries in file order
    pub replaces: Vec<Replace>,
}

impl Manifest {
    /// Final segment of the module path, used as the service short name
    #[must_use]
    pub fn short_name(&self) -> Option<&str> {
        self.module.as_deref().map(crate::graph::last_segment)
    }

    /// Requirements with replace directives applied.
    ///
    /// The first replace on the same path whose old version is absent or
    /// equal applies. A replacement version overrides the declared one; the
    /// module path itself is kept.
    #[must_use]
    pub fn effective_requires(&self) -> Vec<Library> {
        self.requires
            .iter()
            .map(|req| {
                let replacement = self.replaces.iter().find(|r| {
                    r.old_path == req.path
                        && r.old_version.as_deref().map_or(true, |v| v == req.version)
                });
                match replacement {
                    Some(r) => Library {
                        name: req.path.clone(),
                        version: r.new_version.clone().unwrap_or_else(|| req.version.clone()),
                        path: (r.new_path != req.path).then(|| r.new_path.clone()),
                    },
                    None => Library::new(req.path.clone(), req.version.clone()),
                }
            })
            .collect()
    }
}

/// Parse `go.mod` source text
pub fn parse_go_mod(source: &str) -> Result<Manifest, ManifestError> {
    let mut manifest = Manifest::default();
    let mut block: Option<(String, usize)> = None;

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let (code, comment) = match raw.find("//") {
            Some(i) => (&raw[..i], Some(raw[i + 2..].trim())),
            None => (raw, None),
        };
        let tokens: Vec<&str> = code.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        let indirect = comment.is_some_and(|c| c == "indirect" || c.starts_with("indirect;"));

        if let Some((directive, _)) = &block {
            if tokens == [")"] {
                block = None;
            } else {
                apply(&mut manifest, directive, &tokens, indirect, line_no)?;
            }
            continue;
        }

        let (directive, args) = (tokens[0], &tokens[1..]);
        if args == ["("] {
            block = Some((directive.to_string(), line_no));
            continue;
        }
        apply(&mut manifest, directive, args, indirect, line_no)?;
    }

    if let Some((directive, line)) = block {
        return Err(ManifestError::UnterminatedBlock { directive, line });
    }
    Ok(manifest)
}

fn apply(
    manifest: &mut Manifest,
    directive: &str,
    args: &[&str],
    indirect: bool,
    line: usize,
) -> Result<(), ManifestError> {
    let syntax = |message: &str| ManifestError::Syntax {
        line,
        message: message.to_string(),
    };

    match directive {
        "module" => match args {
            [path] => manifest.module = Some(unquote(path)),
            _ => return Err(syntax("usage: module module/path")),
        },
        "go" => match args {
            [version] => manifest.go_version = Some((*version).to_string()),
            _ => return Err(syntax("usage: go 1.23")),
        },
        "require" => match args {
            [path, version] => manifest.requires.push(Require {
                path: unquote(path),
                version: unquote(version),
                indirect,
            }),
            _ => return Err(syntax("usage: require module/path v1.2.3")),
        },
        "replace" => manifest.replaces.push(parse_replace(args).ok_or_else(|| {
            syntax("usage: replace module/path [v1.2.3] => other/module v1.4.5 | ../local/dir")
        })?),
        "exclude" | "retract" | "toolchain" | "godebug" | "tool" | "ignore" => {}
        other => return Err(syntax(&format!("unknown directive: {other}"))),
    }
    Ok(())
}

fn parse_replace(args: &[&str]) -> Option<Replace> {
    let arrow = args.iter().position(|a| *a == "=>")?;
    let (old, new) = (&args[..arrow], &args[arrow + 1..]);
    let (old_path, old_version) = match old {
        [path] => (unquote(path), None),
        [path, version] => (unquote(path), Some(unquote(version))),
        _ => return None,
    };
    let (new_path, new_version) = match new {
        [path] => (unquote(path), None),
        [path, version] => (unquote(path), Some(unquote(version))),
        _ => return None,
    };
    Some(Replace {
        old_path,
        old_version,
        new_path,
        new_version,
    })
}

fn unquote(token: &str) -> String {
    for quote in ['"', '`'] {
        if token.len() >= 2 && token.starts_with(quote) && token.ends_with(quote) {
            return token[1..token.len() - 1].to_string();
        }
    }
    token.to_string()
}
